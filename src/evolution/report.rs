//! # Run Report
//!
//! The value a finished or aborted run resolves to, and its plain-text
//! export. A report is only ever produced after the worker has stopped, so
//! exporting a live run is impossible by construction.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::evolution::options::RunParameters;
use crate::evolution::statistics::{CostSummary, RunStatistics};
use crate::individual::Individual;

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The configured generation budget was reached.
    Finished,
    /// The run was aborted before reaching its budget.
    Aborted,
}

/// Everything a run produced: outcome, best tour, parameter echo and the
/// accumulated statistics.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Generations completed when the run stopped.
    pub generations_completed: usize,
    /// The parameter snapshot the run was started with.
    pub parameters: RunParameters,
    pub statistics: RunStatistics,
}

impl RunReport {
    /// The best individual found, if any generation was sampled.
    pub fn best(&self) -> Option<&Individual> {
        self.statistics.best()
    }

    /// Writes the plain-text report to `path`.
    ///
    /// Fails without creating a file if the destination cannot be opened
    /// for writing.
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the report to any writer. See [`RunReport::export`] for the
    /// layout.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "***** BEST TOUR *****")?;
        match self.best() {
            Some(individual) => {
                let tour: Vec<String> =
                    individual.genome.iter().map(|city| city.to_string()).collect();
                writeln!(writer, "{}", tour.join(" "))?;
            }
            None => writeln!(writer, "(none)")?,
        }

        writeln!(writer)?;
        writeln!(writer, "***** RUN PARAMETERS *****")?;
        let parameters = &self.parameters;
        writeln!(writer, "{}\t # population size", parameters.get_population_size())?;
        writeln!(writer, "{}\t # generation budget", parameters.get_num_generations())?;
        writeln!(
            writer,
            "{}\t # mutation probability",
            parameters.get_mutation_probability()
        )?;
        writeln!(writer, "{}\t # tournament size", parameters.get_tournament_size())?;
        writeln!(writer, "{}\t # elitism count", parameters.get_elitism_count())?;
        writeln!(writer, "{}\t # log interval", parameters.get_log_interval())?;
        writeln!(writer, "{}\t # crossover operator", parameters.get_crossover())?;
        writeln!(writer, "{}\t # mutation operator", parameters.get_mutation())?;
        writeln!(writer, "{}\t # generations completed", self.generations_completed)?;
        writeln!(
            writer,
            "{}\t # crossover applications",
            self.statistics.crossover_count()
        )?;
        writeln!(
            writer,
            "{}\t # mutation applications",
            self.statistics.mutation_count()
        )?;
        writeln!(
            writer,
            "{}\t # genome evaluations",
            self.statistics.evaluation_count()
        )?;

        writeln!(writer)?;
        writeln!(writer, "***** OVERALL STATISTICS *****")?;
        let elapsed = self.statistics.elapsed();
        writeln!(
            writer,
            "{}.{:03}s\t # running time",
            elapsed.as_secs(),
            elapsed.subsec_millis()
        )?;
        write_summary(writer, self.statistics.all_time())?;

        writeln!(writer)?;
        writeln!(writer, "***** INITIAL POPULATION *****")?;
        write_summary(writer, self.statistics.initial())?;

        writeln!(writer)?;
        writeln!(writer, "***** CURRENT POPULATION *****")?;
        write_summary(writer, self.statistics.current())?;

        writeln!(writer)?;
        writeln!(writer, "***** PROGRESS SAMPLES *****")?;
        for sample in self.statistics.samples() {
            writeln!(
                writer,
                "{} \t{} \t{} \t{}",
                sample.generation, sample.min, sample.avg, sample.max
            )?;
        }

        Ok(())
    }
}

fn write_summary<W: Write>(writer: &mut W, summary: Option<CostSummary>) -> io::Result<()> {
    match summary {
        Some(summary) => {
            writeln!(writer, "{}\t # best tour cost", summary.min)?;
            writeln!(writer, "{}\t # worst tour cost", summary.max)?;
            writeln!(writer, "{}\t # average tour cost", summary.avg)?;
        }
        None => writeln!(writer, "(no sampled generation)")?,
    }
    Ok(())
}
