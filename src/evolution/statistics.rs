//! # Run Statistics
//!
//! Running aggregates over a single evolution run: operator counts, cost
//! summaries over the initial population, the most recent sampled
//! generation and the whole run, the best individual found so far, and the
//! sampled `(generation, min, avg, max)` time series used for reporting
//! and live charting.

use std::time::Duration;

use crate::individual::Individual;

/// Min/avg/max cost over one population.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostSummary {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

impl CostSummary {
    /// Summarizes a non-empty population.
    pub fn of_population(population: &[Individual]) -> Self {
        debug_assert!(!population.is_empty());

        let mut min = f64::INFINITY;
        let mut max = 0.0_f64;
        let mut sum = 0.0;
        for individual in population {
            min = min.min(individual.cost);
            max = max.max(individual.cost);
            sum += individual.cost;
        }

        Self {
            min,
            avg: sum / population.len() as f64,
            max,
        }
    }
}

/// One time-series sample, taken at generation 0 and then every logging
/// interval.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationSample {
    pub generation: usize,
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

/// Aggregated results of one run. Reset by constructing a fresh value when
/// a new run starts; accumulates monotonically while the run lives.
#[derive(Clone, Debug, Default)]
pub struct RunStatistics {
    crossover_count: u64,
    mutation_count: u64,
    evaluation_count: u64,
    best: Option<Individual>,
    all_time_min: Option<f64>,
    all_time_max: Option<f64>,
    initial: Option<CostSummary>,
    current: Option<CostSummary>,
    samples: Vec<GenerationSample>,
    elapsed: Duration,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of crossover operator applications so far.
    pub fn crossover_count(&self) -> u64 {
        self.crossover_count
    }

    /// Number of mutation operator applications so far.
    pub fn mutation_count(&self) -> u64 {
        self.mutation_count
    }

    /// Number of genome evaluations so far.
    pub fn evaluation_count(&self) -> u64 {
        self.evaluation_count
    }

    /// The best individual seen at any sampled generation, if a generation
    /// has been sampled yet.
    pub fn best(&self) -> Option<&Individual> {
        self.best.as_ref()
    }

    /// All-time cost summary. The average is normalized lazily: it is the
    /// mean of the per-sample averages, computed on demand.
    pub fn all_time(&self) -> Option<CostSummary> {
        match (self.all_time_min, self.all_time_max) {
            (Some(min), Some(max)) => Some(CostSummary {
                min,
                avg: self.all_time_average(),
                max,
            }),
            _ => None,
        }
    }

    /// Cost summary over the initial population.
    pub fn initial(&self) -> Option<CostSummary> {
        self.initial
    }

    /// Cost summary over the most recently sampled generation.
    pub fn current(&self) -> Option<CostSummary> {
        self.current
    }

    /// The sampled time series, in generation order.
    pub fn samples(&self) -> &[GenerationSample] {
        &self.samples
    }

    /// Wall time spent in generation steps; zero until the run finishes or
    /// aborts.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub(crate) fn note_crossover(&mut self) {
        self.crossover_count += 1;
    }

    pub(crate) fn note_mutation(&mut self) {
        self.mutation_count += 1;
    }

    pub(crate) fn note_evaluation(&mut self) {
        self.evaluation_count += 1;
    }

    /// Records the initial population: its summary seeds both the
    /// "initial" window and the first time-series sample. The best-ever
    /// tracking starts empty; it only advances at sampled generations.
    pub(crate) fn record_initial(&mut self, population: &[Individual]) {
        let summary = CostSummary::of_population(population);
        self.initial = Some(summary);
        self.samples.push(GenerationSample {
            generation: 0,
            min: summary.min,
            avg: summary.avg,
            max: summary.max,
        });
    }

    /// Records a sampled generation: refreshes the "current" window,
    /// widens the all-time bounds, adopts a new best individual when the
    /// population minimum undercuts it, and appends a time-series sample.
    pub(crate) fn record_generation(&mut self, generation: usize, population: &[Individual]) {
        let summary = CostSummary::of_population(population);

        if self.all_time_max.map_or(true, |max| summary.max > max) {
            self.all_time_max = Some(summary.max);
        }
        if self.all_time_min.map_or(true, |min| summary.min < min) {
            self.all_time_min = Some(summary.min);
            self.best = population
                .iter()
                .min_by(|a, b| {
                    a.cost
                        .partial_cmp(&b.cost)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .cloned();
        }

        self.current = Some(summary);
        self.samples.push(GenerationSample {
            generation,
            min: summary.min,
            avg: summary.avg,
            max: summary.max,
        });
    }

    pub(crate) fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    fn all_time_average(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.samples.iter().map(|sample| sample.avg).sum();
        sum / self.samples.len() as f64
    }
}
