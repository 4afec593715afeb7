//! # RunParameters
//!
//! The immutable configuration a run is started with. A parameter set is
//! captured once when the worker is spawned and never consulted from shared
//! mutable state afterwards, so concurrent reconfiguration cannot race a
//! running evolution.
//!
//! ## Example
//!
//! ```rust
//! use tsp_evolve::evolution::RunParameters;
//! use tsp_evolve::crossover::CrossoverKind;
//!
//! let parameters = RunParameters::builder()
//!     .population_size(50)
//!     .num_generations(200)
//!     .crossover(CrossoverKind::EdgeRecombination)
//!     .seed(42)
//!     .build();
//!
//! assert_eq!(parameters.get_population_size(), 50);
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::crossover::CrossoverKind;
use crate::error::{Result, TspError};
use crate::mutation::MutationKind;

/// Configuration for one evolution run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunParameters {
    population_size: usize,
    num_generations: usize,
    mutation_probability: f64,
    tournament_size: usize,
    elitism_count: usize,
    log_interval: usize,
    crossover: CrossoverKind,
    mutation: MutationKind,
    seed: Option<u64>,
}

impl RunParameters {
    /// Returns a builder preloaded with the default parameter set.
    pub fn builder() -> RunParametersBuilder {
        RunParametersBuilder::default()
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_num_generations(&self) -> usize {
        self.num_generations
    }

    pub fn get_mutation_probability(&self) -> f64 {
        self.mutation_probability
    }

    pub fn get_tournament_size(&self) -> usize {
        self.tournament_size
    }

    pub fn get_elitism_count(&self) -> usize {
        self.elitism_count
    }

    pub fn get_log_interval(&self) -> usize {
        self.log_interval
    }

    pub fn get_crossover(&self) -> CrossoverKind {
        self.crossover
    }

    pub fn get_mutation(&self) -> MutationKind {
        self.mutation
    }

    /// The RNG seed for a reproducible run, if one was set.
    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    /// Validates the parameter set against a problem of the given dimension.
    ///
    /// Checked before the worker is spawned, so an invalid configuration
    /// never creates partial run state. Elitism equal to the population size
    /// is accepted; only a strictly larger elite is rejected.
    pub fn validate(&self, dimension: usize) -> Result<()> {
        if self.population_size == 0 {
            return Err(TspError::Configuration(
                "population size must be at least 1".to_string(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(TspError::Configuration(
                "tournament size must be at least 1".to_string(),
            ));
        }
        if self.log_interval == 0 {
            return Err(TspError::Configuration(
                "log interval must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(TspError::Configuration(format!(
                "mutation probability {} is outside [0, 1]",
                self.mutation_probability
            )));
        }
        if self.elitism_count > self.population_size {
            return Err(TspError::Configuration(format!(
                "elitism count {} exceeds population size {}",
                self.elitism_count, self.population_size
            )));
        }
        if dimension < 2 {
            return Err(TspError::Configuration(format!(
                "problem dimension {} is below the minimum of 2",
                dimension
            )));
        }
        let needs_four = self.mutation == MutationKind::ThreeOpt
            || self.crossover == CrossoverKind::Cycle;
        if needs_four && dimension < 4 {
            return Err(TspError::Configuration(format!(
                "{} requires a problem dimension of at least 4, got {}",
                if self.mutation == MutationKind::ThreeOpt {
                    "3-opt mutation"
                } else {
                    "cycle crossover"
                },
                dimension
            )));
        }
        Ok(())
    }
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            population_size: 100,
            num_generations: 1000,
            mutation_probability: 0.1,
            tournament_size: 2,
            elitism_count: 1,
            log_interval: 10,
            crossover: CrossoverKind::Order,
            mutation: MutationKind::TwoOpt,
            seed: None,
        }
    }
}

/// Builder for [`RunParameters`].
///
/// Provides a fluent interface; every field not set explicitly keeps its
/// default value.
#[derive(Clone, Debug, Default)]
pub struct RunParametersBuilder {
    parameters: RunParameters,
}

impl RunParametersBuilder {
    pub fn population_size(mut self, value: usize) -> Self {
        self.parameters.population_size = value;
        self
    }

    pub fn num_generations(mut self, value: usize) -> Self {
        self.parameters.num_generations = value;
        self
    }

    pub fn mutation_probability(mut self, value: f64) -> Self {
        self.parameters.mutation_probability = value;
        self
    }

    pub fn tournament_size(mut self, value: usize) -> Self {
        self.parameters.tournament_size = value;
        self
    }

    pub fn elitism_count(mut self, value: usize) -> Self {
        self.parameters.elitism_count = value;
        self
    }

    pub fn log_interval(mut self, value: usize) -> Self {
        self.parameters.log_interval = value;
        self
    }

    pub fn crossover(mut self, value: CrossoverKind) -> Self {
        self.parameters.crossover = value;
        self
    }

    pub fn mutation(mut self, value: MutationKind) -> Self {
        self.parameters.mutation = value;
        self
    }

    pub fn seed(mut self, value: u64) -> Self {
        self.parameters.seed = Some(value);
        self
    }

    pub fn build(self) -> RunParameters {
        self.parameters
    }
}

/// A solver configuration file: run parameters plus an optional pointer to
/// the problem instance.
///
/// The format is one `KEY = VALUE` entry per line. Recognized keys are
/// `PROBLEM_FILE`, `S_POPULATION`, `N_GENERATIONS`, `P_MUTATION`,
/// `S_TOURNAMENT`, `S_ELITISM`, `LOG_INTERVAL`, `T_MUTATION` and
/// `T_CROSSOVER`; lines without `=` and unknown keys are ignored.
#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// Path to the problem instance file, when the configuration names one.
    pub problem_file: Option<PathBuf>,
    /// The merged run parameters (defaults overridden by the file).
    pub parameters: RunParameters,
}

impl SolverConfig {
    /// Loads a configuration file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::parse(BufReader::new(file))
    }

    /// Parses a configuration from any reader. See [`SolverConfig::load`].
    pub fn parse<R: Read>(reader: R) -> Result<Self> {
        let mut problem_file = None;
        let mut parameters = RunParameters::default();

        for line in BufReader::new(reader).lines() {
            let line = line?;
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "PROBLEM_FILE" => problem_file = Some(PathBuf::from(value)),
                "S_POPULATION" => {
                    parameters.population_size = parse_field(value, "S_POPULATION")?;
                }
                "N_GENERATIONS" => {
                    parameters.num_generations = parse_field(value, "N_GENERATIONS")?;
                }
                "P_MUTATION" => {
                    parameters.mutation_probability = parse_field(value, "P_MUTATION")?;
                }
                "S_TOURNAMENT" => {
                    parameters.tournament_size = parse_field(value, "S_TOURNAMENT")?;
                }
                "S_ELITISM" => {
                    parameters.elitism_count = parse_field(value, "S_ELITISM")?;
                }
                "LOG_INTERVAL" => {
                    parameters.log_interval = parse_field(value, "LOG_INTERVAL")?;
                }
                "T_MUTATION" => parameters.mutation = value.parse()?,
                "T_CROSSOVER" => parameters.crossover = value.parse()?,
                _ => {}
            }
        }

        if parameters.elitism_count > parameters.population_size {
            return Err(TspError::Configuration(format!(
                "elitism count {} exceeds population size {}",
                parameters.elitism_count, parameters.population_size
            )));
        }

        Ok(Self {
            problem_file,
            parameters,
        })
    }
}

fn parse_field<T>(value: &str, key: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| {
        TspError::Configuration(format!("invalid value for {}: {}", key, e))
    })
}
