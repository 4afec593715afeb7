//! # Individual
//!
//! One candidate tour: a permutation of city indices plus its cached tour
//! cost. The genome is a permutation of `[0, dimension)` for the whole life
//! of the individual; every genetic operator preserves that invariant.

use crate::distance::DistanceMatrix;
use crate::rng::RandomNumberGenerator;

/// A candidate tour genome: a permutation of city indices.
pub type Genome = Vec<usize>;

/// A candidate tour plus its cached cost.
///
/// `cost` is only meaningful after [`Individual::evaluate`] has run against
/// the distance matrix, and becomes stale whenever the genome is mutated.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual {
    /// The tour as an ordered list of city indices.
    pub genome: Genome,
    /// Total length of the closed tour; valid only after evaluation.
    pub cost: f64,
}

impl Individual {
    /// Wraps a genome produced by a crossover operator. The cost is unset
    /// until the individual is evaluated.
    pub fn from_genome(genome: Genome) -> Self {
        Self { genome, cost: 0.0 }
    }

    /// Creates an individual with a uniformly random tour over
    /// `[0, dimension)`.
    pub fn random(dimension: usize, rng: &mut RandomNumberGenerator) -> Self {
        let mut genome: Genome = (0..dimension).collect();
        rng.shuffle(&mut genome);
        Self { genome, cost: 0.0 }
    }

    /// Recomputes the cached tour cost from the distance matrix.
    pub fn evaluate(&mut self, matrix: &DistanceMatrix) {
        self.cost = matrix.tour_length(&self.genome);
    }
}

/// Checks that a genome visits every city in `[0, n)` exactly once.
///
/// Used by operator debug assertions and by the test suites.
pub fn is_permutation(genome: &[usize]) -> bool {
    let n = genome.len();
    let mut seen = vec![false; n];
    for &city in genome {
        if city >= n || seen[city] {
            return false;
        }
        seen[city] = true;
    }
    true
}
