//! # Crossover Operators
//!
//! The four recombination operators the solver supports. Each takes two
//! parent genomes of the same length (both permutations of `[0, n)`) and
//! produces one or two child genomes, each itself a valid permutation.
//!
//! ## Example
//!
//! ```rust
//! use tsp_evolve::crossover::CrossoverKind;
//! use tsp_evolve::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(1);
//! let parent1 = vec![0, 1, 2, 3, 4];
//! let parent2 = vec![4, 3, 2, 1, 0];
//!
//! let offspring = CrossoverKind::Order.apply(&parent1, &parent2, &mut rng);
//! for child in offspring {
//!     assert_eq!(child.len(), 5);
//! }
//! ```

pub mod cycle;
pub mod edge;
pub mod order;
pub mod pmx;

use std::fmt;
use std::str::FromStr;

use crate::error::TspError;
use crate::individual::Genome;
use crate::rng::RandomNumberGenerator;

pub use cycle::{cycle, cycle_decomposition};
pub use edge::edge_recombination;
pub use order::{order, order_with_cut_points};
pub use pmx::{pmx, pmx_with_cut_points};

/// The crossover operator selected for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossoverKind {
    /// Partially matched crossover.
    PartiallyMatched,
    /// Edge recombination crossover.
    EdgeRecombination,
    /// Order crossover.
    Order,
    /// Cycle crossover. Produces two children per application.
    Cycle,
}

impl CrossoverKind {
    /// Applies the operator to a pair of parent genomes.
    pub fn apply(
        &self,
        parent1: &[usize],
        parent2: &[usize],
        rng: &mut RandomNumberGenerator,
    ) -> Offspring {
        match self {
            Self::PartiallyMatched => Offspring::Single(pmx(parent1, parent2, rng)),
            Self::EdgeRecombination => {
                Offspring::Single(edge_recombination(parent1, parent2, rng))
            }
            Self::Order => Offspring::Single(order(parent1, parent2, rng)),
            Self::Cycle => {
                let (first, second) = cycle(parent1, parent2);
                Offspring::Pair(first, second)
            }
        }
    }
}

impl fmt::Display for CrossoverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::PartiallyMatched => "PMX",
            Self::EdgeRecombination => "ERX",
            Self::Order => "OX",
            Self::Cycle => "CX",
        };
        write!(f, "{}", token)
    }
}

impl FromStr for CrossoverKind {
    type Err = TspError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PMX" => Ok(Self::PartiallyMatched),
            "ERX" => Ok(Self::EdgeRecombination),
            "OX" => Ok(Self::Order),
            "CX" => Ok(Self::Cycle),
            other => Err(TspError::Configuration(format!(
                "unknown crossover operator: {:?}",
                other
            ))),
        }
    }
}

/// The children produced by one crossover application.
#[derive(Clone, Debug, PartialEq)]
pub enum Offspring {
    Single(Genome),
    Pair(Genome, Genome),
}

impl IntoIterator for Offspring {
    type Item = Genome;
    type IntoIter = std::vec::IntoIter<Genome>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Self::Single(child) => vec![child],
            Self::Pair(first, second) => vec![first, second],
        }
        .into_iter()
    }
}

/// Draws two cut points uniformly over `[0, n)` and returns them ordered.
pub(crate) fn draw_cut_points(n: usize, rng: &mut RandomNumberGenerator) -> (usize, usize) {
    let first = rng.gen_index(n);
    let second = rng.gen_index(n);
    if first <= second {
        (first, second)
    } else {
        (second, first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_display() {
        for kind in [
            CrossoverKind::PartiallyMatched,
            CrossoverKind::EdgeRecombination,
            CrossoverKind::Order,
            CrossoverKind::Cycle,
        ] {
            let token = kind.to_string();
            assert_eq!(token.parse::<CrossoverKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected()  {
        assert!("TPX".parse::<CrossoverKind>().is_err());
    }

    #[test]
    fn test_cycle_kind_produces_two_children() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let offspring =
            CrossoverKind::Cycle.apply(&[0, 1, 2, 3], &[1, 0, 3, 2], &mut rng);
        assert!(matches!(offspring, Offspring::Pair(_, _)));
        assert_eq!(offspring.into_iter().count(), 2);
    }

    #[test]
    fn test_draw_cut_points_are_ordered() {
        let mut rng = RandomNumberGenerator::from_seed(9);
        for _ in 0..100 {
            let (a, b) = draw_cut_points(13, &mut rng);
            assert!(a <= b);
            assert!(b < 13);
        }
    }
}
