//! # Mutation Operators
//!
//! The four in-place tour mutations the solver supports. The generation
//! loop gates each application by the run's mutation probability; the
//! operators themselves mutate unconditionally.
//!
//! 2-opt and 3-opt share the same segment primitive: the cyclic stretch of
//! the tour strictly after one cut point up to and including the other is
//! reversed, rotating across the array boundary when the cut points wrap.

use std::fmt;
use std::str::FromStr;

use crate::error::TspError;
use crate::individual::Genome;
use crate::rng::RandomNumberGenerator;

/// The mutation operator selected for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutationKind {
    /// Exchange two randomly chosen cities.
    Swap,
    /// Reverse one randomly chosen tour segment.
    TwoOpt,
    /// Reverse two consecutive randomly chosen tour segments.
    ThreeOpt,
    /// Reverse a randomly chosen sub-sequence in array order.
    Inversion,
}

impl MutationKind {
    /// Applies the operator to the genome in place.
    pub fn apply(&self, genome: &mut Genome, rng: &mut RandomNumberGenerator) {
        match self {
            Self::Swap => swap(genome, rng),
            Self::TwoOpt => two_opt(genome, rng),
            Self::ThreeOpt => three_opt(genome, rng),
            Self::Inversion => inversion(genome, rng),
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::Swap => "SWAP",
            Self::TwoOpt => "OPT_2",
            Self::ThreeOpt => "OPT_3",
            Self::Inversion => "INVERSION",
        };
        write!(f, "{}", token)
    }
}

impl FromStr for MutationKind {
    type Err = TspError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "SWAP" => Ok(Self::Swap),
            "OPT_2" => Ok(Self::TwoOpt),
            "OPT_3" => Ok(Self::ThreeOpt),
            "INVERSION" => Ok(Self::Inversion),
            other => Err(TspError::Configuration(format!(
                "unknown mutation operator: {:?}",
                other
            ))),
        }
    }
}

/// Exchanges the cities at two positions drawn with replacement. The two
/// draws may coincide, in which case the exchange is a no-op.
pub fn swap(genome: &mut Genome, rng: &mut RandomNumberGenerator) {
    let first = rng.gen_index(genome.len());
    let second = rng.gen_index(genome.len());
    genome.swap(first, second);
}

/// Reverses the sub-sequence between two positions drawn with replacement,
/// taken in array order.
pub fn inversion(genome: &mut Genome, rng: &mut RandomNumberGenerator) {
    let first = rng.gen_index(genome.len());
    let second = rng.gen_index(genome.len());
    let (from, to) = if first <= second {
        (first, second)
    } else {
        (second, first)
    };
    genome[from..=to].reverse();
}

/// 2-opt move: removes the two tour edges at two distinct random cut points
/// and reconnects by reversing the enclosed path.
///
/// Requires a genome of at least two cities.
pub fn two_opt(genome: &mut Genome, rng: &mut RandomNumberGenerator) {
    assert!(genome.len() >= 2, "2-opt requires at least two cities");

    let (first, second) = loop {
        let first = rng.gen_index(genome.len());
        let second = rng.gen_index(genome.len());
        if first != second {
            break (first, second);
        }
    };

    reverse_cyclic_segment(genome, first, second);
}

/// Restricted 3-opt move: draws three cut points and applies the 2-opt-style
/// reversal to the segment between the first and second, then to the
/// segment between the second and third.
///
/// The cut points are redrawn until they satisfy the accepted orderings —
/// strictly increasing, or wrapped so that the middle point lies outside
/// the span from the third to the first. This keeps the original solver's
/// narrower acceptance set rather than generalising to arbitrary 3-opt
/// moves, which would change the mutation's statistical behavior.
///
/// Requires a genome of at least four cities; smaller instances must be
/// rejected before the run starts.
pub fn three_opt(genome: &mut Genome, rng: &mut RandomNumberGenerator) {
    assert!(genome.len() >= 4, "3-opt requires at least four cities");

    let n = genome.len();
    let (first, second, third) = loop {
        let first = rng.gen_index(n);
        let second = rng.gen_index(n);
        let third = rng.gen_index(n);
        if first < third && second > first && second < third {
            break (first, second, third);
        }
        if first > third && (second > first || second < third) {
            break (first, second, third);
        }
    };

    reverse_cyclic_segment(genome, first, second);
    reverse_cyclic_segment(genome, second, third);
}

/// Reverses the cyclic tour segment strictly after `from` up to and
/// including `to`, wrapping across the array boundary when `to` precedes
/// `from` in array order. `from == to` selects an empty segment and leaves
/// the genome untouched.
pub fn reverse_cyclic_segment(genome: &mut [usize], from: usize, to: usize) {
    let n = genome.len();
    let length = (to + n - from) % n;

    let mut reversed = Vec::with_capacity(length);
    let mut index = to;
    for _ in 0..length {
        reversed.push(genome[index]);
        index = (index + n - 1) % n;
    }

    for (offset, city) in reversed.into_iter().enumerate() {
        genome[(from + 1 + offset) % n] = city;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::is_permutation;

    #[test]
    fn test_reverse_segment_in_array_order() {
        let mut genome = vec![0, 1, 2, 3, 4, 5];
        reverse_cyclic_segment(&mut genome, 1, 4);
        assert_eq!(genome, vec![0, 1, 4, 3, 2, 5]);
    }

    #[test]
    fn test_reverse_segment_across_the_boundary() {
        let mut genome = vec![0, 1, 2, 3, 4, 5];
        // Segment strictly after position 4 through position 1, wrapping:
        // positions 5, 0, 1 hold 5, 0, 1 and come back as 1, 0, 5.
        reverse_cyclic_segment(&mut genome, 4, 1);
        assert_eq!(genome, vec![0, 5, 2, 3, 4, 1]);
    }

    #[test]
    fn test_reverse_segment_of_length_one_is_a_no_op() {
        let mut genome = vec![3, 1, 0, 2];
        reverse_cyclic_segment(&mut genome, 0, 1);
        assert_eq!(genome, vec![3, 1, 0, 2]);
    }

    #[test]
    fn test_reverse_segment_with_equal_points_is_empty() {
        let mut genome = vec![0, 1, 2, 3];
        reverse_cyclic_segment(&mut genome, 2, 2);
        assert_eq!(genome, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_swap_keeps_permutation() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let mut genome: Genome = (0..10).collect();
        for _ in 0..100 {
            swap(&mut genome, &mut rng);
            assert!(is_permutation(&genome));
        }
    }

    #[test]
    fn test_inversion_keeps_permutation() {
        let mut rng = RandomNumberGenerator::from_seed(6);
        let mut genome: Genome = (0..10).collect();
        for _ in 0..100 {
            inversion(&mut genome, &mut rng);
            assert!(is_permutation(&genome));
        }
    }

    #[test]
    fn test_two_opt_keeps_permutation() {
        let mut rng = RandomNumberGenerator::from_seed(7);
        let mut genome: Genome = (0..10).collect();
        for _ in 0..100 {
            two_opt(&mut genome, &mut rng);
            assert!(is_permutation(&genome));
        }
    }

    #[test]
    fn test_three_opt_keeps_permutation() {
        let mut rng = RandomNumberGenerator::from_seed(8);
        let mut genome: Genome = (0..10).collect();
        for _ in 0..100 {
            three_opt(&mut genome, &mut rng);
            assert!(is_permutation(&genome));
        }
    }

    #[test]
    fn test_two_opt_on_two_cities() {
        let mut rng = RandomNumberGenerator::from_seed(9);
        let mut genome = vec![0, 1];
        two_opt(&mut genome, &mut rng);
        assert!(is_permutation(&genome));
    }

    #[test]
    fn test_kind_round_trips_through_display() {
        for kind in [
            MutationKind::Swap,
            MutationKind::TwoOpt,
            MutationKind::ThreeOpt,
            MutationKind::Inversion,
        ] {
            let token = kind.to_string();
            assert_eq!(token.parse::<MutationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!("OPT_4".parse::<MutationKind>().is_err());
    }
}
