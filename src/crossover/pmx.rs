//! Partially matched crossover.

use crate::individual::{is_permutation, Genome};
use crate::rng::RandomNumberGenerator;

use super::draw_cut_points;

const UNSET: usize = usize::MAX;

/// Partially matched crossover with random cut points.
///
/// Copies a random slice of the first parent verbatim and transplants the
/// rest of the second parent through the transcription mapping induced by
/// that slice, so the child inherits absolute city positions from both
/// parents while remaining a permutation.
pub fn pmx(parent1: &[usize], parent2: &[usize], rng: &mut RandomNumberGenerator) -> Genome {
    let (cut1, cut2) = draw_cut_points(parent1.len(), rng);
    pmx_with_cut_points(parent1, parent2, cut1, cut2)
}

/// Partially matched crossover with explicit cut points `cut1 <= cut2`.
pub fn pmx_with_cut_points(
    parent1: &[usize],
    parent2: &[usize],
    cut1: usize,
    cut2: usize,
) -> Genome {
    debug_assert_eq!(parent1.len(), parent2.len());
    debug_assert!(cut1 <= cut2 && cut2 < parent1.len());

    let n = parent1.len();
    let mut child: Genome = vec![UNSET; n];
    child[cut1..=cut2].copy_from_slice(&parent1[cut1..=cut2]);

    // Build the transcription mapping on a working copy of the second
    // parent: every value copied from parent1 is swapped with its other
    // occurrence, and both disturbed positions are recorded.
    let mut template: Genome = parent2.to_vec();
    let mut disturbed: Vec<usize> = Vec::new();
    for i in cut1..=cut2 {
        if let Some(j) = template.iter().position(|&city| city == child[i]) {
            template.swap(i, j);
            disturbed.push(i);
            disturbed.push(j);
        }
    }

    // Mapped values land at the disturbed positions outside the slice.
    for &position in &disturbed {
        if position < cut1 || position > cut2 {
            child[position] = template[position];
        }
    }

    // Whatever is still empty comes straight from the second parent.
    for i in (cut2 + 1)..n {
        if child[i] == UNSET {
            child[i] = parent2[i];
        }
    }
    for i in 0..cut1 {
        if child[i] == UNSET {
            child[i] = parent2[i];
        }
    }

    debug_assert!(is_permutation(&child));
    child
}
