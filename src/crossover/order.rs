//! Order crossover.

use crate::individual::{is_permutation, Genome};
use crate::rng::RandomNumberGenerator;

use super::draw_cut_points;

const UNSET: usize = usize::MAX;

/// Order crossover with random cut points.
///
/// The child keeps a random slice of the first parent in place; the
/// remaining positions are filled with the second parent's cities in the
/// order they appear when scanning from just past the slice, wrapping
/// around, so relative order from the second parent is preserved.
pub fn order(parent1: &[usize], parent2: &[usize], rng: &mut RandomNumberGenerator) -> Genome {
    let (cut1, cut2) = draw_cut_points(parent1.len(), rng);
    order_with_cut_points(parent1, parent2, cut1, cut2)
}

/// Order crossover with explicit cut points `cut1 <= cut2`.
pub fn order_with_cut_points(
    parent1: &[usize],
    parent2: &[usize],
    cut1: usize,
    cut2: usize,
) -> Genome {
    debug_assert_eq!(parent1.len(), parent2.len());
    debug_assert!(cut1 <= cut2 && cut2 < parent1.len());

    let n = parent1.len();
    let mut child: Genome = vec![UNSET; n];
    let mut used = vec![false; n];

    for i in cut1..=cut2 {
        child[i] = parent1[i];
        used[parent1[i]] = true;
    }

    // Scan the second parent starting just past the slice, wrapping, and
    // append every city not already placed.
    let mut placed = cut2 - cut1 + 1;
    let mut child_index = (cut2 + 1) % n;
    let mut parent_index = (cut2 + 1) % n;
    while placed < n {
        let city = parent2[parent_index];
        if !used[city] {
            child[child_index] = city;
            used[city] = true;
            child_index = (child_index + 1) % n;
            placed += 1;
        }
        parent_index = (parent_index + 1) % n;
    }

    debug_assert!(is_permutation(&child));
    child
}
