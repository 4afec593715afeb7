//! Cycle crossover.

use crate::individual::{is_permutation, Genome};

const UNSET: usize = usize::MAX;

/// Cycle crossover. Deterministic: the two children are fully determined by
/// the parents.
///
/// The position set is partitioned into cycles by following the mapping from
/// the first parent to the second, and the children alternate which parent
/// supplies each cycle. A cycle of length one does not flip the alternation:
/// both parents agree on that position, and the original solver treated such
/// cycles as transparent when alternating, so later cycles keep the parity
/// they would have had without it. That observed behavior is preserved here.
pub fn cycle(parent1: &[usize], parent2: &[usize]) -> (Genome, Genome) {
    debug_assert_eq!(parent1.len(), parent2.len());

    let n = parent1.len();
    let mut child1: Genome = vec![UNSET; n];
    let mut child2: Genome = vec![UNSET; n];

    let cycles = cycle_decomposition(parent1, parent2);

    let mut transparent = 0;
    for (i, positions) in cycles.iter().enumerate() {
        if positions.len() == 1 {
            transparent += 1;
        }
        let from_first_parent = (i + transparent) % 2 == 0;
        for &position in positions {
            if from_first_parent {
                child1[position] = parent1[position];
                child2[position] = parent2[position];
            } else {
                child1[position] = parent2[position];
                child2[position] = parent1[position];
            }
        }
    }

    debug_assert!(is_permutation(&child1));
    debug_assert!(is_permutation(&child2));
    (child1, child2)
}

/// Partitions the position set `[0, n)` into the disjoint cycles induced by
/// the two parents.
///
/// Starting from the lowest position not yet covered, the walk repeatedly
/// looks up where the second parent's value at the current position occurs
/// in the first parent, until it returns to the start. Each returned vector
/// lists the positions of one cycle in discovery order.
pub fn cycle_decomposition(parent1: &[usize], parent2: &[usize]) -> Vec<Vec<usize>> {
    let n = parent1.len();

    let mut position_in_parent1 = vec![0usize; n];
    for (position, &city) in parent1.iter().enumerate() {
        position_in_parent1[city] = position;
    }

    let mut covered = vec![false; n];
    let mut cycles: Vec<Vec<usize>> = Vec::new();

    for start in 0..n {
        if covered[start] {
            continue;
        }

        let mut positions = Vec::new();
        let mut index = start;
        loop {
            index = position_in_parent1[parent2[index]];
            covered[index] = true;
            positions.push(index);
            if index == start {
                break;
            }
        }
        cycles.push(positions);
    }

    cycles
}
