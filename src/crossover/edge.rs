//! Edge recombination crossover.

use crate::individual::{is_permutation, Genome};
use crate::rng::RandomNumberGenerator;

/// Edge recombination crossover.
///
/// Builds an edge table mapping every city to the deduplicated set of
/// neighbours it has in either parent's cyclic tour, then grows the child
/// one city at a time, always preferring the neighbour whose own neighbour
/// list is shortest (ties broken uniformly at random). When the current city
/// has no remaining neighbours the walk restarts at a uniformly random
/// unplaced city.
///
/// The table is indexed by city id and shrinks only through value removal,
/// so indices stay stable for the whole construction.
pub fn edge_recombination(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut RandomNumberGenerator,
) -> Genome {
    debug_assert_eq!(parent1.len(), parent2.len());

    let n = parent1.len();
    let mut neighbours = build_edge_table(parent1, parent2);
    let mut placed = vec![false; n];
    let mut child: Genome = Vec::with_capacity(n);

    // The tour opens with the first city of a randomly chosen parent.
    let mut current = if rng.gen_bool() { parent1[0] } else { parent2[0] };
    child.push(current);
    placed[current] = true;
    remove_from_all(&mut neighbours, current);

    while child.len() < n {
        let next = if neighbours[current].is_empty() {
            // Dead end: restart at a random city not yet in the tour.
            let remaining: Vec<usize> = (0..n).filter(|&city| !placed[city]).collect();
            remaining[rng.gen_index(remaining.len())]
        } else {
            // Neighbour with the fewest remaining neighbours of its own.
            let mut candidates: Vec<usize> = Vec::new();
            let mut fewest = usize::MAX;
            for &candidate in &neighbours[current] {
                let count = neighbours[candidate].len();
                if count < fewest {
                    fewest = count;
                    candidates.clear();
                    candidates.push(candidate);
                } else if count == fewest {
                    candidates.push(candidate);
                }
            }
            candidates[rng.gen_index(candidates.len())]
        };

        remove_from_all(&mut neighbours, next);
        placed[next] = true;
        child.push(next);
        current = next;
    }

    debug_assert!(is_permutation(&child));
    child
}

/// Collects, for every city, its distinct neighbours across both parents'
/// cyclic tours.
fn build_edge_table(parent1: &[usize], parent2: &[usize]) -> Vec<Vec<usize>> {
    let n = parent1.len();
    let mut neighbours: Vec<Vec<usize>> = vec![Vec::with_capacity(4); n];

    for parent in [parent1, parent2] {
        for i in 0..n {
            let city = parent[i];
            let left = parent[(i + n - 1) % n];
            let right = parent[(i + 1) % n];
            for neighbour in [left, right] {
                if neighbour != city && !neighbours[city].contains(&neighbour) {
                    neighbours[city].push(neighbour);
                }
            }
        }
    }

    neighbours
}

fn remove_from_all(neighbours: &mut [Vec<usize>], city: usize) {
    for list in neighbours.iter_mut() {
        if let Some(position) = list.iter().position(|&c| c == city) {
            list.remove(position);
        }
    }
}
