//! # Selection
//!
//! Tournament selection over a population, plus the survival procedure that
//! refills the next generation from the merged parent/offspring pool.

use std::cmp::Ordering;

use crate::individual::Individual;
use crate::rng::RandomNumberGenerator;

/// Runs one tournament and returns the index of the winner.
///
/// `tournament_size` individuals are sampled independently and uniformly at
/// random **with replacement**, and the one with the lowest cost wins; ties
/// keep the first one found. Sampling with replacement keeps the draw
/// well-defined even when `tournament_size` exceeds the population size.
///
/// The population must be non-empty and `tournament_size` at least 1; the
/// run parameters enforce both before a run starts.
pub fn tournament(
    population: &[Individual],
    tournament_size: usize,
    rng: &mut RandomNumberGenerator,
) -> usize {
    debug_assert!(!population.is_empty());
    debug_assert!(tournament_size >= 1);

    let mut winner = 0;
    let mut winner_cost = f64::INFINITY;

    for _ in 0..tournament_size {
        let index = rng.gen_index(population.len());
        if population[index].cost < winner_cost {
            winner_cost = population[index].cost;
            winner = index;
        }
    }

    winner
}

/// Extends `next_generation` to `population_size` individuals by repeated
/// tournaments over `pool`.
///
/// Winners are cloned, not removed, so an individual may survive more than
/// once. Called with the elite already in place.
pub fn survive(
    next_generation: &mut Vec<Individual>,
    pool: &[Individual],
    population_size: usize,
    tournament_size: usize,
    rng: &mut RandomNumberGenerator,
) {
    while next_generation.len() < population_size {
        let champion = tournament(pool, tournament_size, rng);
        next_generation.push(pool[champion].clone());
    }
}

/// Sorts a population by ascending cost. NaN costs sort last; they cannot
/// arise from a finite distance matrix but must not break the ordering.
pub fn sort_by_cost(population: &mut [Individual]) {
    population.sort_by(|a, b| {
        a.cost.partial_cmp(&b.cost).unwrap_or_else(|| {
            match (a.cost.is_nan(), b.cost.is_nan()) {
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                _ => Ordering::Equal,
            }
        })
    });
}
