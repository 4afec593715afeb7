//! Property tests for the genetic operators: every crossover child and
//! every mutated genome must remain a permutation of `[0, n)`, for all
//! random inputs and dimensions.

use proptest::prelude::*;

use tsp_evolve::crossover::{self, CrossoverKind};
use tsp_evolve::individual::{is_permutation, Genome};
use tsp_evolve::mutation::MutationKind;
use tsp_evolve::rng::RandomNumberGenerator;

const ALL_CROSSOVERS: [CrossoverKind; 4] = [
    CrossoverKind::PartiallyMatched,
    CrossoverKind::EdgeRecombination,
    CrossoverKind::Order,
    CrossoverKind::Cycle,
];

const ALL_MUTATIONS: [MutationKind; 4] = [
    MutationKind::Swap,
    MutationKind::TwoOpt,
    MutationKind::ThreeOpt,
    MutationKind::Inversion,
];

fn permutation_pair(dimension: usize, seed: u64) -> (Genome, Genome) {
    let mut rng = RandomNumberGenerator::from_seed(seed);
    let mut parent1: Genome = (0..dimension).collect();
    let mut parent2: Genome = (0..dimension).collect();
    rng.shuffle(&mut parent1);
    rng.shuffle(&mut parent2);
    (parent1, parent2)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn crossover_children_are_permutations(
        dimension in 4usize..40,
        seed in any::<u64>(),
    ) {
        let (parent1, parent2) = permutation_pair(dimension, seed);
        let mut rng = RandomNumberGenerator::from_seed(seed.wrapping_add(1));

        for kind in ALL_CROSSOVERS {
            for child in kind.apply(&parent1, &parent2, &mut rng) {
                prop_assert_eq!(child.len(), dimension);
                prop_assert!(
                    is_permutation(&child),
                    "{} produced a non-permutation: {:?}",
                    kind,
                    child
                );
            }
        }
    }

    #[test]
    fn mutations_preserve_the_permutation(
        dimension in 4usize..40,
        seed in any::<u64>(),
    ) {
        let (genome, _) = permutation_pair(dimension, seed);
        let mut rng = RandomNumberGenerator::from_seed(seed.wrapping_add(2));

        for kind in ALL_MUTATIONS {
            let mut mutated = genome.clone();
            kind.apply(&mut mutated, &mut rng);

            prop_assert_eq!(mutated.len(), dimension);
            prop_assert!(
                is_permutation(&mutated),
                "{} produced a non-permutation: {:?}",
                kind,
                mutated
            );
        }
    }

    #[test]
    fn repeated_mutation_never_corrupts_a_genome(
        dimension in 4usize..20,
        seed in any::<u64>(),
    ) {
        let (mut genome, _) = permutation_pair(dimension, seed);
        let mut rng = RandomNumberGenerator::from_seed(seed.wrapping_add(3));

        for round in 0..50usize {
            let kind = ALL_MUTATIONS[round % ALL_MUTATIONS.len()];
            kind.apply(&mut genome, &mut rng);
            prop_assert!(is_permutation(&genome));
        }
    }
}

#[test]
fn pmx_with_fixed_cut_points_matches_the_reference_scenario() {
    let parent1 = vec![0, 1, 2, 3, 4];
    let parent2 = vec![4, 3, 2, 1, 0];

    let child = crossover::pmx_with_cut_points(&parent1, &parent2, 1, 3);

    assert!(is_permutation(&child));
    assert_eq!(&child[1..=3], &[1, 2, 3]);
}

#[test]
fn cycle_crossover_swaps_exactly_the_two_cycles() {
    let parent1 = vec![0, 1, 2, 3];
    let parent2 = vec![1, 0, 3, 2];

    let cycles = crossover::cycle_decomposition(&parent1, &parent2);
    let mut sorted: Vec<Vec<usize>> = cycles
        .into_iter()
        .map(|mut positions| {
            positions.sort_unstable();
            positions
        })
        .collect();
    sorted.sort();
    assert_eq!(sorted, vec![vec![0, 1], vec![2, 3]]);

    let (child1, child2) = crossover::cycle(&parent1, &parent2);
    assert_eq!(child1, vec![0, 1, 3, 2]);
    assert_eq!(child2, vec![1, 0, 2, 3]);
}

#[test]
fn identical_seeds_reproduce_identical_offspring() {
    let (parent1, parent2) = permutation_pair(16, 99);

    for kind in ALL_CROSSOVERS {
        let mut rng1 = RandomNumberGenerator::from_seed(1234);
        let mut rng2 = RandomNumberGenerator::from_seed(1234);

        let first: Vec<Genome> = kind.apply(&parent1, &parent2, &mut rng1).into_iter().collect();
        let second: Vec<Genome> = kind.apply(&parent1, &parent2, &mut rng2).into_iter().collect();
        assert_eq!(first, second, "{} is not seed-deterministic", kind);
    }
}
