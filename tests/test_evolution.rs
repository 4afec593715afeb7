//! Integration tests for the generation controller: lifecycle, progress
//! feed, pause/resume, abort, determinism and report export.

use std::thread;
use std::time::Duration;

use tsp_evolve::crossover::CrossoverKind;
use tsp_evolve::distance::DistanceMatrix;
use tsp_evolve::error::TspError;
use tsp_evolve::evolution::{EvolutionEngine, Progress, RunOutcome, RunParameters, RunReport};
use tsp_evolve::individual::is_permutation;
use tsp_evolve::instance::CityPosition;
use tsp_evolve::mutation::MutationKind;

/// Cities evenly spaced on a circle; the optimal tour visits them in
/// angular order.
fn ring_matrix(dimension: usize) -> DistanceMatrix {
    let cities: Vec<CityPosition> = (0..dimension)
        .map(|i| {
            let angle = (i as f64) * std::f64::consts::TAU / dimension as f64;
            CityPosition {
                x: 100.0 * angle.cos(),
                y: 100.0 * angle.sin(),
            }
        })
        .collect();
    DistanceMatrix::from_cities(&cities)
}

fn run_to_completion(parameters: RunParameters, dimension: usize) -> RunReport {
    let mut handle = EvolutionEngine::new(ring_matrix(dimension), parameters)
        .start()
        .unwrap();
    handle.join().unwrap()
}

#[test]
fn rejecting_oversized_elitism_happens_before_any_worker_exists() {
    let parameters = RunParameters::builder()
        .population_size(5)
        .elitism_count(6)
        .build();

    let result = EvolutionEngine::new(ring_matrix(8), parameters).start();
    match result {
        Err(TspError::Configuration(message)) => {
            assert!(message.contains("elitism"));
        }
        other => panic!("expected a configuration error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn completed_run_reports_a_valid_best_tour() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let parameters = RunParameters::builder()
        .population_size(20)
        .num_generations(50)
        .log_interval(10)
        .seed(7)
        .build();

    let report = run_to_completion(parameters, 10);

    assert_eq!(report.outcome, RunOutcome::Finished);
    assert_eq!(report.generations_completed, 50);

    let best = report.best().unwrap();
    assert!(is_permutation(&best.genome));
    assert_eq!(best.genome.len(), 10);
    assert!(best.cost > 0.0);

    assert!(report.statistics.crossover_count() > 0);
    assert!(report.statistics.evaluation_count() > 0);
    assert!(report.statistics.elapsed() > Duration::ZERO);
}

#[test]
fn every_operator_combination_completes() {
    for crossover in [
        CrossoverKind::PartiallyMatched,
        CrossoverKind::EdgeRecombination,
        CrossoverKind::Order,
        CrossoverKind::Cycle,
    ] {
        for mutation in [
            MutationKind::Swap,
            MutationKind::TwoOpt,
            MutationKind::ThreeOpt,
            MutationKind::Inversion,
        ] {
            let parameters = RunParameters::builder()
                .population_size(9) // odd, to exercise the CX overshoot
                .num_generations(10)
                .log_interval(5)
                .crossover(crossover)
                .mutation(mutation)
                .mutation_probability(0.5)
                .seed(11)
                .build();

            let report = run_to_completion(parameters, 8);
            assert_eq!(report.outcome, RunOutcome::Finished, "{}/{}", crossover, mutation);
            let best = report.best().unwrap();
            assert!(
                is_permutation(&best.genome),
                "{}/{} produced an invalid best tour",
                crossover,
                mutation
            );
        }
    }
}

#[test]
fn sampled_minimum_never_increases_with_elitism() {
    let parameters = RunParameters::builder()
        .population_size(16)
        .num_generations(40)
        .log_interval(1)
        .elitism_count(2)
        .seed(3)
        .build();

    let report = run_to_completion(parameters, 12);
    let samples = report.statistics.samples();
    assert_eq!(samples.len(), 41);

    // The elite carries the merged pool's best into every next generation,
    // so the per-generation minimum cannot rise.
    for window in samples.windows(2) {
        assert!(
            window[1].min <= window[0].min + 1e-9,
            "minimum rose from {} to {} at generation {}",
            window[0].min,
            window[1].min,
            window[1].generation
        );
    }

    let all_time = report.statistics.all_time().unwrap();
    assert_eq!(all_time.min, samples.last().unwrap().min);
}

#[test]
fn best_cost_in_the_progress_feed_is_monotonic() {
    let parameters = RunParameters::builder()
        .population_size(16)
        .num_generations(60)
        .log_interval(5)
        .seed(21)
        .build();

    let mut handle = EvolutionEngine::new(ring_matrix(10), parameters)
        .start()
        .unwrap();

    let mut previous_best = f64::INFINITY;
    while let Ok(progress) = handle.progress().recv() {
        if let Progress::Generation {
            best: Some(best), ..
        } = progress
        {
            assert!(best.cost <= previous_best + 1e-9);
            previous_best = best.cost;
        }
    }

    handle.join().unwrap();
}

#[test]
fn identical_seeds_produce_identical_runs() {
    let parameters = RunParameters::builder()
        .population_size(14)
        .num_generations(30)
        .log_interval(3)
        .seed(123)
        .build();

    let first = run_to_completion(parameters.clone(), 9);
    let second = run_to_completion(parameters, 9);

    assert_eq!(first.statistics.samples(), second.statistics.samples());
    assert_eq!(
        first.best().map(|b| &b.genome),
        second.best().map(|b| &b.genome)
    );
    assert_eq!(
        first.statistics.crossover_count(),
        second.statistics.crossover_count()
    );
    assert_eq!(
        first.statistics.mutation_count(),
        second.statistics.mutation_count()
    );
    assert_eq!(
        first.statistics.evaluation_count(),
        second.statistics.evaluation_count()
    );
}

#[test]
fn pausing_and_resuming_loses_nothing() {
    let parameters = RunParameters::builder()
        .population_size(14)
        .num_generations(200)
        .log_interval(10)
        .seed(55)
        .build();

    let undisturbed = run_to_completion(parameters.clone(), 10);

    let mut handle = EvolutionEngine::new(ring_matrix(10), parameters)
        .start()
        .unwrap();
    thread::sleep(Duration::from_millis(20));
    handle.toggle_pause();
    thread::sleep(Duration::from_millis(50));
    handle.toggle_pause();
    let paused = handle.join().unwrap();

    // A pause consumes no randomness and skips no generation: the traces
    // are identical.
    assert_eq!(paused.outcome, RunOutcome::Finished);
    assert_eq!(paused.generations_completed, 200);
    assert_eq!(
        undisturbed.statistics.samples(),
        paused.statistics.samples()
    );
    assert_eq!(
        undisturbed.best().map(|b| &b.genome),
        paused.best().map(|b| &b.genome)
    );
}

#[test]
fn abort_stops_promptly_and_publishes_nothing_more() {
    let parameters = RunParameters::builder()
        .population_size(30)
        .num_generations(5_000_000)
        .log_interval(10)
        .seed(17)
        .build();

    let mut handle = EvolutionEngine::new(ring_matrix(16), parameters)
        .start()
        .unwrap();
    thread::sleep(Duration::from_millis(30));

    let report = handle.abort().unwrap();

    assert_eq!(report.outcome, RunOutcome::Aborted);
    assert!(report.generations_completed < 5_000_000);
    // Elapsed time was finalized on the abort path.
    assert!(report.statistics.elapsed() > Duration::ZERO);

    // Repeating the abort after the worker has stopped is a no-op
    // returning the same report.
    let again = handle.abort().unwrap();
    assert_eq!(again.generations_completed, report.generations_completed);
}

#[test]
fn no_snapshot_arrives_after_abort_returns() {
    let parameters = RunParameters::builder()
        .population_size(30)
        .num_generations(5_000_000)
        .log_interval(1)
        .seed(19)
        .build();

    let mut handle = EvolutionEngine::new(ring_matrix(16), parameters)
        .start()
        .unwrap();
    thread::sleep(Duration::from_millis(30));

    let report = handle.abort().unwrap();
    assert_eq!(report.outcome, RunOutcome::Aborted);

    // The worker has stopped and its sender is gone: everything still
    // buffered was published before the abort was observed, and no final
    // delivery ever happened.
    let mut saw_finished = false;
    let mut latest_generation = 0;
    while let Ok(progress) = handle.progress().try_recv() {
        match progress {
            Progress::Generation { generation, .. } => {
                latest_generation = latest_generation.max(generation);
            }
            Progress::Finished { .. } => saw_finished = true,
        }
    }

    assert!(!saw_finished);
    assert!(latest_generation <= report.generations_completed);
}

#[test]
fn aborting_while_paused_wakes_the_worker() {
    let parameters = RunParameters::builder()
        .population_size(20)
        .num_generations(5_000_000)
        .log_interval(10)
        .seed(23)
        .build();

    let mut handle = EvolutionEngine::new(ring_matrix(12), parameters)
        .start()
        .unwrap();
    thread::sleep(Duration::from_millis(20));
    handle.toggle_pause();
    thread::sleep(Duration::from_millis(20));

    // The abort must not hang on the sleeping worker.
    let report = handle.abort().unwrap();
    assert_eq!(report.outcome, RunOutcome::Aborted);
}

#[test]
fn best_so_far_is_readable_while_running() {
    let parameters = RunParameters::builder()
        .population_size(20)
        .num_generations(5_000_000)
        .log_interval(1)
        .seed(29)
        .build();

    let mut handle = EvolutionEngine::new(ring_matrix(12), parameters)
        .start()
        .unwrap();

    // Wait for the first sampled generation to publish a best tour.
    let mut observed = None;
    for _ in 0..200 {
        observed = handle.best_so_far();
        if observed.is_some() {
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }

    let report = handle.abort().unwrap();

    let best = observed.expect("no best tour was ever published");
    assert!(is_permutation(&best.genome));
    assert_eq!(report.outcome, RunOutcome::Aborted);
}

#[test]
fn exported_report_from_a_real_run_has_the_full_layout() {
    let parameters = RunParameters::builder()
        .population_size(12)
        .num_generations(20)
        .log_interval(5)
        .seed(31)
        .build();

    let report = run_to_completion(parameters, 8);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.txt");
    report.export(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("***** BEST TOUR *****"));
    assert!(text.contains("***** PROGRESS SAMPLES *****"));
    // One line per sample: generations 0, 5, 10, 15, 20.
    let samples_section = text.split("***** PROGRESS SAMPLES *****").nth(1).unwrap();
    assert_eq!(samples_section.trim().lines().count(), 5);
}
