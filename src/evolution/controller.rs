//! # Generation Controller
//!
//! Drives the evolution loop on a dedicated background worker thread and
//! owns its run/pause/abort protocol.
//!
//! The worker executes every generation sequentially: offspring creation
//! through tournament-selected parents and the configured crossover and
//! mutation operators, offspring evaluation, merging with the parents,
//! elitist carry-over, and tournament refill of the next generation. At
//! generation 0 and every logging interval it publishes an owned progress
//! snapshot; consumers never see the worker's live buffers.
//!
//! Pausing blocks the worker on a condition variable between generations;
//! aborting sets a flag the worker observes at the next generation boundary
//! (or immediately while paused) and the aborting caller joins the worker
//! before regaining control. The distance matrix and parameter snapshot are
//! captured at start and stay immutable for the whole run.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tsp_evolve::distance::DistanceMatrix;
//! use tsp_evolve::evolution::{EvolutionEngine, RunParameters};
//! use tsp_evolve::instance::CityPosition;
//!
//! fn main() -> tsp_evolve::Result<()> {
//!     let cities = vec![
//!         CityPosition { x: 0.0, y: 0.0 },
//!         CityPosition { x: 0.0, y: 1.0 },
//!         CityPosition { x: 1.0, y: 1.0 },
//!         CityPosition { x: 1.0, y: 0.0 },
//!     ];
//!     let matrix = DistanceMatrix::from_cities(&cities);
//!     let parameters = RunParameters::builder().num_generations(100).build();
//!
//!     let mut handle = EvolutionEngine::new(matrix, parameters).start()?;
//!     let report = handle.join()?;
//!     println!("best tour cost: {:?}", report.best().map(|b| b.cost));
//!     Ok(())
//! }
//! ```

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, info};

use crate::distance::DistanceMatrix;
use crate::error::{Result, TspError};
use crate::evolution::options::RunParameters;
use crate::evolution::report::{RunOutcome, RunReport};
use crate::evolution::statistics::{CostSummary, RunStatistics};
use crate::individual::Individual;
use crate::rng::RandomNumberGenerator;
use crate::selection::{sort_by_cost, survive, tournament};

/// A progress snapshot pushed to the consumer. Every snapshot is an owned
/// copy; the worker's state cannot be observed mid-update.
#[derive(Clone, Debug)]
pub enum Progress {
    /// Published at generation 0 and every logging interval.
    Generation {
        /// Best individual seen at any sampled generation so far. Empty at
        /// generation 0, before any generation has been sampled.
        best: Option<Individual>,
        generation: usize,
        min: f64,
        avg: f64,
        max: f64,
    },
    /// Published exactly once, when the generation budget is reached.
    Finished { best: Option<Individual> },
}

/// Configures and launches evolution runs.
#[derive(Clone, Debug)]
pub struct EvolutionEngine {
    matrix: DistanceMatrix,
    parameters: RunParameters,
}

impl EvolutionEngine {
    /// Creates an engine for the given distance model and parameter
    /// snapshot.
    pub fn new(matrix: DistanceMatrix, parameters: RunParameters) -> Self {
        Self { matrix, parameters }
    }

    /// Validates the configuration and spawns the background worker.
    ///
    /// # Errors
    ///
    /// Returns a [`TspError::Configuration`] — before any thread is spawned
    /// and without creating any run state — when the elitism count exceeds
    /// the population size, the mutation probability is out of range, or
    /// the problem dimension is too small for the selected operators.
    pub fn start(self) -> Result<RunHandle> {
        self.parameters.validate(self.matrix.dimension())?;

        let shared = Arc::new(SharedState::new());
        let (progress_sender, progress_receiver) = mpsc::channel();

        let worker_shared = Arc::clone(&shared);
        let worker = Worker::new(self.matrix, self.parameters, worker_shared, progress_sender);

        let join_handle = thread::Builder::new()
            .name("tsp-evolution".to_string())
            .spawn(move || worker.run())
            .map_err(|e| TspError::Worker(format!("failed to spawn worker thread: {}", e)))?;

        Ok(RunHandle {
            shared,
            progress: progress_receiver,
            worker: Some(join_handle),
            report: None,
        })
    }
}

/// Handle to a running evolution. Dropping the handle aborts the run and
/// waits for the worker to stop.
#[derive(Debug)]
pub struct RunHandle {
    shared: Arc<SharedState>,
    progress: Receiver<Progress>,
    worker: Option<JoinHandle<RunReport>>,
    report: Option<RunReport>,
}

impl RunHandle {
    /// Toggles between `Running` and `Paused`.
    ///
    /// Pausing takes effect at the next generation boundary; resuming wakes
    /// the worker immediately and it continues exactly where it left off.
    pub fn toggle_pause(&self) {
        let mut control = lock(&self.shared.control);
        if control.paused {
            control.paused = false;
            self.shared.resume.notify_all();
            debug!("evolution resumed");
        } else {
            control.paused = true;
            debug!("evolution pause requested");
        }
    }

    /// Requests an abort and blocks until the worker has fully stopped. No
    /// progress is published and no state is mutated after this returns.
    ///
    /// Safe to call at any point of the run, including while paused or
    /// after the run already finished; once the worker has stopped the
    /// call is a no-op returning the same report again.
    pub fn abort(&mut self) -> Result<RunReport> {
        if self.report.is_none() {
            self.request_abort();
        }
        self.resolve()
    }

    /// Blocks until the run reaches its generation budget and returns its
    /// report.
    ///
    /// A paused run never reaches the budget; resume it before joining.
    pub fn join(&mut self) -> Result<RunReport> {
        self.resolve()
    }

    /// Whether the worker thread is still alive.
    pub fn is_active(&self) -> bool {
        self.worker
            .as_ref()
            .map(|worker| !worker.is_finished())
            .unwrap_or(false)
    }

    /// A copy of the best individual published so far, if any generation
    /// has been sampled. Reads a snapshot cell guarded separately from the
    /// pause/abort state, so this never delays the worker by more than the
    /// copy time of one tour.
    pub fn best_so_far(&self) -> Option<Individual> {
        lock(&self.shared.best).clone()
    }

    /// The progress feed. Delivery is best-effort: the worker never blocks
    /// on a slow or dropped consumer.
    pub fn progress(&self) -> &Receiver<Progress> {
        &self.progress
    }

    fn request_abort(&self) {
        let mut control = lock(&self.shared.control);
        control.abort = true;
        self.shared.resume.notify_all();
        debug!("evolution abort requested");
    }

    /// Joins the worker on first use and caches its report for later calls.
    fn resolve(&mut self) -> Result<RunReport> {
        if let Some(report) = &self.report {
            return Ok(report.clone());
        }

        let worker = self
            .worker
            .take()
            .ok_or_else(|| TspError::Worker("worker thread panicked".to_string()))?;
        let report = worker
            .join()
            .map_err(|_| TspError::Worker("worker thread panicked".to_string()))?;
        self.report = Some(report.clone());
        Ok(report)
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.request_abort();
            let _ = self.resolve();
        }
    }
}

#[derive(Debug, Default)]
struct ControlState {
    paused: bool,
    abort: bool,
}

/// State shared between the handle and the worker. The best-tour cell is
/// guarded by its own mutex so progress reads never contend with the
/// pause/abort protocol.
#[derive(Debug)]
struct SharedState {
    control: Mutex<ControlState>,
    resume: Condvar,
    best: Mutex<Option<Individual>>,
}

impl SharedState {
    fn new() -> Self {
        Self {
            control: Mutex::new(ControlState::default()),
            resume: Condvar::new(),
            best: Mutex::new(None),
        }
    }
}

/// Recovers the guard from a poisoned mutex; the protected state is only
/// ever written under short, panic-free critical sections.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The background computation: owns the population stores, the RNG and the
/// statistics for one run.
struct Worker {
    matrix: DistanceMatrix,
    parameters: RunParameters,
    rng: RandomNumberGenerator,
    shared: Arc<SharedState>,
    progress: Sender<Progress>,
    parents: Vec<Individual>,
    children: Vec<Individual>,
    generation: usize,
    statistics: RunStatistics,
    started: Option<Instant>,
}

impl Worker {
    fn new(
        matrix: DistanceMatrix,
        parameters: RunParameters,
        shared: Arc<SharedState>,
        progress: Sender<Progress>,
    ) -> Self {
        let rng = match parameters.get_seed() {
            Some(seed) => RandomNumberGenerator::from_seed(seed),
            None => RandomNumberGenerator::new(),
        };

        Self {
            matrix,
            parameters,
            rng,
            shared,
            progress,
            parents: Vec::new(),
            children: Vec::new(),
            generation: 0,
            statistics: RunStatistics::new(),
            started: None,
        }
    }

    fn run(mut self) -> RunReport {
        info!(
            dimension = self.matrix.dimension(),
            population_size = self.parameters.get_population_size(),
            num_generations = self.parameters.get_num_generations(),
            crossover = %self.parameters.get_crossover(),
            mutation = %self.parameters.get_mutation(),
            "evolution run started"
        );

        self.initialise_population();

        while self.generation < self.parameters.get_num_generations() {
            self.step();

            if self.generation % self.parameters.get_log_interval() == 0 {
                self.statistics
                    .record_generation(self.generation, &self.parents);
                if let Some(current) = self.statistics.current() {
                    debug!(
                        generation = self.generation,
                        min = current.min,
                        avg = current.avg,
                        max = current.max,
                        "generation sampled"
                    );
                    self.publish(self.generation, &current);
                }
            }

            if self.pause_point_observed_abort() {
                self.finalise_elapsed();
                info!(generation = self.generation, "evolution run aborted");
                return self.into_report(RunOutcome::Aborted);
            }
        }

        self.finalise_elapsed();
        let best = self.statistics.best().cloned();
        *lock(&self.shared.best) = best.clone();
        let _ = self.progress.send(Progress::Finished { best });
        info!(generation = self.generation, "evolution run finished");
        self.into_report(RunOutcome::Finished)
    }

    /// Builds and evaluates the initial population, records its statistics
    /// and publishes the generation-0 snapshot.
    fn initialise_population(&mut self) {
        let size = self.parameters.get_population_size();
        let dimension = self.matrix.dimension();

        self.parents = Vec::with_capacity(size + 1);
        for _ in 0..size {
            let mut individual = Individual::random(dimension, &mut self.rng);
            individual.evaluate(&self.matrix);
            self.statistics.note_evaluation();
            self.parents.push(individual);
        }

        self.statistics.record_initial(&self.parents);
        if let Some(initial) = self.statistics.initial() {
            self.publish(0, &initial);
        }
    }

    /// One evolutionary step: offspring creation, evaluation, merge,
    /// elitism and survival.
    fn step(&mut self) {
        if self.generation == 0 {
            self.started = Some(Instant::now());
        }

        let size = self.parameters.get_population_size();
        let tournament_size = self.parameters.get_tournament_size();

        // Offspring set. With cycle crossover and an odd population size
        // the final application appends one child over the target; the
        // overshoot is carried through the merge.
        self.children.clear();
        while self.children.len() < size {
            let first = tournament(&self.parents, tournament_size, &mut self.rng);
            let second = tournament(&self.parents, tournament_size, &mut self.rng);

            let offspring = self.parameters.get_crossover().apply(
                &self.parents[first].genome,
                &self.parents[second].genome,
                &mut self.rng,
            );
            self.statistics.note_crossover();

            for genome in offspring {
                let mut child = Individual::from_genome(genome);
                self.maybe_mutate(&mut child);
                self.children.push(child);
            }
        }

        for child in &mut self.children {
            child.evaluate(&self.matrix);
            self.statistics.note_evaluation();
        }

        // Merge parents and offspring, carry the elite over unchanged, and
        // refill the rest through tournaments over the merged pool.
        let mut pool = std::mem::take(&mut self.parents);
        pool.append(&mut self.children);
        sort_by_cost(&mut pool);

        self.parents
            .extend_from_slice(&pool[..self.parameters.get_elitism_count()]);
        survive(
            &mut self.parents,
            &pool,
            size,
            tournament_size,
            &mut self.rng,
        );

        self.generation += 1;
    }

    /// Draws the mutation gate for one freshly created child and applies
    /// the configured operator when it passes.
    fn maybe_mutate(&mut self, individual: &mut Individual) {
        if self.rng.gen_probability() < self.parameters.get_mutation_probability() {
            self.parameters
                .get_mutation()
                .apply(&mut individual.genome, &mut self.rng);
            self.statistics.note_mutation();
        }
    }

    /// Publishes an owned snapshot unless an abort raced the publish. The
    /// best-tour cell is refreshed under its own lock while the control
    /// lock is held, so a snapshot is never observed half-written.
    fn publish(&self, generation: usize, summary: &CostSummary) {
        let control = lock(&self.shared.control);
        if control.abort {
            return;
        }

        let best = self.statistics.best().cloned();
        *lock(&self.shared.best) = best.clone();
        let _ = self.progress.send(Progress::Generation {
            best,
            generation,
            min: summary.min,
            avg: summary.avg,
            max: summary.max,
        });
    }

    /// Blocks while paused; returns whether an abort was observed. Called
    /// once per generation boundary.
    fn pause_point_observed_abort(&self) -> bool {
        let mut control = lock(&self.shared.control);
        while control.paused && !control.abort {
            control = self
                .shared
                .resume
                .wait(control)
                .unwrap_or_else(PoisonError::into_inner);
        }
        control.abort
    }

    fn finalise_elapsed(&mut self) {
        if let Some(started) = self.started {
            self.statistics.set_elapsed(started.elapsed());
        }
    }

    fn into_report(self, outcome: RunOutcome) -> RunReport {
        RunReport {
            outcome,
            generations_completed: self.generation,
            parameters: self.parameters,
            statistics: self.statistics,
        }
    }
}
