//! Colony iteration loop.
//!
//! # Algorithm
//!
//! 1. Setup: build the distance table, fill the pheromone field with
//!    `tau_0`, best length = `+∞`.
//! 2. Each iteration, every agent in turn:
//!    a. constructs a tour (roulette or GRASP),
//!    b. optionally refines it with 2-opt,
//!    c. is scored with [`Evaluator::quick_evaluate`]; a strictly shorter
//!       tour becomes the new best and is reported via
//!       [`Evaluator::evaluate`] right away.
//! 3. End of iteration: evaporate, then (batch policy) deposit `Q / length`
//!    on every edge of every agent's tour. Under the progressive policy the
//!    deposits already happened while agents walked.
//! 4. Stop when the iteration budget is spent, the wall-clock budget has
//!    elapsed, or the cancel flag is set; all three are checked between
//!    iterations only. The best tour is reported one final time.

use super::builder::{TourBuilder, Trail};
use super::config::{AcoConfig, DepositPolicy};
use crate::error::ColonyResult;
use crate::random::create_rng;
use crate::tsp::{DistanceTable, Evaluator, PheromoneField, ProblemSource, Tour, TwoOptRefiner};
use rand::rngs::StdRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopReason {
    /// `max_iterations` iterations completed.
    IterationsExhausted,
    /// The wall-clock budget elapsed. This is the expected way a
    /// best-effort run ends, not a failure.
    TimeBudgetExceeded,
    /// The cancel flag was raised.
    Cancelled,
}

/// Summary of a single iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationStats {
    /// Zero-based iteration index.
    pub iteration: usize,
    /// Shortest tour produced by this iteration's agents.
    pub iteration_best: f64,
    /// Mean tour length over this iteration's agents.
    pub mean_length: f64,
    /// Best length of the run after this iteration.
    pub best_length: f64,
    /// Whether this iteration improved the run's best.
    pub improved: bool,
}

/// Result of a colony run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AcoResult {
    /// Best tour found. Empty if the run stopped before any agent finished.
    pub best: Tour,

    /// Length of `best`, `+∞` when `best` is empty.
    pub best_length: f64,

    /// Iterations completed.
    pub iterations: usize,

    /// Number of strict improvements of the best tour.
    pub improvements: usize,

    /// Number of [`Evaluator::evaluate`] calls made, final report included.
    pub reports: usize,

    /// Why the run stopped.
    pub stop_reason: StopReason,

    /// Best length after each iteration (non-increasing).
    pub cost_history: Vec<f64>,
}

/// Ant colony optimizer for one problem instance.
///
/// Owns the distance table, the pheromone field, the tour builder and the
/// random source. Agents run one after another; under
/// [`DepositPolicy::Progressive`] agent `k` sees the trail left by agents
/// `0..k` of the same iteration.
///
/// # Examples
///
/// ```
/// use u_antcolony::aco::{AcoConfig, ColonyOptimizer};
/// use u_antcolony::tsp::{DistanceTable, RecordingEvaluator};
///
/// let square = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
/// let config = AcoConfig::default()
///     .with_num_agents(10)
///     .with_max_iterations(20)
///     .with_seed(42);
///
/// let mut colony = ColonyOptimizer::new(&square, config).unwrap();
/// let mut eval = RecordingEvaluator::new(DistanceTable::build(&square).unwrap());
/// let result = colony.run(&mut eval);
///
/// assert!((result.best_length - 4.0).abs() < 1e-9);
/// assert_eq!(eval.best_tour(), Some(result.best.as_slice()));
/// ```
pub struct ColonyOptimizer {
    config: AcoConfig,
    distances: DistanceTable,
    pheromones: PheromoneField,
    builder: TourBuilder,
    rng: StdRng,
    best: Tour,
    best_length: f64,
    iterations: usize,
    improvements: usize,
    reports: usize,
    cost_history: Vec<f64>,
}

impl ColonyOptimizer {
    /// Validates `config`, builds the distance table and initializes the
    /// pheromone field.
    ///
    /// # Errors
    ///
    /// [`ColonyError::InvalidConfig`](crate::ColonyError::InvalidConfig) or
    /// [`ColonyError::InvalidInstance`](crate::ColonyError::InvalidInstance);
    /// no iteration runs in either case.
    pub fn new<P: ProblemSource + ?Sized>(problem: &P, config: AcoConfig) -> ColonyResult<Self> {
        config.validate()?;
        let distances = DistanceTable::build(problem)?;
        let pheromones = PheromoneField::with_bounds(
            distances.len(),
            config.initial_pheromone,
            config.pheromone_floor,
            config.pheromone_cap,
        );
        let rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        log::debug!(
            "aco.setup: n={} agents={} construction={:?} deposit={:?}",
            distances.len(),
            config.num_agents,
            config.construction,
            config.deposit
        );

        Ok(Self {
            builder: TourBuilder::new(&config),
            cost_history: Vec::with_capacity(config.max_iterations),
            config,
            distances,
            pheromones,
            rng,
            best: Vec::new(),
            best_length: f64::INFINITY,
            iterations: 0,
            improvements: 0,
            reports: 0,
        })
    }

    /// Runs until a budget is spent.
    pub fn run<E: Evaluator>(&mut self, evaluator: &mut E) -> AcoResult {
        self.run_with_cancel(evaluator, None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// The flag is only checked between iterations; an iteration that has
    /// started always completes.
    pub fn run_with_cancel<E: Evaluator>(
        &mut self,
        evaluator: &mut E,
        cancel: Option<Arc<AtomicBool>>,
    ) -> AcoResult {
        let started = Instant::now();
        let budget = self.config.time_limit_ms.map(Duration::from_millis);

        let stop_reason = loop {
            if self.iterations >= self.config.max_iterations {
                break StopReason::IterationsExhausted;
            }
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    break StopReason::Cancelled;
                }
            }
            if let Some(limit) = budget {
                if started.elapsed() >= limit {
                    break StopReason::TimeBudgetExceeded;
                }
            }
            self.iterate(evaluator);
        };

        if !self.best.is_empty() {
            evaluator.evaluate(&self.best);
            self.reports += 1;
        }

        log::info!(
            "aco.run: stopped reason={:?} iterations={} best={:.4} elapsed_ms={}",
            stop_reason,
            self.iterations,
            self.best_length,
            started.elapsed().as_millis()
        );

        AcoResult {
            best: self.best.clone(),
            best_length: self.best_length,
            iterations: self.iterations,
            improvements: self.improvements,
            reports: self.reports,
            stop_reason,
            cost_history: self.cost_history.clone(),
        }
    }

    /// Runs one iteration: every agent builds (and optionally refines) a
    /// tour, then the pheromone field is updated.
    pub fn iterate<E: Evaluator>(&mut self, evaluator: &mut E) -> IterationStats {
        let previous_best = self.best_length;
        let mut lengths = Vec::with_capacity(self.config.num_agents);

        match self.config.deposit {
            DepositPolicy::Batch => {
                let tours = self.construct_batch();
                for tour in &tours {
                    let length = evaluator.quick_evaluate(tour);
                    self.record(tour, length, evaluator);
                    lengths.push(length);
                }
                self.pheromones.evaporate(self.config.evaporation_rate);
                for (tour, &length) in tours.iter().zip(&lengths) {
                    self.pheromones.deposit_tour(tour, self.config.q / length);
                }
            }
            DepositPolicy::Progressive => {
                let n = self.distances.len();
                for _ in 0..self.config.num_agents {
                    let start = self.builder.next_start(n, &mut self.rng);
                    let trail = Trail::Reinforce {
                        field: &mut self.pheromones,
                        q: self.config.q,
                    };
                    let mut tour = self
                        .builder
                        .walk(&self.distances, trail, &mut self.rng, start);
                    if self.config.local_search {
                        TwoOptRefiner.refine(&self.distances, &mut tour);
                    }
                    let length = evaluator.quick_evaluate(&tour);
                    self.pheromones.deposit_tour(&tour, self.config.q / length);
                    self.record(&tour, length, evaluator);
                    lengths.push(length);
                }
                self.pheromones.evaporate(self.config.evaporation_rate);
            }
        }

        let iteration = self.iterations;
        self.iterations += 1;
        self.cost_history.push(self.best_length);

        let stats = IterationStats {
            iteration,
            iteration_best: lengths.iter().copied().fold(f64::INFINITY, f64::min),
            mean_length: lengths.iter().sum::<f64>() / lengths.len().max(1) as f64,
            best_length: self.best_length,
            improved: self.best_length < previous_best,
        };
        log::trace!(
            "aco.iterate: iteration={} iteration_best={:.4} mean={:.4} best={:.4}",
            stats.iteration,
            stats.iteration_best,
            stats.mean_length,
            stats.best_length
        );
        stats
    }

    /// Best tour found so far (empty before the first agent finishes).
    pub fn best_tour(&self) -> &[usize] {
        &self.best
    }

    /// Length of the best tour, `+∞` before the first agent finishes.
    pub fn best_length(&self) -> f64 {
        self.best_length
    }

    /// Iterations completed so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn pheromones(&self) -> &PheromoneField {
        &self.pheromones
    }

    pub fn distances(&self) -> &DistanceTable {
        &self.distances
    }

    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    /// Keeps `tour` if it is strictly shorter than the best so far and
    /// reports it.
    fn record<E: Evaluator>(&mut self, tour: &[usize], length: f64, evaluator: &mut E) {
        if length < self.best_length {
            self.best.clear();
            self.best.extend_from_slice(tour);
            self.best_length = length;
            self.improvements += 1;
            evaluator.evaluate(&self.best);
            self.reports += 1;
            log::debug!(
                "aco.iterate: improved best iteration={} length={:.4}",
                self.iterations,
                length
            );
        }
    }

    /// Builds every agent's tour against the same, untouched pheromone field.
    fn construct_batch(&mut self) -> Vec<Tour> {
        #[cfg(feature = "parallel")]
        if self.config.parallel {
            return self.construct_batch_parallel();
        }

        let n = self.distances.len();
        let mut tours = Vec::with_capacity(self.config.num_agents);
        for _ in 0..self.config.num_agents {
            let start = self.builder.next_start(n, &mut self.rng);
            let trail = Trail::Read(&self.pheromones);
            let mut tour = self
                .builder
                .walk(&self.distances, trail, &mut self.rng, start);
            if self.config.local_search {
                TwoOptRefiner.refine(&self.distances, &mut tour);
            }
            tours.push(tour);
        }
        tours
    }

    /// Parallel variant: start cities and per-agent seeds are drawn
    /// sequentially from the master RNG, so the result only depends on the
    /// seed, not on scheduling.
    #[cfg(feature = "parallel")]
    fn construct_batch_parallel(&mut self) -> Vec<Tour> {
        let n = self.distances.len();
        let jobs: Vec<(usize, u64)> = (0..self.config.num_agents)
            .map(|_| {
                let start = self.builder.next_start(n, &mut self.rng);
                (start, self.rng.random::<u64>())
            })
            .collect();

        let builder = &self.builder;
        let distances = &self.distances;
        let pheromones = &self.pheromones;
        let local_search = self.config.local_search;

        jobs.into_par_iter()
            .map(|(start, seed)| {
                let mut rng = create_rng(seed);
                let mut tour = builder.walk(distances, Trail::Read(pheromones), &mut rng, start);
                if local_search {
                    TwoOptRefiner.refine(distances, &mut tour);
                }
                tour
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aco::{Construction, StartPolicy};
    use crate::error::ColonyError;
    use crate::tsp::tour::is_permutation;
    use crate::tsp::RecordingEvaluator;

    /// Evaluator that checks every scored tour and records reports.
    struct CheckingEvaluator {
        distances: DistanceTable,
        reported: Vec<f64>,
        scored: usize,
    }

    impl CheckingEvaluator {
        fn new(distances: DistanceTable) -> Self {
            Self {
                distances,
                reported: Vec::new(),
                scored: 0,
            }
        }
    }

    impl Evaluator for CheckingEvaluator {
        fn evaluate(&mut self, tour: &[usize]) -> f64 {
            assert!(is_permutation(tour, self.distances.len()));
            let length = self.distances.tour_length(tour);
            self.reported.push(length);
            length
        }

        fn quick_evaluate(&self, tour: &[usize]) -> f64 {
            assert!(is_permutation(tour, self.distances.len()));
            self.distances.tour_length(tour)
        }
    }

    fn grid(side: usize) -> Vec<(f64, f64)> {
        (0..side * side)
            .map(|k| ((k % side) as f64 * 10.0, (k / side) as f64 * 10.0))
            .collect()
    }

    fn quick_config() -> AcoConfig {
        AcoConfig::default()
            .with_num_agents(8)
            .with_max_iterations(15)
            .without_time_limit()
            .with_seed(42)
    }

    #[test]
    fn test_unit_square_all_policies() {
        let square = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        for config in [AcoConfig::classic(), AcoConfig::progressive(), AcoConfig::grasp()] {
            let config = config
                .with_max_iterations(30)
                .without_time_limit()
                .with_seed(7);
            let mut colony = ColonyOptimizer::new(&square, config).unwrap();
            let mut eval = RecordingEvaluator::new(colony.distances().clone());
            let result = colony.run(&mut eval);
            assert!((result.best_length - 4.0).abs() < 1e-9);
            assert_eq!(result.stop_reason, StopReason::IterationsExhausted);
        }
    }

    #[test]
    fn test_single_city_rejected() {
        let err = ColonyOptimizer::new(&vec![(1.0, 1.0)], quick_config()).err();
        assert!(matches!(err, Some(ColonyError::InvalidInstance(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = ColonyOptimizer::new(&grid(3), quick_config().with_num_agents(0)).err();
        assert!(matches!(err, Some(ColonyError::InvalidConfig(_))));
    }

    #[test]
    fn test_every_scored_tour_is_a_permutation() {
        let points = grid(4);
        for deposit in [DepositPolicy::Batch, DepositPolicy::Progressive] {
            let config = quick_config().with_deposit(deposit).with_local_search(true);
            let mut colony = ColonyOptimizer::new(&points, config).unwrap();
            let mut eval = CheckingEvaluator::new(colony.distances().clone());
            colony.run(&mut eval);
        }
    }

    #[test]
    fn test_reports_are_strict_improvements_then_final() {
        let points = grid(5);
        let mut colony = ColonyOptimizer::new(&points, quick_config()).unwrap();
        let mut eval = CheckingEvaluator::new(colony.distances().clone());
        let result = colony.run(&mut eval);

        let (improving, last) = eval.reported.split_at(eval.reported.len() - 1);
        for w in improving.windows(2) {
            assert!(w[1] < w[0]);
        }
        assert_eq!(last[0], result.best_length);
        assert_eq!(result.reports, eval.reported.len());
        assert_eq!(result.improvements + 1, result.reports);
    }

    #[test]
    fn test_cost_history_non_increasing() {
        let points = grid(5);
        let config = quick_config().with_deposit(DepositPolicy::Progressive);
        let mut colony = ColonyOptimizer::new(&points, config).unwrap();
        let mut eval = RecordingEvaluator::new(colony.distances().clone());
        let result = colony.run(&mut eval);

        assert_eq!(result.cost_history.len(), result.iterations);
        for w in result.cost_history.windows(2) {
            assert!(w[1] <= w[0]);
        }
    }

    #[test]
    fn test_iterate_stats() {
        let points = grid(4);
        let mut colony = ColonyOptimizer::new(&points, quick_config()).unwrap();
        let mut eval = RecordingEvaluator::new(colony.distances().clone());

        let first = colony.iterate(&mut eval);
        assert_eq!(first.iteration, 0);
        assert!(first.improved);
        assert!(first.iteration_best <= first.mean_length);
        assert_eq!(first.best_length, colony.best_length());

        let second = colony.iterate(&mut eval);
        assert_eq!(second.iteration, 1);
        assert!(second.best_length <= first.best_length);
        assert_eq!(colony.iterations(), 2);
    }

    #[test]
    fn test_pheromones_stay_bounded_and_symmetric() {
        let points = grid(4);
        let config = quick_config()
            .with_deposit(DepositPolicy::Progressive)
            .with_pheromone_bounds(1e-4, 5.0)
            .with_initial_pheromone(0.5)
            .with_max_iterations(40);
        let mut colony = ColonyOptimizer::new(&points, config).unwrap();
        let mut eval = RecordingEvaluator::new(colony.distances().clone());

        for _ in 0..40 {
            colony.iterate(&mut eval);
            let field = colony.pheromones();
            for i in 0..field.len() {
                for j in 0..field.len() {
                    let tau = field.intensity(i, j);
                    assert_eq!(tau, field.intensity(j, i));
                    assert!((1e-4..=5.0).contains(&tau));
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let points = grid(5);
        let configs = [
            quick_config(),
            quick_config()
                .with_deposit(DepositPolicy::Progressive)
                .with_start(StartPolicy::Rotating),
            quick_config().with_construction(Construction::Grasp { gamma: 0.2 }),
        ];
        for config in configs {
            let mut a = ColonyOptimizer::new(&points, config.clone()).unwrap();
            let mut b = ColonyOptimizer::new(&points, config).unwrap();
            let mut ea = RecordingEvaluator::new(a.distances().clone());
            let mut eb = RecordingEvaluator::new(b.distances().clone());
            let ra = a.run(&mut ea);
            let rb = b.run(&mut eb);
            assert_eq!(ra.best, rb.best);
            assert_eq!(ra.best_length, rb.best_length);
            assert_eq!(ra.cost_history, rb.cost_history);
        }
    }

    #[test]
    fn test_cancellation() {
        let points = grid(4);
        let mut colony = ColonyOptimizer::new(&points, quick_config()).unwrap();
        let mut eval = RecordingEvaluator::new(colony.distances().clone());

        // Set before running so the outcome does not depend on timing.
        let cancel = Arc::new(AtomicBool::new(true));
        let result = colony.run_with_cancel(&mut eval, Some(cancel));

        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert_eq!(result.iterations, 0);
        assert!(result.best.is_empty());
        assert_eq!(result.reports, 0);
        assert_eq!(eval.evaluations(), 0);
    }

    #[test]
    fn test_zero_time_budget() {
        let points = grid(4);
        let config = quick_config().with_time_limit_ms(0);
        let mut colony = ColonyOptimizer::new(&points, config).unwrap();
        let mut eval = RecordingEvaluator::new(colony.distances().clone());
        let result = colony.run(&mut eval);

        assert_eq!(result.stop_reason, StopReason::TimeBudgetExceeded);
        assert_eq!(result.best_length, f64::INFINITY);
    }

    #[test]
    fn test_run_resumes_after_manual_iterations() {
        let points = grid(4);
        let mut colony = ColonyOptimizer::new(&points, quick_config()).unwrap();
        let mut eval = RecordingEvaluator::new(colony.distances().clone());
        colony.iterate(&mut eval);
        colony.iterate(&mut eval);
        let result = colony.run(&mut eval);
        assert_eq!(result.iterations, 15);
        assert_eq!(result.cost_history.len(), 15);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_is_deterministic() {
        let points = grid(5);
        let config = quick_config().with_parallel(true);
        let mut a = ColonyOptimizer::new(&points, config.clone()).unwrap();
        let mut b = ColonyOptimizer::new(&points, config).unwrap();
        let mut ea = RecordingEvaluator::new(a.distances().clone());
        let mut eb = RecordingEvaluator::new(b.distances().clone());
        let ra = a.run(&mut ea);
        let rb = b.run(&mut eb);
        assert_eq!(ra.best, rb.best);
        assert!(is_permutation(&ra.best, 25));
    }
}
