//! Ant Colony Optimization for the symmetric Traveling Salesman Problem.
//!
//! Searches for a short closed tour through a set of planar cities:
//!
//! - **Construction**: pheromone-guided roulette-wheel selection, or GRASP
//!   restricted-candidate selection.
//! - **Pheromone update**: batch (once per iteration, from every agent) or
//!   progressive (while agents walk), with evaporation and `[floor, cap]`
//!   bounds on every trail.
//! - **Local search**: first-improvement 2-opt on every constructed tour.
//! - **Budgets**: iteration count, wall-clock limit and a cancel flag, all
//!   checked between iterations. The best tour so far is always available
//!   and is pushed to the host's [`Evaluator`](tsp::Evaluator) each time
//!   it improves.
//!
//! # Example
//!
//! ```
//! use u_antcolony::aco::{AcoConfig, ColonyOptimizer};
//! use u_antcolony::tsp::{DistanceTable, RecordingEvaluator};
//!
//! let cities = vec![(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 2.0), (0.0, 1.0)];
//! let config = AcoConfig::progressive().with_max_iterations(25).with_seed(3);
//!
//! let mut colony = ColonyOptimizer::new(&cities, config).unwrap();
//! let mut eval = RecordingEvaluator::new(DistanceTable::build(&cities).unwrap());
//! let result = colony.run(&mut eval);
//!
//! assert_eq!(result.best.len(), 5);
//! ```
//!
//! # Features
//!
//! - `parallel`: construct agents on a rayon pool (batch deposit only).
//! - `serde`: `Serialize`/`Deserialize` for configs and results.

pub mod aco;
mod error;
pub mod random;
pub mod tsp;

pub use error::{ColonyError, ColonyResult};
