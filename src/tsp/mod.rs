//! Symmetric TSP building blocks.
//!
//! Problem-side types shared by the colony engine: where coordinates come
//! from ([`ProblemSource`]), the precomputed [`DistanceTable`], the mutable
//! [`PheromoneField`], tours and their scoring ([`Evaluator`]), and the
//! [`TwoOptRefiner`] local search.

mod distance;
mod evaluator;
mod pheromone;
mod problem;
pub mod tour;
mod two_opt;

pub use distance::DistanceTable;
pub use evaluator::{Evaluator, RecordingEvaluator};
pub use pheromone::{PheromoneField, DEFAULT_CAP, DEFAULT_FLOOR};
pub use problem::ProblemSource;
pub use tour::Tour;
pub use two_opt::{TwoOptRefiner, TwoOptStats};
