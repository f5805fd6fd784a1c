//! Ant Colony Optimization (ACO) for the symmetric TSP.
//!
//! A population of agents ("ants") builds tours city by city, biased by a
//! shared pheromone field and by proximity. Good tours reinforce their
//! edges, evaporation forgets stale ones, and each tour can be polished
//! with 2-opt before it is compared against the best so far.
//!
//! # Key Types
//!
//! - [`AcoConfig`]: weights, budgets and the policy choices
//!   ([`Construction`], [`DepositPolicy`], [`StartPolicy`])
//! - [`TourBuilder`]: one agent's stochastic walk
//! - [`ColonyOptimizer`]: the iteration loop, returning an [`AcoResult`]
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents", *IEEE Trans. SMC-B* 26(1)
//! - Dorigo & Stützle (2004), *Ant Colony Optimization*, MIT Press
//! - Feo & Resende (1995), "Greedy Randomized Adaptive Search Procedures"

mod builder;
mod config;
mod runner;

pub use builder::{roulette_select, TourBuilder};
pub use config::{AcoConfig, Construction, DepositPolicy, StartPolicy};
pub use runner::{AcoResult, ColonyOptimizer, IterationStats, StopReason};
