//! Colony configuration and policy selection.

use crate::error::{ColonyError, ColonyResult};
use crate::tsp::{DEFAULT_CAP, DEFAULT_FLOOR};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How an agent picks its next city.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Construction {
    /// Roulette-wheel sampling over `tau^alpha * (1/d)^beta`.
    #[default]
    Roulette,

    /// GRASP restricted candidate list: unvisited cities within
    /// `min + gamma * (max - min)` of the current city, chosen uniformly.
    /// Pheromone does not influence this rule.
    Grasp {
        /// Greediness threshold in (0, 1). Typical: 0.2.
        gamma: f64,
    },
}

/// When pheromone is laid down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DepositPolicy {
    /// After every agent of an iteration has finished: evaporate once, then
    /// deposit `q / length` on every edge of every agent's tour.
    #[default]
    Batch,

    /// While agents walk: `(q / n) / d(i, j)` on each step, plus `q / length`
    /// on the refined tour once the agent finishes. Evaporation happens once
    /// per iteration. Agent `k` sees the deposits of agents `0..k`.
    Progressive,
}

/// How an agent's start city is chosen when the caller does not supply one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StartPolicy {
    /// Uniformly at random every time.
    #[default]
    Random,

    /// Uniformly among cities not yet used as a start in the current cycle;
    /// the cycle resets once every city has been used.
    Rotating,
}

/// Configuration for an ant colony run.
///
/// # Presets
///
/// | preset | agents | α | β | ρ | τ₀ | construction | deposit | start |
/// |---|---|---|---|---|---|---|---|---|
/// | [`classic`](Self::classic) | 50 | 1.0 | 2.0 | 0.5 | 0.1 | roulette | batch | random |
/// | [`progressive`](Self::progressive) | 35 | 1.5 | 7.2 | 0.4 | 0.22 | roulette | progressive | rotating |
/// | [`grasp`](Self::grasp) | 130 | 1.0 | 2.0 | 0.5 | 0.1 | GRASP γ=0.2 | batch | random |
///
/// # Examples
///
/// ```
/// use u_antcolony::aco::{AcoConfig, Construction, DepositPolicy};
///
/// let config = AcoConfig::default()
///     .with_num_agents(20)
///     .with_max_iterations(100)
///     .with_beta(5.0)
///     .with_deposit(DepositPolicy::Progressive)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.construction, Construction::Roulette);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AcoConfig {
    /// Agents (ants) per iteration. Observed useful range: 15–130.
    pub num_agents: usize,

    /// Maximum number of iterations.
    pub max_iterations: usize,

    /// Pheromone weight. Typical: 1.0–1.5.
    pub alpha: f64,

    /// Proximity weight. Typical: 2.0–7.5; higher values approach
    /// greedy nearest-neighbour behaviour.
    pub beta: f64,

    /// Evaporation rate `rho` in [0, 1).
    pub evaporation_rate: f64,

    /// Deposit constant `Q`.
    pub q: f64,

    /// Initial trail intensity `tau_0`.
    pub initial_pheromone: f64,

    /// Lower bound for every trail after evaporation.
    pub pheromone_floor: f64,

    /// Upper bound for every trail after a deposit.
    pub pheromone_cap: f64,

    /// Next-city selection rule.
    pub construction: Construction,

    /// When trails are reinforced.
    pub deposit: DepositPolicy,

    /// How start cities are picked.
    pub start: StartPolicy,

    /// Whether each constructed tour is refined with 2-opt.
    pub local_search: bool,

    /// Optional wall-clock budget in milliseconds, checked between
    /// iterations. A running iteration always completes.
    pub time_limit_ms: Option<u64>,

    /// Whether agents are constructed in parallel (`parallel` feature only,
    /// batch deposit only). Ignored when the feature is disabled.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl AcoConfig {
    /// Plain Ant System: roulette construction with batch deposit.
    pub fn classic() -> Self {
        Self {
            num_agents: 50,
            max_iterations: 200,
            alpha: 1.0,
            beta: 2.0,
            evaporation_rate: 0.5,
            q: 100.0,
            initial_pheromone: 0.1,
            pheromone_floor: DEFAULT_FLOOR,
            pheromone_cap: DEFAULT_CAP,
            construction: Construction::Roulette,
            deposit: DepositPolicy::Batch,
            start: StartPolicy::Random,
            local_search: true,
            time_limit_ms: Some(70_000),
            parallel: false,
            seed: None,
        }
    }

    /// Strongly distance-biased roulette with progressive deposit and
    /// rotating start cities.
    pub fn progressive() -> Self {
        Self {
            num_agents: 35,
            alpha: 1.5,
            beta: 7.2,
            evaporation_rate: 0.4,
            initial_pheromone: 0.22,
            deposit: DepositPolicy::Progressive,
            start: StartPolicy::Rotating,
            ..Self::classic()
        }
    }

    /// GRASP restricted-candidate construction with batch deposit.
    pub fn grasp() -> Self {
        Self {
            num_agents: 130,
            construction: Construction::Grasp { gamma: 0.2 },
            ..Self::classic()
        }
    }

    pub fn with_num_agents(mut self, n: usize) -> Self {
        self.num_agents = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_evaporation_rate(mut self, rho: f64) -> Self {
        self.evaporation_rate = rho;
        self
    }

    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    pub fn with_initial_pheromone(mut self, tau0: f64) -> Self {
        self.initial_pheromone = tau0;
        self
    }

    /// Sets the `[floor, cap]` trail bounds.
    pub fn with_pheromone_bounds(mut self, floor: f64, cap: f64) -> Self {
        self.pheromone_floor = floor;
        self.pheromone_cap = cap;
        self
    }

    pub fn with_construction(mut self, construction: Construction) -> Self {
        self.construction = construction;
        self
    }

    pub fn with_deposit(mut self, deposit: DepositPolicy) -> Self {
        self.deposit = deposit;
        self
    }

    pub fn with_start(mut self, start: StartPolicy) -> Self {
        self.start = start;
        self
    }

    pub fn with_local_search(mut self, enabled: bool) -> Self {
        self.local_search = enabled;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Removes the wall-clock budget; only `max_iterations` stops the run.
    pub fn without_time_limit(mut self) -> Self {
        self.time_limit_ms = None;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ColonyResult<()> {
        if self.num_agents == 0 {
            return Err(ColonyError::invalid_config("num_agents must be at least 1"));
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(ColonyError::invalid_config(format!(
                "alpha must be positive and finite, got {}",
                self.alpha
            )));
        }
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return Err(ColonyError::invalid_config(format!(
                "beta must be positive and finite, got {}",
                self.beta
            )));
        }
        if !(0.0..1.0).contains(&self.evaporation_rate) {
            return Err(ColonyError::invalid_config(format!(
                "evaporation_rate must be in [0, 1), got {}",
                self.evaporation_rate
            )));
        }
        if !(self.q.is_finite() && self.q > 0.0) {
            return Err(ColonyError::invalid_config(format!(
                "q must be positive and finite, got {}",
                self.q
            )));
        }
        if !(self.pheromone_floor.is_finite() && self.pheromone_floor > 0.0) {
            return Err(ColonyError::invalid_config(format!(
                "pheromone_floor must be positive, got {}",
                self.pheromone_floor
            )));
        }
        if !(self.pheromone_cap.is_finite() && self.pheromone_cap >= self.pheromone_floor) {
            return Err(ColonyError::invalid_config(format!(
                "pheromone_cap must be finite and >= floor ({}), got {}",
                self.pheromone_floor, self.pheromone_cap
            )));
        }
        if !(self.pheromone_floor..=self.pheromone_cap).contains(&self.initial_pheromone) {
            return Err(ColonyError::invalid_config(format!(
                "initial_pheromone must be in [{}, {}], got {}",
                self.pheromone_floor, self.pheromone_cap, self.initial_pheromone
            )));
        }
        if let Construction::Grasp { gamma } = self.construction {
            if !(gamma > 0.0 && gamma < 1.0) {
                return Err(ColonyError::invalid_config(format!(
                    "grasp gamma must be in (0, 1), got {gamma}"
                )));
            }
        }
        if self.parallel && self.deposit == DepositPolicy::Progressive {
            return Err(ColonyError::invalid_config(
                "parallel construction requires batch deposit",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(AcoConfig::classic().validate().is_ok());
        assert!(AcoConfig::progressive().validate().is_ok());
        assert!(AcoConfig::grasp().validate().is_ok());
    }

    #[test]
    fn test_progressive_preset() {
        let config = AcoConfig::progressive();
        assert_eq!(config.num_agents, 35);
        assert!((config.beta - 7.2).abs() < 1e-12);
        assert_eq!(config.deposit, DepositPolicy::Progressive);
        assert_eq!(config.start, StartPolicy::Rotating);
    }

    #[test]
    fn test_validate_bad_agents() {
        assert!(AcoConfig::default().with_num_agents(0).validate().is_err());
    }

    #[test]
    fn test_validate_bad_rho() {
        assert!(AcoConfig::default()
            .with_evaporation_rate(1.0)
            .validate()
            .is_err());
        assert!(AcoConfig::default()
            .with_evaporation_rate(-0.1)
            .validate()
            .is_err());
        assert!(AcoConfig::default()
            .with_evaporation_rate(0.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_bad_weights() {
        assert!(AcoConfig::default().with_alpha(0.0).validate().is_err());
        assert!(AcoConfig::default().with_beta(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_validate_bounds() {
        let config = AcoConfig::default().with_pheromone_bounds(1.0, 0.5);
        assert!(config.validate().is_err());

        let config = AcoConfig::default()
            .with_pheromone_bounds(0.5, 10.0)
            .with_initial_pheromone(0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_gamma() {
        let config = AcoConfig::grasp().with_construction(Construction::Grasp { gamma: 1.0 });
        assert!(matches!(
            config.validate(),
            Err(ColonyError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_parallel_needs_batch() {
        let config = AcoConfig::progressive().with_parallel(true);
        assert!(config.validate().is_err());
        assert!(AcoConfig::classic().with_parallel(true).validate().is_ok());
    }
}
