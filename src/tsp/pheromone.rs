//! Pheromone trails between city pairs.
//!
//! The field is a symmetric matrix: every write goes to `(i, j)` and
//! `(j, i)` together. All entries stay inside `[floor, cap]`, so no edge
//! ever becomes permanently unreachable under the probabilistic rule and
//! no single edge can run away with reinforcement.

/// Default lower bound applied after evaporation.
pub const DEFAULT_FLOOR: f64 = 1e-6;

/// Default upper bound applied after deposits.
pub const DEFAULT_CAP: f64 = 100.0;

/// Mutable desirability matrix shared by all agents of a colony.
///
/// # Examples
///
/// ```
/// use u_antcolony::tsp::PheromoneField;
///
/// let mut field = PheromoneField::initialize(4, 0.1);
/// field.evaporate(0.5);
/// field.deposit(0, 2, 1.0);
/// assert!((field.intensity(0, 2) - 1.05).abs() < 1e-12);
/// assert_eq!(field.intensity(2, 0), field.intensity(0, 2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneField {
    n: usize,
    data: Vec<f64>,
    floor: f64,
    cap: f64,
}

impl PheromoneField {
    /// Fills an `n × n` field with `initial`, using the default bounds.
    ///
    /// `initial` is clamped into the bounds.
    pub fn initialize(n: usize, initial: f64) -> Self {
        Self::with_bounds(n, initial, DEFAULT_FLOOR, DEFAULT_CAP)
    }

    /// Fills an `n × n` field with `initial`, clamped into `[floor, cap]`.
    ///
    /// Callers are expected to pass `0 < floor <= cap`; configurations are
    /// validated before a colony reaches this point.
    pub fn with_bounds(n: usize, initial: f64, floor: f64, cap: f64) -> Self {
        Self {
            n,
            data: vec![initial.clamp(floor, cap); n * n],
            floor,
            cap,
        }
    }

    /// Multiplies every entry by `1 - rho`, never dropping below the floor.
    pub fn evaporate(&mut self, rho: f64) {
        let keep = 1.0 - rho;
        let floor = self.floor;
        for tau in &mut self.data {
            *tau = (*tau * keep).max(floor);
        }
    }

    /// Adds `amount` to the edge `{i, j}`, saturating at the cap.
    ///
    /// An infinite amount (zero-length edge or tour) saturates to the cap.
    pub fn deposit(&mut self, i: usize, j: usize, amount: f64) {
        let value = (self.data[i * self.n + j] + amount).clamp(self.floor, self.cap);
        self.data[i * self.n + j] = value;
        self.data[j * self.n + i] = value;
    }

    /// Deposits `amount` on every edge of a closed tour.
    pub fn deposit_tour(&mut self, tour: &[usize], amount: f64) {
        for (a, b) in crate::tsp::tour::edges(tour) {
            self.deposit(a, b, amount);
        }
    }

    /// Trail intensity on edge `(i, j)`.
    #[inline]
    pub fn intensity(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub fn cap(&self) -> f64 {
        self.cap
    }

    /// Number of cities the field spans.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_symmetric(field: &PheromoneField) {
        for i in 0..field.len() {
            for j in 0..field.len() {
                assert_eq!(field.intensity(i, j), field.intensity(j, i));
            }
        }
    }

    #[test]
    fn test_initialize_constant() {
        let field = PheromoneField::initialize(5, 0.22);
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(field.intensity(i, j), 0.22);
            }
        }
    }

    #[test]
    fn test_evaporate_scales() {
        let mut field = PheromoneField::initialize(3, 0.5);
        field.evaporate(0.4);
        assert!((field.intensity(0, 1) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_evaporate_stops_at_floor() {
        let mut field = PheromoneField::with_bounds(3, 1.0, 0.01, 10.0);
        for _ in 0..1000 {
            field.evaporate(0.9);
        }
        assert_eq!(field.intensity(1, 2), 0.01);
    }

    #[test]
    fn test_deposit_saturates_at_cap() {
        let mut field = PheromoneField::with_bounds(3, 1.0, 0.01, 2.0);
        field.deposit(0, 1, 5.0);
        assert_eq!(field.intensity(0, 1), 2.0);
        field.deposit(1, 2, f64::INFINITY);
        assert_eq!(field.intensity(2, 1), 2.0);
        assert_symmetric(&field);
    }

    #[test]
    fn test_deposit_tour_covers_wrap_edge() {
        let mut field = PheromoneField::initialize(4, 0.1);
        field.deposit_tour(&[0, 1, 2, 3], 1.0);
        assert!((field.intensity(3, 0) - 1.1).abs() < 1e-12);
        assert!((field.intensity(1, 2) - 1.1).abs() < 1e-12);
        assert_eq!(field.intensity(0, 2), 0.1);
    }

    #[test]
    fn test_initial_value_clamped() {
        let field = PheromoneField::with_bounds(2, 500.0, 0.1, 100.0);
        assert_eq!(field.intensity(0, 1), 100.0);
    }

    proptest! {
        #[test]
        fn prop_symmetric_and_bounded(
            ops in prop::collection::vec((0usize..6, 0usize..6, 0.0f64..50.0, 0.0f64..0.99), 1..200),
        ) {
            let mut field = PheromoneField::with_bounds(6, 0.1, 1e-6, 100.0);
            for (i, j, amount, rho) in ops {
                field.evaporate(rho);
                field.deposit(i, j, amount);
                for a in 0..6 {
                    for b in 0..6 {
                        let tau = field.intensity(a, b);
                        prop_assert_eq!(tau, field.intensity(b, a));
                        prop_assert!((1e-6..=100.0).contains(&tau));
                    }
                }
            }
        }
    }
}
