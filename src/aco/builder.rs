//! Stochastic tour construction ("ant walk").
//!
//! # Algorithm
//!
//! 1. Pick a start city (caller-supplied, random, or rotating).
//! 2. From the current city `i`, score every unvisited city `j`:
//!    - **Roulette**: `tau(i,j)^alpha * (1 / d(i,j))^beta`, then sample
//!      proportionally with [`roulette_select`].
//!    - **GRASP**: keep the cities within `min + gamma * (max - min)` of `i`
//!      and pick one uniformly.
//! 3. Repeat until every city is visited. The tour closes implicitly.
//!
//! Construction always takes exactly `n - 1` selection steps.
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Feo & Resende (1995), "Greedy Randomized Adaptive Search Procedures"

use super::config::{AcoConfig, Construction, StartPolicy};
use crate::error::{ColonyError, ColonyResult};
use crate::tsp::{DistanceTable, PheromoneField, Tour};
use rand::Rng;

/// Where an agent's walk reads (and possibly writes) pheromone.
pub(crate) enum Trail<'a> {
    /// Read-only view.
    Read(&'a PheromoneField),
    /// Deposit `(q / n) / d(i, j)` after every step `i -> j`.
    Reinforce { field: &'a mut PheromoneField, q: f64 },
}

impl Trail<'_> {
    fn field(&self) -> &PheromoneField {
        match self {
            Trail::Read(field) => *field,
            Trail::Reinforce { field, .. } => &**field,
        }
    }

    fn after_step(&mut self, from: usize, to: usize, distance: f64, n: usize) {
        if let Trail::Reinforce { field, q } = self {
            field.deposit(from, to, (*q / n as f64) / distance);
        }
    }
}

/// Builds candidate tours for one problem instance.
///
/// The builder holds the selection weights and rule plus the rotating
/// start-city pool; it never owns the distance table or pheromone field,
/// which are passed in by reference on every call.
///
/// # Examples
///
/// ```
/// use u_antcolony::aco::{AcoConfig, TourBuilder};
/// use u_antcolony::random::create_rng;
/// use u_antcolony::tsp::{tour, DistanceTable, PheromoneField};
///
/// let cities = vec![(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (0.0, 3.0), (2.0, 5.0)];
/// let table = DistanceTable::build(&cities).unwrap();
/// let field = PheromoneField::initialize(table.len(), 0.1);
///
/// let mut builder = TourBuilder::new(&AcoConfig::default());
/// let mut rng = create_rng(1);
/// let t = builder.construct(&table, &field, &mut rng, Some(2)).unwrap();
/// assert_eq!(t[0], 2);
/// assert!(tour::is_permutation(&t, 5));
/// ```
#[derive(Debug, Clone)]
pub struct TourBuilder {
    alpha: f64,
    beta: f64,
    construction: Construction,
    start: StartPolicy,
    start_pool: Vec<usize>,
}

impl TourBuilder {
    pub fn new(config: &AcoConfig) -> Self {
        Self {
            alpha: config.alpha,
            beta: config.beta,
            construction: config.construction,
            start: config.start,
            start_pool: Vec::new(),
        }
    }

    /// Builds one tour without touching the pheromone field.
    ///
    /// With `start == None` the start city follows the configured
    /// [`StartPolicy`].
    ///
    /// # Errors
    ///
    /// [`ColonyError::CityOutOfRange`] for a bad `start`, and
    /// [`ColonyError::InvalidInstance`] when the field and table sizes differ.
    pub fn construct<R: Rng>(
        &mut self,
        distances: &DistanceTable,
        pheromones: &PheromoneField,
        rng: &mut R,
        start: Option<usize>,
    ) -> ColonyResult<Tour> {
        check_sizes(distances, pheromones)?;
        let start = self.resolve_start(distances.len(), rng, start)?;
        Ok(self.walk(distances, Trail::Read(pheromones), rng, start))
    }

    /// Builds one tour, depositing `(q / n) / d(i, j)` on every edge as it
    /// is walked. Later steps of the same walk see earlier deposits.
    ///
    /// # Errors
    ///
    /// Same as [`construct`](Self::construct).
    pub fn construct_reinforcing<R: Rng>(
        &mut self,
        distances: &DistanceTable,
        pheromones: &mut PheromoneField,
        q: f64,
        rng: &mut R,
        start: Option<usize>,
    ) -> ColonyResult<Tour> {
        check_sizes(distances, pheromones)?;
        let start = self.resolve_start(distances.len(), rng, start)?;
        let trail = Trail::Reinforce {
            field: pheromones,
            q,
        };
        Ok(self.walk(distances, trail, rng, start))
    }

    /// Builds one read-only tour from a given start city.
    ///
    /// Takes `&self`, so one builder can serve several workers at once.
    pub fn walk_from<R: Rng>(
        &self,
        distances: &DistanceTable,
        pheromones: &PheromoneField,
        rng: &mut R,
        start: usize,
    ) -> ColonyResult<Tour> {
        check_sizes(distances, pheromones)?;
        check_start(start, distances.len())?;
        Ok(self.walk(distances, Trail::Read(pheromones), rng, start))
    }

    /// Draws a start city according to the configured policy.
    ///
    /// `n` must be positive.
    pub fn next_start<R: Rng>(&mut self, n: usize, rng: &mut R) -> usize {
        match self.start {
            StartPolicy::Random => rng.random_range(0..n),
            StartPolicy::Rotating => {
                if self.start_pool.is_empty() {
                    self.start_pool.extend(0..n);
                }
                let k = rng.random_range(0..self.start_pool.len());
                self.start_pool.swap_remove(k)
            }
        }
    }

    fn resolve_start<R: Rng>(
        &mut self,
        n: usize,
        rng: &mut R,
        start: Option<usize>,
    ) -> ColonyResult<usize> {
        match start {
            Some(city) => {
                check_start(city, n)?;
                Ok(city)
            }
            None => Ok(self.next_start(n, rng)),
        }
    }

    /// The walk itself. Callers guarantee `n > 0`, matching sizes and a
    /// valid `start`.
    pub(crate) fn walk<R: Rng>(
        &self,
        distances: &DistanceTable,
        mut trail: Trail<'_>,
        rng: &mut R,
        start: usize,
    ) -> Tour {
        let n = distances.len();
        let mut visited = vec![false; n];
        let mut scores = vec![0.0; n];
        let mut candidates = Vec::with_capacity(n);
        let mut tour = Vec::with_capacity(n);

        let mut current = start;
        visited[current] = true;
        tour.push(current);

        for _ in 1..n {
            let next = match self.construction {
                Construction::Roulette => {
                    let field = trail.field();
                    let total = self.score(distances, field, current, &visited, &mut scores);
                    let draw = if total.is_finite() && total > 0.0 {
                        rng.random::<f64>() * total
                    } else {
                        0.0
                    };
                    roulette_select(&scores, &visited, draw)
                }
                Construction::Grasp { gamma } => {
                    grasp_select(distances, current, &visited, gamma, &mut candidates, rng)
                }
            };
            let Some(next) = next else { break };

            visited[next] = true;
            tour.push(next);
            trail.after_step(current, next, distances.get(current, next), n);
            current = next;
        }

        tour
    }

    /// Fills `scores` for the unvisited cities and returns their sum.
    fn score(
        &self,
        distances: &DistanceTable,
        pheromones: &PheromoneField,
        current: usize,
        visited: &[bool],
        scores: &mut [f64],
    ) -> f64 {
        let mut total = 0.0;
        for (city, score) in scores.iter_mut().enumerate() {
            if visited[city] {
                *score = 0.0;
                continue;
            }
            let tau = pheromones.intensity(current, city);
            let visibility = 1.0 / distances.get(current, city);
            *score = tau.powf(self.alpha) * visibility.powf(self.beta);
            total += *score;
        }
        total
    }
}

/// Roulette-wheel step over precomputed scores.
///
/// `draw` is an absolute position in `[0, Σ scores)` over the unvisited
/// cities. Unvisited cities are walked in index order, accumulating their
/// scores, and the first positive-score city whose running sum reaches
/// `draw` wins. An infinite score (a city at zero distance) outweighs every
/// finite one, so the first unvisited city scoring `+∞` wins outright. When
/// the scores cannot be sampled otherwise (sum zero or NaN) the first
/// unvisited city is returned.
///
/// Returns `None` only when every city is visited.
///
/// # Examples
///
/// ```
/// use u_antcolony::aco::roulette_select;
///
/// let scores = [0.0, 3.0, 0.0, 1.0];
/// let visited = [true, false, true, false];
/// assert_eq!(roulette_select(&scores, &visited, 2.5), Some(1));
/// assert_eq!(roulette_select(&scores, &visited, 3.5), Some(3));
/// ```
pub fn roulette_select(scores: &[f64], visited: &[bool], draw: f64) -> Option<usize> {
    let unvisited = (0..scores.len()).filter(|&city| !visited[city]);
    let first = unvisited.clone().next()?;

    if let Some(city) = unvisited.clone().find(|&city| scores[city] == f64::INFINITY) {
        return Some(city);
    }

    let total: f64 = unvisited.clone().map(|city| scores[city]).sum();
    if total.is_finite() && total > 0.0 {
        let mut cumulative = 0.0;
        for city in unvisited {
            if scores[city] <= 0.0 {
                continue;
            }
            cumulative += scores[city];
            if cumulative >= draw {
                return Some(city);
            }
        }
    }

    Some(first)
}

/// GRASP step: uniform choice within the restricted candidate list.
fn grasp_select<R: Rng>(
    distances: &DistanceTable,
    current: usize,
    visited: &[bool],
    gamma: f64,
    rcl: &mut Vec<usize>,
    rng: &mut R,
) -> Option<usize> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for city in (0..visited.len()).filter(|&c| !visited[c]) {
        let d = distances.get(current, city);
        min = min.min(d);
        max = max.max(d);
    }

    let threshold = min + gamma * (max - min);
    rcl.clear();
    rcl.extend(
        (0..visited.len()).filter(|&c| !visited[c] && distances.get(current, c) <= threshold),
    );

    if rcl.is_empty() {
        return None;
    }
    Some(rcl[rng.random_range(0..rcl.len())])
}

fn check_sizes(distances: &DistanceTable, pheromones: &PheromoneField) -> ColonyResult<()> {
    if pheromones.len() != distances.len() {
        return Err(ColonyError::invalid_instance(format!(
            "pheromone field spans {} cities, distance table {}",
            pheromones.len(),
            distances.len()
        )));
    }
    Ok(())
}

fn check_start(start: usize, n: usize) -> ColonyResult<()> {
    if start >= n {
        return Err(ColonyError::CityOutOfRange { city: start, len: n });
    }
    Ok(())
}
