//! Precomputed pairwise Euclidean distances.

use super::problem::ProblemSource;
use crate::error::{ColonyError, ColonyResult};

/// Symmetric `n × n` matrix of Euclidean distances between cities.
///
/// Built once per instance and immutable afterwards. Storage is a flat
/// row-major buffer, so [`get`](Self::get) is a single indexed load.
///
/// # Examples
///
/// ```
/// use u_antcolony::tsp::DistanceTable;
///
/// let table = DistanceTable::build(&vec![(0.0, 0.0), (3.0, 4.0)]).unwrap();
/// assert_eq!(table.get(0, 1), 5.0);
/// assert_eq!(table.get(1, 0), 5.0);
/// assert_eq!(table.get(1, 1), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTable {
    n: usize,
    data: Vec<f64>,
}

impl DistanceTable {
    /// Computes the distance for every pair of cities in `problem`.
    ///
    /// # Errors
    ///
    /// [`ColonyError::InvalidInstance`] when fewer than two cities are
    /// supplied or any coordinate is NaN or infinite.
    pub fn build<P: ProblemSource + ?Sized>(problem: &P) -> ColonyResult<Self> {
        let n = problem.len();
        if n < 2 {
            return Err(ColonyError::invalid_instance(format!(
                "need at least 2 cities, got {n}"
            )));
        }

        let mut points = Vec::with_capacity(n);
        for city in 0..n {
            let (x, y) = problem.coordinates(city);
            if !x.is_finite() || !y.is_finite() {
                return Err(ColonyError::invalid_instance(format!(
                    "city {city} has non-finite coordinates ({x}, {y})"
                )));
            }
            points.push((x, y));
        }

        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let (xi, yi) = points[i];
                let (xj, yj) = points[j];
                let d = (xi - xj).hypot(yi - yj);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }

        Ok(Self { n, data })
    }

    /// Distance between cities `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always `false`: a table is never built over fewer than two cities.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Length of the closed tour, wrap edge included.
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        match tour {
            [] | [_] => 0.0,
            [first, .., last] => {
                let open: f64 = tour.windows(2).map(|w| self.get(w[0], w[1])).sum();
                open + self.get(*last, *first)
            }
        }
    }
}
