//! 2-opt local search over a closed tour.
//!
//! # Algorithm
//!
//! For every pair of positions `1 <= i < j <= n - 2`, compare the edges
//! `(t[i-1], t[i])` and `(t[j], t[j+1])` against the reconnection
//! `(t[i-1], t[j])` and `(t[i], t[j+1])`:
//!
//! ```text
//! gain = d(t[i-1], t[i]) + d(t[j], t[j+1]) - d(t[i-1], t[j]) - d(t[i], t[j+1])
//! ```
//!
//! A positive gain reverses `t[i..=j]` in place. Full passes repeat until a
//! pass applies no move. Each accepted move strictly shortens the tour, so
//! the loop terminates.
//!
//! # Known limitation
//!
//! The first and last positions are never a reversal boundary, so the wrap
//! edge `(t[n-1], t[0])` is not itself considered for removal. A crossing
//! that involves the wrap edge can survive refinement.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::distance::DistanceTable;

/// Smallest gain treated as an improvement. Filters out moves whose gain
/// is pure floating-point noise.
const MIN_GAIN: f64 = 1e-12;

/// Summary of one refinement.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TwoOptStats {
    /// Segment reversals applied.
    pub moves: usize,
    /// Full passes over all position pairs, including the final clean pass.
    pub passes: usize,
    /// Total length removed from the tour.
    pub gain: f64,
}

/// First-improvement 2-opt refiner.
///
/// # Examples
///
/// ```
/// use u_antcolony::tsp::{DistanceTable, TwoOptRefiner};
///
/// let square = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
/// let table = DistanceTable::build(&square).unwrap();
///
/// let mut tour = vec![0, 2, 1, 3]; // crossed
/// TwoOptRefiner.refine(&table, &mut tour);
/// assert!((table.tour_length(&tour) - 4.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoOptRefiner;

impl TwoOptRefiner {
    /// Refines `tour` in place until no improving move remains.
    ///
    /// Only segment reversals are applied, so `tour` stays a permutation.
    pub fn refine(&self, distances: &DistanceTable, tour: &mut [usize]) -> TwoOptStats {
        let n = tour.len();
        let mut stats = TwoOptStats::default();
        if n < 4 {
            return stats;
        }

        let mut improved = true;
        while improved {
            improved = false;
            stats.passes += 1;

            for i in 1..n - 2 {
                for j in (i + 1)..n - 1 {
                    let gain = Self::gain(distances, tour, i, j);
                    if gain > MIN_GAIN {
                        tour[i..=j].reverse();
                        stats.moves += 1;
                        stats.gain += gain;
                        improved = true;
                    }
                }
            }
        }

        stats
    }

    /// Length saved by reversing `tour[i..=j]`.
    pub fn gain(distances: &DistanceTable, tour: &[usize], i: usize, j: usize) -> f64 {
        let (a, b) = (tour[i - 1], tour[i]);
        let (c, d) = (tour[j], tour[j + 1]);

        let removed = distances.get(a, b) + distances.get(c, d);
        let added = distances.get(a, c) + distances.get(b, d);
        removed - added
    }
}
