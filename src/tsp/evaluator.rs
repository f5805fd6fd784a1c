//! Tour scoring collaborators.

use super::distance::DistanceTable;
use super::tour::Tour;

/// Scores tours on behalf of the host program.
///
/// The optimizer calls [`quick_evaluate`](Self::quick_evaluate) freely
/// inside its hot loop and [`evaluate`](Self::evaluate) only when it
/// reports a strictly better tour, plus once when a run ends. `evaluate`
/// may have side effects (recording a global best, updating a display)
/// and must be fast enough not to stall the search.
pub trait Evaluator {
    /// Canonical scoring of a tour reported as the best so far.
    fn evaluate(&mut self, tour: &[usize]) -> f64;

    /// Side-effect-free tour length used for comparisons during search.
    fn quick_evaluate(&self, tour: &[usize]) -> f64;
}

/// Evaluator backed by a [`DistanceTable`] that remembers the best tour
/// it has been shown.
///
/// # Examples
///
/// ```
/// use u_antcolony::tsp::{DistanceTable, Evaluator, RecordingEvaluator};
///
/// let table = DistanceTable::build(&vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]).unwrap();
/// let mut eval = RecordingEvaluator::new(table);
/// eval.evaluate(&[0, 1, 2]);
/// assert_eq!(eval.evaluations(), 1);
/// assert_eq!(eval.best_tour(), Some(&[0, 1, 2][..]));
/// ```
#[derive(Debug, Clone)]
pub struct RecordingEvaluator {
    distances: DistanceTable,
    best: Option<(Tour, f64)>,
    evaluations: usize,
}

impl RecordingEvaluator {
    pub fn new(distances: DistanceTable) -> Self {
        Self {
            distances,
            best: None,
            evaluations: 0,
        }
    }

    /// Best tour seen by [`Evaluator::evaluate`], if any.
    pub fn best_tour(&self) -> Option<&[usize]> {
        self.best.as_ref().map(|(tour, _)| tour.as_slice())
    }

    /// Length of the best tour seen, or `+∞` before the first evaluation.
    pub fn best_length(&self) -> f64 {
        self.best.as_ref().map_or(f64::INFINITY, |&(_, len)| len)
    }

    /// Number of canonical evaluations performed.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }
}

impl Evaluator for RecordingEvaluator {
    fn evaluate(&mut self, tour: &[usize]) -> f64 {
        self.evaluations += 1;
        let length = self.distances.tour_length(tour);
        if length < self.best_length() {
            self.best = Some((tour.to_vec(), length));
        }
        length
    }

    fn quick_evaluate(&self, tour: &[usize]) -> f64 {
        self.distances.tour_length(tour)
    }
}
