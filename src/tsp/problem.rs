//! Problem instances: where city coordinates come from.

/// A source of city coordinates.
///
/// Implementations must return the same values for the lifetime of a
/// run; the distance table is built once from them and never refreshed.
///
/// # Examples
///
/// ```
/// use u_antcolony::tsp::ProblemSource;
///
/// let cities = vec![(0.0, 0.0), (3.0, 4.0)];
/// assert_eq!(ProblemSource::len(&cities), 2);
/// assert_eq!(cities.coordinates(1), (3.0, 4.0));
/// ```
pub trait ProblemSource {
    /// Number of cities.
    fn len(&self) -> usize;

    /// Planar coordinates of `city`, for `city < len()`.
    fn coordinates(&self, city: usize) -> (f64, f64);

    /// Returns `true` when the instance has no cities.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProblemSource for [(f64, f64)] {
    fn len(&self) -> usize {
        <[(f64, f64)]>::len(self)
    }

    fn coordinates(&self, city: usize) -> (f64, f64) {
        self[city]
    }
}

impl ProblemSource for Vec<(f64, f64)> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn coordinates(&self, city: usize) -> (f64, f64) {
        self[city]
    }
}

impl ProblemSource for [[f64; 2]] {
    fn len(&self) -> usize {
        <[[f64; 2]]>::len(self)
    }

    fn coordinates(&self, city: usize) -> (f64, f64) {
        let [x, y] = self[city];
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_points() {
        let points: &[[f64; 2]] = &[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        assert_eq!(ProblemSource::len(points), 3);
        assert_eq!(points.coordinates(2), (5.0, 6.0));
        assert!(!ProblemSource::is_empty(points));
    }

    #[test]
    fn test_empty_slice() {
        let points: &[(f64, f64)] = &[];
        assert!(ProblemSource::is_empty(points));
    }
}
