//! Closed tours over city indices.

use super::distance::DistanceTable;

/// A permutation of `0..n`; traversal wraps from the last city to the first.
pub type Tour = Vec<usize>;

/// Returns `true` when `tour` visits each of `0..n` exactly once.
pub fn is_permutation(tour: &[usize], n: usize) -> bool {
    if tour.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &city in tour {
        if city >= n || seen[city] {
            return false;
        }
        seen[city] = true;
    }
    true
}

/// Iterates over the edges of a closed tour, wrap edge last.
///
/// A tour with fewer than two cities has no edges.
pub fn edges(tour: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    let wrap = match tour {
        [first, .., last] => Some((*last, *first)),
        _ => None,
    };
    tour.windows(2).map(|w| (w[0], w[1])).chain(wrap)
}

/// Greedy nearest-neighbour tour starting at `start`.
///
/// Ties go to the lowest city index. This is the quality baseline a
/// colony run is expected to match or beat.
pub fn nearest_neighbor(distances: &DistanceTable, start: usize) -> Tour {
    let n = distances.len();
    let mut visited = vec![false; n];
    let mut tour = Vec::with_capacity(n);
    let mut current = start;
    visited[current] = true;
    tour.push(current);

    for _ in 1..n {
        let mut next = None;
        let mut best = f64::INFINITY;
        for city in 0..n {
            if !visited[city] && distances.get(current, city) < best {
                best = distances.get(current, city);
                next = Some(city);
            }
        }
        let Some(city) = next else { break };
        visited[city] = true;
        tour.push(city);
        current = city;
    }

    tour
}
