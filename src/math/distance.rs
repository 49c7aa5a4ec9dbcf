//! Pairwise distances between observation locations.
//!
//! ## Purpose
//!
//! GWR weights every observation by its Euclidean distance to the regression
//! location. All fits in a search share the same locations, so the full
//! distance matrix is computed once and reused by every evaluation.
//!
//! ## Design notes
//!
//! * **Dense storage**: Row-major `n x n` matrix.
//! * **Sorted rows**: Adaptive kernels need the k-th nearest neighbor distance
//!   per location; ascending copies of every row are kept for O(1) lookup.
//!
//! ## Invariants
//!
//! * Distances are non-negative and symmetric; the diagonal is zero.
//! * `sorted_row(i)[0]` is the distance of location `i` to itself.
//!
//! ## Non-goals
//!
//! * No spatial indexing; GWR needs every pairwise distance anyway.

use core::cmp::Ordering;

use num_traits::Float;

/// Euclidean distance between two points of equal dimension.
#[inline]
pub fn euclidean<T: Float>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len(), "Points must have same dimension");
    a.iter()
        .zip(b.iter())
        .map(|(&ai, &bi)| {
            let diff = ai - bi;
            diff * diff
        })
        .fold(T::zero(), |acc, x| acc + x)
        .sqrt()
}

/// Dense matrix of distances between all pairs of locations.
#[derive(Debug, Clone)]
pub struct DistanceMatrix<T> {
    n: usize,
    values: Vec<T>,
    sorted: Vec<T>,
}

impl<T: Float> DistanceMatrix<T> {
    /// Build the matrix from 2-D coordinates.
    pub fn from_coords(coords: &[[T; 2]]) -> Self {
        let n = coords.len();
        let mut values = vec![T::zero(); n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = euclidean(&coords[i], &coords[j]);
                values[i * n + j] = d;
                values[j * n + i] = d;
            }
        }

        let mut sorted = values.clone();
        for row in sorted.chunks_mut(n.max(1)) {
            row.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        }

        Self { n, values, sorted }
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the matrix has no locations.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distances from location `i` to every location, in input order.
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    /// Distances from location `i` to every location, ascending.
    #[inline]
    pub fn sorted_row(&self, i: usize) -> &[T] {
        &self.sorted[i * self.n..(i + 1) * self.n]
    }

    /// Smallest strictly positive pairwise distance, if any.
    pub fn min_nonzero(&self) -> Option<T> {
        self.values
            .iter()
            .copied()
            .filter(|&d| d > T::zero())
            .fold(None, |acc: Option<T>, d| match acc {
                Some(m) if m <= d => Some(m),
                _ => Some(d),
            })
    }

    /// Largest pairwise distance.
    pub fn max(&self) -> T {
        self.values.iter().copied().fold(T::zero(), T::max)
    }
}
