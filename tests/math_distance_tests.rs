#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use gwr_select::internals::math::distance::{euclidean, DistanceMatrix};

// ============================================================================
// Euclidean Distance Tests
// ============================================================================

#[test]
fn test_euclidean_distance_2d() {
    let a = [0.0, 0.0];
    let b = [3.0, 4.0];
    assert_relative_eq!(euclidean(&a, &b), 5.0);
}

#[test]
fn test_euclidean_distance_symmetric() {
    let a = [1.5, -2.0];
    let b = [-0.5, 4.0];
    assert_relative_eq!(euclidean(&a, &b), euclidean(&b, &a));
}

// ============================================================================
// Distance Matrix Tests
// ============================================================================

fn square() -> Vec<[f64; 2]> {
    vec![[0.0, 0.0], [3.0, 0.0], [0.0, 4.0], [3.0, 4.0]]
}

#[test]
fn test_matrix_rows() {
    let dm = DistanceMatrix::from_coords(&square());
    assert_eq!(dm.len(), 4);
    assert!(!dm.is_empty());

    let row0 = dm.row(0);
    assert_relative_eq!(row0[0], 0.0);
    assert_relative_eq!(row0[1], 3.0);
    assert_relative_eq!(row0[2], 4.0);
    assert_relative_eq!(row0[3], 5.0);
}

#[test]
fn test_matrix_is_symmetric_with_zero_diagonal() {
    let dm = DistanceMatrix::from_coords(&square());
    for i in 0..4 {
        assert_eq!(dm.row(i)[i], 0.0);
        for j in 0..4 {
            assert_eq!(dm.row(i)[j], dm.row(j)[i]);
        }
    }
}

#[test]
fn test_sorted_rows_ascending() {
    let dm = DistanceMatrix::from_coords(&square());
    // Location 3 sees: itself, (0,4) at 3, (3,0) at 4, origin at 5.
    assert_eq!(dm.sorted_row(3), &[0.0, 3.0, 4.0, 5.0]);
    for i in 0..4 {
        let row = dm.sorted_row(i);
        assert_eq!(row[0], 0.0);
        assert!(row.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn test_min_nonzero_and_max() {
    let dm = DistanceMatrix::from_coords(&square());
    assert_eq!(dm.min_nonzero(), Some(3.0));
    assert_relative_eq!(dm.max(), 5.0);
}

#[test]
fn test_min_nonzero_skips_duplicates() {
    let coords = vec![[1.0, 1.0], [1.0, 1.0], [1.0, 3.0]];
    let dm = DistanceMatrix::from_coords(&coords);
    assert_eq!(dm.row(0)[1], 0.0);
    assert_eq!(dm.min_nonzero(), Some(2.0));
}

#[test]
fn test_coincident_locations_have_no_nonzero_distance() {
    let coords = vec![[2.0, 2.0]; 3];
    let dm = DistanceMatrix::from_coords(&coords);
    assert_eq!(dm.min_nonzero(), None);
    assert_eq!(dm.max(), 0.0);
}

#[test]
fn test_empty_matrix() {
    let dm = DistanceMatrix::<f64>::from_coords(&[]);
    assert!(dm.is_empty());
    assert_eq!(dm.min_nonzero(), None);
}
