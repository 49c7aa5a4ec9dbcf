//! Linear algebra backend abstraction for local regressions.
//!
//! ## Purpose
//!
//! Each GWR location solves a small weighted normal-equation system
//! `X'WX beta = X'Wy`. This module provides the inverse of `X'WX` (needed for
//! both the coefficients and the hat-matrix diagonal) through nalgebra.
//!
//! ## Design notes
//!
//! * Uses a Cholesky factorization: `X'WX` is symmetric positive semi-definite.
//! * The matrix is scaled to unit diagonal first; a failed factorization, or
//!   a scaled factor whose diagonal spread shows the system is numerically
//!   rank deficient, is reported as `None` so the caller can flag the
//!   bandwidth as degenerate. Rescaling a design column never changes the
//!   verdict.
//! * Generic over `FloatLinalg` types (f32 and f64) which delegate to nalgebra.

use num_traits::Float;

// ============================================================================
// FloatLinalg Trait
// ============================================================================

/// Helper trait to bridge generic Float types to the nalgebra backend.
pub trait FloatLinalg: Float + 'static {
    /// Invert the normal matrix X'WX (column-major `n x n`).
    fn invert_normal(a: &[Self], n: usize) -> Option<Vec<Self>>;
    /// Solve X'WX * beta = X'Wy.
    fn solve_normal(a: &[Self], b: &[Self], n: usize) -> Option<Vec<Self>>;
    /// Compute the quadratic form x' (X'WX)^-1 x.
    fn compute_leverage(design_vec: &[Self], xtw_x_inv: &[Self], n: usize) -> Self;
}

impl FloatLinalg for f64 {
    #[inline]
    fn invert_normal(a: &[Self], n: usize) -> Option<Vec<Self>> {
        nalgebra_backend::invert_normal_matrix_f64(a, n)
    }
    #[inline]
    fn solve_normal(a: &[Self], b: &[Self], n: usize) -> Option<Vec<Self>> {
        nalgebra_backend::solve_normal_equations_f64(a, b, n)
    }
    #[inline]
    fn compute_leverage(design_vec: &[Self], xtw_x_inv: &[Self], n: usize) -> Self {
        quadratic_form(design_vec, xtw_x_inv, n)
    }
}

impl FloatLinalg for f32 {
    #[inline]
    fn invert_normal(a: &[Self], n: usize) -> Option<Vec<Self>> {
        nalgebra_backend::invert_normal_matrix_f32(a, n)
    }
    #[inline]
    fn solve_normal(a: &[Self], b: &[Self], n: usize) -> Option<Vec<Self>> {
        nalgebra_backend::solve_normal_equations_f32(a, b, n)
    }
    #[inline]
    fn compute_leverage(design_vec: &[Self], xtw_x_inv: &[Self], n: usize) -> Self {
        quadratic_form(design_vec, xtw_x_inv, n)
    }
}

/// x' A x for a column-major `n x n` matrix A.
#[inline]
fn quadratic_form<T: Float>(x: &[T], a: &[T], n: usize) -> T {
    let mut acc = T::zero();
    for col in 0..n {
        let mut inner = T::zero();
        for row in 0..n {
            inner = inner + x[row] * a[col * n + row];
        }
        acc = acc + inner * x[col];
    }
    acc
}

/// Matrix-vector product for a column-major `n x n` matrix.
#[inline]
pub fn mat_vec<T: Float>(a: &[T], x: &[T], n: usize) -> Vec<T> {
    let mut out = vec![T::zero(); n];
    for col in 0..n {
        let xc = x[col];
        for row in 0..n {
            out[row] = out[row] + a[col * n + row] * xc;
        }
    }
    out
}

// ============================================================================
// Nalgebra Backend Implementation
// ============================================================================

/// Nalgebra-based linear algebra operations.
///
/// The normal matrix is equilibrated to unit diagonal before factorization,
/// so the rank check does not depend on the units of the design columns.
pub mod nalgebra_backend {
    use nalgebra::{Cholesky, DMatrix, DVector, Dyn};

    /// Smallest acceptable squared ratio of Cholesky diagonal entries, in units of machine epsilon.
    const RANK_TOLERANCE: f64 = 100.0;

    /// Cholesky factor of `S A S` with `S = diag(A)^-1/2`.
    struct Equilibrated {
        chol: Cholesky<f64, Dyn>,
        scale: DVector<f64>,
    }

    fn well_conditioned(l_diag: impl Iterator<Item = f64>, eps: f64) -> bool {
        let (lo, hi) = l_diag.fold((f64::INFINITY, 0.0_f64), |(lo, hi), d| {
            (lo.min(d.abs()), hi.max(d.abs()))
        });
        if hi.is_nan() || hi <= 0.0 || !lo.is_finite() {
            return false;
        }
        let ratio = lo / hi;
        ratio * ratio > eps * RANK_TOLERANCE
    }

    fn equilibrate(xtw_x: &[f64], n: usize, eps: f64) -> Option<Equilibrated> {
        let mut scale = DVector::<f64>::zeros(n);
        for i in 0..n {
            let d = xtw_x[i * n + i];
            // A column with no weighted mass is singular at any scale.
            if !(d.is_finite() && d > 0.0) {
                return None;
            }
            scale[i] = d.sqrt().recip();
        }
        let matrix = DMatrix::from_fn(n, n, |r, c| xtw_x[c * n + r] * scale[r] * scale[c]);
        let chol = matrix.cholesky()?;
        if !well_conditioned(chol.l().diagonal().iter().copied(), eps) {
            return None;
        }
        Some(Equilibrated { chol, scale })
    }

    fn invert(xtw_x: &[f64], n: usize, eps: f64) -> Option<Vec<f64>> {
        let eq = equilibrate(xtw_x, n, eps)?;
        // A^-1 = S (S A S)^-1 S
        let mut inv = eq.chol.inverse();
        for c in 0..n {
            for r in 0..n {
                inv[(r, c)] *= eq.scale[r] * eq.scale[c];
            }
        }
        Some(inv.as_slice().to_vec())
    }

    fn solve(xtw_x: &[f64], xtw_y: &[f64], n: usize, eps: f64) -> Option<Vec<f64>> {
        let eq = equilibrate(xtw_x, n, eps)?;
        let rhs = DVector::from_fn(n, |i, _| xtw_y[i] * eq.scale[i]);
        let z = eq.chol.solve(&rhs);
        Some((0..n).map(|i| z[i] * eq.scale[i]).collect())
    }

    /// Invert normal matrix X'WX using f64 precision.
    pub fn invert_normal_matrix_f64(xtw_x: &[f64], n_coeffs: usize) -> Option<Vec<f64>> {
        invert(xtw_x, n_coeffs, f64::EPSILON)
    }

    /// Solve normal equations X'WX * beta = X'Wy using f64 precision.
    pub fn solve_normal_equations_f64(
        xtw_x: &[f64],
        xtw_y: &[f64],
        n_coeffs: usize,
    ) -> Option<Vec<f64>> {
        solve(xtw_x, xtw_y, n_coeffs, f64::EPSILON)
    }

    /// Invert normal matrix X'WX, rank-checked at f32 precision.
    pub fn invert_normal_matrix_f32(xtw_x: &[f32], n_coeffs: usize) -> Option<Vec<f32>> {
        let wide: Vec<f64> = xtw_x.iter().map(|&v| v as f64).collect();
        let inv = invert(&wide, n_coeffs, f32::EPSILON as f64)?;
        Some(inv.into_iter().map(|v| v as f32).collect())
    }

    /// Solve normal equations X'WX * beta = X'Wy, rank-checked at f32 precision.
    pub fn solve_normal_equations_f32(
        xtw_x: &[f32],
        xtw_y: &[f32],
        n_coeffs: usize,
    ) -> Option<Vec<f32>> {
        let wide: Vec<f64> = xtw_x.iter().map(|&v| v as f64).collect();
        let rhs: Vec<f64> = xtw_y.iter().map(|&v| v as f64).collect();
        let beta = solve(&wide, &rhs, n_coeffs, f32::EPSILON as f64)?;
        Some(beta.into_iter().map(|v| v as f32).collect())
    }
}
