//! Global ordinary least squares.
//!
//! Used to seed multiscale backfitting: the OLS coefficients are spread over
//! every location, which is the GWR fit in the limit of an infinite bandwidth.

use crate::algorithms::evaluator::LocalFit;
use crate::math::linalg::FloatLinalg;
use crate::primitives::errors::GwrError;

/// Fit `y ~ x` by ordinary least squares.
///
/// The returned fit repeats the global coefficients on every row of `params`.
pub fn ols_fit<T: FloatLinalg>(y: &[T], x: &[T], n_vars: usize) -> Result<LocalFit<T>, GwrError> {
    let n = y.len();
    let k = n_vars;
    if x.len() != n * k {
        return Err(GwrError::MismatchedInputs {
            coords: n,
            y_len: n,
            x_len: x.len(),
        });
    }

    let mut xtx = vec![T::zero(); k * k];
    let mut xty = vec![T::zero(); k];
    for (row, &yi) in x.chunks_exact(k).zip(y.iter()) {
        for c in 0..k {
            xty[c] = xty[c] + row[c] * yi;
            for r in 0..k {
                xtx[c * k + r] = xtx[c * k + r] + row[c] * row[r];
            }
        }
    }

    let inv = T::invert_normal(&xtx, k).ok_or(GwrError::SingularFit {
        location: 0,
        bandwidth: f64::INFINITY,
    })?;
    let beta = T::solve_normal(&xtx, &xty, k).ok_or(GwrError::SingularFit {
        location: 0,
        bandwidth: f64::INFINITY,
    })?;

    let mut params = Vec::with_capacity(n * k);
    let mut fitted = Vec::with_capacity(n);
    let mut influence = Vec::with_capacity(n);
    for row in x.chunks_exact(k) {
        params.extend_from_slice(&beta);
        fitted.push(
            row.iter()
                .zip(beta.iter())
                .fold(T::zero(), |acc, (&a, &b)| acc + a * b),
        );
        influence.push(T::compute_leverage(row, &inv, k));
    }

    Ok(LocalFit::new(y, k, params, fitted, influence))
}
