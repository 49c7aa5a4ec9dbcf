//! The model evaluator seam.
//!
//! ## Purpose
//!
//! Bandwidth searches treat the model fit as a black box:
//! `fit(y, X, bandwidth) -> LocalFit`, scored afterwards by a
//! [`Criterion`](crate::algorithms::criterion::Criterion). This module defines
//! that contract and the fit result it returns.
//!
//! ## Design notes
//!
//! * Implementations must be pure functions of their inputs, so results can
//!   be cached by bandwidth.
//! * A bandwidth too small to give every location a non-singular local design
//!   must be reported as [`GwrError::SingularFit`], never as NaN output.
//! * The design matrix is row-major `n x n_vars`.
//!
//! ## Invariants
//!
//! * `fitted[i] + residuals[i] == y[i]` for every observation.
//! * `trace_hat` is the sum of `influence`.

use num_traits::Float;

use crate::math::kernel::KernelSpec;
use crate::primitives::cache::FitDiagnostics;
use crate::primitives::errors::GwrError;

/// Result of fitting a (geographically weighted) regression at one bandwidth.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFit<T> {
    /// Number of observations.
    pub n: usize,

    /// Number of design columns.
    pub n_vars: usize,

    /// Local coefficients, row-major `n x n_vars`.
    pub params: Vec<T>,

    /// Fitted values.
    pub fitted: Vec<T>,

    /// Response minus fitted values.
    pub residuals: Vec<T>,

    /// Diagonal of the hat matrix.
    pub influence: Vec<T>,

    /// Trace of the hat matrix.
    pub trace_hat: T,

    /// Residual sum of squares.
    pub rss: T,
}

impl<T: Float> LocalFit<T> {
    /// Assemble a fit from its per-observation pieces.
    pub fn new(y: &[T], n_vars: usize, params: Vec<T>, fitted: Vec<T>, influence: Vec<T>) -> Self {
        let residuals: Vec<T> = y
            .iter()
            .zip(fitted.iter())
            .map(|(&obs, &fit)| obs - fit)
            .collect();
        let rss = residuals.iter().fold(T::zero(), |acc, &r| acc + r * r);
        let trace_hat = influence.iter().fold(T::zero(), |acc, &h| acc + h);
        Self {
            n: y.len(),
            n_vars,
            params,
            fitted,
            residuals,
            influence,
            trace_hat,
            rss,
        }
    }

    /// Local coefficient of column `j` at observation `i`.
    #[inline]
    pub fn param(&self, i: usize, j: usize) -> T {
        self.params[i * self.n_vars + j]
    }

    /// Gaussian log-likelihood: `-n/2 * (1 + ln(2 pi RSS / n))`.
    pub fn log_likelihood(&self) -> T {
        let n = T::from(self.n).unwrap();
        let two = T::from(2.0).unwrap();
        let two_pi = T::from(core::f64::consts::TAU).unwrap();
        -(n / two) * (T::one() + (two_pi * self.rss / n).ln())
    }

    /// Diagnostics kept in the evaluation cache.
    pub fn diagnostics(&self) -> FitDiagnostics<T> {
        FitDiagnostics {
            rss: self.rss,
            trace_hat: self.trace_hat,
        }
    }
}

/// External collaborator that fits the model for a candidate bandwidth.
pub trait ModelEvaluator<T: Float> {
    /// Number of observations the evaluator was built for.
    fn n_obs(&self) -> usize;

    /// Kernel family and bandwidth type.
    fn kernel(&self) -> KernelSpec;

    /// Smallest nonzero and largest pairwise distance between locations.
    fn distance_range(&self) -> (T, T);

    /// Fit the model for response `y` and row-major design `x` (`n x n_vars`).
    fn fit(&self, y: &[T], x: &[T], n_vars: usize, bandwidth: T) -> Result<LocalFit<T>, GwrError>;
}
