//! Reference geographically weighted regression.
//!
//! ## Purpose
//!
//! This module fits a Gaussian GWR model at every observation location for a
//! given bandwidth: kernel weights from the distance matrix, a local weighted
//! least squares solve, and the hat-matrix diagonal needed by the criteria.
//!
//! ## Design notes
//!
//! * **Shared distances**: The distance matrix is built once per evaluator
//!   and reused by every fit of a search.
//! * **Degeneracy**: A location whose weighted design is rank deficient makes
//!   the whole fit fail with [`GwrError::SingularFit`].
//! * **Influence**: `h_ii = w_ii * x_i' (X'W_iX)^-1 x_i`.
//!
//! ## Key concepts
//!
//! * **Local fit**: beta_i = (X'W_iX)^-1 X'W_i y with W_i the kernel weights of
//!   every observation relative to location i.
//!
//! ## Non-goals
//!
//! * No GLM families, offsets or fixed (global) covariates.
//! * No standard errors or inference on the local coefficients.

use crate::algorithms::evaluator::{LocalFit, ModelEvaluator};
use crate::math::distance::DistanceMatrix;
use crate::math::kernel::KernelSpec;
use crate::math::linalg::{mat_vec, FloatLinalg};
use crate::primitives::errors::GwrError;

/// GWR evaluator over a fixed set of locations.
#[derive(Debug, Clone)]
pub struct GwrEvaluator<T> {
    distances: DistanceMatrix<T>,
    kernel: KernelSpec,
}

impl<T: FloatLinalg> GwrEvaluator<T> {
    /// Create an evaluator for the given locations and kernel.
    pub fn new(coords: &[[T; 2]], kernel: KernelSpec) -> Self {
        Self {
            distances: DistanceMatrix::from_coords(coords),
            kernel,
        }
    }

    /// Distance matrix shared by all fits.
    pub fn distances(&self) -> &DistanceMatrix<T> {
        &self.distances
    }

    /// Kernel weights of every observation relative to location `i`.
    pub fn weights_at(&self, i: usize, bandwidth: T, out: &mut [T]) {
        let local_bw = self
            .kernel
            .local_bandwidth(bandwidth, self.distances.sorted_row(i));
        for (w, &d) in out.iter_mut().zip(self.distances.row(i)) {
            *w = self.kernel.function.weight(d, local_bw);
        }
    }
}

impl<T: FloatLinalg> ModelEvaluator<T> for GwrEvaluator<T> {
    fn n_obs(&self) -> usize {
        self.distances.len()
    }

    fn kernel(&self) -> KernelSpec {
        self.kernel
    }

    fn distance_range(&self) -> (T, T) {
        let max = self.distances.max();
        (self.distances.min_nonzero().unwrap_or(max), max)
    }

    fn fit(&self, y: &[T], x: &[T], n_vars: usize, bandwidth: T) -> Result<LocalFit<T>, GwrError> {
        let n = self.n_obs();
        if y.len() != n || x.len() != n * n_vars {
            return Err(GwrError::MismatchedInputs {
                coords: n,
                y_len: y.len(),
                x_len: x.len(),
            });
        }

        let singular = |location: usize| GwrError::SingularFit {
            location,
            bandwidth: bandwidth.to_f64().unwrap_or(f64::NAN),
        };

        let k = n_vars;
        let mut weights = vec![T::zero(); n];
        let mut xtwx = vec![T::zero(); k * k];
        let mut xtwy = vec![T::zero(); k];
        let mut params = vec![T::zero(); n * k];
        let mut fitted = vec![T::zero(); n];
        let mut influence = vec![T::zero(); n];

        for i in 0..n {
            self.weights_at(i, bandwidth, &mut weights);

            let support = weights.iter().filter(|&&w| w > T::zero()).count();
            if support < k {
                return Err(singular(i));
            }

            xtwx.iter_mut().for_each(|v| *v = T::zero());
            xtwy.iter_mut().for_each(|v| *v = T::zero());
            for (obs, &w) in weights.iter().enumerate() {
                if w <= T::zero() {
                    continue;
                }
                let row = &x[obs * k..(obs + 1) * k];
                for c in 0..k {
                    let wxc = w * row[c];
                    xtwy[c] = xtwy[c] + wxc * y[obs];
                    for r in c..k {
                        xtwx[c * k + r] = xtwx[c * k + r] + wxc * row[r];
                    }
                }
            }
            // Mirror the lower triangle into the upper one.
            for c in 0..k {
                for r in (c + 1)..k {
                    xtwx[r * k + c] = xtwx[c * k + r];
                }
            }

            let inv = T::invert_normal(&xtwx, k).ok_or_else(|| singular(i))?;
            let beta = mat_vec(&inv, &xtwy, k);

            let xi = &x[i * k..(i + 1) * k];
            fitted[i] = xi
                .iter()
                .zip(beta.iter())
                .fold(T::zero(), |acc, (&a, &b)| acc + a * b);
            influence[i] = weights[i] * T::compute_leverage(xi, &inv, k);
            params[i * k..(i + 1) * k].copy_from_slice(&beta);
        }

        Ok(LocalFit::new(y, k, params, fitted, influence))
    }
}
