//! Multiscale (MGWR) backfitting.
//!
//! ## Purpose
//!
//! Selects one bandwidth per design column. Starting from an initial
//! decomposition of the fit into per-column partial fits, each sweep visits
//! the columns in order, re-selects the bandwidth of column `j` against the
//! partial residual `partial_j + residual`, refits that column alone and
//! updates the residual in place (Gauss-Seidel). Sweeps repeat until the
//! convergence measure drops below `tol_multi` or `max_iter_multi` sweeps
//! have run.
//!
//! ## Key concepts
//!
//! * **Partial fit**: the contribution `x_ij * beta_ij` of column `j`.
//! * **Score of change**: root mean squared change of the partial fits,
//!   relative to the size of the total fit.
//!
//! ## Invariants
//!
//! * `y == sum_j partial_j + residual` after every column update.
//! * Column order is fixed; repeated runs give bit-identical results.
//! * Non-convergence is reported through the result, never as an error.

use core::fmt;
use core::str::FromStr;

use num_traits::Float;

use crate::algorithms::criterion::Criterion;
use crate::algorithms::evaluator::ModelEvaluator;
use crate::algorithms::ols::ols_fit;
use crate::engine::output::MultiSelectionResult;
use crate::engine::selector::BandwidthSelector;
use crate::engine::validator::Validator;
use crate::math::linalg::FloatLinalg;
use crate::primitives::bandwidth::Bandwidth;
use crate::primitives::cache::{CovariateSubset, EvaluationCache};
use crate::primitives::errors::GwrError;

/// Default backfitting tolerance.
pub const DEFAULT_TOL_MULTI: f64 = 1.0e-5;

/// Default sweep cap.
pub const DEFAULT_MAX_ITER_MULTI: usize = 200;

// ============================================================================
// Options
// ============================================================================

/// How the partial fits are initialized before the first sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultiInit {
    /// Independent single-column selection against the full response.
    #[default]
    PerCovariate,

    /// One global GWR bandwidth on all columns.
    Global,

    /// Ordinary least squares.
    Ols,
}

impl MultiInit {
    /// Get the name of the initialization.
    pub const fn name(&self) -> &'static str {
        match self {
            MultiInit::PerCovariate => "per_covariate",
            MultiInit::Global => "global",
            MultiInit::Ols => "ols",
        }
    }
}

impl fmt::Display for MultiInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MultiInit {
    type Err = GwrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_covariate" | "covariate" => Ok(MultiInit::PerCovariate),
            "global" | "gwr" => Ok(MultiInit::Global),
            "ols" => Ok(MultiInit::Ols),
            _ => Err(GwrError::InvalidInput(format!(
                "unknown backfitting initialization '{}'",
                s
            ))),
        }
    }
}

/// Convergence measure compared against `tol_multi` after each sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultiConvergence {
    /// Relative root mean squared change of the partial fits.
    #[default]
    ScoreOfChange,

    /// Relative change of the residual sum of squares.
    ResidualSumOfSquares,

    /// Largest relative change of any bandwidth.
    Bandwidths,
}

impl MultiConvergence {
    /// Get the name of the measure.
    pub const fn name(&self) -> &'static str {
        match self {
            MultiConvergence::ScoreOfChange => "score_of_change",
            MultiConvergence::ResidualSumOfSquares => "rss",
            MultiConvergence::Bandwidths => "bandwidths",
        }
    }
}

impl fmt::Display for MultiConvergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MultiConvergence {
    type Err = GwrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "score_of_change" | "soc" => Ok(MultiConvergence::ScoreOfChange),
            "rss" | "rss_score" => Ok(MultiConvergence::ResidualSumOfSquares),
            "bandwidths" | "bw" => Ok(MultiConvergence::Bandwidths),
            _ => Err(GwrError::InvalidInput(format!(
                "unknown backfitting convergence measure '{}'",
                s
            ))),
        }
    }
}

/// Backfitting settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackfitConfig<T> {
    /// Initial decomposition.
    pub init: MultiInit,

    /// Convergence measure.
    pub convergence: MultiConvergence,

    /// Stop once the convergence measure is below this value.
    pub tol_multi: T,

    /// Sweep cap.
    pub max_iter_multi: usize,
}

impl<T: Float> Default for BackfitConfig<T> {
    fn default() -> Self {
        Self {
            init: MultiInit::default(),
            convergence: MultiConvergence::default(),
            tol_multi: T::from(DEFAULT_TOL_MULTI).unwrap(),
            max_iter_multi: DEFAULT_MAX_ITER_MULTI,
        }
    }
}

impl<T: Float> BackfitConfig<T> {
    /// Check tolerance and sweep cap.
    pub fn validate(&self) -> Result<(), GwrError> {
        Validator::validate_tolerance(self.tol_multi)?;
        Validator::validate_iterations(self.max_iter_multi)
    }
}

// ============================================================================
// State
// ============================================================================

/// Mutable backfitting state, owned by one run.
#[derive(Debug, Clone)]
struct BackfitState<T> {
    n: usize,
    k: usize,
    bandwidths: Vec<Bandwidth<T>>,
    /// Row-major `n x k`.
    partial_fits: Vec<T>,
    /// Row-major `n x k`.
    params: Vec<T>,
    residuals: Vec<T>,
}

impl<T: Float> BackfitState<T> {
    fn rss(&self) -> T {
        self.residuals
            .iter()
            .fold(T::zero(), |acc, &r| acc + r * r)
    }

    fn bandwidth_values(&self) -> Vec<T> {
        self.bandwidths.iter().map(|bw| bw.value()).collect()
    }

    fn column_partial(&self, j: usize) -> impl Iterator<Item = T> + '_ {
        (0..self.n).map(move |i| self.partial_fits[i * self.k + j])
    }

    fn total_fit(&self) -> Vec<T> {
        self.partial_fits
            .chunks(self.k)
            .map(|row| row.iter().fold(T::zero(), |acc, &v| acc + v))
            .collect()
    }
}

/// Copy column `j` out of a row-major `n x k` matrix.
fn column<T: Float>(x: &[T], k: usize, j: usize) -> Vec<T> {
    x.chunks(k).map(|row| row[j]).collect()
}

// ============================================================================
// Backfitting
// ============================================================================

/// MGWR backfitting driver.
#[derive(Debug, Clone, Copy)]
pub struct Backfitter<T> {
    selector: BandwidthSelector<T>,
    config: BackfitConfig<T>,
}

impl<T> Backfitter<T>
where
    T: FloatLinalg + Send + Sync,
{
    /// Create a driver from a per-column selector and backfitting settings.
    pub fn new(selector: BandwidthSelector<T>, config: BackfitConfig<T>) -> Self {
        Self { selector, config }
    }

    fn criterion(&self) -> Criterion {
        self.selector.config().criterion
    }

    /// Select one bandwidth per column of the row-major `n x k` design `x`.
    pub fn fit<E>(
        &self,
        evaluator: &E,
        y: &[T],
        x: &[T],
        k: usize,
    ) -> Result<MultiSelectionResult<T>, GwrError>
    where
        E: ModelEvaluator<T> + Sync + ?Sized,
    {
        self.config.validate()?;
        let n = y.len();
        if k == 0 || x.len() != n * k || evaluator.n_obs() != n {
            return Err(GwrError::MismatchedInputs {
                coords: evaluator.n_obs(),
                y_len: n,
                x_len: x.len(),
            });
        }
        let columns: Vec<Vec<T>> = (0..k).map(|j| column(x, k, j)).collect();

        let mut state = self.initialize(evaluator, y, x, k, &columns)?;
        log::info!(
            "backfitting initialized ({}): bandwidths {:?}",
            self.config.init,
            state
                .bandwidth_values()
                .iter()
                .map(|v| v.to_f64())
                .collect::<Vec<_>>()
        );

        let mut scores = Vec::new();
        let mut bandwidth_history = Vec::new();
        let mut converged = false;
        let mut partial_residual = vec![T::zero(); n];

        for sweep in 1..=self.config.max_iter_multi {
            let old_partials = state.partial_fits.clone();
            let old_bandwidths = state.bandwidth_values();
            let old_rss = state.rss();

            for (j, col) in columns.iter().enumerate() {
                for ((target, partial), &resid) in partial_residual
                    .iter_mut()
                    .zip(state.column_partial(j))
                    .zip(state.residuals.iter())
                {
                    *target = partial + resid;
                }

                let mut cache = EvaluationCache::new();
                let selection = self.selector.select(
                    evaluator,
                    &partial_residual,
                    col,
                    1,
                    CovariateSubset::Column(j),
                    &mut cache,
                )?;
                let bandwidth = selection.bandwidth;
                let fit = evaluator.fit(&partial_residual, col, 1, bandwidth.value())?;

                for i in 0..n {
                    state.partial_fits[i * k + j] = fit.fitted[i];
                    state.params[i * k + j] = fit.params[i];
                }
                state.residuals.copy_from_slice(&fit.residuals);
                state.bandwidths[j] = bandwidth;
            }

            let score = match self.config.convergence {
                MultiConvergence::ScoreOfChange => {
                    score_of_change(&old_partials, &state.partial_fits, n, k)
                }
                MultiConvergence::ResidualSumOfSquares => relative_change(old_rss, state.rss()),
                MultiConvergence::Bandwidths => old_bandwidths
                    .iter()
                    .zip(state.bandwidth_values())
                    .fold(T::zero(), |acc, (&old, new)| {
                        acc.max(relative_change(new, old))
                    }),
            };
            let values = state.bandwidth_values();
            log::info!(
                "backfitting sweep {}: {} = {:?}, bandwidths {:?}",
                sweep,
                self.config.convergence,
                score.to_f64(),
                values.iter().map(|v| v.to_f64()).collect::<Vec<_>>()
            );
            scores.push(score);
            bandwidth_history.push(values);

            if score < self.config.tol_multi {
                converged = true;
                break;
            }
        }

        if !converged {
            log::warn!(
                "backfitting did not converge within {} sweeps (last {} = {:?})",
                self.config.max_iter_multi,
                self.config.convergence,
                scores.last().and_then(|s| s.to_f64())
            );
        }

        let fitted = state.total_fit();
        Ok(MultiSelectionResult {
            bandwidths: state.bandwidths,
            criterion: self.criterion(),
            kernel: evaluator.kernel(),
            convergence: self.config.convergence,
            converged,
            sweeps: scores.len(),
            scores,
            bandwidth_history,
            params: state.params,
            fitted,
            residuals: state.residuals,
            n_vars: k,
        })
    }

    fn initialize<E>(
        &self,
        evaluator: &E,
        y: &[T],
        x: &[T],
        k: usize,
        columns: &[Vec<T>],
    ) -> Result<BackfitState<T>, GwrError>
    where
        E: ModelEvaluator<T> + Sync + ?Sized,
    {
        let n = y.len();
        let fixed = evaluator.kernel().fixed;
        let mut partial_fits = vec![T::zero(); n * k];
        let mut params = vec![T::zero(); n * k];

        match self.config.init {
            MultiInit::PerCovariate => {
                let mut bandwidths = Vec::with_capacity(k);
                for (j, col) in columns.iter().enumerate() {
                    let mut cache = EvaluationCache::new();
                    let selection = self.selector.select(
                        evaluator,
                        y,
                        col,
                        1,
                        CovariateSubset::Column(j),
                        &mut cache,
                    )?;
                    let bandwidth = selection.bandwidth;
                    let fit = evaluator.fit(y, col, 1, bandwidth.value())?;
                    for i in 0..n {
                        partial_fits[i * k + j] = fit.fitted[i];
                        params[i * k + j] = fit.params[i];
                    }
                    bandwidths.push(bandwidth);
                }
                let residuals = y
                    .iter()
                    .zip(partial_fits.chunks(k))
                    .map(|(&yi, row)| yi - row.iter().fold(T::zero(), |acc, &v| acc + v))
                    .collect();
                Ok(BackfitState {
                    n,
                    k,
                    bandwidths,
                    partial_fits,
                    params,
                    residuals,
                })
            }
            MultiInit::Global => {
                let mut cache = EvaluationCache::new();
                let selection =
                    self.selector
                        .select(evaluator, y, x, k, CovariateSubset::All, &mut cache)?;
                let bandwidth = selection.bandwidth;
                let fit = evaluator.fit(y, x, k, bandwidth.value())?;
                for (idx, (p, &xv)) in fit.params.iter().zip(x.iter()).enumerate() {
                    partial_fits[idx] = *p * xv;
                    params[idx] = *p;
                }
                Ok(BackfitState {
                    n,
                    k,
                    bandwidths: vec![bandwidth; k],
                    partial_fits,
                    params,
                    residuals: fit.residuals,
                })
            }
            MultiInit::Ols => {
                let fit = ols_fit(y, x, k)?;
                for (idx, (p, &xv)) in fit.params.iter().zip(x.iter()).enumerate() {
                    partial_fits[idx] = *p * xv;
                    params[idx] = *p;
                }
                // A global fit is the limit of the widest bandwidth.
                let (_, upper) = self.selector.bounds(evaluator, 1)?;
                Ok(BackfitState {
                    n,
                    k,
                    bandwidths: vec![Bandwidth::from_value(upper, fixed); k],
                    partial_fits,
                    params,
                    residuals: fit.residuals,
                })
            }
        }
    }
}

/// Root mean squared change of the partial fits relative to the total fit.
pub fn score_of_change<T: Float>(old: &[T], new: &[T], n: usize, k: usize) -> T {
    let n_t = T::from(n).unwrap();
    let change = old
        .iter()
        .zip(new.iter())
        .fold(T::zero(), |acc, (&o, &v)| acc + (v - o) * (v - o))
        / n_t;
    let scale = new
        .chunks(k)
        .map(|row| row.iter().fold(T::zero(), |acc, &v| acc + v))
        .fold(T::zero(), |acc, total| acc + total * total);

    if scale <= T::zero() {
        return if change <= T::zero() {
            T::zero()
        } else {
            T::infinity()
        };
    }
    (change / scale).sqrt()
}

/// `|value - reference| / |reference|`, zero when both are equal.
fn relative_change<T: Float>(value: T, reference: T) -> T {
    let diff = (value - reference).abs();
    if diff == T::zero() {
        return T::zero();
    }
    diff / reference.abs()
}
