//! Multi-bandwidth (MGWR) adapter.
//!
//! ## Purpose
//!
//! This module provides the execution builder for selecting one bandwidth per
//! covariate by backfitting.
//!
//! ## Design notes
//!
//! * **Processing**: Builds the design matrix, validates, then runs the
//!   engine's [`Backfitter`].
//! * **Reuse**: Every per-covariate search uses the same criterion, method,
//!   bounds and tolerances as single-bandwidth selection.
//!
//! ## Invariants
//!
//! * The result holds one bandwidth per design column, intercept first.
//!
//! ## Non-goals
//!
//! * This adapter does not compute inference statistics for the final fit.

use core::fmt::Debug;

use crate::adapters::design_matrix;
use crate::algorithms::criterion::Criterion;
use crate::algorithms::evaluator::ModelEvaluator;
use crate::algorithms::gwr::GwrEvaluator;
use crate::engine::backfitting::{
    BackfitConfig, Backfitter, MultiConvergence, MultiInit, DEFAULT_MAX_ITER_MULTI,
    DEFAULT_TOL_MULTI,
};
use crate::engine::output::MultiSelectionResult;
use crate::engine::selector::{BandwidthSelector, SelectorConfig};
use crate::engine::validator::Validator;
use crate::math::kernel::{KernelFunction, KernelSpec};
use crate::math::linalg::FloatLinalg;
use crate::primitives::errors::GwrError;
use crate::search::SearchMethod;

// ============================================================================
// Multi Bandwidth Builder
// ============================================================================

/// Builder for the MGWR bandwidth selector.
#[derive(Debug, Clone)]
pub struct MultiBandwidthBuilder<T> {
    /// Kernel family.
    pub kernel: KernelFunction,

    /// Fixed (distance) rather than adaptive (neighbor count) bandwidths.
    pub fixed: bool,

    /// Criterion minimized by every per-covariate search.
    pub criterion: Criterion,

    /// Per-covariate search strategy.
    pub search_method: SearchMethod,

    /// Lower bandwidth bound.
    pub bw_min: Option<T>,

    /// Upper bandwidth bound.
    pub bw_max: Option<T>,

    /// Interval search step.
    pub interval: Option<T>,

    /// Golden-section score tolerance.
    pub tol: Option<T>,

    /// Per-covariate search iteration cap.
    pub max_iter: Option<usize>,

    /// Prepend an intercept column.
    pub constant: bool,

    /// Score interval grids in parallel.
    pub parallel: bool,

    /// Backfitting tolerance.
    pub tol_multi: T,

    /// Backfitting sweep cap.
    pub max_iter_multi: usize,

    /// Initial decomposition.
    pub multi_init: MultiInit,

    /// Convergence measure.
    pub multi_convergence: MultiConvergence,

    /// Tracks if any parameter was set multiple times (for validation)
    #[doc(hidden)]
    pub(crate) duplicate_param: Option<&'static str>,
}

impl<T: FloatLinalg + Debug + Send + Sync> Default for MultiBandwidthBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatLinalg + Debug + Send + Sync> MultiBandwidthBuilder<T> {
    /// Create a builder with default parameters.
    fn new() -> Self {
        Self {
            kernel: KernelFunction::default(),
            fixed: false,
            criterion: Criterion::default(),
            search_method: SearchMethod::default(),
            bw_min: None,
            bw_max: None,
            interval: None,
            tol: None,
            max_iter: None,
            constant: true,
            parallel: false,
            tol_multi: T::from(DEFAULT_TOL_MULTI).unwrap(),
            max_iter_multi: DEFAULT_MAX_ITER_MULTI,
            multi_init: MultiInit::default(),
            multi_convergence: MultiConvergence::default(),
            duplicate_param: None,
        }
    }

    // ========================================================================
    // Shared Setters
    // ========================================================================

    /// Set the kernel family.
    pub fn kernel(mut self, kernel: KernelFunction) -> Self {
        self.kernel = kernel;
        self
    }

    /// Use fixed (distance) bandwidths.
    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    /// Set the criterion to minimize.
    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Set the per-covariate search strategy.
    pub fn search_method(mut self, method: SearchMethod) -> Self {
        self.search_method = method;
        self
    }

    /// Set the lower bandwidth bound.
    pub fn bw_min(mut self, bw_min: T) -> Self {
        self.bw_min = Some(bw_min);
        self
    }

    /// Set the upper bandwidth bound.
    pub fn bw_max(mut self, bw_max: T) -> Self {
        self.bw_max = Some(bw_max);
        self
    }

    /// Set the interval search step.
    pub fn interval(mut self, interval: T) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Set the golden-section score tolerance.
    pub fn tol(mut self, tol: T) -> Self {
        self.tol = Some(tol);
        self
    }

    /// Set the per-covariate search iteration cap.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    /// Prepend an intercept column to the covariates.
    pub fn constant(mut self, constant: bool) -> Self {
        self.constant = constant;
        self
    }

    /// Score interval grids in parallel.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    // ========================================================================
    // Backfitting Setters
    // ========================================================================

    /// Set the backfitting tolerance.
    pub fn tol_multi(mut self, tol_multi: T) -> Self {
        self.tol_multi = tol_multi;
        self
    }

    /// Set the backfitting sweep cap.
    pub fn max_iter_multi(mut self, max_iter_multi: usize) -> Self {
        self.max_iter_multi = max_iter_multi;
        self
    }

    /// Set the initial decomposition.
    pub fn multi_init(mut self, init: MultiInit) -> Self {
        self.multi_init = init;
        self
    }

    /// Set the convergence measure.
    pub fn multi_convergence(mut self, convergence: MultiConvergence) -> Self {
        self.multi_convergence = convergence;
        self
    }

    // ========================================================================
    // Build Method
    // ========================================================================

    /// Build the selector.
    pub fn build(self) -> Result<MultiBandwidth<T>, GwrError> {
        // Check for duplicate parameter configuration
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let selector_config = SelectorConfig {
            criterion: self.criterion,
            search_method: self.search_method,
            bw_min: self.bw_min,
            bw_max: self.bw_max,
            interval: self.interval,
            tol: self.tol,
            max_iter: self.max_iter,
            parallel: self.parallel,
        };
        selector_config.validate()?;

        let backfit_config = BackfitConfig {
            init: self.multi_init,
            convergence: self.multi_convergence,
            tol_multi: self.tol_multi,
            max_iter_multi: self.max_iter_multi,
        };
        backfit_config.validate()?;

        Ok(MultiBandwidth {
            kernel: KernelSpec::new(self.kernel, self.fixed),
            backfitter: Backfitter::new(BandwidthSelector::new(selector_config), backfit_config),
            constant: self.constant,
        })
    }
}

// ============================================================================
// Multi Bandwidth Processor
// ============================================================================

/// Configured MGWR bandwidth selector.
#[derive(Debug, Clone)]
pub struct MultiBandwidth<T> {
    kernel: KernelSpec,
    backfitter: Backfitter<T>,
    constant: bool,
}

impl<T: FloatLinalg + Debug + Send + Sync> MultiBandwidth<T> {
    /// Kernel the selector uses.
    pub fn kernel(&self) -> KernelSpec {
        self.kernel
    }

    /// Select one bandwidth per covariate for `y` on covariates `x`
    /// (row-major `n x p`) at the given locations.
    pub fn search(
        &self,
        coords: &[[T; 2]],
        y: &[T],
        x: &[T],
    ) -> Result<MultiSelectionResult<T>, GwrError> {
        let (design, k) = design_matrix(x, y.len(), self.constant)?;
        Validator::validate_inputs(coords, y, &design, k)?;

        let evaluator = GwrEvaluator::new(coords, self.kernel);
        self.search_with(&evaluator, y, &design, k)
    }

    /// Backfit with a caller-supplied evaluator.
    ///
    /// `design` is used as given (no intercept is added).
    pub fn search_with<E>(
        &self,
        evaluator: &E,
        y: &[T],
        design: &[T],
        n_vars: usize,
    ) -> Result<MultiSelectionResult<T>, GwrError>
    where
        E: ModelEvaluator<T> + Sync + ?Sized,
    {
        self.backfitter.fit(evaluator, y, design, n_vars)
    }
}
