//! Single-bandwidth adapter.
//!
//! ## Purpose
//!
//! This module provides the execution builder for selecting one bandwidth
//! shared by every covariate of a GWR model.
//!
//! ## Design notes
//!
//! * **Processing**: Builds the design matrix, validates, then runs one search.
//! * **Delegation**: Bounds, dispatch and rounding live in the engine's
//!   [`BandwidthSelector`].
//! * **Generics**: Generic over `Float` types.
//!
//! ## Invariants
//!
//! * Coordinates, response and covariate rows must have the same length.
//! * All values must be finite.
//!
//! ## Non-goals
//!
//! * This adapter does not select per-covariate bandwidths (use the multi
//!   adapter).

use core::fmt::Debug;

use crate::adapters::design_matrix;
use crate::algorithms::criterion::Criterion;
use crate::algorithms::evaluator::ModelEvaluator;
use crate::algorithms::gwr::GwrEvaluator;
use crate::engine::output::SelectionResult;
use crate::engine::selector::{BandwidthSelector, SelectorConfig};
use crate::engine::validator::Validator;
use crate::math::kernel::{KernelFunction, KernelSpec};
use crate::math::linalg::FloatLinalg;
use crate::primitives::cache::{CovariateSubset, EvaluationCache};
use crate::primitives::errors::GwrError;
use crate::search::SearchMethod;

// ============================================================================
// Single Bandwidth Builder
// ============================================================================

/// Builder for the single-bandwidth selector.
#[derive(Debug, Clone)]
pub struct SingleBandwidthBuilder<T> {
    /// Kernel family.
    pub kernel: KernelFunction,

    /// Fixed (distance) rather than adaptive (neighbor count) bandwidth.
    pub fixed: bool,

    /// Criterion to minimize.
    pub criterion: Criterion,

    /// Search strategy.
    pub search_method: SearchMethod,

    /// Lower bandwidth bound.
    pub bw_min: Option<T>,

    /// Upper bandwidth bound.
    pub bw_max: Option<T>,

    /// Interval search step.
    pub interval: Option<T>,

    /// Golden-section score tolerance.
    pub tol: Option<T>,

    /// Search iteration cap.
    pub max_iter: Option<usize>,

    /// Prepend an intercept column.
    pub constant: bool,

    /// Score interval grids in parallel.
    pub parallel: bool,

    /// Tracks if any parameter was set multiple times (for validation)
    #[doc(hidden)]
    pub(crate) duplicate_param: Option<&'static str>,
}

impl<T: FloatLinalg + Debug + Send + Sync> Default for SingleBandwidthBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatLinalg + Debug + Send + Sync> SingleBandwidthBuilder<T> {
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
            duplicate_param: None,
        }
    }

    // ========================================================================
    // Setters
    // ========================================================================

    /// Set the kernel family.
    pub fn kernel(mut self, kernel: KernelFunction) -> Self {
        self.kernel = kernel;
        self
    }

    /// Use a fixed (distance) bandwidth.
    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    /// Set the criterion to minimize.
    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Set the search strategy.
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

    /// Set the search iteration cap.
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
    // Build Method
    // ========================================================================

    pub(crate) fn selector_config(&self) -> SelectorConfig<T> {
        SelectorConfig {
            criterion: self.criterion,
            search_method: self.search_method,
            bw_min: self.bw_min,
            bw_max: self.bw_max,
            interval: self.interval,
            tol: self.tol,
            max_iter: self.max_iter,
            parallel: self.parallel,
        }
    }

    /// Build the selector.
    pub fn build(self) -> Result<SingleBandwidth<T>, GwrError> {
        // Check for duplicate parameter configuration
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let config = self.selector_config();
        config.validate()?;

        Ok(SingleBandwidth {
            kernel: KernelSpec::new(self.kernel, self.fixed),
            selector: BandwidthSelector::new(config),
            constant: self.constant,
        })
    }
}

// ============================================================================
// Single Bandwidth Processor
// ============================================================================

/// Configured single-bandwidth selector.
#[derive(Debug, Clone)]
pub struct SingleBandwidth<T> {
    kernel: KernelSpec,
    selector: BandwidthSelector<T>,
    constant: bool,
}

impl<T: FloatLinalg + Debug + Send + Sync> SingleBandwidth<T> {
    /// Kernel the selector uses.
    pub fn kernel(&self) -> KernelSpec {
        self.kernel
    }

    /// Select a bandwidth for `y` on covariates `x` (row-major `n x p`) at
    /// the given locations.
    pub fn search(
        &self,
        coords: &[[T; 2]],
        y: &[T],
        x: &[T],
    ) -> Result<SelectionResult<T>, GwrError> {
        let (design, k) = design_matrix(x, y.len(), self.constant)?;
        Validator::validate_inputs(coords, y, &design, k)?;

        let evaluator = GwrEvaluator::new(coords, self.kernel);
        self.search_with(&evaluator, y, &design, k)
    }

    /// Select a bandwidth with a caller-supplied evaluator.
    ///
    /// `design` is used as given (no intercept is added).
    pub fn search_with<E>(
        &self,
        evaluator: &E,
        y: &[T],
        design: &[T],
        n_vars: usize,
    ) -> Result<SelectionResult<T>, GwrError>
    where
        E: ModelEvaluator<T> + Sync + ?Sized,
    {
        let mut cache = EvaluationCache::new();
        self.selector
            .select(evaluator, y, design, n_vars, CovariateSubset::All, &mut cache)
    }
}
