//! High-level API for GWR bandwidth selection.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point. It implements a
//! fluent builder for configuring the kernel, criterion and search, and for
//! choosing between single-bandwidth (GWR) and per-covariate (MGWR) selection.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with sensible defaults for all parameters.
//! * **Polymorphic**: Uses marker types to transition to specialized mode builders.
//! * **Validated**: Parameters are validated when `.build()` is called on the mode builder.
//! * **Type-Safe**: Generic over `Float` types for flexible precision.
//!
//! ## Key concepts
//!
//! * **Selection Modes**: Single and Multi.
//! * **Configuration Flow**: Builder pattern ending in `.mode(Mode::Type)`.
//! * **Duplicates**: Setting a parameter twice is reported by `.build()`.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`SelectorBuilder`] via `Selector::new()`.
//! 2. Chain configuration methods (`.kernel()`, `.criterion()`, etc.).
//! 3. Select a mode via `.mode(Mode::Single)` to get an execution builder.

use core::fmt::Debug;

use crate::math::linalg::FloatLinalg;

// Publicly re-exported types
pub use crate::adapters::multi::{MultiBandwidth, MultiBandwidthBuilder};
pub use crate::adapters::single::{SingleBandwidth, SingleBandwidthBuilder};
pub use crate::algorithms::criterion::Criterion;
pub use crate::algorithms::evaluator::{LocalFit, ModelEvaluator};
pub use crate::algorithms::gwr::GwrEvaluator;
pub use crate::engine::backfitting::{MultiConvergence, MultiInit};
pub use crate::engine::output::{MultiSelectionResult, SelectionResult};
pub use crate::math::kernel::{KernelFunction, KernelSpec};
pub use crate::primitives::bandwidth::Bandwidth;
pub use crate::primitives::cache::Evaluation;
pub use crate::primitives::errors::GwrError;
pub use crate::search::SearchMethod;

/// Marker types for selecting the selection mode.
#[allow(non_snake_case)]
pub mod Mode {
    pub use super::{Multi, Single};
}

/// Fluent builder for configuring bandwidth selection.
#[derive(Debug, Clone)]
pub struct SelectorBuilder<T: FloatLinalg + Debug + Send + Sync> {
    /// Kernel family.
    pub kernel: Option<KernelFunction>,

    /// Fixed (distance) rather than adaptive (neighbor count) bandwidth.
    pub fixed: Option<bool>,

    /// Criterion to minimize.
    pub criterion: Option<Criterion>,

    /// Search strategy.
    pub search_method: Option<SearchMethod>,

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
    pub constant: Option<bool>,

    /// Backfitting tolerance (Multi only).
    pub tol_multi: Option<T>,

    /// Backfitting sweep cap (Multi only).
    pub max_iter_multi: Option<usize>,

    /// Backfitting initialization (Multi only).
    pub multi_init: Option<MultiInit>,

    /// Backfitting convergence measure (Multi only).
    pub multi_convergence: Option<MultiConvergence>,

    /// Score interval grids in parallel.
    pub parallel: Option<bool>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl<T: FloatLinalg + Debug + Send + Sync> Default for SelectorBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatLinalg + Debug + Send + Sync> SelectorBuilder<T> {
    /// Select a mode to transition to an execution builder.
    pub fn mode<M>(self, _mode: M) -> M::Output
    where
        M: SelectionMode<T>,
    {
        M::convert(self)
    }

    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            kernel: None,
            fixed: None,
            criterion: None,
            search_method: None,
            bw_min: None,
            bw_max: None,
            interval: None,
            tol: None,
            max_iter: None,
            constant: None,
            tol_multi: None,
            max_iter_multi: None,
            multi_init: None,
            multi_convergence: None,
            parallel: None,
            duplicate_param: None,
        }
    }

    /// Set the kernel family.
    pub fn kernel(mut self, kernel: KernelFunction) -> Self {
        if self.kernel.is_some() {
            self.duplicate_param = Some("kernel");
        }
        self.kernel = Some(kernel);
        self
    }

    /// Use a fixed (distance) bandwidth instead of a neighbor count.
    pub fn fixed(mut self, fixed: bool) -> Self {
        if self.fixed.is_some() {
            self.duplicate_param = Some("fixed");
        }
        self.fixed = Some(fixed);
        self
    }

    /// Set the criterion to minimize.
    pub fn criterion(mut self, criterion: Criterion) -> Self {
        if self.criterion.is_some() {
            self.duplicate_param = Some("criterion");
        }
        self.criterion = Some(criterion);
        self
    }

    /// Set the search strategy.
    pub fn search_method(mut self, method: SearchMethod) -> Self {
        if self.search_method.is_some() {
            self.duplicate_param = Some("search_method");
        }
        self.search_method = Some(method);
        self
    }

    /// Set the lower bandwidth bound.
    pub fn bw_min(mut self, bw_min: T) -> Self {
        if self.bw_min.is_some() {
            self.duplicate_param = Some("bw_min");
        }
        self.bw_min = Some(bw_min);
        self
    }

    /// Set the upper bandwidth bound.
    pub fn bw_max(mut self, bw_max: T) -> Self {
        if self.bw_max.is_some() {
            self.duplicate_param = Some("bw_max");
        }
        self.bw_max = Some(bw_max);
        self
    }

    /// Set the interval search step.
    pub fn interval(mut self, interval: T) -> Self {
        if self.interval.is_some() {
            self.duplicate_param = Some("interval");
        }
        self.interval = Some(interval);
        self
    }

    /// Set the golden-section score tolerance.
    pub fn tol(mut self, tol: T) -> Self {
        if self.tol.is_some() {
            self.duplicate_param = Some("tol");
        }
        self.tol = Some(tol);
        self
    }

    /// Set the search iteration cap.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        if self.max_iter.is_some() {
            self.duplicate_param = Some("max_iter");
        }
        self.max_iter = Some(max_iter);
        self
    }

    /// Prepend an intercept column to the covariates (default: true).
    pub fn constant(mut self, constant: bool) -> Self {
        if self.constant.is_some() {
            self.duplicate_param = Some("constant");
        }
        self.constant = Some(constant);
        self
    }

    /// Set the backfitting tolerance.
    pub fn tol_multi(mut self, tol_multi: T) -> Self {
        if self.tol_multi.is_some() {
            self.duplicate_param = Some("tol_multi");
        }
        self.tol_multi = Some(tol_multi);
        self
    }

    /// Set the backfitting sweep cap.
    pub fn max_iter_multi(mut self, max_iter_multi: usize) -> Self {
        if self.max_iter_multi.is_some() {
            self.duplicate_param = Some("max_iter_multi");
        }
        self.max_iter_multi = Some(max_iter_multi);
        self
    }

    /// Set the backfitting initialization.
    pub fn multi_init(mut self, init: MultiInit) -> Self {
        if self.multi_init.is_some() {
            self.duplicate_param = Some("multi_init");
        }
        self.multi_init = Some(init);
        self
    }

    /// Set the backfitting convergence measure.
    pub fn multi_convergence(mut self, convergence: MultiConvergence) -> Self {
        if self.multi_convergence.is_some() {
            self.duplicate_param = Some("multi_convergence");
        }
        self.multi_convergence = Some(convergence);
        self
    }

    /// Score interval grids on the rayon pool (`parallel` feature).
    pub fn parallel(mut self, parallel: bool) -> Self {
        if self.parallel.is_some() {
            self.duplicate_param = Some("parallel");
        }
        self.parallel = Some(parallel);
        self
    }
}

/// Trait for transitioning from a generic builder to an execution builder.
pub trait SelectionMode<T: FloatLinalg + Debug + Send + Sync> {
    /// The output execution builder.
    type Output;

    /// Convert a generic [`SelectorBuilder`] into a specialized execution builder.
    fn convert(builder: SelectorBuilder<T>) -> Self::Output;
}

/// Marker for single-bandwidth (GWR) selection.
#[derive(Debug, Clone, Copy)]
pub struct Single;

impl<T: FloatLinalg + Debug + Send + Sync> SelectionMode<T> for Single {
    type Output = SingleBandwidthBuilder<T>;

    fn convert(builder: SelectorBuilder<T>) -> Self::Output {
        let mut result = SingleBandwidthBuilder::default();

        if let Some(kernel) = builder.kernel {
            result.kernel = kernel;
        }
        if let Some(fixed) = builder.fixed {
            result.fixed = fixed;
        }
        if let Some(criterion) = builder.criterion {
            result.criterion = criterion;
        }
        if let Some(method) = builder.search_method {
            result.search_method = method;
        }
        result.bw_min = builder.bw_min;
        result.bw_max = builder.bw_max;
        result.interval = builder.interval;
        result.tol = builder.tol;
        result.max_iter = builder.max_iter;
        if let Some(constant) = builder.constant {
            result.constant = constant;
        }
        if let Some(parallel) = builder.parallel {
            result.parallel = parallel;
        }
        if builder.tol_multi.is_some()
            || builder.max_iter_multi.is_some()
            || builder.multi_init.is_some()
            || builder.multi_convergence.is_some()
        {
            log::debug!("backfitting settings are ignored in single-bandwidth mode");
        }

        result.duplicate_param = builder.duplicate_param;

        result
    }
}

/// Marker for per-covariate (MGWR) selection.
#[derive(Debug, Clone, Copy)]
pub struct Multi;

impl<T: FloatLinalg + Debug + Send + Sync> SelectionMode<T> for Multi {
    type Output = MultiBandwidthBuilder<T>;

    fn convert(builder: SelectorBuilder<T>) -> Self::Output {
        let mut result = MultiBandwidthBuilder::default();

        if let Some(kernel) = builder.kernel {
            result.kernel = kernel;
        }
        if let Some(fixed) = builder.fixed {
            result.fixed = fixed;
        }
        if let Some(criterion) = builder.criterion {
            result.criterion = criterion;
        }
        if let Some(method) = builder.search_method {
            result.search_method = method;
        }
        result.bw_min = builder.bw_min;
        result.bw_max = builder.bw_max;
        result.interval = builder.interval;
        result.tol = builder.tol;
        result.max_iter = builder.max_iter;
        if let Some(constant) = builder.constant {
            result.constant = constant;
        }
        if let Some(parallel) = builder.parallel {
            result.parallel = parallel;
        }
        if let Some(tol_multi) = builder.tol_multi {
            result.tol_multi = tol_multi;
        }
        if let Some(max_iter_multi) = builder.max_iter_multi {
            result.max_iter_multi = max_iter_multi;
        }
        if let Some(init) = builder.multi_init {
            result.multi_init = init;
        }
        if let Some(convergence) = builder.multi_convergence {
            result.multi_convergence = convergence;
        }

        result.duplicate_param = builder.duplicate_param;

        result
    }
}
