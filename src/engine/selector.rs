//! Bandwidth selector.
//!
//! ## Purpose
//!
//! Chooses one bandwidth for a response and design matrix by minimizing a
//! [`Criterion`] with one of the search strategies. It computes the search
//! bounds, dispatches to the configured strategy, and applies the reporting
//! rules to the result.
//!
//! ## Design notes
//!
//! * Default bounds for fixed kernels span half the smallest nonzero pairwise
//!   distance up to the largest pairwise distance. Adaptive kernels span
//!   `n_vars + 2` neighbors up to `n`.
//! * Adaptive searches run in integer mode; the selected count is never below
//!   `n_vars + 1`.
//! * Fixed-kernel golden-section results are reported to two decimals.
//! * Interval search can score its grid on the rayon pool (`parallel`
//!   feature); the argmin is reduced the same way as the sequential scan.
//!
//! ## Invariants
//!
//! * The selected bandwidth lies within the searched bounds.
//! * Every model fit goes through the caller's [`EvaluationCache`].
//!
//! ## Non-goals
//!
//! * Does not keep state between calls.

use num_traits::Float;

use crate::algorithms::criterion::Criterion;
use crate::algorithms::evaluator::ModelEvaluator;
use crate::engine::objective::CachedObjective;
#[cfg(feature = "parallel")]
use crate::engine::objective::score_bandwidth;
use crate::engine::output::SelectionResult;
use crate::engine::validator::Validator;
use crate::primitives::bandwidth::Bandwidth;
use crate::primitives::cache::{CovariateSubset, EvaluationCache};
use crate::primitives::errors::GwrError;
use crate::search::bounded::{BoundedBrent, DEFAULT_MAX_EVALS, DEFAULT_XATOL};
use crate::search::golden::{GoldenSection, DEFAULT_MAX_ITER, DEFAULT_TOL};
use crate::search::interval::IntervalSearch;
#[cfg(feature = "parallel")]
use crate::search::ProbeTracker;
use crate::search::{BandwidthSearch, Objective, SearchMethod, SearchOutcome};

// ============================================================================
// Configuration
// ============================================================================

/// Search settings shared by single and multiscale selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectorConfig<T> {
    /// Criterion to minimize.
    pub criterion: Criterion,

    /// Search strategy.
    pub search_method: SearchMethod,

    /// Lower bandwidth bound (default from the data when `None`).
    pub bw_min: Option<T>,

    /// Upper bandwidth bound (default from the data when `None`).
    pub bw_max: Option<T>,

    /// Interval search step.
    pub interval: Option<T>,

    /// Golden-section score tolerance.
    pub tol: Option<T>,

    /// Iteration (or evaluation) cap of the search.
    pub max_iter: Option<usize>,

    /// Score interval grids on the rayon pool.
    pub parallel: bool,
}

impl<T> Default for SelectorConfig<T> {
    fn default() -> Self {
        Self {
            criterion: Criterion::default(),
            search_method: SearchMethod::default(),
            bw_min: None,
            bw_max: None,
            interval: None,
            tol: None,
            max_iter: None,
            parallel: false,
        }
    }
}

impl<T: Float> SelectorConfig<T> {
    /// Check the settings that do not depend on the data.
    pub fn validate(&self) -> Result<(), GwrError> {
        if let Some(tol) = self.tol {
            Validator::validate_tolerance(tol)?;
        }
        if let Some(max_iter) = self.max_iter {
            Validator::validate_iterations(max_iter)?;
        }
        if let Some(interval) = self.interval {
            Validator::validate_interval(interval)?;
        }
        if let (Some(lo), Some(hi)) = (self.bw_min, self.bw_max) {
            Validator::validate_bound_order(lo, hi)?;
        }
        if self.search_method == SearchMethod::Interval {
            Validator::validate_interval_config(self.bw_min, self.bw_max, self.interval)?;
        }
        Ok(())
    }
}

/// Round to two decimal places.
#[inline]
fn round_to_hundredths<T: Float>(value: T) -> T {
    let hundred = T::from(100.0).unwrap();
    (value * hundred).round() / hundred
}

// ============================================================================
// Selector
// ============================================================================

/// Single-bandwidth selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandwidthSelector<T> {
    config: SelectorConfig<T>,
}

impl<T> BandwidthSelector<T>
where
    T: Float + Send + Sync + 'static,
{
    /// Create a selector from validated settings.
    pub fn new(config: SelectorConfig<T>) -> Self {
        Self { config }
    }

    /// Settings of this selector.
    pub fn config(&self) -> &SelectorConfig<T> {
        &self.config
    }

    /// Search bounds for a design with `n_vars` columns.
    pub fn bounds<E>(&self, evaluator: &E, n_vars: usize) -> Result<(T, T), GwrError>
    where
        E: ModelEvaluator<T> + ?Sized,
    {
        let fixed = evaluator.kernel().fixed;
        let n = evaluator.n_obs();
        let count = |k: usize| T::from(k.min(n)).unwrap();

        let (default_min, default_max) = if fixed {
            let (min_nonzero, max) = evaluator.distance_range();
            if max <= T::zero() {
                return Err(GwrError::InvalidBounds(
                    "all locations coincide; no fixed bandwidth is defined".to_string(),
                ));
            }
            (min_nonzero / T::from(2.0).unwrap(), max)
        } else {
            (count(n_vars + 2), count(n))
        };

        let mut lower = match self.config.bw_min {
            Some(v) => {
                Validator::validate_bound(v, "bw_min", fixed, n)?;
                v
            }
            None => default_min,
        };
        let upper = match self.config.bw_max {
            Some(v) => {
                Validator::validate_bound(v, "bw_max", fixed, n)?;
                v
            }
            None => default_max,
        };

        if !fixed {
            let floor = count(n_vars + 1);
            if lower < floor {
                log::warn!(
                    "bw_min {:?} is below the minimum of {:?} neighbors for {} columns; raising it",
                    lower.to_f64(),
                    floor.to_f64(),
                    n_vars
                );
                lower = floor;
            }
        }

        Validator::validate_bound_order(lower, upper)?;
        Ok((lower, upper))
    }

    /// Search strategy for the configured method.
    pub fn strategy(&self) -> Result<Box<dyn BandwidthSearch<T>>, GwrError> {
        let config = &self.config;
        Ok(match config.search_method {
            SearchMethod::GoldenSection => Box::new(GoldenSection::new(
                config.tol.unwrap_or_else(|| T::from(DEFAULT_TOL).unwrap()),
                config.max_iter.unwrap_or(DEFAULT_MAX_ITER),
            )),
            SearchMethod::Interval => {
                Validator::validate_interval_config(config.bw_min, config.bw_max, config.interval)?;
                let step = config.interval.unwrap_or_else(T::one);
                Validator::validate_interval(step)?;
                Box::new(IntervalSearch::new(step))
            }
            SearchMethod::Scipy => Box::new(BoundedBrent::new(
                T::from(DEFAULT_XATOL).unwrap(),
                config.max_iter.unwrap_or(DEFAULT_MAX_EVALS),
            )),
        })
    }

    /// Select a bandwidth for `(y, x)`, where `x` is row-major `n x n_vars`.
    pub fn select<E>(
        &self,
        evaluator: &E,
        y: &[T],
        x: &[T],
        n_vars: usize,
        subset: CovariateSubset,
        cache: &mut EvaluationCache<T>,
    ) -> Result<SelectionResult<T>, GwrError>
    where
        E: ModelEvaluator<T> + Sync + ?Sized,
    {
        let kernel = evaluator.kernel();
        let integer = !kernel.fixed;
        let (lower, upper) = self.bounds(evaluator, n_vars)?;
        let search = self.strategy()?;
        let fits_before = cache.misses();

        log::debug!(
            "{} search over [{:?}, {:?}] ({}, {})",
            search.name(),
            lower.to_f64(),
            upper.to_f64(),
            kernel,
            self.config.criterion
        );

        let outcome = if self.config.parallel && self.config.search_method == SearchMethod::Interval
        {
            self.run_parallel(evaluator, y, x, n_vars, subset, cache, lower, upper, integer)?
        } else {
            let mut objective = CachedObjective::new(
                evaluator,
                y,
                x,
                n_vars,
                self.config.criterion,
                subset,
                cache,
            );
            search.run(&mut objective, lower, upper, integer)?
        };

        let mut value = outcome.best.bandwidth;
        let mut score = outcome.best.score;
        if kernel.fixed && self.config.search_method == SearchMethod::GoldenSection {
            value = round_to_hundredths(value);
            if value != outcome.best.bandwidth {
                // Report the score of the bandwidth actually returned.
                let mut objective = CachedObjective::new(
                    evaluator,
                    y,
                    x,
                    n_vars,
                    self.config.criterion,
                    subset,
                    cache,
                );
                score = objective.evaluate(value)?.score;
            }
        }
        let bandwidth = Bandwidth::from_value(value, kernel.fixed);
        let n_evaluations = cache.misses() - fits_before;

        log::info!(
            "{} selected bandwidth {:?} ({} = {:?}) after {} iterations and {} fits",
            search.name(),
            bandwidth.value().to_f64(),
            self.config.criterion,
            score.to_f64(),
            outcome.iterations,
            n_evaluations
        );

        Ok(SelectionResult {
            bandwidth,
            score,
            criterion: self.config.criterion,
            kernel,
            search_method: self.config.search_method,
            bounds: (lower, upper),
            converged: outcome.converged,
            iterations: outcome.iterations,
            n_evaluations,
            history: outcome.history,
        })
    }

    #[cfg(feature = "parallel")]
    #[allow(clippy::too_many_arguments)]
    fn run_parallel<E>(
        &self,
        evaluator: &E,
        y: &[T],
        x: &[T],
        n_vars: usize,
        subset: CovariateSubset,
        cache: &mut EvaluationCache<T>,
        lower: T,
        upper: T,
        integer: bool,
    ) -> Result<SearchOutcome<T>, GwrError>
    where
        E: ModelEvaluator<T> + Sync + ?Sized,
    {
        use rayon::prelude::*;

        let step = self.config.interval.unwrap_or_else(T::one);
        let search = IntervalSearch::new(step);
        let grid = search.grid(lower, upper, integer)?;
        let criterion = self.config.criterion;

        let pending: Vec<T> = grid
            .iter()
            .copied()
            .filter(|&bw| cache.get(bw, subset).is_none())
            .collect();
        let fresh = pending
            .par_iter()
            .map(|&bw| score_bandwidth(evaluator, y, x, n_vars, criterion, bw))
            .collect::<Result<Vec<_>, GwrError>>()?;

        // Insert in grid order so the cache counters match the sequential scan.
        let mut tracker = ProbeTracker::new();
        let mut fresh = fresh.into_iter();
        for &bw in &grid {
            let eval = cache.get_or_try_insert_with(bw, subset, |_| {
                fresh.next().ok_or_else(|| {
                    GwrError::InvalidInput("parallel grid evaluation was incomplete".to_string())
                })
            })?;
            tracker.record(eval);
        }
        tracker.finish(search.name(), true, grid.len())
    }

    #[cfg(not(feature = "parallel"))]
    #[allow(clippy::too_many_arguments)]
    fn run_parallel<E>(
        &self,
        evaluator: &E,
        y: &[T],
        x: &[T],
        n_vars: usize,
        subset: CovariateSubset,
        cache: &mut EvaluationCache<T>,
        lower: T,
        upper: T,
        integer: bool,
    ) -> Result<SearchOutcome<T>, GwrError>
    where
        E: ModelEvaluator<T> + Sync + ?Sized,
    {
        log::debug!("built without the `parallel` feature; scanning the grid sequentially");
        let step = self.config.interval.unwrap_or_else(T::one);
        let mut objective =
            CachedObjective::new(evaluator, y, x, n_vars, self.config.criterion, subset, cache);
        IntervalSearch::new(step).run(&mut objective, lower, upper, integer)
    }
}
