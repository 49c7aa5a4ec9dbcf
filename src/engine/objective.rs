//! Cache-aware criterion objective.
//!
//! ## Purpose
//!
//! Turns `(evaluator, data, criterion)` into the scalar objective a bandwidth
//! search minimizes. Every evaluation goes through the search's
//! [`EvaluationCache`], and singular fits become infinite scores.
//!
//! ## Invariants
//!
//! * A bandwidth is fitted at most once per `(bandwidth, subset)` and cache.
//! * Only [`GwrError::SingularFit`] is absorbed; every other error propagates.

use num_traits::Float;

use crate::algorithms::criterion::Criterion;
use crate::algorithms::evaluator::ModelEvaluator;
use crate::primitives::cache::{CovariateSubset, Evaluation, EvaluationCache};
use crate::primitives::errors::GwrError;
use crate::search::Objective;

/// Fit the model at `bandwidth` and score it.
///
/// A singular local design yields [`Evaluation::degenerate`].
pub fn score_bandwidth<T, E>(
    evaluator: &E,
    y: &[T],
    x: &[T],
    n_vars: usize,
    criterion: Criterion,
    bandwidth: T,
) -> Result<Evaluation<T>, GwrError>
where
    T: Float,
    E: ModelEvaluator<T> + ?Sized,
{
    match evaluator.fit(y, x, n_vars, bandwidth) {
        Ok(fit) => {
            let score = criterion.score(&fit);
            log::debug!(
                "bandwidth {:?}: {} = {:?}",
                bandwidth.to_f64(),
                criterion,
                score.to_f64()
            );
            Ok(Evaluation {
                bandwidth,
                score,
                diagnostics: Some(fit.diagnostics()),
            })
        }
        Err(err @ GwrError::SingularFit { .. }) => {
            log::debug!("{}; scoring as +inf", err);
            Ok(Evaluation::degenerate(bandwidth))
        }
        Err(err) => Err(err),
    }
}

/// Criterion objective over one response and design, memoized per search.
pub struct CachedObjective<'a, T, E: ?Sized> {
    evaluator: &'a E,
    y: &'a [T],
    x: &'a [T],
    n_vars: usize,
    criterion: Criterion,
    subset: CovariateSubset,
    cache: &'a mut EvaluationCache<T>,
}

impl<'a, T, E> CachedObjective<'a, T, E>
where
    T: Float,
    E: ModelEvaluator<T> + ?Sized,
{
    /// Create an objective over `(y, x)` keyed under `subset` in `cache`.
    pub fn new(
        evaluator: &'a E,
        y: &'a [T],
        x: &'a [T],
        n_vars: usize,
        criterion: Criterion,
        subset: CovariateSubset,
        cache: &'a mut EvaluationCache<T>,
    ) -> Self {
        Self {
            evaluator,
            y,
            x,
            n_vars,
            criterion,
            subset,
            cache,
        }
    }

    /// Covariate subset the evaluations are keyed under.
    pub fn subset(&self) -> CovariateSubset {
        self.subset
    }

    /// The underlying cache.
    pub fn cache(&self) -> &EvaluationCache<T> {
        self.cache
    }
}

impl<T, E> Objective<T> for CachedObjective<'_, T, E>
where
    T: Float,
    E: ModelEvaluator<T> + ?Sized,
{
    fn evaluate(&mut self, bandwidth: T) -> Result<Evaluation<T>, GwrError> {
        let hits = self.cache.hits();
        let (evaluator, y, x, n_vars, criterion) =
            (self.evaluator, self.y, self.x, self.n_vars, self.criterion);
        let evaluation = self
            .cache
            .get_or_try_insert_with(bandwidth, self.subset, |bw| {
                score_bandwidth(evaluator, y, x, n_vars, criterion, bw)
            })?;
        if self.cache.hits() > hits {
            log::debug!("cache hit for bandwidth {:?}", bandwidth.to_f64());
        }
        Ok(evaluation)
    }
}
