//! Evaluation cache for bandwidth searches.
//!
//! ## Purpose
//!
//! Every objective evaluation fits a full GWR model, and searches revisit
//! bandwidths (golden section reuses one interior point per step, integer
//! rounding maps neighboring probes onto the same count). This module memoizes
//! evaluations by `(bandwidth, covariate subset)`.
//!
//! ## Design notes
//!
//! * Bandwidths are keyed by the bit pattern of their `f64` value, so only
//!   bit-identical probes hit.
//! * A cache belongs to exactly one search invocation and is dropped with it.
//!
//! ## Invariants
//!
//! * Entries are never evicted or overwritten.
//! * `hits + misses` equals the number of lookups made through
//!   [`EvaluationCache::get_or_try_insert_with`].

use std::collections::HashMap;

use num_traits::Float;

/// Identifies which design columns an evaluation was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CovariateSubset {
    /// Every column of the design matrix (single-bandwidth GWR).
    #[default]
    All,

    /// A single design column (one MGWR backfitting step).
    Column(usize),
}

/// Diagnostics retained alongside a cached score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitDiagnostics<T> {
    /// Residual sum of squares.
    pub rss: T,

    /// Trace of the hat matrix (effective number of parameters).
    pub trace_hat: T,
}

/// A scored bandwidth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation<T> {
    /// Bandwidth that was evaluated.
    pub bandwidth: T,

    /// Criterion value (lower is better; infinite when the fit was degenerate).
    pub score: T,

    /// Fit diagnostics, absent when the fit was degenerate.
    pub diagnostics: Option<FitDiagnostics<T>>,
}

impl<T: Float> Evaluation<T> {
    /// Evaluation standing in for a degenerate (singular) fit.
    pub fn degenerate(bandwidth: T) -> Self {
        Self {
            bandwidth,
            score: T::infinity(),
            diagnostics: None,
        }
    }

    /// Whether `self` should be preferred over `other`.
    ///
    /// Lower score wins; equal scores prefer the smaller bandwidth.
    pub fn better_than(&self, other: &Self) -> bool {
        if self.score < other.score {
            return true;
        }
        if self.score == other.score || (self.score.is_nan() && other.score.is_nan()) {
            return self.bandwidth < other.bandwidth;
        }
        other.score.is_nan() && !self.score.is_nan()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    bandwidth_bits: u64,
    subset: CovariateSubset,
}

impl CacheKey {
    fn new<T: Float>(bandwidth: T, subset: CovariateSubset) -> Self {
        let value = bandwidth.to_f64().unwrap_or(f64::NAN);
        // 0.0 and -0.0 compare equal, key them the same way.
        let value = if value == 0.0 { 0.0 } else { value };
        Self {
            bandwidth_bits: value.to_bits(),
            subset,
        }
    }
}

/// Memo table of evaluations for one search invocation.
#[derive(Debug, Clone)]
pub struct EvaluationCache<T> {
    entries: HashMap<CacheKey, Evaluation<T>>,
    hits: usize,
    misses: usize,
}

impl<T: Float> Default for EvaluationCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> EvaluationCache<T> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up an evaluation without touching the counters.
    pub fn get(&self, bandwidth: T, subset: CovariateSubset) -> Option<&Evaluation<T>> {
        self.entries.get(&CacheKey::new(bandwidth, subset))
    }

    /// Store an evaluation unless the key is already present.
    pub fn insert(&mut self, subset: CovariateSubset, evaluation: Evaluation<T>) {
        self.entries
            .entry(CacheKey::new(evaluation.bandwidth, subset))
            .or_insert(evaluation);
    }

    /// Return the cached evaluation or compute, store and return a new one.
    ///
    /// Errors from `compute` are passed through and nothing is stored.
    pub fn get_or_try_insert_with<E, F>(
        &mut self,
        bandwidth: T,
        subset: CovariateSubset,
        compute: F,
    ) -> Result<Evaluation<T>, E>
    where
        F: FnOnce(T) -> Result<Evaluation<T>, E>,
    {
        let key = CacheKey::new(bandwidth, subset);
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(*hit);
        }

        self.misses += 1;
        let evaluation = compute(bandwidth)?;
        self.entries.insert(key, evaluation);
        Ok(evaluation)
    }

    /// Number of distinct evaluations stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been evaluated yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Lookups that required a model fit.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// All evaluations for `subset`, ordered by bandwidth.
    pub fn evaluations(&self, subset: CovariateSubset) -> Vec<Evaluation<T>> {
        let mut out: Vec<Evaluation<T>> = self
            .entries
            .iter()
            .filter(|(key, _)| key.subset == subset)
            .map(|(_, eval)| *eval)
            .collect();
        out.sort_by(|a, b| {
            a.bandwidth
                .partial_cmp(&b.bandwidth)
                .unwrap_or(core::cmp::Ordering::Equal)
        });
        out
    }
}
