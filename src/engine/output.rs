//! Output types for bandwidth selection.
//!
//! ## Purpose
//!
//! This module defines [`SelectionResult`] (one bandwidth for every covariate)
//! and [`MultiSelectionResult`] (one bandwidth per covariate, from MGWR
//! backfitting). Both carry the selected bandwidths together with the
//! convergence metadata of the search that produced them.
//!
//! ## Design notes
//!
//! * Results are generic over `Float` types to support f32 and f64.
//! * Implements `Display` for a short human-readable summary.
//! * Probe histories are kept in evaluation order, repeats included.
//!
//! ## Invariants
//!
//! * Adaptive bandwidths are whole numbers.
//! * `bandwidth_history.len() == scores.len() == sweeps` for MGWR results.
//!
//! ## Non-goals
//!
//! * This module does not perform calculations; it only stores results.

use core::fmt;

use num_traits::Float;

use crate::algorithms::criterion::Criterion;
use crate::engine::backfitting::MultiConvergence;
use crate::math::kernel::KernelSpec;
use crate::primitives::bandwidth::Bandwidth;
use crate::primitives::cache::Evaluation;
use crate::search::SearchMethod;

// ============================================================================
// Single Bandwidth
// ============================================================================

/// Result of a single-bandwidth (GWR) selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult<T> {
    /// Selected bandwidth.
    pub bandwidth: Bandwidth<T>,

    /// Criterion value of the selected bandwidth.
    pub score: T,

    /// Criterion that was minimized.
    pub criterion: Criterion,

    /// Kernel the bandwidth applies to.
    pub kernel: KernelSpec,

    /// Search strategy that produced the result.
    pub search_method: SearchMethod,

    /// Bounds that were searched.
    pub bounds: (T, T),

    /// Whether the search met its stopping rule.
    pub converged: bool,

    /// Iterations (or grid points) used by the search.
    pub iterations: usize,

    /// Number of model fits performed (cache misses).
    pub n_evaluations: usize,

    /// Every probe in evaluation order.
    pub history: Vec<Evaluation<T>>,
}

impl<T: Float> SelectionResult<T> {
    /// Numeric value of the selected bandwidth.
    pub fn value(&self) -> T {
        self.bandwidth.value()
    }

    /// Distinct probed bandwidths with their scores, ordered by bandwidth.
    pub fn profile(&self) -> Vec<(T, T)> {
        let mut points: Vec<(T, T)> = self
            .history
            .iter()
            .map(|eval| (eval.bandwidth, eval.score))
            .collect();
        points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(core::cmp::Ordering::Equal));
        points.dedup_by(|a, b| a.0 == b.0);
        points
    }
}

impl<T: Float + fmt::Display> fmt::Display for SelectionResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Kernel: {}", self.kernel)?;
        writeln!(f, "  Criterion: {}", self.criterion)?;
        writeln!(f, "  Search: {}", self.search_method)?;
        writeln!(f, "  Bounds: [{}, {}]", self.bounds.0, self.bounds.1)?;
        writeln!(f)?;
        writeln!(f, "Selected bandwidth: {}", self.bandwidth)?;
        writeln!(f, "  Score: {}", self.score)?;
        writeln!(f, "  Converged: {}", self.converged)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        write!(f, "  Model fits: {}", self.n_evaluations)
    }
}

// ============================================================================
// Multiscale
// ============================================================================

/// Result of MGWR backfitting.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSelectionResult<T> {
    /// One bandwidth per design column (intercept first when present).
    pub bandwidths: Vec<Bandwidth<T>>,

    /// Criterion minimized by every per-covariate search.
    pub criterion: Criterion,

    /// Kernel the bandwidths apply to.
    pub kernel: KernelSpec,

    /// Convergence measure used between sweeps.
    pub convergence: MultiConvergence,

    /// Whether the convergence measure fell below tolerance.
    pub converged: bool,

    /// Number of backfitting sweeps performed.
    pub sweeps: usize,

    /// Convergence measure after each sweep.
    pub scores: Vec<T>,

    /// Bandwidth vector after each sweep.
    pub bandwidth_history: Vec<Vec<T>>,

    /// Local coefficients, row-major `n x n_vars`.
    pub params: Vec<T>,

    /// Sum of the partial fits.
    pub fitted: Vec<T>,

    /// Response minus `fitted`.
    pub residuals: Vec<T>,

    /// Number of design columns.
    pub n_vars: usize,
}

impl<T: Float> MultiSelectionResult<T> {
    /// Numeric bandwidth values in column order.
    pub fn values(&self) -> Vec<T> {
        self.bandwidths.iter().map(|bw| bw.value()).collect()
    }

    /// Residual sum of squares of the final fit.
    pub fn rss(&self) -> T {
        self.residuals
            .iter()
            .fold(T::zero(), |acc, &r| acc + r * r)
    }

    /// Local coefficient of column `j` at observation `i`.
    pub fn param(&self, i: usize, j: usize) -> T {
        self.params[i * self.n_vars + j]
    }
}

impl<T: Float + fmt::Display> fmt::Display for MultiSelectionResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Kernel: {}", self.kernel)?;
        writeln!(f, "  Criterion: {}", self.criterion)?;
        writeln!(f, "  Convergence: {}", self.convergence)?;
        writeln!(f, "  Sweeps: {}", self.sweeps)?;
        writeln!(f, "  Converged: {}", self.converged)?;
        if let Some(last) = self.scores.last() {
            writeln!(f, "  Final change: {}", last)?;
        }
        writeln!(f)?;
        writeln!(f, "Bandwidths:")?;
        writeln!(f, "  {:>8} {:>16}", "Column", "Bandwidth")?;
        writeln!(f, "  {}", "-".repeat(25))?;
        for (j, bw) in self.bandwidths.iter().enumerate() {
            writeln!(f, "  {:>8} {:>16}", j, bw.to_string())?;
        }
        Ok(())
    }
}
