//! Layer 4: Search
//!
//! # Purpose
//!
//! This layer holds the one-dimensional minimizers that pick a bandwidth:
//! - Golden-section search (default)
//! - Exhaustive interval (grid) search
//! - Brent's bounded scalar minimizer
//!
//! All three run against the [`Objective`] trait and implement
//! [`BandwidthSearch`], so the selector dispatches without knowing which one
//! it holds.
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Search ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

use core::fmt;
use core::str::FromStr;

use num_traits::Float;

use crate::primitives::cache::Evaluation;
use crate::primitives::errors::GwrError;

/// Golden-section search.
pub mod golden;

/// Fixed-step grid search.
pub mod interval;

/// Brent's bounded minimizer.
pub mod bounded;

// ============================================================================
// Objective
// ============================================================================

/// A scalar objective over the bandwidth.
pub trait Objective<T> {
    /// Evaluate the objective at `bandwidth`.
    fn evaluate(&mut self, bandwidth: T) -> Result<Evaluation<T>, GwrError>;
}

impl<T, F> Objective<T> for F
where
    T: Float,
    F: FnMut(T) -> Result<T, GwrError>,
{
    fn evaluate(&mut self, bandwidth: T) -> Result<Evaluation<T>, GwrError> {
        Ok(Evaluation {
            bandwidth,
            score: self(bandwidth)?,
            diagnostics: None,
        })
    }
}

// ============================================================================
// Search Outcome
// ============================================================================

/// Result of one bandwidth search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<T> {
    /// Best evaluation among all probes.
    pub best: Evaluation<T>,

    /// Whether the stopping rule was met before the iteration cap.
    pub converged: bool,

    /// Iterations (or grid points) used.
    pub iterations: usize,

    /// Every probe in the order it was requested, repeats included.
    pub history: Vec<Evaluation<T>>,
}

/// Keeps the best probe seen so far and the probe history.
#[derive(Debug, Clone, Default)]
pub struct ProbeTracker<T> {
    best: Option<Evaluation<T>>,
    history: Vec<Evaluation<T>>,
}

impl<T: Float> ProbeTracker<T> {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self {
            best: None,
            history: Vec::new(),
        }
    }

    /// Record a probe.
    pub fn record(&mut self, evaluation: Evaluation<T>) -> Evaluation<T> {
        let replace = match &self.best {
            Some(best) => evaluation.better_than(best),
            None => true,
        };
        if replace {
            self.best = Some(evaluation);
        }
        self.history.push(evaluation);
        evaluation
    }

    /// Best probe so far.
    pub fn best(&self) -> Option<&Evaluation<T>> {
        self.best.as_ref()
    }

    /// Finish the search.
    pub fn finish(
        self,
        search: &'static str,
        converged: bool,
        iterations: usize,
    ) -> Result<SearchOutcome<T>, GwrError> {
        let best = self.best.ok_or_else(|| {
            GwrError::InvalidInput(format!("{} search evaluated no bandwidths", search))
        })?;
        if !best.score.is_finite() {
            log::warn!(
                "{} search found no bandwidth with a finite score (best probe {})",
                search,
                best.bandwidth.to_f64().unwrap_or(f64::NAN)
            );
        }
        if !converged {
            log::warn!(
                "{} search stopped after {} iterations without converging",
                search,
                iterations
            );
        }
        Ok(SearchOutcome {
            best,
            converged,
            iterations,
            history: self.history,
        })
    }
}

// ============================================================================
// Search Strategy
// ============================================================================

/// A one-dimensional bandwidth minimizer.
pub trait BandwidthSearch<T: Float> {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Minimize `objective` over `[lower, upper]`.
    ///
    /// When `integer` is set every probe is a whole number.
    fn run(
        &self,
        objective: &mut dyn Objective<T>,
        lower: T,
        upper: T,
        integer: bool,
    ) -> Result<SearchOutcome<T>, GwrError>;
}

/// Which search strategy the selector runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMethod {
    /// Golden-section search over the default or supplied bounds.
    #[default]
    GoldenSection,

    /// Exhaustive grid over explicit bounds and step.
    Interval,

    /// Brent's bounded minimizer (the `scipy` method).
    Scipy,
}

impl SearchMethod {
    /// Get the name of the method.
    pub const fn name(&self) -> &'static str {
        match self {
            SearchMethod::GoldenSection => "golden_section",
            SearchMethod::Interval => "interval",
            SearchMethod::Scipy => "scipy",
        }
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchMethod {
    type Err = GwrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "golden_section" | "golden" => Ok(SearchMethod::GoldenSection),
            "interval" => Ok(SearchMethod::Interval),
            "scipy" | "brent" | "bounded" => Ok(SearchMethod::Scipy),
            _ => Err(GwrError::UnknownSearchMethod(s.to_string())),
        }
    }
}
