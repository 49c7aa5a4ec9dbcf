//! Golden-section bandwidth search.
//!
//! ## Purpose
//!
//! Narrows a bracket `[a, c]` around the minimum of the objective by probing two
//! interior points and discarding the side that cannot hold the minimum.
//!
//! ## Design notes
//!
//! * Interior points sit at `a + δ(c - a)` and `c - δ(c - a)` with `δ = 0.38197`.
//!   Each step reuses one interior point; the caller's cache absorbs the repeat.
//! * Both bracket endpoints are probed once so a monotone objective still
//!   returns its boundary minimum.
//! * In integer mode every probe is rounded and clamped into the bracket.
//!
//! ## Invariants
//!
//! * The returned bandwidth lies within the original bracket.
//! * The returned score is the minimum over all probes (ties prefer the
//!   smaller bandwidth).
//!
//! ## Non-goals
//!
//! * Does not guarantee a global minimum on multimodal objectives.

use num_traits::Float;

use crate::primitives::errors::GwrError;
use crate::search::{BandwidthSearch, Objective, ProbeTracker, SearchOutcome};

/// Golden-section interior fraction.
pub const GOLDEN_DELTA: f64 = 0.38197;

/// Default score tolerance.
pub const DEFAULT_TOL: f64 = 1.0e-6;

/// Default iteration cap.
pub const DEFAULT_MAX_ITER: usize = 200;

/// Default bracket-width tolerance as a fraction of the initial width.
pub const DEFAULT_WIDTH_FRACTION: f64 = 1.0e-6;

/// Golden-section search configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldenSection<T> {
    /// Stop once the two interior scores differ by at most this much.
    pub tol: T,

    /// Maximum number of bracket reductions.
    pub max_iter: usize,

    /// Stop once the bracket is at most this wide. `None` picks a default
    /// from the initial bracket (or 1 in integer mode).
    pub width_tol: Option<T>,
}

impl<T: Float> Default for GoldenSection<T> {
    fn default() -> Self {
        Self {
            tol: T::from(DEFAULT_TOL).unwrap(),
            max_iter: DEFAULT_MAX_ITER,
            width_tol: None,
        }
    }
}

impl<T: Float> GoldenSection<T> {
    /// Create a search with the given score tolerance and iteration cap.
    pub fn new(tol: T, max_iter: usize) -> Self {
        Self {
            tol,
            max_iter,
            width_tol: None,
        }
    }

    fn place(value: T, a: T, c: T, integer: bool) -> T {
        if integer {
            value.round().max(a).min(c)
        } else {
            value
        }
    }
}

impl<T: Float> BandwidthSearch<T> for GoldenSection<T> {
    fn name(&self) -> &'static str {
        "golden_section"
    }

    fn run(
        &self,
        objective: &mut dyn Objective<T>,
        lower: T,
        upper: T,
        integer: bool,
    ) -> Result<SearchOutcome<T>, GwrError> {
        let delta = T::from(GOLDEN_DELTA).unwrap();
        let one = T::one();

        let (mut a, mut c) = if integer {
            (lower.round(), upper.round())
        } else {
            (lower, upper)
        };
        let width_tol = match self.width_tol {
            Some(w) => w,
            None if integer => one,
            None => (c - a) * T::from(DEFAULT_WIDTH_FRACTION).unwrap(),
        };

        let mut tracker = ProbeTracker::new();
        tracker.record(objective.evaluate(a)?);
        if c > a {
            tracker.record(objective.evaluate(c)?);
        }

        let mut b = a + delta * (c - a);
        let mut d = c - delta * (c - a);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iter {
            if c - a <= width_tol || (integer && c - a < one) {
                converged = true;
                break;
            }
            iterations += 1;

            b = Self::place(b, a, c, integer);
            d = Self::place(d, a, c, integer);
            let score_b = tracker.record(objective.evaluate(b)?).score;
            let score_d = tracker.record(objective.evaluate(d)?).score;
            log::debug!(
                "golden_section iteration {}: bracket [{:?}, {:?}]",
                iterations,
                a.to_f64(),
                c.to_f64()
            );

            // Two degenerate probes mean the bandwidth is still too small.
            let keep_left = if score_b.is_infinite() && score_d.is_infinite() {
                false
            } else {
                score_b <= score_d
            };

            if keep_left {
                c = d;
                d = b;
                b = a + delta * (c - a);
            } else {
                a = b;
                b = d;
                d = c - delta * (c - a);
            }

            if (score_b - score_d).abs() <= self.tol {
                converged = true;
                break;
            }
        }

        if !converged && (c - a <= width_tol || (integer && c - a < one)) {
            converged = true;
        }

        tracker.finish(self.name(), converged, iterations)
    }
}
