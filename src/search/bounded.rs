//! Brent's bounded scalar minimizer.
//!
//! ## Purpose
//!
//! Continuous minimization on `[lower, upper]` combining golden-section steps
//! with successive parabolic interpolation. This is the `scipy` search method:
//! it converges in far fewer evaluations than plain golden section when the
//! objective is smooth near its minimum.
//!
//! ## Design notes
//!
//! * Convergence is on the absolute position tolerance `xatol`, widened by a
//!   relative term `sqrt(eps) * |x|`.
//! * In integer mode the objective sees rounded arguments, so the optimizer
//!   works on a step function. The final point is rounded to the nearest whole
//!   number inside the bounds and evaluated once more.
//!
//! ## Invariants
//!
//! * Every probe lies within `[lower, upper]`.
//! * At most `max_iter` evaluations are requested before the final rounding
//!   probe.

use num_traits::Float;

use crate::primitives::errors::GwrError;
use crate::search::{BandwidthSearch, Objective, ProbeTracker, SearchOutcome};

/// Default absolute position tolerance.
pub const DEFAULT_XATOL: f64 = 1.0e-5;

/// Default evaluation cap.
pub const DEFAULT_MAX_EVALS: usize = 500;

/// Bounded Brent minimizer configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedBrent<T> {
    /// Absolute tolerance on the minimizer position.
    pub xatol: T,

    /// Maximum number of objective evaluations.
    pub max_iter: usize,
}

impl<T: Float> Default for BoundedBrent<T> {
    fn default() -> Self {
        Self {
            xatol: T::from(DEFAULT_XATOL).unwrap(),
            max_iter: DEFAULT_MAX_EVALS,
        }
    }
}

impl<T: Float> BoundedBrent<T> {
    /// Create a minimizer with the given tolerance and evaluation cap.
    pub fn new(xatol: T, max_iter: usize) -> Self {
        Self { xatol, max_iter }
    }
}

/// `sign(x)`, with zero mapped to `+1`.
#[inline]
fn step_sign<T: Float>(x: T) -> T {
    if x < T::zero() {
        -T::one()
    } else {
        T::one()
    }
}

impl<T: Float> BandwidthSearch<T> for BoundedBrent<T> {
    fn name(&self) -> &'static str {
        "scipy"
    }

    fn run(
        &self,
        objective: &mut dyn Objective<T>,
        lower: T,
        upper: T,
        integer: bool,
    ) -> Result<SearchOutcome<T>, GwrError> {
        let half = T::from(0.5).unwrap();
        let two = T::from(2.0).unwrap();
        let three = T::from(3.0).unwrap();
        let golden_mean = half * (three - T::from(5.0).unwrap().sqrt());
        let sqrt_eps = T::epsilon().sqrt();

        let mut tracker = ProbeTracker::new();
        let mut probe = |x: T, tracker: &mut ProbeTracker<T>| -> Result<T, GwrError> {
            let arg = if integer { x.round() } else { x };
            Ok(tracker.record(objective.evaluate(arg)?).score)
        };

        let (mut a, mut b) = (lower, upper);
        let mut fulc = a + golden_mean * (b - a);
        let mut nfc = fulc;
        let mut xf = fulc;
        let mut rat = T::zero();
        let mut e = T::zero();

        let mut fx = probe(xf, &mut tracker)?;
        let mut evals = 1usize;
        let mut ffulc = fx;
        let mut fnfc = fx;

        let mut xm = half * (a + b);
        let mut tol1 = sqrt_eps * xf.abs() + self.xatol / three;
        let mut tol2 = two * tol1;
        let mut converged = true;

        while (xf - xm).abs() > tol2 - half * (b - a) {
            if evals >= self.max_iter {
                converged = false;
                break;
            }

            let mut golden = true;

            // Try a parabolic step through the three best points.
            if e.abs() > tol1 {
                golden = false;
                let mut r = (xf - nfc) * (fx - ffulc);
                let mut q = (xf - fulc) * (fx - fnfc);
                let mut p = (xf - fulc) * q - (xf - nfc) * r;
                q = two * (q - r);
                if q > T::zero() {
                    p = -p;
                }
                q = q.abs();
                r = e;
                e = rat;

                if p.abs() < (half * q * r).abs() && p > q * (a - xf) && p < q * (b - xf) {
                    rat = p / q;
                    let x = xf + rat;
                    if (x - a) < tol2 || (b - x) < tol2 {
                        rat = tol1 * step_sign(xm - xf);
                    }
                } else {
                    golden = true;
                }
            }

            if golden {
                e = if xf >= xm { a - xf } else { b - xf };
                rat = golden_mean * e;
            }

            let x = xf + step_sign(rat) * rat.abs().max(tol1);
            let fu = probe(x, &mut tracker)?;
            evals += 1;

            if fu <= fx {
                if x >= xf {
                    a = xf;
                } else {
                    b = xf;
                }
                fulc = nfc;
                ffulc = fnfc;
                nfc = xf;
                fnfc = fx;
                xf = x;
                fx = fu;
            } else {
                if x < xf {
                    a = x;
                } else {
                    b = x;
                }
                if fu <= fnfc || nfc == xf {
                    fulc = nfc;
                    ffulc = fnfc;
                    nfc = x;
                    fnfc = fu;
                } else if fu <= ffulc || fulc == xf || fulc == nfc {
                    fulc = x;
                    ffulc = fu;
                }
            }

            xm = half * (a + b);
            tol1 = sqrt_eps * xf.abs() + self.xatol / three;
            tol2 = two * tol1;
        }

        log::debug!(
            "scipy search stopped at {:?} after {} evaluations",
            xf.to_f64(),
            evals
        );

        if integer {
            let rounded = xf.round().max(lower.ceil()).min(upper.floor());
            tracker.record(objective.evaluate(rounded)?);
        }

        tracker.finish(self.name(), converged, evals)
    }
}
