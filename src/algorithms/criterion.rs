//! Model selection criteria for bandwidth search.
//!
//! ## Purpose
//!
//! Turns a fitted model into the scalar the searches minimize. All criteria
//! are "lower is better".
//!
//! ## Key concepts
//!
//! With `llf` the Gaussian log-likelihood, `n` observations and `tr(S)` the
//! hat-matrix trace:
//!
//! * **AICc**: `-2 llf + 2n (tr(S) + 1) / (n - tr(S) - 2)`
//! * **AIC**: `-2 llf + 2 (tr(S) + 1)`
//! * **BIC**: `-2 llf + (tr(S) + 1) ln n`
//! * **CV**: `sum((e_i / (1 - h_ii))^2) / n`
//!
//! ## Invariants
//!
//! * AICc is infinite when `n - tr(S) - 2 <= 0` (the correction blows up).
//! * CV is infinite when any observation has leverage 1.

use core::fmt;
use core::str::FromStr;

use num_traits::Float;

use crate::algorithms::evaluator::LocalFit;
use crate::primitives::errors::GwrError;

/// Selection criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum Criterion {
    /// Corrected Akaike information criterion.
    #[default]
    AICc,

    /// Akaike information criterion.
    AIC,

    /// Bayesian information criterion.
    BIC,

    /// Leave-one-out cross-validation score.
    CV,
}

impl Criterion {
    /// Get the name of the criterion.
    pub const fn name(&self) -> &'static str {
        match self {
            Criterion::AICc => "AICc",
            Criterion::AIC => "AIC",
            Criterion::BIC => "BIC",
            Criterion::CV => "CV",
        }
    }

    /// Score a fit.
    pub fn score<T: Float>(&self, fit: &LocalFit<T>) -> T {
        let n = T::from(fit.n).unwrap();
        let one = T::one();
        let two = T::from(2.0).unwrap();
        let tr = fit.trace_hat;

        match self {
            Criterion::AICc => {
                let denom = n - tr - two;
                if denom <= T::zero() {
                    return T::infinity();
                }
                -two * fit.log_likelihood() + two * n * (tr + one) / denom
            }
            Criterion::AIC => -two * fit.log_likelihood() + two * (tr + one),
            Criterion::BIC => -two * fit.log_likelihood() + (tr + one) * n.ln(),
            Criterion::CV => {
                let mut sum = T::zero();
                for (&e, &h) in fit.residuals.iter().zip(fit.influence.iter()) {
                    let denom = one - h;
                    if denom.abs() <= T::epsilon() {
                        return T::infinity();
                    }
                    let loo = e / denom;
                    sum = sum + loo * loo;
                }
                sum / n
            }
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Criterion {
    type Err = GwrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aicc" => Ok(Criterion::AICc),
            "aic" => Ok(Criterion::AIC),
            "bic" => Ok(Criterion::BIC),
            "cv" => Ok(Criterion::CV),
            _ => Err(GwrError::UnknownCriterion(s.to_string())),
        }
    }
}
