//! Input validation for bandwidth selection.
//!
//! ## Purpose
//!
//! This module validates selector configuration and input data before any
//! model is fitted. It checks input shapes, finite values, bandwidth bounds,
//! search parameters and builder misuse.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Checks are ordered from cheap to expensive.
//! * **Generics**: Validation is generic over `Float` types.
//!
//! ## Key concepts
//!
//! * **Fixed bounds**: finite, strictly positive distances.
//! * **Adaptive bounds**: whole neighbor counts in `[1, n]`.
//! * **Interval search**: needs explicit `bw_min`, `bw_max` and a positive step.
//!
//! ## Invariants
//!
//! * All validated inputs satisfy their respective mathematical constraints.
//! * Validation logic is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not transform or filter input data.
//! * This module does not clamp bounds; see the selector for that.

use num_traits::Float;

use crate::primitives::errors::GwrError;

/// Display helper for error payloads.
#[inline]
fn as_f64<T: Float>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for selector configuration and input data.
///
/// All methods return `Result<(), GwrError>` and fail fast upon identifying
/// the first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Core Input Validation
    // ========================================================================

    /// Validate coordinates, response and row-major design matrix.
    ///
    /// `n_vars` is the number of design columns in `x`, intercept included.
    pub fn validate_inputs<T: Float>(
        coords: &[[T; 2]],
        y: &[T],
        x: &[T],
        n_vars: usize,
    ) -> Result<(), GwrError> {
        // Check 1: Non-empty arrays
        if coords.is_empty() || y.is_empty() || n_vars == 0 {
            return Err(GwrError::EmptyInput);
        }

        // Check 2: Matching lengths
        let n = y.len();
        if coords.len() != n || x.len() != n * n_vars {
            return Err(GwrError::MismatchedInputs {
                coords: coords.len(),
                y_len: n,
                x_len: x.len(),
            });
        }

        // Check 3: Enough observations for local fits of this width
        let min = n_vars + 2;
        if n < min {
            return Err(GwrError::TooFewPoints { got: n, min });
        }

        // Check 4: All values finite
        for (i, point) in coords.iter().enumerate() {
            for (axis, &val) in point.iter().enumerate() {
                if !val.is_finite() {
                    return Err(GwrError::InvalidNumericValue(format!(
                        "coords[{}][{}]={}",
                        i,
                        axis,
                        as_f64(val)
                    )));
                }
            }
        }
        for (i, &val) in y.iter().enumerate() {
            if !val.is_finite() {
                return Err(GwrError::InvalidNumericValue(format!(
                    "y[{}]={}",
                    i,
                    as_f64(val)
                )));
            }
        }
        for (i, &val) in x.iter().enumerate() {
            if !val.is_finite() {
                return Err(GwrError::InvalidNumericValue(format!(
                    "x[{}, {}]={}",
                    i / n_vars,
                    i % n_vars,
                    as_f64(val)
                )));
            }
        }

        Ok(())
    }

    // ========================================================================
    // Bandwidth Bounds
    // ========================================================================

    /// Validate one user-supplied bandwidth bound.
    pub fn validate_bound<T: Float>(
        value: T,
        name: &str,
        fixed: bool,
        n: usize,
    ) -> Result<(), GwrError> {
        if !value.is_finite() || value <= T::zero() {
            return Err(GwrError::InvalidBounds(format!(
                "{}={} must be finite and positive",
                name,
                as_f64(value)
            )));
        }
        if !fixed {
            if value.fract() != T::zero() {
                return Err(GwrError::InvalidBounds(format!(
                    "{}={} must be a whole number of neighbors for an adaptive kernel",
                    name,
                    as_f64(value)
                )));
            }
            if value > T::from(n).unwrap() {
                return Err(GwrError::InvalidBounds(format!(
                    "{}={} exceeds the number of observations ({})",
                    name,
                    as_f64(value),
                    n
                )));
            }
        }
        Ok(())
    }

    /// Validate that `bw_min <= bw_max`.
    pub fn validate_bound_order<T: Float>(bw_min: T, bw_max: T) -> Result<(), GwrError> {
        if bw_max < bw_min {
            return Err(GwrError::InvertedBounds {
                bw_min: as_f64(bw_min),
                bw_max: as_f64(bw_max),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Search Parameters
    // ========================================================================

    /// Validate the interval search step.
    pub fn validate_interval<T: Float>(interval: T) -> Result<(), GwrError> {
        if !interval.is_finite() || interval <= T::zero() {
            return Err(GwrError::InvalidInterval(as_f64(interval)));
        }
        Ok(())
    }

    /// Validate that interval search was given everything it needs.
    pub fn validate_interval_config<T: Float>(
        bw_min: Option<T>,
        bw_max: Option<T>,
        interval: Option<T>,
    ) -> Result<(), GwrError> {
        let missing = match (bw_min, bw_max, interval) {
            (None, _, _) => "bw_min",
            (_, None, _) => "bw_max",
            (_, _, None) => "interval",
            _ => return Ok(()),
        };
        Err(GwrError::MissingIntervalBounds { missing })
    }

    /// Validate a convergence tolerance.
    pub fn validate_tolerance<T: Float>(tol: T) -> Result<(), GwrError> {
        if !tol.is_finite() || tol <= T::zero() {
            return Err(GwrError::InvalidTolerance(as_f64(tol)));
        }
        Ok(())
    }

    /// Validate an iteration cap.
    pub fn validate_iterations(max_iter: usize) -> Result<(), GwrError> {
        if max_iter == 0 {
            return Err(GwrError::InvalidIterations(max_iter));
        }
        Ok(())
    }

    /// Validate that no parameters were set multiple times in the builder.
    pub fn validate_no_duplicates(duplicate_param: Option<&'static str>) -> Result<(), GwrError> {
        if let Some(param) = duplicate_param {
            return Err(GwrError::DuplicateParameter { parameter: param });
        }
        Ok(())
    }
}
