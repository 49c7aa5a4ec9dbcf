//! Error types for GWR bandwidth selection.
//!
//! ## Purpose
//!
//! This module defines the single error type returned by every fallible
//! operation in the crate. Configuration problems are reported before any
//! model is fitted; numerical degeneracy of a single candidate bandwidth is
//! reported through [`GwrError::SingularFit`] and absorbed by the search.
//!
//! ## Design notes
//!
//! * **Flat enum**: One variant per failure mode, carrying the offending values.
//! * **Comparable**: `Clone + PartialEq` so tests can match on exact errors.
//! * **Display**: Messages are derived with `thiserror`.
//!
//! ## Non-goals
//!
//! * Non-convergence is not an error; searches report it through flags.

use thiserror::Error;

/// Errors raised while configuring or running a bandwidth search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GwrError {
    /// Input arrays are empty.
    #[error("Input arrays are empty")]
    EmptyInput,

    /// Generic invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Coordinates, response and design matrix disagree on the number of observations.
    #[error("Length mismatch: {coords} coordinates, {y_len} responses, design matrix has {x_len} values")]
    MismatchedInputs {
        /// Number of coordinate pairs.
        coords: usize,
        /// Length of the response vector.
        y_len: usize,
        /// Length of the row-major design matrix.
        x_len: usize,
    },

    /// A non-finite value was found in the inputs.
    #[error("Invalid numeric value: {0}")]
    InvalidNumericValue(String),

    /// Not enough observations for the requested model.
    #[error("Too few points: got {got}, need at least {min}")]
    TooFewPoints {
        /// Observations supplied.
        got: usize,
        /// Observations required.
        min: usize,
    },

    /// Bandwidth bounds are unusable (non-finite, non-positive or not whole neighbor counts).
    #[error("Invalid bandwidth bounds: {0}")]
    InvalidBounds(String),

    /// Upper bandwidth bound is below the lower bound.
    #[error("Invalid bound ordering: bw_max {bw_max} is less than bw_min {bw_min}")]
    InvertedBounds {
        /// Lower bound.
        bw_min: f64,
        /// Upper bound.
        bw_max: f64,
    },

    /// Interval search step is not strictly positive.
    #[error("Invalid interval: {0} (must be > 0)")]
    InvalidInterval(f64),

    /// Interval search was requested without explicit bounds and step.
    #[error("Interval search requires bw_min, bw_max and interval to be set (missing: {missing})")]
    MissingIntervalBounds {
        /// Name of the first missing parameter.
        missing: &'static str,
    },

    /// Convergence tolerance is not strictly positive and finite.
    #[error("Invalid tolerance: {0} (must be > 0 and finite)")]
    InvalidTolerance(f64),

    /// Iteration cap is zero.
    #[error("Invalid max_iter: {0} (must be at least 1)")]
    InvalidIterations(usize),

    /// Kernel name could not be parsed.
    #[error("Unknown kernel: '{0}'")]
    UnknownKernel(String),

    /// Criterion name could not be parsed.
    #[error("Unknown criterion: '{0}'")]
    UnknownCriterion(String),

    /// Search method name could not be parsed.
    #[error("Unknown search method: '{0}'")]
    UnknownSearchMethod(String),

    /// A builder parameter was set more than once.
    #[error("Parameter '{parameter}' was set multiple times. Each parameter can only be configured once.")]
    DuplicateParameter {
        /// Name of the duplicated parameter.
        parameter: &'static str,
    },

    /// The local design matrix at one location is singular for this bandwidth.
    #[error("Singular local fit at location {location} for bandwidth {bandwidth}")]
    SingularFit {
        /// Index of the first degenerate location.
        location: usize,
        /// Bandwidth that produced the degenerate fit.
        bandwidth: f64,
    },
}
