//! Typed bandwidth values.
//!
//! ## Purpose
//!
//! A GWR bandwidth is either a distance threshold (fixed kernels) or a number
//! of nearest neighbors (adaptive kernels). Searches run on a plain float; this
//! module converts the search output back into the typed representation.
//!
//! ## Invariants
//!
//! * `Adaptive` counts are whole, positive neighbor counts.
//! * `Fixed` distances are finite and positive.

use core::fmt;
use num_traits::Float;

/// Selected bandwidth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bandwidth<T> {
    /// Distance threshold for a fixed kernel.
    Fixed(T),

    /// Neighbor count for an adaptive kernel.
    Adaptive(usize),
}

impl<T: Float> Bandwidth<T> {
    /// Build a bandwidth from a raw search value.
    ///
    /// Adaptive values are rounded to the nearest neighbor count.
    pub fn from_value(value: T, fixed: bool) -> Self {
        if fixed {
            Bandwidth::Fixed(value)
        } else {
            Bandwidth::Adaptive(value.round().to_usize().unwrap_or(0))
        }
    }

    /// Bandwidth as a float, the form the evaluator consumes.
    pub fn value(&self) -> T {
        match *self {
            Bandwidth::Fixed(d) => d,
            Bandwidth::Adaptive(k) => T::from(k).unwrap_or_else(T::zero),
        }
    }

    /// Whether this is a fixed (distance) bandwidth.
    pub fn is_fixed(&self) -> bool {
        matches!(self, Bandwidth::Fixed(_))
    }
}

impl<T: Float + fmt::Display> fmt::Display for Bandwidth<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bandwidth::Fixed(d) => write!(f, "{:.2}", d),
            Bandwidth::Adaptive(k) => write!(f, "{} neighbors", k),
        }
    }
}
