//! Spatial kernel functions for GWR weighting.
//!
//! ## Purpose
//!
//! This module maps the distance between a regression location and an
//! observation to a weight, given the local bandwidth.
//!
//! ## Design notes
//!
//! * **Normalization**: Weights are computed from `z = d / bandwidth`.
//! * **Truncation**: Bounded kernels return exactly zero beyond the bandwidth;
//!   Gaussian and exponential kernels are never truncated.
//! * **Adaptive**: For adaptive kernels the bandwidth at a location is the
//!   distance to its k-th nearest observation, scaled by [`ADAPTIVE_EPS`] so
//!   the k-th neighbor keeps a small positive weight under bounded kernels.
//!
//! ## Invariants
//!
//! * Kernels are non-negative and equal their maximum at `z = 0`.
//!
//! ## Non-goals
//!
//! * This module does not choose the bandwidth.

use core::fmt;
use core::str::FromStr;

use num_traits::Float;

use crate::primitives::errors::GwrError;

/// Scale applied to the k-th neighbor distance for adaptive bandwidths.
pub const ADAPTIVE_EPS: f64 = 1.0000001;

// ============================================================================
// Kernel Function Enum
// ============================================================================

/// Kernel family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelFunction {
    /// Gaussian kernel: K(z) = exp(-z^2 / 2). Unbounded.
    Gaussian,

    /// Bisquare kernel: K(z) = (1 - z^2)^2 for z < 1.
    #[default]
    Bisquare,

    /// Exponential kernel: K(z) = exp(-z). Unbounded.
    Exponential,

    /// Triangular kernel: K(z) = 1 - z for z < 1.
    Triangular,

    /// Uniform kernel: K(z) = 1/2 for z < 1.
    Uniform,

    /// Quadratic (Epanechnikov) kernel: K(z) = 3/4 (1 - z^2) for z < 1.
    Quadratic,

    /// Quartic kernel: K(z) = 15/16 (1 - z^2)^2 for z < 1.
    Quartic,
}

impl KernelFunction {
    /// Get the name of the kernel.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            KernelFunction::Gaussian => "gaussian",
            KernelFunction::Bisquare => "bisquare",
            KernelFunction::Exponential => "exponential",
            KernelFunction::Triangular => "triangular",
            KernelFunction::Uniform => "uniform",
            KernelFunction::Quadratic => "quadratic",
            KernelFunction::Quartic => "quartic",
        }
    }

    /// Returns `true` if weights beyond the bandwidth are set to zero.
    #[inline]
    pub const fn is_truncated(&self) -> bool {
        !matches!(self, KernelFunction::Gaussian | KernelFunction::Exponential)
    }

    /// Compute the kernel value for a normalized distance `z = d / bandwidth`.
    ///
    /// Truncation is not applied here; see [`KernelFunction::weight`].
    #[inline]
    pub fn compute_weight<T: Float>(&self, z: T) -> T {
        let one = T::one();
        match self {
            KernelFunction::Gaussian => (T::from(-0.5).unwrap() * z * z).exp(),
            KernelFunction::Bisquare => {
                let tmp = one - z * z;
                tmp * tmp
            }
            KernelFunction::Exponential => (-z).exp(),
            KernelFunction::Triangular => one - z,
            KernelFunction::Uniform => T::from(0.5).unwrap(),
            KernelFunction::Quadratic => T::from(0.75).unwrap() * (one - z * z),
            KernelFunction::Quartic => {
                let tmp = one - z * z;
                T::from(15.0 / 16.0).unwrap() * tmp * tmp
            }
        }
    }

    /// Weight of an observation at `distance` from a location with local `bandwidth`.
    #[inline]
    pub fn weight<T: Float>(&self, distance: T, bandwidth: T) -> T {
        if bandwidth <= T::zero() {
            // Degenerate neighborhood: only coincident observations count.
            return if distance <= T::zero() {
                self.compute_weight(T::zero())
            } else {
                T::zero()
            };
        }
        if self.is_truncated() && distance > bandwidth {
            return T::zero();
        }
        self.compute_weight(distance / bandwidth)
    }
}

impl fmt::Display for KernelFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelFunction {
    type Err = GwrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gaussian" => Ok(KernelFunction::Gaussian),
            "bisquare" => Ok(KernelFunction::Bisquare),
            "exponential" => Ok(KernelFunction::Exponential),
            "triangular" => Ok(KernelFunction::Triangular),
            "uniform" => Ok(KernelFunction::Uniform),
            "quadratic" => Ok(KernelFunction::Quadratic),
            "quartic" => Ok(KernelFunction::Quartic),
            _ => Err(GwrError::UnknownKernel(s.to_string())),
        }
    }
}

// ============================================================================
// Kernel Specification
// ============================================================================

/// Kernel family plus bandwidth type. Immutable for the duration of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelSpec {
    /// Kernel family.
    pub function: KernelFunction,

    /// `true` for distance bandwidths, `false` for neighbor counts.
    pub fixed: bool,
}

impl Default for KernelSpec {
    fn default() -> Self {
        Self {
            function: KernelFunction::default(),
            fixed: false,
        }
    }
}

impl KernelSpec {
    /// Create a kernel specification.
    pub const fn new(function: KernelFunction, fixed: bool) -> Self {
        Self { function, fixed }
    }

    /// Local bandwidth at a location.
    ///
    /// For fixed kernels this is `bandwidth` itself. For adaptive kernels it is
    /// the distance to the `bandwidth`-th nearest observation taken from the
    /// location's ascending distance row (the location itself is first).
    pub fn local_bandwidth<T: Float>(&self, bandwidth: T, sorted_row: &[T]) -> T {
        if self.fixed {
            return bandwidth;
        }
        let k = bandwidth.round().to_usize().unwrap_or(1).clamp(1, sorted_row.len());
        sorted_row[k - 1] * T::from(ADAPTIVE_EPS).unwrap()
    }
}

impl fmt::Display for KernelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.fixed { "fixed" } else { "adaptive" };
        write!(f, "{} {}", kind, self.function)
    }
}
