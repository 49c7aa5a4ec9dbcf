//! # gwr-select — Bandwidth selection for GWR and MGWR in Rust
//!
//! Selects the spatial smoothing bandwidth of a Geographically Weighted
//! Regression (GWR) model, or one bandwidth per covariate for a Multiscale GWR
//! (MGWR) model, by minimizing an information criterion.
//!
//! ## What is GWR bandwidth selection?
//!
//! GWR fits a separate weighted least squares regression at every observation
//! location. Observations are weighted by a kernel of their distance to that
//! location, and the kernel's reach is the *bandwidth*: either a distance
//! (fixed kernels) or a number of nearest neighbors (adaptive kernels).
//!
//! A small bandwidth follows local variation but overfits; a large one
//! approaches a global regression. The selector scores candidate bandwidths
//! with AICc, AIC, BIC or leave-one-out CV and returns the minimizer.
//!
//! **How it works:**
//!
//! 1. Derive search bounds from the data (or take them from the user)
//! 2. Probe bandwidths with golden-section, interval or Brent search
//! 3. Fit the GWR model at each probe and score it (results are cached)
//! 4. Return the best bandwidth together with convergence metadata
//!
//! MGWR repeats step 2-3 per covariate inside a backfitting loop until the
//! partial fits stop changing.
//!
//! ## Quick Start
//!
//! ```rust
//! use gwr_select::prelude::*;
//!
//! // A 6 x 6 grid of locations with one covariate.
//! let coords: Vec<[f64; 2]> = (0..36).map(|i| [(i % 6) as f64, (i / 6) as f64]).collect();
//! let x: Vec<f64> = (0..36).map(|i| ((i * 7) % 11) as f64).collect();
//! let y: Vec<f64> = coords
//!     .iter()
//!     .zip(&x)
//!     .map(|(c, &xi)| 1.0 + (0.5 + 0.1 * c[0]) * xi + 0.3 * ((c[1] * 1.7).sin()))
//!     .collect();
//!
//! let selector = Selector::new()
//!     .kernel(Bisquare)
//!     .fixed(false)
//!     .criterion(AICc)
//!     .mode(Single)
//!     .build()?;
//!
//! let result = selector.search(&coords, &y, &x)?;
//! println!("{}", result);
//! # Result::<(), GwrError>::Ok(())
//! ```
//!
//! ### Result and Error Handling
//!
//! `search` returns a `Result<SelectionResult<T>, GwrError>` (or
//! `MultiSelectionResult<T>` in `Multi` mode).
//!
//! - **`Ok(..)`**: the selected bandwidth(s), score, convergence flag and probe history.
//! - **`Err(GwrError)`**: invalid input or configuration, detected before any fit.
//!
//! A search that hits its iteration cap still returns `Ok` with
//! `converged == false`. Bandwidths too small for a non-singular local fit are
//! scored as `+inf` rather than failing the search.
//!
//! ## Parameters
//!
//! | Parameter             | Default          | Range/Options                 | Description                                   | Mode   |
//! |-----------------------|------------------|-------------------------------|-----------------------------------------------|--------|
//! | **kernel**            | `Bisquare`       | 7 kernels                     | Distance weighting kernel                     | All    |
//! | **fixed**             | false            | true/false                    | Distance (true) or neighbor-count bandwidth   | All    |
//! | **criterion**         | `AICc`           | `AICc`, `AIC`, `BIC`, `CV`    | Score to minimize                             | All    |
//! | **search_method**     | `GoldenSection`  | 3 methods                     | One-dimensional search strategy               | All    |
//! | **bw_min / bw_max**   | from the data    | (0, ∞) or [1, n]              | Search bounds                                 | All    |
//! | **interval**          | None             | (0, ∞)                        | Grid step (required for `Interval`)           | All    |
//! | **tol**               | 1e-6             | (0, ∞)                        | Golden-section score tolerance                | All    |
//! | **max_iter**          | 200 (500 scipy)  | [1, ∞)                        | Search iteration / evaluation cap             | All    |
//! | **constant**          | true             | true/false                    | Prepend an intercept column                   | All    |
//! | **parallel**          | false            | true/false                    | Score interval grids on rayon (`parallel`)    | All    |
//! | **tol_multi**         | 1e-5             | (0, ∞)                        | Backfitting tolerance                         | Multi  |
//! | **max_iter_multi**    | 200              | [1, ∞)                        | Backfitting sweep cap                         | Multi  |
//! | **multi_init**        | `PerCovariate`   | `PerCovariate`, `Global`, `Ols` | Initial partial fits                        | Multi  |
//! | **multi_convergence** | `ScoreOfChange`  | 3 measures                    | Convergence measure between sweeps            | Multi  |
//!
//! ### Parameter Options Reference
//!
//! | Parameter             | Available Options                                                                    |
//! |-----------------------|--------------------------------------------------------------------------------------|
//! | **kernel**            | `Gaussian`, `Bisquare`, `Exponential`, `Triangular`, `Uniform`, `Quadratic`, `Quartic` |
//! | **criterion**         | `AICc`, `AIC`, `BIC`, `CV`                                                           |
//! | **search_method**     | `GoldenSection`, `Interval`, `Scipy`                                                 |
//! | **multi_init**        | `PerCovariate`, `Global`, `Ols`                                                      |
//! | **multi_convergence** | `ScoreOfChange`, `ResidualSumOfSquares`, `Bandwidths`                                |
//!
//! All of these also parse from strings (`"bisquare".parse::<KernelFunction>()`).
//!
//! ## Builder
//!
//! 1. **Create builder**: `Selector::new()`
//! 2. **Configure parameters**: chain setters; each may be called once
//! 3. **Select mode**: `.mode(Single)` or `.mode(Multi)`
//! 4. **Build**: `.build()` validates the configuration
//! 5. **Search**: `.search(&coords, &y, &x)`
//!
//! ### Interval search
//!
//! ```rust
//! use gwr_select::prelude::*;
//! # let coords: Vec<[f64; 2]> = (0..36).map(|i| [(i % 6) as f64, (i / 6) as f64]).collect();
//! # let x: Vec<f64> = (0..36).map(|i| ((i * 7) % 11) as f64).collect();
//! # let y: Vec<f64> = x.iter().enumerate().map(|(i, &xi)| 2.0 + 0.5 * xi + (i as f64 * 1.3).sin()).collect();
//!
//! let selector = Selector::new()
//!     .search_method(Interval)
//!     .bw_min(10.0)
//!     .bw_max(30.0)
//!     .interval(5.0)
//!     .mode(Single)
//!     .build()?;
//!
//! let result = selector.search(&coords, &y, &x)?;
//! assert!(result.value() >= 10.0 && result.value() <= 30.0);
//! # Result::<(), GwrError>::Ok(())
//! ```
//!
//! ### Multiscale (MGWR)
//!
//! ```rust
//! use gwr_select::prelude::*;
//! # let coords: Vec<[f64; 2]> = (0..36).map(|i| [(i % 6) as f64, (i / 6) as f64]).collect();
//! # let x: Vec<f64> = (0..36).map(|i| ((i * 7) % 11) as f64).collect();
//! # let y: Vec<f64> = x.iter().enumerate().map(|(i, &xi)| 2.0 + 0.5 * xi + (i as f64 * 1.3).sin()).collect();
//!
//! let selector = Selector::new()
//!     .multi_init(PerCovariate)
//!     .tol_multi(1e-5)
//!     .max_iter_multi(20)
//!     .mode(Multi)
//!     .build()?;
//!
//! let result = selector.search(&coords, &y, &x)?;
//! assert_eq!(result.bandwidths.len(), 2); // intercept + one covariate
//! # Result::<(), GwrError>::Ok(())
//! ```
//!
//! ## Custom evaluators
//!
//! The searches only need a [`ModelEvaluator`](prelude::ModelEvaluator): any type
//! that can fit the model at a bandwidth. `SingleBandwidth::search_with` and
//! `MultiBandwidth::search_with` accept one in place of the built-in
//! [`GwrEvaluator`](prelude::GwrEvaluator).
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: probes and cache hits at
//! `debug`, finished searches and backfitting sweeps at `info`, and
//! non-convergence or clamped bounds at `warn`. Install any logger
//! (`env_logger`, ...) to see them.
//!
//! ## References
//!
//! - Fotheringham, A. S., Brunsdon, C. & Charlton, M. (2002). "Geographically Weighted Regression"
//! - Fotheringham, A. S., Yang, W. & Kang, W. (2017). "Multiscale Geographically Weighted Regression (MGWR)"
//! - Brent, R. P. (1973). "Algorithms for Minimization without Derivatives"

#![deny(missing_docs)]

// ============================================================================
// Internal Modules
// ============================================================================

// Layer 1: Primitives - data structures and basic utilities.
//
// Contains the error type, typed bandwidths and the evaluation cache.
mod primitives;

// Layer 2: Math - pure mathematical functions.
//
// Contains kernel functions, the pairwise distance matrix and the
// nalgebra-backed normal-equation solver.
mod math;

// Layer 3: Algorithms - model fitting and scoring.
//
// Contains the evaluator seam, the GWR and OLS fits, and the
// information criteria.
mod algorithms;

// Layer 4: Search - one-dimensional minimizers.
//
// Contains golden-section, interval and bounded Brent search.
mod search;

// Layer 5: Engine - orchestration and execution control.
//
// Contains validation, bandwidth selection, MGWR backfitting and
// result assembly.
mod engine;

// Layer 6: Adapters - selection mode adapters.
//
// Contains the single-bandwidth and multi-bandwidth execution builders.
mod adapters;

// High-level fluent API.
//
// Provides the `Selector` builder.
mod api;

// ============================================================================
// Prelude
// ============================================================================

/// Standard prelude.
///
/// This module is intended to be wildcard-imported for convenient access
/// to the most commonly used types:
///
/// ```
/// use gwr_select::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        Bandwidth,
        Criterion::{self, AICc, AIC, BIC, CV},
        Evaluation, GwrError, GwrEvaluator,
        KernelFunction::{
            self, Bisquare, Exponential, Gaussian, Quadratic, Quartic, Triangular, Uniform,
        },
        KernelSpec, LocalFit,
        Mode::{Multi, Single},
        ModelEvaluator, MultiBandwidth,
        MultiConvergence::{self, Bandwidths, ResidualSumOfSquares, ScoreOfChange},
        MultiInit::{self, Global, Ols, PerCovariate},
        MultiSelectionResult,
        SearchMethod::{self, GoldenSection, Interval, Scipy},
        SelectionResult, SelectorBuilder as Selector, SingleBandwidth,
    };
}

// ============================================================================
// Testing re-exports
// ============================================================================

/// Internal modules for development and testing.
///
/// This module re-exports internal modules for development and testing purposes.
/// It is only available with the `dev` feature enabled.
///
/// **Warning**: These are internal implementation details and may change without notice.
/// Do not use in production code.
#[cfg(feature = "dev")]
pub mod internals {
    /// Internal primitive types and utilities.
    pub mod primitives {
        pub use crate::primitives::*;
    }
    /// Internal math functions.
    pub mod math {
        pub use crate::math::*;
    }
    /// Internal model fitting and scoring.
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    /// Internal search strategies.
    pub mod search {
        pub use crate::search::*;
    }
    /// Internal execution engine.
    pub mod engine {
        pub use crate::engine::*;
    }
    /// Internal adapters.
    pub mod adapters {
        pub use crate::adapters::*;
    }
    /// Internal API.
    pub mod api {
        pub use crate::api::*;
    }
}
