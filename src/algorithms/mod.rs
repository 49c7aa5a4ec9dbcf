//! Layer 3: Algorithms
//!
//! # Purpose
//!
//! This layer is the model-fit side of bandwidth selection:
//! - The `ModelEvaluator` seam the searches are written against
//! - A reference GWR evaluator (local weighted least squares)
//! - Ordinary least squares, used to seed multiscale backfitting
//! - Information criteria that turn a fit into a score
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
//! Layer 4: Search
//!   ↓
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Evaluator trait and fit results.
pub mod evaluator;

/// Reference geographically weighted regression.
pub mod gwr;

/// Global ordinary least squares.
pub mod ols;

/// Model selection criteria.
pub mod criterion;
