//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides pure mathematical functions used by the GWR evaluator:
//! - Spatial kernel functions (fixed and adaptive)
//! - Euclidean distances between observation locations
//! - Normal-equation solves backed by nalgebra
//!
//! These are reusable building blocks with no search-specific logic.
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
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Spatial kernel functions.
pub mod kernel;

/// Pairwise distances between locations.
pub mod distance;

/// Linear algebra backend.
pub mod linalg;
