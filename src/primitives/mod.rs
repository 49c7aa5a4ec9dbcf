//! Layer 1: Primitives
//!
//! # Purpose
//!
//! This layer provides the data types shared by every other layer:
//! - The crate error type
//! - Typed bandwidths
//! - The per-search evaluation cache
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
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Error types.
pub mod errors;

/// Fixed and adaptive bandwidth values.
pub mod bandwidth;

/// Memoization of objective evaluations.
pub mod cache;
