//! Layer 5: Engine
//!
//! # Purpose
//!
//! This layer turns configuration and data into selected bandwidths:
//! - Validation of inputs and settings
//! - The cache-aware criterion objective
//! - Single-bandwidth selection (bounds, strategy dispatch, rounding)
//! - MGWR backfitting
//! - Result types
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters
//!   ↓
//! Layer 5: Engine ← You are here
//!   ↓
//! Layer 4: Search
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Input and configuration validation.
pub mod validator;

/// Cache-aware criterion objective.
pub mod objective;

/// Single-bandwidth selector.
pub mod selector;

/// MGWR backfitting loop.
pub mod backfitting;

/// Result types.
pub mod output;
