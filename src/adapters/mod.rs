//! Layer 6: Adapters
//!
//! # Purpose
//!
//! This layer provides the execution builders the API hands off to:
//! - Single: one bandwidth shared by every covariate (GWR)
//! - Multi: one bandwidth per covariate (MGWR backfitting)
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters ← You are here
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Search
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

use num_traits::Float;

use crate::primitives::errors::GwrError;

/// Single-bandwidth (GWR) execution.
pub mod single;

/// Multi-bandwidth (MGWR) execution.
pub mod multi;

/// Build the design matrix from raw covariates, row-major.
///
/// Returns the design and its column count. With `constant` an intercept
/// column of ones is prepended.
pub fn design_matrix<T: Float>(
    x: &[T],
    n: usize,
    constant: bool,
) -> Result<(Vec<T>, usize), GwrError> {
    if n == 0 {
        return Err(GwrError::EmptyInput);
    }
    if x.len() % n != 0 {
        return Err(GwrError::MismatchedInputs {
            coords: n,
            y_len: n,
            x_len: x.len(),
        });
    }
    let p = x.len() / n;
    if !constant {
        return Ok((x.to_vec(), p));
    }

    let k = p + 1;
    let mut design = Vec::with_capacity(n * k);
    for i in 0..n {
        design.push(T::one());
        design.extend_from_slice(&x[i * p..(i + 1) * p]);
    }
    Ok((design, k))
}
