//! Layer 2: Math
//!
//! # Purpose
//!
//! Pure numeric building blocks with no classification logic:
//! - Dense polynomials and their real zeros
//! - Closed-form and iterative root factorization
//! - Dense matrices with singular value decomposition
//! - Integer scaling and angle normalization helpers
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Classifiers
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

// External dependencies
use num_traits::Float;

/// Dense single-variable polynomials.
pub mod polynomial;

/// Linear and quadratic root factors.
pub mod factor;

/// Closed-form roots for degrees 1 to 4.
pub mod closed_form;

/// Newton and Bairstow factorization with multiplicities.
pub mod iterative;

/// Dense matrices.
pub mod matrix;

/// Singular value decomposition.
pub mod svd;

/// Presentation helpers.
pub mod numbers;

/// Convert an `f64` constant into `T`.
#[inline]
pub fn cast<T: Float>(v: f64) -> T {
    T::from(v).unwrap_or_else(T::nan)
}
