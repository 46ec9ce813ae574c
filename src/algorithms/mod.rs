//! Layer 3: Algorithms
//!
//! # Purpose
//!
//! Least-squares model fitting of sample points against fixed banks of
//! basis functions: implicit polynomials in `(x, y)` and polar generators
//! in `(r, theta)`.
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
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Row store, signature fits and candidate ranking.
pub mod builder;

/// Conic and rational models in `(x, y)`.
pub mod polynomial;

/// Polar families in `(r, theta)`.
pub mod polar;
