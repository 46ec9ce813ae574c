//! Layer 1: Primitives
//!
//! # Purpose
//!
//! Data structures and small utilities shared by every other layer: the
//! crate error type, viewing bounds, sample points and trails, tolerances,
//! feature bags and the symbolic polynomial seam.
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
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Crate error type.
pub mod errors;

/// Axis-aligned viewing windows.
pub mod bounds;

/// Sample points and graph trails.
pub mod points;

/// Centralized numeric tolerances.
pub mod tolerances;

/// Ordered feature bags and formatting helpers.
pub mod features;

/// Symbolic polynomial seam.
pub mod symbolic;
