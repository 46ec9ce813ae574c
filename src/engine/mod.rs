//! Layer 5: Engine
//!
//! # Purpose
//!
//! Orchestrates sampling and classification: analyzed items know how to
//! sample and classify themselves, and the solver drives them over a shared
//! viewing window.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine ← You are here
//!   ↓
//! Layer 4: Classifiers
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Analyzed equations and data columns.
pub mod analyzed;

/// The solver and its solutions.
pub mod solver;

/// Configuration and data validation.
pub mod validator;
