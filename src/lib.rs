//! # shapes-rs — Shape Classification for Plane Curves
//!
//! Identifies what a plane curve looks like and describes it as a bag of
//! named features: a circle's center and radius, a parabola's vertex and
//! focus, the petals of a polar rose, the asymptotes of a rational function.
//!
//! ## What does it do?
//!
//! Given equations (symbolic polynomial relations in two variables) or
//! sampled data columns, a [`Solver`](prelude::Solver):
//!
//! 1. Samples each item across a viewing window and cuts the samples into
//!    continuous trails.
//! 2. Picks a classifier: conic reduction for quadratics, least-squares
//!    model fitting for other polynomial and polar relations, textual
//!    heuristics for trig functions.
//! 3. Records a taxonomy identity plus features such as intercepts,
//!    domain and range, vertices, foci, asymptotes and monotone intervals.
//! 4. Grows the shared viewing window until it covers every item.
//!
//! Underneath sit the numeric building blocks: closed-form roots for
//! degrees 1 to 4, Bairstow factorization with multiplicity detection for
//! higher degrees, and a singular value decomposition used as the
//! least-squares fitting primitive.
//!
//! ## Quick Start
//!
//! ```rust
//! use shapes_rs::prelude::*;
//!
//! // x^2 + y^2 - 4 = 0
//! let circle = PolynomialRelation::conic([1.0, 0.0, 1.0, 0.0, 0.0, -4.0]);
//!
//! let mut solver = SolverBuilder::new().num_points(200).build()?;
//! solver.add_equation(circle)?;
//! solver.solve()?;
//!
//! let result = solver.get(0).and_then(|s| s.result()).unwrap();
//! assert_eq!(
//!     result.identity,
//!     ShapeIdentity::Quadratic(QuadraticType::Ellipse)
//! );
//! println!("{}", result.features.to_xml());
//! # Result::<(), ShapeError>::Ok(())
//! ```
//!
//! ## Data
//!
//! Data columns are sorted by abscissa, resampled to the configured number
//! of points and fitted against implicit polynomial models:
//!
//! ```rust
//! use shapes_rs::prelude::*;
//!
//! let x: Vec<f64> = (0..50).map(|i| -5.0 + 0.2 * i as f64).collect();
//! let y: Vec<f64> = x.iter().map(|x| 3.0 * x * x + 1.0).collect();
//!
//! let mut solver = SolverBuilder::new().build()?;
//! solver.add_data("t", "height", &x, &y)?;
//! solver.solve()?;
//! assert!(solver.any_describable());
//! # Result::<(), ShapeError>::Ok(())
//! ```
//!
//! ## Builder
//!
//! | Parameter        | Default         | Meaning                               |
//! |------------------|-----------------|---------------------------------------|
//! | `bounds`         | `[-10, 10]²`    | initial viewing window                |
//! | `num_points`     | 600             | samples per graph                     |
//! | `max_iterations` | 10              | bounds-maximization passes per solve  |
//! | `tolerances`     | documented set  | every numeric threshold               |
//!
//! Setting a parameter twice makes `build()` fail with
//! `ShapeError::DuplicateParameter`.
//!
//! ## Errors
//!
//! Invalid arguments (mismatched data columns, inverted bounds, equations
//! with more than two variables) fail the single call that raised them.
//! A shape that can not be identified is not an error: its result carries
//! `ShapeIdentity::Unknown` and a `FailureReason`.
//!
//! ## Logging
//!
//! The crate emits `tracing` events (`debug` for classification decisions,
//! `trace` for sampling and factorization, `warn` for rejected inputs and
//! non-converging iterations). Install any `tracing` subscriber to see them.

#![deny(missing_docs)]

// ============================================================================
// Internal Modules
// ============================================================================

// Layer 1: Primitives - data structures and basic utilities.
//
// Contains the error type, bounds, sample points and trails, tolerances,
// feature bags and the symbolic polynomial seam.
mod primitives;

// Layer 2: Math - pure numeric functions.
//
// Contains dense polynomials, closed-form and iterative root finding,
// dense matrices and the singular value decomposition.
mod math;

// Layer 3: Algorithms - least-squares model fitting.
//
// Contains the row store and signature fits, plus the implicit polynomial
// and polar model families.
mod algorithms;

// Layer 4: Classifiers - shape taxonomy and features.
//
// Contains the conic reduction and the polynomial, polar and trig
// classifiers with their feature paths.
mod classifiers;

// Layer 5: Engine - orchestration.
//
// Contains analyzed items, the solver and validation.
mod engine;

// High-level fluent API.
//
// Provides the `SolverBuilder` for configuring a solver.
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
/// use shapes_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        AnalyzedData, AnalyzedEquation, AnalyzedItem, Bounds, ClassificationResult,
        EquationProperties, FailureReason, FeatureNode, FeatureValue, Features, GraphTrail,
        MultiPointXY, PointXY, PolarConicKind, PolarShape, PolynomialRelation, PolynomialShape,
        QuadraticType, ShapeError, ShapeIdentity, Solution, Solver, SolverBuilder,
        SymbolicPolynomial, Tolerances, TrigShape,
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
    /// Internal model fitting.
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    /// Internal classifiers.
    pub mod classifiers {
        pub use crate::classifiers::*;
    }
    /// Internal execution engine.
    pub mod engine {
        pub use crate::engine::*;
    }
    /// Internal API.
    pub mod api {
        pub use crate::api::*;
    }
}
