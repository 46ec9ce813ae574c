//! High-level API for shape analysis.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point. It implements
//! a fluent builder for configuring a [`Solver`] and re-exports the types a
//! caller needs to add equations and data, solve, and read results.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with sensible defaults for all parameters.
//! * **Validated**: Parameters are validated when `.build()` is called.
//! * **Strict**: Setting a parameter twice is reported as an error rather
//!   than silently keeping the last value.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`SolverBuilder`] via `SolverBuilder::new()`.
//! 2. Chain configuration methods (`.bounds()`, `.num_points()`, etc.).
//! 3. Call `.build()` to get a [`Solver`].

// Internal dependencies
use crate::engine::analyzed::DEFAULT_NUM_POINTS;
use crate::engine::solver::DEFAULT_MAX_ITERATIONS;
use crate::engine::validator::Validator;

// Publicly re-exported types
pub use crate::algorithms::polar::PolarConicKind;
pub use crate::classifiers::quadratic::QuadraticType;
pub use crate::classifiers::{
    ClassificationResult, FailureReason, PolarShape, PolynomialShape, ShapeIdentity, TrigShape,
};
pub use crate::engine::analyzed::{AnalyzedData, AnalyzedEquation, AnalyzedItem, EquationProperties};
pub use crate::engine::solver::{Solution, Solver};
pub use crate::primitives::bounds::Bounds;
pub use crate::primitives::errors::{Result, ShapeError};
pub use crate::primitives::features::{FeatureNode, FeatureValue, Features};
pub use crate::primitives::points::{GraphTrail, MultiPointXY, PointXY};
pub use crate::primitives::symbolic::{Expression, PolynomialRelation, SymbolicPolynomial};
pub use crate::primitives::tolerances::Tolerances;

/// Fluent builder for configuring a [`Solver`].
#[derive(Debug, Clone, Default)]
pub struct SolverBuilder {
    /// Initial viewing window (default: `[-10, 10]` on both axes).
    pub bounds: Option<Bounds>,

    /// Numeric thresholds handed to every item.
    pub tolerances: Option<Tolerances>,

    /// Cap on bounds-maximization passes per solve (default: 10).
    pub max_iterations: Option<usize>,

    /// Samples per graph (default: 600).
    pub num_points: Option<usize>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl SolverBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial viewing window.
    pub fn bounds(mut self, left: f64, right: f64, top: f64, bottom: f64) -> Self {
        if self.bounds.is_some() {
            self.duplicate_param = Some("bounds");
        }
        self.bounds = Some(Bounds::new(left, right, top, bottom));
        self
    }

    /// Set the numeric tolerances.
    pub fn tolerances(mut self, tolerances: Tolerances) -> Self {
        if self.tolerances.is_some() {
            self.duplicate_param = Some("tolerances");
        }
        self.tolerances = Some(tolerances);
        self
    }

    /// Set the cap on bounds-maximization passes.
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        if self.max_iterations.is_some() {
            self.duplicate_param = Some("max_iterations");
        }
        self.max_iterations = Some(iterations);
        self
    }

    /// Set the number of samples per graph.
    pub fn num_points(mut self, num_points: usize) -> Self {
        if self.num_points.is_some() {
            self.duplicate_param = Some("num_points");
        }
        self.num_points = Some(num_points);
        self
    }

    /// Validate the configuration and build an empty solver.
    pub fn build(self) -> Result<Solver> {
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let bounds = self.bounds.unwrap_or_default();
        let tolerances = self.tolerances.unwrap_or_default();
        let max_iterations = self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS);
        let num_points = self.num_points.unwrap_or(DEFAULT_NUM_POINTS);

        Validator::validate_bounds(&bounds)?;
        Validator::validate_num_points(num_points)?;
        Validator::validate_max_iterations(max_iterations)?;
        Validator::validate_tolerances(&tolerances)?;

        Ok(Solver::with_settings(
            bounds,
            tolerances,
            max_iterations,
            num_points,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let solver = SolverBuilder::new().build().unwrap();
        assert_eq!(solver.bounds(), Bounds::default());
        assert_eq!(solver.num_points(), 600);
        assert_eq!(solver.max_iterations(), 10);
    }

    #[test]
    fn test_duplicate_parameter() {
        let err = SolverBuilder::new()
            .num_points(100)
            .num_points(200)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ShapeError::DuplicateParameter {
                parameter: "num_points"
            }
        );
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        assert!(matches!(
            SolverBuilder::new().bounds(5.0, -5.0, 5.0, -5.0).build(),
            Err(ShapeError::InvalidBounds { .. })
        ));
    }
}
