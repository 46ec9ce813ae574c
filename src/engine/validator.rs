//! Input validation for solver configuration and data.
//!
//! ## Purpose
//!
//! This module checks solver settings and data columns before any
//! sampling or fitting starts: viewing bounds, sample counts, iteration
//! caps, tolerances and paired data columns.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Checks are ordered from cheap to expensive.
//!
//! ## Invariants
//!
//! * Validated bounds are finite with `left < right` and `bottom < top`.
//! * Validation is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not sort or deduplicate data.
//! * This module does not correct invalid inputs.

// Internal dependencies
use crate::primitives::bounds::Bounds;
use crate::primitives::errors::ShapeError;
use crate::primitives::symbolic::{Bindings, SymbolicPolynomial};
use crate::primitives::tolerances::Tolerances;

/// Fewest samples a graph can be drawn from.
pub const MIN_POINTS: usize = 2;

/// Most bounds-maximization passes the solver accepts.
pub const MAX_SOLVE_ITERATIONS: usize = 1000;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for solver configuration and input data.
///
/// All methods return `Result<(), ShapeError>` and fail fast upon
/// identifying the first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Data Validation
    // ========================================================================

    /// Validate paired data columns.
    pub fn validate_data(x: &[f64], y: &[f64]) -> Result<(), ShapeError> {
        // Check 1: Matching lengths
        if x.len() != y.len() {
            return Err(ShapeError::MismatchedData {
                x_len: x.len(),
                y_len: y.len(),
            });
        }

        // Check 2: Non-empty
        if x.is_empty() {
            return Err(ShapeError::EmptyData);
        }

        Ok(())
    }

    /// Validate an equation before it is analyzed.
    ///
    /// A relation with no variables must be a nonzero finite constant;
    /// `0 = 0` holds everywhere and `NaN = 0` nowhere meaningful.
    pub fn validate_relation(relation: &dyn SymbolicPolynomial) -> Result<(), ShapeError> {
        if relation.degree() > 0 || !relation.variables().is_empty() {
            return Ok(());
        }
        let c = relation.constant_term().evaluate(&Bindings::new());
        if c == 0.0 || !c.is_finite() {
            return Err(ShapeError::BadEquation(relation.text().to_string()));
        }
        Ok(())
    }

    /// Validate a viewing window.
    pub fn validate_bounds(b: &Bounds) -> Result<(), ShapeError> {
        let finite = [b.left, b.right, b.top, b.bottom]
            .iter()
            .all(|v| v.is_finite());
        if !finite || b.left >= b.right || b.bottom >= b.top {
            return Err(ShapeError::InvalidBounds {
                left: b.left,
                right: b.right,
                top: b.top,
                bottom: b.bottom,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate the number of samples per graph.
    pub fn validate_num_points(num_points: usize) -> Result<(), ShapeError> {
        if num_points < MIN_POINTS {
            return Err(ShapeError::InvalidParameter {
                parameter: "num_points",
                reason: format!("must be at least {MIN_POINTS}, got {num_points}"),
            });
        }
        Ok(())
    }

    /// Validate the cap on bounds-maximization passes.
    pub fn validate_max_iterations(iterations: usize) -> Result<(), ShapeError> {
        if iterations == 0 || iterations > MAX_SOLVE_ITERATIONS {
            return Err(ShapeError::InvalidParameter {
                parameter: "max_iterations",
                reason: format!(
                    "must be between 1 and {MAX_SOLVE_ITERATIONS}, got {iterations}"
                ),
            });
        }
        Ok(())
    }

    /// Validate that every tolerance is a usable threshold.
    pub fn validate_tolerances(tol: &Tolerances) -> Result<(), ShapeError> {
        let positive = [
            ("polynomial_epsilon", tol.polynomial_epsilon),
            ("closed_form_epsilon", tol.closed_form_epsilon),
            ("double_root", tol.double_root),
            ("bairstow_start", tol.bairstow_start),
            ("max_row_value", tol.max_row_value),
            ("negligible_ratio", tol.negligible_ratio),
            ("nearly_integer", tol.nearly_integer),
            ("function_spread", tol.function_spread),
            ("bisection_width", tol.bisection_width),
        ];
        for (parameter, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ShapeError::InvalidParameter {
                    parameter,
                    reason: format!("must be positive and finite, got {value}"),
                });
            }
        }

        if tol.max_iterations == 0 {
            return Err(ShapeError::InvalidParameter {
                parameter: "tolerances.max_iterations",
                reason: "must be at least 1".into(),
            });
        }
        if tol.rows_per_coefficient == 0 {
            return Err(ShapeError::InvalidParameter {
                parameter: "tolerances.rows_per_coefficient",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Builder Validation
    // ========================================================================

    /// Validate that no parameters were set multiple times in the builder.
    pub fn validate_no_duplicates(duplicate_param: Option<&'static str>) -> Result<(), ShapeError> {
        if let Some(param) = duplicate_param {
            return Err(ShapeError::DuplicateParameter { parameter: param });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_data() {
        assert!(Validator::validate_data(&[1.0, 2.0], &[3.0, 4.0]).is_ok());
        assert_eq!(
            Validator::validate_data(&[1.0], &[3.0, 4.0]),
            Err(ShapeError::MismatchedData { x_len: 1, y_len: 2 })
        );
        assert_eq!(
            Validator::validate_data(&[], &[]),
            Err(ShapeError::EmptyData)
        );
    }

    #[test]
    fn test_validate_bounds() {
        assert!(Validator::validate_bounds(&Bounds::default()).is_ok());
        assert!(Validator::validate_bounds(&Bounds::new(1.0, -1.0, 1.0, -1.0)).is_err());
        assert!(Validator::validate_bounds(&Bounds::new(-1.0, f64::NAN, 1.0, -1.0)).is_err());
    }

    #[test]
    fn test_validate_relation() {
        use crate::primitives::symbolic::PolynomialRelation;

        let zero = PolynomialRelation::new("0 = 0");
        assert_eq!(
            Validator::validate_relation(&zero),
            Err(ShapeError::BadEquation("0 = 0".to_string()))
        );
        let constant = PolynomialRelation::new("3 = 0").term(3.0, &[]);
        assert!(Validator::validate_relation(&constant).is_ok());
        let line = PolynomialRelation::new("y = 1").term(1.0, &[("y", 1)]).term(-1.0, &[]);
        assert!(Validator::validate_relation(&line).is_ok());
    }

    #[test]
    fn test_validate_parameters() {
        assert!(Validator::validate_num_points(600).is_ok());
        assert!(Validator::validate_num_points(1).is_err());
        assert!(Validator::validate_max_iterations(10).is_ok());
        assert!(Validator::validate_max_iterations(0).is_err());
        assert!(Validator::validate_tolerances(&Tolerances::default()).is_ok());
        assert_eq!(
            Validator::validate_no_duplicates(Some("bounds")),
            Err(ShapeError::DuplicateParameter {
                parameter: "bounds"
            })
        );
    }
}
