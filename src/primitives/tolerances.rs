//! Numeric tolerances for root finding, fitting and classification.
//!
//! ## Purpose
//!
//! Every threshold the numeric routines compare against lives here, so that
//! a caller can audit or tighten them in one place and pass them explicitly
//! into root finders and classifiers.
//!
//! ## Design notes
//!
//! * **Plain data**: `Tolerances` is `Copy` and serializable.
//! * **Defaults**: `Tolerances::default()` reproduces the documented constants.

// External dependencies
use serde::{Deserialize, Serialize};

/// Named thresholds used throughout the crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    // ------------------------------------------------------------------------
    // Polynomials and closed-form roots
    // ------------------------------------------------------------------------
    /// Relative coefficient epsilon (times mean magnitude) for trimming.
    pub polynomial_epsilon: f64,
    /// Generic branch threshold of the cubic and quartic formulas.
    pub closed_form_epsilon: f64,
    /// Distance under which two roots are treated as one.
    pub double_root: f64,

    // ------------------------------------------------------------------------
    // Iterative roots
    // ------------------------------------------------------------------------
    /// Iteration cap for Newton and Bairstow steps.
    pub max_iterations: usize,
    /// Iterations after which the Bairstow tolerance loosens 10x.
    pub loosen_every: usize,
    /// Initial Bairstow correction tolerance.
    pub bairstow_start: f64,
    /// Residual below which a linear factor is accepted.
    pub linear_accept: f64,
    /// Residual below which a quadratic factor is accepted.
    pub quadratic_accept: f64,
    /// Agreement needed for a derivative root to count toward multiplicity.
    pub linear_multiplicity: f64,
    /// Agreement needed for a derivative quadratic to count toward multiplicity.
    pub quadratic_multiplicity: f64,
    /// Coefficients below this magnitude are dropped before iterating.
    pub negligible_coefficient: f64,

    // ------------------------------------------------------------------------
    // Model fitting
    // ------------------------------------------------------------------------
    /// Rows with any value larger than this are discarded.
    pub max_row_value: f64,
    /// Valid rows needed per fitted coefficient.
    pub rows_per_coefficient: usize,
    /// Coefficients below this fraction of the largest are pruned.
    pub prune_ratio: f64,
    /// Worst acceptable fit for polynomial families.
    pub polynomial_worst_fit: f64,
    /// Worst acceptable fit for polar families.
    pub polar_worst_fit: f64,

    // ------------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------------
    /// Quadratic coefficients below this fraction of the norm are zero.
    pub negligible_ratio: f64,
    /// Relative tolerance for recognizing small integers.
    pub nearly_integer: f64,
    /// Largest multiplier tried when scaling coefficients to integers.
    pub integer_limit: usize,
    /// Eccentricity distance from 1 that still counts as a parabola.
    pub parabolic_eccentricity: f64,
    /// Spread in ordinates above which a relation is not a function.
    pub function_spread: f64,
    /// Abscissa resolution of jump refinement by bisection.
    pub bisection_width: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            polynomial_epsilon: 1e-8,
            closed_form_epsilon: 1e-10,
            double_root: 1e-8,
            max_iterations: 500,
            loosen_every: 200,
            bairstow_start: 1e-15,
            linear_accept: 1e-12,
            quadratic_accept: 1e-4,
            linear_multiplicity: 1e-3,
            quadratic_multiplicity: 1e-2,
            negligible_coefficient: 1e-15,
            max_row_value: 200.0,
            rows_per_coefficient: 10,
            prune_ratio: 1e-8,
            polynomial_worst_fit: -12.0,
            polar_worst_fit: -10.0,
            negligible_ratio: 1e-9,
            nearly_integer: 1e-6,
            integer_limit: 100,
            parabolic_eccentricity: 1e-6,
            function_spread: 1e-3,
            bisection_width: 1e-8,
        }
    }
}
