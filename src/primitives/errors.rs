//! Error types for shape analysis.
//!
//! ## Purpose
//!
//! This module defines the single error enum returned by every fallible
//! operation in the crate. Invalid arguments (mismatched matrix dimensions,
//! a trivial divisor, out-of-range indices) are fatal to the call that
//! raised them and never leave partial results behind.
//!
//! ## Design notes
//!
//! * **Typed variants**: Each failure carries the values needed to explain it.
//! * **Stable messages**: `Display` strings are part of the public contract.
//! * **Failure is not always an error**: A classifier that cannot identify a
//!   shape records a `FailureReason` in its result instead of returning `Err`.
//!
//! ## Non-goals
//!
//! * This module does not log; callers decide whether an error is noteworthy.

// External dependencies
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ShapeError>;

/// Errors that can occur while building, fitting or classifying shapes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// Polynomial division by the zero polynomial.
    #[error("Division by a trivial polynomial")]
    TrivialDivisor,

    /// Closed-form root extraction only handles degrees 1 through 4.
    #[error("Unsupported polynomial degree {degree} (closed form handles 1 to 4)")]
    UnsupportedDegree {
        /// Degree that was requested.
        degree: i32,
    },

    /// Matrix operands have incompatible shapes.
    #[error("Dimension mismatch in {op}: {}x{} vs {}x{}", left.0, left.1, right.0, right.1)]
    DimensionMismatch {
        /// Operation name.
        op: &'static str,
        /// Left operand (rows, cols).
        left: (usize, usize),
        /// Right operand (rows, cols).
        right: (usize, usize),
    },

    /// Requested submatrix exceeds the source matrix.
    #[error("Submatrix {rows}x{cols} exceeds matrix of size {max_rows}x{max_cols}")]
    SubmatrixOutOfRange {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
        /// Available rows.
        max_rows: usize,
        /// Available columns.
        max_cols: usize,
    },

    /// Data columns have different lengths.
    #[error("Length mismatch: x has {x_len} values, y has {y_len}")]
    MismatchedData {
        /// Length of the x column.
        x_len: usize,
        /// Length of the y column.
        y_len: usize,
    },

    /// Data columns are empty.
    #[error("Data columns are empty")]
    EmptyData,

    /// The equation could not be analyzed.
    #[error("Bad equation: {0}")]
    BadEquation(String),

    /// The equation names more than two variables.
    #[error("Too many variables: got {count}, at most 2 are supported")]
    TooManyVariables {
        /// Number of variables found.
        count: usize,
    },

    /// The quartic resolvent produced a negative square.
    #[error("Negative resolvent root: {0}")]
    NegativeResolvent(f64),

    /// Index past the end of a collection.
    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Collection length.
        len: usize,
    },

    /// A graph was marked for sonification while hidden.
    #[error("Graph can not be sonified if it is not shown")]
    SonifyHidden,

    /// A builder parameter was set more than once.
    #[error("Parameter '{parameter}' was set more than once")]
    DuplicateParameter {
        /// Parameter name.
        parameter: &'static str,
    },

    /// Bounds are not finite or are inverted.
    #[error("Invalid bounds: left={left}, right={right}, top={top}, bottom={bottom}")]
    InvalidBounds {
        /// Left edge.
        left: f64,
        /// Right edge.
        right: f64,
        /// Top edge.
        top: f64,
        /// Bottom edge.
        bottom: f64,
    },

    /// A builder parameter is outside its accepted range.
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        parameter: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
