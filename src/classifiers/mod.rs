//! Layer 4: Classifiers
//!
//! # Purpose
//!
//! Maps an analyzed item onto the shape taxonomy and derives the feature
//! bag describing the shape. Classification never fails with an error: an
//! unclassifiable item gets `ShapeIdentity::Unknown` and a failure reason.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Classifiers ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```
//!
//! The taxonomy is closed, so the classifier family is the [`Classifier`]
//! enum rather than a trait hierarchy.

// External dependencies
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::algorithms::polar::PolarConicKind;
use crate::algorithms::polynomial::{PolynomialCandidate, PolynomialFit};
use crate::primitives::bounds::Bounds;
use crate::primitives::features::{Features, trim_double};
use crate::primitives::points::{GraphTrail, MultiPointXY};
use crate::primitives::symbolic::SymbolicPolynomial;
use crate::primitives::tolerances::Tolerances;

/// Conic reduction and decision table.
pub mod quadratic;

/// Feature paths for each conic identity.
pub mod conic;

/// Monotone interval analysis.
pub mod intervals;

/// Rational, cubic, abs, sqrt and sampled-function paths.
pub mod polynomial;

/// Polar family paths.
pub mod polar;

/// Textual trig heuristics.
pub mod trig;

use self::polar::PolarClassifier;
use self::polynomial::PolynomialClassifier;
use self::quadratic::{QuadraticClassifier, QuadraticType};
use self::trig::TrigClassifier;

// ============================================================================
// Item View
// ============================================================================

/// What a classifier may read from an analyzed item.
#[derive(Debug, Clone, Copy)]
pub struct ItemView<'a> {
    /// Name of the item (the data column name or the equation text).
    pub name: &'a str,
    /// Literal equation text used by textual heuristics; empty for data.
    pub text: &'a str,
    /// The equation as printed.
    pub equation_print: &'a str,
    /// The reduced relation, absent for data.
    pub relation: Option<&'a dyn SymbolicPolynomial>,
    /// Abscissa and ordinate symbols.
    pub variables: &'a [String; 2],
    /// Total degree of the relation.
    pub degree: u32,
    /// True if every coefficient is constant.
    pub polynomial: bool,
    /// True if the relation can be solved for a single ordinate.
    pub solvable_function: bool,
    /// True for polar relations.
    pub polar: bool,
    /// Samples; `(theta, r)` for polar items.
    pub points: &'a [MultiPointXY],
    /// Continuous Cartesian trails.
    pub trails: &'a [GraphTrail],
    /// Abscissas where the curve meets the x-axis.
    pub x_intercepts: &'a [f64],
    /// Ordinates where the curve meets the y-axis.
    pub y_intercepts: &'a [f64],
    /// The window the item prefers.
    pub bounds: Bounds,
}

// ============================================================================
// Identities and Results
// ============================================================================

/// Why a classifier declined an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FailureReason {
    /// Classification succeeded.
    #[default]
    NoReason,
    /// Total degree above two.
    DegreeGreaterThan2,
    /// More than two variables.
    TooManyVariables,
    /// Coefficients depend on the variables.
    NonPolynomial,
    /// `r` and `theta` belong to the polar classifier.
    Polar,
    /// More than one coefficient is infinite or NaN.
    NonFinite,
    /// No model family fit the samples.
    NoAcceptableFit,
}

/// Shapes found by the polynomial classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolynomialShape {
    /// A polynomial function of the given degree.
    Polynomial(i32),
    /// A quotient of polynomials.
    Rational,
    /// A cubic polynomial function.
    Cubic,
    /// `y = a |x - h| + k`.
    AbsoluteValue,
    /// `y = a sqrt(b (x - h)) + k`.
    SquareRoot,
    /// A sampled function with no closed form.
    FunctionOverInterval,
    /// A relation that is not a function.
    Curve,
}

/// Shapes found by the polar classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolarShape {
    /// A focus-directrix conic.
    Conic(PolarConicKind),
    /// A circle about the pole.
    Circle,
    /// A straight line.
    Line,
    /// A rhodonea curve.
    Rose,
    /// A lemniscate of Bernoulli.
    Lemniscate,
    /// A limaçon or one of its relatives.
    Trochoid,
    /// Lines through the origin.
    RadialLines,
}

/// Shapes found by the trig classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrigShape {
    /// A sinusoid written with `sin`.
    Sine,
    /// A sinusoid written with `cos`.
    Cosine,
    /// A tangent function.
    Tangent,
    /// More than one trig function.
    Mixed,
}

/// Position of an item in the shape taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeIdentity {
    /// Not classified; see the failure reason.
    #[default]
    Unknown,
    /// A conic or degenerate conic.
    Quadratic(QuadraticType),
    /// A polynomial or rational function, or a sampled curve.
    Polynomial(PolynomialShape),
    /// A polar curve.
    Polar(PolarShape),
    /// A trigonometric function.
    Trig(TrigShape),
}

/// The shape decision for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Taxonomy value.
    pub identity: ShapeIdentity,
    /// Why the item is unknown, or `NoReason`.
    pub failure: FailureReason,
    /// Rotation of the principal axes in degrees.
    pub rotation: f64,
    /// Center offsets in the rotated frame.
    pub translation: (f64, f64),
    /// Normalized shape coefficients.
    pub coefficients: Vec<f64>,
    /// Features, always including `graphBoundaries`.
    pub features: Features,
}

impl ClassificationResult {
    /// A result with the given identity and features.
    pub fn new(identity: ShapeIdentity, features: Features) -> Self {
        Self {
            identity,
            failure: FailureReason::NoReason,
            rotation: 0.0,
            translation: (0.0, 0.0),
            coefficients: Vec::new(),
            features,
        }
    }

    /// An unknown result.
    pub fn unknown(failure: FailureReason, features: Features) -> Self {
        Self {
            failure,
            ..Self::new(ShapeIdentity::Unknown, features)
        }
    }

    /// True if the identity is known.
    pub fn is_classified(&self) -> bool {
        self.identity != ShapeIdentity::Unknown
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// One classifier per family.
#[derive(Debug, Clone)]
pub enum Classifier {
    /// Conics in two variables.
    Quadratic(Box<QuadraticClassifier>),
    /// Model-fitted polynomial, rational and sampled functions.
    Polynomial(Box<PolynomialClassifier>),
    /// Model-fitted polar curves.
    Polar(Box<PolarClassifier>),
    /// Sine, cosine and tangent by text.
    Trig(TrigClassifier),
    /// Fallback with graph features only.
    Generic,
}

impl Classifier {
    /// Choose the classifier for an equation.
    ///
    /// Quadratic relations use the conic reduction directly, polar
    /// relations are fitted in `(r, theta)`, trig functions are recognized
    /// by text, and everything else is fitted against polynomial models. A
    /// fitted conic that is a function is reduced as a conic.
    pub fn for_equation(view: &ItemView<'_>, quadratic: bool, tol: &Tolerances) -> Self {
        if quadratic {
            if let Some(rel) = view.relation {
                return Self::Quadratic(Box::new(QuadraticClassifier::new(rel, tol)));
            }
        }
        if view.polar {
            return Self::Polar(Box::new(PolarClassifier::new(view.points, tol)));
        }
        if let Some(trig) = TrigClassifier::detect(view.text) {
            return Self::Trig(trig);
        }
        Self::fitted(view.points, tol)
    }

    /// Choose the classifier for sampled data.
    pub fn for_data(points: &[MultiPointXY], tol: &Tolerances) -> Self {
        Self::Polynomial(Box::new(PolynomialClassifier::new(
            PolynomialFit::new(points, tol),
        )))
    }

    fn fitted(points: &[MultiPointXY], tol: &Tolerances) -> Self {
        let fit = PolynomialFit::new(points, tol);
        match fit.best_guess() {
            None => Self::Generic,
            Some(PolynomialCandidate::Quadratic(q)) => {
                let qc = QuadraticClassifier::new(&q.relation(tol), tol);
                if qc.is_function() {
                    Self::Quadratic(Box::new(qc))
                } else {
                    Self::Polynomial(Box::new(PolynomialClassifier::new(fit)))
                }
            }
            Some(PolynomialCandidate::Rational(_)) => {
                Self::Polynomial(Box::new(PolynomialClassifier::new(fit)))
            }
        }
    }

    /// Short name of the family.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Quadratic(_) => "quadratic",
            Self::Polynomial(_) => "polynomial",
            Self::Polar(_) => "polar",
            Self::Trig(_) => "trig",
            Self::Generic => "generic",
        }
    }

    /// Classify an equation item.
    pub fn classify(&self, view: &ItemView<'_>, tol: &Tolerances) -> ClassificationResult {
        let mut result = match self {
            Self::Quadratic(qc) => conic::classify(qc, view, tol),
            Self::Polynomial(pc) => pc.classify(view, tol),
            Self::Polar(pc) => pc.classify(view, tol),
            Self::Trig(tc) => tc.classify(view),
            Self::Generic => generic(view),
        };
        add_graph_boundaries(&mut result.features, &view.bounds);
        result
    }

    /// Classify a data item.
    pub fn classify_data(&self, view: &ItemView<'_>, tol: &Tolerances) -> ClassificationResult {
        let best = match self {
            Self::Polynomial(pc) => pc.best_guess(),
            _ => None,
        };
        let mut result = polynomial::equation_data(view, best, tol);
        add_graph_boundaries(&mut result.features, &view.bounds);
        result
    }
}

// ============================================================================
// Shared Feature Paths
// ============================================================================

/// Text of the `graphBoundaries` feature.
pub fn graph_boundaries(b: &Bounds) -> String {
    format!(
        "x = {} to {} and y = {} to {}",
        trim_double(b.left, 6),
        trim_double(b.right, 6),
        trim_double(b.bottom, 6),
        trim_double(b.top, 6)
    )
}

fn add_graph_boundaries(features: &mut Features, b: &Bounds) {
    features.put_new("graphBoundaries", graph_boundaries(b));
}

/// Base Cartesian graph features: coordinate system, symbols and intercepts.
pub fn xy_graph(view: &ItemView<'_>, name: Option<&str>) -> Features {
    let mut f = Features::new();
    if let Some(name) = name {
        f.put_new("graphName", name);
    }
    f.put("coordinateSystem", "Cartesian");
    f.put("equationPrint", view.equation_print);
    f.put("abscissaSymbol", view.variables[0].as_str());
    f.put("ordinateSymbol", view.variables[1].as_str());

    if matches!(name, Some("null set") | Some("all points")) {
        return f;
    }
    for v in dedup_consecutive(view.x_intercepts) {
        f.put("xIntercepts", trim_double(v, 6));
    }
    for v in dedup_consecutive(view.y_intercepts) {
        f.put("yIntercepts", trim_double(v, 6));
    }
    f
}

fn dedup_consecutive(values: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::with_capacity(values.len());
    for &v in values {
        if out.last() != Some(&v) {
            out.push(v);
        }
    }
    out
}

/// Features of an item no family claimed.
pub fn generic(view: &ItemView<'_>) -> ClassificationResult {
    let failure = FailureReason::NoAcceptableFit;
    if view.polar {
        let mut f = Features::new();
        f.put("coordinateSystem", "polar");
        f.put("equationPrint", view.equation_print);
        return ClassificationResult::unknown(failure, f);
    }
    ClassificationResult::unknown(failure, xy_graph(view, None))
}
