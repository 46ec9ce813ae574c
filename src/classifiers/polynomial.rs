//! Feature paths for polynomial, rational and sampled functions.
//!
//! ## Purpose
//!
//! Handles every Cartesian item that is not reduced as a conic: rational
//! functions `y = N(x) / D(x)` (with polynomials and cubics as special
//! cases), the `abs(` and `sqrt(` forms, sampled functions with no closed
//! form, and relations that are not functions at all.
//!
//! ## Design notes
//!
//! * **Closed form first**: a polynomial relation that is linear in the
//!   ordinate is analyzed exactly from its numerator and denominator;
//!   samples are only used when no closed form is available.
//! * **End points**: extrema and inflection points are typed from the sign
//!   signature of the derivative's numerator; vertical asymptotes from the
//!   sign signature of the denominator.

// External dependencies
use tracing::debug;

// Internal dependencies
use crate::algorithms::polynomial::{PolynomialCandidate, PolynomialFit};
use crate::classifiers::intervals::{
    EndpointType, IntervalEndpoint, analysis_node, trail_endpoints,
};
use crate::classifiers::{ClassificationResult, ItemView, PolynomialShape, ShapeIdentity, xy_graph};
use crate::math::polynomial::{Polynomial, SignSignature};
use crate::primitives::features::{FeatureNode, Features, Interval};
use crate::primitives::points::{GraphTrail, PointXY};
use crate::primitives::symbolic::{Bindings, SymbolicPolynomial};
use crate::primitives::tolerances::Tolerances;

/// Classifier for items fitted against the conic and rational families.
#[derive(Debug, Clone)]
pub struct PolynomialClassifier {
    fit: PolynomialFit,
}

impl PolynomialClassifier {
    /// Wrap a finished fit.
    pub fn new(fit: PolynomialFit) -> Self {
        Self { fit }
    }

    /// The simplest acceptable candidate.
    pub fn best_guess(&self) -> Option<&PolynomialCandidate> {
        self.fit.best_guess()
    }

    /// Classify an equation item.
    pub fn classify(&self, view: &ItemView<'_>, tol: &Tolerances) -> ClassificationResult {
        if !view.solvable_function {
            return curve(view);
        }
        if !view.polynomial {
            if view.text.contains("abs(") {
                if let Some(r) = absolute_value(view) {
                    return r;
                }
            } else if view.text.contains("sqrt(") {
                if let Some(r) = square_root(view) {
                    return r;
                }
            }
            return equation_data(view, self.best_guess(), tol);
        }

        let parts = view
            .relation
            .and_then(|rel| solved_for_ordinate(rel, view.variables, view.degree, tol))
            .or_else(|| match self.best_guess() {
                Some(PolynomialCandidate::Rational(m)) => {
                    Some((m.numerator(tol), m.denominator(tol)))
                }
                _ => None,
            });
        match parts {
            Some((n, d)) => rational(view, &n, &d, view.degree == 3),
            None => curve(view),
        }
    }
}

// ============================================================================
// Rational Functions
// ============================================================================

/// `(N, D)` with `D(x) y - N(x) = 0`, or `None` if the relation is not
/// linear in the ordinate.
fn solved_for_ordinate(
    rel: &dyn SymbolicPolynomial,
    vars: &[String; 2],
    degree: u32,
    tol: &Tolerances,
) -> Option<(Polynomial<f64>, Polynomial<f64>)> {
    let (x, y) = (vars[0].as_str(), vars[1].as_str());
    if rel.coefficients_in(y).len() != 2 {
        return None;
    }
    let bindings = Bindings::new();
    let mut n = Vec::with_capacity(degree as usize + 1);
    let mut d = Vec::with_capacity(degree as usize + 1);
    for j in (0..=degree).rev() {
        n.push(-rel.coefficient(&[x], &[j]).evaluate(&bindings));
        d.push(rel.coefficient(&[x, y], &[j, 1]).evaluate(&bindings));
    }
    let d = Polynomial::new_with(&d, tol);
    if d.is_trivial() {
        return None;
    }
    Some((Polynomial::new_with(&n, tol), d))
}

/// `p / cf` when the common factor is not constant.
fn reduce(p: &Polynomial<f64>, cf: &Polynomial<f64>) -> Polynomial<f64> {
    if cf.is_constant() {
        return p.clone();
    }
    p.quotient(cf).map(|(q, _)| q).unwrap_or_else(|_| p.clone())
}

fn rational(
    view: &ItemView<'_>,
    n: &Polynomial<f64>,
    d: &Polynomial<f64>,
    cubic: bool,
) -> ClassificationResult {
    let cf = n.gcd(d).unwrap_or_else(|_| Polynomial::new(&[1.0]));
    let (n, d) = (reduce(n, &cf), reduce(d, &cf));
    let Ok((q, r)) = n.quotient(&d) else {
        return curve(view);
    };

    // (N/D)' = (D N' - N D') / D^2
    let dn = d.product(&n.derivative()).difference(&n.product(&d.derivative()));
    let dd = d.product(&d);
    let cf = dn.gcd(&dd).unwrap_or_else(|_| Polynomial::new(&[1.0]));
    let dn = reduce(&dn, &cf);

    let endpoints = rational_endpoints(&n, &d, &q, &r, &dn);
    let mut node: FeatureNode = analysis_node(&endpoints);

    let mut f = xy_graph(view, None);
    f.declare(&["FunctionAnalysisData"]);
    let identity = if r.is_trivial() {
        f.put_new("graphName", "polynomial");
        node.put("degree", q.degree().max(0) as usize);
        if cubic {
            f.put("domain", Interval::all(&view.variables[0]));
            f.put("range", Interval::all(&view.variables[1]));
            PolynomialShape::Cubic
        } else {
            PolynomialShape::Polynomial(q.degree())
        }
    } else {
        f.put_new("graphName", "RationalFunction");
        PolynomialShape::Rational
    };
    f.put("FunctionAnalysisData", node);
    debug!(shape = ?identity, endpoints = endpoints.len(), "rational function analyzed");

    let mut result = ClassificationResult::new(ShapeIdentity::Polynomial(identity), f);
    result.coefficients = n.coefficients().to_vec();
    result.coefficients.extend_from_slice(d.coefficients());
    result
}

fn rational_endpoints(
    n: &Polynomial<f64>,
    d: &Polynomial<f64>,
    q: &Polynomial<f64>,
    r: &Polynomial<f64>,
    dn: &Polynomial<f64>,
) -> Vec<IntervalEndpoint> {
    let eval = |x: f64| {
        if x.is_infinite() {
            q.eval(x)
        } else {
            q.eval(x) + r.eval(x) / d.eval(x)
        }
    };

    let mut points = Vec::new();
    for z in dn.real_zeros().unwrap_or_default() {
        let kind = match z.signature {
            SignSignature::PlusPlus | SignSignature::MinusMinus => EndpointType::Inflection,
            SignSignature::MinusPlus => EndpointType::LocalMin,
            SignSignature::PlusMinus => EndpointType::LocalMax,
            SignSignature::Undefined => EndpointType::Undefined,
        };
        let mut e = IntervalEndpoint::at_zero(&z, kind);
        let y = n.eval(z.x) / d.eval(z.x);
        e.left_y = y;
        e.right_y = y;
        points.push(e);
    }

    for z in d.real_zeros().unwrap_or_default() {
        let mut e = IntervalEndpoint::at_zero(&z, EndpointType::VerticalAsymptote);
        let nx = n.eval(z.x);
        let (left, right) = match z.signature {
            SignSignature::MinusMinus => (f64::NEG_INFINITY, f64::NEG_INFINITY),
            SignSignature::PlusPlus => (f64::INFINITY, f64::INFINITY),
            SignSignature::PlusMinus => (f64::INFINITY, f64::NEG_INFINITY),
            SignSignature::MinusPlus => (f64::NEG_INFINITY, f64::INFINITY),
            SignSignature::Undefined => (f64::NAN, f64::NAN),
        };
        e.left_y = left * nx;
        e.right_y = right * nx;
        points.push(e);
    }

    points.push(IntervalEndpoint::at(PointXY::new(
        f64::NEG_INFINITY,
        eval(f64::NEG_INFINITY),
    )));
    points.push(IntervalEndpoint::at(PointXY::new(
        f64::INFINITY,
        eval(f64::INFINITY),
    )));
    points.sort_by(|a, b| a.x.total_cmp(&b.x));
    points
}

// ============================================================================
// Absolute Value and Square Root
// ============================================================================

fn longest_trail<'a>(view: &ItemView<'a>) -> Option<&'a GraphTrail> {
    view.trails.iter().max_by_key(|t| t.len())
}

/// `y = a |b x + c| + k` from the corner of the sampled graph.
fn absolute_value(view: &ItemView<'_>) -> Option<ClassificationResult> {
    let trail = longest_trail(view)?;
    let corner = trail_endpoints(trail)
        .into_iter()
        .find(|e| matches!(e.kind, EndpointType::LocalMin | EndpointType::LocalMax))?;

    let (x, y) = (view.variables[0].as_str(), view.variables[1].as_str());
    let mut f = xy_graph(view, Some("absolute value"));
    f.declare(&["vertex", "absDirection"]);
    f.put("vertex", PointXY::new(corner.x, corner.left_y));
    f.put("domain", Interval::all(x));
    if corner.kind == EndpointType::LocalMin {
        f.put("absDirection", "up");
        f.put("range", Interval::new(y, corner.left_y, f64::INFINITY));
    } else {
        f.put("absDirection", "down");
        f.put("range", Interval::new(y, f64::NEG_INFINITY, corner.left_y));
    }
    Some(ClassificationResult::new(
        ShapeIdentity::Polynomial(PolynomialShape::AbsoluteValue),
        f,
    ))
}

/// `y = a sqrt(b x + c) + k` from the free end of the sampled graph.
fn square_root(view: &ItemView<'_>) -> Option<ClassificationResult> {
    let trail = longest_trail(view)?;
    let (first, last) = (*trail.points.first()?, *trail.points.last()?);
    let b = view.bounds;
    let step = b.width() / view.points.len().max(2) as f64;

    let (vertex, other, opens_right) = if first.x > b.left + step {
        (first, last, true)
    } else if last.x < b.right - step {
        (last, first, false)
    } else {
        return None;
    };
    let opens_up = other.y > vertex.y;

    let (x, y) = (view.variables[0].as_str(), view.variables[1].as_str());
    let orientation = match (opens_right, opens_up) {
        (true, true) => "quadrant I",
        (false, true) => "quadrant II",
        (false, false) => "quadrant III",
        (true, false) => "quadrant IV",
    };
    let domain = if opens_right {
        Interval::new(x, vertex.x, f64::INFINITY)
    } else {
        Interval::new(x, f64::NEG_INFINITY, vertex.x)
    };
    let range = if opens_up {
        Interval::new(y, vertex.y, f64::INFINITY)
    } else {
        Interval::new(y, f64::NEG_INFINITY, vertex.y)
    };

    let mut f = xy_graph(view, Some("square root"));
    f.declare(&["vertex", "orientation"]);
    f.put("vertex", vertex);
    f.put("orientation", orientation);
    f.put("domain", domain);
    f.put("range", range);
    Some(ClassificationResult::new(
        ShapeIdentity::Polynomial(PolynomialShape::SquareRoot),
        f,
    ))
}

// ============================================================================
// Sampled Functions and Curves
// ============================================================================

fn curve(view: &ItemView<'_>) -> ClassificationResult {
    ClassificationResult::new(
        ShapeIdentity::Polynomial(PolynomialShape::Curve),
        xy_graph(view, None),
    )
}

/// Interval analysis of every trail of a sampled function.
pub fn equation_data(
    view: &ItemView<'_>,
    best: Option<&PolynomialCandidate>,
    tol: &Tolerances,
) -> ClassificationResult {
    let mut f: Features = xy_graph(view, Some("FunctionOverInterval"));
    f.declare(&["ComputedFunctionData", "DataID"]);
    f.put("DataID", view.name);

    let mut node = FeatureNode::new();
    node.put("NumSegments", view.trails.len());
    if let Some(PolynomialCandidate::Quadratic(q)) = best {
        node.put("AlternateEquation", q.relation(tol).text().to_string());
    }
    node.add_key("FunctionAnalysisData");
    for trail in view.trails {
        node.put("FunctionAnalysisData", analysis_node(&trail_endpoints(trail)));
    }
    f.put("ComputedFunctionData", node);

    let mut r = ClassificationResult::new(
        ShapeIdentity::Polynomial(PolynomialShape::FunctionOverInterval),
        f,
    );
    if let Some(c) = best {
        r.coefficients = c.model().coefficients.clone();
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rational_endpoints_of_reciprocal() {
        // y = 1/x
        let n = Polynomial::new(&[1.0]);
        let d = Polynomial::new(&[1.0, 0.0]);
        let (q, r) = n.quotient(&d).unwrap();
        let dn = d.product(&n.derivative()).difference(&n.product(&d.derivative()));
        let e = rational_endpoints(&n, &d, &q, &r, &dn);

        assert_eq!(e.len(), 3);
        assert_eq!(e[1].kind, EndpointType::VerticalAsymptote);
        assert_eq!(e[1].left_y, f64::NEG_INFINITY);
        assert_eq!(e[1].right_y, f64::INFINITY);
        assert_eq!(e[0].kind, EndpointType::HorizontalAsymptote);
    }

    #[test]
    fn test_parabola_has_one_minimum() {
        // y = x^2 - 1
        let n = Polynomial::new(&[1.0, 0.0, -1.0]);
        let d = Polynomial::new(&[1.0]);
        let (q, r) = n.quotient(&d).unwrap();
        let dn = d.product(&n.derivative()).difference(&n.product(&d.derivative()));
        let e = rational_endpoints(&n, &d, &q, &r, &dn);

        let mins: Vec<_> = e.iter().filter(|p| p.kind == EndpointType::LocalMin).collect();
        assert_eq!(mins.len(), 1);
        assert!(mins[0].x.abs() < 1e-9);
        assert!((mins[0].left_y + 1.0).abs() < 1e-9);
    }
}
