//! Feature paths for polar curves.
//!
//! ## Purpose
//!
//! Names the family that best fits a polar relation's `(theta, r)` samples
//! and derives the features of that family: petals of roses, blades of
//! lemniscates, loops of limaçons, and the Cartesian features of polar
//! conics and lines.
//!
//! ## Design notes
//!
//! * **Conics and lines** are rewritten as Cartesian relations and reduced
//!   by the conic classifier, so they share its feature paths.
//! * **Angles** are reported as `angleInfo` nodes in degrees and radians.
//!
//! ## Key concepts
//!
//! * **Trochoid normal form**: `r = A cos(n (theta - phi)) + B` with `B >= 0`.
//!   `A = B` is a cardioid, `A > B` has inner loops, `A < B` is lumpy.

// External dependencies
use std::f64::consts::PI;
use tracing::debug;

// Internal dependencies
use crate::algorithms::polar::{PolarConicKind, PolarFamily, PolarModel, best_polar_model};
use crate::classifiers::conic::add_conic_features;
use crate::classifiers::quadratic::{QuadraticClassifier, QuadraticType};
use crate::classifiers::{ClassificationResult, ItemView, PolarShape, ShapeIdentity, generic};
use crate::math::numbers::{amplitude, phase};
use crate::primitives::features::{CompassDirection, FeatureNode, Features, angle_node};
use crate::primitives::points::{MultiPointXY, PointXY};
use crate::primitives::symbolic::PolynomialRelation;
use crate::primitives::tolerances::Tolerances;

const CARDIOID_EPSILON: f64 = 1.0e-8;

/// Best polar family of one relation.
#[derive(Debug, Clone)]
pub struct PolarClassifier {
    best: Option<PolarModel>,
    conic: Option<(f64, PolarConicKind)>,
}

impl PolarClassifier {
    /// Fit every polar family to `(theta, r)` samples.
    pub fn new(points: &[MultiPointXY], tol: &Tolerances) -> Self {
        let mut best = best_polar_model(points, tol);
        let conic = best.as_mut().and_then(|m| m.conic(tol));
        if let Some(m) = &best {
            debug!(family = m.family.name(), fit = m.model.fit, "polar family chosen");
        }
        Self { best, conic }
    }

    /// The winning model, if any family fit.
    pub fn best_guess(&self) -> Option<&PolarModel> {
        self.best.as_ref()
    }

    /// Eccentricity and kind of a conic fit.
    pub fn conic(&self) -> Option<(f64, PolarConicKind)> {
        self.conic
    }

    /// Classify the relation and build its features.
    pub fn classify(&self, view: &ItemView<'_>, tol: &Tolerances) -> ClassificationResult {
        let Some(model) = &self.best else {
            return generic(view);
        };
        let m: Vec<f64> = (0..model.model.signature.len())
            .map(|i| model.model.coefficient(i))
            .collect();

        let mut f = Features::new();
        f.put("coordinateSystem", "polar");
        f.put("equationPrint", view.equation_print);

        let shape = match model.family {
            PolarFamily::Enchilada => return generic(view),
            PolarFamily::Conic => match conic(model, &self.conic, &m, &mut f, tol) {
                Some(shape) => shape,
                None => return generic(view),
            },
            PolarFamily::Line => {
                let qc = QuadraticClassifier::new(
                    &PolynomialRelation::conic([0.0, 0.0, 0.0, m[1], m[2], m[0]]),
                    tol,
                );
                add_conic_features(&qc, &mut f);
                f.put_new("equationType", "polar form of a line");
                PolarShape::Line
            }
            PolarFamily::Rose => {
                rose(model.frequency(), &m, &mut f);
                PolarShape::Rose
            }
            PolarFamily::Lemniscate => {
                lemniscate(&m, &mut f);
                PolarShape::Lemniscate
            }
            PolarFamily::Trochoid => trochoid(model.frequency(), &m, &mut f),
        };

        let mut r = ClassificationResult::new(ShapeIdentity::Polar(shape), f);
        r.coefficients = m;
        r
    }
}

// ============================================================================
// Conics and Circles
// ============================================================================

fn conic(
    model: &PolarModel,
    kind: &Option<(f64, PolarConicKind)>,
    m: &[f64],
    f: &mut Features,
    tol: &Tolerances,
) -> Option<PolarShape> {
    let (coefficients, shape) = if model.model.which_signature == 0 {
        // a r = -(b + c x + d y), squared
        let (m0, m1, m2, m3) = (m[0], m[1], m[2], m[3]);
        let (_, kind) = (*kind)?;
        (
            [
                m0 * m0 - m2 * m2,
                -2.0 * m2 * m3,
                m0 * m0 - m3 * m3,
                -2.0 * m1 * m2,
                -2.0 * m1 * m3,
                -m1 * m1,
            ],
            PolarShape::Conic(kind),
        )
    } else {
        let (m0, m1) = (m[0], m[1]);
        (
            [m1 * m1, 0.0, m1 * m1, 0.0, 0.0, -m0 * m0],
            PolarShape::Circle,
        )
    };

    let qc = QuadraticClassifier::new(&PolynomialRelation::conic(coefficients), tol);
    if qc.identity() == QuadraticType::Unknown {
        return None;
    }
    add_conic_features(&qc, f);
    if let Some(e) = model.cartesian_equation() {
        f.put_new("originalEquationPrint", e);
    }
    f.put_new("equationType", "polar form of a conic section");
    Some(shape)
}

// ============================================================================
// Roses and Lemniscates
// ============================================================================

fn rose(n: usize, m: &[f64], f: &mut Features) {
    let petals = if n % 2 == 0 { 2 * n } else { n };
    let a = -m[1] / m[0];
    let b = -m[2] / m[0];
    let length = amplitude(a, b);
    let theta = phase(a, b) / n as f64;

    f.declare(&["numPetals", "petalLength", "petalInclinations", "petalTips"]);
    f.put_new("graphName", "polar rose");
    f.put("numPetals", petals);
    f.put("petalLength", length);

    let mut inclinations = FeatureNode::new();
    let mut tips = FeatureNode::new();
    for i in 0..petals {
        let t = theta + 2.0 * PI * i as f64 / petals as f64;
        inclinations.put("angleInfo", angle_node(t));
        tips.put("pointInfo", PointXY::new(length * t.cos(), length * t.sin()));
    }
    f.put("petalInclinations", inclinations);
    f.put("petalTips", tips);
}

fn lemniscate(m: &[f64], f: &mut Features) {
    let a = -m[1] / m[0];
    let b = -m[2] / m[0];
    f.declare(&["inclination", "bladeLength"]);
    f.put_new("graphName", "polar lemniscate");
    f.put("bladeLength", amplitude(a, b).sqrt());
    f.put("inclination", angle_node(0.5 * phase(a, b)));
}

// ============================================================================
// Trochoids
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Loops {
    Cardioid,
    Loopy,
    Lumpy,
}

fn trochoid(n: usize, m: &[f64], f: &mut Features) -> PolarShape {
    if m[1] == 0.0 {
        f.put_new("graphName", "collection of radial lines through the origin");
        return PolarShape::RadialLines;
    }
    let nf = n as f64;
    let a = -m[2] / m[1];
    let b = -m[3] / m[1];
    let big_a = amplitude(a, b);
    let mut phi = phase(a, b) / nf;
    let mut big_b = -m[0] / m[1];
    if big_b < 0.0 {
        big_b = -big_b;
        phi += PI * ((n & 1) as f64 - 1.0 / nf);
    }

    f.declare(&[
        "thetaMultiple",
        "hasLoops",
        "maxLength",
        "isConvex",
        "minLength",
        "loopAngles",
        "axis",
        "axisInclination",
        "oddMultiple",
    ]);
    f.put("maxLength", big_a + big_b);
    f.put("thetaMultiple", n);
    f.put("oddMultiple", n % 2 == 1);

    let dented = big_b < (nf * nf + 1.0) * big_a;
    let case = if (big_a - big_b).abs() < CARDIOID_EPSILON * (big_a.abs() + b.abs()) {
        Loops::Cardioid
    } else if big_a > big_b {
        Loops::Loopy
    } else {
        f.put("isConvex", !dented);
        Loops::Lumpy
    };
    f.put("hasLoops", case == Loops::Loopy);

    if n == 1 {
        let (name, axis) = match case {
            Loops::Cardioid => ("cardioid", phi),
            Loops::Loopy => {
                f.put("minLength", big_a - big_b);
                ("loopWithinALoop", phi)
            }
            Loops::Lumpy => {
                f.put("minLength", big_b - big_a);
                ("eccentricCircle", phi + PI)
            }
        };
        let degrees = axis.to_degrees();
        f.put(
            "axis",
            format!(
                "{} to {}",
                CompassDirection::from_degrees(180.0 + degrees),
                CompassDirection::from_degrees(degrees)
            ),
        );
        f.put("axisInclination", angle_node(axis));
        f.put_new("graphName", name);
        return PolarShape::Trochoid;
    }

    let at = |offset: f64| loop_angles(n, phi, offset);
    match case {
        Loops::Cardioid => {
            f.put_new("graphName", "pinchedLoops");
            f.put("loopAngles", at(0.0).labeled("loops"));
        }
        Loops::Lumpy => {
            f.put_new("graphName", "lumpyCircle");
            f.put("minLength", big_b - big_a);
            f.put("loopAngles", at(0.0).labeled("bulges"));
            if dented {
                f.put("loopAngles", at(-1.0).labeled("dents"));
            }
        }
        Loops::Loopy => {
            f.put("loopAngles", at(0.0).labeled("longer loops"));
            if n % 2 == 0 {
                f.put_new("graphName", "alternatingLoops");
                f.put("loopAngles", at(-1.0).labeled("shorter loops"));
            } else {
                f.put_new("graphName", "nestedLoops");
            }
            f.put("minLength", big_a - big_b);
        }
    }
    PolarShape::Trochoid
}

/// Angles `phi + (2i + offset) pi / n` for `i` in `0..n`.
struct LoopAngles(Vec<f64>);

impl LoopAngles {
    fn labeled(self, object: &str) -> FeatureNode {
        let mut node = FeatureNode::new();
        node.put("graphObject", object);
        node.add_key("angleInfo");
        for t in self.0 {
            node.put("angleInfo", angle_node(t));
        }
        node
    }
}

fn loop_angles(n: usize, phi: f64, offset: f64) -> LoopAngles {
    let nf = n as f64;
    LoopAngles(
        (0..n)
            .map(|i| phi + (2.0 * i as f64 + offset) * PI / nf)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rose_petal_count() {
        let mut f = Features::new();
        rose(2, &[1.0, -3.0, 0.0], &mut f);
        assert_eq!(f.text("numPetals"), Some("4"));
        assert_eq!(f.text("petalLength"), Some("3"));

        let mut f = Features::new();
        rose(3, &[1.0, -3.0, 0.0], &mut f);
        assert_eq!(f.text("numPetals"), Some("3"));
    }

    #[test]
    fn test_trochoid_cardioid() {
        // r = 1 + cos(theta): 1*1 - r + cos = 0 in generator order [1, r, cos, sin]
        let mut f = Features::new();
        let shape = trochoid(1, &[1.0, -1.0, 1.0, 0.0], &mut f);
        assert_eq!(shape, PolarShape::Trochoid);
        assert_eq!(f.text("graphName"), Some("cardioid"));
        assert_eq!(f.text("maxLength"), Some("2"));
    }

    #[test]
    fn test_trochoid_radial_lines() {
        let mut f = Features::new();
        let shape = trochoid(2, &[1.0, 0.0, 1.0, 0.0], &mut f);
        assert_eq!(shape, PolarShape::RadialLines);
    }
}
