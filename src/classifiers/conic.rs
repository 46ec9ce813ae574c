//! Feature paths for each conic identity.
//!
//! ## Purpose
//!
//! Turns a reduced conic into the named features of its shape: slopes and
//! intercepts for lines; vertex, focus and directrix for parabolas; center,
//! axes and foci for ellipses and hyperbolas; separations and
//! intersections for line pairs.
//!
//! ## Design notes
//!
//! * **Frames**: every geometric quantity is computed in the rotated,
//!   translated `(u, v)` frame and mapped back with `uv_to_xy`.
//! * **Domain and range**: reported only for unrotated shapes.
//! * **Line pairs**: the two lines come straight from the normal form
//!   rather than from the item's intercepts, so the path also works for
//!   conics reached from polar fits.

// Internal dependencies
use crate::classifiers::quadratic::{QuadraticClassifier, QuadraticType, line_through, vertical_line};
use crate::classifiers::{ClassificationResult, FailureReason, ItemView, ShapeIdentity, xy_graph};
use crate::math::numbers::{is_within_tolerance, normalize_angle_degrees};
use crate::primitives::features::{Features, Interval, trim_double};
use crate::primitives::points::PointXY;
use crate::primitives::tolerances::Tolerances;

/// Classify a Cartesian conic and attach its features.
pub fn classify(
    qc: &QuadraticClassifier,
    view: &ItemView<'_>,
    _tol: &Tolerances,
) -> ClassificationResult {
    if qc.reason() != FailureReason::NoReason {
        let mut r = ClassificationResult::unknown(qc.reason(), xy_graph(view, None));
        r.coefficients = qc.original_coefficients().to_vec();
        return r;
    }

    let name = match qc.identity() {
        QuadraticType::NullSet => Some("null set"),
        QuadraticType::AllPoints => Some("all points"),
        _ => None,
    };
    let mut features = xy_graph(view, name);
    add_conic_features(qc, &mut features);

    let mut r = ClassificationResult::new(ShapeIdentity::Quadratic(qc.identity()), features);
    r.rotation = qc.rotation();
    r.translation = qc.translation();
    r.coefficients = qc.normalized_coefficients().to_vec();
    r
}

/// Add the features of the reduced conic's identity to `f`.
pub fn add_conic_features(qc: &QuadraticClassifier, f: &mut Features) {
    match qc.identity() {
        QuadraticType::VerticalLine | QuadraticType::HorizontalLine | QuadraticType::SlopingLine => {
            line(qc, f)
        }
        QuadraticType::Parabola => parabola(qc, f),
        QuadraticType::SinglePoint | QuadraticType::Ellipse => ellipse(qc, f),
        QuadraticType::Hyperbola => hyperbola(qc, f),
        QuadraticType::TwoVerticalLines | QuadraticType::TwoHorizontalLines => two_lines(qc, f),
        QuadraticType::Cross => cross(qc, f),
        QuadraticType::NullSet => f.put_new("graphName", "null set"),
        QuadraticType::AllPoints => f.put_new("graphName", "all points"),
        QuadraticType::TwoPoints | QuadraticType::Unknown => {}
    }
}

fn is_rotated(qc: &QuadraticClassifier) -> bool {
    qc.rotation() != 0.0
}

/// Inclination in degrees of the line `a x + b y + c = 0`.
fn inclination_of(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        90.0
    } else {
        (-a / b).atan().to_degrees()
    }
}

// ============================================================================
// Lines
// ============================================================================

fn line(qc: &QuadraticClassifier, f: &mut Features) {
    let vars = qc.actual_variables();
    f.declare(&["slope", "inclination", "slopeDefined", "incrad", "reducedEquation"]);
    f.put_new("equationType", "linear equation");
    f.put_new("graphClosure", "false");

    let [sq_x, _, sq_y, d, e, c0] = qc.original_coefficients();
    let (u0, v0) = qc.translation();
    let mut id = qc.identity();

    let (a, b, c) = if is_rotated(qc) {
        let ax = qc.new_axes();
        let (a, b, c) = match id {
            QuadraticType::HorizontalLine => (ax[1][0], ax[1][1], -v0),
            _ => (ax[0][0], ax[0][1], -u0),
        };
        let p = if b.abs() >= a.abs() {
            PointXY::new(0.0, -c / b)
        } else {
            PointXY::new(-c / a, 0.0)
        };
        f.put("reducedEquation", line_through(p, inclination_of(a, b), vars));
        id = QuadraticType::SlopingLine;
        (a, b, c)
    } else if sq_x != 0.0 || sq_y != 0.0 {
        // A squared line such as (x - k)^2 = 0.
        if id == QuadraticType::HorizontalLine {
            f.put("reducedEquation", line_through(PointXY::new(0.0, v0), 0.0, vars));
            (0.0, 1.0, -v0)
        } else {
            f.put("reducedEquation", vertical_line(u0, vars));
            (1.0, 0.0, -u0)
        }
    } else {
        (d, e, c0)
    };

    let domain = Interval::all(&vars[0]);
    let range = Interval::all(&vars[1]);
    let mut slope = 0.0;

    if matches!(id, QuadraticType::SlopingLine | QuadraticType::HorizontalLine) {
        slope = -a / b;
        let z = slope.atan();
        f.put("slopeDefined", "true");
        f.put("slope", slope);
        f.put("incrad", z);
        f.put("inclination", z.to_degrees());
        f.put("domain", domain.clone());
    }

    match id {
        QuadraticType::SlopingLine => {
            f.put_new("graphName", "line");
            if slope > 0.0 {
                f.put("ascendingRegions", domain);
            } else if slope < 0.0 {
                f.put("descendingRegions", domain);
            }
            f.put("range", range);
        }
        QuadraticType::HorizontalLine => {
            f.put_new("graphName", "horizontal line");
            f.put("range", Interval::new(&vars[1], -c / b, -c / b));
        }
        _ => {
            f.put_new("graphName", "vertical line");
            f.put_new("slopeDefined", "false");
            f.put_new("inclination", 90.0);
            f.put_new("incrad", std::f64::consts::FRAC_PI_2);
            f.put("domain", Interval::new(&vars[0], -c / a, -c / a));
            f.put("range", range);
        }
    }
}

// ============================================================================
// Parabola
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opening {
    Up,
    Down,
    Right,
    Left,
}

impl Opening {
    fn label(self) -> &'static str {
        match self {
            Self::Up => "upwards",
            Self::Down => "downwards",
            Self::Right => "to the right",
            Self::Left => "to the left",
        }
    }
}

fn parabola(qc: &QuadraticClassifier, f: &mut Features) {
    let vars = qc.actual_variables();
    let alpha = qc.rotation();
    let mut p = qc.normalized_coefficients();
    let (u0, v0) = qc.translation();

    f.declare(&[
        "vertex",
        "focalLength",
        "focus",
        "directrix",
        "axis",
        "axisInclination",
        "directrixInclination",
        "openDirection",
    ]);
    f.put_new("graphName", "parabola");
    f.put_new("equationType", "conic section");
    f.put_new("graphClosure", "false");

    let (opening, focal_length) = if p[0].abs() > p[1].abs() {
        let t = -1.0 / p[3];
        p.iter_mut().for_each(|c| *c *= t);
        let o = if p[0] > 0.0 { Opening::Up } else { Opening::Down };
        (o, (0.25 / p[0]).abs())
    } else {
        let t = -1.0 / p[2];
        p.iter_mut().for_each(|c| *c *= t);
        let o = if p[1] > 0.0 {
            Opening::Right
        } else {
            Opening::Left
        };
        (o, (0.25 / p[1]).abs())
    };

    let (vertex_uv, axis) = match opening {
        Opening::Up => ((u0, p[4]), alpha + 90.0),
        Opening::Down => ((u0, p[4]), alpha - 90.0),
        Opening::Right => ((p[4], v0), alpha),
        Opening::Left => ((p[4], v0), alpha + 180.0),
    };
    let directrix = normalize_angle_degrees(axis - 90.0);
    let axis = normalize_angle_degrees(axis);

    let vertex = qc.uv_to_xy(vertex_uv.0, vertex_uv.1);
    let (sin, cos) = axis.to_radians().sin_cos();
    let displacement = PointXY::new(focal_length * cos, focal_length * sin);
    let focus = PointXY::new(vertex.x + displacement.x, vertex.y + displacement.y);
    let directrix_point = PointXY::new(vertex.x - displacement.x, vertex.y - displacement.y);

    f.put("vertex", vertex);
    f.put("axis", format!("line given by {}", line_through(vertex, axis, vars)));
    f.put("axisInclination", axis);
    f.put("directrixInclination", directrix);
    f.put("focalLength", focal_length);
    f.put("focus", focus);
    f.put(
        "directrix",
        format!("line given by {}", line_through(directrix_point, directrix, vars)),
    );
    f.put("openDirection", opening.label());

    if is_rotated(qc) {
        return;
    }
    let (x, y) = (vars[0].as_str(), vars[1].as_str());
    let inf = f64::INFINITY;
    match opening {
        Opening::Up => {
            f.put("domain", Interval::all(x));
            f.put("range", Interval::new(y, vertex.y, inf));
            f.put("ascendingRegions", Interval::new(x, vertex.x, inf));
            f.put("descendingRegions", Interval::new(x, -inf, vertex.x));
        }
        Opening::Down => {
            f.put("domain", Interval::all(x));
            f.put("range", Interval::new(y, -inf, vertex.y));
            f.put("descendingRegions", Interval::new(x, vertex.x, inf));
            f.put("ascendingRegions", Interval::new(x, -inf, vertex.x));
        }
        Opening::Right => {
            f.put("domain", Interval::new(x, vertex.x, inf));
            f.put("range", Interval::all(y));
        }
        Opening::Left => {
            f.put("domain", Interval::new(x, -inf, vertex.x));
            f.put("range", Interval::all(y));
        }
    }
}

// ============================================================================
// Ellipse
// ============================================================================

fn ellipse(qc: &QuadraticClassifier, f: &mut Features) {
    let vars = qc.actual_variables();
    let alpha = qc.rotation();
    let center = qc.center();

    f.declare(&[
        "center",
        "focus",
        "focalLength",
        "eccentricity",
        "semiMajorAxis",
        "semiMinorAxis",
        "majorAxis",
        "minorAxis",
        "majorAxisInclination",
        "minorAxisInclination",
        "radius",
    ]);

    if qc.identity() == QuadraticType::SinglePoint {
        f.put_new("graphName", "single point");
        f.put("center", center);
        return;
    }

    f.put("center", center);
    f.put_new("equationType", "conic section");
    f.put_new("graphClosure", "true");

    let mut p = qc.normalized_coefficients();
    let scale = -p[4];
    p.iter_mut().for_each(|c| *c /= scale);

    if is_within_tolerance(p[0] - p[1], p[0].abs()) {
        let r = 1.0 / p[0].sqrt();
        f.put_new("graphName", "circle");
        f.put("radius", r);
        f.put("domain", Interval::new(&vars[0], center.x - r, center.x + r));
        f.put("range", Interval::new(&vars[1], center.y - r, center.y + r));
        return;
    }

    let horizontal = p[0] < p[1];
    let (a, b, major) = if horizontal {
        (1.0 / p[0].sqrt(), 1.0 / p[1].sqrt(), alpha)
    } else {
        (1.0 / p[1].sqrt(), 1.0 / p[0].sqrt(), alpha + 90.0)
    };
    let minor = normalize_angle_degrees(major + 90.0);
    let major = normalize_angle_degrees(major);

    f.put_new("graphName", "ellipse");
    f.put("semiMajorAxis", a);
    f.put("semiMinorAxis", b);
    f.put("majorAxisInclination", major);
    f.put("minorAxisInclination", minor);

    let c = (a * a - b * b).sqrt();
    let (sin, cos) = major.to_radians().sin_cos();
    f.put("focalLength", c);
    f.put("eccentricity", c / a);
    f.put("focus", PointXY::new(center.x + c * cos, center.y + c * sin));
    f.put("focus", PointXY::new(center.x - c * cos, center.y - c * sin));
    f.put("majorAxis", line_through(center, major, vars));
    f.put("minorAxis", line_through(center, minor, vars));

    if !is_rotated(qc) {
        let (dx, dy) = if horizontal { (a, b) } else { (b, a) };
        f.put("domain", Interval::new(&vars[0], center.x - dx, center.x + dx));
        f.put("range", Interval::new(&vars[1], center.y - dy, center.y + dy));
    }
}

// ============================================================================
// Hyperbola
// ============================================================================

fn hyperbola(qc: &QuadraticClassifier, f: &mut Features) {
    let vars = qc.actual_variables();
    let alpha = qc.rotation();
    let center = qc.center();

    f.declare(&[
        "center",
        "focus",
        "focalLength",
        "eccentricity",
        "transverseAxis",
        "conjugateAxis",
        "transverseAxisInclination",
        "conjugateAxisInclination",
        "semiTransverseAxis",
        "semiConjugateAxis",
        "vertex",
        "asymptotes",
    ]);
    f.put_new("graphName", "hyperbola");
    f.put_new("equationType", "conic section");
    f.put("center", center);
    f.put_new("graphClosure", "false");

    let mut p = qc.normalized_coefficients();
    let scale = -p[4];
    p.iter_mut().for_each(|c| *c /= scale);

    let horizontal = p[0] > 0.0;
    let (a, b, transverse, asymptote) = if horizontal {
        let (a, b) = (1.0 / p[0].sqrt(), 1.0 / (-p[1]).sqrt());
        (a, b, alpha, (b / a).atan().to_degrees())
    } else {
        let (a, b) = (1.0 / p[1].sqrt(), 1.0 / (-p[0]).sqrt());
        (a, b, alpha + 90.0, (a / b).atan().to_degrees())
    };
    f.put("semiTransverseAxis", a);
    f.put("semiConjugateAxis", b);

    let conjugate = normalize_angle_degrees(transverse + 90.0);
    let transverse = normalize_angle_degrees(transverse);
    f.put("transverseAxisInclination", transverse);
    f.put("conjugateAxisInclination", conjugate);

    let c = a.hypot(b);
    let e = c / a;
    let (sin, cos) = transverse.to_radians().sin_cos();
    let (vx, vy) = (a * cos, a * sin);
    f.put("focalLength", c);
    f.put("eccentricity", e);
    f.put("focus", PointXY::new(center.x + e * vx, center.y + e * vy));
    f.put("focus", PointXY::new(center.x - e * vx, center.y - e * vy));
    f.put("vertex", PointXY::new(center.x + vx, center.y + vy));
    f.put("vertex", PointXY::new(center.x - vx, center.y - vy));
    f.put("transverseAxis", line_through(center, transverse, vars));
    f.put("conjugateAxis", line_through(center, conjugate, vars));
    f.put("asymptotes", line_through(center, alpha + asymptote, vars));
    f.put("asymptotes", line_through(center, alpha - asymptote, vars));

    if is_rotated(qc) {
        return;
    }
    let (x, y) = (vars[0].as_str(), vars[1].as_str());
    if horizontal {
        f.put("domain", split_interval(x, center.x - a, center.x + a));
        f.put("range", Interval::all(y));
    } else {
        f.put("domain", Interval::all(x));
        f.put("range", split_interval(y, center.y - a, center.y + a));
    }
}

fn split_interval(var: &str, low: f64, high: f64) -> String {
    format!(
        "{{{var} such that {var} <= {} or {var} >= {}}}",
        trim_double(low, 3),
        trim_double(high, 3)
    )
}

// ============================================================================
// Line Pairs
// ============================================================================

fn two_lines(qc: &QuadraticClassifier, f: &mut Features) {
    let vars = qc.actual_variables();
    let alpha = qc.rotation();
    let p = qc.normalized_coefficients();
    let (u0, v0) = qc.translation();

    f.declare(&["inclination", "separation", "equationStrings"]);
    f.put_new("graphName", "two lines");
    f.put_new("equationType", "degenerate parabola");
    f.put_new("graphClosure", "false");

    let (inclination, points) = if qc.identity() == QuadraticType::TwoVerticalLines {
        let s = (-p[4] / p[0]).abs().sqrt();
        (
            alpha + 90.0,
            [qc.uv_to_xy(u0 - s, v0), qc.uv_to_xy(u0 + s, v0)],
        )
    } else {
        let s = (-p[4] / p[1]).abs().sqrt();
        (alpha, [qc.uv_to_xy(u0, v0 - s), qc.uv_to_xy(u0, v0 + s)])
    };

    let separation = (points[1].x - points[0].x).hypot(points[1].y - points[0].y);
    f.put("inclination", inclination);
    f.put("separation", separation);
    for p in points {
        f.put("equationStrings", line_through(p, inclination, vars));
    }
}

fn cross(qc: &QuadraticClassifier, f: &mut Features) {
    let vars = qc.actual_variables();
    let alpha = qc.rotation();
    let p = qc.normalized_coefficients();
    let a = p[0].abs().sqrt();
    let b = p[1].abs().sqrt();
    let phi = a.atan2(b).to_degrees();
    let (i1, i2) = (alpha - phi, alpha + phi);
    let center = qc.center();

    f.declare(&["intersectionPoint", "inclination", "equationStrings"]);
    f.put_new("graphName", "two intersecting lines");
    f.put("intersectionPoint", center);
    f.put("inclination", i1);
    f.put("inclination", i2);
    f.put("equationStrings", line_through(center, i1, vars));
    f.put("equationStrings", line_through(center, i2, vars));
}
