//! Quadratic (conic) classification.
//!
//! ## Purpose
//!
//! Reduces `Ax^2 + Bxy + Cy^2 + Dx + Ey + F = 0` to the normal form
//! `a'u^2 + b'v^2 + c'u + d'v + e' = 0` and reads the conic identity off
//! which of the five normalized coefficients survive.
//!
//! ## Design notes
//!
//! * **Rotation**: The symmetric part `[[A, B/2], [B/2, C]]` is
//!   diagonalized; the eigenvector most aligned with the x-axis becomes the
//!   new `u` axis, oriented toward positive x.
//! * **Translation**: Each axis with a surviving square term is completed
//!   independently.
//! * **Scaling**: The constant is normalized to `-1`, or to `0` when
//!   negligible.
//! * **Negligibility**: A coefficient is zero when it is at most
//!   `negligible_ratio` times the running coefficient norm.
//!
//! ## Key concepts
//!
//! * **Identity rules**: An ordered table of (pattern, outcome) rules over
//!   the "is non-negligible" bits of `(a', b', c', d', e')`. Degenerate and
//!   line cases come first, then parabolas, then the sign test separating
//!   the hyperbola family from the ellipse family.
//!
//! ## Invariants
//!
//! * `identity == Unknown` iff `reason != NoReason` or the coefficients were
//!   not finite.
//! * `new_axes` is orthonormal with `new_axes[0][0] >= 0`.

// External dependencies
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

// Internal dependencies
use crate::classifiers::FailureReason;
use crate::math::numbers::{is_within_tolerance, make_integer, normalize_angle_degrees};
use crate::primitives::features::trim_double;
use crate::primitives::points::PointXY;
use crate::primitives::symbolic::SymbolicPolynomial;
use crate::primitives::tolerances::Tolerances;

// ============================================================================
// Identity
// ============================================================================

/// The conic taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuadraticType {
    /// Not classified.
    #[default]
    Unknown,
    /// No real points.
    NullSet,
    /// A single real point.
    SinglePoint,
    /// Two isolated points.
    TwoPoints,
    /// Every point of the plane.
    AllPoints,
    /// `u = k`.
    VerticalLine,
    /// `v = k`.
    HorizontalLine,
    /// `(u - k1)(u - k2) = 0`.
    TwoVerticalLines,
    /// `(v - k1)(v - k2) = 0`.
    TwoHorizontalLines,
    /// A line that is neither vertical nor horizontal.
    SlopingLine,
    /// A parabola.
    Parabola,
    /// Two intersecting lines.
    Cross,
    /// A hyperbola.
    Hyperbola,
    /// An ellipse (including circles).
    Ellipse,
}

/// Which normalized coefficients survived reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Present {
    a: bool,
    b: bool,
    c: bool,
    d: bool,
    e: bool,
}

/// Read the identity off the normal form `a u^2 + b v^2 + c u + d v + e = 0`.
///
/// `negligible` decides which coefficients count as zero.
pub fn compute_identity(
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    negligible: impl Fn(f64) -> bool,
) -> QuadraticType {
    let p = Present {
        a: !negligible(a),
        b: !negligible(b),
        c: !negligible(c),
        d: !negligible(d),
        e: !negligible(e),
    };

    match p {
        Present {
            a: false,
            b: false,
            c: false,
            d: false,
            e,
        } => {
            if e {
                QuadraticType::NullSet
            } else {
                QuadraticType::AllPoints
            }
        }
        Present {
            a: false,
            b: false,
            c,
            d,
            ..
        } => {
            if !c {
                QuadraticType::HorizontalLine
            } else if !d {
                QuadraticType::VerticalLine
            } else {
                QuadraticType::SlopingLine
            }
        }
        Present {
            b: false, d: false, ..
        } => match discriminant_sign(a, c, e, &negligible) {
            0 => QuadraticType::VerticalLine,
            s if s > 0 => QuadraticType::TwoVerticalLines,
            _ => QuadraticType::NullSet,
        },
        Present {
            a: false, c: false, ..
        } => match discriminant_sign(b, d, e, &negligible) {
            0 => QuadraticType::HorizontalLine,
            s if s > 0 => QuadraticType::TwoHorizontalLines,
            _ => QuadraticType::NullSet,
        },
        Present { a: false, .. } | Present { b: false, .. } => QuadraticType::Parabola,
        Present { e, .. } if a * b < 0.0 => {
            if e {
                QuadraticType::Hyperbola
            } else {
                QuadraticType::Cross
            }
        }
        Present { e: false, .. } => QuadraticType::SinglePoint,
        _ if a * e > 0.0 => QuadraticType::NullSet,
        _ => QuadraticType::Ellipse,
    }
}

/// Sign of `linear^2 - 4 square constant` for `square t^2 + linear t + constant`.
fn discriminant_sign(square: f64, linear: f64, constant: f64, negligible: impl Fn(f64) -> bool) -> i8 {
    let disc = linear * linear - 4.0 * square * constant;
    if negligible(disc) {
        0
    } else if disc > 0.0 {
        1
    } else {
        -1
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// The reduction of one quadratic relation.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticClassifier {
    identity: QuadraticType,
    reason: FailureReason,
    degree: u32,
    original: [f64; 6],
    norm: f64,
    alpha: f64,
    new_axes: [[f64; 2]; 2],
    primes: [f64; 5],
    translation: (f64, f64),
    actual_variables: [String; 2],
    trans_variables: [String; 2],
    tol: Tolerances,
}

impl QuadraticClassifier {
    /// Classify `lhs = 0`.
    pub fn new(lhs: &dyn SymbolicPolynomial, tol: &Tolerances) -> Self {
        let mut qc = Self {
            identity: QuadraticType::Unknown,
            reason: FailureReason::NoReason,
            degree: lhs.degree(),
            original: [0.0; 6],
            norm: 0.0,
            alpha: 0.0,
            new_axes: [[1.0, 0.0], [0.0, 1.0]],
            primes: [0.0; 5],
            translation: (0.0, 0.0),
            actual_variables: ["x".to_string(), "y".to_string()],
            trans_variables: ["x".to_string(), "y".to_string()],
            tol: *tol,
        };
        qc.classify(lhs);
        qc
    }

    fn classify(&mut self, lhs: &dyn SymbolicPolynomial) {
        let vars = lhs.variables();
        if self.degree > 2 {
            self.reason = FailureReason::DegreeGreaterThan2;
        }
        if vars.len() > 2 {
            self.reason = FailureReason::TooManyVariables;
            return;
        }
        if !lhs.has_constant_coefficients() {
            self.reason = FailureReason::NonPolynomial;
        }

        match vars.as_slice() {
            [u, v] => self.actual_variables = [u.clone(), v.clone()],
            [only] if only == "r" || only == "theta" => {
                self.actual_variables = ["r".to_string(), "theta".to_string()];
            }
            [only] if *only != self.actual_variables[1] => {
                self.actual_variables[0] = only.clone();
            }
            _ => {}
        }
        if self.actual_variables[0] == "r" && self.actual_variables[1] == "theta" {
            self.reason = FailureReason::Polar;
        }
        if self.reason != FailureReason::NoReason {
            debug!(reason = ?self.reason, "quadratic classification declined");
            return;
        }
        self.trans_variables = self.actual_variables.clone();

        let bindings = HashMap::new();
        let (x, y) = (
            self.actual_variables[0].as_str(),
            self.actual_variables[1].as_str(),
        );
        let c = |vars: &[&str], powers: &[u32]| lhs.coefficient(vars, powers).evaluate(&bindings);
        self.original = [
            c(&[x], &[2]),
            c(&[x, y], &[1, 1]),
            c(&[y], &[2]),
            c(&[x], &[1]),
            c(&[y], &[1]),
            lhs.constant_term().evaluate(&bindings),
        ];
        self.norm = 0.17 * self.original.iter().map(|v| v * v).sum::<f64>().sqrt();

        if self.flunks_infinity_test() {
            warn!(coefficients = ?self.original, "more than one non-finite coefficient");
            self.reason = FailureReason::NonFinite;
            return;
        }

        self.normalize_rotation();
        self.complete_square();
        self.normalize_constant();

        let [a, b, cc, d, e] = self.primes;
        let scale = self.norm;
        let ratio = self.tol.negligible_ratio;
        self.identity = compute_identity(a, b, cc, d, e, |v| v.abs() <= ratio * scale);
        debug!(identity = ?self.identity, rotation = self.alpha, "quadratic classified");
    }

    fn negligible(&self, v: f64) -> bool {
        v.abs() <= self.tol.negligible_ratio * self.norm
    }

    /// Replace a single non-finite coefficient by a unit in its slot.
    fn flunks_infinity_test(&mut self) -> bool {
        if self.norm.is_finite() {
            return false;
        }
        let bad: Vec<usize> = (0..6).filter(|&i| !self.original[i].is_finite()).collect();
        if bad.len() != 1 {
            return true;
        }
        self.original = [0.0; 6];
        self.original[bad[0]] = 1.0;
        self.norm = 1.0;
        false
    }

    fn normalize_rotation(&mut self) {
        let [a, b, c, d, e, f] = self.original;
        if self.negligible(b) {
            self.primes = [a, c, d, e, f];
            return;
        }

        let sigma = a + c;
        let delta = a - c;
        let disc = delta.hypot(b);
        let lambdas = [0.5 * (sigma + disc), 0.5 * (sigma - disc)];

        let (u1, v1) = (0.5 * b, lambdas[0] - a);
        let (u2, v2) = (lambdas[1] - c, 0.5 * b);
        let n1 = 1.0 / u1.hypot(v1);
        let n2 = 1.0 / u2.hypot(v2);
        let mut xi = [[n1 * u1, n1 * v1], [n2 * u2, n2 * v2]];

        let i_max = if xi[0][0].abs() > xi[1][0].abs() { 0 } else { 1 };
        let unit = xi[i_max][0].signum();
        xi[i_max][0] *= unit;
        xi[i_max][1] *= unit;

        self.new_axes = [
            [xi[i_max][0], xi[i_max][1]],
            [-xi[i_max][1], xi[i_max][0]],
        ];
        self.primes = [
            lambdas[i_max],
            lambdas[1 - i_max],
            self.new_axes[0][0] * d + self.new_axes[0][1] * e,
            self.new_axes[1][0] * d + self.new_axes[1][1] * e,
            f,
        ];
        self.alpha = self.new_axes[0][1].atan2(self.new_axes[0][0]).to_degrees();
        self.set_transform_variables();
    }

    fn complete_square(&mut self) {
        let [a, b, c, d, _] = self.primes;
        if !self.negligible(a) {
            self.translation.0 = -0.5 * c / a;
            self.primes[4] -= 0.25 * c * c / a;
            self.primes[2] = 0.0;
        }
        if !self.negligible(b) {
            self.translation.1 = -0.5 * d / b;
            self.primes[4] -= 0.25 * d * d / b;
            self.primes[3] = 0.0;
        }
    }

    fn normalize_constant(&mut self) {
        if self.negligible(self.primes[4]) {
            self.primes[4] = 0.0;
            return;
        }
        let factor = -1.0 / self.primes[4];
        for p in &mut self.primes {
            *p *= factor;
        }
        self.norm = (0.2 * self.primes.iter().map(|v| v * v).sum::<f64>()).sqrt();
        for i in 0..5 {
            if self.negligible(self.primes[i]) {
                self.primes[i] = 0.0;
            }
        }
    }

    fn set_transform_variables(&mut self) {
        const CANDIDATES: [[&str; 2]; 3] = [["u", "v"], ["r", "s"], ["x", "y"]];
        let [x, y] = &self.actual_variables;
        for t in CANDIDATES {
            let clash = t.iter().any(|n| n == x || n == y);
            if !clash {
                self.trans_variables = [t[0].to_string(), t[1].to_string()];
                return;
            }
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// The conic identity.
    pub fn identity(&self) -> QuadraticType {
        self.identity
    }

    /// Why classification was declined, if it was.
    pub fn reason(&self) -> FailureReason {
        self.reason
    }

    /// Total degree of the input.
    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// `[A, B, C, D, E, F]` as read from the input.
    pub fn original_coefficients(&self) -> [f64; 6] {
        self.original
    }

    /// `[a', b', c', d', e']` of the normal form.
    pub fn normalized_coefficients(&self) -> [f64; 5] {
        self.primes
    }

    /// Rows are the unit vectors of the rotated `u` and `v` axes.
    pub fn new_axes(&self) -> [[f64; 2]; 2] {
        self.new_axes
    }

    /// Rotation of the `u` axis from the x-axis, in degrees.
    pub fn rotation(&self) -> f64 {
        self.alpha
    }

    /// Center offsets `(u0, v0)` in the rotated frame.
    pub fn translation(&self) -> (f64, f64) {
        self.translation
    }

    /// The two variables of the relation, abscissa first.
    pub fn actual_variables(&self) -> &[String; 2] {
        &self.actual_variables
    }

    /// Names of the rotated variables.
    pub fn transformed_variables(&self) -> &[String; 2] {
        &self.trans_variables
    }

    /// True if the relation defines the ordinate as a function of the
    /// abscissa: no `y^2` term and some term linear in `y`.
    pub fn is_function(&self) -> bool {
        if self.reason != FailureReason::NoReason {
            return false;
        }
        let [_, b, c, _, e, _] = self.original;
        let scale = self.original.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let tiny = |v: f64| v.abs() <= self.tol.negligible_ratio * scale;
        tiny(c) && !(tiny(b) && tiny(e))
    }

    /// Map a point from the rotated frame to `(x, y)`.
    pub fn uv_to_xy(&self, u: f64, v: f64) -> PointXY {
        let ax = &self.new_axes;
        PointXY::new(u * ax[0][0] + v * ax[1][0], u * ax[0][1] + v * ax[1][1])
    }

    /// Map a point from `(x, y)` to the rotated frame.
    pub fn xy_to_uv(&self, x: f64, y: f64) -> (f64, f64) {
        let ax = &self.new_axes;
        (ax[0][0] * x + ax[0][1] * y, ax[1][0] * x + ax[1][1] * y)
    }

    /// The center `(u0, v0)` mapped back to `(x, y)`.
    pub fn center(&self) -> PointXY {
        self.uv_to_xy(self.translation.0, self.translation.1)
    }

    /// The normal form as text, e.g. `1*(u-2)^2 +1*v^2 = 1`.
    pub fn normalized_equation(&self) -> Option<String> {
        let [a, b, c, d, e] = self.primes;
        let [tu, tv] = &self.trans_variables;
        let mut terms: Vec<String> = Vec::new();
        for (k, var, offset) in [(a, tu, self.translation.0), (b, tv, self.translation.1)] {
            if is_zero(k) {
                continue;
            }
            let coefficient = make_coefficient(k, terms.is_empty());
            if is_zero(offset) {
                terms.push(format!("{coefficient}*{var}^2"));
            } else {
                let shift = make_coefficient(-offset, false);
                terms.push(format!("{coefficient}*({var}{shift})^2"));
            }
        }
        for (k, var) in [(c, tu), (d, tv)] {
            if !is_zero(k) {
                terms.push(format!("{}*{var}", make_coefficient(k, terms.is_empty())));
            }
        }
        if terms.is_empty() {
            return None;
        }
        let rhs = if is_zero(e) { 0.0 } else { -e };
        Some(format!("{} = {}", terms.join(" "), trim_double(rhs, 6)))
    }

    /// The rotation as two substitution lines.
    pub fn rotation_transform(&self) -> String {
        if is_zero(self.alpha) {
            return "There was no rotation, so the transform is the identity.".to_string();
        }
        let ax = &self.new_axes;
        let [x, y] = &self.actual_variables;
        let [u, v] = &self.trans_variables;
        format!(
            "{u} = {}*{x} {}*{y}\n{v} = {}*{x} {}*{y}",
            make_coefficient(ax[0][0], true),
            make_coefficient(ax[0][1], false),
            make_coefficient(ax[1][0], true),
            make_coefficient(ax[1][1], false),
        )
    }
}

fn is_zero(v: f64) -> bool {
    is_within_tolerance(v, 0.0)
}

fn make_coefficient(c: f64, leading: bool) -> String {
    let xs = trim_double(c.abs(), 6);
    if c > 0.0 {
        if leading { xs } else { format!("+{xs}") }
    } else {
        format!("-{xs}")
    }
}

// ============================================================================
// Line Equations
// ============================================================================

/// Equation of the line through `p` at `inclination` degrees.
pub fn line_through(p: PointXY, inclination: f64, vars: &[String; 2]) -> String {
    let inclination = normalize_angle_degrees(inclination);
    if (inclination.abs() - 90.0).abs() < 1.0e-8 {
        return vertical_line(p.x, vars);
    }
    let m = inclination.to_radians().tan();
    let coeffs = [m, -1.0, p.y - m * p.x];
    let t = (0.33 * coeffs.iter().map(|c| c * c).sum::<f64>()).sqrt();
    pretty_linear(&make_integer(&coeffs, 100), vars, t)
}

/// Equation of the vertical line through `x`.
pub fn vertical_line(x: f64, vars: &[String; 2]) -> String {
    let coeffs = [1.0, 0.0, -x];
    let t = (0.5 * (1.0 + x * x)).sqrt();
    pretty_linear(&make_integer(&coeffs, 100), vars, t)
}

fn pretty_linear(coeffs: &[f64], vars: &[String; 2], t: f64) -> String {
    let mut r = String::new();
    let mut leading = true;
    if !is_within_tolerance(coeffs[0], t) {
        r.push_str(&format!("{}*{}", make_coefficient(coeffs[0], leading), vars[0]));
        leading = false;
    }
    if !is_within_tolerance(coeffs[1], t) {
        r.push_str(&format!("{}*{}", make_coefficient(coeffs[1], leading), vars[1]));
        leading = false;
    }
    if !is_within_tolerance(coeffs[2], t) {
        r.push_str(&make_coefficient(coeffs[2], leading));
    }
    r.push_str(" = 0");
    r
}
