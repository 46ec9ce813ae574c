#![cfg(feature = "dev")]

use approx::assert_relative_eq;

use shapes_rs::internals::classifiers::quadratic::{QuadraticClassifier, QuadraticType, compute_identity};
use shapes_rs::internals::classifiers::{Classifier, FailureReason, ItemView, ShapeIdentity};
use shapes_rs::internals::primitives::bounds::Bounds;
use shapes_rs::internals::primitives::symbolic::{PolynomialRelation, SymbolicPolynomial};
use shapes_rs::internals::primitives::tolerances::Tolerances;

fn classify(coefficients: [f64; 6]) -> QuadraticClassifier {
    QuadraticClassifier::new(&PolynomialRelation::conic(coefficients), &Tolerances::default())
}

fn view<'a>(rel: &'a dyn SymbolicPolynomial, vars: &'a [String; 2]) -> ItemView<'a> {
    ItemView {
        name: "test",
        text: "",
        equation_print: "",
        relation: Some(rel),
        variables: vars,
        degree: rel.degree(),
        polynomial: true,
        solvable_function: false,
        polar: false,
        points: &[],
        trails: &[],
        x_intercepts: &[],
        y_intercepts: &[],
        bounds: Bounds::default(),
    }
}

#[test]
fn test_unit_circle() {
    let qc = classify([1.0, 0.0, 1.0, 0.0, 0.0, -1.0]);
    assert_eq!(qc.identity(), QuadraticType::Ellipse);
    assert_eq!(qc.reason(), FailureReason::NoReason);
    assert_relative_eq!(qc.rotation(), 0.0, epsilon = 1e-12);
    let (h, k) = qc.translation();
    assert_relative_eq!(h, 0.0, epsilon = 1e-12);
    assert_relative_eq!(k, 0.0, epsilon = 1e-12);
}

#[test]
fn test_taxonomy() {
    let cases = [
        ([1.0, 0.0, -1.0, 0.0, 0.0, 0.0], QuadraticType::Cross),
        ([0.0, 0.0, 0.0, 1.0, 0.0, 0.0], QuadraticType::VerticalLine),
        ([0.0, 0.0, 0.0, 0.0, 1.0, -3.0], QuadraticType::HorizontalLine),
        ([0.0, 0.0, 0.0, 2.0, 1.0, -3.0], QuadraticType::SlopingLine),
        ([1.0, 0.0, 0.0, 0.0, -1.0, 0.0], QuadraticType::Parabola),
        ([1.0, 0.0, -1.0, 0.0, 0.0, -1.0], QuadraticType::Hyperbola),
        ([1.0, 0.0, 1.0, 0.0, 0.0, 1.0], QuadraticType::NullSet),
        ([1.0, 0.0, 1.0, 0.0, 0.0, 0.0], QuadraticType::SinglePoint),
        ([1.0, 0.0, 0.0, 0.0, 0.0, -1.0], QuadraticType::TwoVerticalLines),
        ([0.0, 0.0, 1.0, 0.0, 0.0, -4.0], QuadraticType::TwoHorizontalLines),
        ([1.0, 0.0, 0.0, 0.0, 0.0, 1.0], QuadraticType::NullSet),
        ([4.0, 0.0, 1.0, 0.0, 0.0, -4.0], QuadraticType::Ellipse),
    ];
    for (coefficients, expected) in cases {
        assert_eq!(classify(coefficients).identity(), expected, "{coefficients:?}");
    }
}

#[test]
fn test_compute_identity_degenerate_cases() {
    let exact = |v: f64| v == 0.0;
    assert_eq!(compute_identity(0.0, 0.0, 0.0, 0.0, 0.0, exact), QuadraticType::AllPoints);
    assert_eq!(compute_identity(0.0, 0.0, 0.0, 0.0, 1.0, exact), QuadraticType::NullSet);
    // (u - 1)^2 = 0
    assert_eq!(compute_identity(1.0, 0.0, -2.0, 0.0, 1.0, exact), QuadraticType::VerticalLine);
}

#[test]
fn test_rotated_hyperbola() {
    // xy = 1
    let qc = classify([0.0, 1.0, 0.0, 0.0, 0.0, -1.0]);
    assert_eq!(qc.identity(), QuadraticType::Hyperbola);
    assert_relative_eq!(qc.rotation().abs(), 45.0, epsilon = 1e-9);
    assert_eq!(qc.transformed_variables(), &["u".to_string(), "v".to_string()]);
}

#[test]
fn test_translated_circle() {
    // (x - 1)^2 + (y + 2)^2 = 4
    let qc = classify([1.0, 0.0, 1.0, -2.0, 4.0, 1.0]);
    assert_eq!(qc.identity(), QuadraticType::Ellipse);
    let (h, k) = qc.translation();
    assert_relative_eq!(h, 1.0, epsilon = 1e-12);
    assert_relative_eq!(k, -2.0, epsilon = 1e-12);
    let c = qc.center();
    assert_relative_eq!(c.x, 1.0, epsilon = 1e-12);
    assert_relative_eq!(c.y, -2.0, epsilon = 1e-12);
}

#[test]
fn test_frame_maps_are_inverse() {
    let qc = classify([3.0, 2.0, 1.0, -1.0, 4.0, -7.0]);
    let p = qc.uv_to_xy(0.7, -1.3);
    let (u, v) = qc.xy_to_uv(p.x, p.y);
    assert_relative_eq!(u, 0.7, epsilon = 1e-12);
    assert_relative_eq!(v, -1.3, epsilon = 1e-12);
}

#[test]
fn test_classification_is_deterministic() {
    let coefficients = [3.0, 2.0, 1.0, -1.0, 4.0, -7.0];
    let a = classify(coefficients);
    let b = classify(coefficients);
    assert_eq!(a, b);
}

#[test]
fn test_declines_cubic_and_polar() {
    let cubic = PolynomialRelation::new("y = x^3")
        .term(1.0, &[("x", 3)])
        .term(-1.0, &[("y", 1)]);
    let qc = QuadraticClassifier::new(&cubic, &Tolerances::default());
    assert_eq!(qc.identity(), QuadraticType::Unknown);
    assert_eq!(qc.reason(), FailureReason::DegreeGreaterThan2);

    let polar = PolynomialRelation::new("r = theta")
        .term(1.0, &[("r", 1)])
        .term(-1.0, &[("theta", 1)]);
    let qc = QuadraticClassifier::new(&polar, &Tolerances::default());
    assert_eq!(qc.reason(), FailureReason::Polar);
}

#[test]
fn test_circle_features() {
    let rel = PolynomialRelation::conic([1.0, 0.0, 1.0, 0.0, 0.0, -4.0]);
    let vars = ["x".to_string(), "y".to_string()];
    let tol = Tolerances::default();
    let v = view(&rel, &vars);

    let classifier = Classifier::for_equation(&v, true, &tol);
    assert_eq!(classifier.name(), "quadratic");

    let result = classifier.classify(&v, &tol);
    assert_eq!(result.identity, ShapeIdentity::Quadratic(QuadraticType::Ellipse));
    assert_eq!(result.features.text("graphName"), Some("circle"));
    let radius: f64 = result.features.text("radius").unwrap().parse().unwrap();
    assert_relative_eq!(radius, 2.0, epsilon = 1e-9);
    assert_eq!(result.features.text("coordinateSystem"), Some("Cartesian"));
    assert!(result.features.text("graphBoundaries").is_some());
}

#[test]
fn test_parabola_features() {
    // y = x^2
    let rel = PolynomialRelation::conic([1.0, 0.0, 0.0, 0.0, -1.0, 0.0]);
    let vars = ["x".to_string(), "y".to_string()];
    let tol = Tolerances::default();
    let v = view(&rel, &vars);

    let result = Classifier::for_equation(&v, true, &tol).classify(&v, &tol);
    assert_eq!(result.identity, ShapeIdentity::Quadratic(QuadraticType::Parabola));
    assert_eq!(result.features.text("graphName"), Some("parabola"));
    assert!(result.features.text("vertex").is_some());
    assert!(result.features.text("focus").is_some());
}

#[test]
fn test_single_non_finite_coefficient_becomes_unit() {
    // The infinite constant is replaced by 1: x^2 + y^2 + 1 = 0.
    let qc = classify([1.0, 0.0, 1.0, 0.0, 0.0, f64::INFINITY]);
    assert_eq!(qc.identity(), QuadraticType::NullSet);
    assert_eq!(qc.reason(), FailureReason::NoReason);
}

#[test]
fn test_several_non_finite_coefficients_abort() {
    let qc = classify([f64::NAN, 0.0, 1.0, 0.0, 0.0, f64::INFINITY]);
    assert_eq!(qc.identity(), QuadraticType::Unknown);
    assert_eq!(qc.reason(), FailureReason::NonFinite);
}

#[test]
fn test_normalized_equation_text() {
    // (x - 1)^2 + (y + 2)^2 = 4
    let circle = classify([1.0, 0.0, 1.0, -2.0, 4.0, 1.0]);
    assert_eq!(
        circle.normalized_equation().as_deref(),
        Some("0.25*(x-1)^2 +0.25*(y+2)^2 = 1")
    );

    // xy = 1, centered at the origin
    let hyperbola = classify([0.0, 1.0, 0.0, 0.0, 0.0, -1.0]);
    assert_eq!(
        hyperbola.normalized_equation().as_deref(),
        Some("-0.5*u^2 +0.5*v^2 = 1")
    );
}

#[test]
fn test_rotation_transform_text() {
    let hyperbola = classify([0.0, 1.0, 0.0, 0.0, 0.0, -1.0]);
    let text = hyperbola.rotation_transform();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "u = 0.707107*x -0.707107*y");
    assert!(lines[1].starts_with("v = "));

    let circle = classify([1.0, 0.0, 1.0, 0.0, 0.0, -1.0]);
    assert!(circle.rotation_transform().contains("identity"));
}
