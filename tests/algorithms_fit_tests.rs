#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use std::f64::consts::PI;

use shapes_rs::internals::algorithms::builder::{DataModelBuilder, prune, select_best};
use shapes_rs::internals::algorithms::polar::{PolarConicKind, PolarFamily, best_polar_model};
use shapes_rs::internals::algorithms::polynomial::{
    PolynomialCandidate, PolynomialFit, PolynomialModelBuilder, QuadraticModel,
};
use shapes_rs::internals::primitives::points::MultiPointXY;
use shapes_rs::internals::primitives::tolerances::Tolerances;

fn parabola_samples() -> Vec<MultiPointXY> {
    (0..=100)
        .map(|i| {
            let x = -2.0 + 0.04 * i as f64;
            MultiPointXY::single(x, 3.0 * x * x + 1.0)
        })
        .collect()
}

fn polar_samples(r: impl Fn(f64) -> f64) -> Vec<MultiPointXY> {
    (0..360)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / 360.0;
            MultiPointXY::single(theta, r(theta))
        })
        .collect()
}

#[test]
fn test_quadratic_signature_on_parabola() {
    let tol = Tolerances::default();
    let mut builder = PolynomialModelBuilder::new(2, 2);
    for p in parabola_samples() {
        builder.add_point(&p);
    }

    // 1, x, x^2, y, xy, y^2
    let signature = [
        builder.column(0, 0),
        builder.column(1, 0),
        builder.column(2, 0),
        builder.column(0, 1),
        builder.column(1, 1),
        builder.column(0, 2),
    ];
    let m = builder.data().build_model(&signature, &tol);
    assert!(m.fit < -8.0, "fit {}", m.fit);

    let scale = m.coefficients[0];
    let expected = [1.0, 0.0, 3.0, -1.0, 0.0, 0.0];
    for (c, e) in m.coefficients.iter().zip(expected) {
        assert_relative_eq!(c / scale, e, epsilon = 1e-6);
    }
}

#[test]
fn test_quadratic_model_relation() {
    let tol = Tolerances::default();
    let mut builder = PolynomialModelBuilder::new(2, 2);
    for p in parabola_samples() {
        builder.add_point(&p);
    }
    let q = QuadraticModel::fit(&builder, &tol);
    assert!(q.model.is_acceptable(tol.polynomial_worst_fit));

    let ints = q.integer_coefficients(&tol);
    let s = ints[0];
    assert_relative_eq!(ints[2] / s, 3.0, epsilon = 1e-9);
    assert_relative_eq!(ints[3] / s, -1.0, epsilon = 1e-9);
    assert_eq!(ints[1], 0.0);
    assert_eq!(ints[5], 0.0);
}

#[test]
fn test_polynomial_fit_prefers_conic() {
    let tol = Tolerances::default();
    let fit = PolynomialFit::new(&parabola_samples(), &tol);
    assert!(matches!(fit.best_guess(), Some(PolynomialCandidate::Quadratic(_))));
}

#[test]
fn test_polynomial_fit_finds_rational() {
    // y = 1 / (x^2 + 1)
    let points: Vec<MultiPointXY> = (0..=200)
        .map(|i| {
            let x = -3.0 + 0.03 * i as f64;
            MultiPointXY::single(x, 1.0 / (x * x + 1.0))
        })
        .collect();
    let tol = Tolerances::default();
    let fit = PolynomialFit::new(&points, &tol);

    let Some(PolynomialCandidate::Rational(r)) = fit.best_guess() else {
        panic!("expected a rational fit, got {:?}", fit.best_guess());
    };
    let n = r.numerator(&tol);
    let d = r.denominator(&tol);
    assert_eq!(n.degree(), 0);
    assert_eq!(d.degree(), 2);
    assert_relative_eq!(d.eval(2.0) / n.eval(2.0), 5.0, epsilon = 1e-6);
}

#[test]
fn test_too_few_rows_is_unusable() {
    let tol = Tolerances::default();
    let mut builder = DataModelBuilder::new();
    for i in 0..5 {
        builder.add_row(vec![1.0, i as f64]);
    }
    let m = builder.build_model(&[0, 1], &tol);
    assert_eq!(m.fit, f64::INFINITY);
    assert!(m.coefficients.is_empty());
}

#[test]
fn test_prune_and_select_best() {
    let mut values = [1.0, 1e-12, -0.5, 3e-10];
    assert_eq!(prune(&mut values, 1e-8), 2);
    assert_eq!(values, [1.0, 0.0, -0.5, 0.0]);

    // (fit, complexity)
    let models = vec![(-14.0, 5.0), (-13.0, 2.0), (-3.0, 1.0), (-15.0, 9.0)];
    let best = select_best(models, -12.0, |m| *m);
    assert_eq!(best, Some((-13.0, 2.0)));
    assert_eq!(select_best(vec![(-1.0, 1.0)], -12.0, |m| *m), None);
}

#[test]
fn test_polar_rose() {
    let tol = Tolerances::default();
    let model = best_polar_model(&polar_samples(|t| 2.0 * (3.0 * t).cos()), &tol).unwrap();
    assert_eq!(model.family, PolarFamily::Rose);
    assert_eq!(model.frequency(), 3);
}

#[test]
fn test_polar_circle_about_pole() {
    let tol = Tolerances::default();
    let mut model = best_polar_model(&polar_samples(|_| 3.0), &tol).unwrap();
    assert_eq!(model.family, PolarFamily::Conic);
    let (_, kind) = model.conic(&tol).unwrap();
    assert_eq!(kind, PolarConicKind::Ellipse);
    assert!(model.cartesian_equation().is_some());
}

#[test]
fn test_polar_cardioid_is_trochoid() {
    let tol = Tolerances::default();
    let model = best_polar_model(&polar_samples(|t| 1.0 + t.cos()), &tol).unwrap();
    assert_eq!(model.family, PolarFamily::Trochoid);
    assert_eq!(model.frequency(), 1);
}
