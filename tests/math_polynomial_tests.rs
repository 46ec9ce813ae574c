#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use shapes_rs::internals::math::polynomial::{Polynomial, SignSignature};
use shapes_rs::internals::primitives::errors::ShapeError;
use shapes_rs::internals::primitives::tolerances::Tolerances;

fn random_polynomial(rng: &mut StdRng, degree: usize) -> Polynomial<f64> {
    let dist = Uniform::new(-5.0, 5.0).unwrap();
    let mut c: Vec<f64> = (0..=degree).map(|_| dist.sample(rng)).collect();
    if c[0].abs() < 0.5 {
        c[0] = 1.0;
    }
    Polynomial::new(&c)
}

#[test]
fn test_sum_with_negative_is_trivial() {
    let mut rng = StdRng::seed_from_u64(7);
    for degree in 0..8 {
        let p = random_polynomial(&mut rng, degree);
        assert!(
            p.sum(&p.make_negative()).is_trivial(),
            "degree {degree} did not cancel"
        );
    }
}

#[test]
fn test_quotient_reconstructs_dividend() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let p_degree = rng.random_range(0..9);
        let q_degree = rng.random_range(0..5);
        let p = random_polynomial(&mut rng, p_degree);
        let q = random_polynomial(&mut rng, q_degree);

        let (quot, rem) = p.quotient(&q).unwrap();
        let back = quot.product(&q).sum(&rem);

        let max_abs = |c: &[f64]| c.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let scale = 1.0
            + max_abs(p.coefficients())
            + max_abs(quot.coefficients()) * max_abs(q.coefficients());

        let n = p.coefficients().len();
        let back_c = back.coefficients();
        let offset = back_c.len().saturating_sub(n);
        for (a, b) in p.coefficients().iter().zip(&back_c[offset..]) {
            assert!((a - b).abs() <= 1e-7 * scale, "{a} vs {b}");
        }
    }
}

#[test]
fn test_quotient_by_trivial_fails() {
    let p = Polynomial::new(&[1.0, 2.0, 3.0]);
    assert_eq!(
        p.quotient(&Polynomial::trivial()).unwrap_err(),
        ShapeError::TrivialDivisor
    );
}

#[test]
fn test_quotient_exact_division() {
    // (x^2 - 1) / (x - 1) = x + 1
    let p = Polynomial::new(&[1.0, 0.0, -1.0]);
    let q = Polynomial::new(&[1.0, -1.0]);
    let (quot, rem) = p.quotient(&q).unwrap();
    assert_eq!(quot.coefficients(), &[1.0, 1.0]);
    assert!(rem.is_trivial());
}

#[test]
fn test_derivative_and_eval() {
    // 2x^3 - x + 4
    let p = Polynomial::new(&[2.0, 0.0, -1.0, 4.0]);
    assert_eq!(p.derivative().coefficients(), &[6.0, 0.0, -1.0]);
    assert_relative_eq!(p.eval(2.0), 18.0);
    assert_eq!(p.eval(f64::INFINITY), f64::INFINITY);
    assert_eq!(p.eval(f64::NEG_INFINITY), f64::NEG_INFINITY);
}

#[test]
fn test_gcd_of_shared_factor() {
    // (x - 1)(x - 2) and (x - 1)(x + 3)
    let a = Polynomial::new(&[1.0, -3.0, 2.0]);
    let b = Polynomial::new(&[1.0, 2.0, -3.0]);
    let g = a.gcd(&b).unwrap();
    assert_eq!(g.degree(), 1);
    let c = g.coefficients();
    assert_relative_eq!(-c[1] / c[0], 1.0, epsilon = 1e-9);
}

#[test]
fn test_real_zero_signatures() {
    // (x + 1) x^2: sign change at -1, touch at 0
    let p = Polynomial::new(&[1.0, 1.0, 0.0, 0.0]);
    let zeros = p.real_zeros().unwrap();
    assert_eq!(zeros.len(), 2);
    assert_relative_eq!(zeros[0].x, -1.0, epsilon = 1e-9);
    assert_eq!(zeros[0].signature, SignSignature::MinusPlus);
    assert_relative_eq!(zeros[1].x, 0.0, epsilon = 1e-9);
    assert_eq!(zeros[1].signature, SignSignature::PlusPlus);

    assert!(Polynomial::<f64>::trivial().real_zeros().is_none());
    assert!(Polynomial::new(&[3.0]).real_zeros().unwrap().is_empty());
}

#[test]
fn test_trimming_ratio_from_tolerances() {
    let loose = Tolerances {
        polynomial_epsilon: 1e-3,
        ..Tolerances::default()
    };

    let c = [1e-4, 1.0, 1.0];
    assert_eq!(Polynomial::new(&c).degree(), 2);
    assert_eq!(Polynomial::new_with(&c, &loose).degree(), 1);
    assert_eq!(Polynomial::new_with(&c, &Tolerances::default()).degree(), 2);

    // Arithmetic results keep the ratio of the left operand.
    let b = Polynomial::new(&[-0.9995, 0.0]);
    assert_eq!(Polynomial::new(&[1.0, 2.0]).sum(&b).degree(), 1);
    assert_eq!(Polynomial::new_with(&[1.0, 2.0], &loose).sum(&b).degree(), 0);
}
