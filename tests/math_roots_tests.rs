#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use shapes_rs::internals::math::closed_form;
use shapes_rs::internals::math::factor::{FactorRoots, RootFactor};
use shapes_rs::internals::math::iterative;
use shapes_rs::internals::math::polynomial::Polynomial;
use shapes_rs::internals::primitives::errors::ShapeError;

fn from_roots(lead: f64, roots: &[f64]) -> Polynomial<f64> {
    roots.iter().fold(Polynomial::new(&[lead]), |acc, r| {
        acc.product(&Polynomial::new(&[1.0, -r]))
    })
}

#[test]
fn test_cubic_three_real_roots() {
    let p = Polynomial::new(&[1.0, 0.0, -3.0, -1.0]);
    let cf = closed_form::solve(&p).unwrap();

    assert_eq!(cf.reals.len(), 3);
    assert!(cf.reals.windows(2).all(|w| w[0] < w[1]));

    let sum: f64 = cf.reals.iter().sum();
    let product: f64 = cf.reals.iter().product();
    assert_relative_eq!(sum, 0.0, epsilon = 1e-9);
    assert_relative_eq!(product, 1.0, epsilon = 1e-9);
    assert!(cf.error < 1e-9);
}

#[test]
fn test_closed_form_reconstructs_random_polynomials() {
    let mut rng = StdRng::seed_from_u64(2024);
    let roots = Uniform::new(-3.0_f64, 3.0).unwrap();
    let leads = Uniform::new(0.5_f64, 4.0).unwrap();

    for _ in 0..200 {
        let degree = rng.random_range(1..=4usize);
        let lead = leads.sample(&mut rng);
        let mut p = Polynomial::new(&[lead]);
        let mut remaining = degree;
        while remaining > 0 {
            if remaining >= 2 && rng.random_bool(0.3) {
                // complex pair re +- i im
                let re = roots.sample(&mut rng);
                let im = 0.1 + roots.sample(&mut rng).abs();
                p = p.product(&Polynomial::new(&[1.0, -2.0 * re, re * re + im * im]));
                remaining -= 2;
            } else {
                p = p.product(&Polynomial::new(&[1.0, -roots.sample(&mut rng)]));
                remaining -= 1;
            }
        }

        let cf = closed_form::solve(&p).unwrap();
        let back = cf
            .factors
            .iter()
            .fold(Polynomial::new(&[lead]), |acc, f| acc.product(&f.expanded()));

        let scale = 1.0 + p.coefficients().iter().fold(0.0_f64, |m, c| m.max(c.abs()));
        assert_eq!(back.coefficients().len(), p.coefficients().len());
        for (a, b) in p.coefficients().iter().zip(back.coefficients()) {
            assert!(
                (a - b).abs() <= 1e-6 * scale,
                "degree {degree}: {:?} vs {:?}",
                p.coefficients(),
                back.coefficients()
            );
        }
    }
}

#[test]
fn test_closed_form_groups_double_roots() {
    // (x - 1)^2 (x + 2)
    let p = from_roots(1.0, &[1.0, 1.0, -2.0]);
    let cf = closed_form::solve(&p).unwrap();

    assert_eq!(cf.reals.len(), 3);
    assert_relative_eq!(cf.reals[0], -2.0, epsilon = 1e-6);
    assert_relative_eq!(cf.reals[1], 1.0, epsilon = 1e-6);
    assert_relative_eq!(cf.reals[2], 1.0, epsilon = 1e-6);
    assert!(cf.factors.iter().any(|f| f.multiplicity() == 2));
}

#[test]
fn test_closed_form_complex_quadratic() {
    // x^2 + 2x + 5 = (x + 1)^2 + 4
    let cf = closed_form::solve(&Polynomial::new(&[1.0, 2.0, 5.0])).unwrap();
    assert!(cf.reals.is_empty());
    assert_eq!(cf.factors.len(), 1);
    match cf.factors[0].roots() {
        FactorRoots::Complex { re, im } => {
            assert_relative_eq!(re, -1.0, epsilon = 1e-12);
            assert_relative_eq!(im, 2.0, epsilon = 1e-12);
        }
        other => panic!("expected a complex pair, got {other:?}"),
    }
}

#[test]
fn test_closed_form_rejects_unsupported_degrees() {
    let quintic = from_roots(1.0, &[1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(
        closed_form::solve(&quintic).unwrap_err(),
        ShapeError::UnsupportedDegree { degree: 5 }
    );
    assert_eq!(
        closed_form::solve(&Polynomial::new(&[3.0])).unwrap_err(),
        ShapeError::UnsupportedDegree { degree: 0 }
    );
}

#[test]
fn test_iterative_finds_triple_root() {
    // (x - 2)^3 (x + 1)(x - 3)(x^2 + x + 1)
    let p = from_roots(1.0, &[2.0, 2.0, 2.0, -1.0, 3.0]).product(&Polynomial::new(&[1.0, 1.0, 1.0]));
    assert_eq!(p.degree(), 7);

    let found = iterative::real_roots_with_multiplicities(p.coefficients());
    assert_eq!(found.len(), 3);

    let expected = [(-1.0, 1), (2.0, 3), (3.0, 1)];
    for (f, (root, multiplicity)) in found.iter().zip(expected) {
        assert_relative_eq!(f.root(), root, epsilon = 1e-3);
        assert_eq!(f.multiplicity(), multiplicity);
    }
}

#[test]
fn test_iterative_trailing_zeros_and_repeats() {
    // x^2 (x - 1)(x + 4)(x - 5)(x - 6)
    let p = from_roots(2.0, &[0.0, 0.0, 1.0, -4.0, 5.0, 6.0]);
    let reals = iterative::real_roots(p.coefficients());

    assert_eq!(reals.len(), 6);
    let expected = [-4.0, 0.0, 0.0, 1.0, 5.0, 6.0];
    for (r, e) in reals.iter().zip(expected) {
        assert_relative_eq!(*r, e, epsilon = 1e-6);
    }
}

#[test]
fn test_iterative_drops_complex_pairs() {
    // (x^2 + 1)(x^2 + 4)(x - 0.5)
    let p = Polynomial::new(&[1.0, 0.0, 1.0])
        .product(&Polynomial::new(&[1.0, 0.0, 4.0]))
        .product(&Polynomial::new(&[1.0, -0.5]));

    let found = iterative::real_roots_with_multiplicities(p.coefficients());
    assert_eq!(found.len(), 1);
    assert_relative_eq!(found[0].root(), 0.5, epsilon = 1e-8);

    let all = iterative::factors(p.coefficients());
    assert_eq!(all.iter().map(|f| f.degree() * f.multiplicity()).sum::<usize>(), 5);
}

#[test]
fn test_iterative_empty_input() {
    assert!(iterative::factors::<f64>(&[]).is_empty());
    assert!(iterative::real_roots::<f64>(&[0.0, 0.0]).is_empty());
}

#[test]
fn test_close_roots_are_merged() {
    // roots 1, 1 + 5e-9, 3 (x + c has root -c)
    let factors = vec![
        RootFactor::linear(-1.0),
        RootFactor::linear(-1.0 - 5e-9).with_multiplicity(2),
        RootFactor::linear(-3.0),
    ];
    let merged = iterative::merge_close_roots(factors, 1e-8);

    assert_eq!(merged.len(), 2);
    assert_relative_eq!(merged[0].root(), 1.0, epsilon = 1e-12);
    assert_eq!(merged[0].multiplicity(), 3);
    assert_relative_eq!(merged[1].root(), 3.0, epsilon = 1e-12);
    assert_eq!(merged[1].multiplicity(), 1);
}
