//! Shape classification benchmarks using Criterion.
//!
//! Benchmarks cover:
//! - Closed-form roots (degrees 1 to 4)
//! - Iterative factorization (degree 7 with a triple root, random degree 5 to 10)
//! - Singular value decomposition (600 x 12 design matrix, against nalgebra)
//! - Conic reduction of random quadratics
//! - Polar family fitting
//! - End-to-end solver runs
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::prelude::*;
use rand_distr::{Normal, Uniform};
use shapes_rs::internals::algorithms::polar::best_polar_model;
use shapes_rs::internals::classifiers::quadratic::QuadraticClassifier;
use shapes_rs::internals::math::closed_form;
use shapes_rs::internals::math::iterative;
use shapes_rs::internals::math::matrix::Matrix;
use shapes_rs::internals::math::polynomial::Polynomial;
use shapes_rs::internals::primitives::points::MultiPointXY;
use shapes_rs::prelude::*;
use std::f64::consts::PI;
use std::hint::black_box;

// ============================================================================
// Data Generation with Reproducible RNG
// ============================================================================

/// Random polynomial with the given real roots and complex pairs.
fn generate_polynomial(degree: usize, seed: u64) -> Polynomial<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let roots = Uniform::new(-4.0, 4.0).unwrap();

    let mut p = Polynomial::new(&[1.0]);
    let mut remaining = degree;
    while remaining > 0 {
        if remaining >= 2 && rng.random_bool(0.4) {
            let re: f64 = roots.sample(&mut rng);
            let im: f64 = 0.2 + roots.sample(&mut rng).abs();
            p = p.product(&Polynomial::new(&[1.0, -2.0 * re, re * re + im * im]));
            remaining -= 2;
        } else {
            p = p.product(&Polynomial::new(&[1.0, -roots.sample(&mut rng)]));
            remaining -= 1;
        }
    }
    p
}

/// (x - 2)^3 (x + 1)(x - 3)(x^2 + x + 1).
fn triple_root_polynomial() -> Polynomial<f64> {
    [2.0, 2.0, 2.0, -1.0, 3.0]
        .iter()
        .fold(Polynomial::new(&[1.0, 1.0, 1.0]), |acc, r| {
            acc.product(&Polynomial::new(&[1.0, -r]))
        })
}

/// Rows of the conic basis evaluated on a noisy ellipse.
fn generate_design_matrix(rows: usize, cols: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.01).unwrap();

    (0..rows)
        .map(|i| {
            let t = 2.0 * PI * i as f64 / rows as f64;
            let x = 3.0 * t.cos() + noise.sample(&mut rng);
            let y = 2.0 * t.sin() + noise.sample(&mut rng);
            (0..cols)
                .map(|j| x.powi((j % 4) as i32) * y.powi((j / 4) as i32))
                .collect()
        })
        .collect()
}

/// Random general conic coefficients.
fn generate_conics(count: usize, seed: u64) -> Vec<[f64; 6]> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = Uniform::new(-5.0, 5.0).unwrap();
    (0..count)
        .map(|_| std::array::from_fn(|_| dist.sample(&mut rng)))
        .collect()
}

/// `(theta, r)` samples of a polar curve.
fn generate_polar_samples(size: usize, r: impl Fn(f64) -> f64) -> Vec<MultiPointXY> {
    (0..size)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / (size - 1) as f64;
            MultiPointXY::single(theta, r(theta))
        })
        .collect()
}

// ============================================================================
// Benchmark Functions
// ============================================================================

fn bench_closed_form(c: &mut Criterion) {
    let mut group = c.benchmark_group("closed_form");
    group.sample_size(200);

    for degree in 1..=4 {
        let p = generate_polynomial(degree, 42 + degree as u64);
        group.bench_with_input(BenchmarkId::new("solve", degree), &p, |b, p| {
            b.iter(|| closed_form::solve(black_box(p)).unwrap())
        });
    }
    group.finish();
}

fn bench_iterative(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterative");
    group.sample_size(100);

    let triple = triple_root_polynomial();
    group.bench_function("degree_7_triple_root", |b| {
        b.iter(|| iterative::real_roots_with_multiplicities(black_box(triple.coefficients())))
    });

    for degree in [5, 7, 10] {
        let p = generate_polynomial(degree, 7 + degree as u64);
        group.bench_with_input(BenchmarkId::new("factors", degree), &p, |b, p| {
            b.iter(|| iterative::factors(black_box(p.coefficients())))
        });
    }
    group.finish();
}

fn bench_svd(c: &mut Criterion) {
    let mut group = c.benchmark_group("svd");
    group.sample_size(50);

    for (rows, cols) in [(600, 6), (600, 12), (2000, 12)] {
        let data = generate_design_matrix(rows, cols, 42);
        group.throughput(Throughput::Elements((rows * cols) as u64));

        let label = format!("{rows}x{cols}");
        group.bench_with_input(BenchmarkId::new("golub_reinsch", &label), &data, |b, data| {
            b.iter(|| {
                let m = Matrix::from_rows(black_box(data));
                m.singular_values().to_vec()
            })
        });

        let flat: Vec<f64> = data.iter().flatten().copied().collect();
        group.bench_with_input(BenchmarkId::new("nalgebra", &label), &flat, |b, flat| {
            b.iter(|| {
                let m = nalgebra::DMatrix::from_row_slice(rows, cols, black_box(flat));
                m.svd(true, true).singular_values
            })
        });
    }
    group.finish();
}

fn bench_quadratic(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadratic");
    group.sample_size(100);

    let conics = generate_conics(1000, 42);
    let relations: Vec<PolynomialRelation> =
        conics.iter().map(|k| PolynomialRelation::conic(*k)).collect();
    let tol = Tolerances::default();

    group.throughput(Throughput::Elements(relations.len() as u64));
    group.bench_function("classify_1000", |b| {
        b.iter(|| {
            relations
                .iter()
                .map(|r| QuadraticClassifier::new(black_box(r), &tol).identity())
                .collect::<Vec<_>>()
        })
    });
    group.finish();
}

fn bench_polar(c: &mut Criterion) {
    let mut group = c.benchmark_group("polar");
    group.sample_size(30);

    let tol = Tolerances::default();
    let curves: [(&str, fn(f64) -> f64); 3] = [
        ("rose", |t| 2.0 * (3.0 * t).cos()),
        ("cardioid", |t| 1.0 + t.cos()),
        ("circle", |_| 3.0),
    ];

    for (name, r) in curves {
        let samples = generate_polar_samples(600, r);
        group.bench_with_input(BenchmarkId::new("best_model", name), &samples, |b, s| {
            b.iter(|| best_polar_model(black_box(s), &tol))
        });
    }
    group.finish();
}

fn bench_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver");
    group.sample_size(20);

    group.bench_function("circle_and_parabola", |b| {
        b.iter(|| {
            let mut solver = SolverBuilder::new().build().unwrap();
            solver
                .add_equation(PolynomialRelation::conic([1.0, 0.0, 1.0, 0.0, 0.0, -4.0]))
                .unwrap();
            solver
                .add_equation(PolynomialRelation::conic([1.0, 0.0, 0.0, 0.0, -1.0, 0.0]))
                .unwrap();
            solver.solve().unwrap();
            black_box(solver.any_describable())
        })
    });

    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, 0.05).unwrap();
    let x: Vec<f64> = (0..1000).map(|i| -3.0 + 0.006 * i as f64).collect();
    let y: Vec<f64> = x
        .iter()
        .map(|x| 0.5 * x * x * x - x + noise.sample(&mut rng))
        .collect();

    group.bench_function("noisy_cubic_data", |b| {
        b.iter(|| {
            let mut solver = SolverBuilder::new().build().unwrap();
            solver.add_data("x", "y", black_box(&x), black_box(&y)).unwrap();
            solver.solve().unwrap();
            black_box(solver.any_describable())
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_closed_form,
    bench_iterative,
    bench_svd,
    bench_quadratic,
    bench_polar,
    bench_solver,
);

criterion_main!(benches);
