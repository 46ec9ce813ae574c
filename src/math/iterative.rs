//! Iterative factorization for polynomials of any degree.
//!
//! ## Purpose
//!
//! Factor a polynomial by repeatedly extracting one linear factor (Newton's
//! method on the polynomial) or one quadratic factor (Bairstow's method),
//! determining its multiplicity from the chain of derivatives, and
//! deflating it out. Once the remaining polynomial has degree below five
//! it is handed to the closed-form solver.
//!
//! ## Design notes
//!
//! * **Starting guesses**: Linear search starts at `pi/10`; quadratic search
//!   starts at `x^2 + (pi/10) x - e/10`.
//! * **Loosening**: Bairstow's correction tolerance grows tenfold every
//!   `loosen_every` iterations; both searches stop at `max_iterations`.
//! * **Multiplicity**: A factor found in `p` is searched for again in `p'`,
//!   `p''`, ... starting from the factor itself; each derivative that
//!   converges to (nearly) the same factor adds one to the multiplicity.
//!
//! ## Invariants
//!
//! * Coefficient vectors are descending and monic before iterating.
//! * A quadratic search that fails to converge yields no factors at all.
//!
//! ## Non-goals
//!
//! * Complex arithmetic; complex roots are only carried as quadratic factors.

// External dependencies
use num_traits::Float;
use std::f64::consts::{E, PI};
use tracing::{trace, warn};

// Internal dependencies
use crate::math::cast;
use crate::math::closed_form;
use crate::math::factor::{FactorRoots, RootFactor};
use crate::math::polynomial::Polynomial;
use crate::primitives::tolerances::Tolerances;

// ============================================================================
// Single-Factor Searches
// ============================================================================

/// Result of one factor search.
#[derive(Debug, Clone, Copy)]
struct Search<T> {
    err: T,
}

/// Synthetic division of monic `a` (degree `n`) by `x + root`.
fn deflate_linear<T: Float>(a: &[T], n: usize, root: T) -> Vec<T> {
    let mut b = vec![T::one(); n + 1];
    for i in 1..=n {
        b[i] = a[i] - root * b[i - 1];
    }
    b.truncate(n);
    b
}

/// Synthetic division of monic `a` (degree `n`) by `x^2 + r x + s`.
fn deflate_quadratic<T: Float>(a: &[T], n: usize, (r, s): (T, T)) -> Vec<T> {
    let mut b = vec![T::one(); n + 1];
    b[1] = a[1] - r;
    for i in 2..=n {
        b[i] = a[i] - r * b[i - 1] - s * b[i - 2];
    }
    b.truncate(n - 1);
    b
}

/// Bairstow's method on monic `a` of degree `n`; refines `quad = (r, s)`.
fn find_quadratic<T: Float>(a: &[T], n: usize, quad: &mut (T, T), tol: &Tolerances) -> Search<T> {
    if n < 3 {
        *quad = (a[1], a[2]);
        return Search { err: T::zero() };
    }

    let mut b = vec![T::zero(); n + 1];
    let mut c = vec![T::zero(); n + 1];
    b[0] = T::one();
    c[0] = T::one();
    let (mut r, mut s) = *quad;
    let (mut dr, mut ds) = (T::one(), T::zero());
    let mut eps: T = cast(tol.bairstow_start);
    let ten: T = cast(10.0);
    let (tiny, floor): (T, T) = (cast(1e-10), cast(1e-8));

    let mut iter = 1;
    while dr.abs() + ds.abs() > eps {
        if iter > tol.max_iterations {
            break;
        }
        if iter % tol.loosen_every == 0 {
            eps = eps * ten;
        }
        b[1] = a[1] - r;
        c[1] = b[1] - r;
        for i in 2..=n {
            b[i] = a[i] - r * b[i - 1] - s * b[i - 2];
            c[i] = b[i] - r * c[i - 1] - s * c[i - 2];
        }
        let mut dn = c[n - 1] * c[n - 3] - c[n - 2] * c[n - 2];
        let drn = b[n] * c[n - 3] - b[n - 1] * c[n - 2];
        let dsn = b[n - 1] * c[n - 1] - b[n] * c[n - 2];
        if dn.abs() < tiny {
            dn = if dn < T::zero() { -floor } else { floor };
        }
        dr = drn / dn;
        ds = dsn / dn;
        r = r + dr;
        s = s + ds;
        iter += 1;
    }

    *quad = (r, s);
    Search {
        err: ds.abs() + dr.abs(),
    }
}

/// Newton's method on monic `a` of degree `n` for a factor `x + root`.
fn find_linear<T: Float>(a: &[T], n: usize, root: &mut T, tol: &Tolerances) -> Search<T> {
    let mut b = vec![T::one(); n + 1];
    let mut c = vec![T::one(); n + 1];
    let mut dr = T::one();
    let eps: T = cast(tol.bairstow_start);
    let zero_residual: T = cast(1e-16);
    let mut err = T::zero();
    let mut iter = 0;

    while dr.abs() > eps {
        for i in 1..=n {
            b[i] = a[i] - *root * b[i - 1];
            c[i] = b[i] - *root * c[i - 1];
        }
        err = b[n];
        if err.abs() < zero_residual {
            break;
        }
        iter += 1;
        let slope = c[n - 1];
        if slope == T::zero() {
            *root = *root - T::one();
            if iter > tol.max_iterations {
                break;
            }
            continue;
        }
        dr = b[n] / slope;
        *root = *root + dr;
        if iter > tol.max_iterations {
            break;
        }
    }

    Search { err: err.abs() }
}

/// Monic derivative of monic `a` (degree `n`).
fn derivative<T: Float>(a: &[T], n: usize) -> Vec<T> {
    let nf = T::from(n).unwrap_or_else(T::one);
    let mut d = vec![T::one(); n];
    for i in 1..n {
        d[i] = a[i] * T::from(n - i).unwrap_or_else(T::zero) / nf;
    }
    d
}

/// Effective degree after dropping negligible trailing coefficients.
fn trim_degree<T: Float>(d: &[T], mut m: usize, tol: &Tolerances) -> usize {
    let neg: T = cast(tol.negligible_coefficient);
    while m > 0 && d[m].abs() < neg {
        m -= 1;
    }
    m
}

// ============================================================================
// Multiplicity
// ============================================================================

fn linear_multiplicity<T: Float>(a: &[T], n: usize, root: &mut T, tol: &Tolerances) -> usize {
    let agree: T = cast(tol.linear_multiplicity);
    let mut count = 1;
    let mut a = a.to_vec();
    let mut n = n;

    loop {
        let d = derivative(&a, n);
        let m = trim_degree(&d, n - 1, tol);
        let candidate = match m {
            0 => return count,
            1 => d[1],
            _ => {
                let mut rs = *root;
                find_linear(&d, m, &mut rs, tol);
                rs
            }
        };
        if (candidate - *root).abs() > agree {
            return count;
        }
        *root = candidate;
        count += 1;
        a = d;
        n = m;
    }
}

fn quadratic_multiplicity<T: Float>(
    a: &[T],
    n: usize,
    quad: &mut (T, T),
    tol: &Tolerances,
) -> usize {
    if n < 4 {
        return 1;
    }
    let agree: T = cast(tol.quadratic_multiplicity);
    let mut count = 1;
    let mut a = a.to_vec();
    let mut n = n;
    let mut m = n - 1;

    while m > 1 {
        let d = derivative(&a, n);
        m = trim_degree(&d, m, tol);
        let candidate = match m {
            0 => (T::zero(), T::zero()),
            1 => (d[1], T::zero()),
            2 => (d[1], d[2]),
            _ => {
                let mut rs = *quad;
                find_quadratic(&d, m, &mut rs, tol);
                rs
            }
        };
        let diff = (quad.0 - candidate.0).abs() + (quad.1 - candidate.1).abs();
        if diff > agree {
            return count;
        }
        *quad = candidate;
        count += 1;
        a = d;
        n = m;
        m = n.saturating_sub(1);
    }
    count
}

// ============================================================================
// Factorization
// ============================================================================

/// Factor descending coefficients with the default tolerances.
pub fn factors<T: Float>(coefficients: &[T]) -> Vec<RootFactor<T>> {
    factors_with(coefficients, &Tolerances::default())
}

/// Factor descending coefficients into linear and quadratic factors.
///
/// Returns an empty list if the leading coefficient is zero or a quadratic
/// search fails to converge.
pub fn factors_with<T: Float>(coefficients: &[T], tol: &Tolerances) -> Vec<RootFactor<T>> {
    let Some(&lead) = coefficients.first() else {
        return Vec::new();
    };
    if coefficients.len() < 2 || lead == T::zero() {
        return Vec::new();
    }

    let a: Vec<T> = coefficients.iter().map(|c| *c / lead).collect();
    let mut m = trim_degree(&a, a.len() - 1, tol);
    let mut z = a[..=m].to_vec();
    let mut found = Vec::new();

    while m > 0 {
        if m < 5 {
            match closed_form::solve_with(&Polynomial::new_with(&z, tol), tol) {
                Ok(cf) => found.extend(cf.factors),
                Err(e) => warn!(error = %e, "closed-form factorization failed"),
            }
            break;
        }

        let mut root: T = cast(PI / 10.0);
        let linear = find_linear(&z, m, &mut root, tol);
        if linear.err < cast(tol.linear_accept) {
            let mult = linear_multiplicity(&z, m, &mut root, tol);
            trace!(degree = m, multiplicity = mult, "linear factor");
            found.push(RootFactor::linear(root).with_multiplicity(mult));
            for _ in 0..mult.min(m) {
                z = deflate_linear(&z, m, root);
                m -= 1;
            }
            continue;
        }

        let mut quad: (T, T) = (cast(-E * 0.1), cast(PI * 0.1));
        let quadratic = find_quadratic(&z, m, &mut quad, tol);
        if quadratic.err < cast(tol.quadratic_accept) {
            let mult = quadratic_multiplicity(&z, m, &mut quad, tol);
            trace!(degree = m, multiplicity = mult, "quadratic factor");
            found.push(RootFactor::quadratic(quad.0, quad.1).with_multiplicity(mult));
            for _ in 0..mult.min(m / 2) {
                z = deflate_quadratic(&z, m, quad);
                m -= 2;
            }
        } else {
            warn!(degree = m, "no convergence");
            return Vec::new();
        }
    }

    found
}

/// Distinct real roots with multiplicities, ascending.
///
/// Trailing zero coefficients contribute a root at zero; complex pairs are
/// dropped.
pub fn real_roots_with_multiplicities<T: Float>(coefficients: &[T]) -> Vec<RootFactor<T>> {
    real_roots_with_multiplicities_with(coefficients, &Tolerances::default())
}

/// As [`real_roots_with_multiplicities`] with explicit tolerances.
pub fn real_roots_with_multiplicities_with<T: Float>(
    coefficients: &[T],
    tol: &Tolerances,
) -> Vec<RootFactor<T>> {
    let Some(last) = coefficients.iter().rposition(|c| *c != T::zero()) else {
        return Vec::new();
    };
    let n = coefficients.len() - 1;

    let mut out = Vec::new();
    if last < n {
        out.push(RootFactor::linear(T::zero()).with_multiplicity(n - last));
    }

    for f in factors_with(&coefficients[..=last], tol) {
        match f.roots() {
            FactorRoots::Single(_) => out.push(f),
            FactorRoots::Pair(r0, r1) if r0 == r1 => {
                out.push(RootFactor::linear(-r0).with_multiplicity(2 * f.multiplicity()));
            }
            FactorRoots::Pair(r0, r1) => {
                out.push(RootFactor::linear(-r0).with_multiplicity(f.multiplicity()));
                out.push(RootFactor::linear(-r1).with_multiplicity(f.multiplicity()));
            }
            FactorRoots::Complex { .. } => {}
        }
    }

    out.sort_by(|a, b| {
        a.root()
            .partial_cmp(&b.root())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    merge_close_roots(out, cast(tol.double_root))
}

/// Merge neighbouring linear factors whose roots lie within `tol`.
///
/// `factors` must be sorted by root. The first root of each run is kept and
/// the multiplicities of the run are added.
pub fn merge_close_roots<T: Float>(factors: Vec<RootFactor<T>>, tol: T) -> Vec<RootFactor<T>> {
    let mut merged: Vec<RootFactor<T>> = Vec::with_capacity(factors.len());
    for f in factors {
        match merged.last_mut() {
            Some(prev) if (f.root() - prev.root()).abs() <= tol => {
                let m = prev.multiplicity() + f.multiplicity();
                *prev = prev.with_multiplicity(m);
            }
            _ => merged.push(f),
        }
    }
    merged
}

/// Every real root, ascending, repeated by multiplicity.
pub fn real_roots<T: Float>(coefficients: &[T]) -> Vec<T> {
    real_roots_with(coefficients, &Tolerances::default())
}

/// As [`real_roots`] with explicit tolerances.
pub fn real_roots_with<T: Float>(coefficients: &[T], tol: &Tolerances) -> Vec<T> {
    real_roots_with_multiplicities_with(coefficients, tol)
        .iter()
        .flat_map(|f| std::iter::repeat_n(f.root(), f.multiplicity()))
        .collect()
}
