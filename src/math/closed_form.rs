//! Closed-form roots of polynomials of degree 1 to 4.
//!
//! ## Purpose
//!
//! Factor a polynomial of degree 1 to 4 into real linear and real quadratic
//! factors using the classical formulas, then group repeated real roots and
//! report how well the factors multiply back to the input.
//!
//! ## Design notes
//!
//! * **Cubic**: Depressed by `x = y - c1/3`. Branches on a discriminant:
//!   triple root, simple plus double root, one real root plus a complex pair
//!   (Cardano), or three distinct real roots (trigonometric form).
//! * **Quartic**: Depressed by `x = y - c1/4`. A vanishing constant term
//!   reduces to a cubic; a vanishing resolvent constant gives a biquadratic;
//!   otherwise the largest root of the resolvent cubic splits the quartic
//!   into two quadratics.
//! * **Verification**: The product of the factors is compared against the
//!   monic input; the summed absolute difference is a diagnostic only.
//!
//! ## Invariants
//!
//! * Real factors come first, ascending by root; complex pairs follow.
//! * Real roots closer than `double_root` are merged into one factor whose
//!   multiplicity is the size of the group.

// External dependencies
use num_traits::Float;
use std::f64::consts::PI;

// Internal dependencies
use crate::math::cast;
use crate::math::factor::{FactorRoots, RootFactor};
use crate::math::polynomial::Polynomial;
use crate::primitives::errors::{Result, ShapeError};
use crate::primitives::tolerances::Tolerances;

/// Factors of a low-degree polynomial.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedForm<T> {
    /// Grouped factors: reals ascending, then complex pairs.
    pub factors: Vec<RootFactor<T>>,
    /// Every real root, ascending, repeated by multiplicity.
    pub reals: Vec<T>,
    /// Summed absolute coefficient error of the reconstruction.
    pub error: T,
}

/// Factor `p` with the default tolerances.
pub fn solve<T: Float>(p: &Polynomial<T>) -> Result<ClosedForm<T>> {
    solve_with(p, &Tolerances::default())
}

/// Factor `p` (degree 1 to 4).
pub fn solve_with<T: Float>(p: &Polynomial<T>, tol: &Tolerances) -> Result<ClosedForm<T>> {
    let degree = p.degree();
    if !(1..=4).contains(&degree) {
        return Err(ShapeError::UnsupportedDegree { degree });
    }

    let lead = p.coefficients()[0];
    let monic: Vec<T> = p.coefficients().iter().map(|c| *c / lead).collect();

    let raw = match degree {
        1 => vec![RootFactor::linear(monic[1])],
        2 => vec![RootFactor::quadratic(monic[1], monic[2])],
        3 => cubic(&monic, tol)?,
        _ => quartic(&monic, tol)?,
    };

    let (factors, reals) = collect_roots(&raw, cast(tol.double_root));

    let product = factors
        .iter()
        .fold(Polynomial::new(&[T::one()]), |acc, f| acc.product(&f.expanded()));
    let error = product
        .coefficients()
        .iter()
        .zip(&monic)
        .fold(T::zero(), |acc, (a, b)| acc + (*a - *b).abs());

    Ok(ClosedForm {
        factors,
        reals,
        error,
    })
}

fn cbrt<T: Float>(x: T) -> T {
    if x >= T::zero() {
        x.cbrt()
    } else {
        -(-x).cbrt()
    }
}

// ============================================================================
// Cubic
// ============================================================================

fn cubic<T: Float>(c: &[T], tol: &Tolerances) -> Result<Vec<RootFactor<T>>> {
    let eps: T = cast(tol.closed_form_epsilon);
    let (two, three, four, half) = (cast::<T>(2.0), cast::<T>(3.0), cast::<T>(4.0), cast::<T>(0.5));
    let third = T::one() / three;

    let h = third * c[1];
    let a = c[2] + three * h * h - two * c[1] * h;
    let b = h * h * h - h * h * c[1] + h * c[2] - c[3];
    let c1 = third * a;
    let cc = -c1 * c1 * c1;
    let d2 = b * b - four * cc;
    let d3 = b * b + (four * cc).abs();

    if d3 <= eps {
        return Ok(vec![RootFactor::linear(h).with_multiplicity(3)]);
    }

    if d2.abs() <= eps * d3 {
        let r = cbrt(four * b);
        return Ok(vec![
            RootFactor::linear(h - r),
            RootFactor::linear(h + half * r).with_multiplicity(2),
        ]);
    }

    if d2 > T::zero() {
        let d = d2.sqrt();
        let t3 = half * (d - b);
        let s3 = half * (d + b);
        let r = cbrt(s3) - cbrt(t3) - h;
        let (q, _) = Polynomial::new_with(c, tol).quotient(&Polynomial::new_with(&[T::one(), -r], tol))?;
        let qc = q.coefficients();
        let rest = match qc.len() {
            3 => RootFactor::quadratic(qc[1] / qc[0], qc[2] / qc[0]),
            _ => RootFactor::quadratic(T::zero(), T::zero()),
        };
        return Ok(vec![RootFactor::linear(-r), rest]);
    }

    let k = two * (-c1).sqrt();
    let theta = third * (four * b / (k * k * k)).max(-T::one()).min(T::one()).acos();
    Ok((0..3)
        .map(|i| {
            let shift: T = cast(2.0 * PI * i as f64 / 3.0);
            RootFactor::linear(h - k * (theta + shift).cos())
        })
        .collect())
}

// ============================================================================
// Quartic
// ============================================================================

fn quartic<T: Float>(c: &[T], tol: &Tolerances) -> Result<Vec<RootFactor<T>>> {
    let eps: T = cast(tol.closed_form_epsilon);
    let (two, three, four, six, half) = (
        cast::<T>(2.0),
        cast::<T>(3.0),
        cast::<T>(4.0),
        cast::<T>(6.0),
        cast::<T>(0.5),
    );

    let h = c[1] / four;
    let (h2, h3) = (h * h, h * h * h);
    let h4 = h2 * h2;
    let e = c[2] + six * h2 - three * c[1] * h;
    let f = c[3] - four * h3 + three * c[1] * h2 - two * c[2] * h;
    let g = c[4] + h4 - c[1] * h3 + c[2] * h2 - c[3] * h;

    if g.abs() <= eps {
        let depressed = Polynomial::new_with(&[T::one(), T::zero(), e, f], tol);
        let inner = solve_with(&depressed, tol)?;
        let mut out: Vec<RootFactor<T>> =
            inner.factors.iter().map(|r| r.translate(-h)).collect();
        out.push(RootFactor::linear(h));
        return Ok(out);
    }

    let resolvent = [T::one(), two * e, e * e - four * g, -f * f];
    if resolvent[3].abs() <= eps * eps {
        if resolvent[2].abs() <= eps {
            return Ok(vec![
                RootFactor::quadratic(T::zero(), half * e)
                    .translate(-h)
                    .with_multiplicity(2),
            ]);
        }
        if resolvent[2] >= T::zero() {
            let s = resolvent[2].sqrt();
            return Ok(vec![
                RootFactor::quadratic(T::zero(), half * (e - s)).translate(-h),
                RootFactor::quadratic(T::zero(), half * (e + s)).translate(-h),
            ]);
        }
    }

    let inner = solve_with(&Polynomial::new_with(&resolvent, tol), tol)?;
    let k2 = inner.reals.last().copied().unwrap_or_else(T::zero);
    if k2 < T::zero() {
        return Err(ShapeError::NegativeResolvent(k2.to_f64().unwrap_or(f64::NAN)));
    }
    let k = k2.sqrt();
    let j = half * (e + k2 - f / k);
    Ok(vec![
        RootFactor::quadratic(k, j).translate(-h),
        RootFactor::quadratic(-k, g / j).translate(-h),
    ])
}

// ============================================================================
// Root Collection
// ============================================================================

fn real_factors<T: Float>(r: &RootFactor<T>, tol: T) -> Vec<T> {
    match r.roots() {
        FactorRoots::Single(x) => vec![x; r.multiplicity()],
        FactorRoots::Pair(a, b) => {
            let mut v = vec![a; r.multiplicity()];
            v.extend(std::iter::repeat_n(b, r.multiplicity()));
            v
        }
        FactorRoots::Complex { re, im } if im.abs() < tol => vec![re; 2 * r.multiplicity()],
        FactorRoots::Complex { .. } => Vec::new(),
    }
}

/// Group near-equal real roots and merge a doubled complex pair.
pub fn collect_roots<T: Float>(raw: &[RootFactor<T>], tol: T) -> (Vec<RootFactor<T>>, Vec<T>) {
    let mut reals = Vec::new();
    let mut complex = Vec::new();
    for r in raw {
        let rs = real_factors(r, tol);
        if rs.is_empty() {
            complex.push(*r);
        } else {
            reals.extend(rs);
        }
    }
    reals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut factors = Vec::new();
    let mut last = 0;
    for i in 1..=reals.len() {
        if i == reals.len() || reals[i] > reals[i - 1] + tol {
            if i > last {
                let group = &reals[last..i];
                let n = T::from(group.len()).unwrap_or_else(T::one);
                let avg = group.iter().fold(T::zero(), |acc, v| acc + *v) / n;
                factors.push(RootFactor::linear(-avg).with_multiplicity(group.len()));
            }
            last = i;
        }
    }

    if let [a, b] = complex.as_slice() {
        if let (FactorRoots::Complex { re: r0, im: i0 }, FactorRoots::Complex { re: r1, im: i1 }) =
            (a.roots(), b.roots())
        {
            let (dx, dy) = (r0 - r1, i0 - i1);
            if (dx * dx + dy * dy).sqrt() < tol {
                let half = cast::<T>(0.5);
                let re = half * (r0 + r1);
                let im = half * (i0 + i1);
                let merged = RootFactor::quadratic(-cast::<T>(2.0) * re, re * re + im * im)
                    .with_multiplicity(a.multiplicity() + b.multiplicity());
                complex = vec![merged];
            }
        }
    }

    factors.extend(complex);
    (factors, reals)
}
