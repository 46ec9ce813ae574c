//! Irreducible real factors of a polynomial.
//!
//! ## Purpose
//!
//! A `RootFactor` is a monic linear factor `x + c` or a monic quadratic
//! factor `x^2 + b x + c`, together with its roots and its multiplicity.
//! Root finders return lists of these.
//!
//! ## Invariants
//!
//! * Factors are immutable; multiplicity is fixed at construction.
//! * A quadratic factor holds either two sorted real roots or one complex
//!   conjugate pair `re +- i im` with `im > 0`.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::cast;
use crate::math::polynomial::Polynomial;

/// Roots of a factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FactorRoots<T> {
    /// One real root.
    Single(T),
    /// Two real roots, ascending.
    Pair(T, T),
    /// A complex conjugate pair.
    Complex {
        /// Real part.
        re: T,
        /// Imaginary magnitude.
        im: T,
    },
}

/// A monic linear or quadratic factor with multiplicity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootFactor<T> {
    b: T,
    c: T,
    degree: usize,
    roots: FactorRoots<T>,
    multiplicity: usize,
}

impl<T: Float> RootFactor<T> {
    /// The factor `x + c`, root `-c`.
    pub fn linear(c: T) -> Self {
        Self {
            b: c,
            c: T::zero(),
            degree: 1,
            roots: FactorRoots::Single(-c),
            multiplicity: 1,
        }
    }

    /// The factor `x^2 + b x + c`.
    pub fn quadratic(b: T, c: T) -> Self {
        let half = -cast::<T>(0.5) * b;
        let d2 = half * half - c;
        let roots = if d2 >= T::zero() {
            let d = d2.sqrt();
            FactorRoots::Pair(half - d, half + d)
        } else {
            FactorRoots::Complex {
                re: half,
                im: (-d2).sqrt(),
            }
        };
        Self {
            b,
            c,
            degree: 2,
            roots,
            multiplicity: 1,
        }
    }

    /// The same factor with a different multiplicity.
    pub fn with_multiplicity(self, multiplicity: usize) -> Self {
        Self {
            multiplicity: multiplicity.max(1),
            ..self
        }
    }

    /// 1 or 2.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of times the factor divides the polynomial.
    pub fn multiplicity(&self) -> usize {
        self.multiplicity
    }

    /// True unless the roots are a complex pair.
    pub fn is_real(&self) -> bool {
        !matches!(self.roots, FactorRoots::Complex { .. })
    }

    /// The roots.
    pub fn roots(&self) -> FactorRoots<T> {
        self.roots
    }

    /// Real roots, ascending; empty for a complex pair.
    pub fn real_roots(&self) -> Vec<T> {
        match self.roots {
            FactorRoots::Single(r) => vec![r],
            FactorRoots::Pair(a, b) => vec![a, b],
            FactorRoots::Complex { .. } => Vec::new(),
        }
    }

    /// The (first) real root, or the real part of a complex pair.
    pub fn root(&self) -> T {
        match self.roots {
            FactorRoots::Single(r) | FactorRoots::Pair(r, _) => r,
            FactorRoots::Complex { re, .. } => re,
        }
    }

    /// Descending monic coefficients.
    pub fn coefficients(&self) -> Vec<T> {
        if self.degree == 1 {
            vec![T::one(), self.b]
        } else {
            vec![T::one(), self.b, self.c]
        }
    }

    /// The factor itself as a polynomial.
    pub fn polynomial(&self) -> Polynomial<T> {
        Polynomial::new(&self.coefficients())
    }

    /// The factor raised to its multiplicity.
    pub fn expanded(&self) -> Polynomial<T> {
        let base = self.polynomial();
        (1..self.multiplicity).fold(base.clone(), |acc, _| acc.product(&base))
    }

    /// The factor whose roots are those of `self` shifted by `h`.
    pub fn translate(&self, h: T) -> Self {
        let two = cast::<T>(2.0);
        let moved = match self.roots {
            FactorRoots::Single(r) => Self::linear(-h - r),
            FactorRoots::Pair(r0, r1) => Self::quadratic(self.b - two * h, (h + r0) * (h + r1)),
            FactorRoots::Complex { re, im } => {
                Self::quadratic(self.b - two * h, (re + h) * (re + h) + im * im)
            }
        };
        moved.with_multiplicity(self.multiplicity)
    }
}
