//! Dense single-variable polynomials.
//!
//! ## Purpose
//!
//! `Polynomial` is an immutable coefficient vector (highest power first)
//! supporting the arithmetic needed by the root finders and classifiers:
//! sum, product, difference, division with remainder, derivative,
//! evaluation (including at infinity), GCD and real-zero location.
//!
//! ## Design notes
//!
//! * **Relative epsilon**: Each polynomial carries
//!   `epsilon = ratio * mean(|c|) + MIN_POSITIVE`, with `ratio` 1e-8 unless
//!   built through `new_with`. Leading coefficients at or below it are
//!   trimmed at construction, and `quotient` uses it to decide when a
//!   remainder is trivial. Arithmetic results keep the ratio of `self`.
//! * **Trivial polynomial**: All coefficients negligible; degree `-1`.
//!
//! ## Invariants
//!
//! * The leading coefficient of a non-trivial polynomial exceeds `epsilon`.
//! * `degree() == coefficients().len() - 1`, or `-1` when trivial.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::cast;
use crate::primitives::errors::{Result, ShapeError};
use crate::primitives::tolerances::Tolerances;

/// Default relative trimming ratio.
pub const DEFAULT_EPSILON_RATIO: f64 = 1e-8;

// ============================================================================
// Sign Signatures
// ============================================================================

/// Sign just below and just above a real zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignSignature {
    /// Negative on both sides.
    MinusMinus = 0,
    /// Crosses upward.
    MinusPlus = 1,
    /// Crosses downward.
    PlusMinus = 2,
    /// Positive on both sides.
    PlusPlus = 3,
    /// Not determined.
    Undefined = 4,
}

impl SignSignature {
    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => SignSignature::MinusMinus,
            1 => SignSignature::MinusPlus,
            2 => SignSignature::PlusMinus,
            3 => SignSignature::PlusPlus,
            _ => SignSignature::Undefined,
        }
    }
}

/// A located real zero with its sign behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealZero<T> {
    /// Position of the zero.
    pub x: T,
    /// Sign just below and above `x`.
    pub signature: SignSignature,
}

// ============================================================================
// Polynomial
// ============================================================================

/// A polynomial with coefficients in descending powers.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial<T> {
    coefficients: Vec<T>,
    epsilon: T,
    ratio: T,
}

fn epsilon_of<T: Float>(c: &[T], ratio: T) -> T {
    let n = T::from(c.len().max(1)).unwrap_or_else(T::one);
    let sum = c.iter().fold(T::zero(), |acc, v| acc + v.abs());
    ratio * sum / n + T::min_positive_value()
}

impl<T: Float> Polynomial<T> {
    /// Build from descending coefficients, trimming negligible leading terms.
    pub fn new(coefficients: &[T]) -> Self {
        Self::with_ratio(coefficients, cast(DEFAULT_EPSILON_RATIO))
    }

    /// Build with the trimming ratio `tol.polynomial_epsilon`.
    pub fn new_with(coefficients: &[T], tol: &Tolerances) -> Self {
        Self::with_ratio(coefficients, cast(tol.polynomial_epsilon))
    }

    fn with_ratio(coefficients: &[T], ratio: T) -> Self {
        let epsilon = epsilon_of(coefficients, ratio);
        let start = coefficients
            .iter()
            .position(|c| c.abs() > epsilon)
            .unwrap_or(coefficients.len());
        Self {
            coefficients: coefficients[start..].to_vec(),
            epsilon,
            ratio,
        }
    }

    fn derive(&self, coefficients: &[T]) -> Self {
        Self::with_ratio(coefficients, self.ratio)
    }

    /// The zero polynomial.
    pub fn trivial() -> Self {
        Self::new(&[])
    }

    /// Descending coefficients; empty when trivial.
    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    /// Trimming threshold of this polynomial.
    pub fn epsilon(&self) -> T {
        self.epsilon
    }

    /// Degree, or `-1` for the zero polynomial.
    pub fn degree(&self) -> i32 {
        self.coefficients.len() as i32 - 1
    }

    /// True for the zero polynomial.
    pub fn is_trivial(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// True when the degree is below one.
    pub fn is_constant(&self) -> bool {
        self.degree() < 1
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    /// `self + other`.
    pub fn sum(&self, other: &Self) -> Self {
        let (long, short) = if self.coefficients.len() >= other.coefficients.len() {
            (&self.coefficients, &other.coefficients)
        } else {
            (&other.coefficients, &self.coefficients)
        };
        let offset = long.len() - short.len();
        let mut c = long.clone();
        for (i, v) in short.iter().enumerate() {
            c[offset + i] = c[offset + i] + *v;
        }
        self.derive(&c)
    }

    /// `-self`.
    pub fn make_negative(&self) -> Self {
        let c: Vec<T> = self.coefficients.iter().map(|v| -*v).collect();
        self.derive(&c)
    }

    /// `self - other`.
    pub fn difference(&self, other: &Self) -> Self {
        self.sum(&other.make_negative())
    }

    /// `self * other`.
    pub fn product(&self, other: &Self) -> Self {
        if self.is_trivial() || other.is_trivial() {
            return self.derive(&[]);
        }
        let (a, b) = (&self.coefficients, &other.coefficients);
        let mut c = vec![T::zero(); a.len() + b.len() - 1];
        for (i, x) in a.iter().enumerate() {
            for (j, y) in b.iter().enumerate() {
                c[i + j] = c[i + j] + *x * *y;
            }
        }
        self.derive(&c)
    }

    /// Divide by `other`, returning `(quotient, remainder)`.
    pub fn quotient(&self, other: &Self) -> Result<(Self, Self)> {
        if other.is_trivial() {
            return Err(ShapeError::TrivialDivisor);
        }
        if self.degree() < other.degree() {
            return Ok((self.derive(&[]), self.clone()));
        }

        let o = &other.coefficients;
        let n = self.coefficients.len();
        let q_len = n - o.len() + 1;
        let mut qr = self.coefficients.clone();

        for i in 0..q_len {
            qr[i] = qr[i] / o[0];
            for j in 1..o.len() {
                qr[i + j] = qr[i + j] - qr[i] * o[j];
            }
        }

        let quot = self.derive(&qr[..q_len]);
        let eps = quot.epsilon;
        let tail = &qr[q_len..];
        let rem = match tail.iter().position(|v| v.abs() > eps) {
            Some(k) => self.derive(&tail[k..]),
            None => self.derive(&[]),
        };
        Ok((quot, rem))
    }

    /// First derivative.
    pub fn derivative(&self) -> Self {
        let deg = self.degree();
        if deg < 1 {
            return self.derive(&[]);
        }
        let c: Vec<T> = self.coefficients[..deg as usize]
            .iter()
            .enumerate()
            .map(|(i, v)| *v * T::from(deg - i as i32).unwrap_or_else(T::zero))
            .collect();
        self.derive(&c)
    }

    /// Evaluate at `x`, returning a signed infinity for infinite `x`.
    pub fn eval(&self, x: T) -> T {
        if self.is_trivial() {
            return T::zero();
        }
        let c0 = self.coefficients[0];
        if self.is_constant() {
            return c0;
        }
        if x.is_infinite() {
            let lead = c0.signum() * T::infinity();
            let even = self.degree() % 2 == 0;
            return if even || x > T::zero() { lead } else { -lead };
        }
        self.coefficients
            .iter()
            .fold(T::zero(), |acc, c| acc * x + *c)
    }

    /// Greatest common divisor by Euclid's algorithm.
    pub fn gcd(&self, other: &Self) -> Result<Self> {
        if self.is_trivial() {
            return Ok(other.clone());
        }
        if other.is_trivial() {
            return Ok(self.clone());
        }
        let (mut a, mut b) = if self.degree() >= other.degree() {
            (self.clone(), other.clone())
        } else {
            (other.clone(), self.clone())
        };
        loop {
            let (_, r) = a.quotient(&b)?;
            if r.is_trivial() {
                return Ok(b);
            }
            a = b;
            b = r;
        }
    }
}

impl<T: Float> Polynomial<T> {
    /// Real zeros in ascending order with their sign signatures.
    ///
    /// Returns `None` for the zero polynomial and an empty list for nonzero
    /// constants.
    pub fn real_zeros(&self) -> Option<Vec<RealZero<T>>> {
        if self.is_trivial() {
            return None;
        }
        if self.is_constant() {
            return Some(Vec::new());
        }

        let factors = crate::math::iterative::real_roots_with_multiplicities(&self.coefficients);
        let Some(first) = factors.first() else {
            return Some(Vec::new());
        };

        let mut prev: u8 = if self.eval(first.root() - T::one()) > T::zero() {
            2
        } else {
            0
        };
        let zeros = factors
            .iter()
            .map(|f| {
                let next = if f.multiplicity() % 2 == 0 {
                    prev >> 1
                } else {
                    1 - (prev >> 1)
                };
                let sig = SignSignature::from_bits(prev | next);
                prev = next << 1;
                RealZero {
                    x: f.root(),
                    signature: sig,
                }
            })
            .collect();
        Some(zeros)
    }
}
