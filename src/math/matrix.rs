//! Dense row-major matrices.
//!
//! ## Purpose
//!
//! A small dense matrix type used as the least-squares engine of the model
//! builders: transpose, products, sums, an RMS norm, submatrices, and a
//! singular value decomposition computed on first use and cached.
//!
//! ## Design notes
//!
//! * **Cached SVD**: The decomposition is produced by the pure
//!   [`decompose`](crate::math::svd::decompose) and stored in a `OnceCell`;
//!   the matrix never shares mutable state with it.
//! * **Ragged input**: `from_rows` pads short rows with zeros.
//!
//! ## Invariants
//!
//! * `values.len() == rows * cols`.

// External dependencies
use num_traits::Float;
use std::cell::OnceCell;
use std::fmt;

// Internal dependencies
use crate::math::svd::{Svd, decompose};
use crate::primitives::errors::{Result, ShapeError};
use crate::primitives::features::trim_double;

/// A dense matrix stored row by row.
#[derive(Clone)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    values: Vec<T>,
    svd: OnceCell<Box<Svd<T>>>,
}

impl<T: Float + fmt::Debug> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("values", &self.values)
            .finish()
    }
}

impl<T: Float> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows by {} columns", self.rows, self.cols)?;
        for i in 0..self.rows {
            for j in 0..self.cols {
                let v = trim_double(self.get(i, j).to_f64().unwrap_or(f64::NAN), 6);
                if j % 5 == 0 {
                    write!(f, "\n{v}")?;
                } else {
                    write!(f, " {v}")?;
                }
            }
        }
        Ok(())
    }
}

impl<T: Float> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.values == other.values
    }
}

impl<T: Float> Matrix<T> {
    /// A `rows x cols` matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_vec(rows, cols, vec![T::zero(); rows * cols])
    }

    /// The `n x n` identity.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.values[i * n + i] = T::one();
        }
        m
    }

    /// A square matrix with `d` on the diagonal.
    pub fn diagonal(d: &[T]) -> Self {
        let n = d.len();
        let mut m = Self::zeros(n, n);
        for (i, v) in d.iter().enumerate() {
            m.values[i * n + i] = *v;
        }
        m
    }

    /// Build from rows, padding short rows with zeros.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Self {
        let cols = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
        let mut values = Vec::with_capacity(rows.len() * cols);
        for r in rows {
            let r = r.as_ref();
            values.extend_from_slice(r);
            values.extend(std::iter::repeat_n(T::zero(), cols - r.len()));
        }
        Self::from_vec(rows.len(), cols, values)
    }

    fn from_vec(rows: usize, cols: usize, values: Vec<T>) -> Self {
        Self {
            rows,
            cols,
            values,
            svd: OnceCell::new(),
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Element at `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.values[i * self.cols + j]
    }

    /// One row as a slice.
    pub fn row(&self, i: usize) -> &[T] {
        &self.values[i * self.cols..(i + 1) * self.cols]
    }

    /// One column, copied.
    pub fn column(&self, j: usize) -> Vec<T> {
        (0..self.rows).map(|i| self.get(i, j)).collect()
    }

    // ========================================================================
    // Algebra
    // ========================================================================

    /// The leading `rows x cols` block.
    pub fn submatrix(&self, cols: usize, rows: usize) -> Result<Self> {
        if cols > self.cols || rows > self.rows {
            return Err(ShapeError::SubmatrixOutOfRange {
                rows,
                cols,
                max_rows: self.rows,
                max_cols: self.cols,
            });
        }
        let mut values = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            values.extend_from_slice(&self.row(i)[..cols]);
        }
        Ok(Self::from_vec(rows, cols, values))
    }

    /// Transpose.
    pub fn transpose(&self) -> Self {
        let mut values = Vec::with_capacity(self.values.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                values.push(self.get(i, j));
            }
        }
        Self::from_vec(self.cols, self.rows, values)
    }

    /// Matrix product `self * right`.
    pub fn product(&self, right: &Self) -> Result<Self> {
        if self.cols != right.rows {
            return Err(ShapeError::DimensionMismatch {
                op: "product",
                left: (self.rows, self.cols),
                right: (right.rows, right.cols),
            });
        }
        let mut out = Self::zeros(self.rows, right.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.get(i, k);
                for j in 0..right.cols {
                    out.values[i * right.cols + j] = out.values[i * right.cols + j] + a * right.get(k, j);
                }
            }
        }
        Ok(out)
    }

    /// Scalar product `f * self`.
    pub fn scale(&self, f: T) -> Self {
        Self::from_vec(
            self.rows,
            self.cols,
            self.values.iter().map(|v| f * *v).collect(),
        )
    }

    /// Elementwise sum.
    pub fn sum(&self, other: &Self) -> Result<Self> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(ShapeError::DimensionMismatch {
                op: "sum",
                left: (self.rows, self.cols),
                right: (other.rows, other.cols),
            });
        }
        Ok(Self::from_vec(
            self.rows,
            self.cols,
            self.values
                .iter()
                .zip(&other.values)
                .map(|(a, b)| *a + *b)
                .collect(),
        ))
    }

    /// Elementwise difference.
    pub fn difference(&self, other: &Self) -> Result<Self> {
        self.sum(&other.scale(-T::one()))
    }

    /// Root-mean-square of the entries; zero for an empty matrix.
    pub fn l2norm(&self) -> T {
        if self.values.is_empty() {
            return T::zero();
        }
        let sq = self.values.iter().fold(T::zero(), |acc, v| acc + *v * *v);
        let n = T::from(self.values.len()).unwrap_or_else(T::one);
        (sq / n).sqrt()
    }

    // ========================================================================
    // Decomposition
    // ========================================================================

    /// Singular value decomposition, computed on first call.
    pub fn svd(&self) -> &Svd<T> {
        self.svd.get_or_init(|| Box::new(decompose(self)))
    }

    /// Left singular vectors (`rows x min(rows, cols)`).
    pub fn left_singular_vectors(&self) -> &Matrix<T> {
        &self.svd().u
    }

    /// Singular values, descending.
    pub fn singular_values(&self) -> &[T] {
        &self.svd().s
    }

    /// Right singular vectors (`cols x min(rows, cols)`).
    pub fn right_singular_vectors(&self) -> &Matrix<T> {
        &self.svd().v
    }

    /// Damped pseudo-inverse.
    ///
    /// With `t = fraction * s_max`, each singular value `s` is inverted as
    /// `s / (s + t)^2`. Returns `None` without singular values or when the
    /// largest is zero.
    pub fn pseudo_inverse(&self, fraction: T) -> Option<Self> {
        let svd = self.svd();
        let s0 = *svd.s.first()?;
        if s0 == T::zero() {
            return None;
        }
        let t = s0 * fraction;
        let inv: Vec<T> = svd
            .s
            .iter()
            .map(|s| {
                let u = *s + t;
                *s / (u * u)
            })
            .collect();

        let mut out = Self::zeros(self.cols, self.rows);
        for i in 0..self.cols {
            for j in 0..self.rows {
                let v = inv
                    .iter()
                    .enumerate()
                    .fold(T::zero(), |acc, (k, s)| acc + *s * svd.v.get(i, k) * svd.u.get(j, k));
                out.values[i * self.rows + j] = v;
            }
        }
        Some(out)
    }
}
