//! Singular value decomposition by Golub-Reinsch.
//!
//! ## Purpose
//!
//! `decompose` factors an `m x n` matrix as `U diag(s) V^T` using Householder
//! bidiagonalization followed by implicit-shift QR sweeps.
//!
//! ## Design notes
//!
//! * **Wide matrices**: When `rows < cols` the transpose is decomposed and the
//!   roles of `U` and `V` are swapped back.
//! * **Ordering**: After convergence singular values and their vectors are
//!   bubble-sorted into descending order.
//! * **Iteration cap**: Each singular value gets at most 30 QR sweeps; hitting
//!   the cap is logged and the current estimate is kept.
//!
//! ## Invariants
//!
//! * `s` is non-negative and non-increasing.
//! * `u` is `rows x min(rows, cols)`, `v` is `cols x min(rows, cols)`.

// External dependencies
use num_traits::Float;
use std::fmt;
use tracing::warn;

// Internal dependencies
use crate::math::matrix::Matrix;

/// An owned singular value decomposition.
#[derive(Clone)]
pub struct Svd<T> {
    /// Left singular vectors, one per column.
    pub u: Matrix<T>,
    /// Singular values, descending.
    pub s: Vec<T>,
    /// Right singular vectors, one per column.
    pub v: Matrix<T>,
}

impl<T: Float + fmt::Debug> fmt::Debug for Svd<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Svd")
            .field("u", &self.u)
            .field("s", &self.s)
            .field("v", &self.v)
            .finish()
    }
}

impl<T: Float> PartialEq for Svd<T> {
    fn eq(&self, other: &Self) -> bool {
        self.u == other.u && self.s == other.s && self.v == other.v
    }
}

const MAX_SWEEPS: usize = 30;

fn pythag<T: Float>(a: T, b: T) -> T {
    let (at, bt) = (a.abs(), b.abs());
    if at > bt {
        let ct = bt / at;
        at * (T::one() + ct * ct).sqrt()
    } else if bt != T::zero() {
        let ct = at / bt;
        bt * (T::one() + ct * ct).sqrt()
    } else {
        T::zero()
    }
}

fn sign<T: Float>(a: T, b: T) -> T {
    if b >= T::zero() { a.abs() } else { -a.abs() }
}

/// Decompose `m` into `U diag(s) V^T`.
pub fn decompose<T: Float>(m: &Matrix<T>) -> Svd<T> {
    let (rows, cols) = (m.rows(), m.cols());
    let transpose = rows < cols;
    let nr = rows.max(cols);
    let nc = rows.min(cols);

    let mut a = vec![vec![T::zero(); nc]; nr];
    for i in 0..rows {
        for j in 0..cols {
            if transpose {
                a[j][i] = m.get(i, j);
            } else {
                a[i][j] = m.get(i, j);
            }
        }
    }
    let mut w = vec![T::zero(); nc];
    let mut v = vec![vec![T::zero(); nc]; nc];
    let mut rv1 = vec![T::zero(); nc];

    bidiagonalize(&mut a, &mut w, &mut rv1, nr, nc);
    let anorm = (0..nc).fold(T::zero(), |acc, i| acc.max(w[i].abs() + rv1[i].abs()));
    accumulate_right(&a, &mut v, &rv1, nc);
    accumulate_left(&mut a, &w, nr, nc);
    diagonalize(&mut a, &mut w, &mut v, &mut rv1, anorm, nr, nc);
    sort_descending(&mut a, &mut w, &mut v, nr, nc);

    let left = Matrix::from_rows(&a);
    let right = Matrix::from_rows(&v);
    let (u, v) = if transpose { (right, left) } else { (left, right) };
    Svd { u, s: w, v }
}

fn bidiagonalize<T: Float>(a: &mut [Vec<T>], w: &mut [T], rv1: &mut [T], nr: usize, nc: usize) {
    let (mut g, mut scale) = (T::zero(), T::zero());

    for i in 0..nc {
        let l = i + 1;
        rv1[i] = scale * g;
        g = T::zero();
        scale = T::zero();
        let mut s = T::zero();

        if i < nr {
            for row in a.iter().take(nr).skip(i) {
                scale = scale + row[i].abs();
            }
            if scale != T::zero() {
                for row in a.iter_mut().take(nr).skip(i) {
                    row[i] = row[i] / scale;
                    s = s + row[i] * row[i];
                }
                let f = a[i][i];
                g = -sign(s.sqrt(), f);
                let h = f * g - s;
                a[i][i] = f - g;
                for j in l..nc {
                    let mut s = T::zero();
                    for row in a.iter().take(nr).skip(i) {
                        s = s + row[i] * row[j];
                    }
                    let f = s / h;
                    for row in a.iter_mut().take(nr).skip(i) {
                        row[j] = row[j] + f * row[i];
                    }
                }
                for row in a.iter_mut().take(nr).skip(i) {
                    row[i] = row[i] * scale;
                }
            }
        }
        w[i] = scale * g;

        g = T::zero();
        scale = T::zero();
        let mut s = T::zero();
        if i < nr && i + 1 != nc {
            for k in l..nc {
                scale = scale + a[i][k].abs();
            }
            if scale != T::zero() {
                for k in l..nc {
                    a[i][k] = a[i][k] / scale;
                    s = s + a[i][k] * a[i][k];
                }
                let f = a[i][l];
                g = -sign(s.sqrt(), f);
                let h = f * g - s;
                a[i][l] = f - g;
                for k in l..nc {
                    rv1[k] = a[i][k] / h;
                }
                for j in l..nr {
                    let mut s = T::zero();
                    for k in l..nc {
                        s = s + a[j][k] * a[i][k];
                    }
                    for k in l..nc {
                        a[j][k] = a[j][k] + s * rv1[k];
                    }
                }
                for k in l..nc {
                    a[i][k] = a[i][k] * scale;
                }
            }
        }
    }
}

fn accumulate_right<T: Float>(a: &[Vec<T>], v: &mut [Vec<T>], rv1: &[T], nc: usize) {
    let mut g = T::zero();
    let mut l = nc;
    for i in (0..nc).rev() {
        if i + 1 < nc {
            if g != T::zero() {
                for j in l..nc {
                    v[j][i] = (a[i][j] / a[i][l]) / g;
                }
                for j in l..nc {
                    let mut s = T::zero();
                    for k in l..nc {
                        s = s + a[i][k] * v[k][j];
                    }
                    for k in l..nc {
                        v[k][j] = v[k][j] + s * v[k][i];
                    }
                }
            }
            for j in l..nc {
                v[i][j] = T::zero();
                v[j][i] = T::zero();
            }
        }
        v[i][i] = T::one();
        g = rv1[i];
        l = i;
    }
}

fn accumulate_left<T: Float>(a: &mut [Vec<T>], w: &[T], nr: usize, nc: usize) {
    for i in (0..nc).rev() {
        let l = i + 1;
        let mut g = w[i];
        for j in l..nc {
            a[i][j] = T::zero();
        }
        if g != T::zero() {
            g = T::one() / g;
            for j in l..nc {
                let mut s = T::zero();
                for k in l..nr {
                    s = s + a[k][i] * a[k][j];
                }
                let f = (s / a[i][i]) * g;
                for k in i..nr {
                    a[k][j] = a[k][j] + f * a[k][i];
                }
            }
            for row in a.iter_mut().take(nr).skip(i) {
                row[i] = row[i] * g;
            }
        } else {
            for row in a.iter_mut().take(nr).skip(i) {
                row[i] = T::zero();
            }
        }
        a[i][i] = a[i][i] + T::one();
    }
}

#[allow(clippy::too_many_arguments)]
fn diagonalize<T: Float>(
    a: &mut [Vec<T>],
    w: &mut [T],
    v: &mut [Vec<T>],
    rv1: &mut [T],
    anorm: T,
    nr: usize,
    nc: usize,
) {
    let two = T::one() + T::one();

    for k in (0..nc).rev() {
        for its in 1..=MAX_SWEEPS {
            // Find the split point l; rv1[0] is always zero.
            let mut l = k;
            let mut cancel = true;
            loop {
                if rv1[l].abs() + anorm == anorm {
                    cancel = false;
                    break;
                }
                if l == 0 || w[l - 1].abs() + anorm == anorm {
                    break;
                }
                l -= 1;
            }

            if cancel && l > 0 {
                let nm = l - 1;
                let (mut c, mut s) = (T::zero(), T::one());
                for i in l..=k {
                    let f = s * rv1[i];
                    if f.abs() + anorm != anorm {
                        let g = w[i];
                        let h = pythag(f, g);
                        w[i] = h;
                        let h = T::one() / h;
                        c = g * h;
                        s = -f * h;
                        for row in a.iter_mut().take(nr) {
                            let y = row[nm];
                            let z = row[i];
                            row[nm] = y * c + z * s;
                            row[i] = z * c - y * s;
                        }
                    }
                }
            }

            let z = w[k];
            if l == k {
                if z < T::zero() {
                    w[k] = -z;
                    for row in v.iter_mut().take(nc) {
                        row[k] = -row[k];
                    }
                }
                break;
            }
            if its == MAX_SWEEPS {
                warn!(index = k, "singular values did not converge after 30 iterations");
            }

            let mut x = w[l];
            let nm = k - 1;
            let mut y = w[nm];
            let mut g = rv1[nm];
            let mut h = rv1[k];
            let mut f = ((y - z) * (y + z) + (g - h) * (g + h)) / (two * h * y);
            g = pythag(f, T::one());
            f = ((x - z) * (x + z) + h * ((y / (f + sign(g, f))) - h)) / x;
            let (mut c, mut s) = (T::one(), T::one());

            for j in l..=nm {
                let i = j + 1;
                g = rv1[i];
                y = w[i];
                h = s * g;
                g = c * g;
                let mut z = pythag(f, h);
                rv1[j] = z;
                c = f / z;
                s = h / z;
                f = x * c + g * s;
                g = g * c - x * s;
                h = y * s;
                y = y * c;
                for row in v.iter_mut().take(nc) {
                    let xv = row[j];
                    let zv = row[i];
                    row[j] = xv * c + zv * s;
                    row[i] = zv * c - xv * s;
                }
                z = pythag(f, h);
                w[j] = z;
                if z != T::zero() {
                    z = T::one() / z;
                    c = f * z;
                    s = h * z;
                }
                f = c * g + s * y;
                x = c * y - s * g;
                for row in a.iter_mut().take(nr) {
                    let yv = row[j];
                    let zv = row[i];
                    row[j] = yv * c + zv * s;
                    row[i] = zv * c - yv * s;
                }
            }
            rv1[l] = T::zero();
            rv1[k] = f;
            w[k] = x;
        }
    }
}

fn sort_descending<T: Float>(
    a: &mut [Vec<T>],
    w: &mut [T],
    v: &mut [Vec<T>],
    nr: usize,
    nc: usize,
) {
    for i in 1..nc {
        for j in (i..nc).rev() {
            if w[j - 1].abs() < w[j].abs() {
                w.swap(j - 1, j);
                for row in v.iter_mut().take(nc) {
                    row.swap(j - 1, j);
                }
                for row in a.iter_mut().take(nr) {
                    row.swap(j - 1, j);
                }
            }
        }
    }
}
