#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use shapes_rs::internals::math::matrix::Matrix;
use shapes_rs::internals::primitives::errors::ShapeError;

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix<f64> {
    let dist = Normal::new(0.0, 2.0).unwrap();
    let data: Vec<Vec<f64>> = (0..rows)
        .map(|_| (0..cols).map(|_| dist.sample(rng)).collect())
        .collect();
    Matrix::from_rows(&data)
}

fn reconstruct(m: &Matrix<f64>) -> Matrix<f64> {
    let u = m.left_singular_vectors();
    let s = Matrix::diagonal(m.singular_values());
    let v = m.right_singular_vectors();
    u.product(&s).unwrap().product(&v.transpose()).unwrap()
}

fn assert_close(a: &Matrix<f64>, b: &Matrix<f64>, eps: f64) {
    assert_eq!((a.rows(), a.cols()), (b.rows(), b.cols()));
    for i in 0..a.rows() {
        for j in 0..a.cols() {
            assert_relative_eq!(a.get(i, j), b.get(i, j), epsilon = eps);
        }
    }
}

#[test]
fn test_svd_reconstructs_tall_matrix() {
    let mut rng = StdRng::seed_from_u64(11);
    let m = random_matrix(&mut rng, 600, 12);

    assert_eq!(m.left_singular_vectors().rows(), 600);
    assert_eq!(m.left_singular_vectors().cols(), 12);
    assert_eq!(m.right_singular_vectors().rows(), 12);
    assert_eq!(m.singular_values().len(), 12);

    assert_close(&reconstruct(&m), &m, 1e-9);
}

#[test]
fn test_svd_reconstructs_wide_matrix() {
    let mut rng = StdRng::seed_from_u64(12);
    let m = random_matrix(&mut rng, 5, 8);

    assert_eq!(m.left_singular_vectors().cols(), 5);
    assert_eq!(m.right_singular_vectors().rows(), 8);
    assert_close(&reconstruct(&m), &m, 1e-9);
}

#[test]
fn test_singular_values_sorted_non_negative() {
    let mut rng = StdRng::seed_from_u64(13);
    for (rows, cols) in [(30, 6), (6, 6), (4, 9)] {
        let m = random_matrix(&mut rng, rows, cols);
        let s = m.singular_values();
        assert!(s.iter().all(|v| *v >= 0.0));
        assert!(s.windows(2).all(|w| w[0] >= w[1]), "{s:?}");
    }
}

#[test]
fn test_right_singular_vectors_orthonormal() {
    let mut rng = StdRng::seed_from_u64(14);
    let m = random_matrix(&mut rng, 40, 7);
    let v = m.right_singular_vectors();
    let vtv = v.transpose().product(v).unwrap();
    assert_close(&vtv, &Matrix::identity(7), 1e-10);
}

#[test]
fn test_rank_deficient_matrix() {
    // third column is the sum of the first two
    let m = Matrix::from_rows(&[
        [1.0, 2.0, 3.0],
        [4.0, 5.0, 9.0],
        [7.0, 8.0, 15.0],
        [1.0, 0.0, 1.0],
    ]);
    let s = m.singular_values();
    assert!(s[2] < 1e-10 * s[0]);
    assert_close(&reconstruct(&m), &m, 1e-9);
}

#[test]
fn test_pseudo_inverse_of_invertible() {
    let m = Matrix::from_rows(&[[4.0, 1.0], [2.0, 3.0]]);
    let inv = m.pseudo_inverse(0.0).unwrap();
    assert_close(&inv.product(&m).unwrap(), &Matrix::identity(2), 1e-12);

    assert!(Matrix::<f64>::zeros(2, 2).pseudo_inverse(0.0).is_none());
}

#[test]
fn test_algebra_shapes() {
    let a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    let b = Matrix::from_rows(&[[1.0, 1.0, 1.0], [1.0, 1.0, 1.0]]);

    assert_eq!(
        a.product(&b).unwrap_err(),
        ShapeError::DimensionMismatch {
            op: "product",
            left: (2, 3),
            right: (2, 3),
        }
    );
    assert_eq!(a.sum(&b).unwrap().row(1), &[5.0, 6.0, 7.0]);
    assert_eq!(a.difference(&b).unwrap().row(0), &[0.0, 1.0, 2.0]);
    assert_eq!(a.transpose().column(1), vec![4.0, 5.0, 6.0]);

    let sub = a.submatrix(2, 1).unwrap();
    assert_eq!(sub, Matrix::from_rows(&[[1.0, 2.0]]));
    assert!(matches!(
        a.submatrix(4, 1),
        Err(ShapeError::SubmatrixOutOfRange { .. })
    ));

    // rms of 1..=6
    assert_relative_eq!(a.l2norm(), (91.0_f64 / 6.0).sqrt(), epsilon = 1e-12);
}

#[test]
fn test_ragged_rows_are_padded() {
    let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0]]);
    assert_eq!(m.cols(), 3);
    assert_eq!(m.row(1), &[4.0, 0.0, 0.0]);
}

#[test]
fn test_singular_values_match_nalgebra() {
    let mut rng = StdRng::seed_from_u64(15);
    let m = random_matrix(&mut rng, 80, 9);

    let flat: Vec<f64> = (0..m.rows()).flat_map(|i| m.row(i).to_vec()).collect();
    let reference = nalgebra::DMatrix::from_row_slice(80, 9, &flat).singular_values();
    let mut expected: Vec<f64> = reference.iter().copied().collect();
    expected.sort_by(|a, b| b.total_cmp(a));

    for (s, e) in m.singular_values().iter().zip(&expected) {
        assert_relative_eq!(*s, *e, epsilon = 1e-9, max_relative = 1e-10);
    }
}

#[test]
fn test_decomposition_compares_and_prints() {
    let m = Matrix::from_rows(&[[3.0, 1.0], [1.0, 3.0], [0.0, 2.0]]);
    let copy = m.clone();
    assert_eq!(m.svd(), copy.svd());
    assert!(format!("{:?}", m.svd()).starts_with("Svd"));

    let other = Matrix::from_rows(&[[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]);
    assert_ne!(m.svd(), other.svd());
}
