// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Matrix exponential via scaling-and-squaring with Padé(13) approximation.
//!
//! Used to build one-step propagators exp(L·Δτ) of a time-independent
//! Liouvillian. Those matrices are d² × d², so the cost is dominated by
//! the dense products here rather than by the Padé solve.
//!
//! Ref: Higham (2005), "The Scaling and Squaring Method for the Matrix
//! Exponential Revisited", SIAM J. Matrix Anal. Appl. 26(4), 1179.

use ndarray::{s, Array2};
use num_complex::Complex64;

use crate::error::{Error, Result};

/// ‖A‖₁ bound below which Padé(13) is accurate to unit roundoff
/// (Higham 2005, Table 2.3).
const THETA_13: f64 = 5.371_920_351_148_152;

/// Padé(13,13) coefficients b_k / b_0.
const PADE_COEFFS: [f64; 14] = [
    1.0,
    0.5,
    0.12,
    1.833_333_333_333_333_4e-2,
    1.992_753_623_188_405_8e-3,
    1.630_434_782_608_696e-4,
    1.035_196_687_401_6e-5,
    5.175_983_437_008_01e-7,
    2.043_151_356_652_5e-8,
    6.306_022_705_717_593e-10,
    1.483_770_048_404_14e-11,
    2.529_153_491_597_966e-13,
    2.810_170_546_219_962_4e-15,
    1.544_049_750_670_309e-17,
];

/// exp(A) for a square complex matrix.
///
/// Returns a shape error for a non-square input and an integration error
/// when the Padé denominator cannot be inverted (which only happens for
/// non-finite input).
pub fn matrix_exp(a: &Array2<Complex64>) -> Result<Array2<Complex64>> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(Error::shape("matrix exponential", n, a.ncols()));
    }
    match n {
        0 => return Ok(Array2::zeros((0, 0))),
        1 => return Ok(Array2::from_elem((1, 1), a[[0, 0]].exp())),
        _ => {}
    }

    if a.iter().any(|z| !(z.re.is_finite() && z.im.is_finite())) {
        return Err(Error::integration(0.0, "matrix exponential of non-finite matrix"));
    }
    let norm = matrix_1_norm(a);

    // Pick s with ‖A / 2^s‖₁ ≤ θ₁₃.
    let squarings = if norm > THETA_13 {
        (norm / THETA_13).log2().ceil() as i32
    } else {
        0
    };
    let scaled = a * re(0.5f64.powi(squarings));

    let mut result = pade13(&scaled)?;
    for _ in 0..squarings {
        result = result.dot(&result);
    }
    Ok(result)
}

/// r₁₃(A) = (V − U)⁻¹ (V + U)
fn pade13(a: &Array2<Complex64>) -> Result<Array2<Complex64>> {
    let b = &PADE_COEFFS;
    let eye = Array2::from_diag_elem(a.nrows(), re(1.0));

    let a2 = a.dot(a);
    let a4 = a2.dot(&a2);
    let a6 = a2.dot(&a4);

    // Odd part: U = A [A6 (b13 A6 + b11 A4 + b9 A2) + b7 A6 + b5 A4 + b3 A2 + b1 I]
    let odd_high = &a6 * re(b[13]) + &a4 * re(b[11]) + &a2 * re(b[9]);
    let odd = odd_high.dot(&a6)
        + &a6 * re(b[7])
        + &a4 * re(b[5])
        + &a2 * re(b[3])
        + &eye * re(b[1]);
    let u = a.dot(&odd);

    // Even part: V = A6 (b12 A6 + b10 A4 + b8 A2) + b6 A6 + b4 A4 + b2 A2 + b0 I
    let even_high = &a6 * re(b[12]) + &a4 * re(b[10]) + &a2 * re(b[8]);
    let v = even_high.dot(&a6)
        + &a6 * re(b[6])
        + &a4 * re(b[4])
        + &a2 * re(b[2])
        + &eye * re(b[0]);

    solve_linear(&v - &u, &v + &u)
}

#[inline]
fn re(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

/// Solve A X = B by Gaussian elimination with partial pivoting.
fn solve_linear(a: Array2<Complex64>, b: Array2<Complex64>) -> Result<Array2<Complex64>> {
    let n = a.nrows();
    let m = b.ncols();

    let mut aug = Array2::zeros((n, n + m));
    aug.slice_mut(s![.., ..n]).assign(&a);
    aug.slice_mut(s![.., n..]).assign(&b);

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| aug[[i, col]].norm().total_cmp(&aug[[j, col]].norm()))
            .unwrap_or(col);

        if pivot_row != col {
            for j in 0..(n + m) {
                aug.swap([col, j], [pivot_row, j]);
            }
        }

        let pivot = aug[[col, col]];
        if pivot.norm().is_nan() || pivot.norm() <= 1e-15 {
            return Err(Error::integration(
                0.0,
                format!("singular Padé denominator at column {}", col),
            ));
        }

        for row in (col + 1)..n {
            let factor = aug[[row, col]] / pivot;
            if factor == Complex64::new(0.0, 0.0) {
                continue;
            }
            for j in col..(n + m) {
                let v = aug[[col, j]];
                aug[[row, j]] -= factor * v;
            }
        }
    }

    let mut x = Array2::<Complex64>::zeros((n, m));
    for row in (0..n).rev() {
        let pivot = aug[[row, row]];
        for j in 0..m {
            let mut acc = aug[[row, n + j]];
            for k in (row + 1)..n {
                acc -= aug[[row, k]] * x[[k, j]];
            }
            x[[row, j]] = acc / pivot;
        }
    }
    Ok(x)
}

/// Maximum absolute column sum.
fn matrix_1_norm(a: &Array2<Complex64>) -> f64 {
    a.columns()
        .into_iter()
        .map(|col| col.iter().map(|z| z.norm()).sum::<f64>())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_matrix_close;
    use std::f64::consts::PI;

    fn eye(n: usize) -> Array2<Complex64> {
        Array2::from_diag_elem(n, re(1.0))
    }

    #[test]
    fn test_expm_zero_is_identity() {
        let result = matrix_exp(&Array2::zeros((4, 4))).unwrap();
        assert_matrix_close(&result, &eye(4), 1e-14);
    }

    #[test]
    fn test_expm_diagonal() {
        let mut a = Array2::zeros((2, 2));
        a[[0, 0]] = re(1.0);
        a[[1, 1]] = Complex64::new(-0.5, 2.0);
        let result = matrix_exp(&a).unwrap();

        let mut expected = Array2::zeros((2, 2));
        expected[[0, 0]] = re(1.0f64.exp());
        expected[[1, 1]] = Complex64::new(-0.5, 2.0).exp();
        assert_matrix_close(&result, &expected, 1e-12);
    }

    #[test]
    fn test_expm_nilpotent() {
        // exp([[0, 1], [0, 0]]) = [[1, 1], [0, 1]]
        let mut a = Array2::zeros((2, 2));
        a[[0, 1]] = re(1.0);
        let mut expected = eye(2);
        expected[[0, 1]] = re(1.0);
        assert_matrix_close(&matrix_exp(&a).unwrap(), &expected, 1e-14);
    }

    #[test]
    fn test_expm_generates_rotation() {
        // exp(−iθσx/2)
        let theta = PI / 3.0;
        let mut a = Array2::zeros((2, 2));
        a[[0, 1]] = Complex64::new(0.0, -theta / 2.0);
        a[[1, 0]] = Complex64::new(0.0, -theta / 2.0);

        let (c, s) = ((theta / 2.0).cos(), (theta / 2.0).sin());
        let mut expected = Array2::zeros((2, 2));
        expected[[0, 0]] = re(c);
        expected[[1, 1]] = re(c);
        expected[[0, 1]] = Complex64::new(0.0, -s);
        expected[[1, 0]] = Complex64::new(0.0, -s);
        assert_matrix_close(&matrix_exp(&a).unwrap(), &expected, 1e-12);
    }

    #[test]
    fn test_expm_semigroup_property() {
        // exp(2A) = exp(A)² for a matrix that needs scaling
        let mut a = Array2::zeros((3, 3));
        a[[0, 1]] = Complex64::new(3.0, 1.0);
        a[[1, 2]] = Complex64::new(-2.0, 0.5);
        a[[2, 0]] = Complex64::new(0.0, 4.0);
        a[[1, 1]] = re(-1.5);

        let once = matrix_exp(&a).unwrap();
        let twice = matrix_exp(&(&a * re(2.0))).unwrap();
        let squared = once.dot(&once);

        let scale = squared.iter().map(|z| z.norm()).fold(0.0, f64::max);
        let diff = (&twice - &squared).iter().map(|z| z.norm()).fold(0.0, f64::max);
        assert!(diff / scale < 1e-10, "relative error {}", diff / scale);
    }

    #[test]
    fn test_expm_large_norm_needs_scaling() {
        let mut a = Array2::zeros((2, 2));
        a[[0, 0]] = re(30.0);
        a[[1, 1]] = re(-30.0);
        let result = matrix_exp(&a).unwrap();
        assert!((result[[0, 0]].re - 30f64.exp()).abs() / 30f64.exp() < 1e-10);
        assert!(result[[1, 1]].re > 0.0 && result[[1, 1]].re < 1e-12);
    }

    #[test]
    fn test_expm_scalar() {
        let a = Array2::from_elem((1, 1), Complex64::new(3.0, 1.0));
        let result = matrix_exp(&a).unwrap();
        assert!((result[[0, 0]] - Complex64::new(3.0, 1.0).exp()).norm() < 1e-12);
    }

    #[test]
    fn test_expm_rejects_non_square() {
        let a = Array2::<Complex64>::zeros((2, 3));
        assert!(matches!(matrix_exp(&a), Err(Error::Shape { .. })));
    }

    #[test]
    fn test_expm_rejects_non_finite() {
        let mut a = Array2::zeros((2, 2));
        a[[0, 1]] = re(f64::NAN);
        assert!(matches!(matrix_exp(&a), Err(Error::Integration { .. })));
    }
}
