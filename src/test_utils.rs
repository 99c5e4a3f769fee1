// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test utilities.

use ndarray::Array2;
use num_complex::Complex64;

/// Element-wise |a − b| < tol.
pub fn assert_matrix_close(a: &Array2<Complex64>, b: &Array2<Complex64>, tol: f64) {
    assert_eq!(a.shape(), b.shape());
    for ((i, j), val) in a.indexed_iter() {
        let diff = (val - b[[i, j]]).norm();
        assert!(
            diff < tol,
            "Mismatch at ({}, {}): {:?} vs {:?} (diff={})",
            i,
            j,
            val,
            b[[i, j]],
            diff
        );
    }
}

/// |0⟩⟨0| of a two-level system.
pub fn ground_state() -> Array2<Complex64> {
    let mut m = Array2::zeros((2, 2));
    m[[0, 0]] = Complex64::new(1.0, 0.0);
    m
}

/// |1⟩⟨1| of a two-level system.
pub fn excited_state() -> Array2<Complex64> {
    let mut m = Array2::zeros((2, 2));
    m[[1, 1]] = Complex64::new(1.0, 0.0);
    m
}

/// |+⟩⟨+| with |+⟩ = (|0⟩ + |1⟩)/√2.
pub fn superposition_state() -> Array2<Complex64> {
    Array2::from_elem((2, 2), Complex64::new(0.5, 0.0))
}
