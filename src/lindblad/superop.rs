// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Liouvillian superoperator for time-independent generators.
//!
//! Density matrices are vectorized row-major, `vec(ρ)[i·d + j] = ρ_ij`, so
//!
//!   A ρ B  ↦  (A ⊗ Bᵀ) vec(ρ)
//!
//! and the master equation becomes the linear system d vec(ρ)/dt = L vec(ρ)
//! with
//!
//!   L = −i(H ⊗ I − I ⊗ Hᵀ) + Σ_k [2 J_k ⊗ J_k* − J_k†J_k ⊗ I − I ⊗ (J_k†J_k)ᵀ]

use ndarray::{linalg::kron, Array1, Array2};
use num_complex::Complex64;
use tracing::debug;

use super::expm::matrix_exp;
use super::types::JumpOperator;
use crate::error::{Error, Result};
use crate::operators::Operator;

/// Row-major vectorization of a square matrix.
pub fn vectorize(m: &Array2<Complex64>) -> Array1<Complex64> {
    m.iter().cloned().collect()
}

/// Inverse of [`vectorize`] for a `d × d` matrix.
pub fn unvectorize(v: &Array1<Complex64>, d: usize) -> Array2<Complex64> {
    Array2::from_shape_fn((d, d), |(i, j)| v[i * d + j])
}

/// Dense Liouvillian for a constant Hamiltonian and jump set.
pub fn liouvillian(hamiltonian: &Operator, jumps: &[JumpOperator]) -> Result<Array2<Complex64>> {
    let d = hamiltonian.dim();
    for jump in jumps {
        if jump.operator.dim() != d || jump.adjoint.dim() != d {
            return Err(Error::shape(
                format!("jump '{}' in liouvillian", jump.label),
                d,
                jump.operator.dim().max(jump.adjoint.dim()),
            ));
        }
        if jump.operator.basis() != hamiltonian.basis() {
            return Err(Error::Composition {
                expected: hamiltonian.basis().to_string(),
                actual: jump.operator.basis().to_string(),
            });
        }
    }

    let eye = Array2::from_diag_elem(d, Complex64::new(1.0, 0.0));
    let h = hamiltonian.data();
    let minus_i = Complex64::new(0.0, -1.0);

    let mut l = (kron(h, &eye) - kron(&eye, &h.t())) * minus_i;

    let two = Complex64::new(2.0, 0.0);
    for jump in jumps {
        let j = jump.operator.data();
        let jdj = jump.adjoint.data().dot(j);
        // (J†)ᵀ
        let j_dag_t = jump.adjoint.data().t();

        l = l + kron(j, &j_dag_t) * two - kron(&jdj, &eye) - kron(&eye, &jdj.t());
    }
    Ok(l)
}

/// One-step propagator exp(L·Δτ) on a fixed step.
#[derive(Debug, Clone)]
pub struct LindbladPropagator {
    step: f64,
    dim: usize,
    matrix: Array2<Complex64>,
}

impl LindbladPropagator {
    pub fn new(hamiltonian: &Operator, jumps: &[JumpOperator], step: f64) -> Result<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(Error::Grid(format!("propagator step must be positive, got {}", step)));
        }
        let l = liouvillian(hamiltonian, jumps)?;
        let matrix = matrix_exp(&(l * Complex64::new(step, 0.0)))?;
        debug!(
            dim = hamiltonian.dim(),
            step,
            jumps = jumps.len(),
            "built Liouvillian propagator"
        );
        Ok(Self {
            step,
            dim: hamiltonian.dim(),
            matrix,
        })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Hilbert-space dimension d (the matrix is d² × d²).
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Advance a vectorized operator by one step.
    pub fn apply_vec(&self, v: &Array1<Complex64>) -> Array1<Complex64> {
        self.matrix.dot(v)
    }

    /// Advance a d × d operator by one step.
    pub fn apply(&self, rho: &Array2<Complex64>) -> Array2<Complex64> {
        unvectorize(&self.apply_vec(&vectorize(rho)), self.dim)
    }
}
