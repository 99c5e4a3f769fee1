// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lindblad dissipator computation.
//!
//! Computes D[J](ρ) = 2 J ρ J† − J†J ρ − ρ J†J for each jump operator.
//! Operands are assumed to be dimension-checked by the caller (see
//! [`LindbladGenerator::check_against`](super::types::LindbladGenerator::check_against)).
//!
//! Ref: Breuer & Petruccione, "The Theory of Open Quantum Systems" (2002), Ch. 3.

use ndarray::Array2;
use num_complex::Complex64;

use super::types::JumpOperator;

/// Dissipator contribution of a single jump operator.
///
/// D[J](ρ) = 2 J ρ J† − J†J ρ − ρ J†J
pub fn dissipator(jump: &JumpOperator, rho: &Array2<Complex64>) -> Array2<Complex64> {
    let j = jump.operator.data();
    let j_dag = jump.adjoint.data();

    // J†J
    let jdj = j_dag.dot(j);
    // J ρ J†
    let j_rho_jdag = j.dot(rho).dot(j_dag);

    let two = Complex64::new(2.0, 0.0);
    &j_rho_jdag * two - jdj.dot(rho) - rho.dot(&jdj)
}

/// Σ_k D[J_k](ρ)
pub fn total_dissipator(jumps: &[JumpOperator], rho: &Array2<Complex64>) -> Array2<Complex64> {
    let mut total = Array2::zeros(rho.raw_dim());
    for jump in jumps {
        total += &dissipator(jump, rho);
    }
    total
}

/// Full Lindblad RHS: dρ/dt = −i[H, ρ] + Σ_k D[J_k](ρ).
pub fn lindblad_rhs(
    hamiltonian: &Array2<Complex64>,
    jumps: &[JumpOperator],
    rho: &Array2<Complex64>,
) -> Array2<Complex64> {
    let minus_i = Complex64::new(0.0, -1.0);

    // −i(Hρ − ρH)
    let commutator = (hamiltonian.dot(rho) - rho.dot(hamiltonian)) * minus_i;

    commutator + total_dissipator(jumps, rho)
}
