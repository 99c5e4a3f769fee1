// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Two-time correlations via the quantum regression theorem.
//!
//! For a time-independent generator,
//!
//!   g(τ) = ⟨A(τ) B(0)⟩ = Tr(A · e^{Lτ}[B ρ0])
//!
//! i.e. the operator B ρ0 is evolved under the same master equation as a
//! density matrix (it is neither Hermitian nor unit-trace) and A is read
//! out from it.

use ndarray::Array1;
use num_complex::Complex64;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::grid::TimeGrid;
use crate::lindblad::superop::{vectorize, LindbladPropagator};
use crate::lindblad::{evolve_lindblad_with, Integrator, JumpOperator, LindbladGenerator};
use crate::operators::{Operator, State};

/// Correlation values aligned with a τ grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationSeries {
    pub values: Vec<Complex64>,
}

impl CorrelationSeries {
    pub fn new(values: Vec<Complex64>) -> Self {
        Self { values }
    }

    /// Sample `f(τ)` on every grid point.
    pub fn from_fn(grid: &TimeGrid, f: impl Fn(f64) -> Complex64) -> Self {
        Self {
            values: grid.times().iter().map(|&tau| f(tau)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// g(τ) with the default solver.
pub fn correlation(
    grid: &TimeGrid,
    rho0: &State,
    hamiltonian: &Operator,
    jumps: &[JumpOperator],
    a: &Operator,
    b: &Operator,
) -> Result<CorrelationSeries> {
    correlation_with(&Integrator::default(), grid, rho0, hamiltonian, jumps, a, b)
}

/// g(τ) = Tr(A e^{Lτ}[B ρ0]) on `grid`, which must start at τ = 0.
///
/// A uniform grid is propagated with a single precomputed exp(L·Δτ);
/// any other grid goes through `integrator`.
pub fn correlation_with(
    integrator: &Integrator,
    grid: &TimeGrid,
    rho0: &State,
    hamiltonian: &Operator,
    jumps: &[JumpOperator],
    a: &Operator,
    b: &Operator,
) -> Result<CorrelationSeries> {
    if grid.first() != 0.0 {
        return Err(Error::Grid(format!(
            "correlation grid must start at τ = 0, got {}",
            grid.first()
        )));
    }

    let rho0 = rho0.to_density();
    LindbladGenerator::new(hamiltonian.clone(), jumps.to_vec()).check_against(&rho0)?;

    // g(0) is read out directly.
    let g0 = a.dot(b)?.expect(&rho0)?;

    let source = b.dot(&rho0.projector()?)?;

    let mut values = Vec::with_capacity(grid.len());
    values.push(g0);

    if let Some(step) = grid.uniform_step() {
        info!(points = grid.len(), step, "correlation via Liouvillian propagator");
        let propagator = LindbladPropagator::new(hamiltonian, jumps, step)?;

        // Tr(A X) = Σ_ik A_ik X_ki = vec(Aᵀ) · vec(X)
        let readout: Array1<Complex64> = vectorize(&a.data().t().to_owned());
        let mut v = vectorize(source.data());
        for &tau in &grid.times()[1..] {
            integrator.check_cancelled(tau)?;
            v = propagator.apply_vec(&v);
            let g = readout.dot(&v);
            if !(g.re.is_finite() && g.im.is_finite()) {
                return Err(Error::integration(tau, "correlation became non-finite"));
            }
            values.push(g);
        }
    } else {
        info!(points = grid.len(), "correlation via ODE integration (non-uniform grid)");
        let source_state = State::density(source.basis().clone(), source.into_data())?;
        let trajectory = evolve_lindblad_with(integrator, grid, hamiltonian, jumps, &source_state)?;
        for state in &trajectory.states()[1..] {
            values.push(a.expect(state)?);
        }
    }

    debug!(g0 = %g0, samples = values.len(), "correlation complete");
    Ok(CorrelationSeries::new(values))
}
