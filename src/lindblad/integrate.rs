// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Semiclassical master-equation evolution.
//!
//! Integrates the coupled system
//!
//!   dρ/dt = −i[H(t, x), ρ] + Σ_k D[J_k(t, x)](ρ)
//!   dx/dt = f(t, ρ, x)
//!
//! by flattening ρ (row-major) and the classical tuple x into one complex
//! vector and handing it to an [`Integrator`]. Every right-hand-side
//! evaluation unpacks a single `(t, ρ, x)` snapshot and passes that same
//! snapshot to both the quantum generator and the classical derivative.
//!
//! A ket initial state with no jump operators evolves under the
//! Schrödinger equation d|ψ⟩/dt = −iH|ψ⟩ instead.

use ndarray::{s, Array1, Array2};
use num_complex::Complex64;
use tracing::{debug, info};

use super::dissipator::lindblad_rhs;
use super::ode::Integrator;
use super::trajectory::Trajectory;
use super::types::{JumpOperator, LindbladGenerator, SemiclassicalState};
use crate::error::{Error, Result, ValidationError};
use crate::grid::TimeGrid;
use crate::operators::{Basis, Operator, State, StateData};

/// Produces H and the jump set from the current snapshot.
pub trait QuantumGenerator {
    fn generate(&self, t: f64, state: &State, classical: &[Complex64])
        -> Result<LindbladGenerator>;
}

impl<F> QuantumGenerator for F
where
    F: Fn(f64, &State, &[Complex64]) -> Result<LindbladGenerator>,
{
    fn generate(
        &self,
        t: f64,
        state: &State,
        classical: &[Complex64],
    ) -> Result<LindbladGenerator> {
        self(t, state, classical)
    }
}

/// Time derivative of the classical variables.
///
/// The returned vector must have the same length as `classical`.
pub trait ClassicalDerivative {
    fn derivative(&self, t: f64, state: &State, classical: &[Complex64])
        -> Result<Vec<Complex64>>;
}

impl<F> ClassicalDerivative for F
where
    F: Fn(f64, &State, &[Complex64]) -> Result<Vec<Complex64>>,
{
    fn derivative(
        &self,
        t: f64,
        state: &State,
        classical: &[Complex64],
    ) -> Result<Vec<Complex64>> {
        self(t, state, classical)
    }
}

/// Generator that ignores the snapshot.
#[derive(Debug, Clone)]
pub struct ConstantGenerator(pub LindbladGenerator);

impl QuantumGenerator for ConstantGenerator {
    fn generate(&self, _t: f64, _state: &State, _x: &[Complex64]) -> Result<LindbladGenerator> {
        Ok(self.0.clone())
    }
}

/// Frozen classical variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClassical;

impl ClassicalDerivative for NoClassical {
    fn derivative(&self, _t: f64, _state: &State, x: &[Complex64]) -> Result<Vec<Complex64>> {
        Ok(vec![Complex64::new(0.0, 0.0); x.len()])
    }
}

/// Flat-vector layout: quantum block first, then the classical tuple.
struct Layout {
    basis: Basis,
    dim: usize,
    ket: bool,
    classical: usize,
}

impl Layout {
    fn quantum_len(&self) -> usize {
        if self.ket {
            self.dim
        } else {
            self.dim * self.dim
        }
    }

    fn pack(&self, quantum: &StateData, classical: &[Complex64]) -> Array1<Complex64> {
        let mut y = Array1::zeros(self.quantum_len() + self.classical);
        match quantum {
            StateData::Ket(psi) => y.slice_mut(s![..self.dim]).assign(psi),
            StateData::Density(rho) => {
                for (slot, value) in y.iter_mut().zip(rho.iter()) {
                    *slot = *value;
                }
            }
        }
        let q = self.quantum_len();
        for (k, value) in classical.iter().enumerate() {
            y[q + k] = *value;
        }
        y
    }

    fn unpack(&self, y: &Array1<Complex64>) -> (State, Vec<Complex64>) {
        let q = self.quantum_len();
        let data = if self.ket {
            StateData::Ket(y.slice(s![..q]).to_owned())
        } else {
            let d = self.dim;
            StateData::Density(Array2::from_shape_fn((d, d), |(i, j)| y[i * d + j]))
        };
        let state = State::from_parts(self.basis.clone(), data);
        (state, y.slice(s![q..]).to_vec())
    }
}

/// Evolve with the default adaptive solver.
pub fn evolve_semiclassical<G, C>(
    grid: &TimeGrid,
    initial: &SemiclassicalState,
    generator: &G,
    classical: &C,
) -> Result<Trajectory>
where
    G: QuantumGenerator + ?Sized,
    C: ClassicalDerivative + ?Sized,
{
    evolve_semiclassical_with(&Integrator::default(), grid, initial, generator, classical)
}

/// Evolve the coupled quantum/classical system, sampling at every grid
/// time. Sample 0 is the initial condition.
pub fn evolve_semiclassical_with<G, C>(
    integrator: &Integrator,
    grid: &TimeGrid,
    initial: &SemiclassicalState,
    generator: &G,
    classical: &C,
) -> Result<Trajectory>
where
    G: QuantumGenerator + ?Sized,
    C: ClassicalDerivative + ?Sized,
{
    let layout = Layout {
        basis: initial.quantum.basis().clone(),
        dim: initial.quantum.dim(),
        ket: initial.quantum.is_ket(),
        classical: initial.classical.len(),
    };
    let minus_i = Complex64::new(0.0, -1.0);

    info!(
        basis = %layout.basis,
        dim = layout.dim,
        ket = layout.ket,
        classical = layout.classical,
        points = grid.len(),
        t0 = grid.first(),
        t1 = grid.last(),
        "starting semiclassical evolution"
    );

    let rhs = |t: f64, y: &Array1<Complex64>| -> Result<Array1<Complex64>> {
        let (state, x) = layout.unpack(y);

        let gen = generator.generate(t, &state, &x)?;
        gen.check_against(&state)?;

        let mut dy = match state.data() {
            StateData::Ket(psi) => {
                if !gen.jumps.is_empty() {
                    return Err(ValidationError::PhysicsConstraint(format!(
                        "ket evolution cannot include {} jump operator(s); start from a density operator",
                        gen.jumps.len()
                    ))
                    .into());
                }
                let h_psi = gen.hamiltonian.data().dot(psi) * minus_i;
                layout.pack(&StateData::Ket(h_psi), &[])
            }
            StateData::Density(rho) => {
                let drho = lindblad_rhs(gen.hamiltonian.data(), &gen.jumps, rho);
                layout.pack(&StateData::Density(drho), &[])
            }
        };

        if layout.classical > 0 {
            let dx = classical.derivative(t, &state, &x)?;
            if dx.len() != layout.classical {
                return Err(Error::shape(
                    "classical derivative",
                    layout.classical,
                    dx.len(),
                ));
            }
            let q = layout.quantum_len();
            for (k, value) in dx.into_iter().enumerate() {
                dy[q + k] = value;
            }
        }
        Ok(dy)
    };

    let y0 = layout.pack(initial.quantum.data(), &initial.classical);
    let samples = integrator.integrate(grid, y0, rhs)?;

    let mut states = Vec::with_capacity(samples.len());
    let mut classical_samples = Vec::with_capacity(samples.len());
    for y in &samples {
        let (state, x) = layout.unpack(y);
        states.push(state);
        classical_samples.push(x);
    }

    let trajectory = Trajectory::new(grid.times().to_vec(), states, classical_samples);
    debug!(
        samples = trajectory.len(),
        max_trace_drift = trajectory.max_trace_drift(),
        "semiclassical evolution finished"
    );
    Ok(trajectory)
}

/// Evolve under a constant Hamiltonian and jump set with the default
/// adaptive solver.
pub fn evolve_lindblad(
    grid: &TimeGrid,
    hamiltonian: &Operator,
    jumps: &[JumpOperator],
    rho0: &State,
) -> Result<Trajectory> {
    evolve_lindblad_with(&Integrator::default(), grid, hamiltonian, jumps, rho0)
}

pub fn evolve_lindblad_with(
    integrator: &Integrator,
    grid: &TimeGrid,
    hamiltonian: &Operator,
    jumps: &[JumpOperator],
    rho0: &State,
) -> Result<Trajectory> {
    let generator = ConstantGenerator(LindbladGenerator::new(
        hamiltonian.clone(),
        jumps.to_vec(),
    ));
    let initial = SemiclassicalState::quantum_only(rho0.clone());
    evolve_semiclassical_with(integrator, grid, &initial, &generator, &NoClassical)
}
