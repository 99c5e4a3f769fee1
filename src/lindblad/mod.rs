// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lindblad master-equation engine for semiclassical cavity QED.
//!
//! The master equation is written with rates folded into the jump
//! operators:
//!
//!   dρ/dt = −i[H, ρ] + Σ_k (2 J_k ρ J_k† − J_k†J_k ρ − ρ J_k†J_k)
//!
//! so `J = √κ a` damps the field amplitude at rate κ.
//!
//! This module provides:
//! - Generator and jump-operator types
//! - Adaptive Dormand–Prince and fixed-step RK4 integrators
//! - Coupled quantum/classical evolution with mean-field feedback
//! - Liouvillian superoperators and exact one-step propagators
//!
//! # Example
//!
//! ```ignore
//! use cavity_qed_sim::grid::TimeGrid;
//! use cavity_qed_sim::lindblad::{evolve_lindblad, JumpOperator};
//! use cavity_qed_sim::operators::{destroy, number, State};
//!
//! let grid = TimeGrid::uniform(0.0, 5.0, 51)?;
//! let jumps = vec![JumpOperator::with_rate(0.5, &destroy(4), "cavity")?];
//! let rho0 = State::fock(4, 3)?.to_density();
//! let traj = evolve_lindblad(&grid, &number(4), &jumps, &rho0)?;
//! println!("<n>(T) = {}", traj.expect(&number(4))?.last().unwrap().re);
//! ```
//!
//! # References
//!
//! - Lindblad, G. (1976). Commun. Math. Phys. 48, 119.
//! - Breuer, H.-P. & Petruccione, F. (2002). "The Theory of Open Quantum Systems." Oxford.

pub mod dissipator;
pub mod expm;
pub mod integrate;
pub mod ode;
pub mod superop;
pub mod trajectory;
pub mod types;

pub use integrate::{
    evolve_lindblad, evolve_lindblad_with, evolve_semiclassical, evolve_semiclassical_with,
    ClassicalDerivative, ConstantGenerator, NoClassical, QuantumGenerator,
};
pub use ode::Integrator;
pub use superop::{liouvillian, LindbladPropagator};
pub use trajectory::{DensityDiagnostics, Trajectory};
pub use types::{ClassicalState, JumpOperator, JumpSet, LindbladGenerator, SemiclassicalState};
