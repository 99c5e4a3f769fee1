// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Semiclassical cavity cooling of a moving two-level atom.
//!
//! A pumped atom moves along a standing-wave cavity mode. The internal and
//! field degrees of freedom are quantum (mode ⊗ atom); position x (units of
//! 1/k) and momentum p (units of ħk) are classical:
//!
//!   H(x)  = H0 + cos(x) Hx
//!   H0    = −Δc a†a − Δa σ⁺σ⁻ + η(σ⁺ + σ⁻)
//!   Hx    = g(a†σ⁻ + σ⁺a)
//!   J     = {√κ a, √(γ/2) σ⁻}
//!   dx/dt = 2 ωr p
//!   dp/dt = 2 g sin(x) Re⟨a†σ⁻⟩
//!
//! The position-independent parts are built once; each generator call only
//! forms H0 + cos(x) Hx.

use num_complex::Complex64;
use tracing::info;

use crate::config::CoolingConfig;
use crate::error::{Error, Result};
use crate::grid::TimeGrid;
use crate::lindblad::{
    evolve_semiclassical_with, ClassicalDerivative, Integrator, JumpOperator, JumpSet,
    LindbladGenerator, QuantumGenerator, SemiclassicalState, Trajectory,
};
use crate::operators::{destroy, sigma_minus, Basis, Operator, State};
use crate::validation::{validate_finite, validate_rate};

/// Prebuilt operators and parameters of the cooling model.
#[derive(Debug, Clone)]
pub struct CavityCooling {
    params: CoolingConfig,
    basis: Basis,
    h0: Operator,
    hx: Operator,
    jumps: JumpSet,
    /// a†σ⁻, read out for the force
    coupling: Operator,
    photon_number: Operator,
    excitation: Operator,
}

impl CavityCooling {
    pub fn new(params: &CoolingConfig) -> Result<Self> {
        validate_rate("gamma", params.gamma)?;
        validate_rate("kappa", params.kappa)?;
        validate_finite("coupling", params.coupling)?;
        validate_finite("omega_recoil", params.omega_recoil)?;

        let cutoff = params.cutoff;
        let basis = Basis::fock(cutoff).tensor(&Basis::spin());

        let a = Operator::embed(&basis, 0, &destroy(cutoff))?;
        let sm = Operator::embed(&basis, 1, &sigma_minus())?;
        let ad = a.dagger();
        let sp = sm.dagger();

        let photon_number = ad.dot(&a)?;
        let excitation = sp.dot(&sm)?;
        let coupling = ad.dot(&sm)?;

        let h0 = photon_number
            .scale_real(-params.delta_cavity)
            .checked_sub(&excitation.scale_real(params.delta_atom))?
            .checked_add(&sp.checked_add(&sm)?.scale_real(params.pump))?;
        let hx = coupling
            .checked_add(&sp.dot(&a)?)?
            .scale_real(params.coupling);

        let jumps = vec![
            JumpOperator::with_rate(params.kappa, &a, "cavity_decay")?,
            JumpOperator::with_rate(params.gamma / 2.0, &sm, "atomic_decay")?,
        ];

        Ok(Self {
            params: params.clone(),
            basis,
            h0,
            hx,
            jumps,
            coupling,
            photon_number,
            excitation,
        })
    }

    pub fn params(&self) -> &CoolingConfig {
        &self.params
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub fn jumps(&self) -> &[JumpOperator] {
        &self.jumps
    }

    /// a†a
    pub fn photon_number(&self) -> &Operator {
        &self.photon_number
    }

    /// σ⁺σ⁻
    pub fn excitation(&self) -> &Operator {
        &self.excitation
    }

    /// H at atom position `x`.
    pub fn hamiltonian_at(&self, x: f64) -> Result<Operator> {
        self.h0.checked_add(&self.hx.scale_real(x.cos()))
    }

    /// |0⟩⟨0| ⊗ |↓⟩⟨↓| with (x0, p0).
    pub fn initial_state(&self) -> Result<SemiclassicalState> {
        let quantum = State::fock(self.params.cutoff, 0)?
            .tensor(&State::spin_down())
            .to_density();
        Ok(SemiclassicalState::new(
            quantum,
            vec![
                Complex64::new(self.params.x0, 0.0),
                Complex64::new(self.params.p0, 0.0),
            ],
        ))
    }

    /// `steps + 1` uniform samples on [0, tmax].
    pub fn grid(&self) -> Result<TimeGrid> {
        TimeGrid::uniform(0.0, self.params.tmax, self.params.steps + 1)
    }

    pub fn run(&self, integrator: &Integrator) -> Result<Trajectory> {
        let grid = self.grid()?;
        info!(
            cutoff = self.params.cutoff,
            tmax = self.params.tmax,
            steps = self.params.steps,
            "running cavity cooling"
        );
        let initial = self.initial_state()?;
        evolve_semiclassical_with(integrator, &grid, &initial, self, self)
    }
}

impl QuantumGenerator for CavityCooling {
    fn generate(&self, _t: f64, _state: &State, classical: &[Complex64]) -> Result<LindbladGenerator> {
        let x = classical
            .first()
            .ok_or_else(|| Error::shape("cavity cooling classical state", 2, classical.len()))?;
        Ok(LindbladGenerator::new(
            self.hamiltonian_at(x.re)?,
            self.jumps.clone(),
        ))
    }
}

impl ClassicalDerivative for CavityCooling {
    fn derivative(&self, _t: f64, state: &State, classical: &[Complex64]) -> Result<Vec<Complex64>> {
        let &[x, p] = classical else {
            return Err(Error::shape(
                "cavity cooling classical state",
                2,
                classical.len(),
            ));
        };
        let force = 2.0 * self.params.coupling * x.re.sin() * self.coupling.expect(state)?.re;
        Ok(vec![
            Complex64::new(2.0 * self.params.omega_recoil * p.re, 0.0),
            Complex64::new(force, 0.0),
        ])
    }
}
