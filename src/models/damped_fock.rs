// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Damped cavity mode prepared in a Fock state.
//!
//! H = −Δ a†a, J = √κ a, ρ0 = |n⟩⟨n|, with the field correlation
//! ⟨a†(τ) a(0)⟩. The closed form in [`crate::correlation::analytic`] makes
//! this the reference check for the correlation and spectrum pipeline.

use serde::Serialize;
use tracing::info;

use crate::config::DampedFockConfig;
use crate::correlation::{
    correlation_to_spectrum_with, correlation_with, damped_fock_series, damped_fock_spectrum,
    normalize_peak, CorrelationSeries, SpectrumMethod, SpectrumOptions,
};
use crate::error::Result;
use crate::grid::TimeGrid;
use crate::lindblad::{Integrator, JumpOperator};
use crate::operators::{create, destroy, number, Operator, State};

#[derive(Debug, Clone)]
pub struct DampedFock {
    params: DampedFockConfig,
    hamiltonian: Operator,
    jumps: Vec<JumpOperator>,
    rho0: State,
}

/// Numerical against analytic spectrum on the configured window, both
/// normalized to their own peak.
#[derive(Debug, Clone, Serialize)]
pub struct SpectrumComparison {
    pub frequencies: Vec<f64>,
    pub numerical: Vec<f64>,
    pub analytic: Vec<f64>,
    /// max_ω |S_num − S_ref| / S_ref
    pub max_relative_deviation: f64,
    pub peak_frequency: f64,
}

impl DampedFock {
    pub fn new(params: &DampedFockConfig) -> Result<Self> {
        let rho0 = State::fock(params.cutoff, params.n)?.to_density();
        let hamiltonian = number(params.cutoff).scale_real(-params.delta);
        let jumps = vec![JumpOperator::with_rate(
            params.kappa,
            &destroy(params.cutoff),
            "cavity_decay",
        )?];
        Ok(Self {
            params: params.clone(),
            hamiltonian,
            jumps,
            rho0,
        })
    }

    pub fn params(&self) -> &DampedFockConfig {
        &self.params
    }

    /// τ = 0, dτ, ... , τmax.
    pub fn tau_grid(&self) -> Result<TimeGrid> {
        TimeGrid::from_step(0.0, self.params.tau_max, self.params.dtau)
    }

    /// Reported frequency window.
    pub fn frequencies(&self) -> Vec<f64> {
        let p = &self.params;
        let n = p.omega_points.max(2);
        let step = (p.omega_max - p.omega_min) / (n - 1) as f64;
        (0..n).map(|k| p.omega_min + k as f64 * step).collect()
    }

    /// ⟨a†(τ) a(0)⟩ from the master equation.
    pub fn correlation(&self, integrator: &Integrator, grid: &TimeGrid) -> Result<CorrelationSeries> {
        let cutoff = self.params.cutoff;
        correlation_with(
            integrator,
            grid,
            &self.rho0,
            &self.hamiltonian,
            &self.jumps,
            &create(cutoff),
            &destroy(cutoff),
        )
    }

    pub fn analytic_correlation(&self, grid: &TimeGrid) -> CorrelationSeries {
        let p = &self.params;
        damped_fock_series(grid, p.n as f64, p.kappa, p.delta)
    }

    /// Transform `series` on the configured window and compare with the
    /// closed-form Lorentzian.
    pub fn compare_spectrum(
        &self,
        grid: &TimeGrid,
        series: &CorrelationSeries,
        method: SpectrumMethod,
    ) -> Result<SpectrumComparison> {
        let p = &self.params;
        let frequencies = self.frequencies();
        let options = SpectrumOptions {
            method,
            normalize: true,
            ..SpectrumOptions::default()
        }
        .with_frequencies(frequencies.clone());
        let numerical = correlation_to_spectrum_with(grid, series, &options)?;

        let mut analytic: Vec<f64> = frequencies
            .iter()
            .map(|&w| damped_fock_spectrum(p.n as f64, p.kappa, p.delta, w))
            .collect();
        normalize_peak(&mut analytic);

        let max_relative_deviation = numerical
            .values
            .iter()
            .zip(&analytic)
            .filter(|(_, reference)| **reference > 0.0)
            .map(|(value, reference)| (value - reference).abs() / reference)
            .fold(0.0, f64::max);
        let peak_frequency = numerical.peak().map(|(w, _)| w).unwrap_or(f64::NAN);

        Ok(SpectrumComparison {
            frequencies,
            numerical: numerical.values,
            analytic,
            max_relative_deviation,
            peak_frequency,
        })
    }

    /// Engine correlation, spectrum and analytic comparison in one go.
    pub fn run(&self, integrator: &Integrator, method: SpectrumMethod) -> Result<SpectrumComparison> {
        let grid = self.tau_grid()?;
        info!(
            n = self.params.n,
            kappa = self.params.kappa,
            delta = self.params.delta,
            points = grid.len(),
            "running damped Fock correlation"
        );
        let series = self.correlation(integrator, &grid)?;
        let comparison = self.compare_spectrum(&grid, &series, method)?;
        info!(
            peak = comparison.peak_frequency,
            max_relative_deviation = comparison.max_relative_deviation,
            "spectrum comparison finished"
        );
        Ok(comparison)
    }
}
