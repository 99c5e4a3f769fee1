// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Correlation → spectrum transform.
//!
//!   S(ω) = 2 Re ∫₀^τmax e^{−iωτ} g(τ) dτ

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, warn};

use super::regression::CorrelationSeries;
use crate::config::SpectrumConfig;
use crate::error::{Error, Result};
use crate::grid::TimeGrid;

/// Quadrature rule for the Fourier integral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpectrumMethod {
    /// Trapezoidal rule; any strictly increasing grid.
    #[default]
    Trapezoid,
    /// Left Riemann sum dτ Σ g_k e^{−iωτ_k}; uniform grids only.
    Rectangle,
}

/// Transform options.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumOptions {
    pub method: SpectrumMethod,
    /// Explicit frequencies; `None` selects the Nyquist band of the grid.
    pub frequencies: Option<Vec<f64>>,
    /// Size of the default frequency grid.
    pub points: usize,
    pub normalize: bool,
}

impl Default for SpectrumOptions {
    fn default() -> Self {
        Self {
            method: SpectrumMethod::Trapezoid,
            frequencies: None,
            points: 1001,
            normalize: true,
        }
    }
}

impl From<&SpectrumConfig> for SpectrumOptions {
    fn from(config: &SpectrumConfig) -> Self {
        Self {
            method: config.method,
            frequencies: None,
            points: config.points,
            normalize: config.normalize,
        }
    }
}

impl SpectrumOptions {
    pub fn with_frequencies(mut self, frequencies: Vec<f64>) -> Self {
        self.frequencies = Some(frequencies);
        self
    }
}

/// S(ω) sampled on a frequency grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrum {
    pub frequencies: Vec<f64>,
    pub values: Vec<f64>,
    /// Whether `values` were divided by their maximum.
    pub normalized: bool,
}

impl Spectrum {
    /// (ω, S) at the maximum.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.frequencies
            .iter()
            .copied()
            .zip(self.values.iter().copied())
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// `points` frequencies spanning ±π/Δτ, Δτ being the mean grid step.
pub fn default_frequencies(grid: &TimeGrid, points: usize) -> Result<Vec<f64>> {
    let dt = grid.mean_step().ok_or(Error::InsufficientData {
        len: grid.len(),
        required: 2,
    })?;
    if points < 2 {
        return Err(Error::Grid(format!(
            "frequency grid needs at least 2 points, got {}",
            points
        )));
    }
    let limit = PI / dt;
    let step = 2.0 * limit / (points - 1) as f64;
    Ok((0..points).map(|k| -limit + k as f64 * step).collect())
}

/// Spectrum with trapezoidal quadrature on the default frequency grid.
pub fn correlation_to_spectrum(
    grid: &TimeGrid,
    series: &CorrelationSeries,
    normalize: bool,
) -> Result<Spectrum> {
    let options = SpectrumOptions {
        normalize,
        ..SpectrumOptions::default()
    };
    correlation_to_spectrum_with(grid, series, &options)
}

pub fn correlation_to_spectrum_with(
    grid: &TimeGrid,
    series: &CorrelationSeries,
    options: &SpectrumOptions,
) -> Result<Spectrum> {
    if series.len() < 2 {
        return Err(Error::InsufficientData {
            len: series.len(),
            required: 2,
        });
    }
    if series.len() != grid.len() {
        return Err(Error::shape(
            "correlation series vs time grid",
            grid.len(),
            series.len(),
        ));
    }

    let frequencies = match &options.frequencies {
        Some(f) => f.clone(),
        None => default_frequencies(grid, options.points)?,
    };
    if let Some(w) = frequencies.iter().find(|w| !w.is_finite()) {
        return Err(Error::Grid(format!("non-finite frequency {}", w)));
    }

    let taus = grid.times();
    let g = &series.values;

    let mut values: Vec<f64> = match options.method {
        SpectrumMethod::Trapezoid => frequencies
            .iter()
            .map(|&w| 2.0 * trapezoid(taus, g, w).re)
            .collect(),
        SpectrumMethod::Rectangle => {
            let dt = grid.uniform_step().ok_or_else(|| {
                Error::Grid("rectangle quadrature requires a uniform τ grid".into())
            })?;
            frequencies
                .iter()
                .map(|&w| 2.0 * dt * riemann_sum(taus, g, w).re)
                .collect()
        }
    };

    let normalized = options.normalize && normalize_peak(&mut values);
    debug!(
        method = ?options.method,
        frequencies = frequencies.len(),
        normalized,
        "spectrum computed"
    );

    Ok(Spectrum {
        frequencies,
        values,
        normalized,
    })
}

/// Divide by the maximum so the peak is 1. A non-positive maximum leaves
/// the values untouched and returns `false`.
pub fn normalize_peak(values: &mut [f64]) -> bool {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() || max <= 0.0 {
        warn!(max, "spectrum maximum is not positive; leaving values unnormalized");
        return false;
    }
    for v in values.iter_mut() {
        *v /= max;
    }
    true
}

/// ∫ e^{−iωτ} g(τ) dτ by the trapezoidal rule.
fn trapezoid(taus: &[f64], g: &[Complex64], omega: f64) -> Complex64 {
    let f: Vec<Complex64> = taus
        .iter()
        .zip(g)
        .map(|(&tau, &gk)| gk * Complex64::new(0.0, -omega * tau).exp())
        .collect();
    taus.windows(2)
        .zip(f.windows(2))
        .map(|(t, y)| (y[0] + y[1]) * (0.5 * (t[1] - t[0])))
        .sum()
}

/// Σ_k g_k e^{−iωτ_k}
fn riemann_sum(taus: &[f64], g: &[Complex64], omega: f64) -> Complex64 {
    taus.iter()
        .zip(g)
        .map(|(&tau, &gk)| gk * Complex64::new(0.0, -omega * tau).exp())
        .sum()
}
