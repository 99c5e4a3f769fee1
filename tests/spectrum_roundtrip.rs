// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Damped Fock-state correlation → spectrum against the closed-form
//! Lorentzian, κ = 1, n = 4, Δ = 5, dτ = 0.05, τmax = 1000.

use approx::assert_relative_eq;

use cavity_qed_sim::config::DampedFockConfig;
use cavity_qed_sim::correlation::{
    correlation_to_spectrum, correlation_to_spectrum_with, damped_fock_series,
    damped_fock_spectrum, normalize_peak, SpectrumMethod, SpectrumOptions,
};
use cavity_qed_sim::lindblad::Integrator;
use cavity_qed_sim::models::DampedFock;
use cavity_qed_sim::TimeGrid;

const N: f64 = 4.0;
const KAPPA: f64 = 1.0;
const DELTA: f64 = 5.0;
const DTAU: f64 = 0.05;

fn window() -> Vec<f64> {
    (0..=200).map(|k| -10.0 + k as f64 * 0.05).collect()
}

fn reference(frequencies: &[f64]) -> Vec<f64> {
    let mut s: Vec<f64> = frequencies
        .iter()
        .map(|&w| damped_fock_spectrum(N, KAPPA, DELTA, w))
        .collect();
    normalize_peak(&mut s);
    s
}

#[test]
fn analytic_correlation_reproduces_lorentzian() {
    let grid = TimeGrid::from_step(0.0, 1000.0, DTAU).unwrap();
    assert_eq!(grid.len(), 20001);
    let series = damped_fock_series(&grid, N, KAPPA, DELTA);

    let frequencies = window();
    let options = SpectrumOptions::default().with_frequencies(frequencies.clone());
    let spectrum = correlation_to_spectrum_with(&grid, &series, &options).unwrap();
    assert!(spectrum.normalized);

    let (peak, value) = spectrum.peak().unwrap();
    assert!((peak + DELTA).abs() <= 0.05 + 1e-9, "peak at {}", peak);
    assert_relative_eq!(value, 1.0);

    for ((w, s), r) in frequencies.iter().zip(&spectrum.values).zip(reference(&frequencies)) {
        assert_relative_eq!(*s, r, max_relative = 1e-2);
        assert!(s.is_finite(), "non-finite value at ω = {}", w);
    }
}

#[test]
fn unnormalized_spectrum_tracks_closed_form() {
    // Trapezoid error on e^{-zτ} is about (dτ z)² / 12 relative
    let grid = TimeGrid::from_step(0.0, 1000.0, DTAU).unwrap();
    let series = damped_fock_series(&grid, N, KAPPA, DELTA);
    let options = SpectrumOptions {
        normalize: false,
        ..SpectrumOptions::default()
    }
    .with_frequencies(vec![-5.0, -4.0, -7.0]);
    let spectrum = correlation_to_spectrum_with(&grid, &series, &options).unwrap();

    for (w, s) in spectrum.frequencies.iter().zip(&spectrum.values) {
        let exact = damped_fock_spectrum(N, KAPPA, DELTA, *w);
        assert_relative_eq!(*s, exact, max_relative = 2e-3);
    }
}

#[test]
fn repeated_transform_is_identical() {
    let grid = TimeGrid::from_step(0.0, 50.0, DTAU).unwrap();
    let series = damped_fock_series(&grid, N, KAPPA, DELTA);
    let first = correlation_to_spectrum(&grid, &series, false).unwrap();
    let second = correlation_to_spectrum(&grid, &series, false).unwrap();
    assert_eq!(first.values, second.values);
}

#[test]
fn engine_spectrum_matches_closed_form() {
    let model = DampedFock::new(&DampedFockConfig::default()).unwrap();
    let comparison = model
        .run(&Integrator::default(), SpectrumMethod::Trapezoid)
        .unwrap();

    assert_eq!(comparison.frequencies, window());
    assert!((comparison.peak_frequency + DELTA).abs() <= 0.05 + 1e-9);
    assert!(
        comparison.max_relative_deviation < 1e-2,
        "deviation {}",
        comparison.max_relative_deviation
    );
}
