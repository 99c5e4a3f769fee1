// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Closed-form reference for a damped Fock state.
//!
//! For H = −Δ a†a, J = √κ a and ρ0 = |n⟩⟨n|, the first-order field
//! correlation and its spectrum are
//!
//!   g(τ) = ⟨a†(τ) a(0)⟩ = n e^{−iΔτ} e^{−κτ}
//!   S(ω) = 2nκ / ((ω + Δ)² + κ²)

use num_complex::Complex64;

use super::regression::CorrelationSeries;
use crate::grid::TimeGrid;

pub fn damped_fock_correlation(n: f64, kappa: f64, delta: f64, tau: f64) -> Complex64 {
    Complex64::new(-kappa * tau, -delta * tau).exp() * n
}

pub fn damped_fock_spectrum(n: f64, kappa: f64, delta: f64, omega: f64) -> f64 {
    2.0 * n * kappa / ((omega + delta).powi(2) + kappa * kappa)
}

/// [`damped_fock_correlation`] sampled on `grid`.
pub fn damped_fock_series(grid: &TimeGrid, n: f64, kappa: f64, delta: f64) -> CorrelationSeries {
    CorrelationSeries::from_fn(grid, |tau| damped_fock_correlation(n, kappa, delta, tau))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_correlation_at_zero_is_photon_number() {
        assert_eq!(damped_fock_correlation(4.0, 1.0, 5.0, 0.0), Complex64::new(4.0, 0.0));
    }

    #[test]
    fn test_spectrum_peak() {
        // Peak at ω = −Δ with height 2n/κ and half width κ
        assert_relative_eq!(damped_fock_spectrum(4.0, 1.0, 5.0, -5.0), 8.0);
        assert_relative_eq!(damped_fock_spectrum(4.0, 1.0, 5.0, -4.0), 4.0);
    }

    #[test]
    fn test_series_on_grid() {
        let grid = TimeGrid::uniform(0.0, 2.0, 3).unwrap();
        let series = damped_fock_series(&grid, 2.0, 0.5, 0.0);
        assert_relative_eq!(series.values[2].re, 2.0 * (-1.0f64).exp(), epsilon = 1e-15);
    }
}
