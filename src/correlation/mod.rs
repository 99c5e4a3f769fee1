// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Two-time correlation functions and emission spectra.
//!
//! [`correlation`] evaluates g(τ) = ⟨A(τ)B(0)⟩ through the quantum
//! regression theorem and [`correlation_to_spectrum`] turns a sampled
//! g(τ) into S(ω) = 2 Re ∫ e^{−iωτ} g(τ) dτ.

pub mod analytic;
pub mod regression;
pub mod spectrum;

pub use analytic::{damped_fock_correlation, damped_fock_series, damped_fock_spectrum};
pub use regression::{correlation, correlation_with, CorrelationSeries};
pub use spectrum::{
    correlation_to_spectrum, correlation_to_spectrum_with, default_frequencies, normalize_peak,
    Spectrum, SpectrumMethod, SpectrumOptions,
};
