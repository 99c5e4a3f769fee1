// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Semiclassical cavity-QED simulation.
//!
//! A finite-dimensional open-system toolkit for a truncated cavity mode
//! coupled to a two-level atom, with optional classical degrees of freedom
//! driven by quantum expectation values.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          cavity-sim runner               │
//! ├──────────────────┬──────────────────────┤
//! │  models          │   report             │
//! ├──────────────────┴──────────────────────┤
//! │  lindblad (a)    │  correlation (b)     │
//! │  semiclassical   │  regression theorem  │
//! │  evolution       │  → spectrum          │
//! ├──────────────────┴──────────────────────┤
//! │         operators / grid                 │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`operators`]: Bases, operators, states and tensor composition
//! - [`grid`]: Sample-time grids
//! - [`lindblad`]: Master-equation engine and integrators
//! - [`correlation`]: Two-time correlations and spectra
//! - [`models`]: Cavity cooling and damped Fock reference models
//! - [`config`]: Configuration management
//! - [`validation`]: Input validation utilities
//! - [`error`]: Error types

pub mod config;
pub mod correlation;
pub mod error;
pub mod grid;
pub mod lindblad;
pub mod models;
pub mod operators;
pub mod report;
pub mod validation;

pub use config::Config;
pub use correlation::{correlation, correlation_to_spectrum, CorrelationSeries, Spectrum};
pub use error::{Error, Result};
pub use grid::TimeGrid;
pub use lindblad::{evolve_lindblad, evolve_semiclassical, Trajectory};

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
