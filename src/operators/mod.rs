// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Operator and state layer.
//!
//! Finite-dimensional representations of a truncated oscillator mode and a
//! two-level atom, plus their tensor composition. Composite objects are
//! ordered mode ⊗ atom throughout the crate.
//!
//! Everything here is a plain value: algebra returns new operators and
//! reports dimension problems as [`crate::Error::Shape`] and basis-order
//! problems as [`crate::Error::Composition`].

pub mod basis;
pub mod operator;
pub mod state;

pub use basis::Basis;
pub use operator::{create, destroy, number, sigma_minus, sigma_plus, sigma_z, Operator};
pub use state::{State, StateData};
