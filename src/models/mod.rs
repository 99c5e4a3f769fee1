// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Reference physical models built on the engine.

pub mod cavity_cooling;
pub mod damped_fock;

pub use cavity_cooling::CavityCooling;
pub use damped_fock::{DampedFock, SpectrumComparison};
