// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Hilbert-space basis identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Finite-dimensional Hilbert space identifier.
///
/// Composite bases are always kept flat: `(A ⊗ B) ⊗ C` and `A ⊗ (B ⊗ C)`
/// are the same `Composite([A, B, C])`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// Truncated harmonic oscillator, photon numbers 0..=cutoff.
    Fock { cutoff: usize },
    /// Two-level system, index 0 = ground (spin down), 1 = excited.
    Spin,
    /// Ordered tensor product of two or more factors.
    Composite(Vec<Basis>),
}

impl Basis {
    /// Truncated Fock basis of dimension `cutoff + 1`.
    pub fn fock(cutoff: usize) -> Self {
        Basis::Fock { cutoff }
    }

    /// Two-level basis.
    pub fn spin() -> Self {
        Basis::Spin
    }

    /// Hilbert-space dimension (product of factor dimensions).
    pub fn dim(&self) -> usize {
        match self {
            Basis::Fock { cutoff } => cutoff + 1,
            Basis::Spin => 2,
            Basis::Composite(factors) => factors.iter().map(Basis::dim).product(),
        }
    }

    /// Factors in declared order. A simple basis is its own single factor.
    pub fn factors(&self) -> Vec<Basis> {
        match self {
            Basis::Composite(factors) => factors.clone(),
            other => vec![other.clone()],
        }
    }

    /// Tensor product basis `self ⊗ other`.
    pub fn tensor(&self, other: &Basis) -> Basis {
        let mut factors = self.factors();
        factors.extend(other.factors());
        Basis::Composite(factors)
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::Fock { cutoff } => write!(f, "Fock({})", cutoff),
            Basis::Spin => write!(f, "Spin"),
            Basis::Composite(factors) => {
                for (i, b) in factors.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ⊗ ")?;
                    }
                    write!(f, "{}", b)?;
                }
                Ok(())
            }
        }
    }
}
