// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Master-equation types: jump operators, generators, semiclassical state.

use num_complex::Complex64;

use crate::error::{Error, Result, ValidationError};
use crate::operators::{Operator, State};

/// Classical degrees of freedom, e.g. `[position, momentum]`.
pub type ClassicalState = Vec<Complex64>;

/// A Lindblad jump operator together with its adjoint.
///
/// Represents a single dissipation channel:
///   D[J](ρ) = 2 J ρ J† − J†J ρ − ρ J†J
///
/// Rates are folded into the operator, so `J = √κ a` damps the field
/// amplitude at rate κ (photon number at 2κ).
#[derive(Debug, Clone)]
pub struct JumpOperator {
    /// Jump operator J.
    pub operator: Operator,
    /// Its adjoint J†.
    pub adjoint: Operator,
    /// Human-readable label (e.g., "cavity_decay").
    pub label: String,
}

impl JumpOperator {
    /// Jump operator with its adjoint computed.
    pub fn new(operator: Operator, label: &str) -> Self {
        let adjoint = operator.dagger();
        Self {
            operator,
            adjoint,
            label: label.to_string(),
        }
    }

    /// `√rate · op`.
    pub fn with_rate(rate: f64, op: &Operator, label: &str) -> Result<Self> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(ValidationError::PhysicsConstraint(format!(
                "jump '{}' must have a finite non-negative rate, got {}",
                label, rate
            ))
            .into());
        }
        Ok(Self::new(op.scale_real(rate.sqrt()), label))
    }

    /// Explicit (J, J†) pair. Both must act on the same basis.
    pub fn from_pair(operator: Operator, adjoint: Operator, label: &str) -> Result<Self> {
        if operator.dim() != adjoint.dim() {
            return Err(Error::shape(
                format!("adjoint of jump '{}'", label),
                operator.dim(),
                adjoint.dim(),
            ));
        }
        if operator.basis() != adjoint.basis() {
            return Err(Error::Composition {
                expected: operator.basis().to_string(),
                actual: adjoint.basis().to_string(),
            });
        }
        Ok(Self {
            operator,
            adjoint,
            label: label.to_string(),
        })
    }
}

/// Ordered set of jump operators defining the dissipator.
pub type JumpSet = Vec<JumpOperator>;

/// Hamiltonian and jump set at one instant.
#[derive(Debug, Clone)]
pub struct LindbladGenerator {
    pub hamiltonian: Operator,
    pub jumps: JumpSet,
}

impl LindbladGenerator {
    pub fn new(hamiltonian: Operator, jumps: JumpSet) -> Self {
        Self { hamiltonian, jumps }
    }

    /// Check every operator acts on the same space as `state`.
    pub fn check_against(&self, state: &State) -> Result<()> {
        let operators = std::iter::once(("hamiltonian", &self.hamiltonian)).chain(
            self.jumps
                .iter()
                .flat_map(|j| [("jump operator", &j.operator), ("jump adjoint", &j.adjoint)]),
        );
        for (context, op) in operators {
            if op.dim() != state.dim() {
                return Err(Error::shape(context, state.dim(), op.dim()));
            }
            if op.basis() != state.basis() {
                return Err(Error::Composition {
                    expected: state.basis().to_string(),
                    actual: op.basis().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Quantum state paired with classical variables for one evolution run.
#[derive(Debug, Clone)]
pub struct SemiclassicalState {
    pub quantum: State,
    pub classical: ClassicalState,
}

impl SemiclassicalState {
    pub fn new(quantum: State, classical: ClassicalState) -> Self {
        Self { quantum, classical }
    }

    /// Purely quantum state with an empty classical part.
    pub fn quantum_only(quantum: State) -> Self {
        Self {
            quantum,
            classical: Vec::new(),
        }
    }
}
