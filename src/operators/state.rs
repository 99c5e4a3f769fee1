// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Quantum states: kets and density operators.

use ndarray::{linalg::kron, Array1, Array2};
use num_complex::Complex64;

use super::basis::Basis;
use super::operator::{hermiticity_error, Operator};
use crate::error::{Error, Result, ValidationError};

/// Amplitudes of a [`State`]: a ket vector or a density matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum StateData {
    Ket(Array1<Complex64>),
    Density(Array2<Complex64>),
}

/// A ket |ψ⟩ or a density operator ρ over a basis.
///
/// Fields are private so the amplitudes always match the basis dimension.
/// Density operators produced by integration are not renormalized, so
/// trace and Hermiticity may drift within solver tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    basis: Basis,
    data: StateData,
}

impl State {
    /// Ket over `basis`; the vector length must equal the basis dimension.
    pub fn ket(basis: Basis, data: Array1<Complex64>) -> Result<Self> {
        if data.len() != basis.dim() {
            return Err(Error::shape(format!("ket on {}", basis), basis.dim(), data.len()));
        }
        Ok(Self::from_parts(basis, StateData::Ket(data)))
    }

    /// Density operator over `basis`; must be square with the basis dimension.
    pub fn density(basis: Basis, data: Array2<Complex64>) -> Result<Self> {
        let d = basis.dim();
        if data.nrows() != d || data.ncols() != d {
            return Err(Error::shape(
                format!("density operator on {}", basis),
                d,
                data.nrows().max(data.ncols()),
            ));
        }
        Ok(Self::from_parts(basis, StateData::Density(data)))
    }

    /// Caller guarantees the amplitudes match `basis`.
    pub(crate) fn from_parts(basis: Basis, data: StateData) -> Self {
        Self { basis, data }
    }

    /// Fock state |n⟩ in `Fock(cutoff)`.
    pub fn fock(cutoff: usize, n: usize) -> Result<Self> {
        if n > cutoff {
            return Err(ValidationError::Field {
                field: "n".into(),
                message: format!("photon number {} exceeds cutoff {}", n, cutoff),
            }
            .into());
        }
        let mut data = Array1::zeros(cutoff + 1);
        data[n] = Complex64::new(1.0, 0.0);
        Ok(Self::from_parts(Basis::fock(cutoff), StateData::Ket(data)))
    }

    /// Two-level ground state |↓⟩ = |0⟩.
    pub fn spin_down() -> Self {
        let mut data = Array1::zeros(2);
        data[0] = Complex64::new(1.0, 0.0);
        Self::from_parts(Basis::spin(), StateData::Ket(data))
    }

    /// Two-level excited state |↑⟩ = |1⟩.
    pub fn spin_up() -> Self {
        let mut data = Array1::zeros(2);
        data[1] = Complex64::new(1.0, 0.0);
        Self::from_parts(Basis::spin(), StateData::Ket(data))
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    /// Read-only view of the amplitudes.
    pub fn data(&self) -> &StateData {
        &self.data
    }

    pub fn dim(&self) -> usize {
        self.basis.dim()
    }

    pub fn is_ket(&self) -> bool {
        matches!(self.data, StateData::Ket(_))
    }

    /// Density matrix view; a ket is promoted to |ψ⟩⟨ψ|.
    pub fn density_matrix(&self) -> Array2<Complex64> {
        match &self.data {
            StateData::Ket(psi) => outer(psi, psi),
            StateData::Density(rho) => rho.clone(),
        }
    }

    /// The same state as a density operator.
    pub fn to_density(&self) -> State {
        Self::from_parts(self.basis.clone(), StateData::Density(self.density_matrix()))
    }

    /// |ψ⟩⟨ψ| (or ρ itself) as an operator, e.g. for population readout.
    pub fn projector(&self) -> Result<Operator> {
        Operator::new(self.basis().clone(), self.density_matrix())
    }

    /// Tensor product `self ⊗ other`. Two kets give a ket; any density
    /// factor promotes the result to a density operator.
    pub fn tensor(&self, other: &State) -> State {
        let basis = self.basis.tensor(&other.basis);
        match (&self.data, &other.data) {
            (StateData::Ket(a), StateData::Ket(b)) => {
                let mut data = Array1::zeros(a.len() * b.len());
                for (i, ai) in a.iter().enumerate() {
                    for (j, bj) in b.iter().enumerate() {
                        data[i * b.len() + j] = ai * bj;
                    }
                }
                Self::from_parts(basis, StateData::Ket(data))
            }
            _ => Self::from_parts(
                basis,
                StateData::Density(kron(&self.density_matrix(), &other.density_matrix())),
            ),
        }
    }

    /// Tr ρ, or ⟨ψ|ψ⟩ for a ket.
    pub fn trace(&self) -> Complex64 {
        match &self.data {
            StateData::Ket(psi) => Complex64::new(psi.iter().map(|z| z.norm_sqr()).sum(), 0.0),
            StateData::Density(rho) => rho.diag().sum(),
        }
    }

    /// Purity Tr(ρ²); 1 for kets with unit norm.
    pub fn purity(&self) -> f64 {
        match &self.data {
            StateData::Ket(_) => self.trace().re.powi(2),
            StateData::Density(rho) => rho.dot(rho).diag().sum().re,
        }
    }

    /// max |ρ − ρ†|; zero for kets.
    pub fn hermiticity_error(&self) -> f64 {
        match &self.data {
            StateData::Ket(_) => 0.0,
            StateData::Density(rho) => hermiticity_error(rho),
        }
    }

    /// Expectation value of `op` (see [`Operator::expect`]).
    pub fn expect(&self, op: &Operator) -> Result<Complex64> {
        op.expect(self)
    }
}

/// |a⟩⟨b|
pub(crate) fn outer(a: &Array1<Complex64>, b: &Array1<Complex64>) -> Array2<Complex64> {
    let mut m = Array2::zeros((a.len(), b.len()));
    for (i, ai) in a.iter().enumerate() {
        for (j, bj) in b.iter().enumerate() {
            m[[i, j]] = ai * bj.conj();
        }
    }
    m
}
