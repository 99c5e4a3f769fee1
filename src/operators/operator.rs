// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Basis-tagged operators and the standard ladder operators.
//!
//! Operators are immutable values. Every algebraic operation checks its
//! operands first:
//!   - different dimensions → [`Error::Shape`]
//!   - same dimension, different basis order → [`Error::Composition`]

use ndarray::{linalg::kron, Array2};
use num_complex::Complex64;

use super::basis::Basis;
use super::state::{State, StateData};
use crate::error::{Error, Result, ValidationError};

/// Square complex matrix tagged with the basis it acts on.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    basis: Basis,
    data: Array2<Complex64>,
}

impl Operator {
    /// Wrap a matrix, checking it is square with the basis dimension.
    pub fn new(basis: Basis, data: Array2<Complex64>) -> Result<Self> {
        let d = basis.dim();
        if data.nrows() != data.ncols() {
            return Err(Error::shape(
                format!("operator on {} (non-square)", basis),
                data.nrows(),
                data.ncols(),
            ));
        }
        if data.nrows() != d {
            return Err(Error::shape(format!("operator on {}", basis), d, data.nrows()));
        }
        Ok(Self { basis, data })
    }

    /// Identity on `basis`.
    pub fn identity(basis: &Basis) -> Self {
        let d = basis.dim();
        Self {
            basis: basis.clone(),
            data: Array2::from_diag_elem(d, Complex64::new(1.0, 0.0)),
        }
    }

    /// Zero operator on `basis`.
    pub fn zeros(basis: &Basis) -> Self {
        let d = basis.dim();
        Self {
            basis: basis.clone(),
            data: Array2::zeros((d, d)),
        }
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub fn data(&self) -> &Array2<Complex64> {
        &self.data
    }

    pub fn into_data(self) -> Array2<Complex64> {
        self.data
    }

    pub fn dim(&self) -> usize {
        self.data.nrows()
    }

    fn check_compatible(&self, other: &Operator, context: &str) -> Result<()> {
        if self.dim() != other.dim() {
            return Err(Error::shape(context, self.dim(), other.dim()));
        }
        if self.basis != other.basis {
            return Err(Error::Composition {
                expected: self.basis.to_string(),
                actual: other.basis.to_string(),
            });
        }
        Ok(())
    }

    /// `self + other`.
    pub fn checked_add(&self, other: &Operator) -> Result<Operator> {
        self.check_compatible(other, "operator sum")?;
        Ok(Self {
            basis: self.basis.clone(),
            data: &self.data + &other.data,
        })
    }

    /// `self - other`.
    pub fn checked_sub(&self, other: &Operator) -> Result<Operator> {
        self.check_compatible(other, "operator difference")?;
        Ok(Self {
            basis: self.basis.clone(),
            data: &self.data - &other.data,
        })
    }

    /// Operator product `self · other`.
    pub fn dot(&self, other: &Operator) -> Result<Operator> {
        self.check_compatible(other, "operator product")?;
        Ok(Self {
            basis: self.basis.clone(),
            data: self.data.dot(&other.data),
        })
    }

    /// Complex scalar multiple.
    pub fn scale(&self, factor: Complex64) -> Operator {
        Self {
            basis: self.basis.clone(),
            data: &self.data * factor,
        }
    }

    /// Real scalar multiple.
    pub fn scale_real(&self, factor: f64) -> Operator {
        self.scale(Complex64::new(factor, 0.0))
    }

    /// Conjugate transpose.
    pub fn dagger(&self) -> Operator {
        Self {
            basis: self.basis.clone(),
            data: conjugate_transpose(&self.data),
        }
    }

    /// Commutator `[self, other] = self·other − other·self`.
    pub fn commutator(&self, other: &Operator) -> Result<Operator> {
        self.dot(other)?.checked_sub(&other.dot(self)?)
    }

    /// Tensor product `self ⊗ other` on the composite basis.
    pub fn tensor(&self, other: &Operator) -> Operator {
        Self {
            basis: self.basis.tensor(&other.basis),
            data: kron(&self.data, &other.data),
        }
    }

    /// Place `op` at factor `index` of `composite`, identities elsewhere.
    pub fn embed(composite: &Basis, index: usize, op: &Operator) -> Result<Operator> {
        let factors = composite.factors();
        let Some(slot) = factors.get(index) else {
            return Err(ValidationError::Field {
                field: "index".into(),
                message: format!(
                    "factor index {} out of range for {} factors",
                    index,
                    factors.len()
                ),
            }
            .into());
        };
        if *slot != op.basis {
            return Err(Error::Composition {
                expected: slot.to_string(),
                actual: op.basis.to_string(),
            });
        }

        let mut data = Array2::from_diag_elem(1, Complex64::new(1.0, 0.0));
        for (k, factor) in factors.iter().enumerate() {
            let block = if k == index {
                op.data.clone()
            } else {
                Array2::from_diag_elem(factor.dim(), Complex64::new(1.0, 0.0))
            };
            data = kron(&data, &block);
        }
        Ok(Self {
            basis: composite.clone(),
            data,
        })
    }

    /// Expectation value: Tr(Oρ) for a density operator, ⟨ψ|O|ψ⟩ for a ket.
    pub fn expect(&self, state: &State) -> Result<Complex64> {
        if state.dim() != self.dim() {
            return Err(Error::shape("expectation value", self.dim(), state.dim()));
        }
        if *state.basis() != self.basis {
            return Err(Error::Composition {
                expected: self.basis.to_string(),
                actual: state.basis().to_string(),
            });
        }
        Ok(match state.data() {
            StateData::Ket(psi) => {
                let o_psi = self.data.dot(psi);
                psi.iter().zip(o_psi.iter()).map(|(a, b)| a.conj() * b).sum()
            }
            StateData::Density(rho) => trace_product(&self.data, rho),
        })
    }

    /// Whether `‖O − O†‖_max ≤ tol`.
    pub fn is_hermitian(&self, tol: f64) -> bool {
        hermiticity_error(&self.data) <= tol
    }
}

/// Annihilation operator on `Fock(cutoff)`: a|n⟩ = √n |n−1⟩.
///
/// Nonzero entries `a[n−1, n] = √n` for n = 1..=cutoff.
pub fn destroy(cutoff: usize) -> Operator {
    let d = cutoff + 1;
    let mut data = Array2::zeros((d, d));
    for n in 1..d {
        data[[n - 1, n]] = Complex64::new((n as f64).sqrt(), 0.0);
    }
    Operator {
        basis: Basis::fock(cutoff),
        data,
    }
}

/// Creation operator a† on `Fock(cutoff)`.
pub fn create(cutoff: usize) -> Operator {
    destroy(cutoff).dagger()
}

/// Number operator a†a on `Fock(cutoff)`.
pub fn number(cutoff: usize) -> Operator {
    let d = cutoff + 1;
    let mut data = Array2::zeros((d, d));
    for n in 0..d {
        data[[n, n]] = Complex64::new(n as f64, 0.0);
    }
    Operator {
        basis: Basis::fock(cutoff),
        data,
    }
}

/// Lowering operator σ⁻ = |0⟩⟨1| on the two-level basis.
pub fn sigma_minus() -> Operator {
    let mut data = Array2::zeros((2, 2));
    data[[0, 1]] = Complex64::new(1.0, 0.0);
    Operator {
        basis: Basis::spin(),
        data,
    }
}

/// Raising operator σ⁺ = |1⟩⟨0|.
pub fn sigma_plus() -> Operator {
    sigma_minus().dagger()
}

/// σz = |1⟩⟨1| − |0⟩⟨0| (excited state has eigenvalue +1).
pub fn sigma_z() -> Operator {
    let mut data = Array2::zeros((2, 2));
    data[[0, 0]] = Complex64::new(-1.0, 0.0);
    data[[1, 1]] = Complex64::new(1.0, 0.0);
    Operator {
        basis: Basis::spin(),
        data,
    }
}

/// Conjugate transpose (dagger) of a matrix.
pub(crate) fn conjugate_transpose(m: &Array2<Complex64>) -> Array2<Complex64> {
    m.t().mapv(|z| z.conj())
}

/// Tr(A·B) without forming the product.
pub(crate) fn trace_product(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Complex64 {
    let mut acc = Complex64::new(0.0, 0.0);
    for ((i, k), a_ik) in a.indexed_iter() {
        acc += a_ik * b[[k, i]];
    }
    acc
}

/// max |M − M†| over all entries.
pub(crate) fn hermiticity_error(m: &Array2<Complex64>) -> f64 {
    let mut worst = 0.0f64;
    for ((i, j), v) in m.indexed_iter() {
        worst = worst.max((v - m[[j, i]].conj()).norm());
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_matrix_close;
    use approx::assert_relative_eq;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_destroy_entries() {
        let a = destroy(3);
        assert_eq!(a.dim(), 4);
        assert_relative_eq!(a.data()[[0, 1]].re, 1.0);
        assert_relative_eq!(a.data()[[1, 2]].re, 2.0_f64.sqrt());
        assert_relative_eq!(a.data()[[2, 3]].re, 3.0_f64.sqrt());
        let nonzero = a.data().iter().filter(|z| z.norm() > 0.0).count();
        assert_eq!(nonzero, 3);
    }

    #[test]
    fn test_truncated_commutator_boundary_defect() {
        // [a, a†] = I except the last diagonal entry, which is −N.
        for cutoff in 1..8 {
            let a = destroy(cutoff);
            let comm = a.commutator(&a.dagger()).unwrap();
            for ((i, j), v) in comm.data().indexed_iter() {
                let expected = if i != j {
                    0.0
                } else if i == cutoff {
                    -(cutoff as f64)
                } else {
                    1.0
                };
                assert_relative_eq!(v.re, expected, epsilon = 1e-12);
                assert_relative_eq!(v.im, 0.0);
            }
        }
    }

    #[test]
    fn test_number_is_adag_a() {
        let a = destroy(5);
        let n = a.dagger().dot(&a).unwrap();
        assert_matrix_close(n.data(), number(5).data(), 1e-12);
    }

    #[test]
    fn test_sigma_operators() {
        let sm = sigma_minus();
        let sp = sigma_plus();
        assert_eq!(sm.data()[[0, 1]], c(1.0));
        assert_eq!(sp.data()[[1, 0]], c(1.0));
        // σ⁺σ⁻ projects on the excited state
        let proj = sp.dot(&sm).unwrap();
        assert_eq!(proj.data()[[1, 1]], c(1.0));
        assert_eq!(proj.data()[[0, 0]], c(0.0));
        assert!(sigma_z().is_hermitian(0.0));
    }

    #[test]
    fn test_mixed_product_property() {
        // (A⊗I)(I⊗B) = A⊗B
        let a = destroy(2);
        let b = sigma_plus();
        let id_a = Operator::identity(a.basis());
        let id_b = Operator::identity(b.basis());
        let left = a.tensor(&id_b).dot(&id_a.tensor(&b)).unwrap();
        let direct = a.tensor(&b);
        assert_eq!(left.basis(), direct.basis());
        assert_matrix_close(left.data(), direct.data(), 1e-14);
    }

    #[test]
    fn test_tensor_associative() {
        let a = destroy(1);
        let b = sigma_minus();
        let cc = number(2);
        let left = a.tensor(&b).tensor(&cc);
        let right = a.tensor(&b.tensor(&cc));
        assert_eq!(left.basis(), right.basis());
        assert_matrix_close(left.data(), right.data(), 1e-14);
    }

    #[test]
    fn test_embed_matches_tensor() {
        let composite = Basis::fock(3).tensor(&Basis::spin());
        let a = Operator::embed(&composite, 0, &destroy(3)).unwrap();
        let expected = destroy(3).tensor(&Operator::identity(&Basis::spin()));
        assert_matrix_close(a.data(), expected.data(), 1e-14);

        let sm = Operator::embed(&composite, 1, &sigma_minus()).unwrap();
        let expected = Operator::identity(&Basis::fock(3)).tensor(&sigma_minus());
        assert_matrix_close(sm.data(), expected.data(), 1e-14);
    }

    #[test]
    fn test_embed_wrong_slot_is_composition_error() {
        let composite = Basis::fock(1).tensor(&Basis::spin());
        let err = Operator::embed(&composite, 1, &destroy(1)).unwrap_err();
        assert!(matches!(err, Error::Composition { .. }));
    }

    #[test]
    fn test_dimension_mismatch_is_shape_error() {
        let err = destroy(2).dot(&destroy(3)).unwrap_err();
        assert!(matches!(err, Error::Shape { expected: 3, actual: 4, .. }));
        let err = destroy(2).checked_add(&sigma_minus()).unwrap_err();
        assert!(matches!(err, Error::Shape { .. }));
    }

    #[test]
    fn test_basis_order_mismatch_is_composition_error() {
        // Fock(1) ⊗ Spin and Spin ⊗ Fock(1) both have dimension 4.
        let ab = destroy(1).tensor(&sigma_minus());
        let ba = sigma_minus().tensor(&destroy(1));
        let err = ab.checked_add(&ba).unwrap_err();
        assert!(matches!(err, Error::Composition { .. }));
    }

    #[test]
    fn test_new_rejects_bad_dimensions() {
        let err = Operator::new(Basis::spin(), Array2::zeros((3, 3))).unwrap_err();
        assert!(matches!(err, Error::Shape { expected: 2, actual: 3, .. }));
        let err = Operator::new(Basis::spin(), Array2::zeros((2, 3))).unwrap_err();
        assert!(matches!(err, Error::Shape { .. }));
    }

    #[test]
    fn test_expect_fock_number() {
        let n = number(5);
        let state = State::fock(5, 3).unwrap();
        assert_relative_eq!(n.expect(&state).unwrap().re, 3.0, epsilon = 1e-12);
        let rho = state.to_density();
        assert_relative_eq!(n.expect(&rho).unwrap().re, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_expect_dimension_mismatch() {
        let state = State::fock(2, 0).unwrap();
        assert!(matches!(
            number(3).expect(&state),
            Err(Error::Shape { .. })
        ));
    }

    #[test]
    fn test_trace_product_matches_dense() {
        let a = destroy(3).data().clone();
        let b = create(3).dot(&number(3)).unwrap().into_data();
        let dense = a.dot(&b).diag().sum();
        let fast = trace_product(&a, &b);
        assert_relative_eq!((dense - fast).norm(), 0.0, epsilon = 1e-12);
    }
}
