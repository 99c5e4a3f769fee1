// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Sampled evolution output.

use num_complex::Complex64;
use serde::Serialize;

use super::types::ClassicalState;
use crate::error::{Error, Result};
use crate::operators::{Operator, State};

/// States and classical variables at every grid time, element 0 being the
/// initial condition. Immutable once produced by the engine.
#[derive(Debug, Clone)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<State>,
    classical: Vec<ClassicalState>,
}

/// Per-sample physicality indicators of a density-matrix trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DensityDiagnostics {
    /// |Tr ρ − 1|
    pub trace_drift: f64,
    /// max |ρ − ρ†|
    pub hermiticity_error: f64,
    /// Tr(ρ²)
    pub purity: f64,
}

impl Trajectory {
    /// All three sequences must have one entry per sample time.
    pub(crate) fn new(times: Vec<f64>, states: Vec<State>, classical: Vec<ClassicalState>) -> Self {
        debug_assert_eq!(times.len(), states.len());
        debug_assert_eq!(times.len(), classical.len());
        Self {
            times,
            states,
            classical,
        }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn classical(&self) -> &[ClassicalState] {
        &self.classical
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn final_state(&self) -> Option<&State> {
        self.states.last()
    }

    pub fn final_classical(&self) -> Option<&ClassicalState> {
        self.classical.last()
    }

    /// ⟨op⟩ at every sample.
    pub fn expect(&self, op: &Operator) -> Result<Vec<Complex64>> {
        self.states.iter().map(|s| op.expect(s)).collect()
    }

    /// Time series of one classical component.
    pub fn classical_component(&self, index: usize) -> Result<Vec<Complex64>> {
        self.classical
            .iter()
            .map(|x| {
                x.get(index).copied().ok_or_else(|| {
                    Error::shape("classical component index", x.len(), index + 1)
                })
            })
            .collect()
    }

    pub fn diagnostics(&self) -> Vec<DensityDiagnostics> {
        self.states
            .iter()
            .map(|s| DensityDiagnostics {
                trace_drift: (s.trace() - Complex64::new(1.0, 0.0)).norm(),
                hermiticity_error: s.hermiticity_error(),
                purity: s.purity(),
            })
            .collect()
    }

    /// Largest |Tr ρ − 1| over the trajectory.
    pub fn max_trace_drift(&self) -> f64 {
        self.diagnostics()
            .iter()
            .map(|d| d.trace_drift)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::{number, sigma_z};

    fn sample() -> Trajectory {
        Trajectory::new(
            vec![0.0, 1.0],
            vec![State::spin_up(), State::spin_down().to_density()],
            vec![
                vec![Complex64::new(1.0, 0.0), Complex64::new(2.0, 0.0)],
                vec![Complex64::new(1.5, 0.0), Complex64::new(1.0, 0.0)],
            ],
        )
    }

    #[test]
    fn test_expect_over_samples() {
        let values = sample().expect(&sigma_z()).unwrap();
        assert_eq!(values, vec![Complex64::new(1.0, 0.0), Complex64::new(-1.0, 0.0)]);
    }

    #[test]
    fn test_expect_wrong_basis() {
        assert!(sample().expect(&number(1)).is_err());
    }

    #[test]
    fn test_final_sample() {
        let t = sample();
        assert_eq!(t.final_state(), Some(&State::spin_down().to_density()));
        assert_eq!(
            t.final_classical(),
            Some(&vec![Complex64::new(1.5, 0.0), Complex64::new(1.0, 0.0)])
        );
        assert_eq!(t.times(), &[0.0, 1.0]);
        assert_eq!(t.states().len(), t.classical().len());
    }

    #[test]
    fn test_classical_component() {
        let t = sample();
        let p = t.classical_component(1).unwrap();
        assert_eq!(p[1], Complex64::new(1.0, 0.0));
        assert!(t.classical_component(2).is_err());
    }

    #[test]
    fn test_diagnostics_of_pure_states() {
        let t = sample();
        assert_eq!(t.len(), 2);
        assert!(t.max_trace_drift() < 1e-15);
        for d in t.diagnostics() {
            assert!((d.purity - 1.0).abs() < 1e-15);
            assert_eq!(d.hermiticity_error, 0.0);
        }
    }
}
