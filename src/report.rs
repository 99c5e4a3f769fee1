// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Serializable run reports for the `cavity-sim` binary.

use std::io::Write;
use std::path::Path;

use num_complex::Complex64;
use serde::Serialize;

use crate::correlation::SpectrumMethod;
use crate::error::Result;
use crate::lindblad::Trajectory;
use crate::models::{CavityCooling, SpectrumComparison};

/// Time series from a cavity-cooling run.
#[derive(Debug, Clone, Serialize)]
pub struct CoolingReport {
    pub cutoff: usize,
    pub times: Vec<f64>,
    /// Position x(t) (units of 1/k)
    pub position: Vec<f64>,
    /// Momentum p(t) (units of ħk)
    pub momentum: Vec<f64>,
    /// ⟨a†a⟩(t)
    pub photon_number: Vec<f64>,
    /// ⟨σ⁺σ⁻⟩(t)
    pub excitation: Vec<f64>,
    pub max_trace_drift: f64,
    pub max_hermiticity_error: f64,
}

impl CoolingReport {
    pub fn from_trajectory(model: &CavityCooling, trajectory: &Trajectory) -> Result<Self> {
        let real = |values: Vec<Complex64>| -> Vec<f64> { values.into_iter().map(|z| z.re).collect() };
        let diagnostics = trajectory.diagnostics();
        Ok(Self {
            cutoff: model.params().cutoff,
            times: trajectory.times().to_vec(),
            position: real(trajectory.classical_component(0)?),
            momentum: real(trajectory.classical_component(1)?),
            photon_number: real(trajectory.expect(model.photon_number())?),
            excitation: real(trajectory.expect(model.excitation())?),
            max_trace_drift: diagnostics.iter().map(|d| d.trace_drift).fold(0.0, f64::max),
            max_hermiticity_error: diagnostics
                .iter()
                .map(|d| d.hermiticity_error)
                .fold(0.0, f64::max),
        })
    }
}

/// Damped-Fock spectrum against its closed form.
#[derive(Debug, Clone, Serialize)]
pub struct SpectrumReport {
    pub method: SpectrumMethod,
    pub tau_points: usize,
    pub dtau: f64,
    #[serde(flatten)]
    pub comparison: SpectrumComparison,
}

/// Write `report` as pretty JSON to `path`, or to stdout when `None`.
pub fn write_json<T: Serialize>(report: &T, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match path {
        Some(path) => std::fs::write(path, json + "\n")?,
        None => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", json)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoolingConfig;
    use crate::lindblad::Integrator;

    #[test]
    fn test_cooling_report_lengths() {
        let config = CoolingConfig {
            cutoff: 2,
            tmax: 0.5,
            steps: 5,
            ..CoolingConfig::default()
        };
        let model = CavityCooling::new(&config).unwrap();
        let traj = model.run(&Integrator::default()).unwrap();
        let report = CoolingReport::from_trajectory(&model, &traj).unwrap();

        assert_eq!(report.times.len(), 6);
        assert_eq!(report.position.len(), 6);
        assert_eq!(report.momentum.len(), 6);
        assert_eq!(report.photon_number.len(), 6);
        assert_eq!(report.position[0], std::f64::consts::SQRT_2);
    }

    #[test]
    fn test_write_json_to_file() {
        let config = CoolingConfig {
            cutoff: 1,
            tmax: 0.1,
            steps: 2,
            ..CoolingConfig::default()
        };
        let model = CavityCooling::new(&config).unwrap();
        let traj = model.run(&Integrator::default()).unwrap();
        let report = CoolingReport::from_trajectory(&model, &traj).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cooling.json");
        write_json(&report, Some(&path)).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["cutoff"], 1);
        assert_eq!(parsed["times"].as_array().unwrap().len(), 3);
    }
}
