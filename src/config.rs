// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. config.yaml file
//! 3. Environment variables (CAVITYSIM_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

use crate::correlation::SpectrumMethod;
use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// ODE solver settings
    #[serde(default)]
    pub solver: SolverConfig,

    /// Spectrum transform settings
    #[serde(default)]
    pub spectrum: SpectrumConfig,

    /// Semiclassical cavity-cooling scenario
    #[serde(default)]
    pub cooling: CoolingConfig,

    /// Damped Fock-state correlation scenario
    #[serde(default)]
    pub damped_fock: DampedFockConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Validation settings
    #[serde(default)]
    pub validation: ValidationConfig,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                config = serde_yaml::from_str(&content)?;
            }
        } else {
            for path in &["config.yaml", "config.yml", "/etc/cavity-sim/config.yaml"] {
                let path = Path::new(path);
                if path.exists() {
                    let content = std::fs::read_to_string(path)?;
                    config = serde_yaml::from_str(&content)?;
                    break;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("CAVITYSIM_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("CAVITYSIM_LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("CAVITYSIM_SOLVER_METHOD") {
            if let Ok(method) = val.parse() {
                self.solver.method = method;
            }
        }
        if let Ok(val) = env::var("CAVITYSIM_RTOL") {
            if let Ok(rtol) = val.parse() {
                self.solver.rtol = rtol;
            }
        }
        if let Ok(val) = env::var("CAVITYSIM_ATOL") {
            if let Ok(atol) = val.parse() {
                self.solver.atol = atol;
            }
        }
        if let Ok(val) = env::var("CAVITYSIM_COOLING_CUTOFF") {
            if let Ok(cutoff) = val.parse() {
                self.cooling.cutoff = cutoff;
            }
        }
        if let Ok(val) = env::var("CAVITYSIM_FOCK_CUTOFF") {
            if let Ok(cutoff) = val.parse() {
                self.damped_fock.cutoff = cutoff;
            }
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        self.solver.validate()?;

        if self.spectrum.points < 2 {
            return Err(Error::Config("spectrum.points must be >= 2".into()));
        }

        if self.cooling.cutoff == 0 {
            return Err(Error::Config("cooling.cutoff must be >= 1".into()));
        }
        if self.cooling.steps == 0 {
            return Err(Error::Config("cooling.steps must be > 0".into()));
        }
        if !(self.cooling.tmax.is_finite() && self.cooling.tmax > 0.0) {
            return Err(Error::Config("cooling.tmax must be finite and > 0".into()));
        }

        let fock = &self.damped_fock;
        if fock.n > fock.cutoff {
            return Err(Error::Config(format!(
                "damped_fock.n ({}) must not exceed damped_fock.cutoff ({})",
                fock.n, fock.cutoff
            )));
        }
        if !fock.tau_max.is_finite() || fock.dtau <= 0.0 || fock.tau_max <= fock.dtau {
            return Err(Error::Config(
                "damped_fock requires 0 < dtau < tau_max".into(),
            ));
        }
        if fock.omega_points < 2 || fock.omega_max <= fock.omega_min {
            return Err(Error::Config(
                "damped_fock frequency window needs omega_min < omega_max and >= 2 points".into(),
            ));
        }

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(Error::Config(format!(
                "logging.format must be 'json' or 'pretty', got '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }
}

/// Explicit Runge–Kutta scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverMethod {
    /// Adaptive Dormand–Prince 5(4)
    #[default]
    Dopri5,
    /// Classical fixed-step RK4
    Rk4,
}

impl FromStr for SolverMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dopri5" => Ok(SolverMethod::Dopri5),
            "rk4" => Ok(SolverMethod::Rk4),
            other => Err(Error::Config(format!("unknown solver method '{}'", other))),
        }
    }
}

/// ODE solver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Integration scheme
    #[serde(default)]
    pub method: SolverMethod,

    /// Relative local error tolerance (adaptive only)
    #[serde(default = "default_rtol")]
    pub rtol: f64,

    /// Absolute local error tolerance (adaptive only)
    #[serde(default = "default_atol")]
    pub atol: f64,

    /// First trial step; estimated from the initial derivative when unset
    #[serde(default)]
    pub initial_step: Option<f64>,

    /// Step-size floor; a smaller required step is an integration error
    #[serde(default = "default_min_step")]
    pub min_step: f64,

    /// Maximum number of attempted steps per run
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// RK4 sub-steps per grid interval
    #[serde(default = "default_rk4_substeps")]
    pub rk4_substeps: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            method: SolverMethod::Dopri5,
            rtol: default_rtol(),
            atol: default_atol(),
            initial_step: None,
            min_step: default_min_step(),
            max_steps: default_max_steps(),
            rk4_substeps: default_rk4_substeps(),
        }
    }
}

impl SolverConfig {
    /// Fixed-step RK4 with `substeps` sub-steps per grid interval.
    pub fn rk4(substeps: usize) -> Self {
        Self {
            method: SolverMethod::Rk4,
            rk4_substeps: substeps,
            ..Self::default()
        }
    }

    /// Adaptive Dormand–Prince with the given tolerances.
    pub fn dopri5(rtol: f64, atol: f64) -> Self {
        Self {
            method: SolverMethod::Dopri5,
            rtol,
            atol,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.rtol.is_finite() && self.rtol > 0.0) {
            return Err(Error::Config("solver.rtol must be > 0".into()));
        }
        if !(self.atol.is_finite() && self.atol > 0.0) {
            return Err(Error::Config("solver.atol must be > 0".into()));
        }
        if !(self.min_step.is_finite() && self.min_step > 0.0) {
            return Err(Error::Config("solver.min_step must be > 0".into()));
        }
        if let Some(h) = self.initial_step {
            if !(h.is_finite() && h > 0.0) {
                return Err(Error::Config("solver.initial_step must be > 0".into()));
            }
        }
        if self.max_steps == 0 {
            return Err(Error::Config("solver.max_steps must be > 0".into()));
        }
        if self.rk4_substeps == 0 {
            return Err(Error::Config("solver.rk4_substeps must be > 0".into()));
        }
        Ok(())
    }
}

fn default_rtol() -> f64 {
    1e-6
}

fn default_atol() -> f64 {
    1e-8
}

fn default_min_step() -> f64 {
    1e-12
}

fn default_max_steps() -> usize {
    1_000_000
}

fn default_rk4_substeps() -> usize {
    10
}

/// Spectrum transform configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectrumConfig {
    /// Quadrature rule
    #[serde(default)]
    pub method: SpectrumMethod,

    /// Number of frequencies in the default (Nyquist-band) grid
    #[serde(default = "default_spectrum_points")]
    pub points: usize,

    /// Divide by the peak value
    #[serde(default = "default_true")]
    pub normalize: bool,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            method: SpectrumMethod::default(),
            points: default_spectrum_points(),
            normalize: true,
        }
    }
}

fn default_spectrum_points() -> usize {
    1001
}

fn default_true() -> bool {
    true
}

/// Semiclassical cavity-cooling parameters (rates in units of γ).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoolingConfig {
    /// Fock-space cutoff Nc
    #[serde(default = "default_cooling_cutoff")]
    pub cutoff: usize,
    /// Atomic decay rate γ
    #[serde(default = "default_one")]
    pub gamma: f64,
    /// Atom–cavity coupling g
    #[serde(default = "default_coupling")]
    pub coupling: f64,
    /// Cavity field decay rate κ
    #[serde(default = "default_kappa")]
    pub kappa: f64,
    /// Recoil frequency ωr
    #[serde(default = "default_recoil")]
    pub omega_recoil: f64,
    /// Cavity detuning Δc
    #[serde(default = "default_delta_c")]
    pub delta_cavity: f64,
    /// Atomic detuning Δa
    #[serde(default = "default_delta_a")]
    pub delta_atom: f64,
    /// Laser pump strength η
    #[serde(default = "default_one")]
    pub pump: f64,
    /// Initial position x0 (units of 1/k)
    #[serde(default = "default_x0")]
    pub x0: f64,
    /// Initial momentum p0 (units of ħk)
    #[serde(default = "default_p0")]
    pub p0: f64,
    /// Final time
    #[serde(default = "default_cooling_tmax")]
    pub tmax: f64,
    /// Number of grid intervals
    #[serde(default = "default_cooling_steps")]
    pub steps: usize,
}

impl Default for CoolingConfig {
    fn default() -> Self {
        Self {
            cutoff: default_cooling_cutoff(),
            gamma: default_one(),
            coupling: default_coupling(),
            kappa: default_kappa(),
            omega_recoil: default_recoil(),
            delta_cavity: default_delta_c(),
            delta_atom: default_delta_a(),
            pump: default_one(),
            x0: default_x0(),
            p0: default_p0(),
            tmax: default_cooling_tmax(),
            steps: default_cooling_steps(),
        }
    }
}

fn default_cooling_cutoff() -> usize {
    16
}

fn default_one() -> f64 {
    1.0
}

fn default_coupling() -> f64 {
    0.5
}

fn default_kappa() -> f64 {
    0.5
}

fn default_recoil() -> f64 {
    0.15
}

fn default_delta_c() -> f64 {
    -1.0
}

fn default_delta_a() -> f64 {
    -2.0
}

fn default_x0() -> f64 {
    std::f64::consts::SQRT_2
}

fn default_p0() -> f64 {
    7.0
}

fn default_cooling_tmax() -> f64 {
    20.0
}

fn default_cooling_steps() -> usize {
    200
}

/// Damped Fock-state correlation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DampedFockConfig {
    /// Fock-space cutoff
    #[serde(default = "default_fock_cutoff")]
    pub cutoff: usize,
    /// Initial photon number n
    #[serde(default = "default_fock_n")]
    pub n: usize,
    /// Field decay rate κ
    #[serde(default = "default_one")]
    pub kappa: f64,
    /// Detuning Δ (H = −Δ a†a)
    #[serde(default = "default_fock_delta")]
    pub delta: f64,
    /// Correlation time step
    #[serde(default = "default_dtau")]
    pub dtau: f64,
    /// Correlation time window
    #[serde(default = "default_tau_max")]
    pub tau_max: f64,
    /// Lower edge of the reported frequency window
    #[serde(default = "default_omega_min")]
    pub omega_min: f64,
    /// Upper edge of the reported frequency window
    #[serde(default)]
    pub omega_max: f64,
    /// Frequencies in the reported window
    #[serde(default = "default_omega_points")]
    pub omega_points: usize,
}

impl Default for DampedFockConfig {
    fn default() -> Self {
        Self {
            cutoff: default_fock_cutoff(),
            n: default_fock_n(),
            kappa: default_one(),
            delta: default_fock_delta(),
            dtau: default_dtau(),
            tau_max: default_tau_max(),
            omega_min: default_omega_min(),
            omega_max: 0.0,
            omega_points: default_omega_points(),
        }
    }
}

fn default_fock_cutoff() -> usize {
    6
}

fn default_fock_n() -> usize {
    4
}

fn default_fock_delta() -> f64 {
    5.0
}

fn default_dtau() -> f64 {
    0.05
}

fn default_tau_max() -> f64 {
    1000.0
}

fn default_omega_min() -> f64 {
    -10.0
}

fn default_omega_points() -> usize {
    201
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

/// Validation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Resource limits
    #[serde(default)]
    pub limits: ResourceLimits,
}

/// Resource limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Maximum Hilbert space dimension
    #[serde(default = "default_max_hilbert_dim")]
    pub max_hilbert_dim: u32,

    /// Maximum number of time-grid points
    #[serde(default = "default_max_grid_points")]
    pub max_grid_points: u32,

    /// Maximum number of spectrum frequencies
    #[serde(default = "default_max_frequency_points")]
    pub max_frequency_points: u32,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_hilbert_dim: default_max_hilbert_dim(),
            max_grid_points: default_max_grid_points(),
            max_frequency_points: default_max_frequency_points(),
        }
    }
}

fn default_max_hilbert_dim() -> u32 {
    64
}

fn default_max_grid_points() -> u32 {
    1_000_000
}

fn default_max_frequency_points() -> u32 {
    100_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.solver.method, SolverMethod::Dopri5);
        assert_eq!(config.cooling.cutoff, 16);
        assert_eq!(config.damped_fock.n, 4);
        assert_eq!(config.spectrum.points, 1001);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut bad = Config::default();
        bad.solver.rtol = 0.0;
        assert!(bad.validate().is_err());

        let mut bad = Config::default();
        bad.damped_fock.n = 10;
        let msg = bad.validate().unwrap_err().to_string();
        assert!(msg.contains("cutoff"));

        let mut bad = Config::default();
        bad.logging.format = "xml".into();
        assert!(bad.validate().is_err());

        let mut bad = Config::default();
        bad.damped_fock.tau_max = f64::INFINITY;
        assert!(matches!(bad.validate(), Err(Error::Config(_))));

        let mut bad = Config::default();
        bad.cooling.tmax = f64::INFINITY;
        assert!(matches!(bad.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_config_load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"
solver:
  method: rk4
  rk4_substeps: 4
cooling:
  cutoff: 4
  tmax: 1.0
  steps: 10
"#
        )
        .unwrap();

        let config = Config::load(Some(f.path())).unwrap();
        assert_eq!(config.solver.method, SolverMethod::Rk4);
        assert_eq!(config.solver.rk4_substeps, 4);
        assert_eq!(config.cooling.cutoff, 4);
        assert_eq!(config.cooling.steps, 10);
        // Untouched fields keep their defaults
        assert_eq!(config.cooling.p0, 7.0);
        assert_eq!(config.damped_fock.delta, 5.0);
    }

    #[test]
    fn test_config_load_nonexistent_file() {
        let path = std::path::Path::new("/tmp/does_not_exist_cavity_sim_test.yaml");
        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.damped_fock.cutoff, 6);
    }

    #[test]
    fn test_config_load_invalid_yaml() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "{{{{not: valid: yaml::::").unwrap();
        assert!(Config::load(Some(f.path())).is_err());
    }

    #[test]
    fn test_env_override_solver() {
        let mut config = Config::default();
        std::env::set_var("CAVITYSIM_SOLVER_METHOD", "RK4");
        std::env::set_var("CAVITYSIM_RTOL", "1e-9");
        config.apply_env_overrides();
        assert_eq!(config.solver.method, SolverMethod::Rk4);
        assert_eq!(config.solver.rtol, 1e-9);
        std::env::remove_var("CAVITYSIM_SOLVER_METHOD");
        std::env::remove_var("CAVITYSIM_RTOL");
    }

    #[test]
    fn test_env_override_log_level() {
        let mut config = Config::default();
        std::env::set_var("CAVITYSIM_LOG_LEVEL", "debug");
        config.apply_env_overrides();
        assert_eq!(config.logging.level, "debug");
        std::env::remove_var("CAVITYSIM_LOG_LEVEL");
    }

    #[test]
    fn test_solver_method_from_str() {
        assert_eq!("dopri5".parse::<SolverMethod>().unwrap(), SolverMethod::Dopri5);
        assert!("euler".parse::<SolverMethod>().is_err());
    }

    #[test]
    fn test_resource_limits_defaults() {
        let limits = ResourceLimits::default();
        assert_eq!(limits.max_hilbert_dim, 64);
        assert_eq!(limits.max_grid_points, 1_000_000);
        assert_eq!(limits.max_frequency_points, 100_000);
    }
}
