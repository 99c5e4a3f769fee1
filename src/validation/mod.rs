// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Input validation for simulation runs.

use crate::config::{CoolingConfig, DampedFockConfig, ResourceLimits};
use crate::error::{Result, ValidationError};

/// Validate a Hilbert-space dimension against the configured limit.
pub fn validate_hilbert_dim(dim: usize, limits: &ResourceLimits) -> Result<()> {
    if dim == 0 {
        return Err(ValidationError::Field {
            field: "hilbert_dim".into(),
            message: "must be greater than 0".into(),
        }
        .into());
    }

    if dim > limits.max_hilbert_dim as usize {
        return Err(ValidationError::ResourceLimit {
            resource: "hilbert_dim".into(),
            limit: limits.max_hilbert_dim as u64,
            requested: dim as u64,
        }
        .into());
    }

    Ok(())
}

/// Validate the number of time-grid points.
pub fn validate_grid_size(points: usize, limits: &ResourceLimits) -> Result<()> {
    if points < 2 {
        return Err(ValidationError::Field {
            field: "grid".into(),
            message: format!("needs at least 2 points, got {}", points),
        }
        .into());
    }

    if points > limits.max_grid_points as usize {
        return Err(ValidationError::ResourceLimit {
            resource: "grid_points".into(),
            limit: limits.max_grid_points as u64,
            requested: points as u64,
        }
        .into());
    }

    Ok(())
}

/// Validate the number of spectrum frequencies.
pub fn validate_frequency_count(points: usize, limits: &ResourceLimits) -> Result<()> {
    if points > limits.max_frequency_points as usize {
        return Err(ValidationError::ResourceLimit {
            resource: "frequency_points".into(),
            limit: limits.max_frequency_points as u64,
            requested: points as u64,
        }
        .into());
    }
    Ok(())
}

/// Rates (κ, γ, ...) must be finite and non-negative.
pub fn validate_rate(name: &str, value: f64) -> Result<()> {
    validate_finite(name, value)?;
    if value < 0.0 {
        return Err(ValidationError::PhysicsConstraint(format!(
            "rate '{}' must be non-negative, got {}",
            name, value
        ))
        .into());
    }
    Ok(())
}

pub fn validate_finite(name: &str, value: f64) -> Result<()> {
    if value.is_nan() {
        return Err(ValidationError::Field {
            field: name.into(),
            message: "is NaN".into(),
        }
        .into());
    }
    if value.is_infinite() {
        return Err(ValidationError::Field {
            field: name.into(),
            message: "is infinite".into(),
        }
        .into());
    }
    Ok(())
}

/// Validate cavity-cooling parameters and their resource footprint.
pub fn validate_cooling(config: &CoolingConfig, limits: &ResourceLimits) -> Result<()> {
    validate_rate("cooling.gamma", config.gamma)?;
    validate_rate("cooling.kappa", config.kappa)?;
    validate_rate("cooling.omega_recoil", config.omega_recoil)?;
    for (name, value) in [
        ("cooling.coupling", config.coupling),
        ("cooling.delta_cavity", config.delta_cavity),
        ("cooling.delta_atom", config.delta_atom),
        ("cooling.pump", config.pump),
        ("cooling.x0", config.x0),
        ("cooling.p0", config.p0),
        ("cooling.tmax", config.tmax),
    ] {
        validate_finite(name, value)?;
    }
    // Mode ⊗ atom
    validate_hilbert_dim(config.cutoff.saturating_add(1).saturating_mul(2), limits)?;
    validate_grid_size(config.steps.saturating_add(1), limits)
}

/// Validate damped-Fock parameters and their resource footprint.
pub fn validate_damped_fock(config: &DampedFockConfig, limits: &ResourceLimits) -> Result<()> {
    validate_rate("damped_fock.kappa", config.kappa)?;
    validate_finite("damped_fock.delta", config.delta)?;
    if config.n > config.cutoff {
        return Err(ValidationError::Field {
            field: "damped_fock.n".into(),
            message: format!("photon number {} exceeds cutoff {}", config.n, config.cutoff),
        }
        .into());
    }
    validate_hilbert_dim(config.cutoff.saturating_add(1), limits)?;
    validate_finite("damped_fock.tau_max", config.tau_max)?;
    if !(config.dtau.is_finite() && config.dtau > 0.0) {
        return Err(ValidationError::Field {
            field: "damped_fock.dtau".into(),
            message: format!("must be positive, got {}", config.dtau),
        }
        .into());
    }
    // Counted in f64 so huge windows report a limit instead of overflowing
    let points = (config.tau_max / config.dtau).floor() + 1.0;
    if points > limits.max_grid_points as f64 {
        return Err(ValidationError::ResourceLimit {
            resource: "grid_points".into(),
            limit: limits.max_grid_points as u64,
            requested: points.min(u64::MAX as f64) as u64,
        }
        .into());
    }
    validate_grid_size(points.max(0.0) as usize, limits)?;
    validate_frequency_count(config.omega_points, limits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_validate_hilbert_dim() {
        let limits = ResourceLimits::default();
        assert!(validate_hilbert_dim(34, &limits).is_ok());
        assert!(validate_hilbert_dim(0, &limits).is_err());
        assert!(matches!(
            validate_hilbert_dim(65, &limits),
            Err(Error::Validation(ValidationError::ResourceLimit { .. }))
        ));
    }

    #[test]
    fn test_validate_grid_size() {
        let limits = ResourceLimits::default();
        assert!(validate_grid_size(20_001, &limits).is_ok());
        assert!(validate_grid_size(1, &limits).is_err());
        assert!(validate_grid_size(2_000_000, &limits).is_err());
    }

    #[test]
    fn test_validate_rate() {
        assert!(validate_rate("kappa", 0.5).is_ok());
        assert!(validate_rate("kappa", 0.0).is_ok());
        assert!(matches!(
            validate_rate("kappa", -0.1),
            Err(Error::Validation(ValidationError::PhysicsConstraint(_)))
        ));
        assert!(validate_rate("kappa", f64::NAN).is_err());
        assert!(validate_rate("kappa", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_default_scenarios() {
        let limits = ResourceLimits::default();
        assert!(validate_cooling(&CoolingConfig::default(), &limits).is_ok());
        assert!(validate_damped_fock(&DampedFockConfig::default(), &limits).is_ok());
    }

    #[test]
    fn test_validate_damped_fock_infinite_window() {
        let config = DampedFockConfig {
            tau_max: f64::INFINITY,
            ..DampedFockConfig::default()
        };
        assert!(matches!(
            validate_damped_fock(&config, &ResourceLimits::default()),
            Err(Error::Validation(ValidationError::Field { .. }))
        ));
    }

    #[test]
    fn test_validate_damped_fock_huge_window() {
        let config = DampedFockConfig {
            tau_max: 1e300,
            ..DampedFockConfig::default()
        };
        match validate_damped_fock(&config, &ResourceLimits::default()) {
            Err(Error::Validation(ValidationError::ResourceLimit {
                resource,
                limit,
                requested,
            })) => {
                assert_eq!(resource, "grid_points");
                assert_eq!(limit, 1_000_000);
                assert_eq!(requested, u64::MAX);
            }
            other => panic!("expected resource limit, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_cooling_saturates_on_extreme_sizes() {
        let config = CoolingConfig {
            cutoff: usize::MAX,
            steps: usize::MAX,
            ..CoolingConfig::default()
        };
        assert!(validate_cooling(&config, &ResourceLimits::default()).is_err());
    }

    #[test]
    fn test_validate_cooling_cutoff_limit() {
        let limits = ResourceLimits {
            max_hilbert_dim: 16,
            ..ResourceLimits::default()
        };
        let config = CoolingConfig {
            cutoff: 8,
            ..CoolingConfig::default()
        };
        assert!(validate_cooling(&config, &limits).is_err());
    }
}
