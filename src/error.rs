// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the simulation engine.

use std::fmt;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Engine error types.
#[derive(Debug)]
pub enum Error {
    /// Operator/state dimension mismatch
    Shape {
        context: String,
        expected: usize,
        actual: usize,
    },
    /// Same dimension, incompatible basis ordering
    Composition { expected: String, actual: String },
    /// Solver failure; `time` is the last successfully reached time
    Integration { time: f64, reason: String },
    /// Cooperative cancellation observed between steps
    Cancelled { time: f64 },
    /// Series too short for the requested analysis
    InsufficientData { len: usize, required: usize },
    /// Malformed or non-uniform time grid
    Grid(String),
    /// Input validation error
    Validation(ValidationError),
    /// Configuration error
    Config(String),
    /// IO error
    Io(std::io::Error),
    /// Serialization error
    Serialization(String),
}

impl Error {
    /// Shorthand for a [`Error::Shape`] error.
    pub fn shape(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Error::Shape {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Shorthand for an [`Error::Integration`] error.
    pub fn integration(time: f64, reason: impl Into<String>) -> Self {
        Error::Integration {
            time,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Shape {
                context,
                expected,
                actual,
            } => write!(
                f,
                "Shape error in {}: expected dimension {}, got {}",
                context, expected, actual
            ),
            Error::Composition { expected, actual } => write!(
                f,
                "Composition error: expected basis {}, got {}",
                expected, actual
            ),
            Error::Integration { time, reason } => {
                write!(f, "Integration error at t={}: {}", time, reason)
            }
            Error::Cancelled { time } => write!(f, "Integration cancelled at t={}", time),
            Error::InsufficientData { len, required } => write!(
                f,
                "Insufficient data: series has {} points, at least {} required",
                len, required
            ),
            Error::Grid(msg) => write!(f, "Grid error: {}", msg),
            Error::Validation(e) => write!(f, "Validation error: {}", e),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Validation(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Validation errors.
#[derive(Debug)]
pub enum ValidationError {
    /// Field validation failed
    Field { field: String, message: String },
    /// Physics constraint violated
    PhysicsConstraint(String),
    /// Resource limit exceeded
    ResourceLimit {
        resource: String,
        limit: u64,
        requested: u64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Field { field, message } => {
                write!(f, "Field '{}': {}", field, message)
            }
            ValidationError::PhysicsConstraint(msg) => {
                write!(f, "Physics constraint violated: {}", msg)
            }
            ValidationError::ResourceLimit {
                resource,
                limit,
                requested,
            } => {
                write!(
                    f,
                    "Resource limit exceeded for {}: limit={}, requested={}",
                    resource, limit, requested
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    // =========================================================================
    // Error Display tests
    // =========================================================================

    #[test]
    fn test_error_display_shape() {
        let e = Error::shape("operator product", 4, 6);
        assert_eq!(
            e.to_string(),
            "Shape error in operator product: expected dimension 4, got 6"
        );
    }

    #[test]
    fn test_error_display_composition() {
        let e = Error::Composition {
            expected: "Fock(3) ⊗ Spin".into(),
            actual: "Spin ⊗ Fock(3)".into(),
        };
        assert_eq!(
            e.to_string(),
            "Composition error: expected basis Fock(3) ⊗ Spin, got Spin ⊗ Fock(3)"
        );
    }

    #[test]
    fn test_error_display_integration_carries_time() {
        let e = Error::integration(0.25, "step size underflow");
        assert_eq!(e.to_string(), "Integration error at t=0.25: step size underflow");
    }

    #[test]
    fn test_error_display_cancelled() {
        let e = Error::Cancelled { time: 1.5 };
        assert_eq!(e.to_string(), "Integration cancelled at t=1.5");
    }

    #[test]
    fn test_error_display_insufficient_data() {
        let e = Error::InsufficientData {
            len: 1,
            required: 2,
        };
        assert_eq!(
            e.to_string(),
            "Insufficient data: series has 1 points, at least 2 required"
        );
    }

    #[test]
    fn test_error_display_grid() {
        let e = Error::Grid("not uniform".into());
        assert_eq!(e.to_string(), "Grid error: not uniform");
    }

    #[test]
    fn test_error_display_config() {
        let e = Error::Config("rtol must be > 0".into());
        assert_eq!(e.to_string(), "Configuration error: rtol must be > 0");
    }

    #[test]
    fn test_error_display_io() {
        let e = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(e.to_string(), "IO error: gone");
    }

    // =========================================================================
    // ValidationError Display tests
    // =========================================================================

    #[test]
    fn test_validation_error_display_field() {
        let e = ValidationError::Field {
            field: "cutoff".into(),
            message: "must be >= 1".into(),
        };
        assert_eq!(e.to_string(), "Field 'cutoff': must be >= 1");
    }

    #[test]
    fn test_validation_error_display_physics_constraint() {
        let e = ValidationError::PhysicsConstraint("negative decay rate".into());
        assert_eq!(
            e.to_string(),
            "Physics constraint violated: negative decay rate"
        );
    }

    #[test]
    fn test_validation_error_display_resource_limit() {
        let e = ValidationError::ResourceLimit {
            resource: "hilbert_dim".into(),
            limit: 64,
            requested: 128,
        };
        assert_eq!(
            e.to_string(),
            "Resource limit exceeded for hilbert_dim: limit=64, requested=128"
        );
    }

    // =========================================================================
    // Error::source() and From impls
    // =========================================================================

    #[test]
    fn test_error_source() {
        assert!(Error::Io(std::io::Error::other("disk")).source().is_some());
        assert!(
            Error::Validation(ValidationError::PhysicsConstraint("x".into()))
                .source()
                .is_some()
        );
        assert!(Error::Grid("x".into()).source().is_none());
        assert!(Error::integration(0.0, "x").source().is_none());
    }

    #[test]
    fn test_from_validation_error() {
        let e: Error = ValidationError::PhysicsConstraint("x".into()).into();
        assert!(matches!(e, Error::Validation(_)));
    }

    #[test]
    fn test_from_serde_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("{{{{").unwrap_err();
        let e: Error = yaml_err.into();
        assert!(matches!(e, Error::Serialization(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad}").unwrap_err();
        let e: Error = json_err.into();
        assert!(matches!(e, Error::Serialization(_)));
    }
}
