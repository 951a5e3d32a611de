//! Error types for edusim.
//!
//! Out-of-range parameter values are clamped rather than rejected, and a
//! missing render surface is not an error. What remains: unknown parameter
//! names, NaN inputs, host capability gaps and configuration loading failures.

use thiserror::Error;

/// Result type alias for edusim operations.
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for all edusim operations.
#[derive(Debug, Error)]
pub enum SimError {
    // ===== Parameter Errors =====
    /// A parameter name not declared by the model.
    #[error("Unknown parameter '{name}' for model '{model}'")]
    UnknownParameter {
        /// Model that rejected the name.
        model: String,
        /// Requested parameter name.
        name: String,
    },

    /// A parameter value that cannot be clamped (NaN or infinite).
    #[error("Invalid value {value} for parameter '{name}'")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Offending value.
        value: f64,
    },

    // ===== Host Errors =====
    /// The host cannot provide a facility the model needs to run on its own.
    #[error("Host capability missing: {capability}")]
    CapabilityMissing {
        /// Name of the missing capability.
        capability: String,
    },

    // ===== Stop-on-Anomaly =====
    /// Model state became NaN or infinite after a step.
    #[error("Non-finite state detected in model '{model}'")]
    NonFiniteState {
        /// Model whose state diverged.
        model: String,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SimError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create an unknown-parameter error.
    #[must_use]
    pub fn unknown_parameter(model: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownParameter {
            model: model.into(),
            name: name.into(),
        }
    }

    /// Create a capability-missing error.
    #[must_use]
    pub fn capability_missing(capability: impl Into<String>) -> Self {
        Self::CapabilityMissing {
            capability: capability.into(),
        }
    }

    /// Whether the hosting page can carry on after this error.
    ///
    /// Only configuration loading failures are fatal, and only at startup.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnknownParameter { .. }
                | Self::InvalidParameter { .. }
                | Self::CapabilityMissing { .. }
                | Self::NonFiniteState { .. }
        )
    }
}
