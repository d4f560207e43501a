// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for estimator operations

use beam_geometry::TrialField;
use thiserror::Error;

/// Result type alias for estimator operations
pub type Result<T> = std::result::Result<T, EstimatorError>;

/// Errors that can occur while setting up or running the estimator
#[derive(Debug, Error)]
pub enum EstimatorError {
    /// The host cannot provide parallel execution or a fine-grained timer
    #[error("Missing capability: {reason}")]
    MissingCapability {
        /// What is missing
        reason: String,
    },

    /// Configuration value rejected
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Reason for rejection
        reason: String,
    },

    /// A generated trial parameter fell outside its range
    #[error("Generated {field} = {value} outside [{min}, {max}]")]
    OutOfRange {
        /// Offending field
        field: TrialField,
        /// Value produced
        value: f32,
        /// Inclusive lower bound
        min: f32,
        /// Inclusive upper bound
        max: f32,
    },
}

impl EstimatorError {
    /// Create a missing capability error
    pub fn missing_capability(reason: impl Into<String>) -> Self {
        Self::MissingCapability {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl From<beam_geometry::RangeViolation> for EstimatorError {
    fn from(v: beam_geometry::RangeViolation) -> Self {
        let (min, max) = v.field.range();
        Self::OutOfRange {
            field: v.field,
            value: v.value,
            min,
            max,
        }
    }
}
