//! Error types for registration operations.

use rreg_core::CoreError;
use thiserror::Error;

/// Main error type for registration operations.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Error from field evaluation or transform construction; carries
    /// parameter-count mismatches and out-of-domain sample points.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A sampler was configured with a non-positive point count.
    #[error("invalid sample count: {0}")]
    InvalidSampleCount(usize),

    /// Invalid metric or optimizer configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for registration operations.
pub type Result<T> = std::result::Result<T, RegistrationError>;

impl RegistrationError {
    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}
