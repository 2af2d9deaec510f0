//! Error types for spatial and transform operations.

use thiserror::Error;

/// Error type for field evaluation and transform construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A parameter vector does not match the declared parameter count of a
    /// transformation space.
    #[error("parameter count mismatch: expected {expected}, got {actual}")]
    ParameterCountMismatch { expected: usize, actual: usize },

    /// A point lies outside the evaluable domain of a field.
    #[error("point {point:?} lies outside the evaluable domain")]
    OutsideDomain { point: Vec<f64> },

    /// Grid data does not match the declared image shape.
    #[error("invalid shape: expected {expected} samples, got {actual}")]
    InvalidShape { expected: usize, actual: usize },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create a parameter count mismatch error.
    pub fn parameter_count(expected: usize, actual: usize) -> Self {
        Self::ParameterCountMismatch { expected, actual }
    }

    /// Create an out-of-domain error for the given point coordinates.
    pub fn outside_domain(point: &[f64]) -> Self {
        Self::OutsideDomain {
            point: point.to_vec(),
        }
    }
}
