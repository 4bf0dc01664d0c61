//! Error types for the banditry library.

use thiserror::Error;

/// Result type alias for bandit operations.
pub type Result<T> = std::result::Result<T, BanditError>;

/// Errors that can occur during bandit operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BanditError {
    /// The arm index is outside `0..narms`.
    #[error("arm {arm} out of range for {narms} arms")]
    ArmOutOfRange { arm: usize, narms: usize },

    /// No arms are available to select from.
    #[error("no arms available")]
    NoArmsAvailable,

    /// Invalid context dimensions.
    #[error("invalid context dimensions: expected {expected}, got {got}")]
    InvalidContextDimensions { expected: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// Numerical computation error.
    #[error("numerical error: {message}")]
    NumericalError { message: String },
}
