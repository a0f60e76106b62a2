//! Error types for the fairplay engine
//!
//! Every failure is a caller-input or lookup error: deterministic for the same
//! input, never retried internally, and raised before any draw is consumed.

use thiserror::Error;

/// Root error type for engine operations
#[derive(Debug, Error)]
pub enum FairplayError {
    #[error("Client seed must be a non-empty string")]
    InvalidClientSeed,

    #[error("Invalid nonce: {0}")]
    InvalidNonce(String),

    #[error("Invalid parameter '{field}': {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Invalid bet amount: {0}")]
    InvalidBetAmount(String),

    #[error("Round {0} not found")]
    RoundNotFound(String),

    #[error("Round {0} has already been revealed and accepts no further bets")]
    RoundRevealed(String),

    #[error("Round {0} has not been revealed; raw draws are only available after reveal")]
    RoundNotRevealed(String),

    #[error("Round store error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Missing required field: {0}")]
    MissingRequired(String),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl FairplayError {
    /// Shorthand for per-game out-of-range input
    pub fn invalid_parameter(field: &str, reason: impl Into<String>) -> Self {
        FairplayError::InvalidParameter {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code, shared by the HTTP layer and logs
    pub fn code(&self) -> &'static str {
        match self {
            FairplayError::InvalidClientSeed => "INVALID_CLIENT_SEED",
            FairplayError::InvalidNonce(_) => "INVALID_NONCE",
            FairplayError::InvalidParameter { .. } => "INVALID_PARAMETER",
            FairplayError::InvalidBetAmount(_) => "INVALID_BET_AMOUNT",
            FairplayError::RoundNotFound(_) => "ROUND_NOT_FOUND",
            FairplayError::RoundRevealed(_) => "ROUND_REVEALED",
            FairplayError::RoundNotRevealed(_) => "ROUND_NOT_REVEALED",
            FairplayError::Storage(_) => "STORAGE_ERROR",
            FairplayError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

/// Convenience type alias for Results
pub type FairplayResult<T> = Result<T, FairplayError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_error_display() {
        let err = FairplayError::invalid_parameter("target", "must be between 2 and 12");
        assert!(err.to_string().contains("target"));
        assert!(err.to_string().contains("between 2 and 12"));
        assert_eq!(err.code(), "INVALID_PARAMETER");
    }

    #[test]
    fn test_error_conversion() {
        let config_error = ConfigurationError::MissingRequired("slots.symbols".to_string());
        let err: FairplayError = config_error.into();

        match err {
            FairplayError::Configuration(_) => {}
            _ => panic!("Expected configuration error"),
        }
        assert!(err.source().is_some());
    }

    #[test]
    fn test_round_errors_carry_id() {
        let err = FairplayError::RoundNotFound("nonexistent-id".to_string());
        assert!(err.to_string().contains("nonexistent-id"));
        assert_eq!(err.code(), "ROUND_NOT_FOUND");

        let err = FairplayError::RoundNotRevealed("r-1".to_string());
        assert!(err.to_string().contains("r-1"));
        assert_eq!(err.code(), "ROUND_NOT_REVEALED");
    }
}
