// ⚠️ Error types for the denomination calculator
//
// InvalidAmount is the only failure the core can produce. Remote covers the
// HTTP path used by the orchestration layer.

use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, DenominationError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DenominationError {
    /// Amount is negative, non-finite, unparsable or out of range
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Remote calculation failed (unreachable, timeout, non-2xx status)
    #[error("Remote calculation failed: {0}")]
    Remote(String),
}

impl DenominationError {
    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        DenominationError::InvalidAmount(reason.into())
    }

    pub fn remote(reason: impl Into<String>) -> Self {
        DenominationError::Remote(reason.into())
    }

    pub fn is_invalid_amount(&self) -> bool {
        matches!(self, DenominationError::InvalidAmount(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DenominationError::invalid_amount("amount must not be negative");
        assert_eq!(err.to_string(), "Invalid amount: amount must not be negative");
        assert!(err.is_invalid_amount());

        let err = DenominationError::remote("connection refused");
        assert_eq!(err.to_string(), "Remote calculation failed: connection refused");
        assert!(!err.is_invalid_amount());
    }
}
