//! # Error Module
//!
//! Domain errors for Bankoffice using thiserror.

use rust_decimal::Decimal;
use thiserror::Error;

/// Core domain errors.
///
/// Pure business-rule failures, independent of storage or transport.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    // === Money errors ===
    #[error("Insufficient funds: need {needed}, available {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    // === Identifier errors ===
    #[error("Invalid IBAN: {0}")]
    InvalidIban(String),

    #[error("Invalid ID format: {0}")]
    InvalidIdFormat(String),

    #[error("Invalid enum value: {field} = {value}")]
    InvalidEnumValue { field: String, value: String },
}

/// Result type alias with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn invalid_enum(field: &str, value: &str) -> Self {
        Self::InvalidEnumValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Check whether this is an insufficient funds error
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, CoreError::InsufficientFunds { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = CoreError::InsufficientFunds {
            needed: dec!(1000),
            available: dec!(500),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: need 1000, available 500"
        );
        assert!(err.is_insufficient_funds());

        let err = CoreError::invalid_enum("role", "ROOT");
        assert_eq!(err.to_string(), "Invalid enum value: role = ROOT");
        assert!(!err.is_insufficient_funds());
    }
}
