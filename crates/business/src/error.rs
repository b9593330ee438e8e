//! Business layer errors
//!
//! One variant per failure class the outer surface distinguishes. Core and
//! persistence errors are folded into these at the service boundary.

use bankoffice_core::CoreError;
use bankoffice_persistence::PersistenceError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Business operation errors
#[derive(Debug, Error)]
pub enum BusinessError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("Insufficient funds: need {needed}, available {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    /// Login or token failure
    #[error("{0}")]
    Unauthorized(String),

    // === Internal faults ===
    #[error("Storage error: {0}")]
    Storage(PersistenceError),
}

/// Coarse classification, for mapping to exit codes or status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    Conflict,
    InvalidRequest,
    InvalidState,
    InsufficientFunds,
    Unauthorized,
    Internal,
}

/// Result type alias for business operations
pub type BusinessResult<T> = Result<T, BusinessError>;

impl BusinessError {
    /// `"<entity> not found"`
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }

    pub fn forbidden(reason: &str) -> Self {
        Self::Forbidden(reason.to_string())
    }

    pub fn conflict(message: &str) -> Self {
        Self::Conflict(message.to_string())
    }

    pub fn invalid_request(message: &str) -> Self {
        Self::InvalidRequest(message.to_string())
    }

    pub fn invalid_state(message: &str) -> Self {
        Self::InvalidState(message.to_string())
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::Unauthorized(message.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Storage(_) => ErrorKind::Internal,
        }
    }

    /// Everything except storage faults is the caller's to fix
    pub fn is_client_error(&self) -> bool {
        self.kind() != ErrorKind::Internal
    }
}

impl From<CoreError> for BusinessError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientFunds { needed, available } => {
                Self::InsufficientFunds { needed, available }
            }
            other => Self::InvalidRequest(other.to_string()),
        }
    }
}

impl From<PersistenceError> for BusinessError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { entity, .. } => Self::not_found(&entity),
            PersistenceError::UniqueViolation(message) => Self::Conflict(message),
            PersistenceError::StaleWrite { .. } => Self::conflict("concurrent balance update"),
            PersistenceError::Busy(_) => Self::conflict("database busy, try again"),
            other => Self::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_core_errors_map_to_client_errors() {
        let err: BusinessError = CoreError::InsufficientFunds {
            needed: dec!(100),
            available: dec!(50),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        assert!(err.to_string().contains("need 100"));

        let err: BusinessError = CoreError::InvalidAmount("Amount must be positive: 0".into()).into();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(err.is_client_error());
    }

    #[test]
    fn test_persistence_errors_classified() {
        let err: BusinessError = PersistenceError::not_found("Card", "x").into();
        assert_eq!(err.to_string(), "Card not found");

        let err: BusinessError = PersistenceError::stale_write("Account", "x").into();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.to_string(), "concurrent balance update");

        let err: BusinessError = PersistenceError::Busy("database is locked".into()).into();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(err.is_client_error());

        let err: BusinessError = PersistenceError::InvalidUuid("zz".into()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(!err.is_client_error());
    }
}
