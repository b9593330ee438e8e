//! # Persistence Errors
//!
//! Error types for the persistence layer, wrapping sqlx errors.

use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    // === Database errors ===
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A compare-and-set write found the row changed since it was read
    #[error("Stale write: {entity} {id} was modified concurrently")]
    StaleWrite { entity: String, id: String },

    /// SQLite gave up waiting for a lock held by another connection
    #[error("Database busy: {0}")]
    Busy(String),

    // === Conversion errors ===
    #[error("Invalid decimal value: {0}")]
    InvalidDecimal(String),

    #[error("Invalid UUID value: {0}")]
    InvalidUuid(String),

    #[error("Invalid enum value: {field} = {value}")]
    InvalidEnumValue { field: String, value: String },
}

/// Result type alias for PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// SQLITE_BUSY, SQLITE_LOCKED and their extended codes
const LOCK_CODES: &[&str] = &["5", "6", "261", "262", "517"];

impl From<sqlx::Error> for PersistenceError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().is_some_and(|code| LOCK_CODES.contains(&code.as_ref())) {
                return Self::Busy(db_err.message().to_string());
            }
        }
        Self::Database(err)
    }
}

impl PersistenceError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn stale_write(entity: &str, id: &str) -> Self {
        Self::StaleWrite {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn invalid_enum(field: &str, value: &str) -> Self {
        Self::InvalidEnumValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Classify a write error, lifting UNIQUE failures out of the generic
    /// database variant.
    pub fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::UniqueViolation(db_err.message().to_string());
            }
        }
        Self::from(err)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Lost a race with another writer; retrying may succeed
    pub fn is_contention(&self) -> bool {
        matches!(self, Self::StaleWrite { .. } | Self::Busy(_))
    }

    pub fn is_database_error(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}
