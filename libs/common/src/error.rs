//! Error types shared by the marketplace services
//!
//! `DatabaseError` covers pool setup, `StoreError` covers every storage
//! backend operation.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Error raised while configuring or connecting the PostgreSQL pool
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Error raised by a storage backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// A value the backend needs to complete the write was not supplied
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// A stored row could not be mapped back onto its entity
    #[error("Corrupt record in {entity}: {reason}")]
    Corrupt {
        entity: &'static str,
        reason: String,
    },

    /// A unique value is already taken
    #[error("{entity} with this {field} already exists")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
    },

    /// The underlying database rejected the operation
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    /// Any other backend failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_messages_name_the_field() {
        let err = StoreError::MissingField {
            field: "totalPrice",
        };
        assert_eq!(err.to_string(), "Missing required field: totalPrice");

        let err = StoreError::Corrupt {
            entity: "users",
            reason: "unknown role 'wizard'".to_string(),
        };
        assert!(err.to_string().contains("users"));

        let err = StoreError::Duplicate {
            entity: "User",
            field: "username",
        };
        assert_eq!(err.to_string(), "User with this username already exists");
    }
}
