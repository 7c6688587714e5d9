//! Custom error types for the common library
//!
//! This module defines the database error taxonomy shared by every service.
//! Driver errors are classified once here so that services can react to
//! constraint violations without inspecting error text.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {}", constraint.as_deref().unwrap_or("unknown"))]
    UniqueViolation {
        /// Name of the violated constraint, when the driver reports it
        constraint: Option<String>,
    },

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Classify an error returned while executing a statement
    pub fn from_query(err: SqlxError) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return DatabaseError::UniqueViolation {
                    constraint: db_err.constraint().map(str::to_owned),
                };
            }
        }

        DatabaseError::Query(err)
    }

    /// Whether the error was raised by the named unique constraint
    pub fn violates(&self, name: &str) -> bool {
        matches!(
            self,
            DatabaseError::UniqueViolation { constraint: Some(c) } if c == name
        )
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
