//! # Database Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError (readlog-core)      SQLite Error (sqlx::Error)        │
//! │       │  missing field, bad number,        │                            │
//! │       │  duplicate isbn/title              │                            │
//! │       ▼                                    ▼                            │
//! │  DbError (this module) ← one type for every repository failure         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (apps/web) ← 404 / 409 / 422 / 500                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use readlog_core::ValidationError;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - Editing a book whose ISBN does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Submitted data was rejected before touching storage.
    ///
    /// ## When This Occurs
    /// - Blank isbn/title/author, malformed number, rating out of range
    /// - ISBN or title already used by another book
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unique constraint violation reported by SQLite itself.
    ///
    /// ## When This Occurs
    /// - Two concurrent adds of the same ISBN both passed the existence
    ///   check; the PRIMARY KEY rejects the second insert
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// CHECK constraint violation (rating outside 1..5 slipped past validation).
    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created or opened
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema creation failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// True for outcomes caused by the submitted data rather than storage.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DbError::Validation(_)
                | DbError::UniqueViolation { .. }
                | DbError::ConstraintViolation { .. }
        )
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite reports constraints as:
                // "UNIQUE constraint failed: books.isbn"
                // "CHECK constraint failed: rating BETWEEN 1 AND 5"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::ConstraintViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors() {
        assert!(DbError::from(ValidationError::required("isbn")).is_user_error());
        assert!(DbError::UniqueViolation {
            field: "books.isbn".to_string(),
            value: "unknown".to_string(),
        }
        .is_user_error());
        assert!(!DbError::not_found("Book", "123").is_user_error());
        assert!(!DbError::PoolExhausted.is_user_error());
    }

    #[test]
    fn test_validation_message_is_passed_through() {
        let err = DbError::from(ValidationError::required("title"));
        assert_eq!(err.to_string(), "title is required");
    }
}
