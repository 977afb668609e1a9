//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError (bad input) ──────────────► DbError::Rejected                │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization                │
//! │       │                                                                 │
//! │       ├── Busy ──► retried by the writer ──► Contention when exhausted  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in server app) ← Serialized for HTTP clients                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use receipt_core::CoreError;
use thiserror::Error;

/// SQLite primary result codes that mean "another connection holds the lock".
const SQLITE_BUSY: &str = "5";
const SQLITE_LOCKED: &str = "6";

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// The request was invalid; nothing was written.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - Receipt ID doesn't exist
    /// - Receipt was deleted
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Duplicate receipt number
    /// - Duplicate item position within a receipt
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Another writer holds the database lock (SQLITE_BUSY / SQLITE_LOCKED).
    ///
    /// Transient. The receipt writer retries these itself.
    #[error("Database is busy: {0}")]
    Busy(String),

    /// Writes kept losing the lock after every retry.
    #[error("Database contention: gave up after {attempts} attempts")]
    Contention { attempts: u32 },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
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

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, DbError::Busy(_) | DbError::PoolExhausted)
    }
}

/// Returns true when SQLite reported a lock conflict rather than a real failure.
fn is_busy(db_err: &dyn sqlx::error::DatabaseError) -> bool {
    // Extended codes (e.g. 517 SQLITE_BUSY_SNAPSHOT) carry the primary code in the low byte
    let primary = db_err
        .code()
        .and_then(|code| code.parse::<i32>().ok())
        .map(|code| (code & 0xff).to_string());

    matches!(primary.as_deref(), Some(SQLITE_BUSY) | Some(SQLITE_LOCKED))
        || db_err.message().contains("database is locked")
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Busy / UniqueViolation / ForeignKeyViolation / QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if is_busy(&*db_err) {
                    DbError::Busy(msg.to_string())
                } else if db_err.is_unique_violation() {
                    // "UNIQUE constraint failed: <table>.<column>"
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if db_err.is_foreign_key_violation() {
                    DbError::ForeignKeyViolation {
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
    use receipt_core::AmountError;

    #[test]
    fn test_rejected_keeps_core_message() {
        let err: DbError = CoreError::InvalidItemAmount {
            position: 1,
            source: AmountError::NegativeAmount {
                value: "-1".to_string(),
            },
        }
        .into();

        assert_eq!(err.to_string(), "Item 1: Amount cannot be negative: '-1'");
        assert!(!err.is_transient());
    }

    #[test]
    fn test_busy_is_transient() {
        assert!(DbError::Busy("database is locked".to_string()).is_transient());
        assert!(!DbError::Contention { attempts: 5 }.is_transient());
    }
}
