//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Receipt Server                     │
//! │                                                                         │
//! │  Client                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  POST /api/receipts                                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad input?  ──── DbError::Rejected(CoreError) ──► 400           │  │
//! │  │  Missing?    ──── DbError::NotFound ─────────────► 404           │  │
//! │  │  Lock lost?  ──── DbError::Contention ───────────► 503           │  │
//! │  │  Storage?    ──── DbError::QueryFailed ... ──────► 500 (logged)  │  │
//! │  │  Document?   ──── RenderError ───────────────────► 500 (logged)  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄── { "code": "VALIDATION_ERROR", "message": "Item 2: ..." }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal details are logged and replaced with a generic message; input
//! errors are echoed back so the client can show them.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use receipt_core::{CoreError, ValidationError};
use receipt_db::DbError;
use receipt_render::RenderError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// API error returned from handlers.
///
/// ## Serialization
/// This is what the client receives when a request fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Receipt not found: 6f1c..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Resource not found (404)
    NotFound,

    /// The store stayed locked through every retry (503)
    Contention,

    /// Database operation failed (500)
    DatabaseError,

    /// The document could not be written (500)
    RenderError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status for this code.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Contention => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::DatabaseError | ErrorCode::RenderError | ErrorCode::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Rejected(core) => ApiError::from(core),
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::Contention { attempts } => {
                tracing::warn!(attempts, "Receipt store contended");
                ApiError::new(
                    ErrorCode::Contention,
                    "The receipt store is busy, please try again",
                )
            }
            DbError::Busy(e) => {
                tracing::warn!("Database busy: {}", e);
                ApiError::new(
                    ErrorCode::Contention,
                    "The receipt store is busy, please try again",
                )
            }
            DbError::PoolExhausted => {
                tracing::warn!("Database pool exhausted");
                ApiError::new(
                    ErrorCode::Contention,
                    "The receipt store is busy, please try again",
                )
            }
            DbError::UniqueViolation { field, value } => {
                tracing::error!(%field, %value, "Unique constraint violated");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Every core error is something the client sent.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ApiError::from(e),
            other => ApiError::validation(other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        tracing::error!(error = %err, "Document rendering failed");
        ApiError::new(ErrorCode::RenderError, "Could not generate the receipt document")
    }
}

/// Malformed or mistyped JSON bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Startup Errors
// =============================================================================

/// Failures that stop the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Data directory, log file or listener socket.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use receipt_core::AmountError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::ValidationError.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::Contention.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ErrorCode::RenderError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rejected_input_keeps_message() {
        let err = ApiError::from(DbError::Rejected(CoreError::InvalidItemAmount {
            position: 2,
            source: AmountError::NegativeAmount {
                value: "-1".to_string(),
            },
        }));

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Item 2: Amount cannot be negative: '-1'");
    }

    #[test]
    fn test_storage_details_are_hidden() {
        let err = ApiError::from(DbError::QueryFailed("no such table: receipts".to_string()));

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("receipts"));
    }

    #[test]
    fn test_contention_is_unavailable() {
        let err = ApiError::from(DbError::Contention { attempts: 5 });
        assert_eq!(err.code, ErrorCode::Contention);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::not_found("Receipt", "abc")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Receipt not found: abc");
    }
}
