//! # Error Types
//!
//! Domain-specific error types for receipt-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  receipt-core errors (this file)                                        │
//! │  ├── AmountError      - A raw amount could not become minor units       │
//! │  ├── ValidationError  - Text field failures                             │
//! │  └── CoreError        - Everything that rejects a receipt request       │
//! │                                                                         │
//! │  receipt-db errors (separate crate)                                     │
//! │  └── DbError          - Storage failures, contention, Rejected(Core)    │
//! │                                                                         │
//! │  receipt-server errors (in app)                                         │
//! │  └── ApiError         - What HTTP clients see (serialized)              │
//! │                                                                         │
//! │  Flow: AmountError → CoreError → DbError → ApiError → Client           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error in this file is an input error: it is raised before anything
//! is written and is never retried.

use thiserror::Error;

// =============================================================================
// Amount Error
// =============================================================================

/// A raw amount could not be normalized into minor units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Not a number (or too large to represent in minor units).
    #[error("Amount must be numeric: '{value}'")]
    InvalidAmount { value: String },

    /// Below zero after rounding.
    #[error("Amount cannot be negative: '{value}'")]
    NegativeAmount { value: String },
}

// =============================================================================
// Core Error
// =============================================================================

/// Reasons a receipt request is rejected before persistence.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The request carried no line items.
    #[error("A receipt needs at least one item")]
    EmptyReceipt,

    /// One of the items has an unusable amount.
    ///
    /// ## User Workflow
    /// ```text
    /// items: [("Tuition", "50000"), ("Books", "abc")]
    ///      │
    ///      ▼
    /// InvalidItemAmount { position: 2, source: InvalidAmount("abc") }
    ///      │
    ///      ▼
    /// Client shows: "Item 2: Amount must be numeric: 'abc'"
    /// ```
    #[error("Item {position}: {source}")]
    InvalidItemAmount {
        /// 1-based position of the item in the request.
        position: usize,
        #[source]
        source: AmountError,
    },

    /// The item amounts add up to more than minor units can hold.
    #[error("Receipt total is too large")]
    TotalOverflow,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Text field validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Invalid format (e.g. a malformed date filter).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_amount_message_names_position() {
        let err = CoreError::InvalidItemAmount {
            position: 2,
            source: AmountError::InvalidAmount {
                value: "abc".to_string(),
            },
        };
        assert_eq!(err.to_string(), "Item 2: Amount must be numeric: 'abc'");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "payer_name".to_string(),
        };
        assert_eq!(err.to_string(), "payer_name is required");

        let err = ValidationError::TooLong {
            field: "footer_text".to_string(),
            max: 250,
        };
        assert_eq!(err.to_string(), "footer_text must be at most 250 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "payer_group".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
