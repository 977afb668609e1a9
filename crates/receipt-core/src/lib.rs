//! # receipt-core: Pure Business Logic for the Receipt Issuer
//!
//! This crate is the **heart** of the receipt issuer. It contains all business
//! rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Receipt Issuer Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (receipt-server)                    │   │
//! │  │   create_receipt, list_receipts, update_settings, ...           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ receipt-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ settings  │  │ validation│  │   │
//! │  │   │  Receipt  │  │   Money   │  │  Settings │  │  prepare  │  │   │
//! │  │   │  Counter  │  │ normalize │  │   merge   │  │  receipt  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                 │                                   │                   │
//! │  ┌──────────────▼──────────────┐   ┌────────────────▼───────────────┐  │
//! │  │  receipt-db (numbering +    │   │  receipt-render (layout +      │  │
//! │  │  persistence)               │   │  PDF output)                   │  │
//! │  └─────────────────────────────┘   └────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Receipt, ReceiptItem, ReceiptCounter, ...)
//! - [`money`] - Money type and raw amount normalization (no floating point!)
//! - [`settings`] - Settings singleton and its field-by-field merge
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation run before anything is persisted
//!
//! ## Example Usage
//!
//! ```rust
//! use receipt_core::money::{normalize_amount, RawAmount};
//!
//! let cents = normalize_amount(&RawAmount::from("19.995")).unwrap();
//! assert_eq!(cents.cents(), 2000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod settings;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{AmountError, CoreError, CoreResult, ValidationError};
pub use money::{normalize_amount, Money, RawAmount};
pub use settings::{Settings, SettingsPatch};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of every human-facing receipt number.
pub const RECEIPT_NUMBER_PREFIX: &str = "RCPT";

/// Minimum width of the zero-padded sequence part of a receipt number.
pub const SEQUENCE_WIDTH: usize = 4;

/// Builds the human-facing receipt number for a year and sequence.
///
/// ## Example
/// ```rust
/// use receipt_core::format_receipt_number;
///
/// assert_eq!(format_receipt_number(2024, 7), "RCPT-2024-0007");
/// ```
pub fn format_receipt_number(year: i32, sequence: i64) -> String {
    format!(
        "{}-{:04}-{:0width$}",
        RECEIPT_NUMBER_PREFIX,
        year,
        sequence,
        width = SEQUENCE_WIDTH
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_number_padding() {
        assert_eq!(format_receipt_number(2024, 1), "RCPT-2024-0001");
        assert_eq!(format_receipt_number(2025, 123), "RCPT-2025-0123");
    }

    #[test]
    fn test_receipt_number_past_four_digits() {
        assert_eq!(format_receipt_number(2024, 12345), "RCPT-2024-12345");
    }
}
