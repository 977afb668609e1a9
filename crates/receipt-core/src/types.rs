//! # Domain Types
//!
//! Core domain types used throughout the receipt issuer.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ReceiptCounter  │   │     Receipt     │   │   ReceiptItem   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  year (key)     │──►│  id (UUID)      │◄──│  receipt_id(FK) │       │
//! │  │  last_number    │   │  receipt_number │   │  position       │       │
//! │  └─────────────────┘   │  total_cents    │   │  amount_cents   │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Input side:  NewReceipt ──validate──► PreparedReceipt ──► Writer       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every receipt has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `receipt_number`: `RCPT-2024-0007` - human-readable, unique, immutable

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, RawAmount};

// =============================================================================
// Receipt Counter
// =============================================================================

/// Per-year sequence state behind receipt numbers.
///
/// Created lazily on the first receipt of a year and only ever incremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ReceiptCounter {
    pub year: i32,
    pub last_number: i64,
}

// =============================================================================
// Receipt
// =============================================================================

/// An issued receipt together with its ordered line items.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Receipt {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-facing number, `RCPT-<year>-<sequence>`.
    pub receipt_number: String,

    pub payer_name: String,

    /// Class or group the payer belongs to.
    pub payer_group: String,

    /// Empty when not given.
    pub department: String,

    /// Sum of all item amounts in minor units.
    pub total_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Where the rendered document was last written.
    pub document_path: Option<String>,

    /// Line items in insertion order.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<ReceiptItem>,
}

impl Receipt {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Receipt Item
// =============================================================================

/// A line item owned by exactly one receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ReceiptItem {
    pub id: String,
    pub receipt_id: String,
    /// 0-based insertion order within the receipt.
    pub position: i64,
    pub name: String,
    pub amount_cents: i64,
}

impl ReceiptItem {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Receipt Summary
// =============================================================================

/// Lightweight row for receipt listings.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ReceiptSummary {
    pub id: String,
    pub receipt_number: String,
    pub payer_name: String,
    pub payer_group: String,
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub document_path: Option<String>,
}

// =============================================================================
// Receipt Input
// =============================================================================

/// A request to issue a receipt, as received from a client.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewReceipt {
    pub payer_name: String,
    pub payer_group: String,
    #[serde(default)]
    pub department: Option<String>,
    pub items: Vec<NewReceiptItem>,
}

/// One requested line item with its amount still in raw form.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewReceiptItem {
    pub name: String,
    #[ts(type = "string | number")]
    pub amount: RawAmount,
}

impl NewReceiptItem {
    /// Convenience constructor used by tests and the seed tool.
    pub fn new(name: impl Into<String>, amount: impl Into<RawAmount>) -> Self {
        NewReceiptItem {
            name: name.into(),
            amount: amount.into(),
        }
    }
}

/// A fully validated request: trimmed text, amounts in minor units and the
/// total computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedReceipt {
    pub payer_name: String,
    pub payer_group: String,
    pub department: String,
    pub items: Vec<PreparedItem>,
    pub total: Money,
}

/// A validated line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedItem {
    pub name: String,
    pub amount: Money,
}

// =============================================================================
// Listing Filter
// =============================================================================

/// Filter for receipt listings. Dates are inclusive calendar days (UTC).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptFilter {
    pub search: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl ReceiptFilter {
    /// Lower bound of `created_at`, start of `date_from`.
    pub fn created_from(&self) -> Option<DateTime<Utc>> {
        self.date_from
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// Exclusive upper bound of `created_at`: the start of the day after
    /// `date_to`, so the whole last second (fractions included) is covered.
    pub fn created_before(&self) -> Option<DateTime<Utc>> {
        self.date_to
            .and_then(|d| d.succ_opt())
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_filter_bounds_cover_whole_days() {
        let filter = ReceiptFilter {
            search: None,
            date_from: NaiveDate::from_ymd_opt(2024, 3, 1),
            date_to: NaiveDate::from_ymd_opt(2024, 3, 31),
        };

        assert_eq!(
            filter.created_from(),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            filter.created_before(),
            Some(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_new_receipt_from_json() {
        let json = r#"{
            "payer_name": "Ada",
            "payer_group": "JSS1",
            "items": [{"name": "Tuition", "amount": "50000"}, {"name": "Books", "amount": 12}]
        }"#;
        let input: NewReceipt = serde_json::from_str(json).unwrap();

        assert_eq!(input.department, None);
        assert_eq!(input.items.len(), 2);
        assert_eq!(input.items[1].amount, RawAmount::Integer(12));
    }
}
