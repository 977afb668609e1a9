//! # Validation Module
//!
//! Input validation for the receipt issuer.
//!
//! ## Validate Everything Before Writing Anything
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Receipt Creation                                   │
//! │                                                                         │
//! │  NewReceipt (raw client input)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  prepare_receipt ← THIS MODULE                                          │
//! │  ├── payer fields trimmed, required, length-checked                     │
//! │  ├── item list non-empty                                                │
//! │  ├── every item name trimmed and required                               │
//! │  ├── every amount normalized to minor units                             │
//! │  └── total computed once                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PreparedReceipt ──► Writer (allocates a number only now)               │
//! │                                                                         │
//! │  A number is never allocated for a request that could still fail.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{normalize_amount, Money};
use crate::settings::Settings;
use crate::types::{NewReceipt, PreparedItem, PreparedReceipt, ReceiptFilter};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

pub const MAX_PAYER_NAME_LEN: usize = 200;
pub const MAX_PAYER_GROUP_LEN: usize = 120;
pub const MAX_DEPARTMENT_LEN: usize = 200;
pub const MAX_ITEM_NAME_LEN: usize = 200;

pub const MAX_ORGANIZATION_NAME_LEN: usize = 200;
pub const MAX_ORGANIZATION_ADDRESS_LEN: usize = 300;
pub const MAX_ORGANIZATION_CONTACT_LEN: usize = 200;
pub const MAX_CURRENCY_SYMBOL_LEN: usize = 3;
pub const MAX_FOOTER_TEXT_LEN: usize = 250;
pub const MAX_OUTPUT_FOLDER_LEN: usize = 500;

pub const MAX_SEARCH_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Trims `value` and requires it to be non-empty and at most `max` chars.
pub fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    optional_text(field, value, max)
}

/// Trims `value` and requires it to be at most `max` chars. Empty is fine.
pub fn optional_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Receipt Validation
// =============================================================================

/// Validates a receipt request and converts it into its persistable form.
///
/// The first invalid item rejects the whole request.
///
/// ## Example
/// ```rust
/// use receipt_core::validation::prepare_receipt;
/// use receipt_core::{NewReceipt, NewReceiptItem};
///
/// let input = NewReceipt {
///     payer_name: " Ada Obi ".to_string(),
///     payer_group: "JSS1".to_string(),
///     department: None,
///     items: vec![
///         NewReceiptItem::new("Tuition", "50000"),
///         NewReceiptItem::new("Books", "199.99"),
///     ],
/// };
///
/// let prepared = prepare_receipt(&input).unwrap();
/// assert_eq!(prepared.payer_name, "Ada Obi");
/// assert_eq!(prepared.total.cents(), 5_019_999);
/// ```
pub fn prepare_receipt(input: &NewReceipt) -> CoreResult<PreparedReceipt> {
    let payer_name = required_text("payer_name", &input.payer_name, MAX_PAYER_NAME_LEN)?;
    let payer_group = required_text("payer_group", &input.payer_group, MAX_PAYER_GROUP_LEN)?;
    let department = optional_text(
        "department",
        input.department.as_deref().unwrap_or(""),
        MAX_DEPARTMENT_LEN,
    )?;

    if input.items.is_empty() {
        return Err(CoreError::EmptyReceipt);
    }

    let mut items = Vec::with_capacity(input.items.len());
    let mut total = Money::zero();

    for (index, item) in input.items.iter().enumerate() {
        let position = index + 1;

        let name = required_text(&format!("items[{}].name", position), &item.name, MAX_ITEM_NAME_LEN)?;
        let amount = normalize_amount(&item.amount)
            .map_err(|source| CoreError::InvalidItemAmount { position, source })?;

        total = total.checked_add(amount).ok_or(CoreError::TotalOverflow)?;
        items.push(PreparedItem { name, amount });
    }

    Ok(PreparedReceipt {
        payer_name,
        payer_group,
        department,
        items,
        total,
    })
}

// =============================================================================
// Settings Validation
// =============================================================================

/// Trims every settings field and checks the schema limits.
///
/// ## Rules
/// - Organization name is required
/// - Currency symbol is 1 to 3 characters
/// - Everything else may be empty
pub fn validate_settings(settings: Settings) -> ValidationResult<Settings> {
    let currency_symbol = required_text(
        "currency_symbol",
        &settings.currency_symbol,
        MAX_CURRENCY_SYMBOL_LEN,
    )?;

    Ok(Settings {
        organization_name: required_text(
            "organization_name",
            &settings.organization_name,
            MAX_ORGANIZATION_NAME_LEN,
        )?,
        organization_address: optional_text(
            "organization_address",
            &settings.organization_address,
            MAX_ORGANIZATION_ADDRESS_LEN,
        )?,
        organization_contact: optional_text(
            "organization_contact",
            &settings.organization_contact,
            MAX_ORGANIZATION_CONTACT_LEN,
        )?,
        currency_symbol,
        footer_text: optional_text("footer_text", &settings.footer_text, MAX_FOOTER_TEXT_LEN)?,
        output_folder: optional_text(
            "output_folder",
            &settings.output_folder,
            MAX_OUTPUT_FOLDER_LEN,
        )?,
        updated_at: settings.updated_at,
    })
}

// =============================================================================
// Listing Filter Validation
// =============================================================================

/// Builds a listing filter from raw query parameters.
///
/// Blank values count as absent. Dates use `YYYY-MM-DD`.
pub fn parse_filter(
    search: Option<&str>,
    date_from: Option<&str>,
    date_to: Option<&str>,
) -> ValidationResult<ReceiptFilter> {
    let search = match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Some(optional_text("search", s, MAX_SEARCH_LEN)?),
        None => None,
    };

    Ok(ReceiptFilter {
        search,
        date_from: parse_date("date_from", date_from)?,
        date_to: parse_date("date_to", date_to)?,
    })
}

fn parse_date(field: &str, value: Option<&str>) -> ValidationResult<Option<NaiveDate>> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: "expected YYYY-MM-DD".to_string(),
            }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AmountError;
    use crate::types::NewReceiptItem;

    fn request(items: Vec<NewReceiptItem>) -> NewReceipt {
        NewReceipt {
            payer_name: "Ada Obi".to_string(),
            payer_group: "JSS1".to_string(),
            department: Some("  Science ".to_string()),
            items,
        }
    }

    #[test]
    fn test_prepare_receipt_sums_exactly() {
        let prepared = prepare_receipt(&request(vec![
            NewReceiptItem::new("Tuition", "50000"),
            NewReceiptItem::new("Books", "199.99"),
            NewReceiptItem::new(" Uniform ", "0.1"),
            NewReceiptItem::new("Lab", "0.2"),
        ]))
        .unwrap();

        assert_eq!(prepared.total.cents(), 5_000_000 + 19_999 + 10 + 20);
        assert_eq!(
            prepared.total.cents(),
            prepared.items.iter().map(|i| i.amount.cents()).sum::<i64>()
        );
        assert_eq!(prepared.items[2].name, "Uniform");
        assert_eq!(prepared.department, "Science");
    }

    #[test]
    fn test_prepare_receipt_rejects_empty_items() {
        let err = prepare_receipt(&request(vec![])).unwrap_err();
        assert!(matches!(err, CoreError::EmptyReceipt));
    }

    #[test]
    fn test_prepare_receipt_reports_failing_item() {
        let err = prepare_receipt(&request(vec![
            NewReceiptItem::new("Tuition", "50000"),
            NewReceiptItem::new("Refund", "-1"),
        ]))
        .unwrap_err();

        match err {
            CoreError::InvalidItemAmount { position, source } => {
                assert_eq!(position, 2);
                assert!(matches!(source, AmountError::NegativeAmount { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_prepare_receipt_requires_item_name() {
        let err = prepare_receipt(&request(vec![NewReceiptItem::new("   ", "10")])).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { ref field }) if field == "items[1].name"
        ));
    }

    #[test]
    fn test_prepare_receipt_requires_payer() {
        let mut input = request(vec![NewReceiptItem::new("Tuition", "1")]);
        input.payer_group = " ".to_string();
        let err = prepare_receipt(&input).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Required { .. })));
    }

    #[test]
    fn test_prepare_receipt_detects_total_overflow() {
        let huge = (i64::MAX / 100 - 1).to_string();
        let err = prepare_receipt(&request(vec![
            NewReceiptItem::new("A", huge.as_str()),
            NewReceiptItem::new("B", huge.as_str()),
        ]))
        .unwrap_err();
        assert!(matches!(err, CoreError::TotalOverflow));
    }

    #[test]
    fn test_validate_settings() {
        let mut settings = Settings::defaults(" /srv/pdfs ");
        settings.organization_name = "  Greenfield College ".to_string();
        let cleaned = validate_settings(settings.clone()).unwrap();
        assert_eq!(cleaned.organization_name, "Greenfield College");
        assert_eq!(cleaned.output_folder, "/srv/pdfs");

        settings.currency_symbol = "NGN$".to_string();
        assert!(validate_settings(settings.clone()).is_err());

        settings.currency_symbol = "₦".to_string();
        settings.organization_name = "".to_string();
        assert!(validate_settings(settings).is_err());
    }

    #[test]
    fn test_text_length_counts_chars() {
        assert!(required_text("currency_symbol", "₦₦₦", 3).is_ok());
        assert!(required_text("payer_name", &"é".repeat(201), 200).is_err());
    }

    #[test]
    fn test_parse_filter() {
        let filter = parse_filter(Some("  ada "), Some("2024-01-01"), Some("")).unwrap();
        assert_eq!(filter.search.as_deref(), Some("ada"));
        assert_eq!(filter.date_from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filter.date_to, None);

        assert!(parse_filter(None, Some("01/02/2024"), None).is_err());
    }
}
