//! Request and response bodies.
//!
//! Stored amounts stay in minor units (`*_cents`); every view adds a display
//! string next to them (`50,199.99`) so clients never do money arithmetic.

use chrono::{DateTime, SecondsFormat, Utc};
use receipt_core::{Money, Receipt, ReceiptItem, ReceiptSummary};
use serde::{Deserialize, Serialize};

/// Where a receipt's document can be fetched.
pub fn document_url(receipt_id: &str) -> String {
    format!("/api/receipts/{}/document", receipt_id)
}

// =============================================================================
// Requests
// =============================================================================

/// Query string of `GET /api/receipts`. Blank values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

// =============================================================================
// Receipt Views
// =============================================================================

/// A line item as shown to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub id: String,
    pub position: i64,
    pub name: String,
    pub amount_cents: i64,
    pub amount: String,
}

impl From<ReceiptItem> for ItemView {
    fn from(item: ReceiptItem) -> Self {
        ItemView {
            amount: item.amount().to_string(),
            id: item.id,
            position: item.position,
            name: item.name,
            amount_cents: item.amount_cents,
        }
    }
}

/// A full receipt as shown to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptView {
    pub id: String,
    pub receipt_number: String,
    pub payer_name: String,
    pub payer_group: String,
    pub department: String,
    pub total_cents: i64,
    pub total: String,
    pub created_at: DateTime<Utc>,
    pub document_path: Option<String>,
    pub items: Vec<ItemView>,
}

impl From<Receipt> for ReceiptView {
    fn from(receipt: Receipt) -> Self {
        ReceiptView {
            total: receipt.total().to_string(),
            id: receipt.id,
            receipt_number: receipt.receipt_number,
            payer_name: receipt.payer_name,
            payer_group: receipt.payer_group,
            department: receipt.department,
            total_cents: receipt.total_cents,
            created_at: receipt.created_at,
            document_path: receipt.document_path,
            items: receipt.items.into_iter().map(ItemView::from).collect(),
        }
    }
}

/// One row of the receipt listing.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub id: String,
    pub receipt_number: String,
    pub payer_name: String,
    pub payer_group: String,
    pub total_cents: i64,
    pub total: String,
    pub created_at: DateTime<Utc>,
    /// Whether the recorded document file is still on disk.
    pub document_exists: bool,
}

impl SummaryView {
    pub fn new(summary: ReceiptSummary, document_exists: bool) -> Self {
        SummaryView {
            total: Money::from_cents(summary.total_cents).to_string(),
            id: summary.id,
            receipt_number: summary.receipt_number,
            payer_name: summary.payer_name,
            payer_group: summary.payer_group,
            total_cents: summary.total_cents,
            created_at: summary.created_at,
            document_exists,
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Body of a successful `POST /api/receipts`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub receipt: ReceiptView,
    pub document_url: String,
}

/// Plain acknowledgement, optionally pointing at a document.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
            document_url: None,
        }
    }

    pub fn with_document(mut self, receipt_id: &str) -> Self {
        self.document_url = Some(document_url(receipt_id));
        self
    }
}

// =============================================================================
// Export
// =============================================================================

/// Portable JSON copy of a receipt, amounts as display strings only.
#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument {
    pub id: String,
    pub receipt_number: String,
    pub payer_name: String,
    pub payer_group: String,
    pub department: String,
    pub created_at: String,
    pub total: String,
    pub items: Vec<ExportItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportItem {
    pub name: String,
    pub amount: String,
}

impl From<Receipt> for ExportDocument {
    fn from(receipt: Receipt) -> Self {
        ExportDocument {
            total: receipt.total().to_string(),
            created_at: receipt.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            id: receipt.id,
            receipt_number: receipt.receipt_number,
            payer_name: receipt.payer_name,
            payer_group: receipt.payer_group,
            department: receipt.department,
            items: receipt
                .items
                .into_iter()
                .map(|item| ExportItem {
                    amount: item.amount().to_string(),
                    name: item.name,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn receipt() -> Receipt {
        Receipt {
            id: "r1".to_string(),
            receipt_number: "RCPT-2024-0001".to_string(),
            payer_name: "Ada Obi".to_string(),
            payer_group: "JSS1".to_string(),
            department: String::new(),
            total_cents: 5_019_999,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            document_path: None,
            items: vec![
                ReceiptItem {
                    id: "i1".to_string(),
                    receipt_id: "r1".to_string(),
                    position: 0,
                    name: "Tuition".to_string(),
                    amount_cents: 5_000_000,
                },
                ReceiptItem {
                    id: "i2".to_string(),
                    receipt_id: "r1".to_string(),
                    position: 1,
                    name: "Books".to_string(),
                    amount_cents: 19_999,
                },
            ],
        }
    }

    #[test]
    fn test_view_formats_amounts() {
        let view = ReceiptView::from(receipt());
        assert_eq!(view.total, "50,199.99");
        assert_eq!(view.items[0].amount, "50,000.00");
        assert_eq!(view.items[1].amount, "199.99");
        assert_eq!(view.items[1].amount_cents, 19_999);
    }

    #[test]
    fn test_export_shape() {
        let json = serde_json::to_value(ExportDocument::from(receipt())).unwrap();
        assert_eq!(json["receipt_number"], "RCPT-2024-0001");
        assert_eq!(json["created_at"], "2024-03-01T09:30:00Z");
        assert_eq!(json["total"], "50,199.99");
        assert_eq!(json["items"][1]["name"], "Books");
        assert_eq!(json["items"][1]["amount"], "199.99");
        assert!(json.get("total_cents").is_none());
    }

    #[test]
    fn test_message_response_skips_missing_url() {
        let json = serde_json::to_value(MessageResponse::new("Receipt deleted")).unwrap();
        assert!(json.get("document_url").is_none());

        let json =
            serde_json::to_value(MessageResponse::new("ok").with_document("r1")).unwrap();
        assert_eq!(json["document_url"], "/api/receipts/r1/document");
    }
}
