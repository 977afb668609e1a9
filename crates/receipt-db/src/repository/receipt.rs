//! # Receipt Repository
//!
//! Issues receipts and answers queries about them.
//!
//! ## Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       create(&NewReceipt)                               │
//! │                                                                         │
//! │  1. prepare_receipt ──── invalid? ──► DbError::Rejected (nothing written)│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. BEGIN                                                               │
//! │     ├── counter::allocate(year)      → sequence                         │
//! │     ├── INSERT receipts              → RCPT-<year>-<sequence>           │
//! │     ├── INSERT receipt_items × N     → position 0..N                    │
//! │     └── COMMIT                                                          │
//! │       │                                                                 │
//! │       ├── busy/locked? ──► back off, repeat step 2 (bounded)            │
//! │       │                    └── exhausted ──► DbError::Contention        │
//! │       ▼                                                                 │
//! │  3. get_by_id → Receipt with items                                      │
//! │                                                                         │
//! │  Any error inside step 2 drops the transaction: the counter increment   │
//! │  is rolled back together with the partial receipt.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Datelike, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::counter;
use receipt_core::validation::prepare_receipt;
use receipt_core::{
    format_receipt_number, NewReceipt, PreparedReceipt, Receipt, ReceiptFilter, ReceiptItem,
    ReceiptSummary,
};

/// How many times the allocate+insert sequence runs before giving up.
pub const MAX_WRITE_ATTEMPTS: u32 = 5;

/// Base delay between attempts; attempt `n` waits `n × RETRY_BACKOFF`.
const RETRY_BACKOFF: Duration = Duration::from_millis(20);

const RECEIPT_COLUMNS: &str = "id, receipt_number, payer_name, payer_group, department, \
     total_cents, created_at, document_path";

/// Repository for receipt database operations.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    pool: SqlitePool,
}

impl ReceiptRepository {
    /// Creates a new ReceiptRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReceiptRepository { pool }
    }

    // =========================================================================
    // Writer
    // =========================================================================

    /// Validates, numbers and persists a receipt stamped with the current time.
    pub async fn create(&self, input: &NewReceipt) -> DbResult<Receipt> {
        self.create_at(input, Utc::now()).await
    }

    /// Same as [`create`](Self::create) with an explicit creation time.
    ///
    /// The numbering year is `created_at.year()` (UTC).
    pub async fn create_at(
        &self,
        input: &NewReceipt,
        created_at: DateTime<Utc>,
    ) -> DbResult<Receipt> {
        let prepared = prepare_receipt(input)?;

        let mut attempt = 0;
        let id = loop {
            attempt += 1;

            match self.insert_prepared(&prepared, created_at).await {
                Ok(id) => break id,
                Err(err) if err.is_transient() && attempt < MAX_WRITE_ATTEMPTS => {
                    warn!(attempt, error = %err, "Receipt write contended, retrying");
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                Err(err) if err.is_transient() => {
                    warn!(attempts = attempt, error = %err, "Receipt write gave up");
                    return Err(DbError::Contention { attempts: attempt });
                }
                Err(err) => return Err(err),
            }
        };

        let receipt = self.get_by_id(&id).await?;
        receipt.ok_or_else(|| DbError::not_found("Receipt", id))
    }

    /// One allocate+insert attempt in its own transaction. Returns the new id.
    async fn insert_prepared(
        &self,
        prepared: &PreparedReceipt,
        created_at: DateTime<Utc>,
    ) -> DbResult<String> {
        let mut tx = self.pool.begin().await?;

        let year = created_at.year();
        let sequence = counter::allocate(&mut tx, year).await?;
        let receipt_number = format_receipt_number(year, sequence);
        let id = Uuid::new_v4().to_string();

        debug!(id = %id, receipt_number = %receipt_number, "Inserting receipt");

        sqlx::query(
            r#"
            INSERT INTO receipts (
                id, receipt_number, payer_name, payer_group, department,
                total_cents, created_at, document_path
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL)
            "#,
        )
        .bind(&id)
        .bind(&receipt_number)
        .bind(&prepared.payer_name)
        .bind(&prepared.payer_group)
        .bind(&prepared.department)
        .bind(prepared.total.cents())
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in prepared.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO receipt_items (id, receipt_id, position, name, amount_cents)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&id)
            .bind(position as i64)
            .bind(&item.name)
            .bind(item.amount.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            id = %id,
            receipt_number = %receipt_number,
            items = prepared.items.len(),
            total_cents = prepared.total.cents(),
            "Receipt issued"
        );

        Ok(id)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Gets a receipt with its items (in insertion order).
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Receipt>> {
        let receipt = sqlx::query_as::<_, Receipt>(&format!(
            "SELECT {} FROM receipts WHERE id = ?1",
            RECEIPT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut receipt) = receipt else {
            return Ok(None);
        };

        receipt.items = self.get_items(&receipt.id).await?;
        Ok(Some(receipt))
    }

    /// Gets the items of a receipt ordered by position.
    pub async fn get_items(&self, receipt_id: &str) -> DbResult<Vec<ReceiptItem>> {
        let items = sqlx::query_as::<_, ReceiptItem>(
            r#"
            SELECT id, receipt_id, position, name, amount_cents
            FROM receipt_items
            WHERE receipt_id = ?1
            ORDER BY position
            "#,
        )
        .bind(receipt_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists receipts newest first.
    ///
    /// `search` matches payer name, payer group or receipt number as a
    /// case-insensitive substring. Date bounds are inclusive calendar days.
    pub async fn list(&self, filter: &ReceiptFilter) -> DbResult<Vec<ReceiptSummary>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT id, receipt_number, payer_name, payer_group, total_cents,
                   created_at, document_path
            FROM receipts
            WHERE 1 = 1
            "#,
        );

        if let Some(search) = filter.search.as_deref() {
            let pattern = format!("%{}%", escape_like(search));
            query.push(" AND (payer_name LIKE ");
            query.push_bind(pattern.clone());
            query.push(" ESCAPE '\\' OR payer_group LIKE ");
            query.push_bind(pattern.clone());
            query.push(" ESCAPE '\\' OR receipt_number LIKE ");
            query.push_bind(pattern);
            query.push(" ESCAPE '\\')");
        }

        if let Some(from) = filter.created_from() {
            query.push(" AND created_at >= ");
            query.push_bind(from);
        }

        if let Some(before) = filter.created_before() {
            query.push(" AND created_at < ");
            query.push_bind(before);
        }

        query.push(" ORDER BY created_at DESC, receipt_number DESC");

        let receipts = query
            .build_query_as::<ReceiptSummary>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = receipts.len(), "Listed receipts");
        Ok(receipts)
    }

    /// Number of stored receipts.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM receipts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Updates
    // =========================================================================

    /// Records where the rendered document was written.
    pub async fn set_document_path(&self, id: &str, path: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE receipts SET document_path = ?1 WHERE id = ?2")
            .bind(path)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Receipt", id));
        }

        debug!(id = %id, path = %path, "Document path recorded");
        Ok(())
    }

    /// Deletes a receipt and its items, returning what was removed.
    ///
    /// The year's counter is left alone, so the number is never reissued.
    pub async fn delete(&self, id: &str) -> DbResult<Receipt> {
        let receipt = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Receipt", id))?;

        let result = sqlx::query("DELETE FROM receipts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Receipt", id));
        }

        info!(id = %id, receipt_number = %receipt.receipt_number, "Receipt deleted");
        Ok(receipt)
    }
}

/// Escapes LIKE wildcards so user text matches literally.
fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{NaiveDate, TimeZone};
    use receipt_core::{AmountError, CoreError, NewReceiptItem};
    use std::collections::HashSet;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    fn request(payer: &str, items: &[(&str, &str)]) -> NewReceipt {
        NewReceipt {
            payer_name: payer.to_string(),
            payer_group: "JSS1".to_string(),
            department: None,
            items: items
                .iter()
                .map(|(name, amount)| NewReceiptItem::new(*name, *amount))
                .collect(),
        }
    }

    async fn memory_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_first_receipt_of_year() {
        let db = memory_db().await;

        let receipt = db
            .receipts()
            .create_at(
                &request("Ada Obi", &[("Tuition", "50000"), ("Books", "199.99")]),
                at(2024, 3, 1, 10),
            )
            .await
            .unwrap();

        assert_eq!(receipt.receipt_number, "RCPT-2024-0001");
        assert_eq!(receipt.total_cents, 5_019_999);
        assert_eq!(receipt.department, "");
        assert_eq!(receipt.created_at, at(2024, 3, 1, 10));
        assert_eq!(receipt.document_path, None);

        let names: Vec<_> = receipt.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Tuition", "Books"]);
        assert_eq!(receipt.items[1].amount_cents, 19_999);
        assert_eq!(
            receipt.total_cents,
            receipt.items.iter().map(|i| i.amount_cents).sum::<i64>()
        );
    }

    #[tokio::test]
    async fn test_sequential_numbers_per_year() {
        let db = memory_db().await;
        let repo = db.receipts();

        for expected in 1..=12 {
            let receipt = repo
                .create_at(&request("Ada", &[("Fee", "10")]), at(2024, 6, 1, 9))
                .await
                .unwrap();
            assert_eq!(receipt.receipt_number, format_receipt_number(2024, expected));
        }

        // A new year starts over
        let receipt = repo
            .create_at(&request("Ada", &[("Fee", "10")]), at(2025, 1, 1, 0))
            .await
            .unwrap();
        assert_eq!(receipt.receipt_number, "RCPT-2025-0001");

        assert_eq!(db.counters().last_number(2024).await.unwrap(), 12);
        assert_eq!(repo.count().await.unwrap(), 13);
    }

    #[tokio::test]
    async fn test_rejected_request_writes_nothing() {
        let db = memory_db().await;
        let repo = db.receipts();

        repo.create_at(&request("Ada", &[("Fee", "10")]), at(2024, 1, 5, 8))
            .await
            .unwrap();

        let err = repo
            .create_at(
                &request("Ada", &[("Tuition", "100"), ("Refund", "-1")]),
                at(2024, 1, 5, 9),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Rejected(CoreError::InvalidItemAmount {
                position: 2,
                source: AmountError::NegativeAmount { .. }
            })
        ));

        let err = repo
            .create_at(&request("Ada", &[]), at(2024, 1, 5, 9))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rejected(CoreError::EmptyReceipt)));

        assert_eq!(db.counters().last_number(2024).await.unwrap(), 1);
        assert_eq!(repo.count().await.unwrap(), 1);

        // The next valid receipt continues without a gap
        let receipt = repo
            .create_at(&request("Ada", &[("Fee", "10")]), at(2024, 1, 6, 8))
            .await
            .unwrap();
        assert_eq!(receipt.receipt_number, "RCPT-2024-0002");
    }

    #[tokio::test]
    async fn test_concurrent_creation_is_gap_free() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("receipts.db")))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..20 {
            let repo = db.receipts();
            handles.push(tokio::spawn(async move {
                repo.create_at(
                    &request(&format!("Payer {i}"), &[("Fee", "1.50")]),
                    at(2024, 9, 1, 12),
                )
                .await
            }));
        }

        let mut numbers = HashSet::new();
        for handle in handles {
            let receipt = handle.await.unwrap().unwrap();
            numbers.insert(receipt.receipt_number);
        }

        let expected: HashSet<_> = (1..=20).map(|n| format_receipt_number(2024, n)).collect();
        assert_eq!(numbers, expected);
        assert_eq!(db.counters().last_number(2024).await.unwrap(), 20);
    }

    #[tokio::test]
    async fn test_contention_is_reported_after_retries() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(
            DbConfig::new(dir.path().join("receipts.db")).busy_timeout(Duration::ZERO),
        )
        .await
        .unwrap();

        // Hold the write lock from another connection
        let mut holder = db.pool().begin().await.unwrap();
        counter::allocate(&mut holder, 2024).await.unwrap();

        let err = db
            .receipts()
            .create_at(&request("Ada", &[("Fee", "10")]), at(2024, 2, 2, 2))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Contention {
                attempts: MAX_WRITE_ATTEMPTS
            }
        ));

        holder.rollback().await.unwrap();

        let receipt = db
            .receipts()
            .create_at(&request("Ada", &[("Fee", "10")]), at(2024, 2, 2, 2))
            .await
            .unwrap();
        assert_eq!(receipt.receipt_number, "RCPT-2024-0001");
    }

    #[tokio::test]
    async fn test_list_filters() {
        let db = memory_db().await;
        let repo = db.receipts();

        let mut bola = request("Bola Ade", &[("Fee", "10")]);
        bola.payer_group = "SS2".to_string();

        repo.create_at(&request("Ada Obi", &[("Fee", "10")]), at(2024, 3, 1, 8))
            .await
            .unwrap();
        repo.create_at(&bola, at(2024, 3, 15, 23))
            .await
            .unwrap();
        repo.create_at(&request("Chidi 100%", &[("Fee", "10")]), at(2024, 4, 2, 7))
            .await
            .unwrap();

        let all = repo.list(&ReceiptFilter::default()).await.unwrap();
        let payers: Vec<_> = all.iter().map(|r| r.payer_name.as_str()).collect();
        assert_eq!(payers, vec!["Chidi 100%", "Bola Ade", "Ada Obi"]);

        let by_name = repo
            .list(&ReceiptFilter {
                search: Some("AD".to_string()),
                ..ReceiptFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(by_name.len(), 2);

        let by_group = repo
            .list(&ReceiptFilter {
                search: Some("ss2".to_string()),
                ..ReceiptFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(by_group.len(), 1);
        assert_eq!(by_group[0].payer_name, "Bola Ade");

        let by_number = repo
            .list(&ReceiptFilter {
                search: Some("2024-0003".to_string()),
                ..ReceiptFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(by_number.len(), 1);

        let literal_percent = repo
            .list(&ReceiptFilter {
                search: Some("0%".to_string()),
                ..ReceiptFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(literal_percent.len(), 1);
        assert_eq!(literal_percent[0].payer_name, "Chidi 100%");

        let march = repo
            .list(&ReceiptFilter {
                search: None,
                date_from: NaiveDate::from_ymd_opt(2024, 3, 1),
                date_to: NaiveDate::from_ymd_opt(2024, 3, 15),
            })
            .await
            .unwrap();
        assert_eq!(march.len(), 2);

        let april_on = repo
            .list(&ReceiptFilter {
                search: None,
                date_from: NaiveDate::from_ymd_opt(2024, 3, 16),
                date_to: None,
            })
            .await
            .unwrap();
        assert_eq!(april_on.len(), 1);
        assert_eq!(april_on[0].payer_name, "Chidi 100%");
    }

    #[tokio::test]
    async fn test_set_document_path() {
        let db = memory_db().await;
        let repo = db.receipts();

        let receipt = repo
            .create_at(&request("Ada", &[("Fee", "10")]), at(2024, 5, 5, 5))
            .await
            .unwrap();

        repo.set_document_path(&receipt.id, "/tmp/RCPT-2024-0001.pdf")
            .await
            .unwrap();

        let stored = repo.get_by_id(&receipt.id).await.unwrap().unwrap();
        assert_eq!(stored.document_path.as_deref(), Some("/tmp/RCPT-2024-0001.pdf"));

        let err = repo.set_document_path("missing", "/tmp/x.pdf").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_cascades_and_never_reuses_number() {
        let db = memory_db().await;
        let repo = db.receipts();

        let receipt = repo
            .create_at(
                &request("Ada", &[("Tuition", "100"), ("Books", "20")]),
                at(2024, 7, 7, 7),
            )
            .await
            .unwrap();

        let deleted = repo.delete(&receipt.id).await.unwrap();
        assert_eq!(deleted.receipt_number, "RCPT-2024-0001");
        assert_eq!(deleted.items.len(), 2);

        assert!(repo.get_by_id(&receipt.id).await.unwrap().is_none());
        assert!(repo.get_items(&receipt.id).await.unwrap().is_empty());
        assert!(matches!(
            repo.delete(&receipt.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));

        let next = repo
            .create_at(&request("Ada", &[("Fee", "10")]), at(2024, 7, 8, 7))
            .await
            .unwrap();
        assert_eq!(next.receipt_number, "RCPT-2024-0002");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
        assert_eq!(escape_like("plain"), "plain");
    }
}
