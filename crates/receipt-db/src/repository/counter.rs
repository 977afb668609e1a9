//! # Counter Repository
//!
//! The per-year sequence behind receipt numbers.
//!
//! ## Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Writer transaction (BEGIN)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  allocate(&mut tx, 2024)                                                │
//! │       │   INSERT ... ON CONFLICT(year) DO UPDATE ... RETURNING          │
//! │       │   ├── no row for 2024  → insert (2024, 1)    → 1                │
//! │       │   └── row (2024, 6)    → update to 7          → 7               │
//! │       │                                                                 │
//! │       │   First write of the transaction: takes the write lock, so     │
//! │       │   no other writer can read 6 until this one commits or rolls   │
//! │       │   back.                                                         │
//! │       ▼                                                                 │
//! │  insert receipt + items ──► COMMIT (counter and receipt together)       │
//! │                        └──► ROLLBACK (counter back to 6)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use receipt_core::ReceiptCounter;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

/// Allocates the next sequence number for `year` on the caller's connection.
///
/// Must run inside the transaction that also inserts the receipt; the
/// increment is only durable if that transaction commits.
pub async fn allocate(conn: &mut SqliteConnection, year: i32) -> DbResult<i64> {
    let sequence: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO receipt_counters (year, last_number)
        VALUES (?1, 1)
        ON CONFLICT(year) DO UPDATE SET last_number = last_number + 1
        RETURNING last_number
        "#,
    )
    .bind(year)
    .fetch_one(&mut *conn)
    .await?;

    debug!(year, sequence, "Allocated receipt sequence");

    Ok(sequence)
}

/// Read access to the counters.
#[derive(Debug, Clone)]
pub struct CounterRepository {
    pool: SqlitePool,
}

impl CounterRepository {
    /// Creates a new CounterRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CounterRepository { pool }
    }

    /// Last number issued for `year`, or 0 when the year has none.
    pub async fn last_number(&self, year: i32) -> DbResult<i64> {
        let last: Option<i64> =
            sqlx::query_scalar("SELECT last_number FROM receipt_counters WHERE year = ?1")
                .bind(year)
                .fetch_optional(&self.pool)
                .await?;

        Ok(last.unwrap_or(0))
    }

    /// All counters, oldest year first.
    pub async fn list(&self) -> DbResult<Vec<ReceiptCounter>> {
        let counters = sqlx::query_as::<_, ReceiptCounter>(
            "SELECT year, last_number FROM receipt_counters ORDER BY year",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counters)
    }
}
