//! # receipt-db: Database Layer for the Receipt Issuer
//!
//! This crate provides database access for the receipt issuer.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Receipt Issuer Data Flow                         │
//! │                                                                         │
//! │  HTTP handler (POST /api/receipts)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     receipt-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ReceiptRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ CounterRepo   │    │ 001_init.sql │  │   │
//! │  │   │ WAL + busy    │    │ SettingsRepo  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/data/receipts.db                                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (receipt, counter, settings)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use receipt_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/receipts.db")).await?;
//!
//! let receipt = db.receipts().create(&input).await?;
//! println!("Issued {}", receipt.receipt_number);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::counter::CounterRepository;
pub use repository::receipt::{ReceiptRepository, MAX_WRITE_ATTEMPTS};
pub use repository::settings::SettingsRepository;
