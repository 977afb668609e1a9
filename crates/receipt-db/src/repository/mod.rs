//! # Repository Module
//!
//! Database repository implementations for the receipt store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │  db.receipts().create(&input)                                   │
//! │       ▼                                                                 │
//! │  ReceiptRepository                                                      │
//! │  ├── create / create_at   (uses counter::allocate in its transaction)   │
//! │  ├── get_by_id / list                                                   │
//! │  ├── set_document_path                                                  │
//! │  └── delete                                                             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ReceiptRepository`](receipt::ReceiptRepository) - Receipt writer and queries
//! - [`CounterRepository`](counter::CounterRepository) - Per-year sequence state
//! - [`SettingsRepository`](settings::SettingsRepository) - Settings singleton

pub mod counter;
pub mod receipt;
pub mod settings;
