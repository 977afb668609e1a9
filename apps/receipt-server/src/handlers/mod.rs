//! # HTTP Handlers
//!
//! ```text
//! handlers/
//! ├── health.rs     GET  /api/health
//! ├── settings.rs   GET  /api/settings, PUT /api/settings
//! └── receipts.rs   /api/receipts and /api/receipts/:id/...
//! ```
//!
//! Handlers only translate between HTTP and the crates below; every rule
//! about numbering, amounts or layout lives in `receipt-db`,
//! `receipt-core` and `receipt-render`.

pub mod health;
pub mod receipts;
pub mod settings;
