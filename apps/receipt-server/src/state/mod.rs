//! # State Module
//!
//! Shared state handed to every handler.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  Router::with_state(AppState) ──► cloned into each request              │
//! │                                                                         │
//! │  ┌──────────────────────────────┐  ┌──────────────────────────────┐    │
//! │  │  Database                    │  │  Renderer                    │    │
//! │  │  SqlitePool (cheap clone,    │  │  default document folder     │    │
//! │  │  internally synchronized)    │  │  (immutable)                 │    │
//! │  └──────────────────────────────┘  └──────────────────────────────┘    │
//! │                                                                         │
//! │  No locks here: the database serializes receipt numbering itself.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use receipt_core::{Receipt, Settings};
use receipt_db::Database;
use receipt_render::Renderer;
use std::path::PathBuf;
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// Everything a handler can reach.
#[derive(Debug, Clone)]
pub struct AppState {
    db: Database,
    renderer: Renderer,
}

impl AppState {
    pub fn new(db: Database, renderer: Renderer) -> Self {
        AppState { db, renderer }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Output folder stored in fresh settings.
    pub fn default_output_folder(&self) -> String {
        self.renderer.default_folder().to_string_lossy().into_owned()
    }

    /// Current settings, created with defaults on first use.
    pub async fn settings(&self) -> ApiResult<Settings> {
        let settings = self
            .db
            .settings()
            .get_or_create(&self.default_output_folder())
            .await?;
        Ok(settings)
    }

    /// Renders `receipt` under the current settings and records the path.
    ///
    /// `receipt.document_path` is updated to match what was stored.
    pub async fn render_document(&self, receipt: &mut Receipt) -> ApiResult<PathBuf> {
        let settings = self.settings().await?;
        let renderer = self.renderer.clone();
        let snapshot = receipt.clone();

        // printpdf documents are built synchronously and are not Send
        let path = tokio::task::spawn_blocking(move || renderer.render(&snapshot, &settings))
            .await
            .map_err(|e| ApiError::internal(format!("Render task failed: {}", e)))??;

        let stored = path.to_string_lossy().into_owned();
        self.db
            .receipts()
            .set_document_path(&receipt.id, &stored)
            .await?;

        debug!(receipt_number = %receipt.receipt_number, path = %stored, "Document recorded");
        receipt.document_path = Some(stored);
        Ok(path)
    }
}
