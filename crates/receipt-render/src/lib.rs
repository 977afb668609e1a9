//! # receipt-render: Receipt Documents
//!
//! Produces the printable PDF for a stored receipt.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Renderer::render                               │
//! │                                                                         │
//! │  Settings.output_folder (or default) ──► create folder if missing       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  layout::plan(receipt, settings)   pure: pages + draw commands          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pdf::write_pdf(plan, path)        printpdf, builtin Helvetica          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <folder>/RCPT-2024-0001.pdf       same receipt → same path, replaced  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering reads the stored receipt only. It never recomputes totals and
//! never changes the database.

pub mod error;
pub mod layout;
pub mod metrics;
pub mod pdf;

use receipt_core::{Receipt, Settings};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub use error::{RenderError, RenderResult};
pub use layout::{plan, DocumentPlan, DrawCommand};

/// Characters that cannot appear in a file name on common platforms.
const UNSAFE_FILE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// File name for a receipt's document, e.g. `RCPT-2024-0001.pdf`.
///
/// Path-unsafe characters become `-` and whitespace is dropped.
pub fn document_file_name(receipt_number: &str) -> String {
    let stem: String = receipt_number
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if UNSAFE_FILE_CHARS.contains(&c) { '-' } else { c })
        .collect();
    format!("{}.pdf", stem)
}

/// Renders receipts into a folder.
#[derive(Debug, Clone)]
pub struct Renderer {
    default_folder: PathBuf,
}

impl Renderer {
    /// `default_folder` is used whenever the settings name no folder.
    pub fn new(default_folder: impl Into<PathBuf>) -> Self {
        Renderer {
            default_folder: default_folder.into(),
        }
    }

    pub fn default_folder(&self) -> &Path {
        &self.default_folder
    }

    /// Folder documents go to under `settings`.
    pub fn output_folder(&self, settings: &Settings) -> PathBuf {
        let configured = settings.output_folder.trim();
        if configured.is_empty() {
            self.default_folder.clone()
        } else {
            PathBuf::from(configured)
        }
    }

    /// Where `receipt`'s document lives under `settings`.
    pub fn document_path(&self, receipt: &Receipt, settings: &Settings) -> PathBuf {
        self.output_folder(settings)
            .join(document_file_name(&receipt.receipt_number))
    }

    /// Writes the document for `receipt` and returns its path.
    ///
    /// Rendering the same receipt again overwrites the same file.
    pub fn render(&self, receipt: &Receipt, settings: &Settings) -> RenderResult<PathBuf> {
        let folder = self.output_folder(settings);
        fs::create_dir_all(&folder).map_err(|source| RenderError::Io {
            path: folder.clone(),
            source,
        })?;

        let plan = layout::plan(receipt, settings);
        let path = folder.join(document_file_name(&receipt.receipt_number));
        let title = format!("Receipt {}", receipt.receipt_number);

        pdf::write_pdf(&plan, &title, &path)?;

        info!(
            receipt_number = %receipt.receipt_number,
            path = %path.display(),
            pages = plan.page_count,
            "Receipt document rendered"
        );
        Ok(path)
    }
}
