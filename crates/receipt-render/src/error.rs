//! # Render Error Types
//!
//! A failed render never affects the stored receipt; the caller can retry.

use std::path::PathBuf;
use thiserror::Error;

/// Document rendering errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The output folder or file could not be created or written.
    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF backend rejected the document.
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
