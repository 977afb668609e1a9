//! Data directory layout.
//!
//! ```text
//! <data_dir>/
//! ├── data/receipts.db
//! ├── logs/app.log
//! └── pdfs/              default document folder
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Resolved locations under the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub pdf_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl AppPaths {
    /// Computes the layout without touching the file system.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let data_dir = root.join("data");
        let logs_dir = root.join("logs");
        let pdf_dir = root.join("pdfs");

        AppPaths {
            db_path: data_dir.join("receipts.db"),
            log_path: logs_dir.join("app.log"),
            root,
            data_dir,
            logs_dir,
            pdf_dir,
        }
    }

    /// Computes the layout and creates every folder in it.
    pub fn ensure(root: impl Into<PathBuf>) -> io::Result<Self> {
        let paths = AppPaths::new(root);
        for folder in paths.folders() {
            fs::create_dir_all(folder)?;
        }
        Ok(paths)
    }

    fn folders(&self) -> [&Path; 4] {
        [&self.root, &self.data_dir, &self.logs_dir, &self.pdf_dir]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let paths = AppPaths::new("/srv/receipts");
        assert_eq!(paths.db_path, PathBuf::from("/srv/receipts/data/receipts.db"));
        assert_eq!(paths.log_path, PathBuf::from("/srv/receipts/logs/app.log"));
        assert_eq!(paths.pdf_dir, PathBuf::from("/srv/receipts/pdfs"));
    }

    #[test]
    fn test_ensure_creates_folders() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::ensure(dir.path().join("app")).unwrap();

        assert!(paths.data_dir.is_dir());
        assert!(paths.logs_dir.is_dir());
        assert!(paths.pdf_dir.is_dir());

        // Idempotent
        AppPaths::ensure(&paths.root).unwrap();
    }
}
