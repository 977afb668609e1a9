//! # Server Configuration
//!
//! Settings the process needs before it can open the database.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`RECEIPT_*`)
//! 2. Defaults (this file)
//!
//! Organization details live in the database settings row, not here.

use directories::BaseDirs;
use std::path::PathBuf;

/// Folder name under the platform data directory.
pub const APP_DIR_NAME: &str = "ReceiptGenerator";

pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to bind; 0 lets the OS pick a free one.
    pub port: u16,

    /// Root of `data/`, `logs/` and `pdfs/`.
    pub data_dir: PathBuf,

    /// Database file override; `<data_dir>/data/receipts.db` when unset.
    pub db_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    /// ## Default Values
    /// - Host: 127.0.0.1 (local only)
    /// - Port: 0 (any free port)
    /// - Data dir: `~/.local/share/ReceiptGenerator` on Linux,
    ///   `%APPDATA%\ReceiptGenerator` on Windows
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: 0,
            data_dir: default_data_dir(),
            db_path: None,
        }
    }
}

impl ServerConfig {
    /// Creates a ServerConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `RECEIPT_HOST`: interface to bind
    /// - `RECEIPT_PORT`: port to bind (ignored unless a valid u16)
    /// - `RECEIPT_DATA_DIR`: data directory root
    /// - `RECEIPT_DB_PATH`: database file
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ServerConfig::default();

        if let Some(host) = lookup("RECEIPT_HOST").filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }

        if let Some(port) = lookup("RECEIPT_PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
            config.port = port;
        }

        if let Some(dir) = lookup("RECEIPT_DATA_DIR").filter(|d| !d.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(path) = lookup("RECEIPT_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        config
    }
}

/// Platform data directory for the application.
///
/// Falls back to a relative folder when no home directory is known.
pub fn default_data_dir() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.data_dir().join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(APP_DIR_NAME))
}
