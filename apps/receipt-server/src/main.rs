//! # Receipt Server Entry Point
//!
//! ```text
//! main.rs ────► ServerConfig::from_env()
//!                    │
//!                    ▼
//! lib.rs  ────► run(config): data dir, logging, database, router, serve
//! ```
//!
//! The address is logged once the listener is bound; with the default port
//! of 0 that log line is the only way to learn it.

use receipt_server::config::ServerConfig;

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env();

    if let Err(err) = receipt_server::run(config).await {
        // Logging may not be up yet, so report on stderr too
        eprintln!("receipt-server: {}", err);
        tracing::error!(error = %err, "Server failed");
        std::process::exit(1);
    }
}
