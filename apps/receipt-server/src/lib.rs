//! # Receipt Server Library
//!
//! Local JSON API for issuing receipts and fetching their documents.
//!
//! ## Module Organization
//! ```text
//! receipt_server/
//! ├── lib.rs          ◄─── You are here (startup, logging, router)
//! ├── config.rs       ◄─── ServerConfig from RECEIPT_* variables
//! ├── paths.rs        ◄─── data/, logs/, pdfs/ under the data dir
//! ├── state/
//! │   └── mod.rs      ◄─── AppState (Database + Renderer)
//! ├── handlers/
//! │   ├── health.rs   ◄─── Liveness
//! │   ├── settings.rs ◄─── Settings read/merge
//! │   └── receipts.rs ◄─── Create, list, get, delete, documents, export
//! ├── dto.rs          ◄─── Response views with formatted amounts
//! └── error.rs        ◄─── ApiError → HTTP status + JSON body
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod paths;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use receipt_db::{Database, DbConfig};
use receipt_render::Renderer;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use config::ServerConfig;
use error::StartupError;
use paths::AppPaths;
use state::AppState;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,receipt=debug,sqlx=warn";

/// Runs the server until Ctrl+C.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Server Startup                                    │
/// │                                                                         │
/// │  1. Prepare Data Directory ───────────────────────────────────────────► │
/// │     • <data_dir>/data, <data_dir>/logs, <data_dir>/pdfs                 │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • stdout + <data_dir>/logs/app.log                                  │
/// │     • Default: info,receipt=debug; override with RUST_LOG               │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode, busy timeout                                │
/// │     • Run pending migrations, make sure settings exist                  │
/// │                                                                         │
/// │  4. Bind & Serve ─────────────────────────────────────────────────────► │
/// │     • RECEIPT_HOST:RECEIPT_PORT (port 0 picks a free one)               │
/// │     • Graceful shutdown on Ctrl+C                                       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(config: ServerConfig) -> Result<(), StartupError> {
    let paths = AppPaths::ensure(&config.data_dir)?;
    init_tracing(&paths.log_path)?;

    info!(data_dir = %paths.root.display(), "Starting receipt server");

    let db_path = config.db_path.clone().unwrap_or_else(|| paths.db_path.clone());
    let db = Database::new(DbConfig::new(db_path)).await?;
    info!("Database connected and migrations applied");

    let state = AppState::new(db.clone(), Renderer::new(&paths.pdf_dir));
    db.settings()
        .get_or_create(&state.default_output_folder())
        .await?;

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;
    info!(url = %format!("http://{}", addr), "Server listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

/// Builds the API router over `state`.
pub fn build_router(state: AppState) -> Router {
    use handlers::{health, receipts, settings};

    Router::new()
        .route("/api/health", get(health::health_check))
        .route(
            "/api/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route(
            "/api/receipts",
            get(receipts::list_receipts).post(receipts::create_receipt),
        )
        .route(
            "/api/receipts/:id",
            get(receipts::get_receipt).delete(receipts::delete_receipt),
        )
        .route(
            "/api/receipts/:id/regenerate",
            post(receipts::regenerate_document),
        )
        .route("/api/receipts/:id/document", get(receipts::get_document))
        .route("/api/receipts/:id/export", get(receipts::export_receipt))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=receipt=trace` - Show trace for receipt crates only
/// - Default: INFO, DEBUG for receipt crates
///
/// Events go to stdout and, without colors, to `log_path`.
fn init_tracing(log_path: &Path) -> Result<(), StartupError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .try_init()
        .map_err(|e| StartupError::Logging(e.to_string()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

// =============================================================================
// Router Tests
// =============================================================================
