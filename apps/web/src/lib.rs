//! # ReadLog Web
//!
//! Single-user web app for keeping a log of books read.
//!
//! ## Module Organization
//! ```text
//! readlog_web/
//! ├── lib.rs          ◄─── You are here (router, logging, server loop)
//! ├── config.rs       ◄─── Environment configuration
//! ├── state.rs        ◄─── Shared database handle
//! ├── error.rs        ◄─── ApiError → HTTP status + error page
//! ├── views.rs        ◄─── HTML rendering
//! └── handlers/
//!     ├── books.rs    ◄─── Listing, detail, add/edit/delete
//!     ├── export.rs   ◄─── CSV download
//!     └── health.rs   ◄─── Liveness probe
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: info,readlog=debug,sqlx=warn (override with RUST_LOG)    │
//! │                                                                         │
//! │  2. Load Configuration ───────────────────────────────────────────────► │
//! │     • READLOG_BIND, READLOG_DATA_DIR, READLOG_DB_MAX_CONNECTIONS        │
//! │                                                                         │
//! │  3. Open Database ────────────────────────────────────────────────────► │
//! │     • Create data dir, SQLite with WAL mode                             │
//! │     • Create `books` table if absent                                    │
//! │                                                                         │
//! │  4. Serve ────────────────────────────────────────────────────────────► │
//! │     • axum on READLOG_BIND until Ctrl+C / SIGTERM                       │
//! │     • Close the pool on the way out                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;
pub mod views;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use readlog_db::{Database, DbConfig};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::WebConfig;
use crate::handlers::{books, export, health};
pub use crate::state::AppState;

/// Default log directives when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,readlog=debug,sqlx=warn";

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(books::index))
        .route("/add", get(books::new_form).post(books::create))
        .route("/book/{isbn}", get(books::detail))
        .route("/edit/{isbn}", get(books::edit_form).post(books::update))
        .route("/delete/{isbn}", post(books::delete))
        .route("/export", get(export::export_csv))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Installs the global tracing subscriber.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Opens the database and serves HTTP until a shutdown signal arrives.
pub async fn serve(config: WebConfig) -> anyhow::Result<()> {
    info!(
        bind = %config.bind_addr,
        data_dir = %config.data_dir.display(),
        "Starting ReadLog"
    );

    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "Failed to create data directory {}",
            config.data_dir.display()
        )
    })?;

    let db_config = DbConfig::new(config.database_path()).max_connections(config.db_max_connections);
    let db = Database::new(db_config)
        .await
        .context("Failed to open library database")?;

    let app = router(AppState::new(db.clone()));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "ReadLog listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    db.close().await;
    info!("Server shutdown complete");

    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
