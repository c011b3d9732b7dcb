//! Abacus Server
//!
//! HTTP layer for the arithmetic service: axum router and handlers, operand
//! validation, configuration, and request metrics with Prometheus
//! exposition.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod metrics;
pub mod validate;

use abacus_store::SqliteStore;
use config::ServerConfig;
use handlers::{create_router, AppState};
use metrics::ServiceMetrics;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Storage initialization error
    #[error("Storage error: {0}")]
    Store(#[from] abacus_store::StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the HTTP server
///
/// Initializes tracing, opens the store, builds the application state, and
/// starts the axum server.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    // Initialize tracing; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Abacus server");
    info!("Bind address: {}", config.bind_addr());
    info!("Database path: {}", config.database_path);

    // Open the calculation log store
    let store = SqliteStore::new(&config.database_path)?;

    // Create application state
    let state = AppState {
        store: Arc::new(Mutex::new(store)),
        metrics: Arc::new(ServiceMetrics::new()),
    };

    // Create router
    let app = create_router(state);

    // Bind and serve
    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Abacus listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
