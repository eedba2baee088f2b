use std::net::SocketAddr;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use super::{
    services::{fetch_screenshot, health, upload_screenshot},
    state::AppState,
};
use crate::config::Config;
use crate::storage::ScreenshotStore;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Room for multipart boundaries and the metadata field on top of the
/// configured file cap
const BODY_LIMIT_SLACK: usize = 64 * 1024;

/// Build the application router for the given state
pub fn router(state: AppState) -> Router {
    let body_limit = state.store.max_file_size() as usize + BODY_LIMIT_SLACK;

    Router::new()
        .route("/upload", post(upload_screenshot))
        .route("/upload/{id}", get(fetch_screenshot))
        .route("/health", get(health))
        .route("/{id}", get(fetch_screenshot))
        .with_state(state)
        // The axum default body limit is below the 5 MiB file cap
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn run(address_override: Option<SocketAddr>) -> Result<(), AnyError> {
    info!("Loading configuration");
    let config = Config::load().map_err(|e| format!("Failed to load config: {}", e))?;

    let store = ScreenshotStore::from_config(&config)
        .map_err(|e| format!("Failed to initialize storage: {}", e))?;

    let address = address_override.unwrap_or(config.server.bind_addr);
    let state = AppState::new(config, store);
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "shotlink API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
