pub mod api;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::{ApodService, SharedHealthStats};
use axum::{extract::FromRef, http::Method, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ApodService>,
    pub health_stats: SharedHealthStats,
    pub config: Arc<Config>,
}

impl FromRef<AppState> for SharedHealthStats {
    fn from_ref(app_state: &AppState) -> SharedHealthStats {
        app_state.health_stats.clone()
    }
}

/// Build the router: API routes, CORS, and the static client when configured
pub fn router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/api/apod", get(api::get_apod_handler))
        .route("/health", get(api::health_handler));

    if let Some(static_dir) = &app_state.config.static_dir {
        tracing::info!("  GET /* (static files from {})", static_dir.display());
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    app.layer(cors).with_state(app_state)
}

/// Start the axum server and run until Ctrl-C
pub async fn serve(config: Config, service: ApodService, health_stats: SharedHealthStats) -> Result<()> {
    tracing::info!("Starting apod-proxy server");

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address {}:{}: {}", config.host, config.port, e)))?;

    tracing::info!("Registering routes:");
    tracing::info!("  GET /api/apod?date=YYYY-MM-DD");
    tracing::info!("  GET /health");

    let app_state = AppState {
        service: Arc::new(service),
        health_stats,
        config: Arc::new(config),
    };
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
