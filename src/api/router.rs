//! API router configuration.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    api_info, delete_session, flow_abort, flow_clear, flow_destroy, flow_done, flow_entry,
    flow_persisted, flow_regenerate, flow_seed, flow_status, get_session, health, put_session,
    AppState,
};
use crate::error::SessionError;

/// Create the API router with all routes configured.
pub fn create_router() -> Router {
    create_router_with_state(AppState::new())
}

/// Create the API router with custom state.
pub fn create_router_with_state(state: AppState) -> Router {
    // Lifecycle-verification chain
    let flow_routes = Router::new()
        .route("/", get(flow_entry))
        .route("/seed", get(flow_seed))
        .route("/persisted", get(flow_persisted))
        .route("/regenerate", get(flow_regenerate))
        .route("/clear", get(flow_clear))
        .route("/status", get(flow_status))
        .route("/destroy", get(flow_destroy))
        .route("/abort", get(flow_abort))
        .route("/done", get(flow_done));

    // Build main router
    Router::new()
        .route("/", get(api_info))
        .route("/health", get(health))
        .route(
            "/session",
            get(get_session).put(put_session).delete(delete_session),
        )
        .nest("/flow", flow_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Start the API server with default state.
pub async fn serve(config: ServerConfig) -> crate::Result<()> {
    serve_with_state(config, AppState::new()).await
}

/// Start the API server with custom state.
pub async fn serve_with_state(config: ServerConfig, state: AppState) -> crate::Result<()> {
    let addr = config.bind_address();
    let router = create_router_with_state(state);

    tracing::info!("Starting session-bridge API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(SessionError::Io)?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| SessionError::Io(std::io::Error::other(e.to_string())))?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(err) => tracing::warn!("Failed to listen for shutdown signal: {}", err),
    }
}
