//! Gateway 应用层
//!
//! HTTP 服务器和请求处理

mod handlers;
mod middleware;
mod state;

#[cfg(test)]
mod testing;

pub use state::AppState;

use anyhow::Result;
use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;
use crate::providers::GroqProvider;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

pub async fn serve(config: Config) -> Result<()> {
    let provider = GroqProvider::new(&config.base_url, &config.api_key, &config.model)?;
    tracing::info!(model = %config.model, "Using completion API at {}", config.base_url);
    if !config.expose_errors {
        tracing::info!("Downstream error details will be redacted from responses");
    }

    let state = AppState::new(Arc::new(provider), config.expose_errors);
    let app = build_router(state);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/receive_essay", post(handlers::handle_receive_essay))
        .route("/generate_prompt", get(handlers::handle_generate_prompt))
        .route("/health", get(handlers::handle_health))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_logger))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
                )),
        )
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    tokio::select! {
        _ = ctrl_c => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
