//! 健康检查处理器

use axum::{extract::State, Json};
use serde::Serialize;

use crate::gateway::state::AppState;

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    provider: String,
    model: String,
}

/// GET /health
pub async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = state.provider();

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        provider: provider.name().to_string(),
        model: provider.model().to_string(),
    })
}
