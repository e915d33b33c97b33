//! HTTP 请求处理器

pub mod essay;
pub mod health;
pub mod prompt;

pub use essay::handle_receive_essay;
pub use health::handle_health;
pub use prompt::handle_generate_prompt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::gateway::state::AppState;
use crate::providers::CompletionRequest;

const REDACTED_ERROR: &str = "An error occurred while contacting the completion service.";

/// 错误响应 `{"error": "..."}`
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// 处理器错误
///
/// 4xx 在调用上游之前产生，5xx 只来自上游调用
#[derive(Debug)]
pub enum ApiError {
    /// 415
    UnsupportedMediaType,
    /// 400
    BadRequest(&'static str),
    /// 500，消息已按配置处理过
    Upstream(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(self) -> String {
        match self {
            ApiError::UnsupportedMediaType => "Invalid content type".to_string(),
            ApiError::BadRequest(msg) => msg.to_string(),
            ApiError::Upstream(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = ErrorResponse {
            error: self.message(),
        };
        (status, Json(error)).into_response()
    }
}

/// 调用补全服务并 trim 回复
///
/// 失败时记录完整错误，再按 `expose_errors` 决定回传给调用方的内容
async fn complete(state: &AppState, kind: &str, request: CompletionRequest) -> Result<String, ApiError> {
    let provider = state.provider();

    tracing::info!(
        provider = provider.name(),
        model = provider.model(),
        kind,
        max_tokens = request.params.max_tokens,
        "request"
    );

    match provider.complete(request).await {
        Ok(reply) => {
            tracing::info!(provider = provider.name(), kind, chars = reply.len(), "response");
            Ok(reply.trim().to_string())
        }
        Err(err) => {
            tracing::error!(provider = provider.name(), kind, "completion failed: {:#}", err);
            let message = if state.expose_errors() {
                format!("An error occurred: {:#}", err)
            } else {
                REDACTED_ERROR.to_string()
            };
            Err(ApiError::Upstream(message))
        }
    }
}
