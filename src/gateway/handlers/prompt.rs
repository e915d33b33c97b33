//! 练习题目生成处理器

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Serialize;

use crate::gateway::{
    handlers::{complete, ApiError},
    state::AppState,
};
use crate::providers::{ChatMessage, CompletionRequest, SamplingParams};
use crate::rubrics::PromptKind;

const INVALID_TEST_TYPE: &str =
    "Invalid or missing test type. Use IELTS, SAT, GRE-ISSUE, or GRE-ARGUMENT.";

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    prompt: String,
}

/// 取查询串中最后一个 `test_type`
fn last_test_type(pairs: &[(String, String)]) -> Option<&str> {
    pairs
        .iter()
        .rev()
        .find(|(key, _)| key == "test_type")
        .map(|(_, value)| value.as_str())
}

/// GET /generate_prompt?test_type=...
pub async fn handle_generate_prompt(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<PromptResponse>, ApiError> {
    let Query(pairs) = query.map_err(|rejection| {
        tracing::debug!(%rejection, "unparsable query");
        ApiError::BadRequest(INVALID_TEST_TYPE)
    })?;

    tracing::debug!(?pairs, "received prompt request");

    let kind: PromptKind = last_test_type(&pairs)
        .unwrap_or_default()
        .parse()
        .map_err(|_| ApiError::BadRequest(INVALID_TEST_TYPE))?;

    let request = CompletionRequest {
        messages: vec![ChatMessage::system(kind.instruction())],
        params: SamplingParams::PROMPT_GENERATION,
    };

    let prompt = complete(&state, kind.as_str(), request).await?;
    Ok(Json(PromptResponse { prompt }))
}
