//! 作文评分处理器

use axum::{extract::State, http::HeaderMap, Json};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::{
    handlers::{complete, ApiError},
    state::AppState,
};
use crate::providers::{ChatMessage, CompletionRequest, SamplingParams};
use crate::rubrics::TestType;
use crate::utils::is_json_content_type;

/// 提交的作文
///
/// 字段缺失或为 null 时按空字符串处理
#[derive(Debug, Deserialize)]
struct EssaySubmission {
    #[serde(default)]
    essay: Option<String>,
    #[serde(default)]
    test_type: Option<String>,
    #[serde(default)]
    prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    evaluation: String,
}

/// 校验顺序：Content-Type → JSON → essay → test_type
fn validate(headers: &HeaderMap, body: &[u8]) -> Result<(TestType, CompletionRequest), ApiError> {
    if !is_json_content_type(headers) {
        return Err(ApiError::UnsupportedMediaType);
    }

    // 顶层必须是对象
    let value: Value =
        serde_json::from_slice(body).map_err(|_| ApiError::BadRequest("Invalid JSON"))?;
    if !value.is_object() {
        return Err(ApiError::BadRequest("Invalid JSON"));
    }
    let submission: EssaySubmission =
        serde_json::from_value(value).map_err(|_| ApiError::BadRequest("Invalid JSON"))?;

    tracing::debug!(?submission, "received essay");

    let essay = submission.essay.as_deref().unwrap_or_default().trim();
    if essay.is_empty() {
        return Err(ApiError::BadRequest("No essay received"));
    }

    let test_type: TestType = submission
        .test_type
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid or missing test type. Use IELTS, SAT, or GRE."))?;

    let prompt = submission.prompt.as_deref().unwrap_or_default();
    let request = CompletionRequest {
        messages: vec![
            ChatMessage::system(test_type.rubric(prompt)),
            ChatMessage::user(essay),
        ],
        params: SamplingParams::GRADING,
    };

    Ok((test_type, request))
}

/// POST /receive_essay
pub async fn handle_receive_essay(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<EvaluationResponse>, ApiError> {
    let (test_type, request) = validate(&headers, &body)?;
    let evaluation = complete(&state, test_type.as_str(), request).await?;
    Ok(Json(EvaluationResponse { evaluation }))
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, http::StatusCode};

    use crate::gateway::testing::{post_json, post_request, send, send_with, FakeProvider};
    use crate::providers::{Role, SamplingParams};

    const EVALUATION: &str = "Task Response: 6\nOverall Band Score: 6.0";

    #[tokio::test]
    async fn lowercase_test_type_is_graded() {
        let fake = FakeProvider::replying(EVALUATION);
        let (status, body) = post_json(
            &fake,
            "/receive_essay",
            r#"{"essay": "Climate change is real.", "test_type": "ielts", "prompt": "Discuss."}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["evaluation"], EVALUATION);
        assert_eq!(fake.calls(), 1);
    }

    #[tokio::test]
    async fn sends_rubric_as_system_and_essay_as_user() {
        let fake = FakeProvider::replying(EVALUATION);
        post_json(
            &fake,
            "/receive_essay",
            r#"{"essay": "  My essay.  ", "test_type": " gre ", "prompt": "Issue: cities."}"#,
        )
        .await;

        let requests = fake.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.params, SamplingParams::GRADING);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert!(request.messages[0]
            .content
            .starts_with("You are grading 2 GRE essays: Issue and Argument. Prompts:\n\nIssue: cities.\n\n"));
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[1].content, "My essay.");
    }

    #[tokio::test]
    async fn reply_is_trimmed() {
        let fake = FakeProvider::replying("\n  Total Score: 5.5  \n");
        let (status, body) = post_json(
            &fake,
            "/receive_essay",
            r#"{"essay": "text", "test_type": "SAT"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["evaluation"], "Total Score: 5.5");
    }

    #[tokio::test]
    async fn missing_prompt_is_allowed() {
        let fake = FakeProvider::replying(EVALUATION);
        let (status, _) = post_json(
            &fake,
            "/receive_essay",
            r#"{"essay": "text", "test_type": "SAT", "prompt": null}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let requests = fake.requests();
        assert!(requests[0].messages[0]
            .content
            .starts_with("You are an SAT essay scorer. Prompt:\n\n\n\n"));
    }

    #[tokio::test]
    async fn blank_essay_is_rejected_without_calling_upstream() {
        let fake = FakeProvider::replying(EVALUATION);
        let (status, body) = post_json(
            &fake,
            "/receive_essay",
            r#"{"essay": "  ", "test_type": "SAT"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No essay received");
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn missing_essay_is_rejected() {
        let fake = FakeProvider::replying(EVALUATION);
        let (status, body) = post_json(&fake, "/receive_essay", r#"{"test_type": "SAT"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No essay received");
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_test_type_is_rejected() {
        let fake = FakeProvider::replying(EVALUATION);
        let (status, body) = post_json(
            &fake,
            "/receive_essay",
            r#"{"essay": "text", "test_type": "TOEFL"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Invalid or missing test type. Use IELTS, SAT, or GRE."
        );
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn empty_essay_wins_over_bad_test_type() {
        let fake = FakeProvider::replying(EVALUATION);
        let (status, body) = post_json(&fake, "/receive_essay", r#"{"essay": ""}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No essay received");
    }

    #[tokio::test]
    async fn invalid_json_is_rejected() {
        let fake = FakeProvider::replying(EVALUATION);
        let (status, body) = post_json(&fake, "/receive_essay", "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid JSON");
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn array_body_is_rejected_without_calling_upstream() {
        let fake = FakeProvider::replying(EVALUATION);
        let (status, body) = post_json(
            &fake,
            "/receive_essay",
            r#"["Climate change is real.", "IELTS", "Discuss."]"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid JSON");
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn non_string_fields_are_rejected() {
        let fake = FakeProvider::replying(EVALUATION);
        let (status, body) =
            post_json(&fake, "/receive_essay", r#"{"essay": 5, "test_type": "SAT"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid JSON");
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn non_json_content_type_is_415_even_with_valid_body() {
        let fake = FakeProvider::replying(EVALUATION);
        let request = post_request(
            "/receive_essay",
            "text/plain",
            r#"{"essay": "text", "test_type": "IELTS"}"#,
        );
        let (status, body) = send(&fake, request).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"], "Invalid content type");
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn missing_content_type_is_415() {
        let fake = FakeProvider::replying(EVALUATION);
        let request = Request::builder()
            .method("POST")
            .uri("/receive_essay")
            .body(Body::from(r#"{"essay": "text", "test_type": "IELTS"}"#))
            .unwrap();
        let (status, _) = send(&fake, request).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn charset_parameter_is_accepted() {
        let fake = FakeProvider::replying(EVALUATION);
        let request = post_request(
            "/receive_essay",
            "application/json; charset=utf-8",
            r#"{"essay": "text", "test_type": "IELTS"}"#,
        );
        let (status, _) = send(&fake, request).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn get_is_not_allowed() {
        let fake = FakeProvider::replying(EVALUATION);
        let request = Request::builder()
            .uri("/receive_essay")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&fake, request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn upstream_failure_is_500_with_description() {
        let fake = FakeProvider::failing("Completion API error 503: overloaded");
        let (status, body) = post_json(
            &fake,
            "/receive_essay",
            r#"{"essay": "text", "test_type": "IELTS"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "An error occurred: Completion API error 503: overloaded"
        );
        assert_eq!(fake.calls(), 1);
    }

    #[tokio::test]
    async fn upstream_failure_can_be_redacted() {
        let fake = FakeProvider::failing("secret upstream detail");
        let request = post_request(
            "/receive_essay",
            "application/json",
            r#"{"essay": "text", "test_type": "IELTS"}"#,
        );
        let (status, body) = send_with(&fake, false, request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["error"].as_str().unwrap();
        assert!(!message.is_empty());
        assert!(!message.contains("secret upstream detail"));
    }
}
