//! Groq Provider
//!
//! 基于 OpenAI 兼容 chat completions 接口的实现

use anyhow::{Context, Result};
use async_trait::async_trait;
use http::{header, HeaderMap, HeaderValue};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::providers::{ChatMessage, CompletionProvider, CompletionRequest};
use crate::utils::should_disable_tls_verify;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// API 请求超时（秒）
const API_TIMEOUT_SECS: u64 = 120;

/// 上游请求体
#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    stream: bool,
}

pub struct GroqProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GroqProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .user_agent(concat!("essay-grader/", env!("CARGO_PKG_VERSION")));

        if should_disable_tls_verify() {
            tracing::warn!("TLS certificate verification is DISABLED - for debugging only!");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .context("Failed to create completion API client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();

        map.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .context("Invalid API key for header")?,
        );
        map.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        map.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        Ok(map)
    }
}

/// 取出 `choices[0].message.content`
fn extract_reply(body: &Value) -> Option<&str> {
    body.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|v| v.as_str())
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let body = ChatCompletionBody {
            model: &self.model,
            messages: &request.messages,
            temperature: request.params.temperature,
            top_p: request.params.top_p,
            max_tokens: request.params.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(self.endpoint())
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to completion API")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Completion API error {}: {}", status, error_body);
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse completion API response")?;

        let reply = extract_reply(&body)
            .ok_or_else(|| anyhow::anyhow!("Malformed completion response"))?;

        Ok(reply.to_string())
    }
}
