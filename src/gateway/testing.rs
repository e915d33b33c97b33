//! 处理器测试用的假 Provider 和请求辅助函数

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use crate::gateway::{build_router, AppState};
use crate::providers::{CompletionProvider, CompletionRequest};

/// 记录所有请求并返回固定结果
#[derive(Clone)]
pub struct FakeProvider {
    reply: Result<String, String>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl FakeProvider {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            requests: Arc::default(),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            reply: Err(error.to_string()),
            requests: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request);
        self.reply.clone().map_err(|e| anyhow::anyhow!(e))
    }
}

pub async fn send_with(fake: &FakeProvider, expose_errors: bool, request: Request<Body>) -> (StatusCode, Value) {
    let state = AppState::new(Arc::new(fake.clone()), expose_errors);
    let response = build_router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub async fn send(fake: &FakeProvider, request: Request<Body>) -> (StatusCode, Value) {
    send_with(fake, true, request).await
}

pub async fn get(fake: &FakeProvider, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(fake, request).await
}

pub fn post_request(uri: &str, content_type: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn post_json(fake: &FakeProvider, uri: &str, body: &str) -> (StatusCode, Value) {
    send(fake, post_request(uri, "application/json", body)).await
}
