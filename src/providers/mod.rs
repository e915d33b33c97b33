//! Provider 抽象层
//!
//! 定义补全服务的统一接口。网关只依赖 [`CompletionProvider`]，
//! 具体的 HTTP 协议细节留在各个实现里。

pub mod groq;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

pub use groq::GroqProvider;

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// 单条对话消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// 采样参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl SamplingParams {
    /// 作文评分
    pub const GRADING: SamplingParams = SamplingParams {
        temperature: 1.0,
        top_p: 1.0,
        max_tokens: 1024,
    };

    /// 题目生成，回复更短
    pub const PROMPT_GENERATION: SamplingParams = SamplingParams {
        temperature: 1.0,
        top_p: 1.0,
        max_tokens: 512,
    };
}

/// 一次补全请求（始终非流式）
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub params: SamplingParams,
}

/// 补全服务的统一接口
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider 名称（用于日志和标识）
    fn name(&self) -> &str;

    /// 使用的模型标识
    fn model(&self) -> &str;

    /// 发送请求并返回第一个 choice 的文本
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}
