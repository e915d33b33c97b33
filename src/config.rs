//! 应用配置模块
//!
//! 负责从环境变量加载应用配置，包括：
//! - 服务器监听地址和端口
//! - 补全服务的 API 密钥、地址和模型
//! - 错误信息是否回传给调用方

use anyhow::{Context, Result};

use crate::providers::groq::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::utils::parse_flag;

/// 应用配置
#[derive(Debug, Clone)]
pub struct Config {
    /// 服务器监听地址（如 "0.0.0.0" 或 "127.0.0.1"）
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// 补全服务 API 密钥
    pub api_key: String,
    /// 补全服务地址（OpenAI 兼容接口的根路径）
    pub base_url: String,
    /// 模型标识
    pub model: String,
    /// 500 响应中是否带上原始错误描述
    pub expose_errors: bool,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// # 环境变量
    ///
    /// - `ESSAY_GRADER_HOST`: 服务器监听地址（默认: "0.0.0.0"）
    /// - `ESSAY_GRADER_PORT`: 服务器监听端口（默认: 8000）
    /// - `GROQ_API_KEY`: 补全服务密钥（**必需**）
    /// - `GROQ_BASE_URL`: 补全服务地址（默认: Groq 官方地址）
    /// - `GROQ_MODEL`: 模型（默认: llama-3.3-70b-versatile）
    /// - `ESSAY_GRADER_EXPOSE_ERRORS`: 是否回传原始错误（默认: true）
    ///
    /// # 错误
    ///
    /// - 如果 `GROQ_API_KEY` 未设置或为空
    /// - 如果 `ESSAY_GRADER_PORT` 不是有效的端口号
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 用给定的查找函数加载配置，`from_env` 传入的是进程环境
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = get("ESSAY_GRADER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = get("ESSAY_GRADER_PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse()
            .context("ESSAY_GRADER_PORT must be a valid port number")?;

        let api_key = get("GROQ_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .context("GROQ_API_KEY environment variable is required")?;

        let base_url = get("GROQ_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = get("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let expose_errors = get("ESSAY_GRADER_EXPOSE_ERRORS")
            .and_then(|v| parse_flag(&v))
            .unwrap_or(true);

        Ok(Self {
            host,
            port,
            api_key,
            base_url,
            model,
            expose_errors,
        })
    }

    /// 本地访问地址，`0.0.0.0` 会被替换为回环地址
    pub fn local_url(&self, path: &str) -> String {
        let host = if self.host == "0.0.0.0" {
            "127.0.0.1"
        } else {
            self.host.as_str()
        };
        format!("http://{}:{}{}", host, self.port, path)
    }
}
