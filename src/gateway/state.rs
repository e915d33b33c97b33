//! Gateway 应用状态

use std::sync::Arc;

use crate::providers::CompletionProvider;

/// Gateway 应用状态
///
/// 启动后不再修改，每个请求持有一份廉价克隆
#[derive(Clone)]
pub struct AppState {
    provider: Arc<dyn CompletionProvider>,
    expose_errors: bool,
}

impl AppState {
    pub fn new(provider: Arc<dyn CompletionProvider>, expose_errors: bool) -> Self {
        Self {
            provider,
            expose_errors,
        }
    }

    pub fn provider(&self) -> &Arc<dyn CompletionProvider> {
        &self.provider
    }

    /// 500 响应是否携带原始错误描述
    pub fn expose_errors(&self) -> bool {
        self.expose_errors
    }
}
