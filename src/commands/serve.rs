//! Serve 命令 - 启动 API 服务器
//!
//! 此模块实现 `serve` 命令，启动作文评分和出题两个 HTTP 端点。

use anyhow::Result;

use crate::config::Config;
use crate::gateway;

/// 执行服务器启动命令
///
/// # 功能
///
/// - 根据配置创建补全服务客户端
/// - 初始化 HTTP 路由和中间件
/// - 启动服务器并等待关闭信号（Ctrl+C 或 SIGTERM）
pub async fn serve_command(config: Config) -> Result<()> {
    gateway::serve(config).await
}
