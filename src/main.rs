//! Essay Grader - 作文评分服务
//!
//! 在托管的大模型补全接口前面加一层请求校验和指令模板。
//!
//! # 功能特性
//!
//! - 按 IELTS / SAT / GRE 评分标准给作文打分并给出建议
//! - 生成 IELTS / SAT / GRE Issue / GRE Argument 练习题目
//! - OpenAI 兼容的补全接口（默认 Groq）
//!
//! # 命令行接口
//!
//! - `serve`: 启动 API 服务器
//! - `test`: 向本地服务器发送测试请求

mod commands;
mod config;
mod gateway;
mod providers;
mod rubrics;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use rubrics::PromptKind;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Essay Grader CLI
#[derive(Parser)]
#[command(name = "essay-grader")]
#[command(about = "Essay grading and practice prompt service", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// 可用的命令
#[derive(Subcommand)]
enum Commands {
    /// 启动 API 服务器
    Serve,
    /// 向本地服务器发送测试请求
    Test {
        /// 练习题目类型
        #[arg(value_enum, ignore_case = true, default_value_t = PromptKind::Ielts)]
        test_type: PromptKind,
    },
}

/// 初始化日志系统
///
/// `ESSAY_GRADER_LOG_FORMAT=json` 时输出 JSON 行日志
fn init_tracing() {
    let json = std::env::var("ESSAY_GRADER_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let fmt_layer = if json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "essay_grader=info".into()),
        )
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 .env 文件（如果存在）
    if let Ok(dotenv_path) = std::env::var("ESSAY_GRADER_ENV_FILE") {
        dotenvy::from_path(&dotenv_path).ok();
    } else {
        dotenvy::dotenv().ok();
    }

    init_tracing();

    // 解析命令行参数和配置
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Serve => commands::serve_command(config).await,
        Commands::Test { test_type } => commands::test_command(config, test_type).await,
    }
}
