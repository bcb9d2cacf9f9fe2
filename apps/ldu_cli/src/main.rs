// apps/ldu_cli/src/main.rs

//! LDU 命令行界面
//!
//! 读取、检查并求解以 LDU 格式存储的线性系统。
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 5: Application**：
//! - 系统文件经 `ldu_core` 的流读写解析
//! - 求解器由 `SolutionConfig` 按场名选择
//! - 核心库通过 `log` 输出，这里由 tracing-subscriber 统一收集

mod commands;
mod system;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::FmtSubscriber;

/// LDU 线性系统求解工具
#[derive(Parser)]
#[command(name = "ldu_cli")]
#[command(author = "LDU Core Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Solve and inspect LDU sparse linear systems", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 求解系统文件
    Solve(commands::solve::SolveArgs),
    /// 显示系统文件信息
    Info(commands::info::InfoArgs),
    /// 组装二维算例并用所有适用求解器求解
    Demo(commands::demo::DemoArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // try_init 同时安装 log -> tracing 桥接
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish()
        .try_init()?;

    match cli.command {
        Commands::Solve(args) => commands::solve::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Demo(args) => commands::demo::execute(args),
    }
}
