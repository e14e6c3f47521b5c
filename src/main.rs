//! Repo Update Monitor CLI
//!
//! 轮询 GitHub 仓库，更新时通过日志、Slack、Flowdock 通知

use anyhow::{Context, Result};
use clap::Parser;
use repo_update_monitor::{
    ChangeDetector, ErrorReporter, FlowdockChannel, FlowdockConfig, GithubStatusSource,
    LogChannel, MonitorConfig, NotificationDispatcher, Poller, SlackChannel, SlackConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "rum")]
#[command(about = "Repo Update Monitor - 轮询仓库并在更新时发送通知")]
#[command(version)]
struct Cli {
    /// 配置文件路径
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
    /// Slack Incoming Webhook URL
    #[arg(long)]
    slack_webhook_url: Option<String>,
    /// Flowdock flow token
    #[arg(long)]
    flowdock_token: Option<String>,
    /// Dry-run 模式（只打印不发送）
    #[arg(long)]
    dry_run: bool,
    /// 只轮询一轮后退出
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    // 例如: RUST_LOG=debug rum --config config.json
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("repo_update_monitor=info,rum=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    let config = MonitorConfig::load(&cli.config)
        .with_context(|| format!("error reading {}", cli.config.display()))?;

    // 日志渠道总是第一个
    let mut dispatcher = NotificationDispatcher::new().with_dry_run(cli.dry_run);
    dispatcher.register_channel(Arc::new(LogChannel::new()));
    if let Some(url) = cli.slack_webhook_url.filter(|u| !u.is_empty()) {
        dispatcher.register_channel(Arc::new(SlackChannel::new(SlackConfig::new(url))?));
    }
    if let Some(token) = cli.flowdock_token.filter(|t| !t.is_empty()) {
        dispatcher.register_channel(Arc::new(FlowdockChannel::new(FlowdockConfig::new(token))?));
    }

    let source = Arc::new(GithubStatusSource::new(&config)?);
    let (errors, drain) = ErrorReporter::spawn();
    let mut poller = Poller::new(
        source,
        config.repos.clone(),
        config.min_poll,
        ChangeDetector::new(dispatcher),
        errors,
    );

    if cli.once {
        poller.poll_once().await;
        // 丢弃上报端，等后台任务把剩余错误写完
        drop(poller);
        let _ = drain.await;
        return Ok(());
    }

    tokio::select! {
        _ = poller.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down");
        }
    }

    Ok(())
}
