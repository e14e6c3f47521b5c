//! Flowdock 渠道（Chat API，表单提交）

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

use crate::notification::channel::NotificationChannel;
use crate::notification::formatter::format_updates;
use crate::notification::webhook::{build_client, ensure_success, DEFAULT_TIMEOUT_SECS};
use crate::types::UpdateSet;

/// Flowdock 默认 API 地址
pub const DEFAULT_FLOWDOCK_URL: &str = "https://api.flowdock.com";

/// Flowdock 渠道配置
#[derive(Debug, Clone)]
pub struct FlowdockConfig {
    /// Flow API token
    pub flow_token: String,
    /// API 地址
    pub api_url: String,
    /// 消息显示的发送者名称
    pub user_name: String,
    /// 超时时间 (秒)
    pub timeout_secs: u64,
}

impl FlowdockConfig {
    pub fn new(flow_token: impl Into<String>) -> Self {
        Self {
            flow_token: flow_token.into(),
            api_url: DEFAULT_FLOWDOCK_URL.to_string(),
            user_name: "rum".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Flowdock 渠道
pub struct FlowdockChannel {
    client: Client,
    config: FlowdockConfig,
}

impl FlowdockChannel {
    pub fn new(config: FlowdockConfig) -> Result<Self> {
        if config.flow_token.is_empty() {
            anyhow::bail!("flow_token is required");
        }
        let client = build_client(Duration::from_secs(config.timeout_secs))?;
        Ok(Self { client, config })
    }

    fn chat_url(&self) -> String {
        format!(
            "{}/messages/chat/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.flow_token
        )
    }

    fn form<'a>(&'a self, content: &'a str) -> [(&'static str, &'a str); 3] {
        [
            ("content", content),
            ("event", "comment"),
            ("external_user_name", self.config.user_name.as_str()),
        ]
    }
}

#[async_trait]
impl NotificationChannel for FlowdockChannel {
    fn name(&self) -> &str {
        "flowdock"
    }

    async fn send(&self, updates: &UpdateSet) -> Result<()> {
        let content = format_updates(updates);

        let response = self
            .client
            .post(self.chat_url())
            .form(&self.form(&content))
            .send()
            .await
            .context("error performing POST request")?;
        ensure_success(&response)?;

        info!(channel = "flowdock", repos = updates.len(), "Flowdock notification sent");
        Ok(())
    }
}
