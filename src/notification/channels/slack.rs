//! Slack 渠道（Incoming Webhook）

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

use crate::notification::channel::NotificationChannel;
use crate::notification::formatter::format_updates;
use crate::notification::webhook::{build_client, ensure_success, DEFAULT_TIMEOUT_SECS};
use crate::types::UpdateSet;

/// Slack 渠道配置
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Incoming Webhook URL
    pub webhook_url: String,
    /// 超时时间 (秒)
    pub timeout_secs: u64,
}

impl SlackConfig {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Slack 消息载荷
#[derive(Debug, Serialize)]
struct SlackPayload {
    text: String,
}

/// Slack 渠道
pub struct SlackChannel {
    client: Client,
    config: SlackConfig,
}

impl SlackChannel {
    pub fn new(config: SlackConfig) -> Result<Self> {
        let client = build_client(Duration::from_secs(config.timeout_secs))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl NotificationChannel for SlackChannel {
    fn name(&self) -> &str {
        "slack"
    }

    async fn send(&self, updates: &UpdateSet) -> Result<()> {
        let payload = SlackPayload {
            text: format_updates(updates),
        };

        let response = self
            .client
            .post(&self.config.webhook_url)
            .json(&payload)
            .send()
            .await
            .context("error performing POST request")?;
        ensure_success(&response)?;

        info!(channel = "slack", repos = updates.len(), "Slack notification sent");
        Ok(())
    }
}
