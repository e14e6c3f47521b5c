//! 日志渠道 - 每个变更仓库写一行日志

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::notification::channel::NotificationChannel;
use crate::notification::formatter::log_line;
use crate::types::UpdateSet;

/// 日志渠道，总是排在第一位
pub struct LogChannel;

impl LogChannel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationChannel for LogChannel {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, updates: &UpdateSet) -> Result<()> {
        for (repo, updated_at) in updates {
            info!("{}", log_line(repo, updated_at));
        }
        Ok(())
    }
}
