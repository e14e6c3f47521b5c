//! 通知分发器 - 按顺序把变更集合投递到所有渠道
//!
//! 遇到第一个失败的渠道立即停止，后面的渠道不会被调用，
//! 错误原样返回给调用方。前面的渠道已经投递成功，这部分不回滚。

use super::channel::NotificationChannel;
use crate::types::UpdateSet;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 通知分发器
pub struct NotificationDispatcher {
    /// 所有注册的渠道，按注册顺序投递
    channels: Vec<Arc<dyn NotificationChannel>>,
    /// 是否为 dry-run 模式
    dry_run: bool,
}

impl NotificationDispatcher {
    /// 创建新的分发器
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            dry_run: false,
        }
    }

    /// 设置 dry-run 模式
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 注册渠道
    pub fn register_channel(&mut self, channel: Arc<dyn NotificationChannel>) {
        info!(channel = channel.name(), "Registering notification channel");
        self.channels.push(channel);
    }

    /// 投递到所有渠道，第一个错误即返回
    pub async fn send(&self, updates: &UpdateSet) -> Result<()> {
        if updates.is_empty() {
            return Ok(());
        }

        for channel in &self.channels {
            if self.dry_run {
                info!(
                    channel = channel.name(),
                    repos = updates.len(),
                    "[DRY-RUN] Would deliver updates"
                );
                continue;
            }

            if let Err(e) = channel.send(updates).await {
                warn!(channel = channel.name(), error = %e, "Channel send failed, skipping remaining channels");
                return Err(e);
            }
            debug!(channel = channel.name(), repos = updates.len(), "Delivered updates");
        }

        Ok(())
    }

    /// 获取已注册的渠道数量
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// 获取已注册的渠道名称
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RepoId;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 测试用的 mock 渠道
    struct MockChannel {
        name: String,
        fail_with: Option<String>,
        send_count: AtomicUsize,
    }

    impl MockChannel {
        fn ok(name: &str) -> Self {
            Self {
                name: name.to_string(),
                fail_with: None,
                send_count: AtomicUsize::new(0),
            }
        }

        fn failing(name: &str, message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Self::ok(name)
            }
        }

        fn get_send_count(&self) -> usize {
            self.send_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NotificationChannel for MockChannel {
        fn name(&self) -> &str {
            &self.name
        }

        async fn send(&self, _updates: &UpdateSet) -> Result<()> {
            self.send_count.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(message) => Err(anyhow!("{}", message)),
                None => Ok(()),
            }
        }
    }

    fn one_update() -> UpdateSet {
        let mut updates = UpdateSet::new();
        updates.insert(RepoId::new("owner/name").unwrap(), Utc::now());
        updates
    }

    #[test]
    fn test_dispatcher_register_channel() {
        let mut dispatcher = NotificationDispatcher::new();
        assert_eq!(dispatcher.channel_count(), 0);

        dispatcher.register_channel(Arc::new(MockChannel::ok("log")));
        dispatcher.register_channel(Arc::new(MockChannel::ok("slack")));
        assert_eq!(dispatcher.channel_count(), 2);
        assert_eq!(dispatcher.channel_names(), vec!["log", "slack"]);
    }

    #[tokio::test]
    async fn test_dispatcher_sends_to_every_channel() {
        let mut dispatcher = NotificationDispatcher::new();
        let a = Arc::new(MockChannel::ok("a"));
        let b = Arc::new(MockChannel::ok("b"));
        dispatcher.register_channel(a.clone());
        dispatcher.register_channel(b.clone());

        dispatcher.send(&one_update()).await.unwrap();

        assert_eq!(a.get_send_count(), 1);
        assert_eq!(b.get_send_count(), 1);
    }

    #[tokio::test]
    async fn test_dispatcher_stops_at_first_failure() {
        let mut dispatcher = NotificationDispatcher::new();
        let a = Arc::new(MockChannel::ok("a"));
        let b = Arc::new(MockChannel::failing("b", "unexpected status: 500"));
        let c = Arc::new(MockChannel::ok("c"));
        dispatcher.register_channel(a.clone());
        dispatcher.register_channel(b.clone());
        dispatcher.register_channel(c.clone());

        let err = dispatcher.send(&one_update()).await.unwrap_err();

        assert_eq!(err.to_string(), "unexpected status: 500");
        assert_eq!(a.get_send_count(), 1);
        assert_eq!(b.get_send_count(), 1);
        assert_eq!(c.get_send_count(), 0);
    }

    #[tokio::test]
    async fn test_dispatcher_skips_empty_updates() {
        let mut dispatcher = NotificationDispatcher::new();
        let channel = Arc::new(MockChannel::ok("a"));
        dispatcher.register_channel(channel.clone());

        dispatcher.send(&UpdateSet::new()).await.unwrap();
        assert_eq!(channel.get_send_count(), 0);
    }

    #[tokio::test]
    async fn test_dispatcher_dry_run() {
        let mut dispatcher = NotificationDispatcher::new().with_dry_run(true);
        let channel = Arc::new(MockChannel::failing("a", "should not be called"));
        dispatcher.register_channel(channel.clone());

        dispatcher.send(&one_update()).await.unwrap();
        assert_eq!(channel.get_send_count(), 0); // 不应该实际发送
    }
}
