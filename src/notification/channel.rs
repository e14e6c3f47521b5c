//! 通知渠道 trait 定义

use anyhow::Result;
use async_trait::async_trait;

use crate::types::UpdateSet;

/// 通知渠道
///
/// 每个渠道收到同一份变更集合（只读），投递失败返回错误。
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 投递变更集合
    async fn send(&self, updates: &UpdateSet) -> Result<()>;
}
