//! 限流跟踪 - 根据剩余配额推算下次轮询间隔
//!
//! ## 计算方式
//! 1. `polls_remaining = remaining / repo_count`（整除，偏向更慢的轮询）
//! 2. `polls_remaining > 0`：把距离重置的时间平均分配，`max(reset_in / polls_remaining, min_poll)`
//! 3. `polls_remaining == 0`：等到配额重置
//! 4. 重置时间已过：立即重新轮询

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::debug;

/// 尚未观测到任何配额时的轮询间隔下限
pub const UNKNOWN_QUOTA_INTERVAL: Duration = Duration::from_secs(60);

/// 一次响应中观测到的 API 配额
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaState {
    /// 剩余调用次数
    pub remaining: u64,
    /// 窗口内总调用次数
    pub limit: u64,
    /// 配额重置时间
    pub reset_at: DateTime<Utc>,
}

/// 限流跟踪器
///
/// 只保存最近一次响应的配额，从不合并多次响应。
#[derive(Debug, Default)]
pub struct RateLimitTracker {
    quota: Option<QuotaState>,
}

impl RateLimitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用最新的响应覆盖配额
    pub fn update(&mut self, quota: QuotaState) {
        self.quota = Some(quota);
    }

    /// 最近一次观测到的配额
    pub fn quota(&self) -> Option<QuotaState> {
        self.quota
    }

    /// 计算下次轮询前的等待时间
    pub fn next_interval(&self, repo_count: usize, min_poll: Duration) -> Duration {
        self.next_interval_at(repo_count, min_poll, Utc::now())
    }

    /// 同 [`next_interval`](Self::next_interval)，但使用给定的当前时间
    pub fn next_interval_at(
        &self,
        repo_count: usize,
        min_poll: Duration,
        now: DateTime<Utc>,
    ) -> Duration {
        let Some(quota) = self.quota else {
            return min_poll.max(UNKNOWN_QUOTA_INTERVAL);
        };

        debug_assert!(repo_count > 0, "at least one repo is required");
        let polls_remaining = quota.remaining / repo_count.max(1) as u64;

        // 重置时间已过则为 0
        let reset_in = (quota.reset_at - now).to_std().unwrap_or(Duration::ZERO);

        let interval = if polls_remaining > 0 {
            let candidate = Duration::from_nanos(
                (reset_in.as_nanos() / u128::from(polls_remaining)) as u64,
            );
            candidate.max(min_poll)
        } else {
            reset_in
        };

        debug!(
            remaining = quota.remaining,
            limit = quota.limit,
            repo_count,
            polls_remaining,
            reset_in_secs = reset_in.as_secs(),
            interval_ms = interval.as_millis() as u64,
            "Computed next poll interval"
        );
        interval
    }
}
