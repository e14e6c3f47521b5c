//! 轮询器 - 按配额节奏反复检查所有仓库
//!
//! 每一轮：
//! 1. 按配置顺序逐个查询仓库，成功的结果放入本轮集合并刷新配额，
//!    失败的上报后跳过（下一轮自然重试）
//! 2. 本轮集合交给变更检测和分发
//! 3. 根据最新配额计算下一轮的等待时间
//!
//! 轮次严格串行，首轮立即开始。

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error_reporter::ErrorReporter;
use crate::notification::ChangeDetector;
use crate::rate_limit::RateLimitTracker;
use crate::source::RepoStatusSource;
use crate::types::{RepoId, UpdateSet};

/// 仓库轮询器
pub struct Poller {
    source: Arc<dyn RepoStatusSource>,
    repos: Vec<RepoId>,
    min_poll: Duration,
    tracker: RateLimitTracker,
    detector: ChangeDetector,
    errors: ErrorReporter,
}

impl Poller {
    /// `repos` 不能为空
    pub fn new(
        source: Arc<dyn RepoStatusSource>,
        repos: Vec<RepoId>,
        min_poll: Duration,
        detector: ChangeDetector,
        errors: ErrorReporter,
    ) -> Self {
        debug_assert!(!repos.is_empty(), "poller needs at least one repo");
        Self {
            source,
            repos,
            min_poll,
            tracker: RateLimitTracker::new(),
            detector,
            errors,
        }
    }

    /// 查询所有仓库，返回成功的结果
    pub async fn sweep(&mut self) -> UpdateSet {
        let mut updates = UpdateSet::new();

        for repo in &self.repos {
            match self.source.fetch(repo).await {
                Ok(status) => {
                    updates.insert(repo.clone(), status.updated_at);
                    self.tracker.update(status.quota);
                }
                Err(e) => {
                    if let Some(quota) = e.quota() {
                        self.tracker.update(quota);
                    }
                    self.errors.report(e);
                }
            }
        }

        updates
    }

    /// 执行一轮轮询和通知，返回下一轮前的等待时间
    pub async fn poll_once(&mut self) -> Duration {
        let updates = self.sweep().await;
        let failed = self.repos.len() - updates.len();

        if let Err(e) = self.detector.notify(&updates).await {
            self.errors.report(e.context("notification failed"));
        }

        let next = self
            .tracker
            .next_interval_at(self.repos.len(), self.min_poll, Utc::now());

        if failed > 0 {
            warn!(
                fetched = updates.len(),
                failed,
                next_poll_secs = next.as_secs(),
                "Sweep finished with errors"
            );
        } else {
            info!(
                fetched = updates.len(),
                next_poll_secs = next.as_secs(),
                "Sweep finished"
            );
        }
        next
    }

    /// 持续轮询，不会返回
    pub async fn run(mut self) {
        info!(
            repos = self.repos.len(),
            min_poll_secs = self.min_poll.as_secs(),
            "Poller started"
        );

        let mut delay = Duration::ZERO;
        loop {
            sleep(delay).await;
            delay = self.poll_once().await;
        }
    }

    pub fn repos(&self) -> &[RepoId] {
        &self.repos
    }

    pub fn tracker(&self) -> &RateLimitTracker {
        &self.tracker
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }
}
