//! 变更检测 - 只把更新时间发生变化的仓库交给分发器
//!
//! ## 规则
//! 1. 从未见过的仓库视为变更
//! 2. 更新时间与上次通知的不相等即视为变更（时间倒退也算）
//! 3. 本轮没有结果的仓库（查询失败）保持原记录不变
//! 4. 记录只增不减，只存在于内存中
//!
//! 读取再写入不是原子的，同一时间只能有一个调用方。

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use super::dispatcher::NotificationDispatcher;
use crate::types::{RepoId, UpdateSet};

/// 变更检测器
pub struct ChangeDetector {
    /// 每个仓库最后一次通知的更新时间
    last: HashMap<RepoId, DateTime<Utc>>,
    /// 下游分发器
    dispatcher: NotificationDispatcher,
}

impl ChangeDetector {
    pub fn new(dispatcher: NotificationDispatcher) -> Self {
        Self {
            last: HashMap::new(),
            dispatcher,
        }
    }

    /// 找出变更的仓库并更新记录
    pub fn filter(&mut self, updates: &UpdateSet) -> UpdateSet {
        let mut changes = UpdateSet::new();
        for (repo, updated_at) in updates {
            if self.last.get(repo) != Some(updated_at) {
                changes.insert(repo.clone(), *updated_at);
                self.last.insert(repo.clone(), *updated_at);
            }
        }
        changes
    }

    /// 过滤后投递；没有变更时不调用任何渠道
    pub async fn notify(&mut self, updates: &UpdateSet) -> Result<()> {
        let changes = self.filter(updates);
        if changes.is_empty() {
            debug!(checked = updates.len(), "No repo changes");
            return Ok(());
        }

        debug!(checked = updates.len(), changed = changes.len(), "Repo changes detected");
        self.dispatcher.send(&changes).await
    }

    /// 仓库最后一次通知的更新时间
    pub fn last_known(&self, repo: &RepoId) -> Option<DateTime<Utc>> {
        self.last.get(repo).copied()
    }

    /// 已记录的仓库数量
    pub fn known_count(&self) -> usize {
        self.last.len()
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn repo(name: &str) -> RepoId {
        RepoId::new(name).unwrap()
    }

    #[test]
    fn test_first_sighting_is_a_change() {
        let mut detector = ChangeDetector::new(NotificationDispatcher::new());
        let now = Utc::now();
        let updates = UpdateSet::from([(repo("a/a"), now), (repo("b/b"), now)]);

        let changes = detector.filter(&updates);
        assert_eq!(changes, updates);
        assert_eq!(detector.known_count(), 2);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let mut detector = ChangeDetector::new(NotificationDispatcher::new());
        let updates = UpdateSet::from([(repo("a/a"), Utc::now())]);

        assert_eq!(detector.filter(&updates).len(), 1);
        assert!(detector.filter(&updates).is_empty());
    }

    #[test]
    fn test_only_changed_entries_are_returned() {
        let mut detector = ChangeDetector::new(NotificationDispatcher::new());
        let t0 = Utc::now();
        let t1 = t0 + TimeDelta::seconds(30);

        detector.filter(&UpdateSet::from([(repo("a/a"), t0), (repo("b/b"), t0)]));
        let changes = detector.filter(&UpdateSet::from([(repo("a/a"), t0), (repo("b/b"), t1)]));

        assert_eq!(changes, UpdateSet::from([(repo("b/b"), t1)]));
        assert_eq!(detector.last_known(&repo("b/b")), Some(t1));
    }

    #[test]
    fn test_backwards_timestamp_is_a_change() {
        let mut detector = ChangeDetector::new(NotificationDispatcher::new());
        let t1 = Utc::now();
        let t0 = t1 - TimeDelta::hours(1);

        detector.filter(&UpdateSet::from([(repo("a/a"), t1)]));
        let changes = detector.filter(&UpdateSet::from([(repo("a/a"), t0)]));

        assert_eq!(changes.get(&repo("a/a")), Some(&t0));
        assert_eq!(detector.last_known(&repo("a/a")), Some(t0));
    }

    #[test]
    fn test_missing_repo_keeps_last_known() {
        let mut detector = ChangeDetector::new(NotificationDispatcher::new());
        let t0 = Utc::now();

        detector.filter(&UpdateSet::from([(repo("a/a"), t0), (repo("b/b"), t0)]));
        let changes = detector.filter(&UpdateSet::from([(repo("b/b"), t0)]));

        assert!(changes.is_empty());
        assert_eq!(detector.last_known(&repo("a/a")), Some(t0));
        assert_eq!(detector.known_count(), 2);
    }
}
