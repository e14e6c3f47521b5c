//! 基础类型 - 仓库标识与更新集合

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 仓库标识（如 `"owner/name"`），在整个系统中作为唯一键
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoId(String);

impl RepoId {
    /// 创建仓库标识，空字符串返回 `None`
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 仓库 -> 最后更新时间
///
/// 一次轮询的结果和变更集合都用这个类型表示。按仓库标识排序，
/// 所以遍历顺序就是输出顺序。
pub type UpdateSet = BTreeMap<RepoId, DateTime<Utc>>;
