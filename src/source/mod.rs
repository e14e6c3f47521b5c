//! 仓库状态来源 - 查询单个仓库的最后更新时间和当前配额
//!
//! 每次调用只发一个请求，不重试也不缓存。失败时返回的 [`FetchError`]
//! 带有仓库标识和失败阶段，可以直接写入日志。

pub mod github;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::rate_limit::QuotaState;
use crate::types::RepoId;

pub use github::GithubStatusSource;

/// 一次成功查询的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepoStatus {
    /// 仓库最后更新时间
    pub updated_at: DateTime<Utc>,
    /// 本次响应携带的配额
    pub quota: QuotaState,
}

/// 查询失败的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    /// 连接失败或非 2xx 响应
    Transport,
    /// 响应体无法解析
    Parse,
    /// 限流响应头缺失或无法解析
    Header,
}

/// 仓库状态查询错误
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{repo}: request failed: {source}")]
    Transport {
        repo: RepoId,
        #[source]
        source: reqwest::Error,
    },
    /// 非 2xx 响应。响应头里的配额仍然有效时一并带回
    #[error("{repo}: unexpected status {status}")]
    Status {
        repo: RepoId,
        status: u16,
        quota: Option<QuotaState>,
    },
    #[error("{repo}: malformed response: {reason}")]
    Parse { repo: RepoId, reason: String },
    #[error("{repo}: bad rate-limit header {header}: {reason}")]
    Header {
        repo: RepoId,
        header: String,
        reason: String,
    },
}

impl FetchError {
    /// 失败的仓库
    pub fn repo(&self) -> &RepoId {
        match self {
            Self::Transport { repo, .. }
            | Self::Status { repo, .. }
            | Self::Parse { repo, .. }
            | Self::Header { repo, .. } => repo,
        }
    }

    /// 失败响应中仍可用的配额（如限流耗尽时的 403）
    pub fn quota(&self) -> Option<QuotaState> {
        match self {
            Self::Status { quota, .. } => *quota,
            _ => None,
        }
    }

    /// 失败阶段
    pub fn stage(&self) -> FetchStage {
        match self {
            Self::Transport { .. } | Self::Status { .. } => FetchStage::Transport,
            Self::Parse { .. } => FetchStage::Parse,
            Self::Header { .. } => FetchStage::Header,
        }
    }
}

/// 仓库状态来源
#[async_trait]
pub trait RepoStatusSource: Send + Sync {
    /// 查询仓库当前的更新时间和配额
    async fn fetch(&self, repo: &RepoId) -> Result<RepoStatus, FetchError>;
}
