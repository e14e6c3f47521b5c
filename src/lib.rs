//! Repo Update Monitor - 在 API 配额内轮询仓库，更新时发送通知

pub mod config;
pub mod error_reporter;
pub mod notification;
pub mod poller;
pub mod rate_limit;
pub mod source;
pub mod types;

pub use config::{ConfigError, MonitorConfig, RateLimitHeaders};
pub use error_reporter::ErrorReporter;
pub use notification::{
    ChangeDetector, FlowdockChannel, FlowdockConfig, LogChannel, NotificationChannel,
    NotificationDispatcher, SlackChannel, SlackConfig,
};
pub use poller::Poller;
pub use rate_limit::{QuotaState, RateLimitTracker};
pub use source::{FetchError, FetchStage, GithubStatusSource, RepoStatus, RepoStatusSource};
pub use types::{RepoId, UpdateSet};
