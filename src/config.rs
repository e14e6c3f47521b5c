//! 配置 - 从 JSON 文件加载仓库列表和轮询选项
//!
//! 配置文件示例：
//! ```json
//! {
//!   "repos": ["rust-lang/rust", "tokio-rs/tokio"],
//!   "min_poll": "5m",
//!   "request_timeout": "30s"
//! }
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

use crate::types::RepoId;

/// 默认 API 地址
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// 默认单次请求超时
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no repos specified")]
    NoRepos,
    #[error("invalid repo identifier {0:?}")]
    InvalidRepo(String),
    #[error("duplicate repo {0}")]
    DuplicateRepo(String),
    #[error("invalid duration for {field}: {value:?}")]
    InvalidDuration { field: &'static str, value: String },
}

/// 限流响应头名称
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitHeaders {
    pub limit: String,
    pub remaining: String,
    pub reset: String,
}

impl Default for RateLimitHeaders {
    fn default() -> Self {
        Self {
            limit: "X-RateLimit-Limit".to_string(),
            remaining: "X-RateLimit-Remaining".to_string(),
            reset: "X-RateLimit-Reset".to_string(),
        }
    }
}

/// 配置文件的原始结构
#[derive(Debug, Clone, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    repos: Vec<String>,
    #[serde(default)]
    min_poll: Option<String>,
    #[serde(default)]
    api_url: Option<String>,
    #[serde(default)]
    request_timeout: Option<String>,
    #[serde(default)]
    rate_limit_headers: Option<RateLimitHeaders>,
    /// 旧配置格式遗留字段，不再使用
    #[serde(default)]
    #[allow(dead_code)]
    data_file: Option<String>,
}

/// 校验后的监控配置
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// 要轮询的仓库，按配置顺序
    pub repos: Vec<RepoId>,
    /// 两次轮询之间的最小间隔
    pub min_poll: Duration,
    /// API 地址
    pub api_url: String,
    /// 单次请求超时
    pub request_timeout: Duration,
    /// 限流响应头名称
    pub rate_limit_headers: RateLimitHeaders,
}

impl MonitorConfig {
    /// 从文件加载配置
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// 从 JSON 字符串解析配置
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            serde_json::from_str(content).map_err(|source| ConfigError::Parse {
                path: PathBuf::new(),
                source,
            })?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        if raw.repos.is_empty() {
            return Err(ConfigError::NoRepos);
        }

        let mut seen = HashSet::new();
        let mut repos = Vec::with_capacity(raw.repos.len());
        for value in raw.repos {
            let id = RepoId::new(value.clone()).ok_or(ConfigError::InvalidRepo(value))?;
            if !seen.insert(id.clone()) {
                return Err(ConfigError::DuplicateRepo(id.to_string()));
            }
            repos.push(id);
        }

        let min_poll = match raw.min_poll.as_deref() {
            Some(value) if !value.is_empty() => parse_duration(value).ok_or_else(|| {
                ConfigError::InvalidDuration {
                    field: "min_poll",
                    value: value.to_string(),
                }
            })?,
            _ => Duration::ZERO,
        };

        let request_timeout = match raw.request_timeout.as_deref() {
            Some(value) => parse_duration(value).ok_or_else(|| ConfigError::InvalidDuration {
                field: "request_timeout",
                value: value.to_string(),
            })?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            repos,
            min_poll,
            api_url: raw
                .api_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            request_timeout,
            rate_limit_headers: raw.rate_limit_headers.unwrap_or_default(),
        })
    }
}

/// 单个时长片段，如 `90s`、`1.5h`
static DURATION_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?|\.\d+)(ms|h|m|s)").unwrap());

/// 解析 `"1h30m"`、`"90s"`、`"250ms"` 之类的时长字符串
///
/// 整个字符串必须由 `<数字><单位>` 片段组成，否则返回 `None`。
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value == "0" {
        return Some(Duration::ZERO);
    }
    if value.is_empty() {
        return None;
    }

    let mut total_ms = 0f64;
    let mut consumed = 0;
    for caps in DURATION_PART.captures_iter(value) {
        let whole = caps.get(0)?;
        if whole.start() != consumed {
            return None;
        }
        consumed = whole.end();

        let number: f64 = caps[1].parse().ok()?;
        let unit_ms = match &caps[2] {
            "h" => 3_600_000.0,
            "m" => 60_000.0,
            "s" => 1_000.0,
            "ms" => 1.0,
            _ => return None,
        };
        total_ms += number * unit_ms;
    }

    if consumed != value.len() {
        return None;
    }
    Duration::try_from_secs_f64(total_ms / 1_000.0).ok()
}
