//! GitHub REST API 状态来源
//!
//! `GET {api_url}/repos/{owner}/{name}`，取响应体里的 `updated_at`，
//! 并从限流响应头读取配额。

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{FetchError, RepoStatus, RepoStatusSource};
use crate::config::{MonitorConfig, RateLimitHeaders};
use crate::rate_limit::QuotaState;
use crate::types::RepoId;

const USER_AGENT: &str = concat!("repo-update-monitor/", env!("CARGO_PKG_VERSION"));

/// 仓库接口响应中我们关心的字段
#[derive(Debug, Deserialize)]
struct RepoResponse {
    updated_at: DateTime<Utc>,
}

/// 限流响应头解析错误
#[derive(Debug, PartialEq)]
struct HeaderError {
    header: String,
    reason: String,
}

/// GitHub 仓库状态来源
#[derive(Debug, Clone)]
pub struct GithubStatusSource {
    client: Client,
    api_url: String,
    headers: RateLimitHeaders,
}

impl GithubStatusSource {
    /// 根据配置创建，请求超时取 `request_timeout`
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            headers: config.rate_limit_headers.clone(),
        })
    }

    fn repo_url(&self, repo: &RepoId) -> String {
        format!("{}/repos/{}", self.api_url, repo)
    }
}

#[async_trait]
impl RepoStatusSource for GithubStatusSource {
    async fn fetch(&self, repo: &RepoId) -> Result<RepoStatus, FetchError> {
        let response = self
            .client
            .get(self.repo_url(repo))
            .header(ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                repo: repo.clone(),
                source,
            })?;

        let status = response.status();
        let quota = parse_quota(response.headers(), &self.headers);

        if !status.is_success() {
            return Err(FetchError::Status {
                repo: repo.clone(),
                status: status.as_u16(),
                quota: quota.ok(),
            });
        }

        let quota = quota.map_err(|e| FetchError::Header {
            repo: repo.clone(),
            header: e.header,
            reason: e.reason,
        })?;

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                repo: repo.clone(),
                source,
            })?;

        let updated_at = parse_updated_at(&body).map_err(|reason| FetchError::Parse {
            repo: repo.clone(),
            reason,
        })?;

        debug!(
            repo = %repo,
            updated_at = %updated_at.to_rfc3339(),
            remaining = quota.remaining,
            "Fetched repo status"
        );

        Ok(RepoStatus { updated_at, quota })
    }
}

/// 从响应头读取配额，三个头必须都存在且合法
fn parse_quota(headers: &HeaderMap, names: &RateLimitHeaders) -> Result<QuotaState, HeaderError> {
    let limit = header_number::<u64>(headers, &names.limit)?;
    if limit == 0 {
        return Err(HeaderError {
            header: names.limit.clone(),
            reason: "limit must be positive".to_string(),
        });
    }

    let remaining = header_number::<u64>(headers, &names.remaining)?;

    let reset = header_number::<i64>(headers, &names.reset)?;
    let reset_at = DateTime::from_timestamp(reset, 0).ok_or_else(|| HeaderError {
        header: names.reset.clone(),
        reason: format!("timestamp {} out of range", reset),
    })?;

    Ok(QuotaState {
        remaining,
        limit,
        reset_at,
    })
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Result<T, HeaderError> {
    let value = headers
        .get(name)
        .ok_or_else(|| HeaderError {
            header: name.to_string(),
            reason: "missing".to_string(),
        })?
        .to_str()
        .map_err(|_| HeaderError {
            header: name.to_string(),
            reason: "not valid ASCII".to_string(),
        })?;

    value.trim().parse().map_err(|_| HeaderError {
        header: name.to_string(),
        reason: format!("cannot parse {:?}", value),
    })
}

/// 从响应体读取 `updated_at`
fn parse_updated_at(body: &[u8]) -> Result<DateTime<Utc>, String> {
    serde_json::from_slice::<RepoResponse>(body)
        .map(|r| r.updated_at)
        .map_err(|e| e.to_string())
}
