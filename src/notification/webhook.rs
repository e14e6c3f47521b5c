//! Webhook 渠道共用的 HTTP 工具

use anyhow::{bail, Context, Result};
use reqwest::{Client, Response};
use std::time::Duration;

/// 默认请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 创建带超时的 HTTP 客户端
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}

/// 非 2xx 响应视为投递失败
pub fn ensure_success(response: &Response) -> Result<()> {
    let status = response.status();
    if !status.is_success() {
        bail!("unexpected status: {}", status);
    }
    Ok(())
}
