//! 错误上报 - 通过异步通道把错误交给后台任务写日志
//!
//! 上报方只做一次非阻塞的 `send`，不会拖慢轮询循环。

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::error;

/// 错误上报端
#[derive(Debug, Clone)]
pub struct ErrorReporter {
    tx: UnboundedSender<anyhow::Error>,
}

impl ErrorReporter {
    /// 创建上报端和对应的接收端
    pub fn channel() -> (Self, UnboundedReceiver<anyhow::Error>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// 创建上报端，并启动后台任务消费错误
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (reporter, rx) = Self::channel();
        let handle = tokio::spawn(drain_errors(rx));
        (reporter, handle)
    }

    /// 上报错误，从不阻塞
    pub fn report(&self, err: impl Into<anyhow::Error>) {
        if let Err(mpsc::error::SendError(err)) = self.tx.send(err.into()) {
            // 后台任务已退出，直接写日志
            error!(error = %format!("{:#}", err), "Error reported after drain task stopped");
        }
    }
}

/// 持续消费错误并写日志，直到所有上报端被丢弃
pub async fn drain_errors(mut rx: UnboundedReceiver<anyhow::Error>) {
    while let Some(err) = rx.recv().await {
        error!(error = %format!("{:#}", err), "Poll error");
    }
}
