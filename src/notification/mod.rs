//! 通知层 - 变更检测加多渠道分发
//!
//! # 结构
//! 1. `ChangeDetector` 过滤掉未变化的仓库
//! 2. `NotificationDispatcher` 按顺序投递到各渠道，第一个失败即停止
//! 3. 所有渠道实现 `NotificationChannel` trait
//!
//! # 使用示例
//! ```ignore
//! use repo_update_monitor::notification::{ChangeDetector, NotificationDispatcher, LogChannel};
//!
//! let mut dispatcher = NotificationDispatcher::new();
//! dispatcher.register_channel(Arc::new(LogChannel::new()));
//!
//! let mut detector = ChangeDetector::new(dispatcher);
//! detector.notify(&updates).await?;
//! ```

pub mod channel;
pub mod dispatcher;
pub mod channels;
pub mod change_detector;
pub mod formatter;
pub mod webhook;

pub use channel::NotificationChannel;
pub use dispatcher::NotificationDispatcher;
pub use change_detector::ChangeDetector;
pub use channels::{FlowdockChannel, FlowdockConfig, LogChannel, SlackChannel, SlackConfig};
