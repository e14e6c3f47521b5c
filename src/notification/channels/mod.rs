//! 具体渠道实现

pub mod log;
pub mod slack;
pub mod flowdock;

pub use log::LogChannel;
pub use slack::{SlackChannel, SlackConfig};
pub use flowdock::{FlowdockChannel, FlowdockConfig};
