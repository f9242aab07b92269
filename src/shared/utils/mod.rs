pub mod logger;
pub mod user_agent;

pub use logger::{init_logger, LogContext, TimedOperation};
