/// Interval-driven scan scheduling
pub mod worker;

pub use worker::{ScanScheduler, SchedulerStatistics};
