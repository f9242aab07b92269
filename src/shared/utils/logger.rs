use env_logger::Env;
use log::{debug, error, info, warn};
use std::sync::Once;
use std::time::Instant;

static INIT: Once = Once::new();

/// Graph calls slower than this are logged at warn level
const SLOW_GRAPH_CALL_MS: u64 = 5_000;

/// Initialize the logging system
///
/// `RUST_LOG` overrides the defaults below. Safe to call more than once.
pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::Builder::from_env(Env::default().default_filter_or("info"))
            .filter_module("fleetscan", log::LevelFilter::Debug)
            .filter_module("diesel", log::LevelFilter::Warn)
            .filter_module("reqwest", log::LevelFilter::Warn)
            .filter_module("hyper", log::LevelFilter::Warn)
            .filter_module("tokio", log::LevelFilter::Warn)
            .format_timestamp_millis()
            .format_target(false)
            .init();

        info!("Logging system initialized");
    });
}

/// Macro for structured logging with context
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

/// Structured logging helpers for the scan pipelines
pub struct LogContext;

impl LogContext {
    /// Blocking repository work finished on the pool
    pub fn db_operation(operation: &str, table: &str, duration_ms: u64) {
        debug!("DB: {} on {} completed in {}ms", operation, table, duration_ms);
    }

    /// One Graph API request; the path never contains the access token
    pub fn graph_call(path: &str, status: &str, duration_ms: u64) {
        if duration_ms >= SLOW_GRAPH_CALL_MS {
            warn!("Graph: {} {} in {}ms (slow)", path, status, duration_ms);
        } else {
            debug!("Graph: {} {} in {}ms", path, status, duration_ms);
        }
    }

    /// A finished batch at one level of the scan hierarchy
    pub fn scan_progress(level: &str, owner: &str, succeeded: usize, total: usize) {
        info!("Scan: {} {} finished {}/{}", level, owner, succeeded, total);
    }

    pub fn error_with_context(error: &dyn std::error::Error, context: &str) {
        error!("{}: {}", context, error);
    }

    pub fn performance_metric(operation: &str, duration_ms: u64, additional_info: Option<&str>) {
        match additional_info {
            Some(details) => info!("Performance: {} took {}ms ({})", operation, duration_ms, details),
            None => info!("Performance: {} took {}ms", operation, duration_ms),
        }
    }
}

/// Wall-clock timer for one scan run
pub struct TimedOperation {
    start: Instant,
    operation: &'static str,
}

impl TimedOperation {
    pub fn new(operation: &'static str) -> Self {
        debug!("Starting: {}", operation);
        Self {
            start: Instant::now(),
            operation,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Log the duration with a summary of the run and return it
    pub fn finish_with_info(self, details: &str) -> u64 {
        let duration = self.elapsed_ms();
        LogContext::performance_metric(self.operation, duration, Some(details));
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_is_idempotent() {
        init_logger();
        init_logger();
        crate::log_debug!("logger initialized twice without panicking");
    }

    #[test]
    fn test_timed_operation_reports_elapsed() {
        let timer = TimedOperation::new("unit");
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(timer.elapsed_ms() >= 5);
        assert!(timer.finish_with_info("done") >= 5);
    }
}
