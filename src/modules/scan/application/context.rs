//! Per-run scan context
//!
//! One `ScanContext` is created per top-level run and cloned into every task
//! of the tree. Tasks call `ensure_active` before external I/O; once the
//! deadline passes or the scheduler cancels the run, new units fail fast
//! while in-flight calls finish normally.

use crate::shared::errors::{AppError, AppResult};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ScanContext {
    run_id: Uuid,
    deadline: Instant,
    cancel: CancellationToken,
}

impl ScanContext {
    /// Start a run that expires after `time_limit` or when `parent` is cancelled
    pub fn new(parent: &CancellationToken, time_limit: Duration) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            deadline: Instant::now() + time_limit,
            cancel: parent.child_token(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stop the run; tasks that have not started their I/O yet will fail
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn ensure_active(&self) -> AppResult<()> {
        if self.cancel.is_cancelled() {
            return Err(AppError::DeadlineExceeded(format!(
                "scan run {} was cancelled",
                self.run_id
            )));
        }
        if Instant::now() >= self.deadline {
            return Err(AppError::DeadlineExceeded(format!(
                "scan run {} passed its deadline",
                self.run_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test(start_paused = true)]
    async fn test_deadline_expires() {
        let ctx = ScanContext::new(&CancellationToken::new(), Duration::from_secs(5));
        assert_ok!(ctx.ensure_active());

        tokio::time::advance(Duration::from_secs(6)).await;
        let err = assert_err!(ctx.ensure_active());
        assert!(err.is_deadline());
        assert_eq!(ctx.remaining(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_parent_cancellation_reaches_clones() {
        let parent = CancellationToken::new();
        let ctx = ScanContext::new(&parent, Duration::from_secs(60));
        let clone = ctx.clone();

        parent.cancel();
        assert!(clone.is_cancelled());
        assert!(assert_err!(clone.ensure_active()).is_deadline());
        assert_eq!(clone.run_id(), ctx.run_id());
    }

    #[tokio::test]
    async fn test_run_cancel_does_not_touch_parent() {
        let parent = CancellationToken::new();
        let ctx = ScanContext::new(&parent, Duration::from_secs(60));
        ctx.cancel();
        assert!(ctx.is_cancelled());
        assert!(!parent.is_cancelled());
    }
}
