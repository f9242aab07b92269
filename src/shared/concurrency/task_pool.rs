//! Bounded task pool
//!
//! A `TaskPool` collects a batch of tasks and runs them with at most `limit`
//! executing at any instant. Each task is spawned on the Tokio runtime and
//! must acquire a permit from the pool's semaphore before it starts; the
//! permit is released when the task finishes, fails or panics.
//!
//! `run` always returns one slot per submitted task, in submission order.
//! A task that returns an error or panics fills its slot with a failure and
//! never disturbs its siblings.
//!
//! Pools are cheap and meant to be nested: a task running in one pool may
//! build and run its own pool. The effective parallelism at the innermost
//! level is then the product of every enclosing limit.

use crate::log_debug;
use crate::shared::errors::{AppError, AppResult};
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Semaphore;

type PendingTask<O> = Box<dyn FnOnce() -> BoxFuture<'static, AppResult<O>> + Send>;

/// Result of one task at the pool boundary
#[derive(Debug)]
pub enum TaskOutcome<O> {
    Success(O),
    Failure(AppError),
}

impl<O> TaskOutcome<O> {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success(_))
    }

    pub fn into_result(self) -> AppResult<O> {
        match self {
            TaskOutcome::Success(value) => Ok(value),
            TaskOutcome::Failure(err) => Err(err),
        }
    }
}

struct BatchState<O> {
    pending: Vec<PendingTask<O>>,
    running: bool,
}

pub struct TaskPool<O> {
    limit: usize,
    gate: Arc<Semaphore>,
    state: Mutex<BatchState<O>>,
}

impl<O> fmt::Debug for TaskPool<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("TaskPool")
            .field("limit", &self.limit)
            .field("pending", &state.pending.len())
            .field("running", &state.running)
            .finish()
    }
}

impl<O: Send + 'static> TaskPool<O> {
    /// Create a pool admitting at most `limit` concurrent tasks
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    pub fn new(limit: usize) -> Self {
        assert!(limit > 0, "TaskPool limit must be greater than 0");

        Self {
            limit,
            gate: Arc::new(Semaphore::new(limit)),
            state: Mutex::new(BatchState {
                pending: Vec::new(),
                running: false,
            }),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of tasks waiting for the next `run`
    pub fn pending(&self) -> usize {
        lock(&self.state).pending.len()
    }

    pub fn is_running(&self) -> bool {
        lock(&self.state).running
    }

    /// Add `task(input)` to the pending batch
    ///
    /// Returns `false` and drops the task when a run is in progress on this
    /// pool; the task is not queued for the next batch.
    pub fn submit<I, F, Fut>(&self, task: F, input: I) -> bool
    where
        I: Send + 'static,
        F: FnOnce(I) -> Fut + Send + 'static,
        Fut: Future<Output = AppResult<O>> + Send + 'static,
    {
        let mut state = lock(&self.state);
        if state.running {
            log_debug!("TaskPool: rejected submission while a batch is running");
            return false;
        }

        state
            .pending
            .push(Box::new(move || -> BoxFuture<'static, AppResult<O>> {
                Box::pin(task(input))
            }));
        true
    }

    /// Run the pending batch and return one outcome per task, in submission order
    pub async fn run_outcomes(&self) -> Vec<TaskOutcome<O>> {
        let tasks = {
            let mut state = lock(&self.state);
            if state.running {
                return Vec::new();
            }
            state.running = true;
            std::mem::take(&mut state.pending)
        };
        let _reset = RunningReset { state: &self.state };

        if tasks.is_empty() {
            return Vec::new();
        }

        let handles: Vec<_> = tasks
            .into_iter()
            .map(|task| {
                let gate = Arc::clone(&self.gate);
                tokio::spawn(async move {
                    let _permit = gate.acquire_owned().await.map_err(|_| {
                        AppError::InternalError("Task pool admission gate closed".to_string())
                    })?;
                    task().await
                })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            let outcome = match handle.await {
                Ok(Ok(value)) => TaskOutcome::Success(value),
                Ok(Err(err)) => TaskOutcome::Failure(err),
                Err(join_err) => TaskOutcome::Failure(AppError::from(join_err)),
            };
            outcomes.push(outcome);
        }

        outcomes
    }

    /// Run the pending batch
    ///
    /// Returns `(results, errors)`, both index-aligned with the batch. A failed
    /// slot holds `O::default()` in `results` and the error in `errors`.
    pub async fn run(&self) -> (Vec<O>, Vec<Option<AppError>>)
    where
        O: Default,
    {
        let outcomes = self.run_outcomes().await;

        let mut results = Vec::with_capacity(outcomes.len());
        let mut errors = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                TaskOutcome::Success(value) => {
                    results.push(value);
                    errors.push(None);
                }
                TaskOutcome::Failure(err) => {
                    results.push(O::default());
                    errors.push(Some(err));
                }
            }
        }

        (results, errors)
    }
}

/// Reopens the pool for submissions once a run ends, even if the run future is dropped.
struct RunningReset<'a, O> {
    state: &'a Mutex<BatchState<O>>,
}

impl<O> Drop for RunningReset<'_, O> {
    fn drop(&mut self) {
        lock(self.state).running = false;
    }
}

fn lock<O>(state: &Mutex<BatchState<O>>) -> MutexGuard<'_, BatchState<O>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
