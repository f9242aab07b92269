/// Periodic scan scheduler
///
/// Runs the group scan and the profile scan on their own intervals until
/// stopped. Each scan kind runs in its own loop, so a slow group scan never
/// delays profile scans, and a kind never overlaps with itself.
use crate::log_info;
use crate::modules::scan::ScanService;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub struct ScanScheduler {
    service: Arc<ScanService>,
    group_interval: Duration,
    profile_interval: Duration,
    stop: CancellationToken,
    is_running: Arc<tokio::sync::RwLock<bool>>,
    group_runs: AtomicU64,
    profile_runs: AtomicU64,
}

impl ScanScheduler {
    pub fn new(service: Arc<ScanService>, group_interval: Duration, profile_interval: Duration) -> Self {
        let stop = service.shutdown_token();
        Self {
            service,
            group_interval,
            profile_interval,
            stop,
            is_running: Arc::new(tokio::sync::RwLock::new(false)),
            group_runs: AtomicU64::new(0),
            profile_runs: AtomicU64::new(0),
        }
    }

    /// Run both scan loops until `stop` is called
    ///
    /// Call it with `tokio::spawn` to run in the background. The first run of
    /// each kind starts immediately.
    pub async fn run(self: Arc<Self>) {
        log_info!(
            "Scan scheduler started (groups every {:?}, profiles every {:?})",
            self.group_interval,
            self.profile_interval
        );

        {
            let mut running = self.is_running.write().await;
            *running = true;
        }

        tokio::join!(self.group_loop(), self.profile_loop());

        {
            let mut running = self.is_running.write().await;
            *running = false;
        }
        log_info!("Scan scheduler stopped");
    }

    async fn group_loop(&self) {
        let mut ticker = interval(self.group_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = self.stop.cancelled() => break,
                _ = ticker.tick() => {
                    self.service.scan_all_groups().await;
                    self.group_runs.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    }

    async fn profile_loop(&self) {
        let mut ticker = interval(self.profile_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = self.stop.cancelled() => break,
                _ = ticker.tick() => {
                    self.service.scan_all_profiles().await;
                    self.profile_runs.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    }

    /// Stop the scheduler; in-progress scans wind down through the shared token
    pub fn stop(&self) {
        self.service.shutdown();
        log_info!("Scan scheduler stop requested");
    }

    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    pub async fn get_statistics(&self) -> SchedulerStatistics {
        SchedulerStatistics {
            is_running: self.is_running().await,
            group_runs: self.group_runs.load(Ordering::Relaxed),
            profile_runs: self.profile_runs.load(Ordering::Relaxed),
        }
    }
}

/// Scheduler statistics for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SchedulerStatistics {
    pub is_running: bool,
    pub group_runs: u64,
    pub profile_runs: u64,
}
