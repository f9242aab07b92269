/// Scan orchestrator entry point
///
/// `ScanService` owns the three collaborators and the shutdown token. The
/// pipelines themselves live in `group_scan` and `profile_scan`.
use crate::log_warn;
use crate::modules::facebook::ContentSource;
use crate::modules::scan::domain::{ActionLogEntry, ScanRepository};
use crate::modules::settings::SettingsRepository;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct ScanService {
    pub(super) repository: Arc<dyn ScanRepository>,
    pub(super) content: Arc<dyn ContentSource>,
    pub(super) settings: Arc<dyn SettingsRepository>,
    pub(super) shutdown: CancellationToken,
}

impl ScanService {
    pub fn new(
        repository: Arc<dyn ScanRepository>,
        content: Arc<dyn ContentSource>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            repository,
            content,
            settings,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token whose cancellation winds down every run started by this service
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Stop all runs: units that have not started their I/O fail fast
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

/// Append an audit entry; a failed write is logged and otherwise ignored
pub(super) async fn audit(repository: &dyn ScanRepository, entry: ActionLogEntry) {
    let action = entry.action;
    if let Err(e) = repository.log_action(entry).await {
        log_warn!("Failed to write {} audit entry: {}", action, e);
    }
}
