pub mod modules;
mod schema;
pub mod shared;

use modules::facebook::{ContentSource, GraphClient};
use modules::scan::{ScanRepository, ScanRepositoryImpl, ScanService};
use modules::scheduler::ScanScheduler;
use modules::settings::{SettingsRepository, SettingsRepositoryImpl};
use shared::errors::AppResult;
use shared::infrastructure::migrations::run_pending_migrations;
use shared::{AppConfig, Database};
use std::sync::Arc;

/// Wire the collaborators and run the scan scheduler until Ctrl-C
pub async fn run() -> AppResult<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    shared::utils::init_logger();

    let config = AppConfig::from_env()?;

    let database = Database::new(&config.database_url)?;
    run_pending_migrations(&database)?;

    let repository: Arc<dyn ScanRepository> = Arc::new(ScanRepositoryImpl::new(database.clone()));
    let settings: Arc<dyn SettingsRepository> =
        Arc::new(SettingsRepositoryImpl::new(database.clone()));
    let content: Arc<dyn ContentSource> = Arc::new(GraphClient::new(&config.graph)?);

    let service = Arc::new(ScanService::new(repository, content, settings));
    let scheduler = Arc::new(ScanScheduler::new(
        service,
        config.group_scan_interval,
        config.profile_scan_interval,
    ));

    let worker = Arc::clone(&scheduler);
    let handle = tokio::spawn(async move {
        worker.run().await;
    });
    crate::log_info!("Scan scheduler initialized");

    if let Err(e) = tokio::signal::ctrl_c().await {
        crate::log_error!("Failed to listen for shutdown signal: {}", e);
    }
    scheduler.stop();
    handle.await?;

    let status = database.pool_status();
    crate::log_info!(
        "Shutdown complete ({} of {} connections open)",
        status.connections,
        status.max_size
    );
    Ok(())
}
