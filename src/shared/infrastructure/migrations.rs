use crate::shared::errors::{AppError, AppResult};
use crate::shared::infrastructure::database::Database;
use crate::{log_error, log_info};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply pending schema migrations before any scan touches the database
pub fn run_pending_migrations(database: &Database) -> AppResult<()> {
    let mut conn = database.get_connection()?;

    match conn.run_pending_migrations(MIGRATIONS) {
        Ok(applied) => {
            log_info!(
                "Database migrations completed successfully ({} applied)",
                applied.len()
            );
            Ok(())
        }
        Err(e) => {
            log_error!("Failed to run database migrations: {}", e);
            Err(AppError::DatabaseError(format!(
                "Failed to run migrations: {}",
                e
            )))
        }
    }
}
