/// Process-level configuration loaded from the environment
///
/// Runtime scan tuning (concurrency, page sizes) lives in the `configs` table
/// and is resolved per run by `modules::settings::ScanSettings`.
use crate::shared::errors::{AppError, AppResult};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub graph: GraphApiConfig,
    /// Interval between two `scan_all_groups` runs
    pub group_scan_interval: Duration,
    /// Interval between two `scan_all_profiles` runs
    pub profile_scan_interval: Duration,
}

#[derive(Debug, Clone)]
pub struct GraphApiConfig {
    pub base_url: String,
    /// Empty means unversioned paths (`{base}/{node}`)
    pub api_version: String,
    pub requests_per_second: f64,
    pub burst: u32,
    pub timeout: Duration,
}

impl Default for GraphApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://graph.facebook.com".to_string(),
            api_version: String::new(),
            requests_per_second: 5.0,
            burst: 10,
            timeout: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment (after `.env` has been read)
    pub fn from_env() -> AppResult<Self> {
        let database_url = env::var("DATABASE_URL").map_err(|_| {
            AppError::ConfigurationError("DATABASE_URL environment variable not found".to_string())
        })?;

        let defaults = GraphApiConfig::default();
        let config = Self {
            database_url,
            graph: GraphApiConfig {
                base_url: env::var("GRAPH_API_BASE_URL").unwrap_or(defaults.base_url),
                api_version: env::var("GRAPH_API_VERSION").unwrap_or(defaults.api_version),
                requests_per_second: env_or("GRAPH_REQUESTS_PER_SECOND", defaults.requests_per_second)?,
                burst: env_or("GRAPH_BURST", defaults.burst)?,
                timeout: Duration::from_secs(env_or("GRAPH_TIMEOUT_SECONDS", 30u64)?),
            },
            group_scan_interval: Duration::from_secs(env_or("GROUP_SCAN_INTERVAL_SECONDS", 1800u64)?),
            profile_scan_interval: Duration::from_secs(env_or(
                "PROFILE_SCAN_INTERVAL_SECONDS",
                1800u64,
            )?),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> AppResult<()> {
        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(AppError::ConfigurationError(
                "Invalid database URL format. Must start with postgres:// or postgresql://"
                    .to_string(),
            ));
        }

        if self.graph.requests_per_second <= 0.0 {
            return Err(AppError::ConfigurationError(format!(
                "GRAPH_REQUESTS_PER_SECOND must be positive, got {}",
                self.graph.requests_per_second
            )));
        }

        if self.group_scan_interval.is_zero() || self.profile_scan_interval.is_zero() {
            return Err(AppError::ConfigurationError(
                "Scan intervals must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| {
            AppError::ConfigurationError(format!("{} has an invalid value: {}", key, raw))
        }),
        Err(_) => Ok(default),
    }
}
