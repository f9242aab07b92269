/// Runtime settings storage
///
/// Values are plain strings keyed by name; typed parsing and fallback
/// happen in `ScanSettings::resolve`.
use async_trait::async_trait;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Read a setting, seeding `default` when the key does not exist yet
    ///
    /// Never fails: a storage error is logged and `default` is returned.
    async fn get_string(&self, key: &str, default: &str) -> String;
}
