/// Runtime scan settings
///
/// - Domain: the `SettingsRepository` contract and typed `ScanSettings`
/// - Infrastructure: Diesel store on the `configs` table
pub mod domain;
pub mod infrastructure;

pub use domain::{ScanSettings, SettingsRepository};
pub use infrastructure::SettingsRepositoryImpl;
