pub mod repository;
pub mod scan_settings;

pub use repository::SettingsRepository;
pub use scan_settings::ScanSettings;
