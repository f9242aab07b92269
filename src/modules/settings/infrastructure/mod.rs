pub mod repository;

pub use repository::SettingsRepositoryImpl;
