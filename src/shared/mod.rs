// Shared kernel: concerns used by every module

pub mod concurrency; // Bounded task pool
pub mod config; // Process configuration from the environment
pub mod errors; // Shared error types
pub mod infrastructure; // Database pool and migrations
pub mod utils; // Logging and small helpers

// Re-exports for convenience
pub use concurrency::{TaskOutcome, TaskPool};
pub use config::AppConfig;
pub use infrastructure::database::Database;
