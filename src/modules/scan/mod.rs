/// Scan orchestrator
///
/// Architecture:
/// - Domain: scan entities, identifier rules and the `ScanRepository` trait
/// - Application: `ScanService` with the group and profile pipelines
/// - Infrastructure: Diesel-based repository implementation
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{ScanContext, ScanService};
pub use domain::{ActionLogEntry, ScanAction, ScanRepository};
pub use infrastructure::ScanRepositoryImpl;
