pub mod context;
pub mod group_scan;
pub mod profile_scan;
pub mod service;

pub use context::ScanContext;
pub use profile_scan::{join_education, join_work};
pub use service::ScanService;
