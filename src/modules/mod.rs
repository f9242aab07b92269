pub mod facebook;
pub mod scan;
pub mod scheduler;
pub mod settings;
