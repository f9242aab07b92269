// Graph API content source: payload types, the trait the scanners depend on,
// and the rate-limited HTTP adapter.

pub mod domain;
pub mod infrastructure;

pub use domain::{CommentParams, ContentSource, FeedParams};
pub use infrastructure::GraphClient;
