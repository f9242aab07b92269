pub mod entities;
pub mod identifiers;
pub mod repository;
pub mod value_objects;

pub use entities::{
    AccountScanOutcome, ActionLogEntry, CommentDisposition, GroupScanOutcome, GroupToScan,
    NewComment, NewPost, NewProfile, PostScanOutcome, ProfileScanUpdate, ProfileToScan,
    StoredPost, StoredProfile,
};
pub use repository::ScanRepository;
pub use value_objects::ScanAction;
