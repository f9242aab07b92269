pub mod content_source;
pub mod entities;

pub use content_source::{CommentParams, ContentSource, FeedParams};
pub use entities::{
    CommentPage, CommentsData, Education, EntityNameId, FeedPage, FlexibleId, FromUser, Paging,
    Post, PostComment, UserProfile, Work,
};
