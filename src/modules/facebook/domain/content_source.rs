/// Content source contract
///
/// The scanners only depend on this trait; `GraphClient` is the production
/// implementation. Tokens are passed per call, and callers must check that a
/// token is present before calling.
use super::entities::{CommentPage, FeedPage, UserProfile};
use crate::shared::errors::AppResult;
use async_trait::async_trait;

/// Query parameters for a group feed page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedParams {
    pub limit: u32,
    pub order: String,
}

impl Default for FeedParams {
    fn default() -> Self {
        Self {
            limit: 10,
            order: "chronological".to_string(),
        }
    }
}

/// Query parameters for a post's comment page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentParams {
    pub limit: u32,
}

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch one page of a group's feed
    async fn fetch_group_feed(
        &self,
        group_external_id: &str,
        access_token: &str,
        params: &FeedParams,
    ) -> AppResult<FeedPage>;

    /// Fetch one page of comments for a post
    async fn fetch_post_comments(
        &self,
        post_external_id: &str,
        access_token: &str,
        params: &CommentParams,
    ) -> AppResult<CommentPage>;

    /// Fetch the public details of a user profile
    async fn fetch_profile_details(
        &self,
        profile_external_id: &str,
        access_token: &str,
    ) -> AppResult<UserProfile>;
}
