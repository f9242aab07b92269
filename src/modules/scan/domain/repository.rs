/// Persistence gateway for the scan pipelines
///
/// Every write is an upsert keyed on the natural id, so rescans update rows
/// in place and concurrent tasks writing the same row are safe.
use super::entities::{
    ActionLogEntry, GroupToScan, NewComment, NewPost, NewProfile, ProfileScanUpdate,
    ProfileToScan, StoredPost, StoredProfile,
};
use crate::shared::errors::AppResult;
use async_trait::async_trait;

#[async_trait]
pub trait ScanRepository: Send + Sync {
    /// Ids of unblocked accounts holding a non-empty access token
    async fn get_ok_account_ids(&self) -> AppResult<Vec<i32>>;

    /// Joined groups of an account, least recently scanned first
    async fn get_groups_to_scan(&self, account_id: i32, limit: u32) -> AppResult<Vec<GroupToScan>>;

    /// Unscanned profiles, oldest attempt first
    async fn get_profiles_to_scan(&self, limit: u32) -> AppResult<Vec<ProfileToScan>>;

    /// Insert or update a post by its local id
    async fn upsert_post(&self, post: NewPost) -> AppResult<StoredPost>;

    /// Return the profile with this external id, creating it if needed
    async fn upsert_or_fetch_profile(&self, profile: NewProfile) -> AppResult<StoredProfile>;

    /// Insert or update a comment by (post, local id)
    async fn upsert_comment(&self, comment: NewComment) -> AppResult<()>;

    async fn update_group_scanned_at(&self, group_id: i32) -> AppResult<()>;

    /// Write fetched details and mark the profile scanned
    async fn update_profile_after_scan(
        &self,
        profile_id: i32,
        update: ProfileScanUpdate,
    ) -> AppResult<()>;

    /// Record a failed fetch so the profile moves to the back of the queue
    async fn touch_profile_scan_attempt(&self, profile_id: i32) -> AppResult<()>;

    /// Append an audit entry
    async fn log_action(&self, entry: ActionLogEntry) -> AppResult<()>;
}
