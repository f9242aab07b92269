/// In-memory collaborators for scan tests
///
/// The repository fake records every write so tests can assert on stored
/// rows and audit entries without a database.
use async_trait::async_trait;
use fleetscan::modules::facebook::domain::{
    CommentPage, CommentParams, ContentSource, FeedPage, FeedParams, UserProfile,
};
use fleetscan::modules::scan::domain::{
    ActionLogEntry, GroupToScan, NewComment, NewPost, NewProfile, ProfileScanUpdate,
    ProfileToScan, ScanAction, ScanRepository, StoredPost, StoredProfile,
};
use fleetscan::modules::settings::SettingsRepository;
use fleetscan::shared::errors::{AppError, AppResult};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct Recorded {
    pub posts: Vec<NewPost>,
    pub post_ids: HashMap<String, i32>,
    pub profiles: HashMap<String, i32>,
    pub profile_upserts: usize,
    pub comments: Vec<NewComment>,
    pub scanned_groups: Vec<i32>,
    pub profile_updates: Vec<(i32, ProfileScanUpdate)>,
    pub touched_profiles: Vec<i32>,
    pub logs: Vec<ActionLogEntry>,
}

#[derive(Default)]
pub struct InMemoryScanRepository {
    accounts: Vec<i32>,
    groups: HashMap<i32, Vec<GroupToScan>>,
    failing_accounts: HashSet<i32>,
    profiles_to_scan: Vec<ProfileToScan>,
    fail_account_listing: bool,
    fail_profile_listing: bool,
    recorded: Mutex<Recorded>,
}

impl InMemoryScanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, account_id: i32, groups: Vec<GroupToScan>) -> Self {
        self.accounts.push(account_id);
        self.groups.insert(account_id, groups);
        self
    }

    /// Listing groups for this account fails
    pub fn with_failing_account(mut self, account_id: i32) -> Self {
        self.accounts.push(account_id);
        self.failing_accounts.insert(account_id);
        self
    }

    pub fn with_profiles(mut self, profiles: Vec<ProfileToScan>) -> Self {
        self.profiles_to_scan = profiles;
        self
    }

    pub fn failing_account_listing(mut self) -> Self {
        self.fail_account_listing = true;
        self
    }

    pub fn failing_profile_listing(mut self) -> Self {
        self.fail_profile_listing = true;
        self
    }

    pub fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap()
    }

    pub fn logs(&self) -> Vec<ActionLogEntry> {
        self.recorded().logs.clone()
    }

    pub fn logs_for(&self, action: ScanAction) -> Vec<ActionLogEntry> {
        self.logs()
            .into_iter()
            .filter(|entry| entry.action == action)
            .collect()
    }
}

#[async_trait]
impl ScanRepository for InMemoryScanRepository {
    async fn get_ok_account_ids(&self) -> AppResult<Vec<i32>> {
        if self.fail_account_listing {
            return Err(AppError::DatabaseError("accounts unavailable".to_string()));
        }
        Ok(self.accounts.clone())
    }

    async fn get_groups_to_scan(&self, account_id: i32, limit: u32) -> AppResult<Vec<GroupToScan>> {
        if self.failing_accounts.contains(&account_id) {
            return Err(AppError::DatabaseError(format!(
                "groups unavailable for account {}",
                account_id
            )));
        }
        Ok(self
            .groups
            .get(&account_id)
            .map(|groups| groups.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn get_profiles_to_scan(&self, limit: u32) -> AppResult<Vec<ProfileToScan>> {
        if self.fail_profile_listing {
            return Err(AppError::DatabaseError("profiles unavailable".to_string()));
        }
        Ok(self
            .profiles_to_scan
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn upsert_post(&self, post: NewPost) -> AppResult<StoredPost> {
        let mut recorded = self.recorded();
        let next_id = 100 + recorded.post_ids.len() as i32;
        let id = *recorded.post_ids.entry(post.post_id.clone()).or_insert(next_id);
        let stored = StoredPost {
            id,
            post_id: post.post_id.clone(),
        };
        recorded.posts.push(post);
        Ok(stored)
    }

    async fn upsert_or_fetch_profile(&self, profile: NewProfile) -> AppResult<StoredProfile> {
        let mut recorded = self.recorded();
        recorded.profile_upserts += 1;
        let next_id = 500 + recorded.profiles.len() as i32;
        let id = *recorded
            .profiles
            .entry(profile.facebook_id.clone())
            .or_insert(next_id);
        Ok(StoredProfile {
            id,
            facebook_id: profile.facebook_id,
        })
    }

    async fn upsert_comment(&self, comment: NewComment) -> AppResult<()> {
        self.recorded().comments.push(comment);
        Ok(())
    }

    async fn update_group_scanned_at(&self, group_id: i32) -> AppResult<()> {
        self.recorded().scanned_groups.push(group_id);
        Ok(())
    }

    async fn update_profile_after_scan(
        &self,
        profile_id: i32,
        update: ProfileScanUpdate,
    ) -> AppResult<()> {
        self.recorded().profile_updates.push((profile_id, update));
        Ok(())
    }

    async fn touch_profile_scan_attempt(&self, profile_id: i32) -> AppResult<()> {
        self.recorded().touched_profiles.push(profile_id);
        Ok(())
    }

    async fn log_action(&self, entry: ActionLogEntry) -> AppResult<()> {
        self.recorded().logs.push(entry);
        Ok(())
    }
}

/// Content source serving canned pages; unknown ids are upstream errors
#[derive(Default)]
pub struct FakeContentSource {
    feeds: HashMap<String, FeedPage>,
    comment_pages: HashMap<String, CommentPage>,
    profiles: HashMap<String, UserProfile>,
    pub feed_calls: AtomicUsize,
    pub comment_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
}

impl FakeContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, group_external_id: &str, page: FeedPage) -> Self {
        self.feeds.insert(group_external_id.to_string(), page);
        self
    }

    pub fn with_comment_page(mut self, post_external_id: &str, page: CommentPage) -> Self {
        self.comment_pages
            .insert(post_external_id.to_string(), page);
        self
    }

    pub fn with_profile(mut self, profile_external_id: &str, profile: UserProfile) -> Self {
        self.profiles
            .insert(profile_external_id.to_string(), profile);
        self
    }

    pub fn comment_calls(&self) -> usize {
        self.comment_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSource for FakeContentSource {
    async fn fetch_group_feed(
        &self,
        group_external_id: &str,
        _access_token: &str,
        _params: &FeedParams,
    ) -> AppResult<FeedPage> {
        self.feed_calls.fetch_add(1, Ordering::SeqCst);
        self.feeds.get(group_external_id).cloned().ok_or_else(|| {
            AppError::ApiError(format!("API error: status 400, body: unknown group {}", group_external_id))
        })
    }

    async fn fetch_post_comments(
        &self,
        post_external_id: &str,
        _access_token: &str,
        _params: &CommentParams,
    ) -> AppResult<CommentPage> {
        self.comment_calls.fetch_add(1, Ordering::SeqCst);
        self.comment_pages
            .get(post_external_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_external_id)))
    }

    async fn fetch_profile_details(
        &self,
        profile_external_id: &str,
        _access_token: &str,
    ) -> AppResult<UserProfile> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.profiles
            .get(profile_external_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("profile {}", profile_external_id)))
    }
}

/// Settings store backed by a map; missing keys return the default
#[derive(Default)]
pub struct StaticSettings {
    values: HashMap<String, String>,
}

impl StaticSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

#[async_trait]
impl SettingsRepository for StaticSettings {
    async fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}
