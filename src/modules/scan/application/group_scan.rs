//! Group scan pipeline
//!
//! accounts -> groups -> posts -> comments, one `TaskPool` per level. Every
//! task returns its own outcome or error; errors are logged and audited at
//! the level that observed them and never escape the pool that ran them.

use super::context::ScanContext;
use super::service::{audit, ScanService};
use crate::modules::facebook::domain::{Post, PostComment};
use crate::modules::facebook::{CommentParams, ContentSource, FeedParams};
use crate::modules::scan::domain::identifiers::{
    local_comment_id, local_post_id, parse_graph_time, validate_comment_id,
};
use crate::modules::scan::domain::{
    AccountScanOutcome, ActionLogEntry, CommentDisposition, GroupScanOutcome, GroupToScan,
    NewComment, NewPost, NewProfile, PostScanOutcome, ScanAction, ScanRepository,
};
use crate::modules::settings::ScanSettings;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::{LogContext, TimedOperation};
use crate::shared::{TaskOutcome, TaskPool};
use crate::{log_debug, log_error, log_info, log_warn};
use dashmap::DashMap;
use std::sync::Arc;

/// State shared by every task of one group scan run
#[derive(Clone)]
struct GroupRun {
    repository: Arc<dyn ScanRepository>,
    content: Arc<dyn ContentSource>,
    settings: Arc<ScanSettings>,
    ctx: ScanContext,
    /// Profile ids by external id, so repeated authors hit the store once per run
    profiles: Arc<DashMap<String, i32>>,
}

impl ScanService {
    /// Scan the groups of every usable account
    pub async fn scan_all_groups(&self) {
        let timer = TimedOperation::new("scan_all_groups");
        let settings = Arc::new(ScanSettings::resolve(self.settings.as_ref()).await);
        let ctx = ScanContext::new(&self.shutdown, settings.deadline);
        log_info!(
            "Starting group scan run {} (fan-out {})",
            ctx.run_id(),
            settings.effective_parallelism()
        );

        let account_ids = match self.repository.get_ok_account_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                log_error!("Error fetching account IDs: {}", e);
                return;
            }
        };

        let run = GroupRun {
            repository: Arc::clone(&self.repository),
            content: Arc::clone(&self.content),
            settings: Arc::clone(&settings),
            ctx,
            profiles: Arc::new(DashMap::new()),
        };

        let pool = TaskPool::new(settings.account_concurrency);
        for &account_id in &account_ids {
            let run = run.clone();
            pool.submit(
                move |id| async move { run.process_groups(id).await },
                account_id,
            );
        }
        let (results, errors) = pool.run().await;

        for (i, err) in errors.iter().enumerate() {
            if let Some(err) = err {
                let account_id = account_ids[i];
                log_error!("Account {} scan group failed: {}", account_id, err);
                audit(
                    self.repository.as_ref(),
                    ActionLogEntry::new(account_id, ScanAction::ScanGroup, err.to_string()),
                )
                .await;
            }
        }

        for (outcome, err) in results.iter().zip(&errors) {
            if err.is_some() {
                continue;
            }
            for group in &outcome.groups {
                audit(
                    self.repository.as_ref(),
                    ActionLogEntry::new(
                        outcome.account_id,
                        ScanAction::ScanGroup,
                        format!(
                            "Scanned group ID {}: {}/{} posts",
                            group.group_id, group.success, group.total
                        ),
                    )
                    .with_target(group.group_id),
                )
                .await;
            }
            log_info!(
                "Account {} scan group successfully: {} group(s), {} failed",
                outcome.account_id,
                outcome.groups.len(),
                outcome.failed_groups
            );
        }

        let failed = errors.iter().filter(|e| e.is_some()).count();
        timer.finish_with_info(&format!(
            "run {}: {}/{} accounts, {:?} left before deadline",
            run.ctx.run_id(),
            account_ids.len() - failed,
            account_ids.len(),
            run.ctx.remaining()
        ));
    }
}

impl GroupRun {
    /// Account level: fetch the account's groups and scan them
    async fn process_groups(&self, account_id: i32) -> AppResult<AccountScanOutcome> {
        self.ctx.ensure_active()?;

        let groups = self
            .repository
            .get_groups_to_scan(account_id, self.settings.group_fetch_limit)
            .await?;
        log_info!("Account {}: Fetched {} groups to scan", account_id, groups.len());

        let pool = TaskPool::new(self.settings.group_concurrency);
        for group in groups {
            let run = self.clone();
            pool.submit(
                move |group| async move { run.process_posts(group).await },
                group,
            );
        }

        let mut outcome = AccountScanOutcome {
            account_id,
            ..AccountScanOutcome::default()
        };
        for result in pool.run_outcomes().await {
            match result {
                TaskOutcome::Success(group) => outcome.groups.push(group),
                TaskOutcome::Failure(err) => {
                    outcome.failed_groups += 1;
                    log_error!("Account {}: Error scanning posts: {}", account_id, err);
                    audit(
                        self.repository.as_ref(),
                        ActionLogEntry::new(
                            account_id,
                            ScanAction::ScanGroup,
                            format!("Error scanning posts: {}", err),
                        ),
                    )
                    .await;
                }
            }
        }

        Ok(outcome)
    }

    /// Group level: read one feed page and scan its posts
    async fn process_posts(&self, group: GroupToScan) -> AppResult<GroupScanOutcome> {
        log_info!("Scanning posts for group {} (ID: {})", group.group_name, group.id);
        self.ctx.ensure_active()?;

        let token: Arc<str> = match group.access_token.as_deref() {
            Some(token) if !token.is_empty() => Arc::from(token),
            _ => {
                return Err(AppError::Unauthorized(format!(
                    "Account {} does not have an access token",
                    group.account_id
                )))
            }
        };

        let params = FeedParams {
            limit: self.settings.feed_page_size,
            order: self.settings.feed_order.clone(),
        };
        let page = self
            .content
            .fetch_group_feed(&group.group_id, &token, &params)
            .await?;

        self.mark_group_scanned(group.id).await;

        let posts = match page.data {
            Some(posts) => posts,
            None => {
                log_info!("No posts data returned for group {}", group.id);
                return Ok(GroupScanOutcome {
                    group_id: group.id,
                    total: 0,
                    success: 0,
                });
            }
        };

        let total = posts.len();
        let pool = TaskPool::new(self.settings.post_concurrency);
        for post in posts {
            let run = self.clone();
            let token = Arc::clone(&token);
            let account_id = group.account_id;
            let group_id = group.id;
            pool.submit(
                move |post| async move { run.process_post(account_id, group_id, token, post).await },
                post,
            );
        }

        let mut success = 0;
        for result in pool.run_outcomes().await {
            match result {
                TaskOutcome::Success(_) => success += 1,
                TaskOutcome::Failure(err) => {
                    log_warn!("Group {}: failed to process post: {}", group.id, err)
                }
            }
        }

        LogContext::scan_progress("group", &group.group_name, success, total);
        Ok(GroupScanOutcome {
            group_id: group.id,
            total,
            success,
        })
    }

    async fn mark_group_scanned(&self, group_id: i32) {
        if let Err(e) = self.repository.update_group_scanned_at(group_id).await {
            log_warn!("Failed to mark group {} as scanned: {}", group_id, e);
        }
    }

    /// Post level: store the post and scan its comments
    async fn process_post(
        &self,
        scraper_id: i32,
        group_id: i32,
        token: Arc<str>,
        post: Post,
    ) -> AppResult<PostScanOutcome> {
        let external_id = post
            .id
            .as_deref()
            .ok_or_else(|| AppError::ValidationError("Post ID is missing".to_string()))?;
        let updated_time = post.updated_time.as_deref().ok_or_else(|| {
            AppError::ValidationError(format!("Post {} has no updated_time", external_id))
        })?;
        log_debug!("Processing post {}", external_id);

        if post.comment_count() == 0 {
            return Ok(PostScanOutcome::default());
        }

        let created_at = parse_graph_time(updated_time)?;
        self.ctx.ensure_active()?;

        let stored = self
            .repository
            .upsert_post(NewPost {
                post_id: local_post_id(external_id).to_string(),
                content: post.message.clone().unwrap_or_default(),
                created_at,
                group_id,
            })
            .await?;

        let embedded = post
            .comments
            .as_ref()
            .and_then(|c| c.data.clone())
            .unwrap_or_default();
        let mut outcome = PostScanOutcome {
            stored: true,
            ..PostScanOutcome::default()
        };

        // The post is stored; a missing comment page only costs its comments
        let comments = if embedded.is_empty() {
            match self.fetch_comments(external_id, &token).await {
                Ok(comments) => comments,
                Err(err) => {
                    let message =
                        format!("Failed to fetch comments for post {}: {}", external_id, err);
                    log_warn!("{}", message);
                    audit(
                        self.repository.as_ref(),
                        ActionLogEntry::new(scraper_id, ScanAction::ScanComment, message)
                            .with_target(stored.id),
                    )
                    .await;
                    return Ok(outcome);
                }
            }
        } else {
            embedded
        };

        let pool = TaskPool::new(self.settings.comment_concurrency);
        for comment in comments
            .into_iter()
            .take(self.settings.comment_limit as usize)
            .filter(|c| c.author_id().is_some())
        {
            let run = self.clone();
            let post_id = stored.id;
            if pool.submit(
                move |comment| async move { run.process_comment(scraper_id, post_id, comment).await },
                comment,
            ) {
                outcome.comments_submitted += 1;
            }
        }

        for result in pool.run_outcomes().await {
            match result {
                TaskOutcome::Success(CommentDisposition::Stored) => outcome.comments_stored += 1,
                TaskOutcome::Success(CommentDisposition::Skipped) => {}
                TaskOutcome::Failure(err) => {
                    outcome.comments_failed += 1;
                    let message =
                        format!("Failed to process comment for post {}: {}", external_id, err);
                    log_error!("{}", message);
                    audit(
                        self.repository.as_ref(),
                        ActionLogEntry::new(scraper_id, ScanAction::ScanComment, message)
                            .with_target(stored.id),
                    )
                    .await;
                }
            }
        }

        Ok(outcome)
    }

    /// Comment page for a post whose feed entry reported comments without embedding them
    async fn fetch_comments(&self, post_external_id: &str, token: &str) -> AppResult<Vec<PostComment>> {
        self.ctx.ensure_active()?;
        let params = CommentParams {
            limit: self.settings.comment_limit,
        };
        let page = self
            .content
            .fetch_post_comments(post_external_id, token, &params)
            .await?;
        Ok(page.data.unwrap_or_default())
    }

    /// Comment level: store the author profile and the comment
    async fn process_comment(
        &self,
        scraper_id: i32,
        post_id: i32,
        comment: PostComment,
    ) -> AppResult<CommentDisposition> {
        let author = match comment.author_id() {
            Some(id) => id.as_str().to_string(),
            None => return Ok(CommentDisposition::Skipped),
        };
        let external_id = validate_comment_id(comment.id.as_deref())?;
        log_debug!("Processing comment {} from post {}", external_id, post_id);
        self.ctx.ensure_active()?;

        let author_name = comment.from.as_ref().and_then(|f| f.name.clone());
        let author_id = self.profile_id(author, author_name, scraper_id).await?;

        let created_time = comment.created_time.as_deref().ok_or_else(|| {
            AppError::ValidationError(format!("Comment {} has no created_time", external_id))
        })?;
        let created_at = parse_graph_time(created_time)?;

        self.repository
            .upsert_comment(NewComment {
                comment_id: local_comment_id(external_id)?.to_string(),
                post_id,
                author_id,
                content: comment.message.clone().unwrap_or_default(),
                created_at,
            })
            .await?;

        Ok(CommentDisposition::Stored)
    }

    async fn profile_id(
        &self,
        facebook_id: String,
        name: Option<String>,
        scraper_id: i32,
    ) -> AppResult<i32> {
        if let Some(id) = self.profiles.get(&facebook_id).map(|entry| *entry.value()) {
            return Ok(id);
        }

        let profile = self
            .repository
            .upsert_or_fetch_profile(NewProfile {
                facebook_id: facebook_id.clone(),
                name,
                scraped_by_id: scraper_id,
            })
            .await?;
        self.profiles.insert(facebook_id, profile.id);
        Ok(profile.id)
    }
}
