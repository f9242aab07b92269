//! Scan settings resolved once per run
//!
//! Every value comes from the settings store with a fallback default. A
//! missing, unparseable or non-positive number falls back to its default,
//! so a misconfigured key can never produce a zero-width task pool.

use super::repository::SettingsRepository;
use crate::log_warn;
use std::time::Duration;

pub const SCAN_MAIN_CONCURRENCY: &str = "SCAN_MAIN_CONCURRENCY";
pub const FACEBOOK_GROUP_LIMIT: &str = "FACEBOOK_GROUP_LIMIT";
pub const SCAN_POSTS_CONCURRENCY: &str = "SCAN_POSTS_CONCURRENCY";
pub const FACEBOOK_GROUP_FEED_LIMIT: &str = "FACEBOOK_GROUP_FEED_LIMIT";
pub const FACEBOOK_GROUP_FEED_ORDER: &str = "FACEBOOK_GROUP_FEED_ORDER";
pub const SCAN_POST_CONCURRENCY: &str = "SCAN_POST_CONCURRENCY";
pub const SCAN_COMMENT_CONCURRENCY: &str = "SCAN_COMMENT_CONCURRENCY";
pub const FACEBOOK_COMMENTS_LIMIT: &str = "FACEBOOK_COMMENTS_LIMIT";
pub const FACEBOOK_PROFILE_SCAN_LIMIT: &str = "FACEBOOK_PROFILE_SCAN_LIMIT";
pub const SCAN_PROFILE_CONCURRENCY: &str = "SCAN_PROFILE_CONCURRENCY";
pub const SCAN_DEADLINE_SECONDS: &str = "SCAN_DEADLINE_SECONDS";
pub const SCAN_MAX_OUTBOUND_REQUESTS: &str = "SCAN_MAX_OUTBOUND_REQUESTS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    /// Accounts scanned at once
    pub account_concurrency: usize,
    /// Groups fetched per account
    pub group_fetch_limit: u32,
    /// Groups scanned at once within one account
    pub group_concurrency: usize,
    /// Posts requested per feed page
    pub feed_page_size: u32,
    pub feed_order: String,
    /// Posts processed at once within one group
    pub post_concurrency: usize,
    /// Comments processed at once within one post
    pub comment_concurrency: usize,
    /// Comments submitted per post
    pub comment_limit: u32,
    pub profile_scan_limit: u32,
    pub profile_concurrency: usize,
    pub deadline: Duration,
    /// Ceiling on concurrent leaf tasks across all nesting levels
    pub max_outbound_requests: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            account_concurrency: 2,
            group_fetch_limit: 5,
            group_concurrency: 5,
            feed_page_size: 10,
            feed_order: "chronological".to_string(),
            post_concurrency: 5,
            comment_concurrency: 5,
            comment_limit: 15,
            profile_scan_limit: 80,
            profile_concurrency: 5,
            deadline: Duration::from_secs(600),
            max_outbound_requests: 250,
        }
    }
}

impl ScanSettings {
    /// Read every setting once and apply the outbound budget
    pub async fn resolve(repo: &dyn SettingsRepository) -> Self {
        let d = Self::default();

        let settings = Self {
            account_concurrency: positive(repo, SCAN_MAIN_CONCURRENCY, d.account_concurrency).await,
            group_fetch_limit: positive(repo, FACEBOOK_GROUP_LIMIT, d.group_fetch_limit).await,
            group_concurrency: positive(repo, SCAN_POSTS_CONCURRENCY, d.group_concurrency).await,
            feed_page_size: positive(repo, FACEBOOK_GROUP_FEED_LIMIT, d.feed_page_size).await,
            feed_order: non_empty(repo, FACEBOOK_GROUP_FEED_ORDER, &d.feed_order).await,
            post_concurrency: positive(repo, SCAN_POST_CONCURRENCY, d.post_concurrency).await,
            comment_concurrency: positive(repo, SCAN_COMMENT_CONCURRENCY, d.comment_concurrency)
                .await,
            comment_limit: positive(repo, FACEBOOK_COMMENTS_LIMIT, d.comment_limit).await,
            profile_scan_limit: positive(repo, FACEBOOK_PROFILE_SCAN_LIMIT, d.profile_scan_limit)
                .await,
            profile_concurrency: positive(repo, SCAN_PROFILE_CONCURRENCY, d.profile_concurrency)
                .await,
            deadline: Duration::from_secs(
                positive(repo, SCAN_DEADLINE_SECONDS, d.deadline.as_secs()).await,
            ),
            max_outbound_requests: positive(
                repo,
                SCAN_MAX_OUTBOUND_REQUESTS,
                d.max_outbound_requests,
            )
            .await,
        };

        settings.within_outbound_budget()
    }

    /// Upper bound on concurrently executing comment tasks
    pub fn effective_parallelism(&self) -> usize {
        self.parent_fan_out()
            .saturating_mul(self.comment_concurrency)
    }

    fn parent_fan_out(&self) -> usize {
        self.account_concurrency
            .saturating_mul(self.group_concurrency)
            .saturating_mul(self.post_concurrency)
    }

    /// Shrink the leaf limit until the nested product fits the budget
    ///
    /// Only the comment level is reduced, and never below 1, so the product
    /// can still exceed the budget when the parent levels alone do.
    pub fn within_outbound_budget(mut self) -> Self {
        let effective = self.effective_parallelism();
        if effective <= self.max_outbound_requests {
            return self;
        }

        let capped = (self.max_outbound_requests / self.parent_fan_out().max(1)).max(1);
        log_warn!(
            "Scan fan-out {} exceeds {} = {}; reducing {} from {} to {}",
            effective,
            SCAN_MAX_OUTBOUND_REQUESTS,
            self.max_outbound_requests,
            SCAN_COMMENT_CONCURRENCY,
            self.comment_concurrency,
            capped
        );
        self.comment_concurrency = capped;
        self
    }
}

async fn positive<T>(repo: &dyn SettingsRepository, key: &str, default: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default + std::fmt::Display + Copy,
{
    let raw = repo.get_string(key, &default.to_string()).await;
    parse_positive(key, &raw, default)
}

fn parse_positive<T>(key: &str, raw: &str, default: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default + std::fmt::Display + Copy,
{
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => value,
        _ => {
            log_warn!(
                "Invalid value {:?} for setting {}, using default {}",
                raw,
                key,
                default
            );
            default
        }
    }
}

async fn non_empty(repo: &dyn SettingsRepository, key: &str, default: &str) -> String {
    let raw = repo.get_string(key, default).await;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        log_warn!("Empty value for setting {}, using default {}", key, default);
        default.to_string()
    } else {
        trimmed.to_string()
    }
}
