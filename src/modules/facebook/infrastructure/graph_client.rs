//! Rate-limited Graph API client
//!
//! All scan tasks share one client, so the `governor` limiter is a single
//! global gate on outbound calls regardless of how the task pools nest.
//! Failed responses are classified into `ApiError`; nothing is retried.

use crate::log_debug;
use crate::modules::facebook::domain::{
    CommentPage, CommentParams, ContentSource, FeedPage, FeedParams, UserProfile,
};
use crate::shared::config::GraphApiConfig;
use crate::shared::errors::{ApiError, AppError, AppResult};
use crate::shared::utils::user_agent::random_android_user_agent;
use crate::shared::utils::LogContext;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use std::num::NonZeroU32;
use std::time::{Duration, Instant};

const COMMENT_FIELDS: &str = "id,message,created_time,like_count,from";
const PROFILE_FIELDS: &str = "id,name,about,email,birthday,gender,link,locale,\
relationship_status,location,hometown,work,education";
const PROFILE_LOCALE: &str = "en_US";

pub struct GraphClient {
    client: Client,
    rate_limiter: DefaultDirectRateLimiter,
    base_url: String,
}

impl GraphClient {
    pub fn new(config: &GraphApiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::ConfigurationError(format!("Failed to build HTTP client: {}", e)))?;

        let base = config.base_url.trim_end_matches('/');
        let base_url = if config.api_version.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, config.api_version.trim_matches('/'))
        };

        Ok(Self {
            client,
            rate_limiter: Self::create_rate_limiter(config.requests_per_second, config.burst)?,
            base_url,
        })
    }

    fn create_rate_limiter(
        requests_per_second: f64,
        burst_size: u32,
    ) -> AppResult<DefaultDirectRateLimiter> {
        if requests_per_second.is_nan() || requests_per_second <= 0.0 {
            return Err(AppError::ConfigurationError(
                "Graph API request rate must be positive".to_string(),
            ));
        }

        let period = Duration::from_secs_f64(1.0 / requests_per_second);
        let burst = NonZeroU32::new(burst_size.max(1)).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(period)
            .ok_or_else(|| {
                AppError::ConfigurationError("Graph API request period must be non-zero".to_string())
            })?
            .allow_burst(burst);

        Ok(RateLimiter::direct(quota))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Take a permit if one is free right now; a granted permit is consumed
    pub fn can_make_request_now(&self) -> bool {
        self.rate_limiter.check().is_ok()
    }

    async fn get<T>(&self, path: &str, access_token: &str, query: &[(&str, String)]) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        if !self.can_make_request_now() {
            log_debug!("Graph rate limit reached, waiting before {}", path);
            self.rate_limiter.until_ready().await;
        }

        let url = format!("{}/{}", self.base_url, path);
        let started = Instant::now();

        let response = self
            .client
            .get(&url)
            .header("User-Agent", random_android_user_agent())
            .header("Accept", "application/json")
            .query(query)
            .query(&[("access_token", access_token)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::SerializationError(format!("Failed to read Graph API response: {}", e))
        })?;
        let elapsed = started.elapsed().as_millis() as u64;

        if status.as_u16() >= 400 {
            LogContext::graph_call(path, status.as_str(), elapsed);
            return Err(ApiError::from_response(status.as_u16(), path, &body).into());
        }

        LogContext::graph_call(path, "ok", elapsed);
        parse_body(&body)
    }
}

/// Decode a successful body, keeping a short excerpt for diagnostics
fn parse_body<T>(body: &str) -> AppResult<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        let excerpt: String = body.chars().take(200).collect();
        ApiError::InvalidResponse {
            message: format!("{}. Response: {}", e, excerpt),
        }
        .into()
    })
}

#[async_trait]
impl ContentSource for GraphClient {
    async fn fetch_group_feed(
        &self,
        group_external_id: &str,
        access_token: &str,
        params: &FeedParams,
    ) -> AppResult<FeedPage> {
        let path = format!("{}/feed", urlencoding::encode(group_external_id));
        let query = [
            ("limit", params.limit.to_string()),
            ("order", params.order.clone()),
        ];
        self.get(&path, access_token, &query).await
    }

    async fn fetch_post_comments(
        &self,
        post_external_id: &str,
        access_token: &str,
        params: &CommentParams,
    ) -> AppResult<CommentPage> {
        let path = format!("{}/comments", urlencoding::encode(post_external_id));
        let query = [
            ("limit", params.limit.to_string()),
            ("fields", COMMENT_FIELDS.to_string()),
        ];
        self.get(&path, access_token, &query).await
    }

    async fn fetch_profile_details(
        &self,
        profile_external_id: &str,
        access_token: &str,
    ) -> AppResult<UserProfile> {
        let path = urlencoding::encode(profile_external_id).into_owned();
        let query = [
            ("fields", PROFILE_FIELDS.to_string()),
            ("locale", PROFILE_LOCALE.to_string()),
        ];
        self.get(&path, access_token, &query).await
    }
}
