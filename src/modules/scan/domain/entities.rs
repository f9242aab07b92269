/// Domain entities for the scan pipelines
///
/// Rows read from the store are passed down the task tree by value; outcome
/// types only live for the duration of one run.
use super::value_objects::ScanAction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A group due for scanning, with the token of the account that joined it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupToScan {
    pub id: i32,
    pub group_id: String,
    pub group_name: String,
    pub account_id: i32,
    pub access_token: Option<String>,
}

/// A profile due for a detail scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileToScan {
    pub id: i32,
    pub facebook_id: String,
    pub account_id: i32,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Local post id (last `_` segment of the external id)
    pub post_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub group_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPost {
    pub id: i32,
    pub post_id: String,
}

/// A comment author seen for the first time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub facebook_id: String,
    pub name: Option<String>,
    pub scraped_by_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProfile {
    pub id: i32,
    pub facebook_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    /// Local comment id (last `_` segment of the external id)
    pub comment_id: String,
    pub post_id: i32,
    pub author_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Fields written after a successful profile fetch
///
/// `None` leaves the stored column unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileScanUpdate {
    pub bio: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub hometown: Option<String>,
    pub birthday: Option<String>,
    pub gender: Option<String>,
    pub relationship_status: Option<String>,
    pub work: Option<String>,
    pub education: Option<String>,
    pub profile_url: Option<String>,
    pub locale: Option<String>,
}

/// Posts seen and stored for one group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupScanOutcome {
    pub group_id: i32,
    pub total: usize,
    pub success: usize,
}

/// Result of one account task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountScanOutcome {
    pub account_id: i32,
    pub groups: Vec<GroupScanOutcome>,
    pub failed_groups: usize,
}

/// Result of one post task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostScanOutcome {
    /// False when the post had no comments and nothing was written
    pub stored: bool,
    pub comments_submitted: usize,
    pub comments_stored: usize,
    pub comments_failed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentDisposition {
    Stored,
    #[default]
    Skipped,
}

/// One row of the append-only audit log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub account_id: Option<i32>,
    pub action: ScanAction,
    pub target_id: Option<i32>,
    pub description: Option<String>,
}

impl ActionLogEntry {
    pub fn new(account_id: i32, action: ScanAction, description: impl Into<String>) -> Self {
        Self {
            account_id: Some(account_id),
            action,
            target_id: None,
            description: Some(description.into()),
        }
    }

    pub fn with_target(mut self, target_id: i32) -> Self {
        self.target_id = Some(target_id);
        self
    }
}
