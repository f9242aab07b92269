/// Graph API payloads consumed by the scanners
///
/// Every field is optional: the Graph API omits fields freely depending on
/// permissions and privacy settings, and the scanners decide which absences
/// are fatal.
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier that the Graph API sometimes sends as a string and sometimes as a number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FlexibleId(String);

impl FlexibleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FlexibleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FlexibleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => FlexibleId(s),
            Raw::Number(n) => FlexibleId(n.to_string()),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

/// One page of a group feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedPage {
    #[serde(default)]
    pub data: Option<Vec<Post>>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub updated_time: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub from: Option<FromUser>,
    #[serde(default)]
    pub comments: Option<CommentsData>,
    #[serde(default)]
    pub permalink_url: Option<String>,
}

impl Post {
    /// Comment count reported by the feed, zero when absent
    pub fn comment_count(&self) -> u64 {
        self.comments
            .as_ref()
            .and_then(|c| c.count)
            .unwrap_or_default()
    }
}

/// Comment summary embedded in a feed post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentsData {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub data: Option<Vec<PostComment>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostComment {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub from: Option<FromUser>,
}

impl PostComment {
    /// Author id when the comment carries a usable author reference
    pub fn author_id(&self) -> Option<&FlexibleId> {
        self.from.as_ref().and_then(|f| f.id.as_ref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FromUser {
    #[serde(default)]
    pub id: Option<FlexibleId>,
    #[serde(default)]
    pub name: Option<String>,
}

/// One page of `/{post-id}/comments`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentPage {
    #[serde(default)]
    pub data: Option<Vec<PostComment>>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityNameId {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Work {
    #[serde(default)]
    pub employer: Option<EntityNameId>,
    #[serde(default)]
    pub position: Option<EntityNameId>,
    #[serde(default)]
    pub location: Option<EntityNameId>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub school: Option<EntityNameId>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub concentration: Option<Vec<EntityNameId>>,
}

/// Public details of a user profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub relationship_status: Option<String>,
    #[serde(default)]
    pub location: Option<EntityNameId>,
    #[serde(default)]
    pub hometown: Option<EntityNameId>,
    #[serde(default)]
    pub work: Option<Vec<Work>>,
    #[serde(default)]
    pub education: Option<Vec<Education>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flexible_id_accepts_string_and_number() {
        let from: FromUser = serde_json::from_str(r#"{"id": "100042", "name": "A"}"#).unwrap();
        assert_eq!(from.id.unwrap().as_str(), "100042");

        let from: FromUser = serde_json::from_str(r#"{"id": 100042}"#).unwrap();
        assert_eq!(from.id.unwrap().as_str(), "100042");
    }

    #[test]
    fn test_feed_page_parses_nested_comments() {
        let raw = r#"{
            "data": [{
                "id": "456_7891",
                "updated_time": "2025-03-01T10:00:00+0000",
                "message": "hello",
                "comments": {
                    "count": 1,
                    "data": [{
                        "id": "7891_123",
                        "message": "hi",
                        "created_time": "2025-03-01T10:05:00+0000",
                        "from": {"id": 42, "name": "Someone"}
                    }]
                }
            }],
            "paging": {"next": "https://graph.facebook.com/next"}
        }"#;

        let page: FeedPage = serde_json::from_str(raw).unwrap();
        let posts = page.data.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].comment_count(), 1);

        let comments = posts[0].comments.as_ref().unwrap().data.as_ref().unwrap();
        assert_eq!(comments[0].author_id().unwrap().as_str(), "42");
    }

    #[test]
    fn test_feed_page_without_data() {
        let page: FeedPage = serde_json::from_str("{}").unwrap();
        assert!(page.data.is_none());
    }
}
