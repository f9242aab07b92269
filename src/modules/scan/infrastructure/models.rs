/// Diesel models for the scan tables
use crate::modules::scan::domain::{
    ActionLogEntry, NewComment, NewPost, NewProfile, ProfileScanUpdate, ScanAction,
};
use crate::schema::{comments, logs, posts, profiles};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = posts)]
pub struct PostRow {
    pub post_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub group_id: i32,
}

impl From<NewPost> for PostRow {
    fn from(post: NewPost) -> Self {
        Self {
            post_id: post.post_id,
            content: post.content,
            created_at: post.created_at,
            group_id: post.group_id,
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = profiles)]
pub struct NewProfileRow {
    pub facebook_id: String,
    pub name: Option<String>,
    pub scraped_by_id: i32,
}

impl From<NewProfile> for NewProfileRow {
    fn from(profile: NewProfile) -> Self {
        Self {
            facebook_id: profile.facebook_id,
            name: profile.name,
            scraped_by_id: profile.scraped_by_id,
        }
    }
}

/// Columns written after a profile scan; `None` fields are left out of the UPDATE
#[derive(AsChangeset, Debug)]
#[diesel(table_name = profiles)]
pub struct ProfileScanChangeset {
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
    pub is_scanned: bool,
    pub updated_at: DateTime<Utc>,
}

impl ProfileScanChangeset {
    pub fn new(update: ProfileScanUpdate, now: DateTime<Utc>) -> Self {
        Self {
            bio: update.bio,
            email: update.email,
            location: update.location,
            hometown: update.hometown,
            birthday: update.birthday,
            gender: update.gender,
            relationship_status: update.relationship_status,
            work: update.work,
            education: update.education,
            profile_url: update.profile_url,
            locale: update.locale,
            is_scanned: true,
            updated_at: now,
        }
    }
}

#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = comments)]
pub struct CommentRow {
    pub comment_id: String,
    pub post_id: i32,
    pub author_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<NewComment> for CommentRow {
    fn from(comment: NewComment) -> Self {
        Self {
            comment_id: comment.comment_id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = logs)]
pub struct NewLogRow {
    pub account_id: Option<i32>,
    pub action: ScanAction,
    pub target_id: Option<i32>,
    pub description: Option<String>,
}

impl From<ActionLogEntry> for NewLogRow {
    fn from(entry: ActionLogEntry) -> Self {
        Self {
            account_id: entry.account_id,
            action: entry.action,
            target_id: entry.target_id,
            description: entry.description,
        }
    }
}

/// Row of the groups-to-scan query
#[derive(Queryable, Debug)]
pub struct GroupToScanRow {
    pub id: i32,
    pub group_id: String,
    pub group_name: String,
    pub account_id: Option<i32>,
    pub access_token: Option<String>,
}

/// Row of the profiles-to-scan query
#[derive(Queryable, Debug)]
pub struct ProfileToScanRow {
    pub id: i32,
    pub facebook_id: String,
    pub scraped_by_id: i32,
    pub access_token: Option<String>,
}
