/// Diesel-based implementation of ScanRepository
///
/// Every method runs its queries on the blocking pool through
/// `Database::interact`. Writes are `ON CONFLICT` upserts on the natural keys.
use super::models::{
    CommentRow, GroupToScanRow, NewLogRow, NewProfileRow, PostRow, ProfileScanChangeset,
    ProfileToScanRow,
};
use crate::modules::scan::domain::{
    ActionLogEntry, GroupToScan, NewComment, NewPost, NewProfile, ProfileScanUpdate,
    ProfileToScan, ScanRepository, StoredPost, StoredProfile,
};
use crate::schema::{accounts, comments, groups, logs, posts, profiles};
use crate::shared::errors::AppResult;
use crate::shared::infrastructure::Database;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

pub struct ScanRepositoryImpl {
    db: Database,
}

impl ScanRepositoryImpl {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Accounts that may be used for scanning
macro_rules! usable_account {
    () => {
        accounts::is_block
            .eq(false)
            .and(accounts::access_token.is_not_null())
            .and(accounts::access_token.ne(""))
    };
}

#[async_trait]
impl ScanRepository for ScanRepositoryImpl {
    async fn get_ok_account_ids(&self) -> AppResult<Vec<i32>> {
        self.db
            .interact("get_ok_account_ids", "accounts", |conn| {
                let ids = accounts::table
                    .filter(usable_account!())
                    .order(accounts::id.asc())
                    .select(accounts::id)
                    .load(conn)?;
                Ok(ids)
            })
            .await
    }

    async fn get_groups_to_scan(&self, account_id: i32, limit: u32) -> AppResult<Vec<GroupToScan>> {
        self.db
            .interact("get_groups_to_scan", "groups", move |conn| {
                let rows: Vec<GroupToScanRow> = groups::table
                    .inner_join(accounts::table)
                    .filter(groups::account_id.eq(account_id))
                    .filter(groups::is_joined.eq(true))
                    .order(groups::scanned_at.asc().nulls_first())
                    .limit(i64::from(limit))
                    .select((
                        groups::id,
                        groups::group_id,
                        groups::group_name,
                        groups::account_id,
                        accounts::access_token,
                    ))
                    .load(conn)?;

                Ok(rows
                    .into_iter()
                    .map(|row| GroupToScan {
                        id: row.id,
                        group_id: row.group_id,
                        group_name: row.group_name,
                        account_id: row.account_id.unwrap_or(account_id),
                        access_token: row.access_token,
                    })
                    .collect())
            })
            .await
    }

    async fn get_profiles_to_scan(&self, limit: u32) -> AppResult<Vec<ProfileToScan>> {
        self.db
            .interact("get_profiles_to_scan", "profiles", move |conn| {
                let rows: Vec<ProfileToScanRow> = profiles::table
                    .inner_join(accounts::table)
                    .filter(profiles::is_scanned.eq(false))
                    .filter(usable_account!())
                    .order(profiles::updated_at.asc())
                    .limit(i64::from(limit))
                    .select((
                        profiles::id,
                        profiles::facebook_id,
                        profiles::scraped_by_id,
                        accounts::access_token,
                    ))
                    .load(conn)?;

                Ok(rows
                    .into_iter()
                    .map(|row| ProfileToScan {
                        id: row.id,
                        facebook_id: row.facebook_id,
                        account_id: row.scraped_by_id,
                        access_token: row.access_token,
                    })
                    .collect())
            })
            .await
    }

    async fn upsert_post(&self, post: NewPost) -> AppResult<StoredPost> {
        self.db
            .interact("upsert_post", "posts", move |conn| {
                let row = PostRow::from(post);
                let (id, post_id) = diesel::insert_into(posts::table)
                    .values(&row)
                    .on_conflict(posts::post_id)
                    .do_update()
                    .set(&row)
                    .returning((posts::id, posts::post_id))
                    .get_result::<(i32, String)>(conn)?;
                Ok(StoredPost { id, post_id })
            })
            .await
    }

    async fn upsert_or_fetch_profile(&self, profile: NewProfile) -> AppResult<StoredProfile> {
        self.db
            .interact("upsert_or_fetch_profile", "profiles", move |conn| {
                let row = NewProfileRow::from(profile);

                let inserted = diesel::insert_into(profiles::table)
                    .values(&row)
                    .on_conflict(profiles::facebook_id)
                    .do_nothing()
                    .returning(profiles::id)
                    .get_result::<i32>(conn)
                    .optional()?;

                let id = match inserted {
                    Some(id) => id,
                    None => profiles::table
                        .filter(profiles::facebook_id.eq(&row.facebook_id))
                        .select(profiles::id)
                        .first(conn)?,
                };

                Ok(StoredProfile {
                    id,
                    facebook_id: row.facebook_id,
                })
            })
            .await
    }

    async fn upsert_comment(&self, comment: NewComment) -> AppResult<()> {
        self.db
            .interact("upsert_comment", "comments", move |conn| {
                let row = CommentRow::from(comment);
                diesel::insert_into(comments::table)
                    .values(&row)
                    .on_conflict((comments::post_id, comments::comment_id))
                    .do_update()
                    .set((
                        comments::author_id.eq(row.author_id),
                        comments::content.eq(&row.content),
                        comments::created_at.eq(row.created_at),
                    ))
                    .execute(conn)?;
                Ok(())
            })
            .await
    }

    async fn update_group_scanned_at(&self, group_id: i32) -> AppResult<()> {
        self.db
            .interact("update_group_scanned_at", "groups", move |conn| {
                diesel::update(groups::table.find(group_id))
                    .set(groups::scanned_at.eq(Some(Utc::now())))
                    .execute(conn)?;
                Ok(())
            })
            .await
    }

    async fn update_profile_after_scan(
        &self,
        profile_id: i32,
        update: ProfileScanUpdate,
    ) -> AppResult<()> {
        self.db
            .interact("update_profile_after_scan", "profiles", move |conn| {
                diesel::update(profiles::table.find(profile_id))
                    .set(&ProfileScanChangeset::new(update, Utc::now()))
                    .execute(conn)?;
                Ok(())
            })
            .await
    }

    async fn touch_profile_scan_attempt(&self, profile_id: i32) -> AppResult<()> {
        self.db
            .interact("touch_profile_scan_attempt", "profiles", move |conn| {
                diesel::update(profiles::table.find(profile_id))
                    .set(profiles::updated_at.eq(Utc::now()))
                    .execute(conn)?;
                Ok(())
            })
            .await
    }

    async fn log_action(&self, entry: ActionLogEntry) -> AppResult<()> {
        self.db
            .interact("log_action", "logs", move |conn| {
                diesel::insert_into(logs::table)
                    .values(&NewLogRow::from(entry))
                    .execute(conn)?;
                Ok(())
            })
            .await
    }
}
