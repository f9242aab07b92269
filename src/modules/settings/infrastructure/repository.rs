/// Diesel-backed settings store on the `configs` table
use crate::log_warn;
use crate::modules::settings::domain::repository::SettingsRepository;
use crate::schema::configs;
use crate::shared::errors::AppResult;
use crate::shared::infrastructure::Database;
use async_trait::async_trait;
use diesel::prelude::*;

#[derive(Insertable, Debug)]
#[diesel(table_name = configs)]
struct NewConfig {
    key: String,
    value: String,
}

pub struct SettingsRepositoryImpl {
    db: Database,
}

impl SettingsRepositoryImpl {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn get_or_seed(&self, key: &str, default: &str) -> AppResult<String> {
        let key = key.to_string();
        let default = default.to_string();

        self.db
            .interact("get_or_seed", "configs", move |conn| {
                let existing: Option<String> = configs::table
                    .find(&key)
                    .select(configs::value)
                    .first(conn)
                    .optional()?;

                if let Some(value) = existing {
                    return Ok(value);
                }

                // A concurrent run may seed the key first; keep its value.
                diesel::insert_into(configs::table)
                    .values(&NewConfig {
                        key: key.clone(),
                        value: default,
                    })
                    .on_conflict(configs::key)
                    .do_nothing()
                    .execute(conn)?;

                let value = configs::table
                    .find(&key)
                    .select(configs::value)
                    .first(conn)?;
                Ok(value)
            })
            .await
    }
}

#[async_trait]
impl SettingsRepository for SettingsRepositoryImpl {
    async fn get_string(&self, key: &str, default: &str) -> String {
        match self.get_or_seed(key, default).await {
            Ok(value) => value,
            Err(e) => {
                log_warn!("Failed to read setting {}: {}. Using default {}", key, e, default);
                default.to_string()
            }
        }
    }
}
