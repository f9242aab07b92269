/// Database test utilities with singleton pattern
///
/// Tests using these helpers are `#[ignore]`d and need `TEST_DATABASE_URL`
/// pointing at a disposable PostgreSQL database.
use diesel::prelude::*;
use fleetscan::shared::infrastructure::database::Database;
use fleetscan::shared::infrastructure::migrations::run_pending_migrations;
use std::sync::{Mutex, MutexGuard, OnceLock};

static DATABASE: OnceLock<Database> = OnceLock::new();

/// Get or create the shared test database, with migrations applied
pub fn get_test_db() -> Database {
    DATABASE
        .get_or_init(|| {
            dotenvy::dotenv().ok();
            let url = std::env::var("TEST_DATABASE_URL")
                .expect("TEST_DATABASE_URL must be set in .env for tests");
            let database = Database::new(&url).expect("Failed to create test database pool");
            run_pending_migrations(&database).expect("Failed to run migrations");
            database
        })
        .clone()
}

/// Clean all scan tables - use at the start of each test
pub fn clean_test_db(database: &Database) {
    let mut conn = database.get_connection().expect("Failed to get DB connection");
    diesel::sql_query(
        "TRUNCATE TABLE logs, comments, posts, profiles, groups, accounts, configs RESTART IDENTITY CASCADE",
    )
    .execute(&mut conn)
    .expect("Failed to clean scan tables");
}

/// Insert an account and return its id
pub fn insert_account(database: &Database, username: &str, token: Option<&str>, blocked: bool) -> i32 {
    use diesel::sql_types::{Bool, Nullable, Text};

    #[derive(QueryableByName)]
    struct Id {
        #[diesel(sql_type = diesel::sql_types::Integer)]
        id: i32,
    }

    let mut conn = database.get_connection().expect("Failed to get DB connection");
    diesel::sql_query(
        "INSERT INTO accounts (username, access_token, is_block) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind::<Text, _>(username)
    .bind::<Nullable<Text>, _>(token)
    .bind::<Bool, _>(blocked)
    .get_result::<Id>(&mut conn)
    .expect("Failed to insert account")
    .id
}

/// Insert a joined group for an account and return its id
pub fn insert_group(database: &Database, group_id: &str, account_id: i32) -> i32 {
    use diesel::sql_types::{Integer, Text};

    #[derive(QueryableByName)]
    struct Id {
        #[diesel(sql_type = diesel::sql_types::Integer)]
        id: i32,
    }

    let mut conn = database.get_connection().expect("Failed to get DB connection");
    diesel::sql_query(
        "INSERT INTO groups (group_id, group_name, account_id, is_joined) VALUES ($1, $1, $2, TRUE) RETURNING id",
    )
    .bind::<Text, _>(group_id)
    .bind::<Integer, _>(account_id)
    .get_result::<Id>(&mut conn)
    .expect("Failed to insert group")
    .id
}

/// Global test mutex for serialization
static TEST_LOCK: Mutex<()> = Mutex::new(());

/// Acquire test lock to ensure database tests run serially
pub fn lock_test_db() -> MutexGuard<'static, ()> {
    TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}
