//! Database handle construction and schema creation.
//!
//! The pool is built once in `main` and handed to the handlers as `web::Data<SqlitePool>`.
//! Every handler acquires its own pooled connection (or transaction), which is returned to
//! the pool when it is dropped.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Table definitions, in dependency order.
///
/// Ownership is encoded with foreign keys; owned children are removed with `ON DELETE CASCADE`.
/// Task categories are deliberately not cascaded: deleting a category that is still in use
/// fails with a foreign key violation.
const SCHEMA: [&str; 9] = [
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT UNIQUE,
        full_name TEXT,
        hashed_password TEXT NOT NULL,
        disabled BOOLEAN NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS task_categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title VARCHAR(30) NOT NULL UNIQUE,
        description TEXT
    )",
    "CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        task_category_id INTEGER NOT NULL REFERENCES task_categories (id),
        is_active BOOLEAN NOT NULL DEFAULT 1,
        user_id INTEGER REFERENCES users (id) ON DELETE CASCADE,
        sort_order INTEGER
    )",
    "CREATE INDEX IF NOT EXISTS idx_tasks_user_id ON tasks (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_sort_order ON tasks (sort_order)",
    "CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title VARCHAR(30) NOT NULL,
        task_id INTEGER NOT NULL REFERENCES tasks (id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS task_description_lists (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title VARCHAR(50) NOT NULL,
        task_id INTEGER NOT NULL REFERENCES tasks (id) ON DELETE CASCADE,
        UNIQUE (task_id, title)
    )",
    "CREATE TABLE IF NOT EXISTS task_descriptions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL,
        description_list_id INTEGER NOT NULL
            REFERENCES task_description_lists (id) ON DELETE CASCADE
    )",
    "CREATE INDEX IF NOT EXISTS idx_task_descriptions_list_id
        ON task_descriptions (description_list_id)",
];

/// Opens a connection pool for `database_url`, creating the database file if needed.
///
/// Foreign key enforcement is switched on for every connection; cascade deletes depend on it.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
    if database_url.contains(":memory:") {
        // An in-memory database lives exactly as long as its single connection.
        pool_options = pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    pool_options.connect_with(options).await
}

/// Creates all tables and indexes that do not exist yet.
pub async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    log::info!("Database schema is up to date");
    Ok(())
}

/// Round-trips a trivial query, used by the health check.
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

/// In-memory database with the schema applied, for tests.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = connect("sqlite::memory:", 1)
        .await
        .expect("in-memory database");
    create_schema(&pool).await.expect("schema");
    pool
}
