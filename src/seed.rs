//! Loads starter data from JSON files: `users.json`, `task_categories.json` and `tasks.json`.
//!
//! Users and categories that already exist (by username or title) are skipped. Tasks are
//! created as unowned templates, and only while no template task exists yet, so running the
//! seed on every startup is harmless.

use serde::de::DeserializeOwned;
use sqlx::{SqliteConnection, SqlitePool};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use validator::Validate;

use crate::auth::hash_password;
use crate::error::AppError;
use crate::models::{Pagination, TaskCategoryInput, TaskInput, UserCreate};
use crate::repository::{task_categories, tasks, users};

pub const USERS_FILE: &str = "users.json";
pub const TASK_CATEGORIES_FILE: &str = "task_categories.json";
pub const TASKS_FILE: &str = "tasks.json";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    App(#[from] AppError),
}

impl From<sqlx::Error> for SeedError {
    fn from(error: sqlx::Error) -> Self {
        SeedError::App(error.into())
    }
}

/// How many rows each seed file added.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub task_categories: usize,
    pub tasks: usize,
}

/// Reads a JSON array from `path`. A missing file yields `None`.
pub fn read_entries<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>, SeedError> {
    if !path.exists() {
        log::debug!("No seed file at {}", path.display());
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = serde_json::from_str(&raw).map_err(|source| SeedError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(entries))
}

pub async fn seed_users(
    conn: &mut SqliteConnection,
    entries: &[UserCreate],
) -> Result<usize, AppError> {
    let mut created = 0;
    for entry in entries {
        entry.validate()?;
        if users::get_by_username(conn, &entry.username).await?.is_some() {
            continue;
        }
        let hashed_password = hash_password(&entry.password)?;
        users::create(conn, entry, &hashed_password).await?;
        created += 1;
    }
    Ok(created)
}

pub async fn seed_task_categories(
    conn: &mut SqliteConnection,
    entries: &[TaskCategoryInput],
) -> Result<usize, AppError> {
    let mut created = 0;
    for entry in entries {
        entry.validate()?;
        if task_categories::get_by_title(conn, &entry.title).await?.is_some() {
            continue;
        }
        task_categories::create(conn, entry).await?;
        created += 1;
    }
    Ok(created)
}

/// Creates the entries as unowned template tasks, unless templates are already present.
pub async fn seed_template_tasks(
    conn: &mut SqliteConnection,
    entries: &[TaskInput],
) -> Result<usize, AppError> {
    let first_only = Pagination { skip: 0, limit: 1 };
    if !tasks::list_unowned(conn, first_only).await?.is_empty() {
        log::debug!("Template tasks already present, skipping task seed");
        return Ok(0);
    }
    for entry in entries {
        entry.validate()?;
        tasks::create(conn, entry, None).await?;
    }
    Ok(entries.len())
}

/// Seeds from every seed file present in `dir`, each file in its own transaction.
pub async fn seed_from_dir(pool: &SqlitePool, dir: &Path) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    if let Some(entries) = read_entries::<UserCreate>(&dir.join(USERS_FILE))? {
        let mut tx = pool.begin().await?;
        report.users = seed_users(&mut tx, &entries).await?;
        tx.commit().await?;
    }
    if let Some(entries) = read_entries::<TaskCategoryInput>(&dir.join(TASK_CATEGORIES_FILE))? {
        let mut tx = pool.begin().await?;
        report.task_categories = seed_task_categories(&mut tx, &entries).await?;
        tx.commit().await?;
    }
    if let Some(entries) = read_entries::<TaskInput>(&dir.join(TASKS_FILE))? {
        let mut tx = pool.begin().await?;
        report.tasks = seed_template_tasks(&mut tx, &entries).await?;
        tx.commit().await?;
    }

    log::info!(
        "Seeded {} users, {} task categories and {} tasks from {}",
        report.users,
        report.task_categories,
        report.tasks,
        dir.display()
    );
    Ok(report)
}
