//! Ownership checks shared by the task, description list and description handlers.
//!
//! A task and everything under it is readable through the `nulluser` routes only while the
//! task is unowned, and through the authenticated routes only by its owner. Any mismatch is
//! reported exactly like a missing row.

use sqlx::SqliteConnection;

use crate::error::AppError;
use crate::models::{Description, DescriptionList, Task, User};
use crate::repository::{description_lists, descriptions, tasks};

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

fn list_not_found() -> AppError {
    AppError::NotFound("Description list not found".into())
}

/// Rewords a `NotFound` about a parent so it names the entity that was asked for.
fn renamed(error: AppError, message: &str) -> AppError {
    match error {
        AppError::NotFound(_) => AppError::NotFound(message.to_string()),
        other => other,
    }
}

pub async fn owned_task(
    conn: &mut SqliteConnection,
    id: i64,
    user: &User,
) -> Result<Task, AppError> {
    match tasks::get_by_id(conn, id).await? {
        Some(task) if task.is_owned_by(user.id) => Ok(task),
        _ => Err(task_not_found()),
    }
}

pub async fn template_task(conn: &mut SqliteConnection, id: i64) -> Result<Task, AppError> {
    match tasks::get_by_id(conn, id).await? {
        Some(task) if task.is_unowned() => Ok(task),
        _ => Err(task_not_found()),
    }
}

pub async fn owned_list(
    conn: &mut SqliteConnection,
    id: i64,
    user: &User,
) -> Result<DescriptionList, AppError> {
    let list = description_lists::get_by_id(conn, id)
        .await?
        .ok_or_else(list_not_found)?;
    owned_task(conn, list.task_id, user)
        .await
        .map_err(|e| renamed(e, "Description list not found"))?;
    Ok(list)
}

pub async fn template_list(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<DescriptionList, AppError> {
    let list = description_lists::get_by_id(conn, id)
        .await?
        .ok_or_else(list_not_found)?;
    template_task(conn, list.task_id)
        .await
        .map_err(|e| renamed(e, "Description list not found"))?;
    Ok(list)
}

pub async fn owned_description(
    conn: &mut SqliteConnection,
    id: i64,
    user: &User,
) -> Result<Description, AppError> {
    let description = descriptions::get_by_id(conn, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Description not found".into()))?;
    owned_list(conn, description.description_list_id, user)
        .await
        .map_err(|e| renamed(e, "Description not found"))?;
    Ok(description)
}
