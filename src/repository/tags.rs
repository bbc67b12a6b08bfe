use sqlx::SqliteConnection;

use crate::error::AppError;
use crate::models::{Pagination, Tag, TagInput};

pub async fn get_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Tag>, AppError> {
    let tag = sqlx::query_as::<_, Tag>("SELECT id, title, task_id FROM tags WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(tag)
}

pub async fn list(conn: &mut SqliteConnection, page: Pagination) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as::<_, Tag>(
        "SELECT id, title, task_id FROM tags ORDER BY id LIMIT $1 OFFSET $2",
    )
    .bind(page.limit)
    .bind(page.skip)
    .fetch_all(&mut *conn)
    .await?;
    Ok(tags)
}

pub async fn list_for_task(
    conn: &mut SqliteConnection,
    task_id: i64,
) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as::<_, Tag>(
        "SELECT id, title, task_id FROM tags WHERE task_id = $1 ORDER BY id",
    )
    .bind(task_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(tags)
}

pub async fn create(
    conn: &mut SqliteConnection,
    task_id: i64,
    input: &TagInput,
) -> Result<Tag, AppError> {
    let tag = sqlx::query_as::<_, Tag>(
        "INSERT INTO tags (title, task_id) VALUES ($1, $2) RETURNING id, title, task_id",
    )
    .bind(&input.title)
    .bind(task_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| AppError::from(e).on_missing_parent("Task not found"))?;
    Ok(tag)
}

/// Renames `existing`. A tag never moves to another task.
pub async fn update(
    conn: &mut SqliteConnection,
    existing: &Tag,
    replacement: &TagInput,
) -> Result<Tag, AppError> {
    sqlx::query_as::<_, Tag>(
        "UPDATE tags SET title = $1 WHERE id = $2 RETURNING id, title, task_id",
    )
    .bind(&replacement.title)
    .bind(existing.id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Tag not found".into()))
}

pub async fn delete(conn: &mut SqliteConnection, existing: &Tag) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM tags WHERE id = $1")
        .bind(existing.id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Tag not found".into()));
    }
    Ok(())
}

/// Swaps the whole tag collection of a task for `replacement`. Issues several statements.
pub async fn replace_for_task(
    conn: &mut SqliteConnection,
    task_id: i64,
    replacement: &[TagInput],
) -> Result<Vec<Tag>, AppError> {
    sqlx::query("DELETE FROM tags WHERE task_id = $1")
        .bind(task_id)
        .execute(&mut *conn)
        .await?;

    let mut tags = Vec::with_capacity(replacement.len());
    for input in replacement {
        tags.push(create(conn, task_id, input).await?);
    }
    log::debug!("Replaced tags of task {} ({} tags)", task_id, tags.len());
    Ok(tags)
}
