use sqlx::SqliteConnection;

use crate::error::AppError;
use crate::models::{Pagination, TaskCategory, TaskCategoryInput};

pub async fn get_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<TaskCategory>, AppError> {
    let category = sqlx::query_as::<_, TaskCategory>(
        "SELECT id, title, description FROM task_categories WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(category)
}

pub async fn get_by_title(
    conn: &mut SqliteConnection,
    title: &str,
) -> Result<Option<TaskCategory>, AppError> {
    let category = sqlx::query_as::<_, TaskCategory>(
        "SELECT id, title, description FROM task_categories WHERE title = $1",
    )
    .bind(title)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(category)
}

pub async fn list(
    conn: &mut SqliteConnection,
    page: Pagination,
) -> Result<Vec<TaskCategory>, AppError> {
    let categories = sqlx::query_as::<_, TaskCategory>(
        "SELECT id, title, description FROM task_categories ORDER BY id LIMIT $1 OFFSET $2",
    )
    .bind(page.limit)
    .bind(page.skip)
    .fetch_all(&mut *conn)
    .await?;
    Ok(categories)
}

pub async fn create(
    conn: &mut SqliteConnection,
    input: &TaskCategoryInput,
) -> Result<TaskCategory, AppError> {
    let category = sqlx::query_as::<_, TaskCategory>(
        "INSERT INTO task_categories (title, description) VALUES ($1, $2) \
         RETURNING id, title, description",
    )
    .bind(&input.title)
    .bind(&input.description)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| AppError::from(e).on_conflict("Task category already registered"))?;

    log::info!("Created task category {} ({})", category.id, category.title);
    Ok(category)
}

/// Overwrites title and description of `existing`.
pub async fn update(
    conn: &mut SqliteConnection,
    existing: &TaskCategory,
    replacement: &TaskCategoryInput,
) -> Result<TaskCategory, AppError> {
    let category = sqlx::query_as::<_, TaskCategory>(
        "UPDATE task_categories SET title = $1, description = $2 WHERE id = $3 \
         RETURNING id, title, description",
    )
    .bind(&replacement.title)
    .bind(&replacement.description)
    .bind(existing.id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::from(e).on_conflict("Task category already registered"))?
    .ok_or_else(|| AppError::NotFound("Task category not found".into()))?;

    log::info!("Updated task category {}", category.id);
    Ok(category)
}

/// Deletes `existing`. Categories still referenced by a task cannot be deleted.
pub async fn delete(conn: &mut SqliteConnection, existing: &TaskCategory) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM task_categories WHERE id = $1")
        .bind(existing.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::InvalidReference(_) => {
                AppError::InvalidReference("Task category is still used by tasks".into())
            }
            other => other,
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task category not found".into()));
    }
    log::info!("Deleted task category {}", existing.id);
    Ok(())
}
