use sqlx::SqliteConnection;

use crate::error::AppError;
use crate::models::{Description, DescriptionInput, DescriptionUpdate, Pagination};

pub async fn get_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Description>, AppError> {
    let description = sqlx::query_as::<_, Description>(
        "SELECT id, description, description_list_id FROM task_descriptions WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(description)
}

pub async fn list(
    conn: &mut SqliteConnection,
    page: Pagination,
) -> Result<Vec<Description>, AppError> {
    let descriptions = sqlx::query_as::<_, Description>(
        "SELECT id, description, description_list_id FROM task_descriptions \
         ORDER BY id LIMIT $1 OFFSET $2",
    )
    .bind(page.limit)
    .bind(page.skip)
    .fetch_all(&mut *conn)
    .await?;
    Ok(descriptions)
}

pub async fn list_for_list(
    conn: &mut SqliteConnection,
    description_list_id: i64,
) -> Result<Vec<Description>, AppError> {
    let descriptions = sqlx::query_as::<_, Description>(
        "SELECT id, description, description_list_id FROM task_descriptions \
         WHERE description_list_id = $1 ORDER BY id",
    )
    .bind(description_list_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(descriptions)
}

pub async fn create(
    conn: &mut SqliteConnection,
    description_list_id: i64,
    input: &DescriptionInput,
) -> Result<Description, AppError> {
    let description = sqlx::query_as::<_, Description>(
        "INSERT INTO task_descriptions (description, description_list_id) VALUES ($1, $2) \
         RETURNING id, description, description_list_id",
    )
    .bind(&input.description)
    .bind(description_list_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| AppError::from(e).on_missing_parent("Description list not found"))?;
    Ok(description)
}

/// Overwrites the text and the owning list of `existing`.
pub async fn update(
    conn: &mut SqliteConnection,
    existing: &Description,
    replacement: &DescriptionUpdate,
) -> Result<Description, AppError> {
    let description = sqlx::query_as::<_, Description>(
        "UPDATE task_descriptions SET description = $1, description_list_id = $2 WHERE id = $3 \
         RETURNING id, description, description_list_id",
    )
    .bind(&replacement.description)
    .bind(replacement.description_list_id)
    .bind(existing.id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::from(e).on_missing_parent("Description list not found"))?
    .ok_or_else(|| AppError::NotFound("Description not found".into()))?;
    Ok(description)
}

pub async fn delete(conn: &mut SqliteConnection, existing: &Description) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM task_descriptions WHERE id = $1")
        .bind(existing.id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Description not found".into()));
    }
    Ok(())
}

/// Swaps every description of a list for `replacement`. Issues several statements.
pub async fn replace_for_list(
    conn: &mut SqliteConnection,
    description_list_id: i64,
    replacement: &[DescriptionInput],
) -> Result<Vec<Description>, AppError> {
    sqlx::query("DELETE FROM task_descriptions WHERE description_list_id = $1")
        .bind(description_list_id)
        .execute(&mut *conn)
        .await?;

    let mut descriptions = Vec::with_capacity(replacement.len());
    for input in replacement {
        descriptions.push(create(conn, description_list_id, input).await?);
    }
    Ok(descriptions)
}
