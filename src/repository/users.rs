use sqlx::SqliteConnection;

use crate::error::AppError;
use crate::models::{Pagination, User, UserCreate};

pub async fn get_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, full_name, hashed_password, disabled FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(user)
}

pub async fn get_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, full_name, hashed_password, disabled \
         FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(user)
}

pub async fn list(conn: &mut SqliteConnection, page: Pagination) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>(
        "SELECT id, username, email, full_name, hashed_password, disabled \
         FROM users ORDER BY id LIMIT $1 OFFSET $2",
    )
    .bind(page.limit)
    .bind(page.skip)
    .fetch_all(&mut *conn)
    .await?;
    Ok(users)
}

/// Inserts a user with an already hashed password.
///
/// A taken username or email is reported as `AlreadyExists` by the unique constraints.
pub async fn create(
    conn: &mut SqliteConnection,
    input: &UserCreate,
    hashed_password: &str,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email, full_name, hashed_password, disabled) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, username, email, full_name, hashed_password, disabled",
    )
    .bind(&input.username)
    .bind(&input.email)
    .bind(&input.full_name)
    .bind(hashed_password)
    .bind(input.disabled)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| AppError::from(e).on_conflict("User already registered"))?;

    log::info!("Created user {} ({})", user.id, user.username);
    Ok(user)
}
