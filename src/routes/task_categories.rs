use crate::{
    auth::ActiveUser,
    error::AppError,
    models::{Pagination, TaskCategoryInput},
    repository::task_categories,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use sqlx::SqlitePool;
use validator::Validate;

fn not_found() -> AppError {
    AppError::NotFound("Task category not found".into())
}

#[get("")]
pub async fn get_task_categories(
    pool: web::Data<SqlitePool>,
    page: web::Query<Pagination>,
) -> Result<impl Responder, AppError> {
    page.validate()?;
    let mut conn = pool.acquire().await?;
    let categories = task_categories::list(&mut conn, page.into_inner()).await?;
    Ok(HttpResponse::Ok().json(categories))
}

/// Creates a task category.
///
/// ## Responses:
/// - `201 Created`: the created `TaskCategory`.
/// - `400 Bad Request`: a category with this title already exists.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_task_category(
    ActiveUser(user): ActiveUser,
    pool: web::Data<SqlitePool>,
    category_data: web::Json<TaskCategoryInput>,
) -> Result<impl Responder, AppError> {
    category_data.validate()?;

    let mut conn = pool.acquire().await?;
    let category = task_categories::create(&mut conn, &category_data).await?;
    log::debug!("{} created task category {}", user.username, category.id);
    Ok(HttpResponse::Created().json(category))
}

#[post("/{id}")]
pub async fn get_task_category(
    pool: web::Data<SqlitePool>,
    category_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let category = task_categories::get_by_id(&mut conn, category_id.into_inner())
        .await?
        .ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(category))
}

#[post("/{id}/update")]
pub async fn update_task_category(
    ActiveUser(_user): ActiveUser,
    pool: web::Data<SqlitePool>,
    category_id: web::Path<i64>,
    category_data: web::Json<TaskCategoryInput>,
) -> Result<impl Responder, AppError> {
    category_data.validate()?;

    let mut conn = pool.acquire().await?;
    let existing = task_categories::get_by_id(&mut conn, category_id.into_inner())
        .await?
        .ok_or_else(not_found)?;
    let category = task_categories::update(&mut conn, &existing, &category_data).await?;
    Ok(HttpResponse::Ok().json(category))
}

/// Deletes a task category. Categories still referenced by tasks are kept (400).
#[post("/{id}/delete")]
pub async fn delete_task_category(
    ActiveUser(_user): ActiveUser,
    pool: web::Data<SqlitePool>,
    category_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let existing = task_categories::get_by_id(&mut conn, category_id.into_inner())
        .await?
        .ok_or_else(not_found)?;
    task_categories::delete(&mut conn, &existing).await?;
    Ok(HttpResponse::Ok().json(true))
}
