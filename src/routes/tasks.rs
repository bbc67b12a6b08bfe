use crate::{
    auth::ActiveUser,
    error::AppError,
    models::{Pagination, TaskInput, TaskUpdate},
    repository::tasks,
    routes::access::{owned_task, template_task},
};
use actix_web::{get, post, web, HttpResponse, Responder};
use sqlx::SqlitePool;
use validator::Validate;

/// Lists the unowned template tasks.
///
/// ## Query Parameters:
/// - `skip` (optional, default 0) and `limit` (optional, default 100).
///
/// Tasks are ordered by `sort_order` (unset last), then by id. Each task carries its tags
/// and its description lists with their descriptions.
#[get("")]
pub async fn get_template_tasks(
    pool: web::Data<SqlitePool>,
    page: web::Query<Pagination>,
) -> Result<impl Responder, AppError> {
    page.validate()?;
    let mut conn = pool.acquire().await?;
    let tasks = tasks::list_unowned(&mut conn, page.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Lists the tasks owned by the authenticated user, in the same order as the templates.
#[get("/user-tasks")]
pub async fn get_user_tasks(
    ActiveUser(user): ActiveUser,
    pool: web::Data<SqlitePool>,
    page: web::Query<Pagination>,
) -> Result<impl Responder, AppError> {
    page.validate()?;
    let mut conn = pool.acquire().await?;
    let tasks = tasks::list_for_user(&mut conn, user.id, page.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the authenticated user.
///
/// The new task's `sort_order` is `id * 100`.
///
/// ## Responses:
/// - `201 Created`: the created `Task`.
/// - `400 Bad Request`: the category does not exist.
/// - `401 Unauthorized`: missing or invalid token.
/// - `422 Unprocessable Entity`: invalid title.
#[post("")]
pub async fn create_task(
    ActiveUser(user): ActiveUser,
    pool: web::Data<SqlitePool>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let mut tx = pool.begin().await?;
    let task = tasks::create(&mut tx, &task_data, Some(user.id)).await?;
    tx.commit().await?;

    Ok(HttpResponse::Created().json(task))
}

/// Deletes one of the user's tasks together with its tags, lists and descriptions.
#[post("/user-tasks/{id}/delete")]
pub async fn delete_user_task(
    ActiveUser(user): ActiveUser,
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let task = owned_task(&mut conn, task_id.into_inner(), &user).await?;
    tasks::delete(&mut conn, &task).await?;
    Ok(HttpResponse::Ok().json(true))
}

/// Copies an unowned template task, with all its tags, lists and descriptions, to the
/// authenticated user. The copy is all-or-nothing.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `400 Bad Request`: the task does not exist, or is owned by someone.
#[post("/user-tasks/{id}/copy")]
pub async fn copy_task_for_user(
    ActiveUser(user): ActiveUser,
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let mut tx = pool.begin().await?;
    let template = tasks::get_by_id(&mut tx, task_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    if !template.is_unowned() {
        return Err(AppError::BadRequest("Only unowned tasks can be copied".into()));
    }

    let copy = tasks::copy_for_user(&mut tx, &template, user.id).await?;
    tx.commit().await?;

    Ok(HttpResponse::Created().json(copy))
}

#[post("/{id}/user")]
pub async fn get_user_task(
    ActiveUser(user): ActiveUser,
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let task = owned_task(&mut conn, task_id.into_inner(), &user).await?;
    Ok(HttpResponse::Ok().json(task))
}

#[post("/{id}/nulluser")]
pub async fn get_template_task(
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let task = template_task(&mut conn, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Replaces one of the user's tasks.
///
/// Scalars are overwritten. `tags` and `description_lists`, when present, replace the
/// stored collections wholesale; when absent, the stored collections are kept.
#[post("/{id}/update")]
pub async fn update_task(
    ActiveUser(user): ActiveUser,
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate_all()?;

    let mut tx = pool.begin().await?;
    let existing = owned_task(&mut tx, task_id.into_inner(), &user).await?;
    let task = tasks::update(&mut tx, &existing, &task_data).await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(task))
}
