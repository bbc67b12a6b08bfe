use crate::{
    auth::ActiveUser,
    error::AppError,
    models::DescriptionListInput,
    repository::description_lists,
    routes::access::{owned_list, owned_task, template_list, template_task},
};
use actix_web::{get, post, web, HttpResponse, Responder};
use sqlx::SqlitePool;

// Mounted under `/api/tasks`.

#[get("/{id}/descriptionlists/user")]
pub async fn get_user_task_lists(
    ActiveUser(user): ActiveUser,
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let task = owned_task(&mut conn, task_id.into_inner(), &user).await?;
    let lists = description_lists::list_for_task(&mut conn, task.id).await?;
    Ok(HttpResponse::Ok().json(lists))
}

#[get("/{id}/descriptionlists/nulluser")]
pub async fn get_template_task_lists(
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let task = template_task(&mut conn, task_id.into_inner()).await?;
    let lists = description_lists::list_for_task(&mut conn, task.id).await?;
    Ok(HttpResponse::Ok().json(lists))
}

/// Adds a description list (and optionally its descriptions) to one of the user's tasks.
///
/// ## Responses:
/// - `201 Created`: the new `DescriptionList` with its descriptions.
/// - `400 Bad Request`: the task is not the user's, or it already has a list with this title.
#[post("/{id}/descriptionlists")]
pub async fn create_description_list(
    ActiveUser(user): ActiveUser,
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
    list_data: web::Json<DescriptionListInput>,
) -> Result<impl Responder, AppError> {
    list_data.validate_all()?;

    let mut tx = pool.begin().await?;
    let task = owned_task(&mut tx, task_id.into_inner(), &user).await?;
    let list = description_lists::create(&mut tx, task.id, &list_data).await?;
    tx.commit().await?;

    Ok(HttpResponse::Created().json(list))
}

// Mounted under `/api/descriptionlists`.

#[get("/{id}/user")]
pub async fn get_user_list(
    ActiveUser(user): ActiveUser,
    pool: web::Data<SqlitePool>,
    list_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let list = owned_list(&mut conn, list_id.into_inner(), &user).await?;
    Ok(HttpResponse::Ok().json(list))
}

#[get("/{id}/nulluser")]
pub async fn get_template_list(
    pool: web::Data<SqlitePool>,
    list_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let list = template_list(&mut conn, list_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(list))
}

/// Renames a list. When `descriptions` is present the stored descriptions are replaced.
#[post("/{id}/update")]
pub async fn update_description_list(
    ActiveUser(user): ActiveUser,
    pool: web::Data<SqlitePool>,
    list_id: web::Path<i64>,
    list_data: web::Json<DescriptionListInput>,
) -> Result<impl Responder, AppError> {
    list_data.validate_all()?;

    let mut tx = pool.begin().await?;
    let existing = owned_list(&mut tx, list_id.into_inner(), &user).await?;
    let list = description_lists::update(&mut tx, &existing, &list_data).await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(list))
}

#[post("/{id}/delete")]
pub async fn delete_description_list(
    ActiveUser(user): ActiveUser,
    pool: web::Data<SqlitePool>,
    list_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let list = owned_list(&mut conn, list_id.into_inner(), &user).await?;
    description_lists::delete(&mut conn, &list).await?;
    Ok(HttpResponse::Ok().json(true))
}
