use crate::{
    auth::ActiveUser,
    error::AppError,
    models::{DescriptionInput, DescriptionUpdate},
    repository::descriptions,
    routes::access::{owned_description, owned_list, template_list},
};
use actix_web::{get, post, web, HttpResponse, Responder};
use sqlx::SqlitePool;
use validator::Validate;

// Mounted under `/api/descriptionlists`.

#[get("/{id}/descriptions/user")]
pub async fn get_user_list_descriptions(
    ActiveUser(user): ActiveUser,
    pool: web::Data<SqlitePool>,
    list_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let list = owned_list(&mut conn, list_id.into_inner(), &user).await?;
    let descriptions = descriptions::list_for_list(&mut conn, list.id).await?;
    Ok(HttpResponse::Ok().json(descriptions))
}

#[get("/{id}/descriptions/nulluser")]
pub async fn get_template_list_descriptions(
    pool: web::Data<SqlitePool>,
    list_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let list = template_list(&mut conn, list_id.into_inner()).await?;
    let descriptions = descriptions::list_for_list(&mut conn, list.id).await?;
    Ok(HttpResponse::Ok().json(descriptions))
}

#[post("/{id}/descriptions")]
pub async fn create_description(
    ActiveUser(user): ActiveUser,
    pool: web::Data<SqlitePool>,
    list_id: web::Path<i64>,
    description_data: web::Json<DescriptionInput>,
) -> Result<impl Responder, AppError> {
    description_data.validate()?;

    let mut conn = pool.acquire().await?;
    let list = owned_list(&mut conn, list_id.into_inner(), &user).await?;
    let description = descriptions::create(&mut conn, list.id, &description_data).await?;
    Ok(HttpResponse::Created().json(description))
}

// Mounted under `/api/descriptions`.

/// Replaces a description's text. Setting `description_list_id` to another of the user's
/// lists moves it there.
#[post("/{id}/update")]
pub async fn update_description(
    ActiveUser(user): ActiveUser,
    pool: web::Data<SqlitePool>,
    description_id: web::Path<i64>,
    description_data: web::Json<DescriptionUpdate>,
) -> Result<impl Responder, AppError> {
    description_data.validate()?;

    let mut conn = pool.acquire().await?;
    let existing = owned_description(&mut conn, description_id.into_inner(), &user).await?;
    if description_data.description_list_id != existing.description_list_id {
        owned_list(&mut conn, description_data.description_list_id, &user).await?;
    }
    let description = descriptions::update(&mut conn, &existing, &description_data).await?;
    Ok(HttpResponse::Ok().json(description))
}

#[post("/{id}/delete")]
pub async fn delete_description(
    ActiveUser(user): ActiveUser,
    pool: web::Data<SqlitePool>,
    description_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    let description = owned_description(&mut conn, description_id.into_inner(), &user).await?;
    descriptions::delete(&mut conn, &description).await?;
    Ok(HttpResponse::Ok().json(true))
}
