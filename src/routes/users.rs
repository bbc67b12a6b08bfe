use crate::{
    auth::{authenticate, hash_password, ActiveUser, LoginForm},
    error::AppError,
    models::{Pagination, UserCreate},
    repository::users,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use sqlx::SqlitePool;
use validator::Validate;

#[get("")]
pub async fn get_users(
    pool: web::Data<SqlitePool>,
    page: web::Query<Pagination>,
) -> Result<impl Responder, AppError> {
    page.validate()?;
    let mut conn = pool.acquire().await?;
    let users = users::list(&mut conn, page.into_inner()).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Checks a username/password form and returns the matching user. No token is issued.
#[post("")]
pub async fn login_user(
    pool: web::Data<SqlitePool>,
    form: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    form.validate()?;
    let mut conn = pool.acquire().await?;
    let user = authenticate(&mut conn, &form.username, &form.password).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Registers a new user.
///
/// ## Responses:
/// - `201 Created`: the created `User` (without its password hash).
/// - `400 Bad Request`: the username or email is already registered.
/// - `422 Unprocessable Entity`: invalid username, email or password.
#[post("/create")]
pub async fn create_user(
    pool: web::Data<SqlitePool>,
    user_data: web::Json<UserCreate>,
) -> Result<impl Responder, AppError> {
    user_data.validate()?;

    let hashed_password = hash_password(&user_data.password)?;
    let mut conn = pool.acquire().await?;
    let user = users::create(&mut conn, &user_data, &hashed_password).await?;
    Ok(HttpResponse::Created().json(user))
}

#[get("/me")]
pub async fn get_me(ActiveUser(user): ActiveUser) -> impl Responder {
    HttpResponse::Ok().json(user)
}
