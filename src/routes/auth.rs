use crate::{
    auth::{authenticate, LoginForm, TokenResponse, TokenService},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::SqlitePool;
use validator::Validate;

/// Exchanges a username/password form for a bearer token.
///
/// The token expires after `ACCESS_TOKEN_EXPIRE_MINUTES`.
#[post("/token")]
pub async fn login_for_access_token(
    pool: web::Data<SqlitePool>,
    tokens: web::Data<TokenService>,
    form: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    form.validate()?;

    let mut conn = pool.acquire().await?;
    let user = authenticate(&mut conn, &form.username, &form.password).await?;
    let access_token = tokens.issue_access_token(&user.username)?;

    log::info!("Issued access token for {}", user.username);
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(access_token)))
}
