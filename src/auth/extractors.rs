use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::SqlitePool;

use super::{require_active_user, resolve_current_user, TokenService};
use crate::error::AppError;
use crate::models::User;

/// The user named by the request's bearer token, whether or not the account is disabled.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// The user named by the request's bearer token. Disabled accounts are rejected.
///
/// Handlers that mutate state or read a user's own data take this extractor.
#[derive(Debug, Clone)]
pub struct ActiveUser(pub User);

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

async fn load_user(
    token: Option<String>,
    pool: Option<web::Data<SqlitePool>>,
    tokens: Option<web::Data<TokenService>>,
) -> Result<User, AppError> {
    let token = token.ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;
    let (pool, tokens) = match (pool, tokens) {
        (Some(pool), Some(tokens)) => (pool, tokens),
        _ => {
            return Err(AppError::InternalServerError(
                "Database pool or token service missing from app data".into(),
            ))
        }
    };

    let mut conn = pool.acquire().await?;
    resolve_current_user(&mut conn, &tokens, &token).await
}

impl FromRequest for CurrentUser {
    type Error = ActixError; // AppError converts through ResponseError
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let pool = req.app_data::<web::Data<SqlitePool>>().cloned();
        let tokens = req.app_data::<web::Data<TokenService>>().cloned();

        Box::pin(async move {
            let user = load_user(token, pool, tokens).await?;
            Ok(CurrentUser(user))
        })
    }
}

impl FromRequest for ActiveUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let current = CurrentUser::from_request(req, payload);

        Box::pin(async move {
            let CurrentUser(user) = current.await?;
            Ok(ActiveUser(require_active_user(user)?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::db::test_pool;
    use crate::models::UserCreate;
    use crate::repository::users;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use jsonwebtoken::Algorithm;

    async fn seeded() -> (web::Data<SqlitePool>, web::Data<TokenService>) {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        for (username, disabled) in [("alice", false), ("dora", true)] {
            let input = UserCreate {
                username: username.to_string(),
                email: None,
                full_name: None,
                password: "pw1".into(),
                disabled,
            };
            users::create(&mut conn, &input, &hash_password("pw1").unwrap())
                .await
                .unwrap();
        }
        drop(conn);
        let tokens = TokenService::new("extractor_test_secret", Algorithm::HS256, 15);
        (web::Data::new(pool), web::Data::new(tokens))
    }

    fn request(
        pool: &web::Data<SqlitePool>,
        tokens: &web::Data<TokenService>,
        authorization: Option<String>,
    ) -> HttpRequest {
        let mut req = test::TestRequest::default()
            .app_data(pool.clone())
            .app_data(tokens.clone());
        if let Some(value) = authorization {
            req = req.insert_header((header::AUTHORIZATION, value));
        }
        req.to_http_request()
    }

    #[actix_rt::test]
    async fn test_bearer_token_parsing() {
        let with = |value: &str| {
            test::TestRequest::default()
                .insert_header((header::AUTHORIZATION, value))
                .to_http_request()
        };
        assert_eq!(bearer_token(&with("Bearer abc")), Some("abc".to_string()));
        assert_eq!(bearer_token(&with("bearer abc")), Some("abc".to_string()));
        assert_eq!(bearer_token(&with("Basic abc")), None);
        assert_eq!(bearer_token(&with("Bearer ")), None);
        assert_eq!(bearer_token(&test::TestRequest::default().to_http_request()), None);
    }

    #[actix_rt::test]
    async fn test_missing_header_is_unauthorized() {
        let (pool, tokens) = seeded().await;
        let req = request(&pool, &tokens, None);

        let err = CurrentUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap_err();
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[actix_rt::test]
    async fn test_active_user_extraction() {
        let (pool, tokens) = seeded().await;

        let token = tokens.issue("alice", None).unwrap();
        let req = request(&pool, &tokens, Some(format!("Bearer {}", token)));
        let ActiveUser(user) = ActiveUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
    }

    #[actix_rt::test]
    async fn test_disabled_user_is_current_but_not_active() {
        let (pool, tokens) = seeded().await;
        let token = tokens.issue("dora", None).unwrap();

        let req = request(&pool, &tokens, Some(format!("Bearer {}", token)));
        let CurrentUser(user) = CurrentUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert!(user.disabled);

        let req = request(&pool, &tokens, Some(format!("Bearer {}", token)));
        let err = ActiveUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_garbage_token_is_unauthorized() {
        let (pool, tokens) = seeded().await;
        let req = request(&pool, &tokens, Some("Bearer garbage".into()));

        let err = CurrentUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }
}
