pub mod extractors;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use validator::Validate;

use crate::error::AppError;
use crate::models::User;
use crate::repository::users;

pub use extractors::{ActiveUser, CurrentUser};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

/// Form fields of `POST /api/authorize/token` (and of the login alias on `/api/users`).
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response returned by a successful token request.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Looks the user up by username and checks the password against the stored hash.
///
/// Unknown usernames and wrong passwords yield the same error.
pub async fn authenticate(
    conn: &mut SqliteConnection,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let rejected = || AppError::Unauthorized("Incorrect username or password".into());

    let user = users::get_by_username(conn, username)
        .await?
        .ok_or_else(rejected)?;

    if !verify_password(password, &user.hashed_password) {
        log::info!("Failed login attempt for {}", username);
        return Err(rejected());
    }
    Ok(user)
}

/// Resolves a bearer token to the user named by its subject.
pub async fn resolve_current_user(
    conn: &mut SqliteConnection,
    tokens: &TokenService,
    token: &str,
) -> Result<User, AppError> {
    let unauthorized = || AppError::Unauthorized("Could not validate credentials".into());

    let username = tokens.verify(token)?.sub.ok_or_else(unauthorized)?;
    users::get_by_username(conn, &username)
        .await?
        .ok_or_else(unauthorized)
}

pub fn require_active_user(user: User) -> Result<User, AppError> {
    if user.disabled {
        return Err(AppError::Forbidden("Inactive user".into()));
    }
    Ok(user)
}
