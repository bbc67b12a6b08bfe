use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

lazy_static! {
    // Letters, digits, dots, underscores, hyphens.
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9._-]+$").unwrap();
}

/// A registered account. The password hash is loaded from storage but never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
    pub disabled: bool,
}

/// Payload of `POST /api/users/create`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(
        length(min = 1, max = 50),
        regex(
            path = "USERNAME_REGEX",
            message = "Username may only contain letters, digits, dots, underscores or hyphens"
        )
    )]
    pub username: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub full_name: Option<String>,
    /// bcrypt only looks at the first 72 bytes.
    #[validate(length(min = 1, max = 72))]
    pub password: String,
    #[serde(default)]
    pub disabled: bool,
}
