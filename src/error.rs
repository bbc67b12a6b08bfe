//! # Failures and their HTTP answers
//!
//! `AppError` is the one failure type of routineforge. Repository functions, the auth
//! service and every handler return `Result<_, AppError>`, so a constraint violation raised
//! by SQLite travels up through `?` until actix-web renders it.
//!
//! `AppError` implements `actix_web::error::ResponseError`. All "not found" style conditions
//! (missing rows, ownership mismatches, duplicates, broken references, disabled users) are
//! answered with HTTP 400 and a `{"detail": ...}` body. Authentication failures answer 401
//! with a `WWW-Authenticate: Bearer` header.

use actix_web::{error::ResponseError, http::header, http::StatusCode, HttpResponse};
use serde_json::json;
use sqlx::error::ErrorKind;
use thiserror::Error;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing credentials, bad credentials or an invalid/expired token (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// The authenticated user is disabled (HTTP 400).
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// Malformed request or an operation that does not apply to the entity's state (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// Entity absent, or owned by somebody else (HTTP 400).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// A uniqueness constraint rejected the write (HTTP 400).
    #[error("Already Exists: {0}")]
    AlreadyExists(String),
    /// A foreign key constraint rejected the write (HTTP 400).
    #[error("Invalid Reference: {0}")]
    InvalidReference(String),
    /// Input failed field validation (HTTP 422).
    #[error("Validation Error: {0}")]
    ValidationError(String),
    /// Unexpected server-side error (HTTP 500).
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    /// Unclassified error from the database driver (HTTP 500).
    #[error("Database Error: {0}")]
    DatabaseError(String),
}

impl AppError {
    /// Replaces the generic message of an `AlreadyExists` error with an entity specific one.
    pub fn on_conflict(self, message: &str) -> Self {
        match self {
            AppError::AlreadyExists(_) => AppError::AlreadyExists(message.to_string()),
            other => other,
        }
    }

    /// Turns a foreign key failure into a `NotFound` naming the missing parent.
    pub fn on_missing_parent(self, message: &str) -> Self {
        match self {
            AppError::InvalidReference(_) => AppError::NotFound(message.to_string()),
            other => other,
        }
    }

    fn detail(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::AlreadyExists(msg)
            | AppError::InvalidReference(msg)
            | AppError::ValidationError(msg)
            | AppError::InternalServerError(msg)
            | AppError::DatabaseError(msg) => msg,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_)
            | AppError::BadRequest(_)
            | AppError::NotFound(_)
            | AppError::AlreadyExists(_)
            | AppError::InvalidReference(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let AppError::Unauthorized(_) = self {
            response.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        // Internal details stay in the log.
        let detail = match self {
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                log::error!("{}", self);
                "Internal server error"
            }
            _ => self.detail(),
        };
        response.json(json!({ "detail": detail }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// Constraint violations are classified by kind so callers can refine the message with
/// [`AppError::on_conflict`] or [`AppError::on_missing_parent`].
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_error) => match db_error.kind() {
                ErrorKind::UniqueViolation => {
                    AppError::AlreadyExists("Record already registered".into())
                }
                ErrorKind::ForeignKeyViolation => {
                    AppError::InvalidReference("Referenced record does not exist".into())
                }
                _ => AppError::DatabaseError(db_error.to_string()),
            },
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Token decoding failures are logged; the client only learns that the token was rejected.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::warn!("Rejected access token: {}", error);
        AppError::Unauthorized("Could not validate credentials".into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
