use crate::config::Config;
use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime of a token when the caller does not ask for a specific one.
pub const DEFAULT_EXPIRY_MINUTES: i64 = 15;

/// Represents the claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject of the token: the username it was issued to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Signs and verifies access tokens with the configured shared secret.
///
/// Built once at startup and shared with the handlers as `web::Data<TokenService>`.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_token_expires: Duration,
}

impl TokenService {
    pub fn new(secret: &str, algorithm: Algorithm, access_token_expire_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            access_token_expires: Duration::minutes(access_token_expire_minutes),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.secret_key,
            config.algorithm,
            config.access_token_expire_minutes,
        )
    }

    /// Issues a token for `username` that expires after `expires_in`, or after
    /// [`DEFAULT_EXPIRY_MINUTES`] when no duration is given.
    pub fn issue(&self, username: &str, expires_in: Option<Duration>) -> Result<String, AppError> {
        let expires_in = expires_in.unwrap_or_else(|| Duration::minutes(DEFAULT_EXPIRY_MINUTES));
        let claims = Claims {
            sub: Some(username.to_string()),
            exp: (Utc::now() + expires_in).timestamp().max(0) as usize,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Issues a token with the configured access token lifetime.
    pub fn issue_access_token(&self, username: &str) -> Result<String, AppError> {
        self.issue(username, Some(self.access_token_expires))
    }

    /// Checks signature, algorithm and expiry, and returns the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::new(self.algorithm))?;
        Ok(data.claims)
    }
}
