//! Application configuration, read from the process environment.

use jsonwebtoken::Algorithm;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_CORS_ORIGINS: &str = "http://127.0.0.1:3000,http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
    pub cors_origins: Vec<String>,
    /// Directory holding `users.json`, `task_categories.json` and `tasks.json`.
    pub seed_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let algorithm_name = required("ALGORITHM")?;
        let algorithm = parse_algorithm(&algorithm_name)?;

        let expire_minutes = required("ACCESS_TOKEN_EXPIRE_MINUTES")?;
        let access_token_expire_minutes = match expire_minutes.parse::<i64>() {
            Ok(minutes) if minutes > 0 => minutes,
            _ => {
                return Err(ConfigError::Invalid {
                    name: "ACCESS_TOKEN_EXPIRE_MINUTES",
                    value: expire_minutes,
                })
            }
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", 5)?,
            server_port: parsed_or("SERVER_PORT", 8080)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            secret_key: required("SECRET_KEY")?,
            algorithm,
            access_token_expire_minutes,
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string())
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            seed_dir: env::var("SEED_DIR").ok().map(PathBuf::from),
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server_host.clone(), self.server_port)
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parsed_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

/// Tokens are signed with the shared secret, so only the HMAC family is accepted.
fn parse_algorithm(value: &str) -> Result<Algorithm, ConfigError> {
    match Algorithm::from_str(value) {
        Ok(algorithm @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(algorithm),
        _ => Err(ConfigError::Invalid {
            name: "ALGORITHM",
            value: value.to_string(),
        }),
    }
}
