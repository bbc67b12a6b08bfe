#![doc = "The `routineforge` library crate."]
#![doc = ""]
#![doc = "Domain models, the SQLite repositories, JWT authentication, routing configuration,"]
#![doc = "seeding and error handling for the routineforge service. The binary (`main.rs`)"]
#![doc = "builds the database pool and token service and serves `routes::config`."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod seed;

pub use crate::error::AppError;
