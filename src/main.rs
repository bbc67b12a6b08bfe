use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use std::io;

use routineforge::auth::TokenService;
use routineforge::config::Config;
use routineforge::{db, routes, seed};

fn startup_error(context: &str, error: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, error))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    let pool = db::connect(&config.database_url, config.database_max_connections)
        .await
        .map_err(|e| startup_error("Failed to connect to database", e))?;
    db::create_schema(&pool)
        .await
        .map_err(|e| startup_error("Failed to create schema", e))?;

    if let Some(dir) = &config.seed_dir {
        seed::seed_from_dir(&pool, dir)
            .await
            .map_err(|e| startup_error("Failed to seed database", e))?;
    }

    let pool = web::Data::new(pool);
    let tokens = web::Data::new(TokenService::from_config(&config));
    let cors_origins = config.cors_origins.clone();

    log::info!("Starting routineforge server at {}", config.server_url());
    HttpServer::new(move || {
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(pool.clone())
            .app_data(tokens.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind(config.bind_address())?
    .run()
    .await
}
