use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;

use crate::db;

/// Health check endpoint
///
/// Returns the status of the API, whether the database answers, and the current timestamp.
#[get("/health")]
pub async fn health(pool: web::Data<SqlitePool>) -> impl Responder {
    match db::ping(&pool).await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "database": "ok",
            "timestamp": Utc::now()
        })),
        Err(e) => {
            log::error!("Health check could not reach the database: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "degraded",
                "database": "unavailable",
                "timestamp": Utc::now()
            }))
        }
    }
}

#[get("")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "Hello from routineforge" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_health_endpoint() {
        let pool = test_pool().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .service(health),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["status"], "ok");
        assert_eq!(json["database"], "ok");
        assert!(json["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn test_health_reports_closed_pool() {
        let pool = test_pool().await;
        pool.close().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .service(health),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn test_root_greeting() {
        let app = test::init_service(App::new().service(web::scope("/api").service(root))).await;

        let req = test::TestRequest::get().uri("/api").to_request();
        let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(json["message"].is_string());
    }
}
