#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::{test, web};
use jsonwebtoken::Algorithm;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use routineforge::auth::TokenService;
use routineforge::models::{
    DescriptionInput, DescriptionListInput, TagInput, Task, TaskInput, TaskUpdate,
};
use routineforge::repository::tasks;
use routineforge::{db, routes};

pub const SECRET: &str = "integration_test_secret";

// Helper struct to hold auth details
pub struct TestUser {
    pub id: i64,
    pub token: String,
}

pub async fn test_pool() -> SqlitePool {
    let pool = db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory database");
    db::create_schema(&pool)
        .await
        .expect("Failed to create schema");
    pool
}

pub fn token_service() -> TokenService {
    TokenService::new(SECRET, Algorithm::HS256, 30)
}

/// Everything the service needs: shared state plus every route.
pub fn configure(pool: SqlitePool) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(pool))
            .app_data(web::Data::new(token_service()));
        routes::config(cfg);
    }
}

async fn send<S, B>(app: &S, mut req: test::TestRequest, token: Option<&str>) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    if let Some(token) = token {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)));
    }
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

pub async fn get<S, B>(app: &S, uri: &str, token: Option<&str>) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    send(app, test::TestRequest::get().uri(uri), token).await
}

pub async fn post<S, B>(app: &S, uri: &str, token: Option<&str>) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    send(app, test::TestRequest::post().uri(uri), token).await
}

pub async fn post_json<S, B>(
    app: &S,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    send(app, test::TestRequest::post().uri(uri).set_json(body), token).await
}

pub async fn post_form<S, B>(app: &S, uri: &str, fields: &[(&str, &str)]) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    send(app, test::TestRequest::post().uri(uri).set_form(fields), None).await
}

pub async fn create_user<S, B>(app: &S, username: &str, password: &str, disabled: bool) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, user) = post_json(
        app,
        "/api/users/create",
        None,
        json!({
            "username": username,
            "password": password,
            "email": format!("{}@example.com", username),
            "disabled": disabled
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create user: {}", user);
    user
}

pub async fn login<S, B>(app: &S, username: &str, password: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = post_form(
        app,
        "/api/authorize/token",
        &[("username", username), ("password", password)],
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Failed to log in: {}", body);
    assert_eq!(body["token_type"], "bearer");
    body["access_token"]
        .as_str()
        .expect("access_token in response")
        .to_string()
}

pub async fn register_and_login<S, B>(app: &S, username: &str) -> TestUser
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let user = create_user(app, username, "pw1", false).await;
    let token = login(app, username, "pw1").await;
    TestUser {
        id: user["id"].as_i64().expect("user id"),
        token,
    }
}

pub async fn create_category<S, B>(app: &S, token: &str, title: &str) -> i64
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, category) = post_json(
        app,
        "/api/taskcategories",
        Some(token),
        json!({ "title": title, "description": null }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create category: {}", category);
    category["id"].as_i64().expect("category id")
}

pub async fn create_task<S, B>(app: &S, token: &str, title: &str, category_id: i64) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, task) = post_json(
        app,
        "/api/tasks",
        Some(token),
        json!({ "title": title, "task_category_id": category_id, "is_active": true }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Failed to create task: {}", task);
    task
}

/// Inserts an unowned template task with one tag and a "Warmup" list of two descriptions.
pub async fn seed_template_task(pool: &SqlitePool, category_id: i64, title: &str) -> Task {
    let mut conn = pool.acquire().await.expect("connection");
    let input = TaskInput {
        title: title.to_string(),
        task_category_id: category_id,
        is_active: true,
    };
    let task = tasks::create(&mut conn, &input, None)
        .await
        .expect("template task");
    let children = TaskUpdate {
        title: task.title.clone(),
        task_category_id: task.task_category_id,
        is_active: task.is_active,
        sort_order: task.sort_order,
        tags: Some(vec![TagInput {
            title: "cardio".into(),
        }]),
        description_lists: Some(vec![DescriptionListInput {
            title: "Warmup".into(),
            descriptions: Some(vec![
                DescriptionInput {
                    description: "Jog 5 minutes".into(),
                },
                DescriptionInput {
                    description: "Stretch".into(),
                },
            ]),
        }]),
    };
    tasks::update(&mut conn, &task, &children)
        .await
        .expect("template children")
}
