//! Router tests that stop before any database access

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use catalog_server::{
    api,
    config::AppConfig,
    models::user::{AccountType, UserClaims},
    repository::Repository,
    services::{sessions::MemorySessionStore, Services},
    AppState,
};

const COPY_ID: &str = "6a5c2e0e-4b1f-4c8a-9d4e-2f7b3c1a9e10";

fn app() -> (Router, AppConfig) {
    let config = AppConfig::default();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("lazy pool");
    let services = Services::new(
        Repository::new(pool),
        &config,
        Arc::new(MemorySessionStore::new()),
    );
    let state = AppState {
        config: Arc::new(config.clone()),
        services: Arc::new(services),
    };
    (api::router(state), config)
}

fn token(config: &AppConfig, account_type: AccountType) -> String {
    let now = Utc::now().timestamp();
    UserClaims {
        sub: "tester".to_string(),
        user_id: 42,
        account_type,
        rights: account_type.rights(),
        exp: now + 3600,
        iat: now,
    }
    .create_token(&config.auth.jwt_secret)
    .expect("token")
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_post(uri: &str, bearer: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).expect("request")
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = app();
    let (status, body) = send(app, get("/api/v1/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_my_borrowed_requires_login() {
    let (app, _) = app();
    let (status, body) = send(app, get("/api/v1/book-instances/mine", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["login_url"], "/api/v1/auth/login");
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let (app, _) = app();
    let (status, _) = send(app, get("/api/v1/book-instances/mine", Some("not-a-jwt"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_all_borrowed_forbidden_for_reader() {
    let (app, config) = app();
    let reader = token(&config, AccountType::Reader);
    let (status, body) = send(app, get("/api/v1/book-instances/borrowed", Some(&reader))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"].as_str().unwrap_or_default().contains("can mark returned"));
}

#[tokio::test]
async fn test_renew_requires_login() {
    let (app, _) = app();
    let uri = format!("/api/v1/book-instances/{}/renew", COPY_ID);
    let (status, _) = send(app, json_post(&uri, None, json!({ "renewal_date": "2030-01-01" }))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_renew_forbidden_for_reader() {
    let (app, config) = app();
    let reader = token(&config, AccountType::Reader);
    let uri = format!("/api/v1/book-instances/{}/renew", COPY_ID);

    let (status, _) = send(
        app.clone(),
        json_post(&uri, Some(&reader), json!({ "renewal_date": "2030-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(app, get(&uri, Some(&reader))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_author_management_requires_write_rights() {
    let (app, config) = app();
    let reader = token(&config, AccountType::Reader);
    let form = json!({ "first_name": "Jane", "last_name": "Austen" });

    let (status, _) = send(app.clone(), json_post("/api/v1/authors/create", None, form.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(app.clone(), json_post("/api/v1/authors/create", Some(&reader), form)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(app.clone(), get("/api/v1/authors/create", Some(&reader))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(app, json_post("/api/v1/authors/1/delete", Some(&reader), json!({}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_librarian_gets_empty_author_form() {
    let (app, config) = app();
    let librarian = token(&config, AccountType::Librarian);
    let (status, body) = send(app, get("/api/v1/authors/create", Some(&librarian))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["initial"]["date_of_death"], "1916-12-10");
    assert!(body["author_id"].is_null());
}

#[tokio::test]
async fn test_non_numeric_page_is_bad_request() {
    let (app, _) = app();
    let (status, body) = send(app, get("/api/v1/authors?page=abc", None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let (app, _) = app();

    let (status, body) = send(app.clone(), get("/api/v1/books/abc", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (status, body) = send(app, get("/api/v1/book-instances/not-a-uuid", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_reader_with_malformed_renewal_is_forbidden() {
    let (app, config) = app();
    let reader = token(&config, AccountType::Reader);
    let uri = format!("/api/v1/book-instances/{}/renew", COPY_ID);

    let (status, _) = send(
        app.clone(),
        json_post(&uri, Some(&reader), json!({ "renewal_date": "garbage" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        app,
        json_post(
            "/api/v1/authors/create",
            Some(&reader),
            json!({ "first_name": "Jane", "date_of_birth": "not-a-date" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_malformed_renewal_date_is_field_error() {
    let (app, config) = app();
    let librarian = token(&config, AccountType::Librarian);
    let uri = format!("/api/v1/book-instances/{}/renew", COPY_ID);

    let (status, body) = send(
        app,
        json_post(&uri, Some(&librarian), json!({ "renewal_date": "2030-13-45" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidForm");
    assert!(body["fields"]["renewal_date"][0].is_string());
}

#[tokio::test]
async fn test_malformed_author_dates_are_field_errors() {
    let (app, config) = app();
    let librarian = token(&config, AccountType::Librarian);

    let (status, body) = send(
        app.clone(),
        json_post(
            "/api/v1/authors/create",
            Some(&librarian),
            json!({ "first_name": "Jane", "last_name": "Austen", "date_of_birth": "not-a-date" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["date_of_birth"].is_array());

    let (status, body) = send(
        app,
        json_post(
            "/api/v1/authors/3/update",
            Some(&librarian),
            json!({ "first_name": "Jane", "last_name": "Austen", "date_of_death": 1817 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["date_of_death"].is_array());
}

#[tokio::test]
async fn test_unparseable_form_body_is_bad_request() {
    let (app, config) = app();
    let librarian = token(&config, AccountType::Librarian);
    let uri = format!("/api/v1/book-instances/{}/renew", COPY_ID);

    let request = Request::builder()
        .method(Method::POST)
        .uri(&uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", librarian))
        .body(Body::from("{\"renewal_date\": "))
        .expect("request");
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}
