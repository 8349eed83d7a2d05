//! API integration tests
//!
//! Run against a live server with a bootstrap librarian configured
//! (`CATALOG_AUTH__BOOTSTRAP_LOGIN=librarian`, `CATALOG_AUTH__BOOTSTRAP_PASSWORD=librarian`).
//! `CATALOG_TEST_READER=login:password` adds checks with a reader account.

use chrono::{Duration, Local};
use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated librarian token
async fn get_auth_token(client: &Client) -> String {
    login_token(client, "librarian", "librarian").await
}

async fn login_token(client: &Client, login: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": login,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

fn no_redirect_client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    assert!(!token.is_empty());

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["can_mark_returned"], true);
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "librarian",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_dashboard_counts_visits() {
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client");

    let first: Value = client
        .get(format!("{}/catalog", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(first["num_visits"], 0);
    assert!(first["num_books"].is_i64());

    let second: Value = client
        .get(format!("{}/catalog", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(second["num_visits"], 1);
}

#[tokio::test]
#[ignore]
async fn test_unknown_records_are_not_found() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/999999", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    let response = client
        .get(format!("{}/authors?page=9999", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_renew_unknown_copy() {
    let client = no_redirect_client();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!(
            "{}/book-instances/00000000-0000-0000-0000-000000000000/renew",
            BASE_URL
        ))
        .bearer_auth(&token)
        .json(&json!({ "renewal_date": Local::now().date_naive().to_string() }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_renew_date_bounds() {
    let client = no_redirect_client();
    let token = get_auth_token(&client).await;

    let borrowed: Value = client
        .get(format!("{}/book-instances/borrowed", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let Some(id) = borrowed["items"][0]["id"].as_str() else {
        // No copy on loan in this database
        return;
    };
    let url = format!("{}/book-instances/{}/renew", BASE_URL, id);
    let today = Local::now().date_naive();

    let form: Value = client
        .get(&url)
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(form["renewal_date"], (today + Duration::days(21)).to_string());

    let response = client
        .post(&url)
        .bearer_auth(&token)
        .json(&json!({ "renewal_date": (today + Duration::days(29)).to_string() }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["fields"]["renewal_date"].is_array());

    let response = client
        .post(&url)
        .bearer_auth(&token)
        .json(&json!({ "renewal_date": (today + Duration::days(28)).to_string() }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()["location"],
        "/api/v1/book-instances/borrowed"
    );
}

#[tokio::test]
#[ignore]
async fn test_author_lifecycle() {
    let client = no_redirect_client();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/authors/create", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "first_name": "Test", "last_name": "Author" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()["location"]
        .to_str()
        .expect("Location header")
        .to_string();

    let author: Value = client
        .get(format!("http://localhost:8080{}", location))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(author["date_of_death"], "1916-12-10");
    let id = author["id"].as_i64().expect("author id");

    let response = client
        .post(format!("{}/authors/{}/update", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({ "first_name": "Test", "last_name": "Author", "date_of_death": null }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = client
        .post(format!("{}/authors/{}/delete", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/api/v1/authors");
}

#[tokio::test]
#[ignore]
async fn test_my_borrowed_lists_only_copies_on_loan() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let mut page = 1;
    loop {
        let body: Value = client
            .get(format!("{}/book-instances/mine?page={}", BASE_URL, page))
            .bearer_auth(&token)
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse response");

        for item in body["items"].as_array().expect("items array") {
            assert_eq!(item["status"], "on_loan", "unexpected copy {}", item["id"]);
        }

        if page >= body["num_pages"].as_i64().expect("num_pages") {
            break;
        }
        page += 1;
    }
}

#[tokio::test]
#[ignore]
async fn test_dashboard_counts_are_consistent() {
    let client = Client::new();

    let body: Value = client
        .get(format!("{}/catalog", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let count = |key: &str| body[key].as_i64().expect("integer count");
    assert!(count("num_instances_available") <= count("num_instances"));
    assert!(count("num_wild_books") <= count("num_books"));
    assert!(count("num_instances") >= 0 && count("num_authors") >= 0 && count("num_genre") >= 0);
}

#[tokio::test]
#[ignore]
async fn test_rejected_renewal_leaves_due_back_unchanged() {
    let client = no_redirect_client();
    let token = get_auth_token(&client).await;

    let instances: Value = client
        .get(format!("{}/book-instances", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let Some(id) = instances["items"][0]["id"].as_str() else {
        // No copies in this database
        return;
    };
    let copy_url = format!("{}/book-instances/{}", BASE_URL, id);
    let renew_url = format!("{}/renew", copy_url);
    let target = (Local::now().date_naive() + Duration::days(7)).to_string();

    let before: Value = client
        .get(&copy_url)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    // Without a login, and with a date past the 4 week limit
    let response = client
        .post(&renew_url)
        .json(&json!({ "renewal_date": target }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);

    // A reader account, when one is configured as "login:password"
    if let Ok(reader) = std::env::var("CATALOG_TEST_READER") {
        let (login, password) = reader.split_once(':').expect("login:password");
        let reader_token = login_token(&client, login, password).await;
        let response = client
            .post(&renew_url)
            .bearer_auth(&reader_token)
            .json(&json!({ "renewal_date": target }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 403);
    }

    let response = client
        .post(&renew_url)
        .bearer_auth(&token)
        .json(&json!({
            "renewal_date": (Local::now().date_naive() + Duration::days(29)).to_string()
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let after: Value = client
        .get(&copy_url)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(before["due_back"], after["due_back"]);
}
