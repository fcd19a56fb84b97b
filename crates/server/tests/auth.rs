mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn health_check_is_public() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(response.0, StatusCode::OK);
}

#[tokio::test]
async fn sign_up_creates_identity_and_profile() {
    let app = TestApp::new().await;
    let account = app.sign_up("Ada@DevHub.io", "Ada").await;

    let (status, profile) = app.get("/api/profile", &account.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["id"], account.id);
    assert_eq!(profile["email"], "ada@devhub.io");
    assert_eq!(profile["status"], "activo");
    assert_eq!(profile["role"], "usuario");
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let app = TestApp::new().await;
    app.sign_up("ada@devhub.io", "Ada").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "email": "ada@devhub.io",
                "password": "another-pass",
                "first_name": "Other",
                "last_name": "Person",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn short_password_is_rejected() {
    let app = TestApp::new().await;
    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "email": "ada@devhub.io",
                "password": "12345",
                "first_name": "Ada",
                "last_name": "Lovelace",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_checks_the_password() {
    let app = TestApp::new().await;
    app.sign_up("ada@devhub.io", "Ada").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@devhub.io", "password": "wrong-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@devhub.io", "password": "s3cret-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["profile"]["first_name"], "Ada");
}

#[tokio::test]
async fn protected_routes_need_a_token() {
    let app = TestApp::new().await;

    let (status, _) = app.request(Method::GET, "/api/projects", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/projects", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_self_edit() {
    let app = TestApp::new().await;
    let account = app.sign_up("ada@devhub.io", "Ada").await;

    let (status, profile) = app
        .request(
            Method::PUT,
            "/api/profile",
            Some(&account.token),
            Some(json!({
                "first_name": "Augusta Ada",
                "last_name": "King",
                "skills": "Rust, SQL",
                "interests": "  ",
                "repository_links": "https://github.com/ada",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["first_name"], "Augusta Ada");
    assert_eq!(profile["skills"], "Rust, SQL");
    assert!(profile["interests"].is_null());
}
