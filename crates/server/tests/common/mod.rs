#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use devhub_server::{app, config::Config, db::Database, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@devhub.io";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct Account {
    pub id: String,
    pub token: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config {
            admin_emails: vec![ADMIN_EMAIL.to_string()],
            ..Config::default()
        };
        let db = Database::in_memory().await.unwrap();
        db.run_migrations().await.unwrap();
        let state = AppState::new(db, config);

        Self {
            router: app(state.clone()),
            state,
        }
    }

    pub fn build_request(
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(Self::build_request(method, uri, token, body))
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn sign_up(&self, email: &str, first_name: &str) -> Account {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": "s3cret-pass",
                    "first_name": first_name,
                    "last_name": "Tester",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "sign-up failed: {body}");

        Account {
            id: body["profile"]["id"].as_str().unwrap().to_string(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn create_project(&self, owner: &Account, body: Value) -> Value {
        let (status, project) = self.post("/api/projects", &owner.token, body).await;
        assert_eq!(status, StatusCode::OK, "project creation failed: {project}");
        project
    }
}
