#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use pairgoal_server::{api::app_router, build_state, config::Config};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub upload_dir: std::path::PathBuf,
    _tmp: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let tmp = tempdir().unwrap();
    let upload_dir = tmp.path().join("profile_images");
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp.path().join("test.db").to_string_lossy().into_owned(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        upload_dir: upload_dir.clone(),
        jwt_secret: vec![3u8; 32],
        refresh_secret: vec![4u8; 32],
        access_token_ttl: Duration::from_secs(900),
        refresh_token_ttl: Duration::from_secs(3600),
    };
    let state = build_state(&config).await.unwrap();
    TestApp {
        router: app_router(state, &config),
        upload_dir,
        _tmp: tmp,
    }
}

impl TestApp {
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    /// Registers a user and returns `(user_id, access_token, unique_code)`.
    pub async fn register(&self, first_name: &str, email: &str) -> (i64, String, String) {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/users/register",
                None,
                Some(json!({
                    "first_name": first_name,
                    "last_name": "Tester",
                    "gender": "Female",
                    "email": email,
                    "password": "correct-horse",
                    "confirm_password": "correct-horse",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        let result = &body["result"];
        (
            result["user"]["id"].as_i64().unwrap(),
            result["token"].as_str().unwrap().to_string(),
            result["user"]["unique_code"].as_str().unwrap().to_string(),
        )
    }
}
