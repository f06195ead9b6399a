mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::spawn_app;
use serde_json::json;

fn login_body(email: &str, password: &str) -> serde_json::Value {
    json!({ "email": email, "password": password })
}

#[tokio::test]
async fn register_returns_tokens_and_pairing_code() {
    let app = spawn_app().await;

    let (user_id, token, code) = app.register("Anna", "Anna@Example.com").await;

    assert_eq!(code.len(), 4);
    let (status, body) = app
        .call(Method::GET, "/api/v1/users/me", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["id"].as_i64().unwrap(), user_id);
    assert_eq!(body["result"]["email"], "anna@example.com");
    assert!(body["result"].get("password").is_none());
}

#[tokio::test]
async fn register_rejects_mismatched_confirmation() {
    let app = spawn_app().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/users/register",
            None,
            Some(json!({
                "first_name": "Anna",
                "last_name": "Tester",
                "gender": "Female",
                "email": "anna@example.com",
                "password": "one",
                "confirm_password": "two",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(
        body["message"],
        "Password and confirm password should be same."
    );
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = spawn_app().await;
    app.register("Anna", "anna@example.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/users/register",
            None,
            Some(json!({
                "first_name": "Other",
                "last_name": "Tester",
                "gender": "Male",
                "email": "ANNA@example.com",
                "password": "pw",
                "confirm_password": "pw",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["status"], 405);
}

#[tokio::test]
async fn malformed_json_uses_the_envelope() {
    let app = spawn_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/users/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn login_and_refresh() {
    let app = spawn_app().await;
    app.register("Anna", "anna@example.com").await;

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/users/login",
            None,
            Some(login_body("anna@example.com", "wrong")),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/users/login",
            None,
            Some(login_body("nobody@example.com", "correct-horse")),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/users/login",
            None,
            Some(login_body("anna@example.com", "correct-horse")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["result"]["token"].as_str().unwrap().to_string();
    let refresh = body["result"]["refresh_token"].as_str().unwrap().to_string();

    // An access token is not accepted as a refresh token.
    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/users/refreshtoken",
            None,
            Some(json!({ "refresh_token": access })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/users/refreshtoken",
            None,
            Some(json!({ "refresh_token": refresh })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let renewed = body["result"]["token"].as_str().unwrap();

    let (status, _) = app
        .call(Method::GET, "/api/v1/users/me", Some(renewed), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // Refresh tokens never open protected routes.
    let (status, _) = app
        .call(Method::GET, "/api/v1/users/me", Some(&refresh), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_acknowledges_with_null_token() {
    let app = spawn_app().await;

    let (status, body) = app.call(Method::GET, "/api/v1/users/logout", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["result"]["token"].is_null());
}

#[tokio::test]
async fn password_change_takes_effect() {
    let app = spawn_app().await;
    let (_, token, _) = app.register("Anna", "anna@example.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/users/changepassword",
            Some(&token),
            Some(json!({ "new_password": "new-pass", "confirm_password": "other" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "New password and confirm password should be same."
    );

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/users/changepassword",
            Some(&token),
            Some(json!({ "new_password": "new-pass", "confirm_password": "new-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password updated successfully.");

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/users/login",
            None,
            Some(login_body("anna@example.com", "correct-horse")),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/users/login",
            None,
            Some(login_body("anna@example.com", "new-pass")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn profile_and_fcm_updates() {
    let app = spawn_app().await;
    let (user_id, token, _) = app.register("Anna", "anna@example.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/users/profileupdate",
            Some(&token),
            Some(json!({ "first_name": "Annie", "last_name": "Lee" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["first_name"], "Annie");

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/users/fcmid",
            Some(&token),
            Some(json!({ "fcm_id": "device-token-1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(
            Method::GET,
            &format!("/api/v1/users/{user_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["last_name"], "Lee");
    assert!(body["result"].get("unique_code").is_none());

    let (status, _) = app
        .call(Method::GET, "/api/v1/users/9999", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn multipart_request(token: &str, content_type: &str, file_name: &str, data: &[u8]) -> Request<Body> {
    let boundary = "pairgoal-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"user_photo\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/users/profileimageupdate")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn profile_image_upload_stores_file() {
    let app = spawn_app().await;
    let (_, token, _) = app.register("Anna", "anna@example.com").await;

    let (status, body) = app
        .send(multipart_request(&token, "image/png", "me.png", b"\x89PNG fake"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Image uploaded successfully.");
    let image_name = body["result"]["image_name"].as_str().unwrap();
    assert!(image_name.starts_with("user_photo-"));
    assert!(image_name.ends_with(".png"));
    assert!(app.upload_dir.join(image_name).exists());

    let (_, me) = app
        .call(Method::GET, "/api/v1/users/me", Some(&token), None)
        .await;
    assert_eq!(me["result"]["profile_image"], image_name);
}

#[tokio::test]
async fn profile_image_upload_rejects_non_images_and_large_files() {
    let app = spawn_app().await;
    let (_, token, _) = app.register("Anna", "anna@example.com").await;

    let (status, _) = app
        .send(multipart_request(&token, "text/plain", "notes.txt", b"hello"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let big = vec![0u8; 250_001];
    let (status, _) = app
        .send(multipart_request(&token, "image/jpeg", "big.jpg", &big))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unavailability_must_lie_in_the_future() {
    let app = spawn_app().await;
    let (user_id, token, _) = app.register("Anna", "anna@example.com").await;
    let fmt = |d: chrono::NaiveDateTime| d.format("%Y-%m-%d %H:%M:%S").to_string();
    let now = Utc::now().naive_utc();

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/users/unavailability",
            Some(&token),
            Some(json!({
                "unavailability_start": fmt(now + Duration::days(1)),
                "unavailability_end": fmt(now + Duration::days(3)),
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["user_id"].as_i64().unwrap(), user_id);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/users/unavailability",
            Some(&token),
            Some(json!({
                "unavailability_start": fmt(now - Duration::days(1)),
                "unavailability_end": fmt(now + Duration::days(3)),
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Unavailability start time should be greater than current time."
    );
}
