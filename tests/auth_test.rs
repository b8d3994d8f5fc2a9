mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use fabulis::auth::{create_jwt, decode_jwt, hash_password, verify_password};
use fabulis::models::user::Role;
use serde_json::json;
use tower::util::ServiceExt; // for `oneshot`

#[tokio::test]
async fn test_password_hashing() {
    let password = "super_secret_password";
    let hash = hash_password(password).expect("Failed to hash password");

    assert_ne!(password, hash);
    assert!(verify_password(password, &hash).unwrap());
    assert!(!verify_password("wrong_password", &hash).unwrap());
}

#[tokio::test]
async fn test_jwt_carries_user_id_and_role() {
    let token = create_jwt("secret", 7, "ana@example.com", Role::Author, 7).unwrap();
    let claims = decode_jwt("secret", &token).expect("Failed to verify JWT");

    assert_eq!(claims.sub, "7");
    assert_eq!(claims.role, Role::Author);
    assert!(decode_jwt("another-secret", &token).is_err());
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = common::setup().await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "display_name": "Ana",
                "email": "Ana@Example.com",
                "password": "correct-horse",
                "role": "author"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "author");
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "ana@example.com", "password": "correct-horse" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["display_name"], "Ana");
    assert_eq!(me["has_active_subscription"], false);
}

#[tokio::test]
async fn test_login_sets_http_only_cookie_usable_for_auth() {
    let app = common::setup().await;

    app.post(
        "/api/auth/register",
        None,
        json!({ "display_name": "Rui", "email": "rui@example.com", "password": "secret-pw" }),
    )
    .await;

    let req = Request::builder()
        .uri("/api/auth/login")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(&json!({ "email": "rui@example.com", "password": "secret-pw" }))
                .unwrap(),
        ))
        .unwrap();
    let response = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.contains("HttpOnly"));
    let pair = cookie.split(';').next().unwrap().to_string();

    let req = Request::builder()
        .uri("/api/auth/me")
        .header(header::COOKIE, pair)
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = common::setup().await;

    app.post(
        "/api/auth/register",
        None,
        json!({ "display_name": "Ana", "email": "ana@example.com", "password": "correct-horse" }),
    )
    .await;

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "ana@example.com", "password": "wrong-horse" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, _) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "whatever" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = common::setup().await;
    let payload = json!({ "display_name": "Ana", "email": "ana@example.com", "password": "123456" });

    let (status, _) = app.post("/api/auth/register", None, payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut shouting = payload;
    shouting["email"] = json!("ANA@EXAMPLE.COM");
    let (status, body) = app.post("/api/auth/register", None, shouting).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already registered"));
}

#[tokio::test]
async fn test_cannot_self_register_as_admin() {
    let app = common::setup().await;

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "display_name": "Mallory",
                "email": "mallory@example.com",
                "password": "123456",
                "role": "admin"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_or_forged_token_is_rejected() {
    let app = common::setup().await;

    let (status, body) = app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let forged = create_jwt("not-the-server-secret", 1, "x@example.com", Role::Admin, 7).unwrap();
    let (status, _) = app.get("/api/admin/users", Some(&forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let app = common::setup().await;
    let reader = app.user("Reader", Role::Reader).await;
    let admin = app.user("Admin", Role::Admin).await;

    let (status, _) = app.get("/api/admin/users", Some(&reader.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, users) = app.get("/api/admin/users", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_profile_password_change_requires_current_password() {
    let app = common::setup().await;

    let (_, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "display_name": "Ana", "email": "ana@example.com", "password": "first-pass" }),
        )
        .await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(
            "PUT",
            "/api/users/me",
            Some(&token),
            Some(json!({ "current_password": "nope", "new_password": "second-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            "PUT",
            "/api/users/me",
            Some(&token),
            Some(json!({
                "display_name": "Ana Maria",
                "current_password": "first-pass",
                "new_password": "second-pass"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["display_name"], "Ana Maria");

    let (status, _) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "ana@example.com", "password": "second-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}
