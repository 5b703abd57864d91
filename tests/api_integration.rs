//! Integration tests for the HTTP API
//!
//! These tests drive the full router in memory: register, login, refresh,
//! logout, the authorization gate, and the resource endpoints, each against
//! a throwaway SQLite database.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tower::ServiceExt;

use bazaar_backend::api::{create_router, AppState};
use bazaar_backend::auth::{AuthState, JwtHandler, SessionStore, UserStore};
use bazaar_backend::db::Database;
use bazaar_backend::store::{CommentStore, PostStore, ProductStore};

fn test_app() -> (Router, Database, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let db = Database::open(temp_file.path().to_str().unwrap()).unwrap();

    let auth_state = AuthState::new(
        Arc::new(UserStore::new(db.clone())),
        Arc::new(SessionStore::new(db.clone())),
        Arc::new(JwtHandler::new("integration-secret".to_string())),
    );
    let app_state = AppState {
        products: Arc::new(ProductStore::new(db.clone())),
        posts: Arc::new(PostStore::new(db.clone())),
        comments: Arc::new(CommentStore::new(db.clone())),
    };

    (create_router(auth_state, app_state), db, temp_file)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(payload) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn register(app: &Router, username: &str) {
    let (status, body) = send(
        app,
        "POST",
        "/signup",
        None,
        Some(json!({
            "username": username,
            "fullname": "Test User",
            "email": format!("{}@example.com", username),
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {}", body);
    assert_eq!(body["message"], "success");
}

async fn login(app: &Router, username: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/signin",
        None,
        Some(json!({ "username": username, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signin failed: {}", body);
    body
}

async fn access_token(app: &Router, username: &str) -> String {
    register(app, username).await;
    let body = login(app, username).await;
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_login_refresh_logout_flow() {
    let (app, _db, _temp) = test_app();

    register(&app, "bob").await;

    let issued_at = chrono::Utc::now().timestamp();
    let tokens = login(&app, "bob").await;
    assert_eq!(tokens["username"], "bob");
    assert!(!tokens["access_token"].as_str().unwrap().is_empty());
    assert!(!tokens["refresh_token"].as_str().unwrap().is_empty());

    // Access tokens live 15 minutes
    let lifetime = tokens["expires"].as_i64().unwrap() - issued_at;
    assert!(
        (840..=901).contains(&lifetime),
        "unexpected access lifetime: {}s",
        lifetime
    );

    // The access token opens the gate
    let access = tokens["access_token"].as_str().unwrap();
    let (status, _) = send(&app, "GET", "/v1/products", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);

    // The refresh token buys a fresh pair
    let refresh = tokens["refresh_token"].as_str().unwrap();
    let (status, renewed) = send(
        &app,
        "POST",
        "/refresh",
        None,
        Some(json!({ "refresh_token": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "refresh failed: {}", renewed);
    assert_eq!(renewed["username"], "bob");
    assert!(!renewed["access_token"].as_str().unwrap().is_empty());

    // Logout with the renewed access token
    let renewed_access = renewed["access_token"].as_str().unwrap();
    let (status, body) = send(&app, "POST", "/v1/signout", Some(renewed_access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logout successfully");
}

#[tokio::test]
async fn test_register_validation_messages() {
    let (app, _db, _temp) = test_app();

    let (status, body) = send(&app, "POST", "/signup", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let errors = body["errors"].as_array().unwrap();
    let messages: Vec<&str> = errors
        .iter()
        .map(|e| e["error"].as_str().unwrap())
        .collect();
    assert_eq!(
        messages,
        vec![
            "Username is required",
            "Fullname is required",
            "Email is required",
            "Password is required",
        ]
    );
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let (app, _db, _temp) = test_app();

    register(&app, "bob").await;

    let (status, body) = send(
        &app,
        "POST",
        "/signup",
        None,
        Some(json!({
            "username": "bob",
            "fullname": "Second Bob",
            "email": "bob2@example.com",
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username already used!");
}

#[tokio::test]
async fn test_login_failures() {
    let (app, _db, _temp) = test_app();

    register(&app, "bob").await;

    let (status, body) = send(
        &app,
        "POST",
        "/signin",
        None,
        Some(json!({ "username": "bob", "password": "wrongpassword" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Your password is incorrect");

    let (status, body) = send(
        &app,
        "POST",
        "/signin",
        None,
        Some(json!({ "username": "nobody", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Username or password is incorrect");
}

#[tokio::test]
async fn test_gate_rejects_missing_and_refresh_tokens() {
    let (app, _db, _temp) = test_app();

    // No Authorization header
    let (status, body) = send(&app, "GET", "/v1/products", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Not Authorized!");

    register(&app, "bob").await;
    let tokens = login(&app, "bob").await;

    // A refresh token is not an access token
    let refresh = tokens["refresh_token"].as_str().unwrap();
    let (status, body) = send(&app, "GET", "/v1/products", Some(refresh), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Not Authorized!");

    // And an access token cannot mint new pairs
    let access = tokens["access_token"].as_str().unwrap();
    let (status, body) = send(
        &app,
        "POST",
        "/refresh",
        None,
        Some(json!({ "refresh_token": access })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Not Authorized");
}

#[tokio::test]
async fn test_refresh_with_garbage_token() {
    let (app, _db, _temp) = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/refresh",
        None,
        Some(json!({ "refresh_token": "not-a-jwt" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The verifier's own message comes through, not the gate's
    let message = body["error"].as_str().unwrap();
    assert!(!message.is_empty());
    assert_ne!(message, "Not Authorized!");
}

#[tokio::test]
async fn test_double_login_keeps_single_session() {
    let (app, db, _temp) = test_app();

    register(&app, "bob").await;
    login(&app, "bob").await;
    login(&app, "bob").await;

    let sessions = SessionStore::new(db);
    assert_eq!(sessions.session_count("bob").unwrap(), 1);
}

#[tokio::test]
async fn test_logout_removes_session() {
    let (app, db, _temp) = test_app();

    let access = access_token(&app, "bob").await;

    let sessions = SessionStore::new(db);
    assert_eq!(sessions.session_count("bob").unwrap(), 1);

    let (status, _) = send(&app, "POST", "/v1/signout", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sessions.session_count("bob").unwrap(), 0);
}

#[tokio::test]
async fn test_product_crud_flow() {
    let (app, _db, _temp) = test_app();

    let token = access_token(&app, "bob").await;
    let token = Some(token.as_str());

    let (status, product) = send(
        &app,
        "POST",
        "/v1/product",
        token,
        Some(json!({ "name": "Mechanical keyboard", "price": 49.9 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", product);
    let id = product["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&app, "GET", &format!("/v1/product/{}", id), token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Mechanical keyboard");

    let (status, page) = send(&app, "GET", "/v1/products?search=keyboard", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_data"], 1);
    assert_eq!(page["data"][0]["id"].as_str().unwrap(), id);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/v1/product/{}", id),
        token,
        Some(json!({ "name": "Mechanical keyboard v2", "price": 59.9 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Mechanical keyboard v2");

    let (status, body) = send(&app, "DELETE", &format!("/v1/product/{}", id), token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "success");

    // Deleting again reports the row as gone
    let (status, body) = send(&app, "DELETE", &format!("/v1/product/{}", id), token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");
}

#[tokio::test]
async fn test_product_validation_messages() {
    let (app, _db, _temp) = test_app();

    let token = access_token(&app, "bob").await;

    let (status, body) = send(
        &app,
        "POST",
        "/v1/product",
        Some(&token),
        Some(json!({ "name": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let errors = body["errors"].as_array().unwrap();
    let messages: Vec<&str> = errors
        .iter()
        .map(|e| e["error"].as_str().unwrap())
        .collect();
    assert_eq!(
        messages,
        vec!["Name value must greater than 10", "Price is required"]
    );
}

#[tokio::test]
async fn test_list_rejects_malformed_paging() {
    let (app, _db, _temp) = test_app();

    let token = access_token(&app, "bob").await;

    let (status, body) = send(&app, "GET", "/v1/products?page=abc", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_post_ownership() {
    let (app, _db, _temp) = test_app();

    let budi = access_token(&app, "budi").await;
    let sari = access_token(&app, "sari").await;

    let (status, post) = send(
        &app,
        "POST",
        "/v1/post",
        Some(&budi),
        Some(json!({ "description": "First post" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = post["id"].as_str().unwrap().to_string();

    // Reads are open to any authenticated user
    let (status, _) = send(&app, "GET", &format!("/v1/post/{}", id), Some(&sari), None).await;
    assert_eq!(status, StatusCode::OK);

    // Writes are not
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/v1/post/{}", id),
        Some(&sari),
        Some(json!({ "description": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized request!");

    let (status, body) = send(&app, "DELETE", &format!("/v1/post/{}", id), Some(&sari), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized request!");

    // Listings stay per-user
    let (_, page) = send(&app, "GET", "/v1/posts", Some(&budi), None).await;
    assert_eq!(page["total_data"], 1);
    let (_, page) = send(&app, "GET", "/v1/posts", Some(&sari), None).await;
    assert_eq!(page["total_data"], 0);

    let (status, body) = send(&app, "DELETE", &format!("/v1/post/{}", id), Some(&budi), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "success");
}

#[tokio::test]
async fn test_comment_thread_flow() {
    let (app, _db, _temp) = test_app();

    let token = access_token(&app, "bob").await;
    let token = Some(token.as_str());

    let (_, post) = send(
        &app,
        "POST",
        "/v1/post",
        token,
        Some(json!({ "description": "First post" })),
    )
    .await;
    let post_id = post["id"].as_str().unwrap().to_string();

    let (status, comment) = send(
        &app,
        "POST",
        "/v1/comment",
        token,
        Some(json!({ "post_id": post_id, "content": "Nice post" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "comment failed: {}", comment);
    let comment_id = comment["id"].as_str().unwrap().to_string();

    let (status, reply) = send(
        &app,
        "POST",
        "/v1/comment",
        token,
        Some(json!({ "post_id": post_id, "content": "Agreed", "comment_id": comment_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reply["comment_id"].as_str().unwrap(), comment_id);

    // Top-level listing hides replies but counts them
    let (status, page) = send(
        &app,
        "POST",
        "/v1/comments",
        token,
        Some(json!({ "post_id": post_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["total_data"], 2);
    assert_eq!(page["data"][0]["has_child"], true);

    let (status, body) = send(&app, "POST", "/v1/comments", token, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Post id required!");

    let (status, body) = send(&app, "GET", "/v1/comment/ghost", token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Comment not found!");

    let (status, edited) = send(
        &app,
        "PUT",
        &format!("/v1/comment/{}", comment_id),
        token,
        Some(json!({ "post_id": post_id, "content": "Edited" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["content"], "Edited");

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/v1/comment/{}", comment_id),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "success");

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/v1/comment/{}", comment_id),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found!");
}
