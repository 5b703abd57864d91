//! Post Endpoints
//! Mission: Per-user posts; writes never touch another user's rows

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::{ApiError, AppState, ListQuery};
use crate::auth::models::Claims;
use crate::models::{Page, Post};
use crate::validation::validate_post;

#[derive(Debug, Deserialize)]
pub struct PostPayload {
    #[serde(default)]
    description: String,
}

/// GET /v1/posts - the authenticated user's posts
pub async fn list_posts(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Page<Post>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let page = state.posts.list_for_user(&claims.user_id, &query.into_params())?;
    Ok(Json(page))
}

/// GET /v1/post/:id - readable regardless of owner
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    state
        .posts
        .get(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))
}

/// POST /v1/post
pub async fn create_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<PostPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let errors = validate_post(&payload.description);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let post = state.posts.create(&claims.user_id, &payload.description)?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /v1/post/:id - owner only
pub async fn update_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    payload: Result<Json<PostPayload>, JsonRejection>,
) -> Result<Json<Post>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let errors = validate_post(&payload.description);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    state
        .posts
        .update(&id, &claims.user_id, &payload.description)?
        .map(Json)
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized request!".to_string()))
}

/// DELETE /v1/post/:id - owner only
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state.posts.delete(&id, &claims.user_id)?;
    if deleted == 0 {
        return Err(ApiError::Unauthorized("Unauthorized request!".to_string()));
    }

    Ok(Json(json!({ "result": "success" })))
}
