//! Comment Endpoints
//! Mission: Threaded discussion under posts, edits restricted to the author

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::{ApiError, AppState};
use crate::auth::models::Claims;
use crate::models::{Comment, Page};
use crate::validation::validate_comment;

#[derive(Debug, Deserialize)]
pub struct CommentPayload {
    #[serde(default)]
    post_id: String,
    #[serde(default)]
    content: String,
    /// Parent comment id when this is a reply
    comment_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentListPayload {
    #[serde(default)]
    post_id: String,
}

/// POST /v1/comment
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CommentPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let errors = validate_comment(&payload.post_id, &payload.content);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // An empty comment_id means a top-level comment, not a reply to ""
    let parent = payload.comment_id.as_deref().filter(|p| !p.is_empty());

    let comment = state
        .comments
        .create(&payload.post_id, &claims.user_id, &payload.content, parent)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /v1/comment/:id
pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Comment>, ApiError> {
    state
        .comments
        .get(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Comment not found!".to_string()))
}

/// POST /v1/comments - top-level comments of one post
pub async fn list_comments(
    State(state): State<AppState>,
    payload: Result<Json<CommentListPayload>, JsonRejection>,
) -> Result<Json<Page<Comment>>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if payload.post_id.is_empty() {
        return Err(ApiError::BadRequest("Post id required!".to_string()));
    }

    let page = state.comments.list_for_post(&payload.post_id)?;
    Ok(Json(page))
}

/// PUT /v1/comment/:id - author only; only the content changes
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    payload: Result<Json<CommentPayload>, JsonRejection>,
) -> Result<Json<Comment>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let errors = validate_comment(&payload.post_id, &payload.content);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    state
        .comments
        .update(&id, &claims.user_id, &payload.content)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Not Found!".to_string()))
}

/// DELETE /v1/comment/:id - author only
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state.comments.delete(&id, &claims.user_id)?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Not Found!".to_string()));
    }

    Ok(Json(json!({ "result": "success" })))
}
