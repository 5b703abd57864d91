//! Product Endpoints
//! Mission: Catalog CRUD with paged, searchable listings

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::{ApiError, AppState, ListQuery};
use crate::models::{Page, Product};
use crate::validation::validate_product;

#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    #[serde(default)]
    name: String,
    #[serde(default)]
    price: f64,
}

/// GET /v1/products
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Page<Product>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let page = state.products.list(&query.into_params())?;
    Ok(Json(page))
}

/// GET /v1/product/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    state
        .products
        .get(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))
}

/// POST /v1/product
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let errors = validate_product(&payload.name, payload.price);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let product = state.products.create(&payload.name, payload.price)?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /v1/product/:id
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let errors = validate_product(&payload.name, payload.price);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    state
        .products
        .update(&id, &payload.name, payload.price)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))
}

/// DELETE /v1/product/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state.products.delete(&id)?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }

    Ok(Json(json!({ "result": "success" })))
}
