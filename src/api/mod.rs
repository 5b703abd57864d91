pub mod comments;
pub mod posts;
pub mod products;
pub mod routes;

pub use routes::{create_router, AppState};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::models::ListParams;
use crate::validation::errors_body;

/// Listing controls as they arrive on the query string
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    page: Option<u32>,
    limit: Option<u32>,
    order: Option<String>,
    by: Option<String>,
    search: Option<String>,
}

impl ListQuery {
    /// Fill defaults and cap the page size
    pub(crate) fn into_params(self) -> ListParams {
        ListParams {
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(10).min(500),
            order: self.order.unwrap_or_else(|| "asc".to_string()),
            by: self.by.unwrap_or_else(|| "name".to_string()),
            search: self.search,
        }
    }
}

// ===== Error Handling =====

#[derive(Debug)]
pub enum ApiError {
    Database(anyhow::Error),
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Validation(Vec<String>),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Database(err) => {
                tracing::error!("Database error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, json!({ "error": message }))
            }
            ApiError::Validation(messages) => (StatusCode::BAD_REQUEST, errors_body(&messages)),
        };

        (status, Json(body)).into_response()
    }
}
