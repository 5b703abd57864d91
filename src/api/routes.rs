//! Router Assembly
//! Mission: One place that wires every route, gate, and layer

use axum::{
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::{comments, posts, products};
use crate::auth::{api as auth_api, auth_middleware, AuthState};
use crate::middleware::request_logging;
use crate::store::{CommentStore, PostStore, ProductStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductStore>,
    pub posts: Arc<PostStore>,
    pub comments: Arc<CommentStore>,
}

/// Create the API router
pub fn create_router(auth_state: AuthState, app_state: AppState) -> Router {
    let jwt_handler = auth_state.jwt_handler.clone();

    // Public auth routes
    let auth_routes = Router::new()
        .route("/signup", post(auth_api::register))
        .route("/signin", post(auth_api::login))
        .route("/refresh", post(auth_api::refresh))
        .with_state(auth_state.clone());

    // Everything under /v1 sits behind the gate
    let protected = Router::new()
        .route("/signout", post(auth_api::logout))
        .with_state(auth_state)
        .merge(resource_router(app_state))
        .route_layer(middleware::from_fn_with_state(jwt_handler, auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes)
        .nest("/v1", protected)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

fn resource_router(state: AppState) -> Router {
    Router::new()
        .route("/products", get(products::list_products))
        .route("/product", post(products::create_product))
        .route(
            "/product/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/posts", get(posts::list_posts))
        .route("/post", post(posts::create_post))
        .route(
            "/post/:id",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/comment", post(comments::create_comment))
        .route("/comments", post(comments::list_comments))
        .route(
            "/comment/:id",
            get(comments::get_comment)
                .put(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
