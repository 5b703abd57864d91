//! Bazaar Backend - JSON REST API
//! Mission: Token-secured CRUD over products, posts, and comments

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bazaar_backend::{
    api::{create_router, AppState},
    auth::{AuthState, JwtHandler, SessionStore, UserStore},
    db::Database,
    models::Config,
    store::{CommentStore, PostStore, ProductStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    info!("🚀 Bazaar API starting");

    let config = Config::from_env()?;
    let db = Database::open(&config.database_path)?;

    let jwt_handler = Arc::new(JwtHandler::new(config.jwt_secret.clone()));
    let auth_state = AuthState::new(
        Arc::new(UserStore::new(db.clone())),
        Arc::new(SessionStore::new(db.clone())),
        jwt_handler,
    );
    info!("🔐 Authentication initialized");

    let app_state = AppState {
        products: Arc::new(ProductStore::new(db.clone())),
        posts: Arc::new(PostStore::new(db.clone())),
        comments: Arc::new(CommentStore::new(db)),
    };

    let app = create_router(auth_state, app_state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("🎯 API server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Initialize tracing with env-filter control
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bazaar_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // Standard dotenv search (cwd + parents)
    let _ = dotenv::dotenv();

    // Also honor a .env next to the crate when run from elsewhere
    let candidate = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}
