use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post owned by the user who created it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment on a post. `comment_id` names the parent comment for replies;
/// `has_child` reports whether any reply points back at this row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub content: String,
    #[serde(rename = "comment_id")]
    pub parent_id: Option<String>,
    pub has_child: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Paged listing envelope: one page of rows plus the unpaged total
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_data: i64,
}

/// Normalized listing controls. Sort column and direction are whitelisted
/// by the stores; unknown values fall back to the defaults.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub page: u32,
    pub limit: u32,
    pub order: String,
    pub by: String,
    pub search: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            order: "asc".to_string(),
            by: "name".to_string(),
            search: None,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_path: String,
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "data/bazaar.db".to_string());

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("⚠️ JWT_SECRET not set, using a development default");
            "dev-secret-change-me-in-production".to_string()
        });

        Ok(Self {
            bind_addr,
            database_path,
            jwt_secret,
        })
    }
}
