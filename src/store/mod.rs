//! Resource Storage
//! Mission: SQL-backed CRUD for products, posts, and comments

pub mod comments;
pub mod posts;
pub mod products;

pub use comments::CommentStore;
pub use posts::PostStore;
pub use products::ProductStore;

/// Whitelisted product sort columns; anything else falls back to name
pub(crate) fn sort_column(by: &str) -> &'static str {
    match by {
        "price" => "price",
        "created_at" => "created_at",
        "updated_at" => "updated_at",
        _ => "name",
    }
}

/// Whitelisted sort directions; anything else falls back to ASC
pub(crate) fn sort_direction(order: &str) -> &'static str {
    if order.eq_ignore_ascii_case("desc") {
        "DESC"
    } else {
        "ASC"
    }
}
