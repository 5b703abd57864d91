//! Authentication Module
//! Mission: Secure API access with JWT token pairs and stored sessions

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod session_store;
pub mod user_store;

pub use api::AuthState;
pub use jwt::JwtHandler;
pub use middleware::auth_middleware;
pub use session_store::SessionStore;
pub use user_store::UserStore;
