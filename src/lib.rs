//! Bazaar Backend Library
//!
//! Exposes core modules for use by binaries and tests.

pub mod api;
pub mod auth;
pub mod db;
pub mod middleware;
pub mod models;
pub mod store;
pub mod validation;
