//! Authenticated content router.
//!
//! Verifies a Firebase session cookie or bearer token, rewrites the
//! requested path into a storage key, and proxies the object from a
//! Cloud Storage bucket.

pub mod auth;
pub mod config;
pub mod content;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
