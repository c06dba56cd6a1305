//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → handlers.rs (GET /config, GET /{route})
//!     → [auth decides: redirect, error, or serve]
//!     → [content server writes object bytes]
//!     → Send to client
//! ```

pub mod handlers;
pub mod server;

pub use server::{build_router, AppState, HttpServer};
