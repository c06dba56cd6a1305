//! Content subsystem.
//!
//! # Data Flow
//! ```text
//! storage key
//!     → store.rs (bucket handle, opened once at startup)
//!     → server.rs (read bytes + content type)
//!     → server.rs (apply header policy)
//!     → Response
//! ```

pub mod server;
pub mod store;

pub use server::{not_found, ContentError, ContentServer, ResponsePolicy, StoredObject};
pub use store::open_bucket;
