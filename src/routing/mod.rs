//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → rewrite.rs (route pattern check, dot-segment cleaning)
//!     → rewrite.rs (public prefix → bucket prefix)
//!     → Return: storage key
//! ```
//!
//! # Design Decisions
//! - Rewriter built at startup, immutable at runtime
//! - Deterministic: same input always maps to the same key

pub mod rewrite;

pub use rewrite::{clean_path, is_valid_route, rewrite, PathRewriter};
