//! Requested path to storage key translation.
//!
//! # Responsibilities
//! - Rewrite the public path prefix into the bucket prefix
//! - Decide whether a requested route is servable at all
//!
//! # Design Decisions
//! - Replacement is global and non-anchored: every non-overlapping
//!   occurrence of the public prefix is rewritten, not just a leading one
//! - No regex to guarantee O(n) matching

/// Rewrites requested paths into storage keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRewriter {
    from: String,
    to: String,
}

impl PathRewriter {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Translate a requested path into a storage key.
    pub fn rewrite(&self, requested_path: &str) -> String {
        rewrite(requested_path, &self.from, &self.to)
    }
}

/// Replace every non-overlapping occurrence of `from` in `path` with `to`.
///
/// An empty `from` leaves the path unchanged.
pub fn rewrite(path: &str, from: &str, to: &str) -> String {
    if from.is_empty() {
        return path.to_string();
    }
    path.replace(from, to)
}

/// True when `route` is non-empty and only contains `[a-zA-Z0-9.=\-/]`.
pub fn is_valid_route(route: &str) -> bool {
    !route.is_empty()
        && route
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'=' | b'-' | b'/'))
}

/// Lexically clean a rooted path: collapse repeated `/`, drop `.` segments
/// and resolve `..` against the preceding segment. `..` at the root stays at
/// the root. A trailing `/` survives unless the result is `/` itself.
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    let mut cleaned = format!("/{}", segments.join("/"));
    if path.ends_with('/') && cleaned != "/" {
        cleaned.push('/');
    }
    cleaned
}
