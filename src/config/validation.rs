//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Required values present (bucket)
//! - Value ranges consistent with the selected content policy
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{CacheControlMode, RouterConfig};

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("BUCKET not set")]
    MissingBucket,

    #[error("redirect path must not be empty")]
    EmptyRedirectPath,

    #[error("{field} must be greater than zero when cache control is enabled")]
    ZeroCacheAge { field: &'static str },
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.storage.bucket.trim().is_empty() {
        errors.push(ValidationError::MissingBucket);
    }
    if config.auth.redirect_path.is_empty() {
        errors.push(ValidationError::EmptyRedirectPath);
    }
    if config.content.cache_control == CacheControlMode::Enabled {
        if config.content.max_age_secs == 0 {
            errors.push(ValidationError::ZeroCacheAge { field: "max_age_secs" });
        }
        if config.content.s_maxage_secs == 0 {
            errors.push(ValidationError::ZeroCacheAge { field: "s_maxage_secs" });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
