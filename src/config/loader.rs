//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::{
    CacheControlMode, ContentTypeSource, LogFormat, RouterConfig, SessionRejection,
};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration.
///
/// Defaults are overlaid by the optional TOML file, then by environment
/// variables. Empty environment values count as unset.
pub fn load_config(path: Option<&Path>) -> Result<RouterConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => RouterConfig::default(),
    };

    let config = apply_env(config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts the environment so callers can supply their own.
pub fn apply_env<F>(mut config: RouterConfig, lookup: F) -> Result<RouterConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(port) = get("PORT") {
        config.server.port = parse_var("PORT", port)?;
    }
    if let Some(bucket) = get("BUCKET") {
        config.storage.bucket = bucket;
    }
    if let Some(path) = get("FIREBASEPATH") {
        config.storage.firebase_path = path;
    }
    if let Some(path) = get("GCSPATH") {
        config.storage.gcs_path = path;
    }
    if let Some(path) = get("REDIRECTPATH") {
        config.auth.redirect_path = path;
    }

    if let Some(source) = get("CONTENT_TYPE_SOURCE") {
        config.content.content_type_source = match source.as_str() {
            "metadata" => ContentTypeSource::FromObjectMetadata,
            "html" => ContentTypeSource::FixedHtml,
            _ => return Err(invalid("CONTENT_TYPE_SOURCE", source)),
        };
    }
    if let Some(mode) = get("CACHE_CONTROL") {
        config.content.cache_control = match mode.as_str() {
            "enabled" => CacheControlMode::Enabled,
            "disabled" => CacheControlMode::Disabled,
            _ => return Err(invalid("CACHE_CONTROL", mode)),
        };
    }
    if let Some(mode) = get("SESSION_REJECTION") {
        config.auth.session_rejection = match mode.as_str() {
            "redirect" => SessionRejection::Redirect,
            "forbidden" => SessionRejection::Forbidden,
            _ => return Err(invalid("SESSION_REJECTION", mode)),
        };
    }

    if let Some(project) = get("FIREBASE_PROJECT_ID").or_else(|| get("GOOGLE_CLOUD_PROJECT")) {
        config.auth.project_id = Some(project);
    }
    if let Some(url) = get("IDENTITY_TOOLKIT_URL") {
        config.auth.identity_toolkit_url = url;
    }
    if let Some(token) = get("GOOGLE_OAUTH_ACCESS_TOKEN") {
        config.auth.access_token = Some(token);
    }

    if let Some(level) = get("RUST_LOG") {
        config.observability.log_level = level;
    }
    if let Some(format) = get("LOG_FORMAT") {
        config.observability.log_format = match format.as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => return Err(invalid("LOG_FORMAT", format)),
        };
    }
    if let Some(addr) = get("METRICS_ADDRESS") {
        config.observability.metrics_address = Some(addr);
    }

    Ok(config)
}

fn parse_var<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| invalid(var, value))
}

fn invalid(var: &'static str, value: String) -> ConfigError {
    ConfigError::InvalidEnv { var, value }
}
