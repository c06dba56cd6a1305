//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the content router.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener and request handling settings.
    pub server: ServerConfig,

    /// Object store location and path rewriting.
    pub storage: StorageConfig,

    /// Identity provider and auth policy.
    pub auth: AuthConfig,

    /// Response header policy for served content.
    pub content: ContentConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl RouterConfig {
    /// Plain-text dump served by `GET /config`.
    pub fn describe(&self) -> String {
        format!(
            "REDIRECT: {} ; GCSPATH: {} ; FIREBASEPATH: {} ; BUCKET {}",
            self.auth.redirect_path,
            self.storage.gcs_path,
            self.storage.firebase_path,
            self.storage.bucket,
        )
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,

    /// Listen port.
    pub port: u16,

    /// Whole-request timeout in seconds (0 = no timeout).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 0,
        }
    }
}

/// Object store configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Bucket holding the served objects. Required.
    pub bucket: String,

    /// Prefix of the requested path to rewrite.
    pub firebase_path: String,

    /// Replacement for every occurrence of `firebase_path`.
    pub gcs_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            firebase_path: "/".to_string(),
            gcs_path: "/".to_string(),
        }
    }
}

/// How a rejected `__session` cookie is answered.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionRejection {
    /// 303 See Other to the redirect path.
    #[default]
    Redirect,
    /// Bare 403 Forbidden.
    Forbidden,
}

/// Identity provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// Where unauthenticated callers are sent.
    pub redirect_path: String,

    /// Response to a session cookie that fails verification.
    pub session_rejection: SessionRejection,

    /// Firebase project the tokens are issued for.
    pub project_id: Option<String>,

    /// Identity Toolkit API base URL.
    pub identity_toolkit_url: String,

    /// JWKS endpoint for session cookie signing keys.
    /// Derived from `identity_toolkit_url` when unset.
    pub session_keys_url: Option<String>,

    /// Static OAuth2 access token for admin calls.
    /// When unset, tokens are fetched from the metadata server.
    pub access_token: Option<String>,

    /// Metadata server token endpoint.
    pub metadata_url: String,
}

impl AuthConfig {
    pub fn session_keys_url(&self) -> String {
        match &self.session_keys_url {
            Some(url) => url.clone(),
            None => format!(
                "{}/v1/sessionCookiePublicKeys",
                self.identity_toolkit_url.trim_end_matches('/')
            ),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            redirect_path: "/".to_string(),
            session_rejection: SessionRejection::default(),
            project_id: None,
            identity_toolkit_url: "https://identitytoolkit.googleapis.com".to_string(),
            session_keys_url: None,
            access_token: None,
            metadata_url: "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token".to_string(),
        }
    }
}

/// Where the served `content-type` comes from.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
pub enum ContentTypeSource {
    /// Use the object's stored metadata.
    #[default]
    #[serde(rename = "metadata")]
    FromObjectMetadata,
    /// Always `text/html`.
    #[serde(rename = "html")]
    FixedHtml,
}

/// Whether `Cache-Control` is set on served content.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheControlMode {
    #[default]
    Enabled,
    Disabled,
}

/// Response header policy for served content.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ContentConfig {
    pub content_type_source: ContentTypeSource,

    pub cache_control: CacheControlMode,

    /// Browser and CDN max-age in seconds.
    pub max_age_secs: u32,

    /// CDN-only s-maxage in seconds.
    pub s_maxage_secs: u32,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            content_type_source: ContentTypeSource::default(),
            cache_control: CacheControlMode::default(),
            max_age_secs: 300,
            s_maxage_secs: 600,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Prometheus endpoint bind address; metrics are off when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            metrics_address: None,
        }
    }
}
