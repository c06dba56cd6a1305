//! Identity provider seam.
//!
//! The router never verifies credentials itself; every check is delegated
//! to an [`IdentityProvider`]. Production uses [`crate::auth::FirebaseAuth`].

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Identity established by a verified credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Provider user id.
    pub uid: String,
    /// When the user signed in (seconds since epoch), if the credential says.
    pub auth_time: Option<i64>,
}

impl Claims {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            auth_time: None,
        }
    }
}

/// Errors that can occur while talking to the identity provider.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credential is malformed, expired, or unknown to the provider.
    #[error("invalid credential: {0}")]
    Invalid(String),

    /// Credential was issued before the user's sessions were revoked.
    #[error("credential revoked")]
    Revoked,

    /// The user account is disabled.
    #[error("user disabled")]
    Disabled,

    /// A required provider setting is missing.
    #[error("identity provider not configured: {0}")]
    NotConfigured(&'static str),

    /// Network or provider-side failure.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

impl AuthError {
    /// Coarse reason safe to show to clients.
    pub fn public_reason(&self) -> &'static str {
        match self {
            AuthError::Invalid(_) => "invalid token",
            AuthError::Revoked => "token revoked",
            AuthError::Disabled => "user disabled",
            AuthError::NotConfigured(_) | AuthError::Unavailable(_) => {
                "identity provider unavailable"
            }
        }
    }
}

/// Operations the router consumes from the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a session cookie, including the revocation check.
    async fn verify_session_cookie(&self, cookie: &str) -> Result<Claims, AuthError>;

    /// Verify a bearer ID token.
    async fn verify_id_token(&self, token: &str) -> Result<Claims, AuthError>;

    /// Exchange a verified ID token for a session cookie valid for `ttl`.
    async fn create_session_cookie(&self, token: &str, ttl: Duration) -> Result<String, AuthError>;
}
