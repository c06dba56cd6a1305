//! Per-request authentication decision.
//!
//! # Decision Order
//! ```text
//! __session cookie present?
//!     yes → verify (with revocation) → AuthenticatedViaCookie | SessionRejected
//!     no  → token query param present?
//!             no  → Unauthenticated
//!             yes → verify → mint session cookie (best effort)
//!                          → AuthenticatedViaToken | TokenRejected
//! ```
//!
//! # Design Decisions
//! - Every rejection is terminal; nothing is served after a failed check
//! - A cookie, once presented, is authoritative: a token is not consulted
//! - Cookie minting failures never fail the request

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::auth::provider::{AuthError, Claims, IdentityProvider};
use crate::auth::session::{Credentials, SESSION_TTL};
use crate::observability::metrics;

/// Result of a successful authentication check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// No credentials were presented.
    Unauthenticated,
    /// A valid `__session` cookie was presented.
    AuthenticatedViaCookie(Claims),
    /// A valid bearer token was presented.
    AuthenticatedViaToken {
        claims: Claims,
        /// Newly minted session cookie, if minting succeeded.
        session_cookie: Option<String>,
    },
}

/// A presented credential failed verification.
#[derive(Debug, Error)]
pub enum AuthFailure {
    #[error("session cookie rejected: {0}")]
    SessionRejected(AuthError),

    #[error("token rejected: {0}")]
    TokenRejected(AuthError),
}

/// Applies the cookie-then-token policy against an identity provider.
#[derive(Clone)]
pub struct Authenticator {
    provider: Arc<dyn IdentityProvider>,
    session_ttl: Duration,
}

impl Authenticator {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            session_ttl: SESSION_TTL,
        }
    }

    /// Decide whether the presented credentials authenticate the caller.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AuthOutcome, AuthFailure> {
        if let Some(cookie) = credentials.session_cookie.as_deref() {
            return match self.provider.verify_session_cookie(cookie).await {
                Ok(claims) => {
                    metrics::record_auth("cookie", "ok");
                    tracing::debug!(uid = %claims.uid, "Session cookie verified");
                    Ok(AuthOutcome::AuthenticatedViaCookie(claims))
                }
                Err(e) => {
                    metrics::record_auth("cookie", "rejected");
                    tracing::warn!(error = %e, "Session cookie unable to be verified");
                    Err(AuthFailure::SessionRejected(e))
                }
            };
        }

        let Some(token) = credentials.token.as_deref() else {
            metrics::record_auth("none", "unauthenticated");
            return Ok(AuthOutcome::Unauthenticated);
        };

        let claims = match self.provider.verify_id_token(token).await {
            Ok(claims) => claims,
            Err(e) => {
                metrics::record_auth("token", "rejected");
                tracing::warn!(error = %e, "Invalid token");
                return Err(AuthFailure::TokenRejected(e));
            }
        };
        metrics::record_auth("token", "ok");
        tracing::debug!(uid = %claims.uid, "Token verified");

        let session_cookie = match self.provider.create_session_cookie(token, self.session_ttl).await {
            Ok(cookie) => Some(cookie),
            Err(e) => {
                tracing::error!(error = %e, uid = %claims.uid, "Unable to create session cookie");
                None
            }
        };

        Ok(AuthOutcome::AuthenticatedViaToken {
            claims,
            session_cookie,
        })
    }
}
