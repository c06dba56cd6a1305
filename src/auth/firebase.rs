//! Firebase Authentication over the Identity Toolkit REST API.
//!
//! # Responsibilities
//! - Verify bearer ID tokens (`accounts:lookup`)
//! - Mint session cookies (`:createSessionCookie`)
//! - Verify session cookies (RS256 JWT against the published JWKS,
//!   then a user lookup for the revocation check)
//!
//! # Design Decisions
//! - One shared `reqwest::Client` for the process lifetime
//! - Signing keys and access tokens are fetched per call, nothing is cached
//! - A missing project id is reported per request, not at startup

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::auth::provider::{AuthError, Claims, IdentityProvider};
use crate::auth::token_source::AccessTokenSource;
use crate::config::AuthConfig;

const SESSION_ISSUER_PREFIX: &str = "https://session.firebase.google.com/";

/// Firebase Authentication client.
#[derive(Debug, Clone)]
pub struct FirebaseAuth {
    http: reqwest::Client,
    project_id: Option<String>,
    base_url: String,
    keys_url: String,
    tokens: AccessTokenSource,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<UserRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    local_id: String,
    #[serde(default)]
    disabled: bool,
    /// Seconds since epoch, as a decimal string.
    #[serde(default)]
    valid_since: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionCookieResponse {
    session_cookie: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Deserialize)]
struct SessionClaims {
    sub: String,
    #[serde(default)]
    auth_time: Option<i64>,
}

impl FirebaseAuth {
    /// Build a client from the auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AuthError::Unavailable(format!("http client: {e}")))?;

        let tokens = match &config.access_token {
            Some(token) => AccessTokenSource::Static(token.clone()),
            None => AccessTokenSource::Metadata {
                url: config.metadata_url.clone(),
            },
        };

        if config.project_id.is_none() {
            tracing::warn!("No Firebase project id configured; credential checks will fail");
        }

        Ok(Self {
            http,
            project_id: config.project_id.clone(),
            base_url: config.identity_toolkit_url.trim_end_matches('/').to_string(),
            keys_url: config.session_keys_url(),
            tokens,
        })
    }

    fn project(&self) -> Result<&str, AuthError> {
        self.project_id
            .as_deref()
            .ok_or(AuthError::NotConfigured("project id"))
    }

    /// POST an authorized admin request and decode the JSON reply.
    async fn admin_call<T>(&self, url: &str, body: serde_json::Value) -> Result<T, AuthError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let access_token = self.tokens.token(&self.http).await?;
        let response = self
            .http
            .post(url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .map(|b| b.error.message)
                .unwrap_or_else(|_| "bad request".to_string());
            return Err(AuthError::Invalid(message));
        }
        if !status.is_success() {
            return Err(AuthError::Unavailable(format!("identity toolkit returned {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::Unavailable(format!("malformed response: {e}")))
    }

    /// Look up exactly one user by the given selector.
    async fn lookup(&self, selector: serde_json::Value) -> Result<UserRecord, AuthError> {
        let url = format!("{}/v1/projects/{}/accounts:lookup", self.base_url, self.project()?);
        let reply: LookupResponse = self.admin_call(&url, selector).await?;
        let user = reply
            .users
            .into_iter()
            .next()
            .ok_or_else(|| AuthError::Invalid("no user for credential".to_string()))?;
        if user.disabled {
            return Err(AuthError::Disabled);
        }
        Ok(user)
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let jwks: JwkSet = self
            .http
            .get(&self.keys_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AuthError::Unavailable(format!("session keys: {e}")))?
            .json()
            .await
            .map_err(|e| AuthError::Unavailable(format!("session keys: {e}")))?;

        let jwk = jwks
            .find(kid)
            .ok_or_else(|| AuthError::Invalid(format!("unknown key id {kid}")))?;
        DecodingKey::from_jwk(jwk).map_err(|e| AuthError::Invalid(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    async fn verify_session_cookie(&self, cookie: &str) -> Result<Claims, AuthError> {
        let project = self.project()?;

        let header = decode_header(cookie).map_err(|e| AuthError::Invalid(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::Invalid("missing key id".to_string()))?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[project]);
        validation.set_issuer(&[format!("{SESSION_ISSUER_PREFIX}{project}")]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);

        let data = decode::<SessionClaims>(cookie, &key, &validation)
            .map_err(|e| AuthError::Invalid(e.to_string()))?;
        let claims = data.claims;
        if claims.sub.is_empty() {
            return Err(AuthError::Invalid("empty subject".to_string()));
        }

        let user = self.lookup(json!({ "localId": [claims.sub] })).await?;
        let valid_since = user.valid_since.as_deref().and_then(|v| v.parse::<i64>().ok());
        // A cookie without auth_time predates every revocation.
        if let Some(valid_since) = valid_since {
            if claims.auth_time.unwrap_or(0) < valid_since {
                return Err(AuthError::Revoked);
            }
        }

        Ok(Claims {
            uid: user.local_id,
            auth_time: claims.auth_time,
        })
    }

    async fn verify_id_token(&self, token: &str) -> Result<Claims, AuthError> {
        let user = self.lookup(json!({ "idToken": token })).await?;
        Ok(Claims::new(user.local_id))
    }

    async fn create_session_cookie(&self, token: &str, ttl: Duration) -> Result<String, AuthError> {
        let url = format!("{}/v1/projects/{}:createSessionCookie", self.base_url, self.project()?);
        let reply: SessionCookieResponse = self
            .admin_call(
                &url,
                json!({ "idToken": token, "validDuration": ttl.as_secs().to_string() }),
            )
            .await?;
        Ok(reply.session_cookie)
    }
}
