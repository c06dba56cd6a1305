//! OAuth2 access tokens for identity provider admin calls.

use serde::Deserialize;

use crate::auth::provider::AuthError;

/// Where admin access tokens come from.
#[derive(Debug, Clone)]
pub enum AccessTokenSource {
    /// A fixed token, e.g. from `GOOGLE_OAUTH_ACCESS_TOKEN`.
    Static(String),
    /// The instance metadata server of the runtime environment.
    Metadata { url: String },
}

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
}

impl AccessTokenSource {
    /// Fetch a token. Metadata tokens are requested on every call.
    pub async fn token(&self, http: &reqwest::Client) -> Result<String, AuthError> {
        match self {
            AccessTokenSource::Static(token) => Ok(token.clone()),
            AccessTokenSource::Metadata { url } => {
                let response = http
                    .get(url)
                    .header("Metadata-Flavor", "Google")
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(|e| AuthError::Unavailable(format!("metadata token: {e}")))?;
                let token: MetadataToken = response
                    .json()
                    .await
                    .map_err(|e| AuthError::Unavailable(format!("metadata token: {e}")))?;
                Ok(token.access_token)
            }
        }
    }
}
