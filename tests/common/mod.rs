//! Shared utilities for integration tests.

#![allow(dead_code)]

mod keys;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use object_store::{memory::InMemory, path::Path as ObjectPath, Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::net::TcpListener;

use content_router::auth::{AuthError, Claims, IdentityProvider};
use content_router::config::AuthConfig;
use content_router::RouterConfig;

pub use keys::TEST_KID;

pub const TEST_PROJECT: &str = "demo-project";
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";

/// Identity provider with fixed answers.
///
/// - cookie `valid-cookie` verifies as `cookie-user`
/// - token `valid-token` verifies as `token-user`, mints `session-for-valid-token`
/// - token `mint-fails` verifies, but minting fails
/// - token `unencodable` verifies, but mints a value no header can carry
/// - everything else is rejected
pub struct ScriptedProvider;

#[async_trait]
impl IdentityProvider for ScriptedProvider {
    async fn verify_session_cookie(&self, cookie: &str) -> Result<Claims, AuthError> {
        match cookie {
            "valid-cookie" => Ok(Claims::new("cookie-user")),
            _ => Err(AuthError::Invalid("session cookie".into())),
        }
    }

    async fn verify_id_token(&self, token: &str) -> Result<Claims, AuthError> {
        match token {
            "valid-token" | "mint-fails" | "unencodable" => Ok(Claims::new("token-user")),
            _ => Err(AuthError::Invalid("INVALID_ID_TOKEN".into())),
        }
    }

    async fn create_session_cookie(&self, token: &str, ttl: Duration) -> Result<String, AuthError> {
        assert_eq!(ttl, Duration::from_secs(1800));
        match token {
            "mint-fails" => Err(AuthError::Unavailable("mint unavailable".into())),
            "unencodable" => Ok("line\nbreak".to_string()),
            _ => Ok(format!("session-for-{token}")),
        }
    }
}

/// In-memory bucket holding `(key, body, content_type)` objects.
pub async fn store_with(objects: &[(&str, &'static [u8], Option<&'static str>)]) -> Arc<dyn ObjectStore> {
    let store = InMemory::new();
    for (key, body, content_type) in objects {
        let mut attributes = Attributes::new();
        if let Some(ct) = content_type {
            attributes.insert(Attribute::ContentType, (*ct).into());
        }
        store
            .put_opts(
                &ObjectPath::from(*key),
                PutPayload::from_static(*body),
                PutOptions {
                    attributes,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }
    Arc::new(store)
}

/// Config matching the `/app` → `/static` deployment.
pub fn test_config() -> RouterConfig {
    let mut config = RouterConfig::default();
    config.storage.bucket = "assets".into();
    config.storage.firebase_path = "/app".into();
    config.storage.gcs_path = "/static".into();
    config.auth.redirect_path = "/login".into();
    config
}

/// Helper to read response body as string.
pub async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Sign a session cookie with the test key.
pub fn sign_session_cookie(claims: Value, kid: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(keys::TEST_RSA_PRIVATE_PEM.as_bytes()).unwrap();
    encode(&header, &claims, &key).unwrap()
}

/// Standard claims for a session cookie issued to `uid` just now.
pub fn session_claims(uid: &str) -> Value {
    let now = now();
    json!({
        "iss": format!("https://session.firebase.google.com/{TEST_PROJECT}"),
        "aud": TEST_PROJECT,
        "sub": uid,
        "iat": now,
        "auth_time": now,
        "exp": now + 1800,
    })
}

/// Auth config pointing at a mock Identity Toolkit.
pub fn mock_auth_config(addr: SocketAddr) -> AuthConfig {
    AuthConfig {
        project_id: Some(TEST_PROJECT.to_string()),
        identity_toolkit_url: format!("http://{addr}"),
        access_token: Some(TEST_ACCESS_TOKEN.to_string()),
        ..AuthConfig::default()
    }
}

/// Start a mock Identity Toolkit on an ephemeral port.
///
/// Users: `user-1` (valid since 100), `revoked-user` (valid since far
/// future), `disabled-user`. ID token `good-token` belongs to `user-1`,
/// `disabled-token` to `disabled-user`.
pub async fn start_mock_identity_toolkit() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route("/v1/sessionCookiePublicKeys", get(public_keys))
        .route("/v1/projects/{project}/accounts:lookup", post(lookup))
        .route("/v1/projects/{project}", post(create_session_cookie));

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

async fn public_keys() -> Json<Value> {
    Json(json!({
        "keys": [{
            "kty": "RSA",
            "alg": "RS256",
            "use": "sig",
            "kid": keys::TEST_KID,
            "n": keys::TEST_RSA_N,
            "e": keys::TEST_RSA_E,
        }]
    }))
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {TEST_ACCESS_TOKEN}"))
        .unwrap_or(false)
}

fn api_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": { "code": 400, "message": message } })),
    )
        .into_response()
}

fn user(local_id: &str) -> Value {
    match local_id {
        "user-1" => json!({ "localId": "user-1", "validSince": "100" }),
        "revoked-user" => json!({ "localId": "revoked-user", "validSince": "99999999999" }),
        "disabled-user" => json!({ "localId": "disabled-user", "disabled": true }),
        _ => Value::Null,
    }
}

async fn lookup(Path(project): Path<String>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if project != TEST_PROJECT {
        return StatusCode::NOT_FOUND.into_response();
    }

    let local_id = match (body.get("idToken"), body.get("localId")) {
        (Some(Value::String(token)), _) => match token.as_str() {
            "good-token" => "user-1",
            "disabled-token" => "disabled-user",
            _ => return api_error("INVALID_ID_TOKEN"),
        },
        (_, Some(Value::Array(ids))) => ids.first().and_then(Value::as_str).unwrap_or_default(),
        _ => return api_error("MISSING_LOCAL_ID"),
    };

    match user(local_id) {
        Value::Null => Json(json!({ "kind": "identitytoolkit#GetAccountInfoResponse" })).into_response(),
        found => Json(json!({ "users": [found] })).into_response(),
    }
}

async fn create_session_cookie(
    Path(target): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if target != format!("{TEST_PROJECT}:createSessionCookie") {
        return StatusCode::NOT_FOUND.into_response();
    }
    if body["validDuration"] != "1800" {
        return api_error("INVALID_SESSION_COOKIE_DURATION");
    }
    match body["idToken"].as_str() {
        Some("good-token") => Json(json!({ "sessionCookie": "minted-cookie" })).into_response(),
        _ => api_error("INVALID_ID_TOKEN"),
    }
}
