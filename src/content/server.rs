//! Object fetch and response writing.
//!
//! # Responsibilities
//! - Read an object and its content type from the store
//! - Apply the configured header policy (cache control, content type)
//! - Answer fetch failures with the plain-text "couldn't find" body
//!
//! # Design Decisions
//! - Fetch failures are answered with 200, never 404; existing clients
//!   depend on this
//! - Any store error (missing object, auth, network) gets the same answer

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use object_store::{path::Path as ObjectPath, Attribute, ObjectStore};
use std::sync::Arc;
use thiserror::Error;

use crate::config::{CacheControlMode, ContentConfig, ContentTypeSource};
use crate::observability::metrics;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// An object read from the store.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Bytes,
    /// Content type from the object's metadata, if any.
    pub content_type: Option<String>,
}

/// Errors that can occur while reading content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("object {key} not found")]
    NotFound { key: String },

    #[error("object store error: {0}")]
    Store(#[from] object_store::Error),
}

/// Header policy for served objects.
#[derive(Debug, Clone)]
pub struct ResponsePolicy {
    pub content_type: ContentTypeSource,
    /// Full `Cache-Control` value, or `None` to omit the header.
    pub cache_control: Option<HeaderValue>,
}

impl From<&ContentConfig> for ResponsePolicy {
    fn from(config: &ContentConfig) -> Self {
        let cache_control = match config.cache_control {
            CacheControlMode::Enabled => HeaderValue::from_str(&format!(
                "public, max-age={}, s-maxage={}",
                config.max_age_secs, config.s_maxage_secs
            ))
            .ok(),
            CacheControlMode::Disabled => None,
        };
        Self {
            content_type: config.content_type_source,
            cache_control,
        }
    }
}

/// Serves bucket objects under a header policy.
#[derive(Clone)]
pub struct ContentServer {
    store: Arc<dyn ObjectStore>,
    policy: ResponsePolicy,
}

impl ContentServer {
    pub fn new(store: Arc<dyn ObjectStore>, policy: ResponsePolicy) -> Self {
        Self { store, policy }
    }

    /// Read the object stored at `key`.
    ///
    /// Leading and repeated `/` in the key are not part of the object name.
    pub async fn fetch(&self, key: &str) -> Result<StoredObject, ContentError> {
        let location = ObjectPath::from(key);
        let result = self.store.get(&location).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => ContentError::NotFound {
                key: location.to_string(),
            },
            other => ContentError::Store(other),
        })?;

        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| value.to_string());
        let bytes = result.bytes().await?;

        Ok(StoredObject {
            bytes,
            content_type,
        })
    }

    /// Fetch `key` and write it as the response for `route`.
    pub async fn serve(&self, route: &str, key: &str) -> Response {
        match self.fetch(key).await {
            Ok(object) => {
                metrics::record_object_bytes(object.bytes.len());
                self.found(object)
            }
            Err(e) => {
                tracing::warn!(route = %route, key = %key, error = %e, "Object retrieval failed");
                not_found(route)
            }
        }
    }

    fn found(&self, object: StoredObject) -> Response {
        let content_type = match self.policy.content_type {
            ContentTypeSource::FromObjectMetadata => object
                .content_type
                .as_deref()
                .and_then(|ct| HeaderValue::from_str(ct).ok())
                .unwrap_or_else(|| HeaderValue::from_static(FALLBACK_CONTENT_TYPE)),
            ContentTypeSource::FixedHtml => HeaderValue::from_static("text/html"),
        };

        let mut response = Response::new(Body::from(object.bytes));
        let headers = response.headers_mut();
        if let Some(cache_control) = &self.policy.cache_control {
            headers.insert(header::CACHE_CONTROL, cache_control.clone());
        }
        headers.insert(header::CONTENT_TYPE, content_type);
        response
    }
}

/// The compatibility answer for unreadable objects.
pub fn not_found(route: &str) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain")],
        format!("couldn't find {route}\n"),
    )
        .into_response()
}
