//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, optional timeout)
//! - Bind server to listener and serve until shutdown

use axum::{routing::get, Router};
use object_store::ObjectStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::{Authenticator, IdentityProvider};
use crate::config::RouterConfig;
use crate::content::{ContentServer, ResponsePolicy};
use crate::http::handlers::{config_handler, content_handler, head_not_allowed, not_found};
use crate::lifecycle::ShutdownSignal;
use crate::routing::PathRewriter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RouterConfig>,
    pub rewriter: PathRewriter,
    pub auth: Authenticator,
    pub content: ContentServer,
}

impl AppState {
    pub fn new(
        config: RouterConfig,
        store: Arc<dyn ObjectStore>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            rewriter: PathRewriter::new(
                config.storage.firebase_path.clone(),
                config.storage.gcs_path.clone(),
            ),
            auth: Authenticator::new(provider),
            content: ContentServer::new(store, ResponsePolicy::from(&config.content)),
            config: Arc::new(config),
        }
    }
}

/// HTTP server for the content router.
pub struct HttpServer {
    router: Router,
    config: Arc<RouterConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and clients.
    pub fn new(
        config: RouterConfig,
        store: Arc<dyn ObjectStore>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        let state = AppState::new(config, store, provider);
        let config = state.config.clone();
        let router = build_router(state);
        Self { router, config }
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState) -> Router {
    let timeout = state.config.server.request_timeout();

    let mut router = Router::new()
        .route("/config", get(config_handler).head(head_not_allowed))
        .route("/{*route}", get(content_handler).head(head_not_allowed))
        .fallback(not_found)
        .with_state(state);

    if let Some(timeout) = timeout {
        router = router.layer(TimeoutLayer::new(timeout));
    }

    router
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
