//! Request handlers.

use axum::{
    extract::{rejection::PathRejection, Path, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use std::time::Instant;

use crate::auth::session::session_set_cookie;
use crate::auth::{AuthFailure, AuthOutcome, Credentials};
use crate::config::SessionRejection;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{clean_path, is_valid_route};

/// `GET /config`: plain-text dump of the routing configuration. No auth.
pub async fn config_handler(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain")],
        state.config.describe(),
    )
        .into_response()
}

/// `GET /{route}`: authenticate, rewrite, and serve from the bucket.
///
/// Routes with `.`/`..` segments or repeated slashes are answered with a
/// 301 to their cleaned form, query preserved.
pub async fn content_handler(
    State(state): State<AppState>,
    route: Result<Path<String>, PathRejection>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();

    let route = match route {
        Ok(Path(route)) if is_valid_route(&route) => route,
        _ => {
            let response = not_found().await;
            metrics::record_request("no_route", response.status().as_u16(), start);
            return response;
        }
    };

    let requested = format!("/{route}");
    let cleaned = clean_path(&requested);
    if cleaned != requested {
        let location = match query.as_deref() {
            Some(query) => format!("{cleaned}?{query}"),
            None => cleaned,
        };
        tracing::debug!(route = %route, location = %location, "Redirecting to cleaned path");
        let response = (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response();
        metrics::record_request("cleaned", response.status().as_u16(), start);
        return response;
    }

    let key = state.rewriter.rewrite(&requested);
    tracing::debug!(route = %route, key = %key, "Content requested");

    let credentials = Credentials::from_request(&headers, query.as_deref());
    let (outcome, response) = match state.auth.authenticate(&credentials).await {
        Ok(AuthOutcome::Unauthenticated) => ("unauthenticated", redirect(&state)),
        Ok(AuthOutcome::AuthenticatedViaCookie(_)) => {
            ("served", state.content.serve(&route, &key).await)
        }
        Ok(AuthOutcome::AuthenticatedViaToken { session_cookie, .. }) => {
            let mut response = state.content.serve(&route, &key).await;
            if let Some(cookie) = session_cookie.as_deref() {
                match session_set_cookie(cookie) {
                    Some(value) => {
                        response.headers_mut().append(header::SET_COOKIE, value);
                    }
                    None => {
                        tracing::error!(route = %route, "Unable to encode session cookie header");
                    }
                }
            }
            ("served", response)
        }
        Err(AuthFailure::SessionRejected(_)) => {
            let response = match state.config.auth.session_rejection {
                SessionRejection::Redirect => redirect(&state),
                SessionRejection::Forbidden => StatusCode::FORBIDDEN.into_response(),
            };
            ("session_rejected", response)
        }
        Err(AuthFailure::TokenRejected(e)) => (
            "token_rejected",
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                format!("this was a problem: {}\n", e.public_reason()),
            )
                .into_response(),
        ),
    };

    metrics::record_request(outcome, response.status().as_u16(), start);
    response
}

/// HEAD on a routed path. Only GET is served.
pub async fn head_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, "GET")]).into_response()
}

/// Fallback for paths outside the route pattern.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "404 page not found\n",
    )
        .into_response()
}

fn redirect(state: &AppState) -> Response {
    Redirect::to(&state.config.auth.redirect_path).into_response()
}
