//! Axum router assembly.

use axum::Router;
use axum::http::{HeaderValue, header};
use axum::routing::get;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{not_found, ping, status};
use crate::state::StatusState;

/// Build the status [`Router`].
///
/// Only `GET` reaches the two routes; `HEAD`, other methods and other paths
/// all fall through to the 404 handler. Every response is labelled
/// `application/json`, the plain-text `pong` included.
pub fn build(state: StatusState) -> Router {
    Router::new()
        .route(
            "/status",
            get(status).head(not_found).fallback(not_found),
        )
        .route("/ping", get(ping).head(not_found).fallback(not_found))
        .fallback(not_found)
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
