//! Handlers for the diagnostic routes.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::state::StatusState;

/// Body of `GET /status`.
#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
    pub uptime: f64,
    pub clientip: String,
}

/// JSON error body for unknown routes.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// `GET /status`: liveness plus the configured device host.
pub async fn status(State(state): State<StatusState>) -> Json<StatusBody> {
    Json(StatusBody {
        status: "ok",
        uptime: state.uptime_secs(),
        clientip: state.client_ip().to_string(),
    })
}

/// `GET /ping`.
pub async fn ping() -> &'static str {
    "pong"
}

/// Any other method or path.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "command not found",
        }),
    )
        .into_response()
}
