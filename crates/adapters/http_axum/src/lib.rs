//! # winctrl-adapter-http-axum
//!
//! Status server built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve two read-only diagnostic routes: `GET /status` and `GET /ping`
//! - Answer everything else with `404 {"error":"command not found"}`
//! - Stamp every response with `Content-Type: application/json` (including
//!   the plain `pong`) and `Access-Control-Allow-Origin: *`
//! - Own the listener lifecycle: bind, serve in the background, close on
//!   unload
//!
//! ## Dependency rule
//! Depends on `winctrl-domain` for the device endpoint it reports. Shares no
//! mutable state with the relay.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use error::StatusServerError;
pub use server::{DEFAULT_CLOSE_GRACE, RunningStatusServer, StatusServer};
pub use state::StatusState;
