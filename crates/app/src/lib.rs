//! # winctrl-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `StateStore`: declare, subscribe to, read and write state keys
//!   - `HttpClient`: issue one GET against the controlled device
//! - Define the **use-cases**:
//!   - `CommandRelay`: turn unacknowledged `command` writes into device
//!     requests and write the answer back as `response`/`status`
//!   - `state_setup`: declare the keys the relay owns
//! - Carry the explicit [`RelayContext`](context::RelayContext) instead of a
//!   process-wide host object
//!
//! ## Dependency rule
//! Depends on `winctrl-domain` only (plus `tokio` for tasks and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod context;
pub mod ports;
pub mod services;
