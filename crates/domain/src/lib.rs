//! # winctrl-domain
//!
//! Pure domain model for the winctrl command relay.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **state keys** (`command`, `response`, `status`) and their schemas
//! - Define **state values** (string, number, boolean, null) with the ack flag
//!   and optional expiry
//! - Define **change events** delivered by the state store
//! - Define the **relay request/result** pair: how a command token becomes a
//!   device URL and how a device response becomes a `response`/`status` pair
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod relay;
pub mod state;
