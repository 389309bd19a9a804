//! # winctrl-adapter-state-memory
//!
//! In-process implementation of the `StateStore` port.
//!
//! ## Responsibilities
//! - Hold declared keys with their schema and current value
//! - Deliver a `ChangeEvent` to every matching subscriber on each write,
//!   deletion or expiry
//! - Expire values written with an `expire` delay
//! - Warn (but still write) when a value does not fit its declared schema
//!
//! Nothing is persisted: the store lives as long as the process.
//!
//! ## Dependency rule
//! Depends on `winctrl-app` (for the port trait) and `winctrl-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::InMemoryStateStore;
