//! State: keys, acknowledged values and change notifications.
//!
//! The state store holds one [`State`] per [`StateKey`]. Every write carries
//! an **ack flag**: `false` marks a pending instruction (typically written by
//! a user or another integration), `true` marks a confirmed value written by
//! the owner of the key. Subscribers receive a [`ChangeEvent`] for every write
//! and for every deletion or expiry.

pub mod schema;
pub mod value;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::Timestamp;

pub use schema::{Access, StateSchema, ValueType};
pub use value::StateValue;

/// Identifier in the store's flat key namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    /// Externally writable key carrying the command token.
    pub const COMMAND: &'static str = "command";
    /// Body of the last device response.
    pub const RESPONSE: &'static str = "response";
    /// HTTP status of the last device response.
    pub const STATUS: &'static str = "status";

    /// Build a key, rejecting empty identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyKey`] when `key` is blank.
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ValidationError::EmptyKey);
        }
        Ok(Self(key))
    }

    #[must_use]
    pub fn command() -> Self {
        Self(Self::COMMAND.to_string())
    }

    #[must_use]
    pub fn response() -> Self {
        Self(Self::RESPONSE.to_string())
    }

    #[must_use]
    pub fn status() -> Self {
        Self(Self::STATUS.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key is selected by a subscription pattern.
    ///
    /// A pattern is either a literal key or a prefix followed by a single
    /// trailing `*` (`lights.*`, `*`).
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        match pattern.strip_suffix('*') {
            Some(prefix) => self.0.starts_with(prefix),
            None => self.0 == pattern,
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored value together with its ack flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub val: StateValue,
    /// `true` when the value reflects confirmed state, `false` for a pending
    /// instruction.
    pub ack: bool,
    /// When the value was written.
    pub ts: Timestamp,
    /// Seconds after which the value reverts to absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<u64>,
}

impl State {
    /// Materialise a write request at `ts`.
    #[must_use]
    pub fn from_update(update: StateUpdate, ts: Timestamp) -> Self {
        Self {
            val: update.val,
            ack: update.ack,
            ts,
            expire: update.expire,
        }
    }
}

/// A write request against the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StateUpdate {
    pub val: StateValue,
    pub ack: bool,
    pub expire: Option<u64>,
}

impl StateUpdate {
    /// Unacknowledged write: an instruction for the key's owner.
    pub fn command(val: impl Into<StateValue>) -> Self {
        Self {
            val: val.into(),
            ack: false,
            expire: None,
        }
    }

    /// Acknowledged write: confirmed state.
    pub fn ack(val: impl Into<StateValue>) -> Self {
        Self {
            val: val.into(),
            ack: true,
            expire: None,
        }
    }

    /// Let the value revert to absent after `seconds`.
    #[must_use]
    pub fn with_expire(mut self, seconds: u64) -> Self {
        self.expire = Some(seconds);
        self
    }
}

/// Notification delivered to subscribers of a key.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub key: StateKey,
    /// `None` when the value was deleted or has expired.
    pub state: Option<State>,
}

impl ChangeEvent {
    #[must_use]
    pub fn changed(key: StateKey, state: State) -> Self {
        Self {
            key,
            state: Some(state),
        }
    }

    #[must_use]
    pub fn deleted(key: StateKey) -> Self {
        Self { key, state: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    #[test]
    fn should_reject_empty_key() {
        assert_eq!(StateKey::new("  "), Err(ValidationError::EmptyKey));
    }

    #[test]
    fn should_expose_well_known_keys() {
        assert_eq!(StateKey::command().as_str(), "command");
        assert_eq!(StateKey::response().as_str(), "response");
        assert_eq!(StateKey::status().as_str(), "status");
    }

    #[test]
    fn should_match_literal_pattern_only_on_equality() {
        let key = StateKey::command();
        assert!(key.matches("command"));
        assert!(!key.matches("commands"));
        assert!(!key.matches("comm"));
    }

    #[test]
    fn should_match_prefix_pattern() {
        let key = StateKey::new("lights.kitchen").unwrap();
        assert!(key.matches("lights.*"));
        assert!(key.matches("*"));
        assert!(!key.matches("switches.*"));
    }

    #[test]
    fn should_build_unacknowledged_command_update() {
        let update = StateUpdate::command("reboot");
        assert!(!update.ack);
        assert_eq!(update.val, StateValue::from("reboot"));
        assert_eq!(update.expire, None);
    }

    #[test]
    fn should_carry_expiry_into_state() {
        let update = StateUpdate::ack(true).with_expire(30);
        let state = State::from_update(update, now());
        assert!(state.ack);
        assert_eq!(state.expire, Some(30));
    }

    #[test]
    fn should_build_deleted_event_without_state() {
        let event = ChangeEvent::deleted(StateKey::command());
        assert!(event.state.is_none());
    }
}
