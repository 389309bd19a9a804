//! State store port: the narrow boundary the relay reads and writes through.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;

use winctrl_domain::error::WinCtrlError;
use winctrl_domain::state::{ChangeEvent, State, StateKey, StateSchema, StateUpdate};

/// Stream of change notifications for one subscription.
///
/// Unbounded: the store never blocks a writer on a slow subscriber.
pub type ChangeStream = mpsc::UnboundedReceiver<ChangeEvent>;

/// Key-value store with acknowledged writes and change notifications.
pub trait StateStore {
    /// Declare a key if it does not exist yet.
    ///
    /// Returns `true` when the key was created, `false` when it already
    /// existed (the existing schema is left untouched).
    fn ensure_state(
        &self,
        key: &StateKey,
        schema: StateSchema,
    ) -> impl Future<Output = Result<bool, WinCtrlError>> + Send;

    /// Register interest in every key matching `pattern` (a literal key or a
    /// prefix ending in `*`).
    fn subscribe(
        &self,
        pattern: &str,
    ) -> impl Future<Output = Result<ChangeStream, WinCtrlError>> + Send;

    /// Write a value. Every write notifies matching subscribers, even when
    /// the value is unchanged.
    fn set_state(
        &self,
        key: &StateKey,
        update: StateUpdate,
    ) -> impl Future<Output = Result<State, WinCtrlError>> + Send;

    /// Read the current value, `None` when unset, deleted or expired.
    fn get_state(
        &self,
        key: &StateKey,
    ) -> impl Future<Output = Result<Option<State>, WinCtrlError>> + Send;
}

impl<T: StateStore + Send + Sync> StateStore for Arc<T> {
    fn ensure_state(
        &self,
        key: &StateKey,
        schema: StateSchema,
    ) -> impl Future<Output = Result<bool, WinCtrlError>> + Send {
        (**self).ensure_state(key, schema)
    }

    fn subscribe(
        &self,
        pattern: &str,
    ) -> impl Future<Output = Result<ChangeStream, WinCtrlError>> + Send {
        (**self).subscribe(pattern)
    }

    fn set_state(
        &self,
        key: &StateKey,
        update: StateUpdate,
    ) -> impl Future<Output = Result<State, WinCtrlError>> + Send {
        (**self).set_state(key, update)
    }

    fn get_state(
        &self,
        key: &StateKey,
    ) -> impl Future<Output = Result<Option<State>, WinCtrlError>> + Send {
        (**self).get_state(key)
    }
}
