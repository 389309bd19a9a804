//! In-memory implementation of [`StateStore`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};

use winctrl_app::ports::{ChangeStream, StateStore};
use winctrl_domain::error::WinCtrlError;
use winctrl_domain::state::{ChangeEvent, State, StateKey, StateSchema, StateUpdate};
use winctrl_domain::time::now;

use crate::error::StoreError;

/// Process-local state store.
///
/// Cheap to clone; clones share the same keys and subscribers.
#[derive(Clone, Default)]
pub struct InMemoryStateStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    slots: HashMap<StateKey, Slot>,
    subscribers: Vec<Subscriber>,
}

struct Slot {
    schema: StateSchema,
    state: Option<State>,
    /// Bumped on every write so a pending expiry can tell it was superseded.
    generation: u64,
}

struct Subscriber {
    pattern: String,
    tx: mpsc::UnboundedSender<ChangeEvent>,
}

impl Inner {
    /// Deliver `event` to every matching subscriber, dropping closed ones.
    fn notify(&mut self, event: &ChangeEvent) {
        self.subscribers.retain(|sub| {
            if !event.key.matches(&sub.pattern) {
                return !sub.tx.is_closed();
            }
            sub.tx.send(event.clone()).is_ok()
        });
    }
}

impl InMemoryStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the current value of `key` and notify subscribers with an
    /// absent value. The declaration itself is kept.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownKey`] if `key` was never declared.
    pub async fn delete_state(&self, key: &StateKey) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let slot = inner
            .slots
            .get_mut(key)
            .ok_or_else(|| StoreError::UnknownKey(key.clone()))?;
        slot.state = None;
        slot.generation += 1;
        inner.notify(&ChangeEvent::deleted(key.clone()));
        Ok(())
    }

    /// Schema a key was declared with.
    pub async fn schema(&self, key: &StateKey) -> Option<StateSchema> {
        let inner = self.inner.lock().await;
        inner.slots.get(key).map(|slot| slot.schema.clone())
    }

    fn schedule_expiry(&self, key: StateKey, generation: u64, seconds: u64) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            let mut inner = inner.lock().await;
            let Some(slot) = inner.slots.get_mut(&key) else {
                return;
            };
            if slot.generation != generation {
                return;
            }
            slot.state = None;
            tracing::debug!(%key, "state expired");
            inner.notify(&ChangeEvent::deleted(key));
        });
    }
}

impl StateStore for InMemoryStateStore {
    async fn ensure_state(
        &self,
        key: &StateKey,
        schema: StateSchema,
    ) -> Result<bool, WinCtrlError> {
        let mut inner = self.inner.lock().await;
        if inner.slots.contains_key(key) {
            return Ok(false);
        }
        inner.slots.insert(
            key.clone(),
            Slot {
                schema,
                state: None,
                generation: 0,
            },
        );
        Ok(true)
    }

    async fn subscribe(&self, pattern: &str) -> Result<ChangeStream, WinCtrlError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().await;
        inner.subscribers.push(Subscriber {
            pattern: pattern.to_string(),
            tx,
        });
        tracing::debug!(pattern, "subscribed");
        Ok(rx)
    }

    async fn set_state(&self, key: &StateKey, update: StateUpdate) -> Result<State, WinCtrlError> {
        let mut inner = self.inner.lock().await;
        let slot = inner
            .slots
            .get_mut(key)
            .ok_or_else(|| StoreError::UnknownKey(key.clone()))?;

        if let Err(err) = slot.schema.check(&update.val) {
            tracing::warn!(%key, error = %err, "value does not match declared schema");
        }

        let state = State::from_update(update, now());
        slot.state = Some(state.clone());
        slot.generation += 1;
        let generation = slot.generation;

        inner.notify(&ChangeEvent::changed(key.clone(), state.clone()));
        drop(inner);

        if let Some(seconds) = state.expire {
            self.schedule_expiry(key.clone(), generation, seconds);
        }
        Ok(state)
    }

    async fn get_state(&self, key: &StateKey) -> Result<Option<State>, WinCtrlError> {
        let inner = self.inner.lock().await;
        inner
            .slots
            .get(key)
            .map(|slot| slot.state.clone())
            .ok_or_else(|| StoreError::UnknownKey(key.clone()).into())
    }
}
