//! Declaration of the keys the relay owns.

use winctrl_domain::error::WinCtrlError;
use winctrl_domain::relay::MAX_STATUS;
use winctrl_domain::state::{StateKey, StateSchema};

use crate::ports::StateStore;

/// Schemas for `command`, `response` and `status`.
///
/// # Errors
///
/// Returns a validation error if the `status` bounds are inconsistent.
pub fn relay_schemas() -> Result<Vec<(StateKey, StateSchema)>, WinCtrlError> {
    Ok(vec![
        (StateKey::command(), StateSchema::string("command")),
        (
            StateKey::response(),
            StateSchema::string("response").read_only(),
        ),
        (
            StateKey::status(),
            StateSchema::number("status")
                .read_only()
                .with_bounds(0.0, f64::from(MAX_STATUS))?,
        ),
    ])
}

/// Create the relay keys if they are absent. Existing keys are left as-is.
///
/// # Errors
///
/// Returns the first store error encountered.
pub async fn declare_relay_states<S: StateStore>(store: &S) -> Result<(), WinCtrlError> {
    for (key, schema) in relay_schemas()? {
        let created = store.ensure_state(&key, schema).await?;
        if created {
            tracing::debug!(%key, "state declared");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use tokio::sync::mpsc;
    use winctrl_domain::state::{Access, State, StateUpdate, ValueType};

    use crate::ports::ChangeStream;

    #[derive(Default)]
    struct SchemaStore {
        schemas: Mutex<HashMap<StateKey, StateSchema>>,
    }

    impl StateStore for SchemaStore {
        async fn ensure_state(
            &self,
            key: &StateKey,
            schema: StateSchema,
        ) -> Result<bool, WinCtrlError> {
            let mut schemas = self.schemas.lock().unwrap();
            if schemas.contains_key(key) {
                return Ok(false);
            }
            schemas.insert(key.clone(), schema);
            Ok(true)
        }

        async fn subscribe(&self, _pattern: &str) -> Result<ChangeStream, WinCtrlError> {
            let (_tx, rx) = mpsc::unbounded_channel();
            Ok(rx)
        }

        async fn set_state(
            &self,
            _key: &StateKey,
            update: StateUpdate,
        ) -> Result<State, WinCtrlError> {
            Ok(State::from_update(update, winctrl_domain::time::now()))
        }

        async fn get_state(&self, _key: &StateKey) -> Result<Option<State>, WinCtrlError> {
            Ok(None)
        }
    }

    #[test]
    fn should_declare_status_as_bounded_read_only_number() {
        let schemas = relay_schemas().unwrap();
        let (_, status) = schemas
            .iter()
            .find(|(key, _)| *key == StateKey::status())
            .unwrap();
        assert_eq!(status.value_type, ValueType::Number);
        assert_eq!(status.access, Access::Read);
        assert_eq!(status.min, Some(0.0));
        assert_eq!(status.max, Some(599.0));
    }

    #[test]
    fn should_declare_command_as_writable_string() {
        let schemas = relay_schemas().unwrap();
        let (_, command) = &schemas[0];
        assert_eq!(command.value_type, ValueType::String);
        assert!(command.access.is_writable());
    }

    #[tokio::test]
    async fn should_declare_three_states() {
        let store = SchemaStore::default();
        declare_relay_states(&store).await.unwrap();
        assert_eq!(store.schemas.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn should_keep_existing_schema_when_declared_twice() {
        let store = SchemaStore::default();
        store
            .ensure_state(&StateKey::response(), StateSchema::string("custom"))
            .await
            .unwrap();

        declare_relay_states(&store).await.unwrap();
        declare_relay_states(&store).await.unwrap();

        let schemas = store.schemas.lock().unwrap();
        assert_eq!(schemas.len(), 3);
        assert_eq!(schemas[&StateKey::response()].name, "custom");
    }
}
