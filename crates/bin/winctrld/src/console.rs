//! Stdin command source.
//!
//! Stands in for a host UI: every non-empty line read from stdin is written
//! to the `command` key unacknowledged, exactly like a user instruction.

use std::io::BufRead;

use tokio::sync::mpsc;

use winctrl_app::ports::StateStore;
use winctrl_domain::state::{StateKey, StateUpdate};

/// Read stdin lines on a dedicated thread.
///
/// A blocking read on a runtime thread would keep the process alive after
/// shutdown; a detached OS thread does not.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Write every non-empty line as a user command until `lines` closes.
pub async fn feed_commands<S: StateStore>(store: &S, mut lines: mpsc::UnboundedReceiver<String>) {
    let key = StateKey::command();
    while let Some(line) = lines.recv().await {
        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        if let Err(err) = store.set_state(&key, StateUpdate::command(command)).await {
            tracing::warn!(error = %err, command, "failed to write command");
        }
    }
    tracing::debug!("command input closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use winctrl_adapter_state_memory::InMemoryStateStore;
    use winctrl_domain::state::{StateSchema, StateValue};

    #[tokio::test]
    async fn should_write_each_line_as_unacknowledged_command() {
        let store = InMemoryStateStore::new();
        store
            .ensure_state(&StateKey::command(), StateSchema::string("command"))
            .await
            .unwrap();
        let mut events = store.subscribe(StateKey::COMMAND).await.unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send("mute".to_string()).unwrap();
        tx.send("   ".to_string()).unwrap();
        tx.send(" reboot \n".to_string()).unwrap();
        drop(tx);

        feed_commands(&store, rx).await;

        let first = events.recv().await.unwrap().state.unwrap();
        assert_eq!(first.val, StateValue::from("mute"));
        assert!(!first.ack);
        let second = events.recv().await.unwrap().state.unwrap();
        assert_eq!(second.val, StateValue::from("reboot"));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn should_keep_reading_when_a_write_fails() {
        let store = InMemoryStateStore::new();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send("mute".to_string()).unwrap();
        drop(tx);

        // `command` was never declared, so every write fails.
        feed_commands(&store, rx).await;
    }
}
