//! Command relay: unacknowledged `command` writes become device requests,
//! device answers become the `response`/`status` pair.
//!
//! Every accepted command runs as its own task. Cycles are **not**
//! serialized: when two commands overlap, both requests are in flight at the
//! same time. Under [`OverlapPolicy::LastCompleted`] whichever completes last
//! determines the final `response`/`status`; under
//! [`OverlapPolicy::LatestIssued`] results older than the last written one are
//! dropped. The write-back of a pair is exclusive in both cases, so one
//! cycle's `response` is never combined with another cycle's `status`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::Instrument;

use winctrl_domain::error::WinCtrlError;
use winctrl_domain::relay::{FailurePolicy, OverlapPolicy, RelayRequest, RelayResult};
use winctrl_domain::state::{ChangeEvent, StateKey, StateUpdate};

use crate::context::RelayContext;
use crate::ports::{ChangeStream, HttpClient, StateStore};

/// The event handler bridging the `command` key to the device.
pub struct CommandRelay<S, C> {
    ctx: RelayContext<S>,
    client: Arc<C>,
    on_failure: FailurePolicy,
    on_overlap: OverlapPolicy,
    issued: AtomicU64,
    /// Sequence number of the last pair written back.
    written: Arc<Mutex<u64>>,
}

/// Per-cycle copy of what the spawned task needs.
struct Cycle<S, C> {
    store: Arc<S>,
    client: Arc<C>,
    written: Arc<Mutex<u64>>,
    on_failure: FailurePolicy,
    on_overlap: OverlapPolicy,
    seq: u64,
}

impl<S, C> CommandRelay<S, C>
where
    S: StateStore + Send + Sync + 'static,
    C: HttpClient + Send + Sync + 'static,
{
    /// Create a relay with the default policies
    /// ([`FailurePolicy::Keep`], [`OverlapPolicy::LastCompleted`]).
    pub fn new(ctx: RelayContext<S>, client: C) -> Self {
        Self {
            ctx,
            client: Arc::new(client),
            on_failure: FailurePolicy::default(),
            on_overlap: OverlapPolicy::default(),
            issued: AtomicU64::new(0),
            written: Arc::new(Mutex::new(0)),
        }
    }

    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    #[must_use]
    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.on_overlap = policy;
        self
    }

    /// Subscribe to the `command` key, and only to it.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the subscription cannot be registered.
    pub async fn subscribe(&self) -> Result<ChangeStream, WinCtrlError> {
        self.ctx.store.subscribe(StateKey::COMMAND).await
    }

    /// Dispatch every event of `events` until the stream closes.
    ///
    /// Does not wait for in-flight cycles before returning.
    pub async fn run(&self, mut events: ChangeStream) {
        while let Some(event) = events.recv().await {
            self.on_command_changed(event);
        }
        tracing::debug!(instance = %self.ctx.instance, "command stream closed");
    }

    /// Handle one change of the `command` key.
    ///
    /// Returns the handle of the spawned relay cycle, or `None` when the
    /// event is not a new instruction (deleted, acknowledged, or another key).
    /// The cycle keeps running when the handle is dropped.
    pub fn on_command_changed(&self, event: ChangeEvent) -> Option<JoinHandle<()>> {
        let instance = &self.ctx.instance;

        if event.key.as_str() != StateKey::COMMAND {
            tracing::debug!(%instance, key = %event.key, "ignoring change of foreign key");
            return None;
        }

        let Some(state) = event.state else {
            tracing::info!(%instance, key = %event.key, "state deleted");
            return None;
        };

        tracing::info!(
            %instance,
            key = %event.key,
            val = %state.val,
            ack = state.ack,
            "state changed"
        );

        if state.ack {
            tracing::debug!(%instance, "acknowledged value, nothing to relay");
            return None;
        }

        let request = self.ctx.endpoint.request(&state.val);
        tracing::info!(%instance, command = %request.command, "user command received");

        let cycle = Cycle {
            store: Arc::clone(&self.ctx.store),
            client: Arc::clone(&self.client),
            written: Arc::clone(&self.written),
            on_failure: self.on_failure,
            on_overlap: self.on_overlap,
            seq: self.issued.fetch_add(1, Ordering::Relaxed) + 1,
        };
        let span = tracing::info_span!("relay", %instance, seq = cycle.seq);
        Some(tokio::spawn(cycle.run(request).instrument(span)))
    }
}

impl<S, C> Cycle<S, C>
where
    S: StateStore + Send + Sync,
    C: HttpClient + Send + Sync,
{
    /// `Sending → {WroteSuccess | LoggedFailure}`.
    async fn run(self, request: RelayRequest) {
        let url = request.url();
        let result = match self.client.get(&url).await {
            Ok(resp) => {
                tracing::info!(status = resp.status, body = %resp.body, "response received");
                RelayResult::from(resp)
            }
            Err(err) => {
                tracing::error!(%url, error = %err, "device request failed");
                match self.on_failure {
                    FailurePolicy::Keep => return,
                    FailurePolicy::WriteError => RelayResult::failed(),
                }
            }
        };

        let mut written = self.written.lock().await;
        if self.on_overlap == OverlapPolicy::LatestIssued && self.seq < *written {
            tracing::debug!(latest = *written, "dropping result of superseded command");
            return;
        }
        if write_result(self.store.as_ref(), result).await {
            *written = (*written).max(self.seq);
        }
    }
}

/// Write `response` then `status`. Returns whether both writes succeeded.
async fn write_result<S: StateStore>(store: &S, result: RelayResult) -> bool {
    for (key, val) in [
        (StateKey::response(), result.response),
        (StateKey::status(), result.status),
    ] {
        if let Err(err) = store.set_state(&key, StateUpdate::ack(val)).await {
            tracing::error!(%key, error = %err, "failed to write back");
            return false;
        }
    }
    true
}
