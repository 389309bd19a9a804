//! Relay context: what a relay cycle needs from its host.

use std::sync::Arc;

use winctrl_domain::relay::DeviceEndpoint;

/// Explicit replacement for a process-wide adapter object.
///
/// Carries the device endpoint, the instance name (attached to every log
/// span) and the store handle used for write-back.
pub struct RelayContext<S> {
    pub endpoint: DeviceEndpoint,
    pub instance: String,
    pub store: Arc<S>,
}

impl<S> RelayContext<S> {
    pub fn new(endpoint: DeviceEndpoint, instance: impl Into<String>, store: Arc<S>) -> Self {
        Self {
            endpoint,
            instance: instance.into(),
            store,
        }
    }
}

impl<S> Clone for RelayContext<S> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            instance: self.instance.clone(),
            store: Arc::clone(&self.store),
        }
    }
}
