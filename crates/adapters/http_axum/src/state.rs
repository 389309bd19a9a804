//! Shared state for the status handlers.

use std::sync::Arc;
use std::time::Instant;

use winctrl_domain::relay::DeviceEndpoint;

/// Read-only data the status routes report.
///
/// `Clone` only bumps the `Arc` around the device host.
#[derive(Debug, Clone)]
pub struct StatusState {
    started: Instant,
    client_ip: Arc<str>,
}

impl StatusState {
    /// `started` marks process start; uptime is measured from it.
    #[must_use]
    pub fn new(started: Instant, device: &DeviceEndpoint) -> Self {
        Self {
            started,
            client_ip: Arc::from(device.host.as_str()),
        }
    }

    /// Seconds since process start.
    #[must_use]
    pub fn uptime_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Host of the controlled device.
    #[must_use]
    pub fn client_ip(&self) -> &str {
        &self.client_ip
    }
}
