//! Relay cycle values, from a command token to a device URL, and from a
//! device response back to the `response`/`status` pair.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::state::StateValue;

/// Device host used when none is configured.
pub const DEFAULT_DEVICE_HOST: &str = "127.0.0.1";
/// Device port used when none is configured.
pub const DEFAULT_DEVICE_PORT: u16 = 8085;
/// Highest value the `status` state accepts.
pub const MAX_STATUS: u16 = 599;

/// Host and port of the controlled device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEndpoint {
    pub host: String,
    pub port: u16,
}

impl DeviceEndpoint {
    /// Build an endpoint, falling back to the defaults for an empty host or a
    /// zero port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        Self {
            host: if host.trim().is_empty() {
                DEFAULT_DEVICE_HOST.to_string()
            } else {
                host
            },
            port: if port == 0 { DEFAULT_DEVICE_PORT } else { port },
        }
    }

    /// Request for a single command token against this endpoint.
    #[must_use]
    pub fn request(&self, command: &StateValue) -> RelayRequest {
        RelayRequest {
            host: self.host.clone(),
            port: self.port,
            command: command.to_string(),
        }
    }
}

impl Default for DeviceEndpoint {
    fn default() -> Self {
        Self {
            host: DEFAULT_DEVICE_HOST.to_string(),
            port: DEFAULT_DEVICE_PORT,
        }
    }
}

/// One outbound device request. Lives for a single relay cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    pub host: String,
    pub port: u16,
    /// The rendered command token, used verbatim as the URL path.
    pub command: String,
}

impl RelayRequest {
    /// `http://{host}:{port}/{command}`. The command is not escaped.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}:{}/{}", self.host, self.port, self.command)
    }
}

/// What the device answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceResponse {
    pub status: u16,
    pub body: String,
}

/// The `response`/`status` pair written back after a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayResult {
    pub response: StateValue,
    pub status: StateValue,
}

impl RelayResult {
    /// Both fields set to the `"error"` sentinel.
    #[must_use]
    pub fn failed() -> Self {
        Self {
            response: StateValue::error(),
            status: StateValue::error(),
        }
    }
}

impl From<DeviceResponse> for RelayResult {
    /// An empty body becomes the sentinel. A status of `0` or above
    /// [`MAX_STATUS`] becomes the sentinel.
    fn from(resp: DeviceResponse) -> Self {
        let response = if resp.body.is_empty() {
            StateValue::error()
        } else {
            StateValue::String(resp.body)
        };
        let status = match resp.status {
            0 => StateValue::error(),
            code if code > MAX_STATUS => StateValue::error(),
            code => StateValue::from(code),
        };
        Self { response, status }
    }
}

/// What to write back when the device request fails at transport level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Write nothing; `response`/`status` keep their previous values.
    #[default]
    Keep,
    /// Write the `"error"` sentinel into both keys.
    WriteError,
}

/// Which result survives when relay cycles overlap.
///
/// Requests are never serialized under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Every result is written; the cycle that completes last wins.
    #[default]
    LastCompleted,
    /// A result is dropped when a later-issued command has already written
    /// its own, so the most recent command's effect is applied last.
    LatestIssued,
}

impl FromStr for FailurePolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(Self::Keep),
            "write_error" => Ok(Self::WriteError),
            other => Err(ValidationError::UnknownPolicy(other.to_string())),
        }
    }
}

impl FromStr for OverlapPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last_completed" => Ok(Self::LastCompleted),
            "latest_issued" => Ok(Self::LatestIssued),
            other => Err(ValidationError::UnknownPolicy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_write_every_result_by_default() {
        assert_eq!(OverlapPolicy::default(), OverlapPolicy::LastCompleted);
    }

    #[test]
    fn should_build_url_from_configured_endpoint() {
        let endpoint = DeviceEndpoint::new("10.0.0.5", 9000);
        let req = endpoint.request(&StateValue::from("reboot"));
        assert_eq!(req.url(), "http://10.0.0.5:9000/reboot");
    }

    #[test]
    fn should_not_escape_command_token() {
        let endpoint = DeviceEndpoint::default();
        let req = endpoint.request(&StateValue::from("volume?level=3&mute"));
        assert_eq!(req.url(), "http://127.0.0.1:8085/volume?level=3&mute");
    }

    #[test]
    fn should_render_numeric_command_without_fraction() {
        let endpoint = DeviceEndpoint::default();
        let req = endpoint.request(&StateValue::from(42.0));
        assert_eq!(req.url(), "http://127.0.0.1:8085/42");
    }

    #[test]
    fn should_fall_back_to_defaults_for_missing_host_and_port() {
        let endpoint = DeviceEndpoint::new("", 0);
        assert_eq!(endpoint, DeviceEndpoint::default());
        assert_eq!(endpoint.host, "127.0.0.1");
        assert_eq!(endpoint.port, 8085);
    }

    #[test]
    fn should_map_successful_response() {
        let result = RelayResult::from(DeviceResponse {
            status: 200,
            body: "done".to_string(),
        });
        assert_eq!(result.response, StateValue::from("done"));
        assert_eq!(result.status, StateValue::from(200_u16));
    }

    #[test]
    fn should_write_sentinel_for_empty_body() {
        let result = RelayResult::from(DeviceResponse {
            status: 204,
            body: String::new(),
        });
        assert_eq!(result.response, StateValue::error());
        assert_eq!(result.status, StateValue::from(204_u16));
    }

    #[test]
    fn should_write_sentinel_for_status_outside_range() {
        let zero = RelayResult::from(DeviceResponse {
            status: 0,
            body: "x".to_string(),
        });
        assert_eq!(zero.status, StateValue::error());

        let high = RelayResult::from(DeviceResponse {
            status: 600,
            body: "x".to_string(),
        });
        assert_eq!(high.status, StateValue::error());
    }

    #[test]
    fn should_keep_previous_values_by_default() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::Keep);
    }

    #[test]
    fn should_parse_policies_from_config_strings() {
        assert_eq!("keep".parse(), Ok(FailurePolicy::Keep));
        assert_eq!("latest_issued".parse(), Ok(OverlapPolicy::LatestIssued));
        assert!("sometimes".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn should_deserialize_failure_policy_in_snake_case() {
        let policy: FailurePolicy = serde_json::from_str("\"write_error\"").unwrap();
        assert_eq!(policy, FailurePolicy::WriteError);
    }
}
