//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `winctrl.toml` in the working directory, or the file named by
//! `WINCTRL_CONFIG`. Every field has a default so the file is optional.
//! Environment variables take precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use winctrl_domain::relay::{
    DEFAULT_DEVICE_HOST, DEFAULT_DEVICE_PORT, DeviceEndpoint, FailurePolicy, OverlapPolicy,
};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Adapter instance settings.
    pub instance: InstanceConfig,
    /// Controlled device settings.
    pub device: DeviceConfig,
    /// Relay behaviour.
    pub relay: RelayConfig,
    /// Optional status server.
    pub status_server: StatusServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Adapter instance identity.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    /// Name used in log lines (e.g. `winctrl.0`).
    pub name: String,
}

/// Where the device listens.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Device host. Empty falls back to `127.0.0.1`.
    pub client_ip: String,
    /// Device port. Zero falls back to `8085`.
    pub port: u16,
    /// Seconds before a device request is abandoned.
    pub request_timeout_secs: u64,
}

/// Relay policies.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// What to write back on a transport failure.
    pub on_failure: FailurePolicy,
    /// Which result survives overlapping commands.
    pub on_overlap: OverlapPolicy,
}

/// Status server listener.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StatusServerConfig {
    pub enabled: bool,
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port. Must differ from the device port when both are local.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if an
    /// override or the resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("WINCTRL_CONFIG").unwrap_or_else(|_| "winctrl.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("WINCTRL_INSTANCE") {
            self.instance.name = val;
        }
        if let Ok(val) = std::env::var("WINCTRL_CLIENT_IP") {
            self.device.client_ip = val;
        }
        if let Ok(val) = std::env::var("WINCTRL_PORT") {
            if let Ok(port) = val.parse() {
                self.device.port = port;
            }
        }
        if let Ok(val) = std::env::var("WINCTRL_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.device.request_timeout_secs = secs;
            }
        }
        if let Ok(val) = std::env::var("WINCTRL_ON_FAILURE") {
            self.relay.on_failure = val
                .parse()
                .map_err(|err| ConfigError::Validation(format!("WINCTRL_ON_FAILURE: {err}")))?;
        }
        if let Ok(val) = std::env::var("WINCTRL_ON_OVERLAP") {
            self.relay.on_overlap = val
                .parse()
                .map_err(|err| ConfigError::Validation(format!("WINCTRL_ON_OVERLAP: {err}")))?;
        }
        if let Ok(val) = std::env::var("WINCTRL_STATUS_SERVER") {
            self.status_server.enabled = parse_flag(&val);
        }
        if let Ok(val) = std::env::var("WINCTRL_STATUS_PORT") {
            if let Ok(port) = val.parse() {
                self.status_server.port = port;
            }
        }
        if let Ok(val) = std::env::var("WINCTRL_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.device.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "request timeout must be non-zero".to_string(),
            ));
        }
        if self.status_server.enabled && self.status_server.port == 0 {
            return Err(ConfigError::Validation(
                "status server port must be non-zero".to_string(),
            ));
        }
        if self.status_server.enabled
            && self.status_server.port == self.device_endpoint().port
            && is_local(&self.device_endpoint().host)
        {
            return Err(ConfigError::Validation(format!(
                "status server port {} collides with the local device port",
                self.status_server.port
            )));
        }
        Ok(())
    }

    /// Device endpoint with defaults applied to an empty host or zero port.
    #[must_use]
    pub fn device_endpoint(&self) -> DeviceEndpoint {
        DeviceEndpoint::new(self.device.client_ip.as_str(), self.device.port)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.device.request_timeout_secs)
    }

    /// Return the `host:port` the status server binds to.
    #[must_use]
    pub fn status_bind_addr(&self) -> String {
        format!("{}:{}", self.status_server.host, self.status_server.port)
    }
}

fn parse_flag(val: &str) -> bool {
    matches!(
        val.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn is_local(host: &str) -> bool {
    matches!(host, "127.0.0.1" | "localhost" | "::1" | "0.0.0.0")
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            name: "winctrl.0".to_string(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            client_ip: DEFAULT_DEVICE_HOST.to_string(),
            port: DEFAULT_DEVICE_PORT,
            request_timeout_secs: 5,
        }
    }
}

impl Default for StatusServerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "0.0.0.0".to_string(),
            port: 8086,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "winctrld=info,winctrl=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
