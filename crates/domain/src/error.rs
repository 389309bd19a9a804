//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`WinCtrlError`]
//! via `#[from]` when crossing a port boundary.

use crate::state::{StateKey, ValueType};

/// Top-level error for everything that crosses a port boundary.
#[derive(Debug, thiserror::Error)]
pub enum WinCtrlError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("http request failed")]
    Http(#[from] HttpRequestFailed),
}

/// A value or schema rejected by a domain invariant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("state key must not be empty")]
    EmptyKey,

    #[error("expected a {expected} value, got {actual}")]
    TypeMismatch {
        expected: ValueType,
        actual: &'static str,
    },

    #[error("value {value} is outside of [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("minimum {min} is greater than maximum {max}")]
    InvalidBounds { min: f64, max: f64 },

    #[error("unknown policy {0:?}")]
    UnknownPolicy(String),
}

/// A lookup that found nothing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} {key} not found")]
pub struct NotFoundError {
    /// What was looked up (e.g. `"State"`).
    pub kind: &'static str,
    /// The missing key.
    pub key: String,
}

impl NotFoundError {
    /// Not-found error for an undeclared state key.
    #[must_use]
    pub fn state(key: &StateKey) -> Self {
        Self {
            kind: "State",
            key: key.to_string(),
        }
    }
}

/// The single error kind raised by the device HTTP client.
///
/// Covers every transport-level failure: connection refused, DNS failure,
/// malformed URL, timeout, unreadable body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("HTTP error: {message}")]
pub struct HttpRequestFailed {
    pub message: String,
}

impl HttpRequestFailed {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_prefix_http_failure_message() {
        let err = HttpRequestFailed::new("connection refused");
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }

    #[test]
    fn should_convert_http_failure_into_top_level_error() {
        let err: WinCtrlError = HttpRequestFailed::new("boom").into();
        assert!(matches!(err, WinCtrlError::Http(_)));
    }

    #[test]
    fn should_produce_every_variant_through_from() {
        let errors: [WinCtrlError; 3] = [
            ValidationError::EmptyKey.into(),
            NotFoundError::state(&StateKey::status()).into(),
            HttpRequestFailed::new("boom").into(),
        ];
        for err in errors {
            match err {
                WinCtrlError::Validation(_)
                | WinCtrlError::NotFound(_)
                | WinCtrlError::Http(_) => {}
            }
        }
    }

    #[test]
    fn should_describe_missing_state() {
        let err = NotFoundError::state(&StateKey::command());
        assert_eq!(err.to_string(), "State command not found");
    }

    #[test]
    fn should_describe_out_of_range_value() {
        let err = ValidationError::OutOfRange {
            value: 600.0,
            min: 0.0,
            max: 599.0,
        };
        assert_eq!(err.to_string(), "value 600 is outside of [0, 599]");
    }
}
