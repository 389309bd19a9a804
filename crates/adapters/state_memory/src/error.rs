//! Store-specific error type.

use winctrl_domain::error::{NotFoundError, WinCtrlError};
use winctrl_domain::state::StateKey;

/// Errors originating from the in-memory store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key was never declared with `ensure_state`.
    #[error("state {0} is not declared")]
    UnknownKey(StateKey),
}

impl From<StoreError> for WinCtrlError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownKey(key) => Self::NotFound(NotFoundError::state(&key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_unknown_key() {
        let err = StoreError::UnknownKey(StateKey::status());
        assert_eq!(err.to_string(), "state status is not declared");
    }

    #[test]
    fn should_convert_unknown_key_to_not_found() {
        let err: WinCtrlError = StoreError::UnknownKey(StateKey::status()).into();
        assert!(matches!(err, WinCtrlError::NotFound(_)));
    }
}
