//! State schema: the declaration a key is registered with.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

use super::StateValue;

/// Declared value type of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Boolean,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Number => f.write_str("number"),
            Self::Boolean => f.write_str("boolean"),
        }
    }
}

/// Who may write a state from outside its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Read,
    Write,
    ReadWrite,
}

impl Access {
    #[must_use]
    pub fn is_readable(self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    #[must_use]
    pub fn is_writable(self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }
}

/// Declaration of a single state key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSchema {
    /// Human-readable name.
    pub name: String,
    pub value_type: ValueType,
    pub access: Access,
    /// Semantic role hint (e.g. `"value"`).
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl StateSchema {
    fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            access: Access::ReadWrite,
            role: "value".to_string(),
            min: None,
            max: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::Boolean)
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.access = Access::Read;
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Restrict a numeric state to `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidBounds`] when `min > max`.
    pub fn with_bounds(mut self, min: f64, max: f64) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::InvalidBounds { min, max });
        }
        self.min = Some(min);
        self.max = Some(max);
        Ok(self)
    }

    /// Check a value against the declared type and bounds.
    ///
    /// `null` is accepted for every type.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TypeMismatch`] or
    /// [`ValidationError::OutOfRange`].
    pub fn check(&self, value: &StateValue) -> Result<(), ValidationError> {
        let type_ok = matches!(
            (self.value_type, value),
            (_, StateValue::Null)
                | (ValueType::String, StateValue::String(_))
                | (ValueType::Number, StateValue::Number(_))
                | (ValueType::Boolean, StateValue::Boolean(_))
        );
        if !type_ok {
            return Err(ValidationError::TypeMismatch {
                expected: self.value_type,
                actual: value.type_name(),
            });
        }

        if let Some(n) = value.as_number() {
            let min = self.min.unwrap_or(f64::NEG_INFINITY);
            let max = self.max.unwrap_or(f64::INFINITY);
            if n < min || n > max {
                return Err(ValidationError::OutOfRange {
                    value: n,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}
