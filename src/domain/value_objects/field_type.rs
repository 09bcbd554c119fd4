//! Field type registry
//!
//! The fixed enumeration of supported input types. No dynamic registration:
//! the set matches what the submission validator knows how to check.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::ValidationError;

/// Declared type of a form field, driving validation and coercion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Date,
    Email,
    Password,
    Select,
    Radio,
    Checkbox,
}

impl FieldType {
    /// Every known type, in declaration order.
    pub const ALL: [FieldType; 9] = [
        Self::Text,
        Self::Textarea,
        Self::Number,
        Self::Date,
        Self::Email,
        Self::Password,
        Self::Select,
        Self::Radio,
        Self::Checkbox,
    ];

    /// Whether values of this type must come from a fixed choice set.
    pub fn requires_options(self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }

    /// Wire name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Date => "date",
            Self::Email => "email",
            Self::Password => "password",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownFieldType(s.to_string()))
    }
}
