//! Tagged values produced by coercion.
//!
//! Values are typed at the validation boundary but stored as a single
//! textual representation; the field a value references, not the value row,
//! carries the type semantics.

use super::{Email, EntityId};

/// A raw value after type coercion succeeded.
///
/// Typed variants keep the submitted text alongside the parsed form; only
/// the submitted text is ever stored.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldScalar {
    Text(String),
    Number { raw: String, parsed: f64 },
    Choice(String),
    Email { raw: String, parsed: Email },
}

impl FieldScalar {
    /// Text form as submitted, as it will be stored.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(s) | Self::Choice(s) => s,
            Self::Number { raw, .. } | Self::Email { raw, .. } => raw,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Text(s) | Self::Choice(s) => s,
            Self::Number { raw, .. } | Self::Email { raw, .. } => raw,
        }
    }
}

/// One committed value of a validated submission, ready for storage.
#[derive(Clone, Debug, PartialEq)]
pub struct AcceptedValue {
    pub field_id: EntityId,
    pub value: FieldScalar,
}
