//! Field definitions and raw submission inputs.

use serde::{Deserialize, Serialize};

use super::{EntityId, FieldType};
use crate::domain::ValidationError;

/// Author-supplied description of one field, before identity and ordering
/// have been assigned.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldSpec {
    pub label: String,
    pub field_type: FieldType,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub help_text: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

fn default_required() -> bool {
    true
}

impl FieldSpec {
    pub fn new(label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            label: label.into(),
            field_type,
            required: true,
            options: Vec::new(),
            placeholder: None,
            help_text: None,
            order: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_options(mut self, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }
}

/// One typed, labeled input slot within a form.
///
/// Mutated by form-authoring operations only; record submission never
/// touches field definitions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Field {
    pub id: EntityId,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    /// Fixed choice set; empty unless the type requires options.
    #[serde(default)]
    pub options: Vec<String>,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
    /// Display position within the form. Ties are tolerated and sort stably.
    pub order: u32,
}

impl Field {
    /// Build a field from its spec. `position` is the 1-based slot used when
    /// no explicit order was given.
    pub fn from_spec(spec: FieldSpec, position: u32) -> Result<Self, ValidationError> {
        if spec.label.trim().is_empty() {
            return Err(ValidationError::EmptyLabel);
        }

        let options = if spec.field_type.requires_options() {
            if spec.options.is_empty() {
                return Err(ValidationError::MissingOptions(spec.field_type));
            }
            spec.options
        } else {
            // Options are meaningless for scalar types; keep the invariant
            // that they are absent.
            Vec::new()
        };

        Ok(Self {
            id: EntityId::new(),
            label: spec.label,
            field_type: spec.field_type,
            required: spec.required,
            options,
            placeholder: spec.placeholder,
            help_text: spec.help_text,
            order: spec.order.unwrap_or(position),
        })
    }

    /// Case-sensitive membership test against the choice set.
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }
}

/// One `(field, raw value)` pair from a submission or update payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldInput {
    pub field_id: EntityId,
    pub value: String,
}

impl FieldInput {
    pub fn new(field_id: EntityId, value: impl Into<String>) -> Self {
        Self {
            field_id,
            value: value.into(),
        }
    }
}
