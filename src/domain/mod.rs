//! Domain layer: aggregates, value objects, events, and domain services.

pub mod aggregates;
pub mod events;
pub mod services;
pub mod value_objects;

pub use events::DomainEvent;

use thiserror::Error;
use value_objects::{EntityId, FieldType};

/// Malformed or missing input, either in a form definition or a submission.
///
/// A failed batch validation must leave storage unchanged; callers only
/// persist after this error cannot occur anymore.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("form name must not be empty")]
    EmptyName,

    #[error("a form must declare at least one field")]
    NoFields,

    #[error("field label must not be empty")]
    EmptyLabel,

    #[error("{0} fields require a non-empty options list")]
    MissingOptions(FieldType),

    #[error("unknown field type {0:?}")]
    UnknownFieldType(String),

    #[error("submission rejected with {} violation(s)", .0.len())]
    Submission(Vec<FieldViolation>),
}

/// One per-field failure inside a rejected submission.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldViolation {
    #[error("field {field_id} does not exist on this form")]
    UnknownField { field_id: EntityId },

    #[error("field {field_id} is required")]
    RequiredField { field_id: EntityId },

    #[error("{value:?} is not one of the options for field {field_id}")]
    InvalidOption { field_id: EntityId, value: String },

    #[error("{value:?} is not a valid {expected} for field {field_id}")]
    TypeMismatch {
        field_id: EntityId,
        expected: FieldType,
        value: String,
    },
}

/// Cross-aggregate reference violations, rejected at write time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrityError {
    #[error("field {field_id} does not belong to form {form_id}")]
    FieldMismatch {
        field_id: EntityId,
        form_id: EntityId,
    },
}
