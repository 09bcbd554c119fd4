//! Validation & Coercion Engine
//!
//! Checks a raw submission against a form definition and produces either a
//! committed set of typed values or a structured error set. Batch-atomic: a
//! single violation rejects the whole submission, so callers never persist a
//! partially valid record.

use crate::domain::aggregates::Form;
use crate::domain::value_objects::{AcceptedValue, Email, Field, FieldInput, FieldScalar, FieldType};
use crate::domain::{FieldViolation, ValidationError};

pub struct SubmissionValidator;

impl SubmissionValidator {
    /// Validate every entry against its field's type, options, and required
    /// rules.
    ///
    /// All violations are collected before failing, so the caller gets one
    /// structured error set for the whole payload. Entries need not cover
    /// every field; required coverage is enforced explicitly.
    pub fn validate(
        form: &Form,
        entries: &[FieldInput],
    ) -> Result<Vec<AcceptedValue>, ValidationError> {
        let mut accepted = Vec::with_capacity(entries.len());
        let mut violations = Vec::new();

        for entry in entries {
            let Some(field) = form.field(&entry.field_id) else {
                violations.push(FieldViolation::UnknownField {
                    field_id: entry.field_id.clone(),
                });
                continue;
            };

            match Self::coerce(field, &entry.value) {
                Ok(value) => accepted.push(AcceptedValue {
                    field_id: entry.field_id.clone(),
                    value,
                }),
                Err(violation) => violations.push(violation),
            }
        }

        for field in form.fields() {
            if !field.required {
                continue;
            }
            let covered = entries
                .iter()
                .any(|e| e.field_id == field.id && !e.value.trim().is_empty());
            if !covered {
                violations.push(FieldViolation::RequiredField {
                    field_id: field.id.clone(),
                });
            }
        }

        if violations.is_empty() {
            Ok(accepted)
        } else {
            Err(ValidationError::Submission(violations))
        }
    }

    /// Apply the per-type rule to one raw value.
    ///
    /// Blank values pass through untyped; whether a blank is acceptable is
    /// the required check's concern, not the type rule's.
    fn coerce(field: &Field, raw: &str) -> Result<FieldScalar, FieldViolation> {
        if raw.trim().is_empty() {
            return Ok(FieldScalar::Text(raw.to_string()));
        }

        match field.field_type {
            FieldType::Number => match raw.trim().parse::<f64>() {
                Ok(parsed) => Ok(FieldScalar::Number {
                    raw: raw.to_string(),
                    parsed,
                }),
                Err(_) => Err(FieldViolation::TypeMismatch {
                    field_id: field.id.clone(),
                    expected: FieldType::Number,
                    value: raw.to_string(),
                }),
            },
            FieldType::Email => match Email::parse(raw) {
                Ok(parsed) => Ok(FieldScalar::Email {
                    raw: raw.to_string(),
                    parsed,
                }),
                Err(_) => Err(FieldViolation::TypeMismatch {
                    field_id: field.id.clone(),
                    expected: FieldType::Email,
                    value: raw.to_string(),
                }),
            },
            FieldType::Select | FieldType::Radio | FieldType::Checkbox => {
                if field.has_option(raw) {
                    Ok(FieldScalar::Choice(raw.to_string()))
                } else {
                    Err(FieldViolation::InvalidOption {
                        field_id: field.id.clone(),
                        value: raw.to_string(),
                    })
                }
            }
            FieldType::Text | FieldType::Textarea | FieldType::Date | FieldType::Password => {
                Ok(FieldScalar::Text(raw.to_string()))
            }
        }
    }
}
