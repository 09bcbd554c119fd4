//! Record Aggregate
//!
//! One submission instance against a specific form. A record belongs
//! permanently to the form it was created against and holds at most one
//! value per field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::events::{DomainEvent, RecordEvent};
use crate::domain::value_objects::{AcceptedValue, EntityId, FieldInput};

/// One stored answer, tying a record to a field. Free text; the referenced
/// field interprets the type semantics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldValue {
    pub id: EntityId,
    pub field_id: EntityId,
    pub value: String,
}

/// Record aggregate root, owning its field values.
#[derive(Clone, Debug)]
pub struct Record {
    id: EntityId,
    form_id: EntityId,
    created_at: DateTime<Utc>,
    values: Vec<FieldValue>,
    events: Vec<DomainEvent>,
}

impl Record {
    /// Create a record from validated submission values.
    ///
    /// Duplicate field ids in the input collapse to the last value supplied,
    /// keeping the one-value-per-field invariant.
    pub fn create(form_id: EntityId, accepted: Vec<AcceptedValue>) -> Self {
        let now = Utc::now();
        let id = EntityId::new();
        let mut record = Self {
            id: id.clone(),
            form_id: form_id.clone(),
            created_at: now,
            values: Vec::with_capacity(accepted.len()),
            events: vec![],
        };

        for value in accepted {
            record.upsert_value(value.field_id, value.value.into_text());
        }

        record.raise(DomainEvent::Record(RecordEvent::Submitted {
            record_id: id,
            form_id,
            submitted_at: now,
        }));

        record
    }

    /// Replace the value stored for `field_id`, or add one if absent.
    pub fn upsert_value(&mut self, field_id: EntityId, value: impl Into<String>) {
        let value = value.into();
        match self.values.iter_mut().find(|v| v.field_id == field_id) {
            Some(existing) => existing.value = value,
            None => self.values.push(FieldValue {
                id: EntityId::new(),
                field_id,
                value,
            }),
        }
    }

    /// Apply a partial update: upsert each entry, leave other fields as they
    /// were.
    pub fn apply(&mut self, entries: Vec<FieldInput>) {
        let fields_changed = entries.len();
        for entry in entries {
            self.upsert_value(entry.field_id, entry.value);
        }
        self.raise(DomainEvent::Record(RecordEvent::Updated {
            record_id: self.id.clone(),
            fields_changed,
        }));
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn form_id(&self) -> &EntityId {
        &self.form_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Stored text for a field, if this record holds one.
    pub fn value_for(&self, field_id: &EntityId) -> Option<&str> {
        self.values
            .iter()
            .find(|v| &v.field_id == field_id)
            .map(|v| v.value.as_str())
    }

    /// Get and clear accumulated domain events.
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn raise(&mut self, event: DomainEvent) {
        self.events.push(event);
    }
}
