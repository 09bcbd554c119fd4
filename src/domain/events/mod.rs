//! Domain events accumulated by aggregates and drained with `take_events()`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_objects::EntityId;

#[derive(Clone, Debug, Serialize)]
pub enum DomainEvent {
    Form(FormEvent),
    Record(RecordEvent),
}

#[derive(Clone, Debug, Serialize)]
pub enum FormEvent {
    Created {
        form_id: EntityId,
        name: String,
        created_at: DateTime<Utc>,
    },
    Deleted {
        form_id: EntityId,
        records_removed: u64,
    },
}

#[derive(Clone, Debug, Serialize)]
pub enum RecordEvent {
    Submitted {
        record_id: EntityId,
        form_id: EntityId,
        submitted_at: DateTime<Utc>,
    },
    Updated {
        record_id: EntityId,
        fields_changed: usize,
    },
    Deleted {
        record_id: EntityId,
        form_id: EntityId,
    },
}
