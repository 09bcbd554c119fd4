//! Commands and read models crossing the application boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{Form, Record};
use crate::domain::value_objects::{EntityId, FieldInput, FieldSpec, FieldType};

/// Create a form plus its ordered fields in one atomic unit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateFormCommand {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub fields: Vec<FieldSpec>,
}

/// Submit one record against a form.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitRecordCommand {
    pub form_id: EntityId,
    pub entries: Vec<FieldInput>,
}

/// Partially update a record, upserting by field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateRecordCommand {
    pub record_id: EntityId,
    pub entries: Vec<FieldInput>,
}

/// A record joined back to its form's field metadata for display.
#[derive(Clone, Debug, Serialize)]
pub struct RecordView {
    pub id: EntityId,
    pub form_id: EntityId,
    pub created_at: DateTime<Utc>,
    /// In form display order; fields without a stored value are omitted.
    pub values: Vec<FieldValueView>,
}

/// One stored value with its field's label and type resolved.
#[derive(Clone, Debug, Serialize)]
pub struct FieldValueView {
    pub field_id: EntityId,
    pub label: String,
    pub field_type: FieldType,
    pub value: String,
}

impl RecordView {
    /// Join stored values to field labels and types, in form display order.
    pub fn project(record: &Record, form: &Form) -> Self {
        let values = form
            .fields()
            .iter()
            .filter_map(|field| {
                record.value_for(&field.id).map(|value| FieldValueView {
                    field_id: field.id.clone(),
                    label: field.label.clone(),
                    field_type: field.field_type,
                    value: value.to_string(),
                })
            })
            .collect();

        Self {
            id: record.id().clone(),
            form_id: record.form_id().clone(),
            created_at: record.created_at(),
            values,
        }
    }

    /// Stored text for a field, looked up by label.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.label == label)
            .map(|v| v.value.as_str())
    }

    /// JSON shape handed to the calling layer.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
