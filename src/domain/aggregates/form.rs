//! Form Aggregate
//!
//! A user-authored schema describing an ordered set of typed fields. Forms
//! are authored once and read-mostly afterwards; submissions never mutate
//! them.

use chrono::{DateTime, Utc};

use crate::domain::events::{DomainEvent, FormEvent};
use crate::domain::value_objects::{EntityId, Field, FieldSpec};
use crate::domain::ValidationError;

/// Form aggregate root, owning its fields.
#[derive(Clone, Debug)]
pub struct Form {
    id: EntityId,
    name: String,
    description: String,
    /// Sorted by `order` ascending; ties keep authoring order.
    fields: Vec<Field>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

impl Form {
    /// Create a form together with its fields as one atomic unit.
    ///
    /// Fields without an explicit order get their 1-based position. If any
    /// field is invalid, the whole definition is rejected and nothing is
    /// constructed.
    pub fn create(
        name: impl Into<String>,
        description: impl Into<String>,
        specs: Vec<FieldSpec>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if specs.is_empty() {
            return Err(ValidationError::NoFields);
        }

        let mut fields = Vec::with_capacity(specs.len());
        for (index, spec) in specs.into_iter().enumerate() {
            fields.push(Field::from_spec(spec, index as u32 + 1)?);
        }
        // Vec::sort_by_key is stable, so equal orders preserve authoring
        // order.
        fields.sort_by_key(|f| f.order);

        let now = Utc::now();
        let id = EntityId::new();
        let mut form = Self {
            id: id.clone(),
            name: name.clone(),
            description: description.into(),
            fields,
            created_at: now,
            updated_at: now,
            events: vec![],
        };

        form.raise(DomainEvent::Form(FormEvent::Created {
            form_id: id,
            name,
            created_at: now,
        }));

        Ok(form)
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Fields in display order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up one of this form's fields by id.
    pub fn field(&self, field_id: &EntityId) -> Option<&Field> {
        self.fields.iter().find(|f| &f.id == field_id)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Get and clear accumulated domain events.
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn raise(&mut self, event: DomainEvent) {
        self.events.push(event);
    }
}
