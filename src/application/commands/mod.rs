//! Command handlers
//!
//! Application services that orchestrate the use cases over the repository
//! and event publisher ports. Each operation runs to completion as one
//! logical transaction: validation happens before any write, so a rejected
//! payload leaves storage untouched.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::application::dto::{
    CreateFormCommand, RecordView, SubmitRecordCommand, UpdateRecordCommand,
};
use crate::domain::aggregates::{Form, Record};
use crate::domain::events::{DomainEvent, FormEvent, RecordEvent};
use crate::domain::services::{RecordFilter, SubmissionValidator};
use crate::domain::value_objects::EntityId;
use crate::domain::IntegrityError;
use crate::ports::inbound::{FormUseCases, RecordUseCases, UseCaseError};
use crate::ports::outbound::{EventPublisher, FormRepository, RecordRepository};

/// Form authoring application service.
pub struct FormService {
    forms: Arc<dyn FormRepository>,
    records: Arc<dyn RecordRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl FormService {
    pub fn new(
        forms: Arc<dyn FormRepository>,
        records: Arc<dyn RecordRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            forms,
            records,
            event_publisher,
        }
    }
}

#[async_trait]
impl FormUseCases for FormService {
    async fn create_form(&self, command: CreateFormCommand) -> Result<Form, UseCaseError> {
        // Validates name, field count, and per-field rules; nothing is
        // persisted if any field fails.
        let mut form = Form::create(command.name, command.description, command.fields)?;

        self.forms.save(&form).await?;

        let events = form.take_events();
        self.event_publisher.publish(events).await?;

        info!(form_id = %form.id(), fields = form.fields().len(), "form created");
        Ok(form)
    }

    async fn get_form(&self, id: &EntityId) -> Result<Form, UseCaseError> {
        self.forms
            .find_by_id(id)
            .await?
            .ok_or(UseCaseError::NotFound("form"))
    }

    async fn list_forms(&self) -> Result<Vec<Form>, UseCaseError> {
        let forms = self.forms.list().await?;
        debug!(count = forms.len(), "listed forms");
        Ok(forms)
    }

    async fn delete_form(&self, id: &EntityId) -> Result<(), UseCaseError> {
        if self.forms.find_by_id(id).await?.is_none() {
            return Err(UseCaseError::NotFound("form"));
        }

        // Explicit cascade: records first, then the form itself.
        let records_removed = self.records.delete_by_form(id).await?;
        self.forms.delete(id).await?;

        self.event_publisher
            .publish(vec![DomainEvent::Form(FormEvent::Deleted {
                form_id: id.clone(),
                records_removed,
            })])
            .await?;

        info!(form_id = %id, records_removed, "form deleted");
        Ok(())
    }
}

/// Record submission and query application service.
pub struct RecordService {
    forms: Arc<dyn FormRepository>,
    records: Arc<dyn RecordRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RecordService {
    pub fn new(
        forms: Arc<dyn FormRepository>,
        records: Arc<dyn RecordRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            forms,
            records,
            event_publisher,
        }
    }

    /// Reject any entry whose field exists but belongs to another form.
    ///
    /// Fields the store has never seen fall through to the validator, which
    /// reports them as unknown.
    async fn check_field_ownership(
        &self,
        form: &Form,
        field_ids: impl Iterator<Item = &EntityId>,
    ) -> Result<(), UseCaseError> {
        for field_id in field_ids {
            if form.field(field_id).is_some() {
                continue;
            }
            if self.forms.find_by_field(field_id).await?.is_some() {
                return Err(IntegrityError::FieldMismatch {
                    field_id: field_id.clone(),
                    form_id: form.id().clone(),
                }
                .into());
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RecordUseCases for RecordService {
    async fn submit_record(&self, command: SubmitRecordCommand) -> Result<RecordView, UseCaseError> {
        let form = self
            .forms
            .find_by_id(&command.form_id)
            .await?
            .ok_or(UseCaseError::NotFound("form"))?;

        self.check_field_ownership(&form, command.entries.iter().map(|e| &e.field_id))
            .await?;

        // Batch-atomic: any violation aborts before the record exists.
        let accepted = SubmissionValidator::validate(&form, &command.entries)?;

        let mut record = Record::create(form.id().clone(), accepted);
        self.records.save(&record).await?;

        let events = record.take_events();
        self.event_publisher.publish(events).await?;

        info!(record_id = %record.id(), form_id = %form.id(), values = record.values().len(), "record submitted");
        Ok(RecordView::project(&record, &form))
    }

    async fn get_record(&self, id: &EntityId) -> Result<RecordView, UseCaseError> {
        let record = self
            .records
            .find_by_id(id)
            .await?
            .ok_or(UseCaseError::NotFound("record"))?;
        let form = self
            .forms
            .find_by_id(record.form_id())
            .await?
            .ok_or(UseCaseError::NotFound("form"))?;

        Ok(RecordView::project(&record, &form))
    }

    async fn list_records(
        &self,
        form_id: &EntityId,
        filter: &RecordFilter,
    ) -> Result<Vec<RecordView>, UseCaseError> {
        let form = self
            .forms
            .find_by_id(form_id)
            .await?
            .ok_or(UseCaseError::NotFound("form"))?;

        let records = self.records.find_by_form(form_id).await?;
        let views: Vec<RecordView> = records
            .iter()
            .filter(|r| filter.matches(r))
            .map(|r| RecordView::project(r, &form))
            .collect();

        debug!(form_id = %form_id, predicates = filter.len(), matched = views.len(), "queried records");
        Ok(views)
    }

    async fn update_record(&self, command: UpdateRecordCommand) -> Result<RecordView, UseCaseError> {
        let mut record = self
            .records
            .find_by_id(&command.record_id)
            .await?
            .ok_or(UseCaseError::NotFound("record"))?;
        let form = self
            .forms
            .find_by_id(record.form_id())
            .await?
            .ok_or(UseCaseError::NotFound("form"))?;

        // Update is deliberately permissive about required/type rules, but a
        // value may only ever reference a field of the record's own form.
        for entry in &command.entries {
            if form.field(&entry.field_id).is_none() {
                return Err(IntegrityError::FieldMismatch {
                    field_id: entry.field_id.clone(),
                    form_id: form.id().clone(),
                }
                .into());
            }
        }

        record.apply(command.entries);
        self.records.save(&record).await?;

        let events = record.take_events();
        self.event_publisher.publish(events).await?;

        debug!(record_id = %record.id(), "record updated");
        Ok(RecordView::project(&record, &form))
    }

    async fn delete_record(&self, id: &EntityId) -> Result<(), UseCaseError> {
        let record = self
            .records
            .find_by_id(id)
            .await?
            .ok_or(UseCaseError::NotFound("record"))?;

        self.records.delete(id).await?;

        self.event_publisher
            .publish(vec![DomainEvent::Record(RecordEvent::Deleted {
                record_id: id.clone(),
                form_id: record.form_id().clone(),
            })])
            .await?;

        info!(record_id = %id, "record deleted");
        Ok(())
    }
}
