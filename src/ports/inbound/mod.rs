//! Inbound ports (Use case traits)
//!
//! Application service interfaces consumed by the calling layer (UI or API).
//! Errors come back as structured values; rendering them is the caller's
//! job, and the core never retries.

use async_trait::async_trait;
use thiserror::Error;

use crate::application::dto::{
    CreateFormCommand, RecordView, SubmitRecordCommand, UpdateRecordCommand,
};
use crate::domain::aggregates::Form;
use crate::domain::services::RecordFilter;
use crate::domain::value_objects::EntityId;
use crate::domain::{IntegrityError, ValidationError};
use crate::ports::outbound::RepositoryError;

/// Form authoring use cases.
#[async_trait]
pub trait FormUseCases: Send + Sync {
    /// Create a form with its fields in one atomic unit.
    async fn create_form(&self, command: CreateFormCommand) -> Result<Form, UseCaseError>;

    /// Fetch a form, fields in display order.
    async fn get_form(&self, id: &EntityId) -> Result<Form, UseCaseError>;

    /// All forms, newest first.
    async fn list_forms(&self) -> Result<Vec<Form>, UseCaseError>;

    /// Delete a form, cascading to its records and their values.
    async fn delete_form(&self, id: &EntityId) -> Result<(), UseCaseError>;
}

/// Record submission and query use cases.
#[async_trait]
pub trait RecordUseCases: Send + Sync {
    /// Validate and persist one submission against a form.
    async fn submit_record(&self, command: SubmitRecordCommand) -> Result<RecordView, UseCaseError>;

    /// Fetch a record with values joined to field labels and types.
    async fn get_record(&self, id: &EntityId) -> Result<RecordView, UseCaseError>;

    /// Records of a form matching every filter predicate.
    async fn list_records(
        &self,
        form_id: &EntityId,
        filter: &RecordFilter,
    ) -> Result<Vec<RecordView>, UseCaseError>;

    /// Partial update: upsert the listed fields, leave the rest untouched.
    async fn update_record(&self, command: UpdateRecordCommand) -> Result<RecordView, UseCaseError>;

    /// Delete a record and its values.
    async fn delete_record(&self, id: &EntityId) -> Result<(), UseCaseError>;
}

/// Error taxonomy surfaced at the use case boundary.
#[derive(Debug, Clone, Error)]
pub enum UseCaseError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    /// Reserved for optimistic locking; nothing raises it today.
    #[error("conflicting concurrent update")]
    Conflict,

    #[error("repository error: {0}")]
    Repository(String),
}

impl From<RepositoryError> for UseCaseError {
    fn from(err: RepositoryError) -> Self {
        Self::Repository(err.to_string())
    }
}
