//! Outbound ports (Repository traits)
//!
//! Interfaces the infrastructure must implement. The core does not lock;
//! concurrent access is serialized by the backing store itself.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::aggregates::{Form, Record};
use crate::domain::value_objects::EntityId;
use crate::domain::DomainEvent;

/// Form definition store port.
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Find a form by id.
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Form>, RepositoryError>;

    /// Find the form that owns a given field, if any. Used to tell a
    /// cross-form reference apart from an unknown field.
    async fn find_by_field(&self, field_id: &EntityId) -> Result<Option<Form>, RepositoryError>;

    /// All forms, newest first.
    async fn list(&self) -> Result<Vec<Form>, RepositoryError>;

    /// Save a form (insert or update), fields included.
    async fn save(&self, form: &Form) -> Result<(), RepositoryError>;

    /// Delete a form. Record cleanup is the caller's explicit concern.
    async fn delete(&self, id: &EntityId) -> Result<(), RepositoryError>;
}

/// Record store port.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Find a record by id.
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Record>, RepositoryError>;

    /// All records of a form, in insertion order.
    async fn find_by_form(&self, form_id: &EntityId) -> Result<Vec<Record>, RepositoryError>;

    /// Save a record (insert or update), values included.
    async fn save(&self, record: &Record) -> Result<(), RepositoryError>;

    /// Delete a record and its values.
    async fn delete(&self, id: &EntityId) -> Result<(), RepositoryError>;

    /// Delete every record of a form; returns how many were removed.
    async fn delete_by_form(&self, form_id: &EntityId) -> Result<u64, RepositoryError>;
}

/// Event publisher port.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish domain events drained from an aggregate.
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError>;
}

/// Repository error type.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("entity not found")]
    NotFound,

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
