//! Dynamic form engine.
//!
//! Lets an operator define data-collection forms at runtime and lets callers
//! submit, update, and query structured records against them, with no code
//! change or schema migration per form.
//!
//! ## Architecture
//!
//! - **Domain Layer**: `Form` and `Record` aggregates, validated value
//!   objects, domain events
//! - **Application Layer**: use case orchestration, DTOs
//! - **Ports Layer**: hexagonal architecture interfaces
//! - **Infrastructure Layer**: concrete implementations
//!
//! ## Key Aggregates
//!
//! - **Form**: a user-authored schema of ordered, typed fields
//! - **Record**: one submission against a form, holding one value per field
//!
//! ## Features
//!
//! - Fixed field type registry (text, select, email, number, ...)
//! - Batch-atomic submission validation with a structured error set
//! - Per-field upsert on record update
//! - Conjunctive case-insensitive substring filtering over records
//! - Explicit cascade deletes from form to records

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-exports for convenience
pub use application::dto::{
    CreateFormCommand, FieldValueView, RecordView, SubmitRecordCommand, UpdateRecordCommand,
};
pub use application::{FormService, RecordService};
pub use domain::aggregates::{FieldValue, Form, Record};
pub use domain::events::{DomainEvent, FormEvent, RecordEvent};
pub use domain::services::{RecordFilter, SubmissionValidator};
pub use domain::value_objects::{
    Email, EntityId, Field, FieldInput, FieldScalar, FieldSpec, FieldType,
};
pub use domain::{FieldViolation, IntegrityError, ValidationError};
pub use infrastructure::persistence::{
    CapturingEventPublisher, InMemoryFormRepository, InMemoryRecordRepository, NoOpEventPublisher,
};
pub use ports::inbound::{FormUseCases, RecordUseCases, UseCaseError};
pub use ports::outbound::{EventPublisher, FormRepository, RecordRepository, RepositoryError};
