//! Stateless domain services: submission validation and record filtering.

pub mod query;
pub mod validation;

pub use query::RecordFilter;
pub use validation::SubmissionValidator;
