//! Aggregate roots: `Form` (the schema) and `Record` (one submission).

pub mod form;
pub mod record;

pub use form::Form;
pub use record::{FieldValue, Record};
