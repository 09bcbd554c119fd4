//! Email Value Object
//!
//! Immutable, validated email address. Normalized to trimmed lowercase so
//! stored values compare cleanly.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Validated email address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("email address is empty")]
    Empty,

    #[error("not a valid email address")]
    Malformed,
}

impl Email {
    /// Parse and normalize an address.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, EmailError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }

        let normalized = trimmed.to_lowercase();
        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(EmailError::Malformed);
        };

        let domain_ok = !domain.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.');

        if local.is_empty() || !domain_ok {
            return Err(EmailError::Malformed);
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Part after the `@`.
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map(|(_, d)| d).unwrap_or("")
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
