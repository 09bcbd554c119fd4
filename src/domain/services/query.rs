//! Query/Filter Engine
//!
//! Matches records against per-field substring predicates without needing a
//! relational schema per form. Predicates are conjunctive; matching is
//! case-insensitive.

use std::collections::HashMap;

use crate::domain::aggregates::Record;
use crate::domain::value_objects::EntityId;

/// A set of `(field, substring pattern)` predicates.
///
/// A record matches iff, for every predicate, it holds a value for that
/// field whose text contains the pattern. An empty filter matches every
/// record of the form.
#[derive(Clone, Debug, Default)]
pub struct RecordFilter {
    /// Patterns, lowercased on insert.
    patterns: HashMap<EntityId, String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate. Blank patterns are ignored, matching the behavior of
    /// an empty search box.
    pub fn add(&mut self, field_id: EntityId, pattern: impl AsRef<str>) {
        let pattern = pattern.as_ref().trim();
        if pattern.is_empty() {
            return;
        }
        self.patterns.insert(field_id, pattern.to_lowercase());
    }

    /// Builder-style `add`.
    pub fn with(mut self, field_id: EntityId, pattern: impl AsRef<str>) -> Self {
        self.add(field_id, pattern);
        self
    }

    /// Parse request parameters of the form `field_<id>=<pattern>`.
    ///
    /// Keys without the prefix or with an unparsable id are skipped; this is
    /// a boundary convenience, not a validation step.
    pub fn from_params<K, V>(params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = Self::new();
        for (key, value) in params {
            let Some(raw_id) = key.as_ref().strip_prefix("field_") else {
                continue;
            };
            let Ok(field_id) = raw_id.parse::<EntityId>() else {
                continue;
            };
            filter.add(field_id, value);
        }
        filter
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Conjunctive match over the record's stored text values. A record
    /// lacking a value for a filtered field does not match.
    pub fn matches(&self, record: &Record) -> bool {
        self.patterns.iter().all(|(field_id, pattern)| {
            record
                .value_for(field_id)
                .is_some_and(|value| value.to_lowercase().contains(pattern))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{AcceptedValue, FieldScalar};

    fn record_with(values: &[(&EntityId, &str)]) -> Record {
        Record::create(
            EntityId::new(),
            values
                .iter()
                .map(|(id, v)| AcceptedValue {
                    field_id: (*id).clone(),
                    value: FieldScalar::Text((*v).to_string()),
                })
                .collect(),
        )
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let record = record_with(&[]);
        assert!(RecordFilter::new().matches(&record));
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let field = EntityId::new();
        let record = record_with(&[(&field, "Engineering")]);

        assert!(RecordFilter::new().with(field.clone(), "eng").matches(&record));
        assert!(RecordFilter::new().with(field.clone(), "NEER").matches(&record));
        assert!(!RecordFilter::new().with(field, "sales").matches(&record));
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let a = EntityId::new();
        let b = EntityId::new();
        let record = record_with(&[(&a, "alpha"), (&b, "beta")]);

        let both = RecordFilter::new()
            .with(a.clone(), "alp")
            .with(b.clone(), "bet");
        assert!(both.matches(&record));

        let one_wrong = RecordFilter::new().with(a, "alp").with(b, "gamma");
        assert!(!one_wrong.matches(&record));
    }

    #[test]
    fn test_missing_value_does_not_match() {
        let present = EntityId::new();
        let absent = EntityId::new();
        let record = record_with(&[(&present, "x")]);

        assert!(!RecordFilter::new().with(absent, "x").matches(&record));
    }

    #[test]
    fn test_blank_pattern_ignored() {
        let filter = RecordFilter::new().with(EntityId::new(), "   ");
        assert!(filter.is_empty());
    }

    #[test]
    fn test_from_params() {
        let field = EntityId::new();
        let params = [
            (format!("field_{field}"), "eng".to_string()),
            ("field_not-a-uuid".to_string(), "x".to_string()),
            ("page".to_string(), "2".to_string()),
            (format!("field_{}", EntityId::new()), "  ".to_string()),
        ];

        let filter = RecordFilter::from_params(params.iter().map(|(k, v)| (k, v)));
        assert_eq!(filter.len(), 1);

        let record = record_with(&[(&field, "Engineering")]);
        assert!(filter.matches(&record));
    }
}
