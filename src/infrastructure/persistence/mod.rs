//! In-memory repository implementations.
//!
//! Concurrent-map backed stores; a sequence counter preserves insertion
//! order across the unordered maps.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::aggregates::{Form, Record};
use crate::domain::value_objects::EntityId;
use crate::domain::DomainEvent;
use crate::ports::outbound::{
    EventPublisher, FormRepository, RecordRepository, RepositoryError,
};

/// In-memory form repository.
#[derive(Default)]
pub struct InMemoryFormRepository {
    forms: DashMap<EntityId, (u64, Form)>,
    seq: AtomicU64,
}

impl InMemoryFormRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    fn seq_for(&self, id: &EntityId) -> u64 {
        self.forms
            .get(id)
            .map(|entry| entry.value().0)
            .unwrap_or_else(|| self.seq.fetch_add(1, Ordering::Relaxed))
    }
}

#[async_trait]
impl FormRepository for InMemoryFormRepository {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Form>, RepositoryError> {
        Ok(self.forms.get(id).map(|entry| entry.value().1.clone()))
    }

    async fn find_by_field(&self, field_id: &EntityId) -> Result<Option<Form>, RepositoryError> {
        Ok(self
            .forms
            .iter()
            .find(|entry| entry.value().1.field(field_id).is_some())
            .map(|entry| entry.value().1.clone()))
    }

    async fn list(&self) -> Result<Vec<Form>, RepositoryError> {
        let mut entries: Vec<(u64, Form)> = self
            .forms
            .iter()
            .map(|entry| (entry.value().0, entry.value().1.clone()))
            .collect();
        // Newest first; the sequence breaks same-instant timestamp ties.
        entries.sort_by(|a, b| {
            b.1.created_at()
                .cmp(&a.1.created_at())
                .then(b.0.cmp(&a.0))
        });
        Ok(entries.into_iter().map(|(_, form)| form).collect())
    }

    async fn save(&self, form: &Form) -> Result<(), RepositoryError> {
        let seq = self.seq_for(form.id());
        self.forms.insert(form.id().clone(), (seq, form.clone()));
        Ok(())
    }

    async fn delete(&self, id: &EntityId) -> Result<(), RepositoryError> {
        self.forms.remove(id);
        Ok(())
    }
}

/// In-memory record repository.
#[derive(Default)]
pub struct InMemoryRecordRepository {
    records: DashMap<EntityId, (u64, Record)>,
    seq: AtomicU64,
}

impl InMemoryRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn seq_for(&self, id: &EntityId) -> u64 {
        self.records
            .get(id)
            .map(|entry| entry.value().0)
            .unwrap_or_else(|| self.seq.fetch_add(1, Ordering::Relaxed))
    }
}

#[async_trait]
impl RecordRepository for InMemoryRecordRepository {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Record>, RepositoryError> {
        Ok(self.records.get(id).map(|entry| entry.value().1.clone()))
    }

    async fn find_by_form(&self, form_id: &EntityId) -> Result<Vec<Record>, RepositoryError> {
        let mut entries: Vec<(u64, Record)> = self
            .records
            .iter()
            .filter(|entry| entry.value().1.form_id() == form_id)
            .map(|entry| (entry.value().0, entry.value().1.clone()))
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        Ok(entries.into_iter().map(|(_, record)| record).collect())
    }

    async fn save(&self, record: &Record) -> Result<(), RepositoryError> {
        let seq = self.seq_for(record.id());
        self.records.insert(record.id().clone(), (seq, record.clone()));
        Ok(())
    }

    async fn delete(&self, id: &EntityId) -> Result<(), RepositoryError> {
        self.records.remove(id);
        Ok(())
    }

    async fn delete_by_form(&self, form_id: &EntityId) -> Result<u64, RepositoryError> {
        let doomed: Vec<EntityId> = self
            .records
            .iter()
            .filter(|entry| entry.value().1.form_id() == form_id)
            .map(|entry| entry.key().clone())
            .collect();
        let removed = doomed.len() as u64;
        for id in doomed {
            self.records.remove(&id);
        }
        Ok(removed)
    }
}

/// Event publisher that drops everything.
#[derive(Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Event publisher that buffers everything, for inspection in tests.
#[derive(Default)]
pub struct CapturingEventPublisher {
    events: Mutex<Vec<DomainEvent>>,
}

impl CapturingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything published so far.
    pub fn drain(&self) -> Vec<DomainEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(_) => Vec::new(),
        }
    }
}

#[async_trait]
impl EventPublisher for CapturingEventPublisher {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        self.events
            .lock()
            .map_err(|_| RepositoryError::Storage("event buffer poisoned".into()))?
            .extend(events);
        Ok(())
    }
}
