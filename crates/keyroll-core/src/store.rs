//! The record store: canonical owner of the record list.

use crate::models::{Record, RecordPatch};
use crate::persistence::Persistence;
use anyhow::Result;
use thiserror::Error;

/// Errors raised by the record store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record with id {0} already exists")]
    DuplicateId(u64),
    #[error("no record ids left to assign")]
    IdsExhausted,
}

/// A change notification delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// The whole list was replaced from persistence.
    Loaded,
    Added(u64),
    Updated(u64),
    Removed(u64),
}

/// Handle returned by [`RecordStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(StoreEvent, &[Record])>;

/// Ordered list of records with change subscription and an optional
/// persistence hook.
#[derive(Default)]
pub struct RecordStore {
    records: Vec<Record>,
    /// Highest id seen in this session, including deleted records.
    highest_id: Option<u64>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    persistence: Option<Box<dyn Persistence>>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("records", &self.records)
            .field("highest_id", &self.highest_id)
            .field("listeners", &self.listeners.len())
            .field("persistent", &self.persistence.is_some())
            .finish()
    }
}

impl RecordStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `records`, without persistence.
    pub fn with_records(records: Vec<Record>) -> Self {
        let mut store = Self::new();
        store.replace_all(records);
        store
    }

    /// Open a store over `persistence`, loading its records once.
    ///
    /// Every later mutation is saved back through the hook.
    pub fn open(persistence: Box<dyn Persistence>) -> Result<Self> {
        let records = persistence.load()?;
        let mut store = Self::with_records(records);
        store.persistence = Some(persistence);
        Ok(store)
    }

    fn replace_all(&mut self, mut records: Vec<Record>) {
        // Keep the first record for any repeated id.
        let mut seen = std::collections::HashSet::new();
        records.retain(|record| {
            let fresh = seen.insert(record.id);
            if !fresh {
                tracing::warn!("Dropping record with repeated id {}", record.id);
            }
            fresh
        });
        self.highest_id = records.iter().map(|r| r.id).max();
        self.records = records;
        self.notify(StoreEvent::Loaded);
    }

    /// All records in display order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The id the next added record should use: one greater than the
    /// current maximum, `0` when empty, and never an id used earlier in
    /// this session. Fails once `u64::MAX` has been used.
    pub fn next_id(&self) -> Result<u64, StoreError> {
        match self.highest_id {
            None => Ok(0),
            Some(id) => id.checked_add(1).ok_or(StoreError::IdsExhausted),
        }
    }

    /// Append a record. The caller supplies the id.
    pub fn add(&mut self, record: Record) -> Result<(), StoreError> {
        if self.get_by_id(record.id).is_some() {
            return Err(StoreError::DuplicateId(record.id));
        }
        let id = record.id;
        self.highest_id = self.highest_id.max(Some(id));
        self.records.push(record);
        tracing::debug!("Added record {}", id);
        self.changed(StoreEvent::Added(id));
        Ok(())
    }

    /// Merge `patch` into the record with `id`. Returns `false` when no such
    /// record exists.
    pub fn update(&mut self, id: u64, patch: RecordPatch) -> bool {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            tracing::debug!("Update for unknown record {} ignored", id);
            return false;
        };
        record.apply(patch);
        tracing::debug!("Updated record {}", id);
        self.changed(StoreEvent::Updated(id));
        true
    }

    /// Remove the record with `id`, returning it if it existed.
    pub fn remove(&mut self, id: u64) -> Option<Record> {
        let index = self.records.iter().position(|r| r.id == id)?;
        let record = self.records.remove(index);
        tracing::debug!("Removed record {}", id);
        self.changed(StoreEvent::Removed(id));
        Some(record)
    }

    pub fn get_by_id(&self, id: u64) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Register a listener called after every mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(StoreEvent, &[Record]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn changed(&mut self, event: StoreEvent) {
        if let Some(persistence) = &self.persistence {
            if let Err(e) = persistence.save(&self.records) {
                tracing::warn!("Failed to persist records after {:?}: {:#}", event, e);
            }
        }
        self.notify(event);
    }

    fn notify(&mut self, event: StoreEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event, &self.records);
        }
    }
}
