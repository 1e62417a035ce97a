//! Persistence collaborator.
//!
//! The pipeline only needs two things from storage: a read probe for a key value and an
//! insert that enforces uniqueness itself as a last resort. [`InMemoryStore`] provides both
//! and can be loaded from / saved to a JSON file so the command-line adapter can keep state
//! between runs.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::records::Keyed;

/// Storage contract used by the batch controller.
pub trait RecordStore {
    type Record;

    /// Whether a record with `field == value` already exists.
    fn exists(&self, field: &str, value: &str) -> bool;

    /// Insert a new record, rejecting it if a unique key is already taken.
    fn insert(&mut self, record: Self::Record) -> Result<(), StoreError>;

    /// Number of stored records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A vector-backed store with unique constraints on a fixed set of key fields.
#[derive(Debug, Clone)]
pub struct InMemoryStore<R> {
    records: Vec<R>,
    unique_keys: Vec<String>,
}

impl<R: Keyed> InMemoryStore<R> {
    /// Create an empty store enforcing uniqueness on `unique_keys`.
    pub fn new<K: AsRef<str>>(unique_keys: &[K]) -> Self {
        Self {
            records: Vec::new(),
            unique_keys: unique_keys.iter().map(|k| k.as_ref().to_string()).collect(),
        }
    }

    /// Stored records, in insertion order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }

    fn taken_key(&self, record: &R) -> Option<(String, String)> {
        self.unique_keys.iter().find_map(|field| {
            let value = record.key(field).filter(|v| !v.is_empty())?;
            self.exists(field, value)
                .then(|| (field.clone(), value.to_string()))
        })
    }
}

impl<R: Keyed + DeserializeOwned> InMemoryStore<R> {
    /// Load records from a JSON array file. A missing file yields an empty store.
    ///
    /// Records are loaded through [`RecordStore::insert`], so a file that already violates a
    /// unique key is rejected.
    pub fn load_json<K: AsRef<str>>(path: impl AsRef<Path>, unique_keys: &[K]) -> Result<Self, StoreError> {
        let mut store = Self::new(unique_keys);
        let path = path.as_ref();
        if !path.exists() {
            return Ok(store);
        }
        let text = fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Ok(store);
        }
        let records: Vec<R> = serde_json::from_str(&text)?;
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }
}

impl<R: Serialize> InMemoryStore<R> {
    /// Write all records to `path` as a pretty-printed JSON array.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.records)?;
        fs::write(path, text)?;
        Ok(())
    }
}

impl<R: Keyed> RecordStore for InMemoryStore<R> {
    type Record = R;

    fn exists(&self, field: &str, value: &str) -> bool {
        self.records.iter().any(|r| r.key(field) == Some(value))
    }

    fn insert(&mut self, record: R) -> Result<(), StoreError> {
        if let Some((field, value)) = self.taken_key(&record) {
            return Err(StoreError::UniqueViolation { field, value });
        }
        self.records.push(record);
        Ok(())
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
