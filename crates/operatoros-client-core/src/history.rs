use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub prompt: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("history storage read failed: {0}")]
    Read(String),
    #[error("history storage write failed: {0}")]
    Write(String),
    #[error("history encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key/value string storage, shaped after `window.localStorage`.
pub trait HistoryStorage {
    type Error: fmt::Display;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;
    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error>;
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// In-process storage for native builds and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage
            .items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        storage
    }
}

impl HistoryStorage for MemoryStorage {
    type Error = std::convert::Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Bounded prompt/response log mirrored into [`HistoryStorage`].
///
/// The in-memory sequence is authoritative. A failed write leaves it updated
/// and reports the error so the caller can log it.
#[derive(Debug)]
pub struct HistoryStore<S> {
    storage: S,
    key: String,
    limit: usize,
    entries: VecDeque<HistoryEntry>,
}

impl<S: HistoryStorage> HistoryStore<S> {
    /// Opens the store and hydrates it from whatever is persisted.
    pub fn open(storage: S, key: impl Into<String>, limit: usize) -> Self {
        let mut store = Self {
            storage,
            key: key.into(),
            limit: limit.max(1),
            entries: VecDeque::new(),
        };
        let mut loaded = store.load();
        let overflow = loaded.len().saturating_sub(store.limit);
        store.entries = loaded.drain(overflow..).collect();
        store
    }

    pub fn append(
        &mut self,
        prompt: impl Into<String>,
        response: impl Into<String>,
    ) -> Result<(), StorageError> {
        self.append_at(prompt, response, Utc::now())
    }

    pub fn append_at(
        &mut self,
        prompt: impl Into<String>,
        response: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.entries.push_back(HistoryEntry {
            prompt: prompt.into(),
            response: response.into(),
            timestamp,
        });
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.persist()
    }

    /// Reads the persisted sequence. Missing or corrupt data yields an empty
    /// sequence.
    pub fn load(&self) -> Vec<HistoryEntry> {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "history read failed; treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(entries) => entries,
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "persisted history is corrupt; treating as empty");
                Vec::new()
            }
        }
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.storage
            .remove(&self.key)
            .map_err(|error| StorageError::Write(error.to_string()))
    }

    pub fn entries(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    fn persist(&self) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(&self.entries)?;
        self.storage
            .write(&self.key, &serialized)
            .map_err(|error| StorageError::Write(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const KEY: &str = "aiResponseHistory";

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn history_is_capped_with_oldest_evicted_first() {
        let mut store = HistoryStore::open(MemoryStorage::new(), KEY, 50);
        for index in 0..55 {
            store
                .append_at(format!("prompt {index}"), "reply", at(index))
                .expect("append");
        }

        assert_eq!(store.len(), 50);
        let prompts: Vec<_> = store.entries().map(|entry| entry.prompt.clone()).collect();
        assert_eq!(prompts.first().map(String::as_str), Some("prompt 5"));
        assert_eq!(prompts.last().map(String::as_str), Some("prompt 54"));
        assert_eq!(store.load().len(), 50);
    }

    #[test]
    fn append_then_load_round_trips_in_order() {
        let mut store = HistoryStore::open(MemoryStorage::new(), KEY, 50);
        store.append_at("first", "one", at(0)).expect("append");
        store.append_at("second", "two", at(1)).expect("append");

        let loaded = store.load();
        let in_memory: Vec<_> = store.entries().cloned().collect();
        assert_eq!(loaded, in_memory);
        assert_eq!(loaded[0].prompt, "first");
        assert_eq!(loaded[1].response, "two");
    }

    #[test]
    fn clear_empties_memory_and_storage() {
        let mut store = HistoryStore::open(MemoryStorage::new(), KEY, 50);
        store.append_at("prompt", "reply", at(0)).expect("append");
        store.clear().expect("clear");

        assert!(store.is_empty());
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_payload_loads_as_empty() {
        let store = HistoryStore::open(MemoryStorage::with_item(KEY, "{not json"), KEY, 50);
        assert!(store.is_empty());
        assert!(store.load().is_empty());
    }

    #[test]
    fn open_hydrates_and_trims_to_limit() {
        let persisted = serde_json::to_string(&[
            HistoryEntry {
                prompt: "old".to_string(),
                response: "a".to_string(),
                timestamp: at(0),
            },
            HistoryEntry {
                prompt: "new".to_string(),
                response: "b".to_string(),
                timestamp: at(1),
            },
        ])
        .expect("encode");
        let store = HistoryStore::open(MemoryStorage::with_item(KEY, &persisted), KEY, 1);

        let prompts: Vec<_> = store.entries().map(|entry| entry.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["new"]);
    }

    struct ReadOnlyStorage;

    impl HistoryStorage for ReadOnlyStorage {
        type Error = &'static str;

        fn read(&self, _key: &str) -> Result<Option<String>, Self::Error> {
            Ok(None)
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), Self::Error> {
            Err("QuotaExceededError")
        }

        fn remove(&self, _key: &str) -> Result<(), Self::Error> {
            Err("QuotaExceededError")
        }
    }

    #[test]
    fn failed_write_keeps_the_in_memory_entry() {
        let mut store = HistoryStore::open(ReadOnlyStorage, KEY, 50);

        let error = store
            .append_at("prompt", "reply", at(0))
            .expect_err("write should fail");

        assert!(matches!(error, StorageError::Write(ref reason) if reason == "QuotaExceededError"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries().next().map(|entry| entry.prompt.as_str()), Some("prompt"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn timestamps_persist_as_iso_strings() {
        let mut store = HistoryStore::open(MemoryStorage::new(), KEY, 50);
        store.append_at("p", "r", at(0)).expect("append");
        let raw = store
            .storage
            .read(KEY)
            .expect("read")
            .expect("persisted value");
        assert!(raw.contains("\"timestamp\":\"2023-11-14T22:13:20Z\""));
    }
}
