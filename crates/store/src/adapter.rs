use std::sync::Arc;

use logship_record::LogRecord;

use crate::kv::KeyValueStore;

/// Presence-checked adapter between the log engine and a key-value store.
///
/// Every operation is a no-op when no store capability was supplied.
/// The persisted value is always a JSON sequence of records and is fully
/// overwritten on each [`store`](LogStore::store) call; accumulation
/// happens in the engine's in-memory buffer, not at the storage layer.
#[derive(Clone)]
pub struct LogStore {
    store: Option<Arc<dyn KeyValueStore>>,
}

impl LogStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store: Some(store) }
    }

    /// An adapter with no backing capability; all operations degrade to
    /// no-ops.
    pub fn unavailable() -> Self {
        Self { store: None }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// Overwrites the value at `key` with the given records.
    pub fn store(&self, key: &str, records: &[LogRecord]) {
        let Some(store) = &self.store else { return };
        match serde_json::to_string(records) {
            Ok(payload) => store.set(key, &payload),
            Err(e) => tracing::warn!(key, error = %e, "failed to serialize log records"),
        }
    }

    /// Persists a single record, coerced into a one-element sequence so the
    /// stored shape is always a sequence.
    pub fn store_one(&self, key: &str, record: &LogRecord) {
        self.store(key, std::slice::from_ref(record));
    }

    /// Reads back the persisted sequence, if any. A value that fails to
    /// parse is treated as absent.
    pub fn load(&self, key: &str) -> Option<Vec<LogRecord>> {
        let store = self.store.as_ref()?;
        let raw = store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(records) => Some(records),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unparseable persisted logs");
                None
            }
        }
    }

    /// Removes the persisted value at `key`.
    pub fn clear(&self, key: &str) {
        if let Some(store) = &self.store {
            store.remove(key);
        }
    }
}
