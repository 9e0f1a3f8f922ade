//! JSON persistence over a key-value backend
//!
//! Features:
//! - One JSON document per store key
//! - `Result`-returning load/save helpers
//! - Best-effort [`Persisted`] cell: failures are logged and recorded as
//!   [`Diagnostic`]s, never propagated; the in-memory value stays authoritative

use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::observe::{Observable, ObserverId};
use crate::platform::{KeyValueStore, StorageError};

/// Errors from loading or saving a persisted document
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shared handle to the storage backend
pub type SharedStorage = Rc<dyn KeyValueStore>;

/// Read and decode the document at `key`. `Ok(None)` when nothing is stored.
pub fn load<T: DeserializeOwned>(
    storage: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, PersistError> {
    match storage.get_item(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and write `value` at `key`
pub fn save<T: Serialize>(
    storage: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), PersistError> {
    let json = serde_json::to_string(value)?;
    storage.set_item(key, &json)?;
    Ok(())
}

/// Which direction a persistence failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOp {
    Load,
    Save,
}

/// A swallowed persistence failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub key: &'static str,
    pub op: PersistOp,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.op {
            PersistOp::Load => "loading",
            PersistOp::Save => "saving",
        };
        write!(f, "error {} {}: {}", op, self.key, self.message)
    }
}

/// Observable value mirrored to one storage key
pub struct Persisted<T> {
    key: &'static str,
    storage: SharedStorage,
    subject: Observable<T>,
    diagnostics: Vec<Diagnostic>,
}

impl<T: Serialize + DeserializeOwned> Persisted<T> {
    /// Load the stored value, falling back to `fallback()` if the document is
    /// missing or unreadable. Returns whether a stored document was used.
    pub fn load_or(
        key: &'static str,
        storage: SharedStorage,
        fallback: impl FnOnce() -> T,
    ) -> (Self, bool) {
        let mut diagnostics = Vec::new();
        let (value, found) = match load::<T>(storage.as_ref(), key) {
            Ok(Some(value)) => {
                log::info!("Loaded {} from storage", key);
                (value, true)
            }
            Ok(None) => {
                log::info!("No stored {}, starting fresh", key);
                (fallback(), false)
            }
            Err(err) => {
                log::error!("Error loading {} from storage: {}", key, err);
                diagnostics.push(Diagnostic {
                    key,
                    op: PersistOp::Load,
                    message: err.to_string(),
                });
                (fallback(), false)
            }
        };

        let cell = Self {
            key,
            storage,
            subject: Observable::new(value),
            diagnostics,
        };
        (cell, found)
    }

    pub fn get(&self) -> &T {
        self.subject.get()
    }

    /// Replace the value, notify observers, then write it through
    pub fn set(&mut self, value: T) {
        self.subject.set(value);
        self.persist();
    }

    /// Mutate in place, notify observers, then write it through
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        self.subject.update(f);
        self.persist();
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&T) + 'static) -> ObserverId {
        self.subject.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.subject.unsubscribe(id)
    }

    /// Every swallowed failure so far, oldest first
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn persist(&mut self) {
        match save(self.storage.as_ref(), self.key, self.subject.get()) {
            Ok(()) => log::debug!("Saved {}", self.key),
            Err(err) => {
                log::error!("Error saving {} to storage: {}", self.key, err);
                self.diagnostics.push(Diagnostic {
                    key: self.key,
                    op: PersistOp::Save,
                    message: err.to_string(),
                });
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Persisted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persisted")
            .field("key", &self.key)
            .field("value", self.subject.get())
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;

    #[test]
    fn test_load_missing_is_none() {
        let storage = MemoryStorage::new();
        let value: Option<Vec<u32>> = load(&storage, "nums").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_load_corrupt_is_json_error() {
        let storage = MemoryStorage::new();
        storage.put_raw("nums", "{not json");
        let err = load::<Vec<u32>>(&storage, "nums").unwrap_err();
        assert!(matches!(err, PersistError::Json(_)));
    }

    #[test]
    fn test_persisted_falls_back_and_records_diagnostic() {
        let storage = MemoryStorage::new();
        storage.put_raw("nums", "[1, \"two\"]");
        let (cell, found) = Persisted::<Vec<u32>>::load_or("nums", Rc::new(storage), Vec::new);
        assert!(!found);
        assert!(cell.get().is_empty());
        assert_eq!(cell.diagnostics().len(), 1);
        assert_eq!(cell.diagnostics()[0].op, PersistOp::Load);
    }

    #[test]
    fn test_persisted_write_failure_keeps_memory_value() {
        let storage = MemoryStorage::new();
        let (mut cell, _) =
            Persisted::<Vec<u32>>::load_or("nums", Rc::new(storage.clone()), Vec::new);

        cell.set(vec![1]);
        assert_eq!(storage.raw("nums").as_deref(), Some("[1]"));

        storage.set_fail_writes(true);
        cell.update(|v| v.push(2));
        assert_eq!(cell.get(), &vec![1, 2]);
        assert_eq!(storage.raw("nums").as_deref(), Some("[1]"));
        assert_eq!(cell.diagnostics().len(), 1);
        assert_eq!(cell.diagnostics()[0].op, PersistOp::Save);

        storage.set_fail_writes(false);
        cell.update(|v| v.push(3));
        assert_eq!(storage.raw("nums").as_deref(), Some("[1,2,3]"));
    }
}
