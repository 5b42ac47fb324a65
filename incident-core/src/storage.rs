//! Persistent key/value slot holding the serialized incident collection.
//!
//! Storage is best-effort: callers get typed errors here, and the table
//! controller logs and discards them.

use crate::model::Incident;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No storage backend could be reached (private mode, sandboxed frame).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage read failed: {0}")]
    Read(String),

    /// Includes quota exceeded.
    #[error("storage write failed: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A string-keyed, string-valued storage slot such as `window.localStorage`.
pub trait StorageSlot {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// Reads the collection stored under `key`.
///
/// `Ok(None)` when nothing (or an empty string) is stored; malformed JSON is
/// a `Serialization` error.
pub fn load_incidents<S: StorageSlot + ?Sized>(
    storage: &S,
    key: &str,
) -> StorageResult<Option<Vec<Incident>>> {
    match storage.get(key)? {
        Some(raw) if !raw.is_empty() => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Serialization(e.to_string())),
        _ => Ok(None),
    }
}

pub fn save_incidents<S: StorageSlot + ?Sized>(
    storage: &S,
    key: &str,
    incidents: &[Incident],
) -> StorageResult<()> {
    let raw =
        serde_json::to_string(incidents).map_err(|e| StorageError::Serialization(e.to_string()))?;
    storage.set(key, &raw)
}

/// In-process storage. Clones share the same slots, so a handle kept by the
/// caller observes writes made through the table.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    slots: Rc<RefCell<HashMap<String, String>>>,
    fail_reads: Rc<Cell<bool>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one raw value.
    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.slots.borrow_mut().insert(key.to_string(), value.into());
        storage
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.slots.borrow_mut().remove(key)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// Makes subsequent writes fail as if the quota were exhausted.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl StorageSlot for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        if self.fail_reads.get() {
            return Err(StorageError::Read(format!("read of '{key}' refused")));
        }
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes.get() {
            return Err(StorageError::Write(format!("quota exceeded writing '{key}'")));
        }
        self.slots.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;

    #[test]
    fn load_treats_missing_and_empty_as_absent() {
        let storage = MemoryStorage::new();
        assert_eq!(load_incidents(&storage, "incidents"), Ok(None));

        let storage = MemoryStorage::with_value("incidents", "");
        assert_eq!(load_incidents(&storage, "incidents"), Ok(None));
    }

    #[test]
    fn load_reports_malformed_json() {
        let storage = MemoryStorage::with_value("incidents", "{not json");
        let err = load_incidents(&storage, "incidents").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn save_then_load_round_trips() {
        let storage = MemoryStorage::new();
        let list = vec![Incident {
            id: 1,
            kind: "Fire".into(),
            location: "A".into(),
            method: "Sensor".into(),
            time: "t1".into(),
            status: Status::Resolved,
        }];
        save_incidents(&storage, "incidents", &list).expect("save");
        assert_eq!(load_incidents(&storage, "incidents"), Ok(Some(list)));
    }

    #[test]
    fn injected_failures_surface_as_errors() {
        let storage = MemoryStorage::new();
        storage.fail_writes(true);
        assert!(matches!(
            save_incidents(&storage, "incidents", &[]),
            Err(StorageError::Write(_))
        ));
        storage.fail_reads(true);
        assert!(matches!(
            load_incidents(&storage, "incidents"),
            Err(StorageError::Read(_))
        ));
    }

    #[test]
    fn clones_share_slots() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        storage.set("k", "v").expect("set");
        assert_eq!(handle.raw("k").as_deref(), Some("v"));
    }
}
