// src/storage/memory_ledger.rs
//! In-memory ledger state store.
//!
//! Ordered key-value store backing the registry when no external ledger is
//! attached (local runs and tests). Cloning a `MemoryLedger` yields another
//! handle to the same state, so the HTTP layer and a test can observe the
//! same entries.

use crate::storage::state_store::{StateIterator, StateStore, StoreError};
use std::collections::{BTreeMap, VecDeque};
use std::ops::Bound;
use std::sync::{Arc, RwLock};

/// Shared-handle in-memory implementation of [`StateStore`].
///
/// Entries live in a `BTreeMap`, so range scans come back in lexicographic
/// key order. A scan copies the matching window when the cursor is opened:
/// each cursor is a point-in-time snapshot, unaffected by later writes.
#[derive(Clone, Default)]
pub struct MemoryLedger {
    entries: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

#[allow(dead_code)]
impl MemoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        MemoryLedger::default()
    }

    /// Returns the number of stored entries. Test/diagnostic helper.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if the ledger holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StateStore for MemoryLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Backend("ledger lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Backend("ledger lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Backend("ledger lock poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }

    fn range_scan(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Box<dyn StateIterator>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Backend("ledger lock poisoned".into()))?;

        let start = if start_key.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start_key.to_string())
        };
        let end = if end_key.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end_key.to_string())
        };

        let window: VecDeque<(String, Vec<u8>)> = entries
            .range((start, end))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Box::new(MemoryScan {
            window,
            closed: false,
        }))
    }
}

/// Snapshot cursor over a `MemoryLedger` range.
struct MemoryScan {
    window: VecDeque<(String, Vec<u8>)>,
    closed: bool,
}

impl StateIterator for MemoryScan {
    fn next_entry(&mut self) -> Result<Option<(String, Vec<u8>)>, StoreError> {
        if self.closed {
            return Err(StoreError::CursorClosed);
        }
        Ok(self.window.pop_front())
    }

    fn close(&mut self) {
        self.closed = true;
        self.window.clear();
    }
}
