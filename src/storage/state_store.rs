// src/storage/state_store.rs
//! Ledger state store abstraction.
//!
//! The registry owns no persistent state of its own; everything lives behind
//! this trait, supplied by the hosting ledger. Keeping it a trait lets the
//! core logic run unchanged against the real ledger or the in-memory fake
//! used in tests.

/// Failure surfaced by the underlying state store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The backing store reported an I/O or transaction failure
    #[error("state store failure: {0}")]
    Backend(String),

    /// A range-scan cursor was read after being closed
    #[error("range scan cursor is closed")]
    CursorClosed,
}

/// Forward-only cursor over a key range.
///
/// The cursor is lazy, finite, and non-restartable. Callers must invoke
/// [`close`](StateIterator::close) when consumption ends, including on early
/// abort, so the store can release whatever server-side resources back the
/// scan.
pub trait StateIterator {
    /// Advances the cursor.
    ///
    /// # Returns
    /// - `Ok(Some((key, value)))` for the next entry in key order
    /// - `Ok(None)` once the range is exhausted
    /// - `Err` if iteration fails or the cursor was already closed
    fn next_entry(&mut self) -> Result<Option<(String, Vec<u8>)>, StoreError>;

    /// Releases the cursor. Further reads fail with `CursorClosed`.
    fn close(&mut self);
}

/// Ordered key-value capability set consumed from the ledger collaborator.
///
/// Keys are strings ordered lexicographically; values are opaque bytes.
/// Conflict serialization between concurrent invocations is the ledger's
/// responsibility, but each single invocation observes its own writes.
pub trait StateStore {
    /// Reads the value under `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Writes `value` under `key`, replacing any existing value.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Removes `key`. Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Opens a cursor over `[start_key, end_key)` in lexicographic order.
    ///
    /// An empty `start_key` or `end_key` means the range is unbounded on
    /// that side; two empty bounds scan the entire namespace.
    fn range_scan(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Box<dyn StateIterator>, StoreError>;
}
