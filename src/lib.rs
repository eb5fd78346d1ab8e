//! Keyhold is a minimal persistent key-value store.
//!
//! Arbitrary JSON values are each bound to a unique string key and survive
//! process restarts through a single on-disk container file. The store
//! deliberately offers no upsert: replacing a key's value means delete, then
//! store again.
//!
//! ## Core Components
//! - [`engine`]: The backing engine adapter (single-file object container).
//! - [`record`]: The stored [`Record`] unit and the [`Template`] match pattern.
//! - [`store`]: The two lifecycle policies, [`ManagedStore`] and
//!   [`TransactionalStore`].
//!
//! ## Lifecycle policies
//! [`ManagedStore`] keeps one session open across many operations; the caller
//! opens and closes explicitly. [`TransactionalStore`] opens and closes a
//! fresh session around every single operation, trading throughput for the
//! guarantee that the file handle never leaks across calls.

pub mod engine;
pub mod record;
pub mod store;

pub use record::{Record, Template};
pub use store::{ManagedStore, TransactionalStore};

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Default container filename used by no-arg construction.
pub const DEFAULT_FILENAME: &str = "keyhold.db";

/// Canonical extension token appended to container filenames that lack it.
pub const DB_EXTENSION: &str = "db";

/// Errors returned by the Keyhold store.
#[derive(Error, Debug)]
pub enum Error {
    /// A record with the given key already exists; nothing was stored.
    #[error("key already present: {0}")]
    KeyExists(String),
    /// No record with the given key exists.
    #[error("key not found: {0}")]
    KeyNotFound(String),
    /// The operation requires an open session, but the store is closed.
    #[error("no open session (call open() first)")]
    SessionClosed,
    /// An I/O error occurred while opening or flushing the container file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error while encoding or decoding container entries.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A specialized Result type for Keyhold operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The keyed operation surface, identical under both lifecycle policies.
///
/// The `try_*` methods are the typed surface: key collisions, misses,
/// closed-session preconditions, and engine faults each come back as a
/// distinct [`Error`]. The unprefixed methods are the compat surface with
/// the classic collapsed signatures: expected outcomes (collision, miss)
/// collapse silently into `false`/`None`, while faults are logged and then
/// collapsed the same way.
pub trait KeyedStore {
    /// Stores `value` under `key` if, and only if, no record with that key
    /// exists. There is no overwrite; delete first to replace a value.
    fn try_store(&mut self, key: &str, value: Value) -> Result<()>;

    /// Retrieves the value stored under `key`.
    fn try_get(&mut self, key: &str) -> Result<Value>;

    /// Returns a snapshot of every record in the container, in no particular
    /// order. Entries in the file that are not exactly record-shaped are
    /// skipped.
    fn try_get_all(&mut self) -> Result<Vec<Record>>;

    /// Deletes the record stored under `key`.
    fn try_delete(&mut self, key: &str) -> Result<()>;

    /// Deletes every entry in the container, record-shaped or not. Not
    /// atomic: a fault partway through leaves a partially-cleared container.
    fn try_clear(&mut self) -> Result<()>;

    /// The normalized container path this handle is bound to. Fixed at
    /// construction.
    fn filename(&self) -> &Path;

    /// Compat [`try_store`](Self::try_store): `true` on success, `false` on
    /// collision or fault. Faults are logged; at the return value they are
    /// indistinguishable from "key already present".
    fn store(&mut self, key: &str, value: Value) -> bool {
        match self.try_store(key, value) {
            Ok(()) => true,
            Err(Error::KeyExists(_)) => false,
            Err(e) => {
                log::error!(
                    "couldn't store element into {}: {}",
                    self.filename().display(),
                    e
                );
                false
            }
        }
    }

    /// Compat [`try_get`](Self::try_get): `None` on miss or fault.
    fn get(&mut self, key: &str) -> Option<Value> {
        match self.try_get(key) {
            Ok(value) => Some(value),
            Err(Error::KeyNotFound(_)) => None,
            Err(e) => {
                log::error!(
                    "couldn't get element from {}: {}",
                    self.filename().display(),
                    e
                );
                None
            }
        }
    }

    /// Compat [`try_get_all`](Self::try_get_all): empty on fault, which is
    /// indistinguishable from an empty container.
    fn get_all(&mut self) -> Vec<Record> {
        match self.try_get_all() {
            Ok(records) => records,
            Err(e) => {
                log::error!(
                    "couldn't get all elements from {}: {}",
                    self.filename().display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Compat [`try_delete`](Self::try_delete): `false` on miss or fault.
    fn delete(&mut self, key: &str) -> bool {
        match self.try_delete(key) {
            Ok(()) => true,
            Err(Error::KeyNotFound(_)) => false,
            Err(e) => {
                log::error!(
                    "couldn't delete element from {}: {}",
                    self.filename().display(),
                    e
                );
                false
            }
        }
    }

    /// Compat [`try_clear`](Self::try_clear): `false` on fault.
    fn clear(&mut self) -> bool {
        match self.try_clear() {
            Ok(()) => true,
            Err(e) => {
                log::error!("couldn't clear {}: {}", self.filename().display(), e);
                false
            }
        }
    }
}
