use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::engine::Session;
use crate::record::Record;
use crate::store;
use crate::{Error, KeyedStore, Result, DEFAULT_FILENAME};

enum SessionState {
    Closed,
    Open(Session),
}

/// The explicit-lifecycle policy: one long-lived session across many
/// operations.
///
/// The caller brackets work with [`open`](ManagedStore::open) and
/// [`close`](ManagedStore::close); any operation issued while closed fails
/// fast with [`Error::SessionClosed`]. Writes performed while open reach disk
/// when the session closes, so a handle dropped without `close` loses its
/// pending writes.
///
/// Prefer [`TransactionalStore`](crate::TransactionalStore) when safety and
/// simplicity matter more than per-operation overhead.
pub struct ManagedStore {
    filename: PathBuf,
    state: SessionState,
}

impl ManagedStore {
    /// Creates a closed handle bound to the default container filename in
    /// the working directory. The file is not touched until `open`.
    pub fn new() -> Self {
        Self::with_filename(DEFAULT_FILENAME)
    }

    /// Creates a closed handle bound to `filename`, with the `.db` extension
    /// appended if absent. The path cannot be changed afterwards.
    pub fn with_filename<P: AsRef<Path>>(filename: P) -> Self {
        Self {
            filename: store::normalize_filename(filename),
            state: SessionState::Closed,
        }
    }

    /// Opens the backing container, creating the file if absent. Opening an
    /// already-open store is a no-op that keeps the live session and its
    /// pending writes.
    pub fn open(&mut self) -> Result<()> {
        if matches!(self.state, SessionState::Open(_)) {
            return Ok(());
        }
        self.state = SessionState::Open(Session::open(&self.filename)?);
        Ok(())
    }

    /// Flushes and releases the open session. Closing a closed store is a
    /// precondition violation.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::Open(session) => session.close(),
            SessionState::Closed => Err(Error::SessionClosed),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open(_))
    }

    fn session_mut(&mut self) -> Result<&mut Session> {
        match &mut self.state {
            SessionState::Open(session) => Ok(session),
            SessionState::Closed => Err(Error::SessionClosed),
        }
    }
}

impl Default for ManagedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyedStore for ManagedStore {
    fn try_store(&mut self, key: &str, value: Value) -> Result<()> {
        store::store_record(self.session_mut()?, key, value)
    }

    fn try_get(&mut self, key: &str) -> Result<Value> {
        store::get_record(self.session_mut()?, key)
    }

    fn try_get_all(&mut self) -> Result<Vec<Record>> {
        Ok(store::all_records(self.session_mut()?))
    }

    fn try_delete(&mut self, key: &str) -> Result<()> {
        store::delete_record(self.session_mut()?, key)
    }

    fn try_clear(&mut self) -> Result<()> {
        store::clear_records(self.session_mut()?)
    }

    fn filename(&self) -> &Path {
        &self.filename
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_operations_while_closed_fail_fast() {
        let dir = tempdir().unwrap();
        let mut store = ManagedStore::with_filename(dir.path().join("closed"));

        assert!(matches!(
            store.try_store("k", json!(1)),
            Err(Error::SessionClosed)
        ));
        assert!(matches!(store.try_get("k"), Err(Error::SessionClosed)));
        assert!(matches!(store.try_get_all(), Err(Error::SessionClosed)));
        assert!(matches!(store.try_delete("k"), Err(Error::SessionClosed)));
        assert!(matches!(store.try_clear(), Err(Error::SessionClosed)));
        assert!(matches!(store.close(), Err(Error::SessionClosed)));
    }

    #[test]
    fn test_open_store_close_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("managed.db");

        let mut store = ManagedStore::with_filename(&path);
        store.open().unwrap();
        store.try_store("alpha", json!(42)).unwrap();
        assert_eq!(store.try_get("alpha").unwrap(), json!(42));
        store.close().unwrap();
        assert!(!store.is_open());

        let mut reopened = ManagedStore::with_filename(&path);
        reopened.open().unwrap();
        assert_eq!(reopened.try_get("alpha").unwrap(), json!(42));
        reopened.close().unwrap();
    }

    #[test]
    fn test_reopen_while_open_keeps_pending_writes() {
        let dir = tempdir().unwrap();
        let mut store = ManagedStore::with_filename(dir.path().join("pending"));

        store.open().unwrap();
        store.try_store("k", json!("v")).unwrap();
        store.open().unwrap();
        assert_eq!(store.try_get("k").unwrap(), json!("v"));
        store.close().unwrap();
    }

    #[test]
    fn test_duplicate_key_is_key_exists() {
        let dir = tempdir().unwrap();
        let mut store = ManagedStore::with_filename(dir.path().join("dup"));
        store.open().unwrap();

        store.try_store("k", json!(1)).unwrap();
        assert!(matches!(
            store.try_store("k", json!(2)),
            Err(Error::KeyExists(_))
        ));
        assert_eq!(store.try_get("k").unwrap(), json!(1));
        store.close().unwrap();
    }
}
