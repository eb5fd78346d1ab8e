use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::engine::Session;
use crate::record::Record;
use crate::store;
use crate::{KeyedStore, Result, DEFAULT_FILENAME};

/// The open-per-operation policy: every operation acquires a fresh session
/// and releases it before returning, on success and fault paths alike.
///
/// Construction probes the backing container once, so the file exists on
/// disk immediately afterwards. There is no caller-side lifecycle to manage,
/// at the cost of a full open/flush cycle per operation.
pub struct TransactionalStore {
    filename: PathBuf,
}

impl TransactionalStore {
    /// Creates a store bound to the default container filename in the
    /// working directory, creating the file if absent.
    pub fn new() -> Result<Self> {
        Self::with_filename(DEFAULT_FILENAME)
    }

    /// Creates a store bound to `filename`, with the `.db` extension appended
    /// if absent. The path cannot be changed afterwards; the container file
    /// is created on disk if it does not exist yet.
    pub fn with_filename<P: AsRef<Path>>(filename: P) -> Result<Self> {
        let filename = store::normalize_filename(filename);
        Session::open(&filename)?.close()?;
        Ok(Self { filename })
    }

    /// Runs `f` against a freshly opened session and closes the session on
    /// every exit path. An operation error wins over a close error.
    fn with_session<T>(&self, f: impl FnOnce(&mut Session) -> Result<T>) -> Result<T> {
        let mut session = Session::open(&self.filename)?;
        let result = f(&mut session);
        match session.close() {
            Ok(()) => result,
            Err(close_err) => result.and(Err(close_err)),
        }
    }
}

impl KeyedStore for TransactionalStore {
    fn try_store(&mut self, key: &str, value: Value) -> Result<()> {
        self.with_session(|session| store::store_record(session, key, value))
    }

    fn try_get(&mut self, key: &str) -> Result<Value> {
        self.with_session(|session| store::get_record(session, key))
    }

    fn try_get_all(&mut self) -> Result<Vec<Record>> {
        self.with_session(|session| Ok(store::all_records(session)))
    }

    fn try_delete(&mut self, key: &str) -> Result<()> {
        self.with_session(|session| store::delete_record(session, key))
    }

    fn try_clear(&mut self) -> Result<()> {
        self.with_session(store::clear_records)
    }

    fn filename(&self) -> &Path {
        &self.filename
    }
}
