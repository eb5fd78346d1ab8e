pub mod managed;
pub mod transactional;

pub use managed::ManagedStore;
pub use transactional::TransactionalStore;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::engine::Session;
use crate::record::{Record, Template};
use crate::{Error, Result, DB_EXTENSION};

/// Appends the canonical `.db` extension unless the filename already ends
/// with it. The result is fixed for the lifetime of the store handle.
pub(crate) fn normalize_filename<P: AsRef<Path>>(filename: P) -> PathBuf {
    let path = filename.as_ref();
    // Suffix check rather than Path::extension(): a bare ".db" counts as
    // already normalized, not as a hidden extensionless file.
    let has_suffix = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(&format!(".{DB_EXTENSION}")));
    if has_suffix {
        path.to_path_buf()
    } else {
        let mut name = OsString::from(path.as_os_str());
        name.push(".");
        name.push(DB_EXTENSION);
        PathBuf::from(name)
    }
}

// Operation bodies shared by both lifecycle policies. The policies differ
// only in how they acquire and release the session.

pub(crate) fn store_record(session: &mut Session, key: &str, value: Value) -> Result<()> {
    let probe = Template::with_key(key);
    if !session.query(&probe).is_empty() {
        return Err(Error::KeyExists(key.to_string()));
    }
    let entry = serde_json::to_value(Record::new(key, value))?;
    session.insert(entry);
    Ok(())
}

pub(crate) fn get_record(session: &Session, key: &str) -> Result<Value> {
    session
        .query(&Template::with_key(key))
        .into_iter()
        .next()
        .and_then(|entry| Record::from_entry(&entry))
        .map(|record| record.value)
        .ok_or_else(|| Error::KeyNotFound(key.to_string()))
}

pub(crate) fn all_records(session: &Session) -> Vec<Record> {
    session
        .query(&Template::any())
        .iter()
        .filter_map(Record::from_entry)
        .collect()
}

pub(crate) fn delete_record(session: &mut Session, key: &str) -> Result<()> {
    match session.query(&Template::with_key(key)).into_iter().next() {
        Some(entry) => {
            let removed = session.delete(&entry);
            debug_assert!(removed, "entry returned by query must still be present");
            Ok(())
        }
        None => Err(Error::KeyNotFound(key.to_string())),
    }
}

pub(crate) fn clear_records(session: &mut Session) -> Result<()> {
    for entry in session.query(&Template::any()) {
        session.delete(&entry);
    }
    Ok(())
}
