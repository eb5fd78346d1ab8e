use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::record::Template;
use crate::Result;

/// An open handle to the on-disk object container.
///
/// The container file holds one JSON array of arbitrary entries. Entries are
/// held in memory while the session is open; [`close`](Session::close)
/// flushes pending changes back to disk atomically (write to a temporary
/// file, then rename). A session dropped without `close` loses its pending
/// changes, which is why the lifecycle policies guarantee close on every
/// path.
pub struct Session {
    path: PathBuf,
    entries: Vec<Value>,
    dirty: bool,
}

impl Session {
    /// Opens the container at `path`, creating an empty one on disk if none
    /// exists yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = fs::read(&path)?;
            if content.is_empty() {
                Vec::new()
            } else {
                serde_json::from_slice(&content)?
            }
        } else {
            flush_to(&path, &[])?;
            Vec::new()
        };
        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    /// Returns clones of every entry structurally matching `template`.
    pub fn query(&self, template: &Template) -> Vec<Value> {
        self.entries
            .iter()
            .filter(|entry| template.matches(entry))
            .cloned()
            .collect()
    }

    /// Appends a new entry to the container.
    pub fn insert(&mut self, entry: Value) {
        self.entries.push(entry);
        self.dirty = true;
    }

    /// Removes the first stored entry equal to `entry` (typically one
    /// returned by [`query`](Session::query)). Returns whether an entry was
    /// removed.
    pub fn delete(&mut self, entry: &Value) -> bool {
        match self.entries.iter().position(|e| e == entry) {
            Some(pos) => {
                self.entries.remove(pos);
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Flushes pending changes and releases the session.
    pub fn close(self) -> Result<()> {
        if self.dirty {
            flush_to(&self.path, &self.entries)?;
        }
        Ok(())
    }
}

fn flush_to(path: &Path, entries: &[Value]) -> Result<()> {
    let temp_path = path.with_extension("db.tmp");
    let bytes = serde_json::to_vec_pretty(&entries)?;
    fs::write(&temp_path, bytes)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}
