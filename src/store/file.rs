//! JSON file backed key/value store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::KeyValueStore;

/// A [`KeyValueStore`] kept in one JSON object file.
///
/// The whole file is read once on open and rewritten on every `set`.
/// A missing or unparsable file opens as an empty store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = fs::create_dir_all(parent)
        {
            tracing::warn!("file_store: cannot create {}: {e}", parent.display());
            return;
        }
        let body = match serde_json::to_string_pretty(entries) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("file_store: cannot encode state: {e}");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, body) {
            tracing::warn!("file_store: cannot write {}: {e}", self.path.display());
        }
    }
}

fn read_entries(path: &Path) -> BTreeMap<String, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!("file_store: starting empty, cannot read {}: {e}", path.display());
            return BTreeMap::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("file_store: ignoring corrupt state file {}: {e}", path.display());
            BTreeMap::new()
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.entries.read() {
            Ok(map) => map.get(key).cloned(),
            Err(e) => {
                tracing::error!("file_store: lock poisoned on get: {e}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: String) {
        match self.entries.write() {
            Ok(mut map) => {
                map.insert(key.to_string(), value);
                self.flush(&map);
            }
            Err(e) => {
                tracing::error!("file_store: lock poisoned on set: {e}");
            }
        }
    }
}
