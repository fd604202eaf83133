//! # Persisted Operator State
//!
//! Operator state that survives between sessions: the values typed into each
//! template's variables, per-template UI settings, and the last selected
//! printer.
//!
//! ## Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `lg:variables:<templateId>` | JSON object, variable name → last typed value |
//! | `lg:templateSettings:<templateId>` | JSON `{primaryVariable, autoFocus, useTemplateTarget}` |
//! | `lg:selectedPrinter` | raw printer id |
//!
//! Storage is a flat string → string map behind [`KeyValueStore`]. Reads
//! never fail: an absent, empty, or malformed entry reads as its fallback.
//! Writes are fire-and-forget and last write wins.
//!
//! ## Backends
//!
//! - [`MemoryStore`]: in-process map (tests, one-shot runs)
//! - [`FileStore`]: a single JSON file on disk

mod file;
mod overrides;

pub use file::FileStore;
pub use overrides::{
    DecodeError, OverrideStore, SELECTED_PRINTER_KEY, SETTINGS_PREFIX, TemplateSettings,
    VARIABLES_PREFIX, decode, settings_key, variables_key,
};

use std::collections::HashMap;
use std::sync::RwLock;

/// Flat string key/value storage.
///
/// Implementations must not panic or surface I/O errors; a failed write is
/// logged and dropped.
pub trait KeyValueStore: Send + Sync {
    /// Raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String);
}

/// In-memory [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with raw entries.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.entries.read() {
            Ok(map) => map.get(key).cloned(),
            Err(e) => {
                tracing::error!("memory_store: lock poisoned on get: {e}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: String) {
        match self.entries.write() {
            Ok(mut map) => {
                map.insert(key.to_string(), value);
            }
            Err(e) => {
                tracing::error!("memory_store: lock poisoned on set: {e}");
            }
        }
    }
}
