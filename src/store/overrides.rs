//! Template-scoped override and settings records.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use super::KeyValueStore;
use crate::variables::to_value_string;

/// Key prefix for per-template variable values.
pub const VARIABLES_PREFIX: &str = "lg:variables:";

/// Key prefix for per-template settings.
pub const SETTINGS_PREFIX: &str = "lg:templateSettings:";

/// Key of the last selected printer id.
pub const SELECTED_PRINTER_KEY: &str = "lg:selectedPrinter";

pub fn variables_key(template_id: &str) -> String {
    format!("{VARIABLES_PREFIX}{template_id}")
}

pub fn settings_key(template_id: &str) -> String {
    format!("{SETTINGS_PREFIX}{template_id}")
}

/// A stored entry that could not be decoded.
#[derive(Debug, Error)]
#[error("malformed stored value under '{key}': {source}")]
pub struct DecodeError {
    pub key: String,
    #[source]
    pub source: serde_json::Error,
}

/// Decode the raw entry stored under `key`.
pub fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, DecodeError> {
    serde_json::from_str(raw).map_err(|source| DecodeError {
        key: key.to_string(),
        source,
    })
}

fn default_true() -> bool {
    true
}

/// Per-template UI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSettings {
    /// Variable mirrored by the rapid-entry field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_variable: Option<String>,
    /// Return focus to rapid entry after a successful print.
    #[serde(default = "default_true")]
    pub auto_focus: bool,
    /// Print at the template's own target instead of the loaded media.
    #[serde(default)]
    pub use_template_target: bool,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            primary_variable: None,
            auto_focus: true,
            use_template_target: false,
        }
    }
}

/// Template-scoped view over a [`KeyValueStore`].
///
/// Cloning is cheap; clones share the same backend.
#[derive(Clone)]
pub struct OverrideStore {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for OverrideStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideStore").finish_non_exhaustive()
    }
}

impl OverrideStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn shared(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Load and decode `key`, returning `fallback` when absent or malformed.
    fn load<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let raw = match self.backend.get(key) {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return fallback,
        };
        match decode(key, &raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("{e}; using fallback");
                fallback
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.backend.set(key, raw),
            Err(e) => tracing::warn!("cannot encode value for '{key}': {e}"),
        }
    }

    /// Last typed values for a template. Empty when nothing usable is stored.
    ///
    /// Non-string values are canonicalised; `null` entries are dropped.
    pub fn overrides(&self, template_id: &str) -> BTreeMap<String, String> {
        let raw: Map<String, Value> = self.load(&variables_key(template_id), Map::new());
        raw.iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), to_value_string(v)))
            .collect()
    }

    pub fn set_overrides(&self, template_id: &str, values: &BTreeMap<String, String>) {
        self.save(&variables_key(template_id), values);
    }

    /// Settings for a template, or defaults when nothing usable is stored.
    pub fn settings(&self, template_id: &str) -> TemplateSettings {
        self.load(&settings_key(template_id), TemplateSettings::default())
    }

    pub fn set_settings(&self, template_id: &str, settings: &TemplateSettings) {
        self.save(&settings_key(template_id), settings);
    }

    /// The last selected printer id, if one was stored.
    pub fn selected_printer(&self) -> Option<String> {
        self.backend
            .get(SELECTED_PRINTER_KEY)
            .filter(|id| !id.is_empty())
    }

    pub fn set_selected_printer(&self, printer_id: Option<&str>) {
        self.backend
            .set(SELECTED_PRINTER_KEY, printer_id.unwrap_or_default().to_string());
    }
}
