//! # Console Configuration
//!
//! Startup settings: where the gateway lives, which label sizes and colors
//! to offer, and where operator state is kept between runs.
//!
//! | Setting | Environment | Fallback |
//! |---------|-------------|----------|
//! | API base | `LG_API_BASE` | `http://127.0.0.1:8000/api` |
//! | Label presets | `LG_LABEL_PRESETS` | built-in size catalog |
//! | Label colors | `LG_LABEL_COLORS` | `white, black, transparent` |
//! | State file | `LG_STATE_FILE` | `<data dir>/labelgate/state.json` |

use serde_json::Value;
use std::path::PathBuf;

use crate::catalog::PresetCatalog;

/// API base used when none is configured.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";

/// Resolved console configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gateway base URL without trailing slashes.
    pub api_base: String,
    /// Raw preset catalog (JSON array or `,`/`;` separated string).
    pub label_presets: Option<Value>,
    /// Raw color catalog, same format as presets.
    pub label_colors: Option<Value>,
    /// File holding persisted operator state.
    pub state_file: PathBuf,
}

impl Config {
    pub fn new(
        api_base: Option<&str>,
        label_presets: Option<&str>,
        label_colors: Option<&str>,
        state_file: Option<PathBuf>,
    ) -> Self {
        Self {
            api_base: normalize_base_url(api_base),
            label_presets: label_presets.map(catalog_value),
            label_colors: label_colors.map(catalog_value),
            state_file: state_file.unwrap_or_else(default_state_file),
        }
    }

    pub fn catalog(&self) -> PresetCatalog {
        PresetCatalog::new(self.label_presets.as_ref(), self.label_colors.as_ref())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, None, None, None)
    }
}

/// Trim trailing slashes; blank input selects [`DEFAULT_API_BASE`].
pub fn normalize_base_url(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => {
            let trimmed = v.trim_end_matches('/');
            if trimmed.is_empty() {
                "/".to_string()
            } else {
                trimmed.to_string()
            }
        }
        _ => DEFAULT_API_BASE.to_string(),
    }
}

/// Interpret a catalog setting: a JSON array if it parses as one,
/// otherwise a delimited string.
fn catalog_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.starts_with('[')
        && let Ok(value @ Value::Array(_)) = serde_json::from_str::<Value>(trimmed)
    {
        return value;
    }
    Value::String(raw.to_string())
}

/// `<platform data dir>/labelgate/state.json`, or a file in the working
/// directory when the platform has no data dir.
pub fn default_state_file() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("labelgate").join("state.json"))
        .unwrap_or_else(|| PathBuf::from(".labelgate-state.json"))
}
