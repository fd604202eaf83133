//! # Label Catalog
//!
//! Known label sizes, label colors, and label types.
//!
//! Catalogs are configured at startup from loosely typed input (a JSON
//! array, a `,`/`;` separated string, or nothing at all) and never change
//! afterwards. Malformed size entries are dropped silently; when nothing
//! usable remains, the built-in fallback catalog is used in full.
//!
//! ## Example
//!
//! ```
//! use labelgate::catalog::PresetCatalog;
//! use serde_json::json;
//!
//! let raw = json!("74x26; 50x50");
//! let catalog = PresetCatalog::new(Some(&raw), None);
//! let preset = catalog.find_match(74.0, 26.04).unwrap();
//! assert_eq!(preset.key, "74x26");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::variables::to_value_string;

/// Sizes used when no usable preset configuration is given.
pub const FALLBACK_PRESETS: &[&str] = &["74x26", "50x50", "50x30", "50x25", "40x30", "30x20"];

/// Colors used when no usable color configuration is given.
pub const FALLBACK_COLORS: &[&str] = &["white", "black", "transparent"];

/// Per-axis tolerance for matching a geometry against a preset (mm).
pub const MATCH_TOLERANCE_MM: f64 = 0.05;

/// A named label size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub width: f64,
    pub height: f64,
    /// Display label, e.g. `74x26`.
    pub label: String,
    /// Identity derived from the geometry; equal sizes share a key.
    pub key: String,
}

impl Preset {
    /// Create a preset from its geometry.
    pub fn new(width: f64, height: f64) -> Self {
        let key = size_key(width, height);
        Self {
            width,
            height,
            label: key.clone(),
            key,
        }
    }

    /// Whether `(width, height)` lies within tolerance on both axes.
    pub fn matches(&self, width: f64, height: f64) -> bool {
        (self.width - width).abs() < MATCH_TOLERANCE_MM
            && (self.height - height).abs() < MATCH_TOLERANCE_MM
    }
}

/// Format a number without a trailing `.0`. Non-finite values format as `""`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let text = value.to_string();
    match text.split_once('.') {
        Some((whole, frac)) if frac.bytes().all(|b| b == b'0') => whole.to_string(),
        _ => text,
    }
}

/// Canonical `WxH` key for a label size.
pub fn size_key(width: f64, height: f64) -> String {
    format!("{}x{}", format_number(width), format_number(height))
}

/// Label stock types understood by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelType {
    Thermal,
    Thermotransfer,
}

impl LabelType {
    pub const ALL: [LabelType; 2] = [LabelType::Thermal, LabelType::Thermotransfer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thermal => "thermal",
            Self::Thermotransfer => "thermotransfer",
        }
    }
}

impl fmt::Display for LabelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "thermal" => Ok(Self::Thermal),
            "thermotransfer" => Ok(Self::Thermotransfer),
            other => Err(format!(
                "Unknown label type '{}'. Use 'thermal' or 'thermotransfer'",
                other
            )),
        }
    }
}

/// The configured label sizes and colors.
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    presets: Vec<Preset>,
    colors: Vec<String>,
}

impl PresetCatalog {
    /// Build a catalog from raw configuration values.
    pub fn new(presets: Option<&Value>, colors: Option<&Value>) -> Self {
        Self {
            presets: parse_presets(presets),
            colors: parse_colors(colors),
        }
    }

    /// Presets in catalog order.
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn label_types(&self) -> &'static [LabelType] {
        &LabelType::ALL
    }

    /// First preset (in catalog order) within tolerance of the given size.
    ///
    /// This is a first-match lookup, not a nearest-match one.
    pub fn find_match(&self, width: f64, height: f64) -> Option<&Preset> {
        if !width.is_finite() || !height.is_finite() {
            return None;
        }
        self.presets.iter().find(|p| p.matches(width, height))
    }

    /// Look up a preset by its key.
    pub fn by_key(&self, key: &str) -> Option<&Preset> {
        if key.is_empty() {
            return None;
        }
        self.presets.iter().find(|p| p.key == key)
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Split loosely typed catalog input into trimmed, non-empty entries.
///
/// Returns `None` when the input is neither an array nor a string.
fn raw_entries(raw: Option<&Value>) -> Option<Vec<String>> {
    let entries: Vec<String> = match raw? {
        Value::Array(items) => items.iter().map(to_value_string).collect(),
        Value::String(s) => s.split([',', ';']).map(str::to_string).collect(),
        _ => return None,
    };
    Some(
        entries
            .into_iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect(),
    )
}

/// Parse the label size catalog.
pub fn parse_presets(raw: Option<&Value>) -> Vec<Preset> {
    let parsed: Vec<Preset> = raw_entries(raw)
        .unwrap_or_default()
        .iter()
        .filter_map(|entry| find_size(entry))
        .map(|(w, h)| Preset::new(w, h))
        .collect();

    if !parsed.is_empty() {
        return parsed;
    }
    FALLBACK_PRESETS
        .iter()
        .filter_map(|entry| find_size(entry))
        .map(|(w, h)| Preset::new(w, h))
        .collect()
}

/// Parse the label color catalog.
pub fn parse_colors(raw: Option<&Value>) -> Vec<String> {
    let colors = raw_entries(raw).unwrap_or_else(|| {
        FALLBACK_COLORS.iter().map(|c| c.to_string()).collect()
    });
    if colors.is_empty() {
        return FALLBACK_COLORS.iter().map(|c| c.to_string()).collect();
    }
    colors
}

// ============================================================================
// SIZE PATTERN
// ============================================================================

/// `<number> x <number>`, separator `x` or `X` with optional whitespace.
static SIZE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*[xX]\s*([0-9]+(?:\.[0-9]+)?)").ok());

/// Find the first `<number> x <number>` occurrence in `entry`.
///
/// The search is unanchored, so `"62 X 29 mm"` yields `(62, 29)`.
pub fn find_size(entry: &str) -> Option<(f64, f64)> {
    let captures = SIZE_PATTERN.as_ref()?.captures(entry)?;
    let width: f64 = captures.get(1)?.as_str().parse().ok()?;
    let height: f64 = captures.get(2)?.as_str().parse().ok()?;
    (width.is_finite() && height.is_finite()).then_some((width, height))
}

// ============================================================================
// TESTS
// ============================================================================
