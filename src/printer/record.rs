//! Printer records as served by the label gateway.
//!
//! Only the fields the console reads are typed. Everything else is kept in
//! `extra` maps so a record can be sent back with `PUT` unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::{Preset, PresetCatalog};

/// A configured printer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrinterRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Media::is_empty")]
    pub media: Media,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Media section of a printer record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Media {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loaded: Option<LoadedMedia>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Media {
    pub fn is_empty(&self) -> bool {
        self.loaded.is_none() && self.extra.is_empty()
    }
}

/// Label stock currently in the printer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadedMedia {
    #[serde(default)]
    pub width_mm: f64,
    #[serde(default)]
    pub height_mm: f64,
    /// `thermal` or `thermotransfer`.
    #[serde(rename = "type", default)]
    pub media_type: String,
    #[serde(default)]
    pub color: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Print head calibration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpi: Option<u32>,
    #[serde(default)]
    pub offset_x_mm: f64,
    #[serde(default)]
    pub offset_y_mm: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PrinterRecord {
    pub fn loaded_media(&self) -> Option<&LoadedMedia> {
        self.media.loaded.as_ref()
    }

    fn dpi(&self) -> Option<u32> {
        self.alignment
            .as_ref()
            .and_then(|a| a.dpi)
            .filter(|dpi| *dpi > 0)
    }

    /// e.g. `74 x 26 mm, thermal (white)`.
    pub fn media_summary(&self) -> String {
        match self.loaded_media() {
            Some(m) => format!(
                "{} x {} mm, {} ({})",
                m.width_mm, m.height_mm, m.media_type, m.color
            ),
            None => "No media loaded".to_string(),
        }
    }

    /// e.g. `203 dpi, offset 0.5 x 0 mm`.
    pub fn alignment_summary(&self) -> String {
        match (self.dpi(), &self.alignment) {
            (Some(dpi), Some(a)) => format!(
                "{} dpi, offset {} x {} mm",
                dpi, a.offset_x_mm, a.offset_y_mm
            ),
            _ => "No alignment data".to_string(),
        }
    }

    /// Geometry the printer would render for, e.g. `74 x 26 mm @ 203 dpi`.
    pub fn target_summary(&self) -> String {
        match self.loaded_media() {
            Some(m) => {
                let dpi = self
                    .dpi()
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "?".to_string());
                format!("{} x {} mm @ {} dpi", m.width_mm, m.height_mm, dpi)
            }
            None => "No printer media".to_string(),
        }
    }

    /// Catalog preset matching the loaded media, if any.
    pub fn loaded_preset<'a>(&self, catalog: &'a PresetCatalog) -> Option<&'a Preset> {
        let media = self.loaded_media()?;
        catalog.find_match(media.width_mm, media.height_mm)
    }
}

impl std::fmt::Display for PrinterRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | {}",
            self.media_summary(),
            self.alignment_summary()
        )
    }
}
