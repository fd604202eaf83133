//! Changing the media loaded in a printer.

use super::record::PrinterRecord;
use crate::catalog::Preset;

/// Requested change to a printer's loaded media.
///
/// Absent, zero, or empty fields keep the printer's current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaUpdate {
    pub width_mm: Option<f64>,
    pub height_mm: Option<f64>,
    pub media_type: Option<String>,
    pub color: Option<String>,
}

impl MediaUpdate {
    /// Take width and height from a catalog preset.
    pub fn with_preset(mut self, preset: &Preset) -> Self {
        self.width_mm = Some(preset.width);
        self.height_mm = Some(preset.height);
        self
    }

    /// A copy of `printer` with this update applied.
    pub fn apply(&self, printer: &PrinterRecord) -> PrinterRecord {
        let mut updated = printer.clone();
        let loaded = updated.media.loaded.get_or_insert_with(Default::default);

        if let Some(width) = usable_number(self.width_mm) {
            loaded.width_mm = width;
        }
        if let Some(height) = usable_number(self.height_mm) {
            loaded.height_mm = height;
        }
        if let Some(media_type) = usable_text(&self.media_type) {
            loaded.media_type = media_type.to_string();
        }
        if let Some(color) = usable_text(&self.color) {
            loaded.color = color.to_string();
        }
        updated
    }
}

fn usable_number(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

fn usable_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
