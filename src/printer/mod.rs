//! # Printer Module
//!
//! Printer records as reported by the label gateway, and updates to the
//! media loaded in them.
//!
//! ## Modules
//!
//! - [`record`]: printer, media, and alignment records
//! - [`media`]: media updates, optionally from a catalog preset

pub mod media;
pub mod record;

pub use media::MediaUpdate;
pub use record::{Alignment, LoadedMedia, Media, PrinterRecord};
