//! # Label Gateway API
//!
//! The boundary between the console and the label gateway. All network I/O
//! goes through [`LabelApi`]; nothing in the variable state engine performs
//! I/O of its own.
//!
//! ## Endpoints
//!
//! | Method | Path | Body / Response |
//! |--------|------|-----------------|
//! | GET | `/v1/printers` | `{"printers": [...]}` |
//! | PUT | `/v1/printers/{id}` | printer record |
//! | GET | `/v1/templates` | `[...]` |
//! | GET | `/v1/templates/{id}` | template detail |
//! | POST | `/v1/printers/{id}/prints/template` | [`PrintRequest`] → [`PrintReceipt`] |
//!
//! Requests are sent once. Retrying is left to the operator.

mod http;

pub use http::HttpApi;

use async_trait::async_trait;

use crate::error::LabelgateError;
use crate::print::{PrintReceipt, PrintRequest};
use crate::printer::PrinterRecord;
use crate::template::{TemplateDetail, TemplateSummary};

/// Operations the console needs from the label gateway.
#[async_trait]
pub trait LabelApi: Send + Sync {
    async fn list_printers(&self) -> Result<Vec<PrinterRecord>, LabelgateError>;

    /// Create or replace a printer record.
    async fn put_printer(&self, printer: &PrinterRecord) -> Result<(), LabelgateError>;

    async fn list_templates(&self) -> Result<Vec<TemplateSummary>, LabelgateError>;

    async fn template_detail(&self, template_id: &str) -> Result<TemplateDetail, LabelgateError>;

    /// Submit a print job to `printer_id`.
    async fn print_template(
        &self,
        printer_id: &str,
        request: &PrintRequest,
    ) -> Result<PrintReceipt, LabelgateError>;
}
