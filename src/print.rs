//! # Print Requests
//!
//! Assembly of the payload sent to `POST /v1/printers/{id}/prints/template`.
//!
//! The request carries a `target` geometry only when the operator asked to
//! print at the template's own target and the template declares one. Without
//! it the gateway renders for the media currently loaded in the printer.
//!
//! ## Example
//!
//! ```json
//! {
//!   "template": "shelf-label",
//!   "variables": {"sku": "A1", "qty": "5"},
//!   "debug": false,
//!   "return_preview": false,
//!   "target": {"width_mm": 74, "height_mm": 26, "dpi": 203}
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::template::TemplateDetail;
use crate::variables::VariableSession;

/// Body of a template print request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintRequest {
    /// Template reference, copied from the template detail.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub template: Value,
    pub variables: BTreeMap<String, String>,
    pub debug: bool,
    pub return_preview: bool,
    /// The template's `preview_target`, exactly as the gateway served it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Value>,
}

impl PrintRequest {
    /// Build the request from the session's current values.
    pub fn build(
        session: &VariableSession,
        detail: &TemplateDetail,
        use_template_target: bool,
    ) -> Self {
        let target = if use_template_target {
            detail.preview_target.clone()
        } else {
            None
        };
        Self {
            template: detail.template.clone(),
            variables: session.snapshot(),
            debug: false,
            return_preview: false,
            target,
        }
    }
}

/// Gateway response to a successful print.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintReceipt {
    pub printer_id: String,
    pub bytes_sent: u64,
}

impl std::fmt::Display for PrintReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Printed to {}. Bytes sent: {}.",
            self.printer_id, self.bytes_sent
        )
    }
}
