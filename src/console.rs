//! # Print Console
//!
//! The operator's working state: the template and printer lists, the active
//! template selection and its [`VariableSession`], and the selected printer.
//!
//! ## Template loads
//!
//! Selecting a template issues a [`LoadTicket`]. When the detail arrives it
//! is handed back with [`Console::finish_load`]; if another template was
//! selected in the meantime the ticket is stale and the detail is cached but
//! no session is opened. The last selection always wins.
//!
//! ```
//! use labelgate::console::Console;
//! use labelgate::store::{MemoryStore, OverrideStore};
//! use labelgate::template::TemplateDetail;
//!
//! let mut console = Console::new(Default::default(), OverrideStore::new(MemoryStore::new()));
//! let first = console.select_template("shipping");
//! let second = console.select_template("shelf");
//!
//! let shipping = TemplateDetail { id: "shipping".into(), ..Default::default() };
//! assert!(!console.finish_load(first, shipping));
//! assert!(console.session().is_none());
//!
//! let shelf = TemplateDetail { id: "shelf".into(), ..Default::default() };
//! assert!(console.finish_load(second, shelf));
//! assert_eq!(console.session().unwrap().template_id(), "shelf");
//! ```

use std::collections::HashMap;

use crate::api::LabelApi;
use crate::catalog::PresetCatalog;
use crate::error::LabelgateError;
use crate::print::{PrintReceipt, PrintRequest};
use crate::printer::{MediaUpdate, PrinterRecord};
use crate::store::OverrideStore;
use crate::template::{TemplateDetail, TemplateFilter, TemplateSummary};
use crate::variables::VariableSession;

/// Claim on the result of a template detail load.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    template_id: String,
    generation: u64,
}

impl LoadTicket {
    pub fn template_id(&self) -> &str {
        &self.template_id
    }
}

/// Result of a successful print.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintOutcome {
    pub receipt: PrintReceipt,
    /// Rapid entry should take focus again.
    pub refocus: bool,
}

/// Operator state for one console.
#[derive(Debug)]
pub struct Console {
    catalog: PresetCatalog,
    store: OverrideStore,
    templates: Vec<TemplateSummary>,
    details: HashMap<String, TemplateDetail>,
    printers: Vec<PrinterRecord>,
    selected_template: Option<String>,
    selected_printer: Option<String>,
    generation: u64,
    session: Option<VariableSession>,
}

impl Console {
    pub fn new(catalog: PresetCatalog, store: OverrideStore) -> Self {
        Self {
            catalog,
            store,
            templates: Vec::new(),
            details: HashMap::new(),
            printers: Vec::new(),
            selected_template: None,
            selected_printer: None,
            generation: 0,
            session: None,
        }
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    // ========================================================================
    // TEMPLATES
    // ========================================================================

    pub fn set_templates(&mut self, templates: Vec<TemplateSummary>) {
        self.templates = templates;
    }

    pub fn templates(&self) -> &[TemplateSummary] {
        &self.templates
    }

    pub fn filtered_templates(&self, filter: &TemplateFilter) -> Vec<&TemplateSummary> {
        filter.apply(&self.templates)
    }

    pub async fn refresh_templates(&mut self, api: &dyn LabelApi) -> Result<(), LabelgateError> {
        self.templates = api.list_templates().await?;
        Ok(())
    }

    /// Make `template_id` the active template.
    ///
    /// Any open session is closed. If the detail is already cached a new
    /// session opens immediately; otherwise the returned ticket must be
    /// completed with [`Console::finish_load`].
    pub fn select_template(&mut self, template_id: &str) -> LoadTicket {
        self.generation += 1;
        self.selected_template = Some(template_id.to_string());
        self.session = None;

        if let Some(detail) = self.details.get(template_id) {
            self.session = Some(VariableSession::open(detail, self.store.clone()));
        }
        LoadTicket {
            template_id: template_id.to_string(),
            generation: self.generation,
        }
    }

    pub fn selected_template(&self) -> Option<&str> {
        self.selected_template.as_deref()
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
            && self.selected_template.as_deref() == Some(ticket.template_id.as_str())
    }

    /// Deliver a loaded detail. Returns whether a session was opened.
    pub fn finish_load(&mut self, ticket: LoadTicket, detail: TemplateDetail) -> bool {
        self.details.insert(ticket.template_id.clone(), detail);
        if !self.is_current(&ticket) {
            tracing::debug!(template = %ticket.template_id, "discarding stale template load");
            return false;
        }
        if self.session.is_none()
            && let Some(detail) = self.details.get(&ticket.template_id)
        {
            self.session = Some(VariableSession::open(detail, self.store.clone()));
        }
        true
    }

    /// Select a template and load its detail through `api` if needed.
    pub async fn load_template(
        &mut self,
        api: &dyn LabelApi,
        template_id: &str,
    ) -> Result<bool, LabelgateError> {
        let ticket = self.select_template(template_id);
        if self.session.is_some() {
            return Ok(true);
        }
        let detail = api.template_detail(template_id).await?;
        Ok(self.finish_load(ticket, detail))
    }

    pub fn cached_detail(&self, template_id: &str) -> Option<&TemplateDetail> {
        self.details.get(template_id)
    }

    pub fn active_detail(&self) -> Option<&TemplateDetail> {
        self.cached_detail(self.selected_template.as_deref()?)
    }

    pub fn session(&self) -> Option<&VariableSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut VariableSession> {
        self.session.as_mut()
    }

    // ========================================================================
    // PRINTERS
    // ========================================================================

    /// Replace the printer list, restoring the stored selection when it is
    /// still present and falling back to the first printer.
    pub fn set_printers(&mut self, printers: Vec<PrinterRecord>) {
        let stored = self
            .store
            .selected_printer()
            .filter(|id| printers.iter().any(|p| &p.id == id));
        self.selected_printer = stored.or_else(|| printers.first().map(|p| p.id.clone()));
        self.printers = printers;
    }

    pub async fn refresh_printers(&mut self, api: &dyn LabelApi) -> Result<(), LabelgateError> {
        let printers = api.list_printers().await?;
        self.set_printers(printers);
        Ok(())
    }

    pub fn printers(&self) -> &[PrinterRecord] {
        &self.printers
    }

    /// Select a printer and remember the choice.
    pub fn select_printer(&mut self, printer_id: &str) -> Result<(), LabelgateError> {
        if !self.printers.iter().any(|p| p.id == printer_id) {
            return Err(LabelgateError::Selection(format!(
                "Unknown printer '{}'",
                printer_id
            )));
        }
        self.selected_printer = Some(printer_id.to_string());
        self.store.set_selected_printer(Some(printer_id));
        Ok(())
    }

    pub fn selected_printer(&self) -> Option<&PrinterRecord> {
        let id = self.selected_printer.as_deref()?;
        self.printers.iter().find(|p| p.id == id)
    }

    /// Apply a media update to a printer and reload the printer list.
    pub async fn update_media(
        &mut self,
        api: &dyn LabelApi,
        printer_id: &str,
        update: &MediaUpdate,
    ) -> Result<(), LabelgateError> {
        let printer = self
            .printers
            .iter()
            .find(|p| p.id == printer_id)
            .ok_or_else(|| LabelgateError::Selection(format!("Unknown printer '{}'", printer_id)))?;
        let updated = update.apply(printer);
        api.put_printer(&updated).await?;
        tracing::info!(printer = %printer_id, media = %updated.media_summary(), "printer media updated");
        self.refresh_printers(api).await
    }

    // ========================================================================
    // PRINTING
    // ========================================================================

    /// The request that [`Console::print`] would send.
    pub fn print_request(&self) -> Result<PrintRequest, LabelgateError> {
        let detail = self
            .active_detail()
            .ok_or_else(|| LabelgateError::Selection("Select a template before printing.".into()))?;
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| LabelgateError::Selection("Template is still loading.".into()))?;
        Ok(PrintRequest::build(
            session,
            detail,
            session.settings().use_template_target,
        ))
    }

    /// Send the active template to the selected printer.
    ///
    /// A failure leaves variable values, touched flags, and stored
    /// overrides exactly as they were.
    pub async fn print(&self, api: &dyn LabelApi) -> Result<PrintOutcome, LabelgateError> {
        let request = self.print_request()?;
        let printer = self
            .selected_printer()
            .ok_or_else(|| LabelgateError::Selection("Select a printer before printing.".into()))?;

        tracing::info!(
            printer = %printer.id,
            template = self.selected_template.as_deref().unwrap_or_default(),
            with_target = request.target.is_some(),
            "submitting print job"
        );
        let receipt = api.print_template(&printer.id, &request).await?;
        let refocus = self
            .session
            .as_ref()
            .is_some_and(|s| s.settings().auto_focus);
        Ok(PrintOutcome { receipt, refocus })
    }
}
