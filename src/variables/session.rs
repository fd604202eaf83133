//! Live variable state for the selected template.
//!
//! A [`VariableSession`] merges resolved defaults with persisted overrides
//! when a template is opened, and is the only way variable values change
//! afterwards. Every mutation is written back to the [`OverrideStore`]
//! immediately.
//!
//! ## Cell states
//!
//! ```text
//!   DEFAULTED ──edit / mirror_edit / clear_optional──▶ EDITED
//!       ▲                                                │
//!       └──────────────── reset_to_defaults ─────────────┘
//! ```
//!
//! A direct edit always marks a cell touched, even when the typed value is
//! the default. On open, a stored override equal to the default does not.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::resolve::resolve_defaults;
use crate::store::{OverrideStore, TemplateSettings};
use crate::template::TemplateDetail;

/// One variable's value as shown to the operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableCell {
    pub name: String,
    pub value: String,
    pub default_value: String,
    pub touched: bool,
    pub optional: bool,
}

impl VariableCell {
    /// Shown as a muted placeholder-like value.
    pub fn is_muted(&self) -> bool {
        !self.touched && !self.default_value.is_empty() && self.value == self.default_value
    }

    fn reset(&mut self) {
        self.value = self.default_value.clone();
        self.touched = false;
    }
}

/// Editable variable state of one open template.
#[derive(Debug)]
pub struct VariableSession {
    template_id: String,
    cells: Vec<VariableCell>,
    index: HashMap<String, usize>,
    settings: TemplateSettings,
    store: OverrideStore,
}

impl VariableSession {
    /// Open a session for `detail`, restoring stored values and settings.
    ///
    /// If a name appears twice in the schema, the later declaration wins
    /// and the cell keeps the position of the first.
    pub fn open(detail: &TemplateDetail, store: OverrideStore) -> Self {
        let defaults = resolve_defaults(&detail.variables, detail.sample_data.as_ref());
        let overrides = store.overrides(&detail.id);
        let settings = store.settings(&detail.id);

        let mut cells: Vec<VariableCell> = Vec::with_capacity(detail.variables.len());
        let mut index = HashMap::new();

        for spec in detail.variables.iter().filter(|v| !v.name.is_empty()) {
            let default_value = defaults.get(&spec.name).cloned().unwrap_or_default();
            let stored = overrides.get(&spec.name);
            let cell = VariableCell {
                name: spec.name.clone(),
                value: stored.cloned().unwrap_or_else(|| default_value.clone()),
                touched: stored.is_some_and(|v| *v != default_value),
                default_value,
                optional: spec.is_optional(),
            };
            match index.get(&spec.name).copied() {
                Some(i) => cells[i] = cell,
                None => {
                    index.insert(spec.name.clone(), cells.len());
                    cells.push(cell);
                }
            }
        }

        tracing::debug!(
            template = %detail.id,
            variables = cells.len(),
            restored = overrides.len(),
            "opened variable session"
        );

        Self {
            template_id: detail.id.clone(),
            cells,
            index,
            settings,
            store,
        }
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    /// Cells in schema order.
    pub fn cells(&self) -> &[VariableCell] {
        &self.cells
    }

    pub fn cell(&self, name: &str) -> Option<&VariableCell> {
        self.index.get(name).map(|&i| &self.cells[i])
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn is_muted(&self, name: &str) -> bool {
        self.cell(name).is_some_and(VariableCell::is_muted)
    }

    pub fn settings(&self) -> &TemplateSettings {
        &self.settings
    }

    /// Set a variable from direct operator input. Always marks it touched.
    ///
    /// Unknown names are ignored.
    pub fn edit(&mut self, name: &str, value: impl Into<String>) {
        let Some(&i) = self.index.get(name) else {
            tracing::debug!(template = %self.template_id, name, "edit of unknown variable ignored");
            return;
        };
        let cell = &mut self.cells[i];
        cell.value = value.into();
        cell.touched = true;
        self.persist_values();
    }

    /// Restore every cell to its default and untouched state.
    pub fn reset_to_defaults(&mut self) {
        self.cells.iter_mut().for_each(VariableCell::reset);
        self.persist_values();
    }

    /// Empty every optional variable. Required ones keep their values.
    pub fn clear_optional(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| c.optional) {
            cell.value.clear();
            cell.touched = true;
        }
        self.persist_values();
    }

    /// Name of the variable mirrored by rapid entry.
    ///
    /// The stored choice if any, otherwise the first variable.
    pub fn primary_variable(&self) -> &str {
        match self.settings.primary_variable.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.cells.first().map(|c| c.name.as_str()).unwrap_or(""),
        }
    }

    pub fn set_primary_variable(&mut self, name: impl Into<String>) {
        self.settings.primary_variable = Some(name.into());
        self.persist_settings();
    }

    /// Current content of the rapid-entry field.
    pub fn rapid_value(&self) -> &str {
        self.cell(self.primary_variable())
            .map(|c| c.value.as_str())
            .unwrap_or("")
    }

    /// Rapid-entry input; writes through to the primary variable.
    pub fn mirror_edit(&mut self, value: impl Into<String>) {
        let name = self.primary_variable().to_string();
        self.edit(&name, value);
    }

    pub fn set_use_template_target(&mut self, enabled: bool) {
        self.settings.use_template_target = enabled;
        self.persist_settings();
    }

    pub fn set_auto_focus(&mut self, enabled: bool) {
        self.settings.auto_focus = enabled;
        self.persist_settings();
    }

    /// Current value of every variable.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.cells
            .iter()
            .map(|c| (c.name.clone(), c.value.clone()))
            .collect()
    }

    /// Variable `step` positions away from `current`, wrapping around.
    ///
    /// Starts at the first variable when `current` is not a variable.
    pub fn next_variable(&self, current: Option<&str>, step: isize) -> Option<&str> {
        if self.cells.is_empty() {
            return None;
        }
        let len = self.cells.len() as isize;
        let next = match current.and_then(|name| self.index.get(name)) {
            Some(&i) => (i as isize + step).rem_euclid(len) as usize,
            None => 0,
        };
        Some(self.cells[next].name.as_str())
    }

    fn persist_values(&self) {
        self.store.set_overrides(&self.template_id, &self.snapshot());
    }

    fn persist_settings(&self) {
        self.store.set_settings(&self.template_id, &self.settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn detail(value: serde_json::Value) -> TemplateDetail {
        serde_json::from_value(value).unwrap()
    }

    fn t1() -> TemplateDetail {
        detail(json!({
            "id": "T1",
            "variables": [
                {"name": "sku", "default": "A1"},
                {"name": "qty", "optional": true}
            ]
        }))
    }

    fn touched(session: &VariableSession, name: &str) -> bool {
        session.cell(name).unwrap().touched
    }

    #[test]
    fn test_first_open_shows_defaults() {
        let session = VariableSession::open(&t1(), OverrideStore::new(MemoryStore::new()));
        assert_eq!(
            session.snapshot(),
            BTreeMap::from([("qty".into(), "".into()), ("sku".into(), "A1".into())])
        );
        assert!(!touched(&session, "sku"));
        assert!(!touched(&session, "qty"));
        assert!(session.is_muted("sku"));
        assert!(!session.is_muted("qty"));
    }

    #[test]
    fn test_edits_survive_reopen() {
        let store = OverrideStore::new(MemoryStore::new());
        let mut session = VariableSession::open(&t1(), store.clone());
        session.edit("qty", "5");
        assert!(touched(&session, "qty"));

        let other = detail(json!({"id": "T2", "variables": [{"name": "qty"}]}));
        let away = VariableSession::open(&other, store.clone());
        assert_eq!(away.cell("qty").unwrap().value, "");

        let back = VariableSession::open(&t1(), store);
        assert_eq!(back.cell("sku").unwrap().value, "A1");
        assert_eq!(back.cell("qty").unwrap().value, "5");
        assert!(touched(&back, "qty"));
        assert!(!touched(&back, "sku"));
    }

    #[test]
    fn test_edit_equal_to_default_is_touched() {
        let store = OverrideStore::new(MemoryStore::new());
        let mut session = VariableSession::open(&t1(), store.clone());
        session.edit("sku", "A1");
        assert!(touched(&session, "sku"));
        assert!(!session.is_muted("sku"));

        // Reopening compares against the default again.
        let reopened = VariableSession::open(&t1(), store);
        assert!(!touched(&reopened, "sku"));
    }

    #[test]
    fn test_reset_to_defaults() {
        let store = OverrideStore::new(MemoryStore::new());
        let mut session = VariableSession::open(&t1(), store.clone());
        session.edit("sku", "Ann");
        session.reset_to_defaults();

        let sku = session.cell("sku").unwrap();
        assert_eq!(sku.value, "A1");
        assert!(!sku.touched);
        assert_eq!(store.overrides("T1"), session.snapshot());
    }

    #[test]
    fn test_clear_optional_only_touches_optional() {
        let template = detail(json!({
            "id": "T3",
            "variables": [
                {"name": "a", "default": "x"},
                {"name": "b", "default": "y", "optional": true},
                {"name": "c", "default": "z", "is_optional": true},
                {"name": "d", "default": "w", "required": false}
            ]
        }));
        let mut session = VariableSession::open(&template, OverrideStore::new(MemoryStore::new()));
        session.clear_optional();

        assert_eq!(session.cell("a").unwrap().value, "x");
        assert!(!touched(&session, "a"));
        for name in ["b", "c", "d"] {
            assert_eq!(session.cell(name).unwrap().value, "");
            assert!(touched(&session, name));
        }
    }

    #[test]
    fn test_persists_every_cell() {
        let store = OverrideStore::new(MemoryStore::new());
        let mut session = VariableSession::open(&t1(), store.clone());
        session.edit("qty", "2");
        assert_eq!(
            store.overrides("T1"),
            BTreeMap::from([("qty".into(), "2".into()), ("sku".into(), "A1".into())])
        );
    }

    #[test]
    fn test_stale_overrides_ignored() {
        let store = OverrideStore::new(MemoryStore::with_entries([(
            "lg:variables:T1",
            r#"{"sku": "B2", "removed": "old"}"#,
        )]));
        let session = VariableSession::open(&t1(), store);
        assert_eq!(session.cells().len(), 2);
        assert_eq!(session.cell("sku").unwrap().value, "B2");
        assert!(session.cell("removed").is_none());
    }

    #[test]
    fn test_corrupt_store_opens_with_defaults() {
        let store = OverrideStore::new(MemoryStore::with_entries([
            ("lg:variables:T1", "not json"),
            ("lg:templateSettings:T1", "{"),
        ]));
        let session = VariableSession::open(&t1(), store);
        assert_eq!(session.cell("sku").unwrap().value, "A1");
        assert!(session.settings().auto_focus);
    }

    #[test]
    fn test_rapid_entry_mirror() {
        let store = OverrideStore::new(MemoryStore::new());
        let mut session = VariableSession::open(&t1(), store.clone());
        assert_eq!(session.primary_variable(), "sku");
        assert_eq!(session.rapid_value(), "A1");

        session.set_primary_variable("qty");
        assert_eq!(session.rapid_value(), "");
        session.mirror_edit("12");
        assert_eq!(session.cell("qty").unwrap().value, "12");
        assert!(touched(&session, "qty"));
        assert_eq!(session.rapid_value(), "12");

        let reopened = VariableSession::open(&t1(), store);
        assert_eq!(reopened.primary_variable(), "qty");
        assert_eq!(reopened.rapid_value(), "12");
    }

    #[test]
    fn test_mirror_to_missing_variable_is_noop() {
        let store = OverrideStore::new(MemoryStore::new());
        let mut session = VariableSession::open(&t1(), store.clone());
        session.set_primary_variable("gone");
        session.mirror_edit("x");
        assert_eq!(session.rapid_value(), "");
        assert!(store.overrides("T1").is_empty());
    }

    #[test]
    fn test_settings_toggles_are_independent() {
        let store = OverrideStore::new(MemoryStore::new());
        let mut session = VariableSession::open(&t1(), store.clone());
        session.set_primary_variable("qty");
        session.set_use_template_target(true);
        session.set_auto_focus(false);

        let saved = store.settings("T1");
        assert_eq!(saved.primary_variable.as_deref(), Some("qty"));
        assert!(saved.use_template_target);
        assert!(!saved.auto_focus);
        assert!(store.overrides("T1").is_empty());
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let template = detail(json!({
            "id": "dup",
            "variables": [
                {"name": "a", "default": "first"},
                {"name": "b"},
                {"name": "a", "default": "second", "optional": true}
            ]
        }));
        let session = VariableSession::open(&template, OverrideStore::new(MemoryStore::new()));
        assert_eq!(session.cells().len(), 2);
        assert_eq!(session.cells()[0].default_value, "second");
        assert!(session.cells()[0].optional);
    }

    #[test]
    fn test_next_variable_wraps() {
        let session = VariableSession::open(&t1(), OverrideStore::new(MemoryStore::new()));
        assert_eq!(session.next_variable(None, 1), Some("sku"));
        assert_eq!(session.next_variable(Some("sku"), 1), Some("qty"));
        assert_eq!(session.next_variable(Some("qty"), 1), Some("sku"));
        assert_eq!(session.next_variable(Some("sku"), -1), Some("qty"));
    }
}
