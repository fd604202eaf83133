//! # Session Flow Tests
//!
//! End-to-end operator flows through the public API: opening templates,
//! editing, switching away and back, and reopening state from disk.

use labelgate::console::Console;
use labelgate::print::PrintRequest;
use labelgate::store::{FileStore, OverrideStore};
use labelgate::template::TemplateDetail;
use labelgate::PresetCatalog;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeMap;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn detail(value: serde_json::Value) -> TemplateDetail {
    serde_json::from_value(value).unwrap()
}

fn t1() -> TemplateDetail {
    detail(json!({
        "id": "T1",
        "name": "Shelf label",
        "template": "shelf.zpl",
        "variables": [{"name": "sku", "default": "A1"}, {"name": "qty", "optional": true}],
        "preview_target": {"width_mm": 74, "height_mm": 26, "dpi": 300, "rotate": 90}
    }))
}

fn t2() -> TemplateDetail {
    detail(json!({
        "id": "T2",
        "variables": [{"name": "name", "example": "Ann"}]
    }))
}

/// Select `detail` and deliver it as if the load had just completed.
fn open(console: &mut Console, detail: TemplateDetail) {
    let ticket = console.select_template(&detail.id);
    if console.session().is_none() {
        assert!(console.finish_load(ticket, detail));
    }
}

fn values(console: &Console) -> Vec<(String, String, bool)> {
    console
        .session()
        .unwrap()
        .cells()
        .iter()
        .map(|c| (c.name.clone(), c.value.clone(), c.touched))
        .collect()
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_edit_survives_switching_templates() {
    let dir = tempfile::tempdir().unwrap();
    let store = OverrideStore::new(FileStore::open(dir.path().join("state.json")));
    let mut console = Console::new(PresetCatalog::default(), store);

    open(&mut console, t1());
    assert_eq!(
        values(&console),
        vec![
            ("sku".to_string(), "A1".to_string(), false),
            ("qty".to_string(), "".to_string(), false),
        ]
    );

    console.session_mut().unwrap().edit("qty", "5");
    assert!(console.session().unwrap().cell("qty").unwrap().touched);

    open(&mut console, t2());
    assert_eq!(
        values(&console),
        vec![("name".to_string(), "Ann".to_string(), false)]
    );

    open(&mut console, t1());
    assert_eq!(
        values(&console),
        vec![
            ("sku".to_string(), "A1".to_string(), false),
            ("qty".to_string(), "5".to_string(), true),
        ]
    );
}

#[test]
fn test_state_file_restores_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");

    {
        let store = OverrideStore::new(FileStore::open(&path));
        let mut console = Console::new(PresetCatalog::default(), store);
        open(&mut console, t1());
        let session = console.session_mut().unwrap();
        session.set_primary_variable("qty");
        session.mirror_edit("12");
        session.set_use_template_target(true);
        session.set_auto_focus(false);
    }

    let store = OverrideStore::new(FileStore::open(&path));
    let mut console = Console::new(PresetCatalog::default(), store.clone());
    open(&mut console, t1());

    let session = console.session().unwrap();
    assert_eq!(session.primary_variable(), "qty");
    assert_eq!(session.rapid_value(), "12");
    assert!(session.settings().use_template_target);
    assert!(!session.settings().auto_focus);

    let expected: BTreeMap<String, String> = [("qty", "12"), ("sku", "A1")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(store.overrides("T1"), expected);
    assert!(store.overrides("T2").is_empty());
}

#[test]
fn test_reset_then_print_request() {
    let dir = tempfile::tempdir().unwrap();
    let store = OverrideStore::new(FileStore::open(dir.path().join("state.json")));
    let mut console = Console::new(PresetCatalog::default(), store);
    open(&mut console, t1());

    let session = console.session_mut().unwrap();
    session.edit("sku", "B2");
    session.edit("qty", "3");
    session.clear_optional();
    assert_eq!(session.cell("sku").unwrap().value, "B2");
    assert_eq!(session.cell("qty").unwrap().value, "");

    session.reset_to_defaults();
    assert!(session.cells().iter().all(|c| !c.touched));

    let request: PrintRequest = console.print_request().unwrap();
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "template": "shelf.zpl",
            "variables": {"qty": "", "sku": "A1"},
            "debug": false,
            "return_preview": false
        })
    );

    console.session_mut().unwrap().set_use_template_target(true);
    let request = console.print_request().unwrap();
    assert_eq!(request.target, console.active_detail().unwrap().preview_target);
    assert_eq!(
        serde_json::to_value(&request).unwrap()["target"],
        json!({"width_mm": 74, "height_mm": 26, "dpi": 300, "rotate": 90})
    );
}

#[test]
fn test_corrupt_state_file_opens_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = OverrideStore::new(FileStore::open(&path));
    let mut console = Console::new(PresetCatalog::default(), store);
    open(&mut console, t1());
    assert_eq!(console.session().unwrap().cell("sku").unwrap().value, "A1");
}
