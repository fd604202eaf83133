//! Template types as served by the label gateway.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::variables::to_value_string;

/// Dots per inch assumed when a target does not say.
pub const DEFAULT_TARGET_DPI: u32 = 203;

/// Keep an explicit `null` as `Some(Value::Null)`; only a missing key is `None`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// One variable slot of a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    /// Identity of the variable within its template.
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Explicit default; any JSON value. A present `null` counts as set.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Example value, used when nothing better is known.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    /// Alternate spelling of `optional` used by some templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_optional: Option<bool>,
    /// `required: false` also marks a variable optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl VariableSpec {
    /// Create a required variable with no default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether the variable may be left empty.
    pub fn is_optional(&self) -> bool {
        self.optional == Some(true) || self.is_optional == Some(true) || self.required == Some(false)
    }

    /// Label for display, falling back to the name.
    pub fn display_label(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ if !self.name.is_empty() => &self.name,
            _ => "Variable",
        }
    }
}

/// Template entry from the template list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub variables: Vec<VariableSpec>,
    #[serde(default)]
    pub preview_available: bool,
}

/// Full template detail, fetched when a template is selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateDetail {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub variables: Vec<VariableSpec>,
    /// Example values keyed by variable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_data: Option<Map<String, Value>>,
    /// Geometry the template was designed for (`width_mm`, `height_mm`,
    /// `dpi`, and whatever else the gateway sends). Kept as served so it
    /// can be passed back unchanged as a print target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_target: Option<Value>,
    #[serde(default)]
    pub preview_available: bool,
    /// Opaque template reference passed back verbatim when printing.
    #[serde(default)]
    pub template: Value,
}

impl TemplateDetail {
    /// Human-readable summary of the template's own target geometry.
    pub fn target_summary(&self) -> String {
        let Some(target) = &self.preview_target else {
            return "No template target".to_string();
        };
        let field = |key: &str| match target.get(key) {
            Some(v) if !v.is_null() => to_value_string(v),
            _ => "?".to_string(),
        };
        let dpi = match target.get("dpi") {
            Some(v) if is_truthy(v) => to_value_string(v),
            _ => DEFAULT_TARGET_DPI.to_string(),
        };
        format!("{} x {} mm @ {} dpi", field("width_mm"), field("height_mm"), dpi)
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Untitled template"
        } else {
            &self.name
        }
    }
}

/// A usable dpi: not missing, zero, empty, or `false`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_flags() {
        let parse = |v: Value| serde_json::from_value::<VariableSpec>(v).unwrap();
        assert!(parse(json!({"name": "a", "optional": true})).is_optional());
        assert!(parse(json!({"name": "a", "is_optional": true})).is_optional());
        assert!(parse(json!({"name": "a", "required": false})).is_optional());
        assert!(!parse(json!({"name": "a", "required": true})).is_optional());
        assert!(!parse(json!({"name": "a"})).is_optional());
    }

    #[test]
    fn test_detail_minimal() {
        let detail: TemplateDetail = serde_json::from_value(json!({"id": "t1"})).unwrap();
        assert!(detail.variables.is_empty());
        assert_eq!(detail.template, Value::Null);
        assert_eq!(detail.target_summary(), "No template target");
        assert_eq!(detail.display_name(), "Untitled template");
    }

    #[test]
    fn test_target_summary_default_dpi() {
        let detail: TemplateDetail = serde_json::from_value(json!({
            "id": "t1",
            "preview_target": {"width_mm": 74, "height_mm": 26.5}
        }))
        .unwrap();
        assert_eq!(detail.target_summary(), "74 x 26.5 mm @ 203 dpi");
    }

    #[test]
    fn test_target_kept_as_served() {
        let target = json!({"width_mm": 74, "height_mm": 26, "dpi": 203.0, "rotate": 90});
        let detail: TemplateDetail =
            serde_json::from_value(json!({"id": "t1", "preview_target": target.clone()})).unwrap();
        assert_eq!(detail.preview_target, Some(target));
        assert_eq!(detail.target_summary(), "74 x 26 mm @ 203 dpi");
    }

    #[test]
    fn test_null_default_is_present() {
        let spec: VariableSpec =
            serde_json::from_value(json!({"name": "a", "default": null})).unwrap();
        assert_eq!(spec.default, Some(Value::Null));
        assert_eq!(VariableSpec::named("a").default, None);
    }

    #[test]
    fn test_display_label() {
        let mut spec = VariableSpec::named("sku");
        assert_eq!(spec.display_label(), "sku");
        spec.label = Some("SKU".into());
        assert_eq!(spec.display_label(), "SKU");
    }
}
