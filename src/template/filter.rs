//! Search and tag filtering for the template list.

use std::collections::{BTreeSet, HashSet};

use super::schema::TemplateSummary;

/// Active filters on the template list.
#[derive(Debug, Clone, Default)]
pub struct TemplateFilter {
    /// Free-text search, matched case-insensitively.
    pub search: String,
    /// Selected tags; a template must carry at least one of them.
    pub tags: HashSet<String>,
}

impl TemplateFilter {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            tags: HashSet::new(),
        }
    }

    /// Select the tag if unselected, otherwise unselect it.
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.tags.remove(tag) {
            self.tags.insert(tag.to_string());
        }
    }

    pub fn matches(&self, template: &TemplateSummary) -> bool {
        if !self.tags.is_empty() && !template.tags.iter().any(|t| self.tags.contains(t)) {
            return false;
        }
        let search = self.search.trim().to_lowercase();
        if search.is_empty() {
            return true;
        }
        let variable_names: Vec<&str> = template
            .variables
            .iter()
            .map(|v| match v.label.as_deref() {
                _ if !v.name.is_empty() => v.name.as_str(),
                Some(label) => label,
                None => "",
            })
            .collect();
        let haystack = format!(
            "{} {} {}",
            template.name,
            template.tags.join(" "),
            variable_names.join(" ")
        )
        .to_lowercase();
        haystack.contains(&search)
    }

    /// Templates passing the filter, in their original order.
    pub fn apply<'a>(&self, templates: &'a [TemplateSummary]) -> Vec<&'a TemplateSummary> {
        templates.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Every tag used by any template, sorted and de-duplicated.
pub fn all_tags(templates: &[TemplateSummary]) -> Vec<String> {
    templates
        .iter()
        .flat_map(|t| t.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::VariableSpec;
    use pretty_assertions::assert_eq;

    fn template(name: &str, tags: &[&str], vars: &[&str]) -> TemplateSummary {
        TemplateSummary {
            id: name.to_lowercase(),
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            variables: vars.iter().map(|v| VariableSpec::named(*v)).collect(),
            preview_available: false,
        }
    }

    fn fixtures() -> Vec<TemplateSummary> {
        vec![
            template("Shipping", &["logistics"], &["address", "tracking"]),
            template("Shelf", &["retail", "logistics"], &["sku", "price"]),
            template("Name Badge", &["events"], &["name"]),
        ]
    }

    fn names(list: Vec<&TemplateSummary>) -> Vec<&str> {
        list.into_iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let templates = fixtures();
        assert_eq!(TemplateFilter::default().apply(&templates).len(), 3);
    }

    #[test]
    fn test_search_covers_name_tags_and_variables() {
        let templates = fixtures();
        assert_eq!(names(TemplateFilter::new("  SHELF ").apply(&templates)), vec!["Shelf"]);
        assert_eq!(names(TemplateFilter::new("events").apply(&templates)), vec!["Name Badge"]);
        assert_eq!(names(TemplateFilter::new("tracking").apply(&templates)), vec!["Shipping"]);
    }

    #[test]
    fn test_tags_match_any() {
        let templates = fixtures();
        let mut filter = TemplateFilter::default();
        filter.toggle_tag("retail");
        filter.toggle_tag("events");
        assert_eq!(names(filter.apply(&templates)), vec!["Shelf", "Name Badge"]);

        filter.toggle_tag("events");
        filter.search = "price".into();
        assert_eq!(names(filter.apply(&templates)), vec!["Shelf"]);
    }

    #[test]
    fn test_all_tags_sorted() {
        assert_eq!(all_tags(&fixtures()), vec!["events", "logistics", "retail"]);
    }
}
