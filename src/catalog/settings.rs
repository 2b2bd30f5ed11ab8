use serde::Deserialize;
use std::collections::HashMap;

/// Relation → navigation label table used when no override is configured.
const DEFAULT_LINK_LABELS: [(&str, &str); 5] = [
    ("start", "HOME"),
    ("self", "RELOAD"),
    ("up", "UP"),
    ("next", "NEXT"),
    ("prev", "PREV"),
];

/// Display labels for feed-level navigation links, keyed by relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkLabels(HashMap<String, String>);

impl Default for LinkLabels {
    fn default() -> Self {
        Self(
            DEFAULT_LINK_LABELS
                .iter()
                .map(|(rel, label)| (rel.to_string(), label.to_string()))
                .collect(),
        )
    }
}

impl LinkLabels {
    /// Default table with user overrides applied on top.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut labels = Self::default();
        for (rel, label) in overrides {
            labels.0.insert(rel.clone(), label.clone());
        }
        labels
    }

    /// Label for a link: the mapped label, else the relation, else the href.
    pub fn label_for(&self, rel: Option<&str>, href: &str) -> String {
        match rel.filter(|r| !r.is_empty()) {
            Some(rel) => self
                .0
                .get(rel)
                .cloned()
                .unwrap_or_else(|| rel.to_string()),
            None => href.to_string(),
        }
    }
}

/// Localizable strings shown by renderers and hosts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UiStrings {
    /// Prefix of the update timestamp line in book records.
    pub added: String,
    /// Notice for a search submitted without a term.
    pub empty_query: String,
    /// Notice for a failed fetch.
    pub fetch_failed: String,
}

impl Default for UiStrings {
    fn default() -> Self {
        Self {
            added: "Added".to_string(),
            empty_query: "Enter a search query".to_string(),
            fetch_failed: "Failed to fetch OPDS data".to_string(),
        }
    }
}

/// Immutable lookup tables shared by the navigator and the renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    /// Catalog prefix without surrounding slashes, e.g. `opds`.
    pub prefix: String,
    pub labels: LinkLabels,
    pub strings: UiStrings,
}

impl CatalogSettings {
    pub fn new(prefix: &str, labels: LinkLabels, strings: UiStrings) -> Self {
        Self {
            prefix: prefix.trim_matches('/').to_string(),
            labels,
            strings,
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self::new("opds", LinkLabels::default(), UiStrings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels() {
        let labels = LinkLabels::default();
        assert_eq!(labels.label_for(Some("start"), "/opds/"), "HOME");
        assert_eq!(labels.label_for(Some("self"), "/opds/x"), "RELOAD");
        assert_eq!(labels.label_for(Some("up"), "/opds/"), "UP");
        assert_eq!(labels.label_for(Some("next"), "/opds/x?page=2"), "NEXT");
        assert_eq!(labels.label_for(Some("prev"), "/opds/x?page=0"), "PREV");
    }

    #[test]
    fn test_unmapped_relation_falls_back_to_relation() {
        let labels = LinkLabels::default();
        assert_eq!(
            labels.label_for(Some("http://opds-spec.org/facet"), "/opds/a"),
            "http://opds-spec.org/facet"
        );
    }

    #[test]
    fn test_missing_relation_falls_back_to_href() {
        let labels = LinkLabels::default();
        assert_eq!(labels.label_for(None, "/opds/a"), "/opds/a");
        assert_eq!(labels.label_for(Some(""), "/opds/a"), "/opds/a");
    }

    #[test]
    fn test_overrides_replace_and_extend() {
        let overrides = HashMap::from([
            ("start".to_string(), "ДОМОЙ".to_string()),
            ("first".to_string(), "FIRST".to_string()),
        ]);
        let labels = LinkLabels::with_overrides(&overrides);
        assert_eq!(labels.label_for(Some("start"), "/"), "ДОМОЙ");
        assert_eq!(labels.label_for(Some("first"), "/"), "FIRST");
        assert_eq!(labels.label_for(Some("up"), "/"), "UP");
    }

    #[test]
    fn test_settings_trim_prefix() {
        let settings = CatalogSettings::new("/opds/", LinkLabels::default(), UiStrings::default());
        assert_eq!(settings.prefix, "opds");
    }
}
