//! Pattern tables driving the reduction rules.
//!
//! The tables are data, not logic: the built-in set is embedded from
//! `default_patterns.json` and parsed once on first use, and a deployment can
//! load a replacement file at start-up. Every entry is matched ASCII
//! case-insensitively; [`ReductionPatterns::normalized`] lowercases them once
//! so the hot path only lowercases the document side.

use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

static BUILTIN_PATTERNS_JSON: &str = include_str!("default_patterns.json");

static BUILTIN_PATTERNS: LazyLock<ReductionPatterns> = LazyLock::new(|| {
    ReductionPatterns::from_json_str(BUILTIN_PATTERNS_JSON)
        .expect("BUG: embedded default_patterns.json is invalid")
});

/// Heuristics for UI chrome that never renders as page content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NonVisiblePatterns {
    /// Exact tag names (custom elements such as `ytd-miniplayer`)
    pub tags: Vec<String>,
    /// Substrings searched for in `class` and `id` values
    pub class_or_id_substrings: Vec<String>,
    /// Attribute names whose presence marks an element as not rendered
    pub attribute_names: Vec<String>,
}

/// All pattern tables used by the reduction engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionPatterns {
    /// Elements removed together with their subtree
    pub removed_tags: Vec<String>,
    pub tracking_attribute_prefixes: Vec<String>,
    pub tracking_attributes: Vec<String>,
    pub accessibility_attribute_prefixes: Vec<String>,
    pub accessibility_attributes: Vec<String>,
    /// URL-bearing attributes eligible for marker compaction
    pub url_attributes: Vec<String>,
    /// Substrings identifying values the caller already sanitized
    pub sanitized_url_markers: Vec<String>,
    pub sanitized_url_placeholder: String,
    pub non_visible: NonVisiblePatterns,
}

/// Empty tables. Used for keys a pattern file leaves out; see [`ReductionPatterns::builtin`]
/// for the shipped set.
impl Default for ReductionPatterns {
    fn default() -> Self {
        Self {
            removed_tags: Vec::new(),
            tracking_attribute_prefixes: Vec::new(),
            tracking_attributes: Vec::new(),
            accessibility_attribute_prefixes: Vec::new(),
            accessibility_attributes: Vec::new(),
            url_attributes: Vec::new(),
            sanitized_url_markers: Vec::new(),
            sanitized_url_placeholder: "#".to_string(),
            non_visible: NonVisiblePatterns::default(),
        }
    }
}

impl ReductionPatterns {
    /// The embedded pattern set, parsed once per process
    #[must_use]
    pub fn builtin() -> &'static ReductionPatterns {
        &BUILTIN_PATTERNS
    }

    /// Parse a JSON pattern document. Missing keys fall back to empty lists.
    ///
    /// A placeholder that itself contains a sanitized-URL marker is rejected:
    /// it would be compacted again on every pass.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let patterns = serde_json::from_str::<ReductionPatterns>(json)?.normalized();

        let placeholder = patterns.sanitized_url_placeholder.to_ascii_lowercase();
        if let Some(marker) = patterns
            .sanitized_url_markers
            .iter()
            .find(|marker| placeholder.contains(marker.as_str()))
        {
            return Err(ConfigError::invalid(
                "sanitized_url_placeholder",
                &patterns.sanitized_url_placeholder,
                format!("placeholder contains the sanitized-URL marker {marker:?}"),
            ));
        }

        Ok(patterns)
    }

    /// Load a pattern file from disk
    pub async fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::PatternsIo {
                path: path.to_path_buf(),
                source,
            })?;
        let patterns = Self::from_json_str(&json)?;
        log::info!(
            "Loaded reduction patterns from {} ({} removed tags, {} non-visible substrings)",
            path.display(),
            patterns.removed_tags.len(),
            patterns.non_visible.class_or_id_substrings.len()
        );
        Ok(patterns)
    }

    /// Lowercase every entry and drop blanks
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for list in [
            &mut self.removed_tags,
            &mut self.tracking_attribute_prefixes,
            &mut self.tracking_attributes,
            &mut self.accessibility_attribute_prefixes,
            &mut self.accessibility_attributes,
            &mut self.url_attributes,
            &mut self.sanitized_url_markers,
            &mut self.non_visible.tags,
            &mut self.non_visible.class_or_id_substrings,
            &mut self.non_visible.attribute_names,
        ] {
            normalize_list(list);
        }
        self
    }

    pub(crate) fn is_removed_tag(&self, name: &str) -> bool {
        contains_ignore_case(&self.removed_tags, name)
    }

    /// Tracking, schema-metadata, and accessibility-only attributes
    pub(crate) fn is_stripped_attribute(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        self.tracking_attributes.contains(&name)
            || self.accessibility_attributes.contains(&name)
            || self
                .tracking_attribute_prefixes
                .iter()
                .chain(&self.accessibility_attribute_prefixes)
                .any(|prefix| name.starts_with(prefix.as_str()))
    }

    pub(crate) fn is_url_attribute(&self, name: &str) -> bool {
        contains_ignore_case(&self.url_attributes, name)
    }

    pub(crate) fn is_sanitized_url(&self, value: &str) -> bool {
        if value == self.sanitized_url_placeholder {
            return false;
        }
        let value = value.to_ascii_lowercase();
        self.sanitized_url_markers
            .iter()
            .any(|marker| value.contains(marker.as_str()))
    }

    pub(crate) fn is_non_visible_tag(&self, name: &str) -> bool {
        contains_ignore_case(&self.non_visible.tags, name)
    }

    pub(crate) fn is_non_visible_attribute(&self, name: &str) -> bool {
        contains_ignore_case(&self.non_visible.attribute_names, name)
    }

    /// Whether a `class` or `id` value names hidden UI chrome
    pub(crate) fn is_non_visible_class_or_id(&self, value: &str) -> bool {
        let value = value.to_ascii_lowercase();
        self.non_visible
            .class_or_id_substrings
            .iter()
            .any(|needle| value.contains(needle.as_str()))
    }
}

fn normalize_list(list: &mut Vec<String>) {
    for entry in list.iter_mut() {
        *entry = entry.trim().to_ascii_lowercase();
    }
    list.retain(|entry| !entry.is_empty());
    list.dedup();
}

fn contains_ignore_case(list: &[String], name: &str) -> bool {
    list.iter().any(|entry| entry.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_patterns_parse() {
        let patterns = ReductionPatterns::builtin();
        assert_eq!(patterns.removed_tags, vec!["script", "style", "meta", "link"]);
        assert_eq!(patterns.sanitized_url_placeholder, "#");
        assert!(patterns.non_visible.class_or_id_substrings.contains(&"spinner".to_string()));
    }

    #[test]
    fn test_attribute_classification() {
        let patterns = ReductionPatterns::builtin();
        assert!(patterns.is_stripped_attribute("data-tracking-id"));
        assert!(patterns.is_stripped_attribute("aria-hidden"));
        assert!(patterns.is_stripped_attribute("role"));
        assert!(patterns.is_stripped_attribute("ItemProp"));
        assert!(!patterns.is_stripped_attribute("class"));
        assert!(!patterns.is_stripped_attribute("database"));
    }

    #[test]
    fn test_sanitized_url_detection() {
        let patterns = ReductionPatterns::builtin();
        assert!(patterns.is_sanitized_url("[sanitized-url]"));
        assert!(patterns.is_sanitized_url("JavaScript:void(0)"));
        assert!(!patterns.is_sanitized_url("https://example.com/a"));
        assert!(!patterns.is_sanitized_url("#"));
    }

    #[test]
    fn test_partial_json_uses_empty_defaults_and_normalizes() {
        let patterns = ReductionPatterns::from_json_str(r#"{"removed_tags": [" SCRIPT ", ""]}"#).unwrap();
        assert_eq!(patterns.removed_tags, vec!["script"]);
        assert!(patterns.tracking_attributes.is_empty());
    }

    #[test]
    fn test_placeholder_containing_a_marker_is_rejected() {
        let result = ReductionPatterns::from_json_str(
            r#"{"sanitized_url_markers": ["[sanitized"], "sanitized_url_placeholder": "[SANITIZED]"}"#,
        );
        match result {
            Err(ConfigError::InvalidValue { key, value, .. }) => {
                assert_eq!(key, "sanitized_url_placeholder");
                assert_eq!(value, "[SANITIZED]");
            }
            other => panic!("unexpected: {other:?}"),
        }

        let patterns = ReductionPatterns::from_json_str(
            r#"{"sanitized_url_markers": ["[sanitized"], "sanitized_url_placeholder": "about:blank"}"#,
        )
        .unwrap();
        assert!(!patterns.is_sanitized_url("about:blank"));
    }

    #[test]
    fn test_invalid_json_is_a_config_error() {
        let result = ReductionPatterns::from_json_str("{not json");
        assert!(matches!(result, Err(ConfigError::PatternsJson(_))));
    }
}
