//! ExclusionPolicy - which text nodes are never rewritten
//!
//! A leaf is skipped when its parent element is a non-prose container
//! (controls, scripts, media, code), when the parent's class carries a
//! denylisted marker, or when the text is too short to be prose. Text already
//! inside one of our own markers is always skipped, so a second highlighting
//! pass cannot wrap a mark twice.

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::host::TextLeaf;

/// Class carried by every term marker
pub const MARK_CLASS: &str = "keyword-highlight";
/// Class carried by every known-name link
pub const NAME_LINK_CLASS: &str = "crit-name-link";

#[derive(Debug, Clone)]
pub struct ExclusionPolicy {
    skip_tags: HashSet<String>,
    class_markers: Vec<String>,
    min_text_length: usize,
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl ExclusionPolicy {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            skip_tags: config.skip_tags.iter().map(|t| t.to_ascii_uppercase()).collect(),
            class_markers: config
                .skip_class_markers
                .iter()
                .filter(|c| !c.is_empty())
                .cloned()
                .collect(),
            min_text_length: config.min_text_length,
        }
    }

    /// True if the leaf may be rewritten
    pub fn admits<N>(&self, leaf: &TextLeaf<N>) -> bool {
        let Some(tag) = leaf.parent_tag.as_deref() else {
            return false;
        };
        if self.skip_tags.contains(&tag.to_ascii_uppercase()) {
            return false;
        }

        let class = leaf.parent_class.as_str();
        if class.contains(MARK_CLASS) || class.contains(NAME_LINK_CLASS) {
            return false;
        }
        if self.class_markers.iter().any(|m| class.contains(m.as_str())) {
            return false;
        }

        leaf.text.trim().chars().count() >= self.min_text_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(tag: &str, class: &str, text: &str) -> TextLeaf<()> {
        TextLeaf {
            node: (),
            text: text.to_string(),
            parent_tag: Some(tag.to_string()),
            parent_class: class.to_string(),
        }
    }

    #[test]
    fn test_admits_prose() {
        let policy = ExclusionPolicy::default();
        assert!(policy.admits(&leaf("P", "", "design research")));
        assert!(policy.admits(&leaf("span", "body-copy", "abc")));
    }

    #[test]
    fn test_skips_non_prose_tags() {
        let policy = ExclusionPolicy::default();
        for tag in ["SCRIPT", "style", "BUTTON", "CODE", "PRE", "TEXTAREA"] {
            assert!(!policy.admits(&leaf(tag, "", "design research")), "{}", tag);
        }
    }

    #[test]
    fn test_skips_denylisted_classes() {
        let policy = ExclusionPolicy::default();
        assert!(!policy.admits(&leaf("SPAN", "main-nav item", "design")));
        assert!(!policy.admits(&leaf("DIV", "site-logo", "design")));
        assert!(!policy.admits(&leaf("SPAN", "goog-te-menu", "design")));
    }

    #[test]
    fn test_skips_own_markers() {
        let policy = ExclusionPolicy::default();
        assert!(!policy.admits(&leaf("MARK", MARK_CLASS, "design")));
        assert!(!policy.admits(&leaf("A", NAME_LINK_CLASS, "Dieter Rams")));
    }

    #[test]
    fn test_skips_short_and_orphan_text() {
        let policy = ExclusionPolicy::default();
        assert!(!policy.admits(&leaf("P", "", "  ab \n")));
        let orphan = TextLeaf {
            node: (),
            text: "design research".to_string(),
            parent_tag: None,
            parent_class: String::new(),
        };
        assert!(!policy.admits(&orphan));
    }
}
