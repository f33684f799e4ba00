//! VocabularyStore - the two discourse groups plus the term colour mapping
//!
//! Built in one step, either entirely from the bundled rich resources or
//! entirely from the built-in fallback lists. Read-only afterwards.
//!
//! # Invariant
//! Every term reported by `all_terms()` has a colour. Terms without an
//! external colour get a palette colour cycled by their insertion position.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::palette::Color;
use super::resource::{ColorResource, GroupTerm, ResourceError, VariantResource};

// ==================== BUILT-IN VOCABULARY ====================

pub const FALLBACK_DESIGN_TERMS: [&str; 17] = [
    "design", "method", "making", "applied art", "intention", "plan", "research", "tool",
    "inquiry", "practice", "work", "concept", "craft", "exploration", "engineering", "shape",
    "project",
];

pub const FALLBACK_CRITICAL_TERMS: [&str; 19] = [
    "critical", "conceptual", "analytical", "deconstructive", "collaborative",
    "interdisciplinary", "contextual", "iterative", "reflective", "theoretical", "evaluative",
    "investigative", "explore", "dialectical", "discursive", "reflexive", "narrative",
    "speculative", "systemic",
];

// ==================== TYPE DEFINITIONS ====================

/// One of the two disjoint discourse groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    Design,
    Critical,
}

/// Where the store's contents came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VocabularySource {
    Rich,
    Fallback,
}

// ==================== MAIN IMPLEMENTATION ====================

#[derive(Debug, Clone)]
pub struct VocabularyStore {
    design: Vec<GroupTerm>,
    critical: Vec<GroupTerm>,
    /// Highlightable terms in insertion order
    terms: Vec<String>,
    colors: HashMap<String, Color>,
    source: VocabularySource,
}

impl Default for VocabularyStore {
    fn default() -> Self {
        Self::fallback()
    }
}

impl VocabularyStore {
    /// Build from the rich resources: terms are the colour-mapping keys in
    /// resource order, followed by any canonical group term that has no colour.
    pub fn rich(variants: VariantResource, palette: ColorResource) -> Self {
        let mut store = Self {
            design: variants.design,
            critical: variants.critical,
            terms: Vec::with_capacity(palette.entries.len()),
            colors: HashMap::with_capacity(palette.entries.len()),
            source: VocabularySource::Rich,
        };

        for (term, color) in palette.entries {
            store.insert(term, Some(color));
        }

        let canonical: Vec<String> = store
            .design
            .iter()
            .chain(store.critical.iter())
            .map(|g| g.term.clone())
            .collect();
        for term in canonical {
            store.insert(term, None);
        }

        store
    }

    /// Build from the hardcoded lists with palette-cycled colours
    pub fn fallback() -> Self {
        let group = |terms: &[&str]| -> Vec<GroupTerm> {
            terms
                .iter()
                .map(|t| GroupTerm {
                    term: t.to_string(),
                    variants: vec![t.to_string()],
                })
                .collect()
        };

        let mut store = Self {
            design: group(&FALLBACK_DESIGN_TERMS),
            critical: group(&FALLBACK_CRITICAL_TERMS),
            terms: Vec::new(),
            colors: HashMap::new(),
            source: VocabularySource::Fallback,
        };

        for term in FALLBACK_DESIGN_TERMS.iter().chain(FALLBACK_CRITICAL_TERMS.iter()) {
            store.insert(term.to_string(), None);
        }
        store
    }

    /// Resolve the load attempt: rich if both resources arrived and parsed,
    /// fallback otherwise. The store is never half-built.
    pub fn resolve(
        variants: Result<String, ResourceError>,
        colors: Result<String, ResourceError>,
    ) -> Self {
        let parsed = variants
            .and_then(|text| VariantResource::parse(&text))
            .and_then(|v| colors.and_then(|text| ColorResource::parse(&text)).map(|c| (v, c)));

        match parsed {
            Ok((variants, palette)) => {
                let store = Self::rich(variants, palette);
                console_log!("[Vocabulary] Loaded {} terms from bundled resources", store.len());
                store
            }
            Err(e) => {
                console_warn!("[Vocabulary] {}; falling back to built-in terms", e);
                let store = Self::fallback();
                console_log!("[Vocabulary] Using {} built-in terms", store.len());
                store
            }
        }
    }

    fn insert(&mut self, term: String, color: Option<Color>) {
        if self.colors.contains_key(&term) {
            return;
        }
        let color = color.unwrap_or_else(|| Color::cycled(self.terms.len()));
        self.colors.insert(term.clone(), color);
        self.terms.push(term);
    }

    pub fn is_term(&self, word: &str) -> bool {
        self.colors.contains_key(word) || self.colors.contains_key(&word.to_lowercase())
    }

    pub fn color_of(&self, term: &str) -> Option<&Color> {
        self.colors
            .get(term)
            .or_else(|| self.colors.get(&term.to_lowercase()))
    }

    /// Highlightable terms in insertion order
    pub fn all_terms(&self) -> &[String] {
        &self.terms
    }

    /// Canonical terms of one group
    pub fn group(&self, group: Group) -> &[GroupTerm] {
        match group {
            Group::Design => &self.design,
            Group::Critical => &self.critical,
        }
    }

    pub fn source(&self) -> VocabularySource {
        self.source
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variants() -> Result<String, ResourceError> {
        Ok(r#"const keywords = {
            "design_group": { "design": ["design", "designer"], "plan": ["plan"] },
            "critical_group": { "critical": ["critical"] }
        }; export default keywords;"#
            .to_string())
    }

    #[test]
    fn test_fallback_every_term_has_color() {
        let store = VocabularyStore::fallback();
        assert_eq!(store.source(), VocabularySource::Fallback);
        assert_eq!(store.len(), 36);
        for term in store.all_terms() {
            assert!(store.color_of(term).is_some(), "{} has no colour", term);
        }
        assert_eq!(store.color_of("design").unwrap().as_str(), "#FFD700");
        // 36th term wraps around the 35-colour palette
        assert_eq!(store.color_of("systemic").unwrap().as_str(), "#FFD700");
    }

    #[test]
    fn test_rich_uses_color_keys_then_canonical() {
        let colors = Ok(r##"{"designer": "#111111", "design": "#222222"}"##.to_string());
        let store = VocabularyStore::resolve(variants(), colors);

        assert_eq!(store.source(), VocabularySource::Rich);
        assert_eq!(store.all_terms(), &["designer", "design", "plan", "critical"]);
        assert_eq!(store.color_of("designer").unwrap().as_str(), "#111111");
        // plan sits at index 2 and has no external colour
        assert_eq!(store.color_of("plan").unwrap(), &Color::cycled(2));
        for term in store.all_terms() {
            assert!(store.color_of(term).is_some());
        }
    }

    #[test]
    fn test_color_failure_falls_back_entirely() {
        let colors = Err(ResourceError::Status {
            path: "keywords_with_colors.json".into(),
            status: 404,
        });
        let store = VocabularyStore::resolve(variants(), colors);
        assert_eq!(store.source(), VocabularySource::Fallback);
        assert_eq!(store.group(Group::Design).len(), 17);
        assert!(!store.is_term("designer"));
    }

    #[test]
    fn test_malformed_variants_fall_back() {
        let colors = Ok(r##"{"design": "#222222"}"##.to_string());
        let store = VocabularyStore::resolve(Ok("[1, 2, 3]".to_string()), colors);
        assert_eq!(store.source(), VocabularySource::Fallback);
    }

    #[test]
    fn test_is_term_case_insensitive() {
        let store = VocabularyStore::fallback();
        assert!(store.is_term("Design"));
        assert!(store.is_term("applied art"));
        assert!(!store.is_term("designer"));
    }

    #[test]
    fn test_groups_are_disjoint() {
        let store = VocabularyStore::fallback();
        for d in store.group(Group::Design) {
            assert!(store.group(Group::Critical).iter().all(|c| c.term != d.term));
        }
    }
}
