//! PageScanner - group presence detection over extracted page text
//!
//! For every canonical term of both groups, tests for a whole-word occurrence
//! in the lowercased page text. Each term is checked on its own; variants are
//! not expanded. The result gates the "submit current page" action, which
//! requires at least one term from each group.

use regex::Regex;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use super::boundary::whole_word_regex;
use crate::vocabulary::{Group, VocabularyStore};

// ==================== TYPE DEFINITIONS ====================

/// Full scan outcome, per group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub design_found: Vec<String>,
    pub design_missing: Vec<String>,
    pub critical_found: Vec<String>,
    pub critical_missing: Vec<String>,
    pub both_groups_present: bool,
}

/// Gating object handed to the submit action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordCheck {
    pub has_both_groups: bool,
    pub design_keywords_found: Vec<String>,
    pub critical_keywords_found: Vec<String>,
}

impl From<&ScanReport> for KeywordCheck {
    fn from(report: &ScanReport) -> Self {
        Self {
            has_both_groups: report.both_groups_present,
            design_keywords_found: report.design_found.clone(),
            critical_keywords_found: report.critical_found.clone(),
        }
    }
}

struct GroupPattern {
    term: String,
    /// None when the pattern failed to compile; the term then never matches
    pattern: Option<Regex>,
}

// ==================== MAIN IMPLEMENTATION ====================

/// PageScanner - whole-word group detector
#[wasm_bindgen]
pub struct PageScanner {
    design: Vec<GroupPattern>,
    critical: Vec<GroupPattern>,
}

impl PageScanner {
    /// Gate over the built-in group lists. Submission gating uses these
    /// whatever vocabulary drives highlighting.
    pub fn builtin() -> Self {
        Self::from_store(&VocabularyStore::fallback())
    }

    pub fn from_store(store: &VocabularyStore) -> Self {
        let patterns = |group: Group| -> Vec<GroupPattern> {
            store
                .group(group)
                .iter()
                .map(|g| GroupPattern {
                    term: g.term.clone(),
                    pattern: whole_word_regex(&g.term.to_lowercase(), false).ok(),
                })
                .collect()
        };
        Self {
            design: patterns(Group::Design),
            critical: patterns(Group::Critical),
        }
    }

    /// Scan extracted page text. Absence of matches is a normal result.
    pub fn scan(&self, text: &str) -> ScanReport {
        let lowered = text.to_lowercase();
        let (design_found, design_missing) = Self::partition(&self.design, &lowered);
        let (critical_found, critical_missing) = Self::partition(&self.critical, &lowered);
        let both_groups_present = !design_found.is_empty() && !critical_found.is_empty();

        ScanReport {
            design_found,
            design_missing,
            critical_found,
            critical_missing,
            both_groups_present,
        }
    }

    pub fn check(&self, text: &str) -> KeywordCheck {
        KeywordCheck::from(&self.scan(text))
    }

    fn partition(patterns: &[GroupPattern], lowered: &str) -> (Vec<String>, Vec<String>) {
        let mut found = Vec::new();
        let mut missing = Vec::new();
        for entry in patterns {
            let hit = entry.pattern.as_ref().is_some_and(|re| re.is_match(lowered));
            if hit {
                found.push(entry.term.clone());
            } else {
                missing.push(entry.term.clone());
            }
        }
        (found, missing)
    }
}

#[wasm_bindgen]
impl PageScanner {
    /// Create a scanner over the built-in vocabulary
    #[wasm_bindgen(constructor)]
    pub fn js_new() -> Self {
        Self::builtin()
    }

    /// Full report: { designFound, designMissing, criticalFound, criticalMissing, bothGroupsPresent }
    #[wasm_bindgen(js_name = scan)]
    pub fn js_scan(&self, text: &str) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.scan(text))
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Gating object: { hasBothGroups, designKeywordsFound, criticalKeywordsFound }
    #[wasm_bindgen(js_name = check)]
    pub fn js_check(&self, text: &str) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.check(text))
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}
