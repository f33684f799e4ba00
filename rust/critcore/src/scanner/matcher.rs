//! TermMatcher - two-phase term detection for the highlight rewriter
//!
//! Phase 1 is a cheap substring pre-filter. An Aho-Corasick automaton over the
//! lowercased terms reports which terms occur anywhere in the lowercased node
//! text, overlaps included. Phase 2 confirms every candidate with a
//! case-insensitive whole-word regex and splices matches into marker
//! fragments.
//!
//! # Ordering
//! Terms are applied longest first, so "designer" is claimed before "design"
//! can see it. Each pass only splits plain-text fragments, so a shorter term
//! can never land inside a marker produced by a longer one.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, BuildError, MatchKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::collections::BTreeSet;

use super::boundary::whole_word_regex;
use crate::vocabulary::{Color, VocabularyStore};

// ==================== TYPE DEFINITIONS ====================

/// One piece of a rewritten text node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fragment {
    /// Untouched text
    Text { text: String },
    /// Clickable term marker; `text` keeps the casing found on the page
    Term { term: String, text: String, color: Color },
    /// Known-name link showing the canonical name
    Name { name: String, url: String },
}

impl Fragment {
    pub fn text(text: impl Into<String>) -> Self {
        Fragment::Text { text: text.into() }
    }

    pub fn is_marker(&self) -> bool {
        !matches!(self, Fragment::Text { .. })
    }

    /// Term carried by a term marker
    pub fn term(&self) -> Option<&str> {
        match self {
            Fragment::Term { term, .. } => Some(term),
            _ => None,
        }
    }
}

/// Split every plain-text fragment around the matches of `pattern`
pub fn splice<F>(fragments: Vec<Fragment>, pattern: &Regex, mut make: F) -> Vec<Fragment>
where
    F: FnMut(&str) -> Fragment,
{
    let mut out = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        let text = match fragment {
            Fragment::Text { text } => text,
            marker => {
                out.push(marker);
                continue;
            }
        };

        let mut last = 0;
        for m in pattern.find_iter(&text) {
            if m.start() > last {
                out.push(Fragment::text(&text[last..m.start()]));
            }
            out.push(make(m.as_str()));
            last = m.end();
        }
        if last == 0 {
            out.push(Fragment::Text { text });
        } else if last < text.len() {
            out.push(Fragment::text(&text[last..]));
        }
    }
    out
}

struct MatcherTerm {
    term: String,
    color: Color,
    /// Compiled on first use; None if the pattern could not be built
    pattern: OnceCell<Option<Regex>>,
}

// ==================== MAIN IMPLEMENTATION ====================

pub struct TermMatcher {
    /// Longest first; index doubles as the pre-filter pattern id
    terms: Vec<MatcherTerm>,
    prefilter: AhoCorasick,
}

impl TermMatcher {
    pub fn from_store(store: &VocabularyStore) -> Result<Self, BuildError> {
        let terms = store
            .all_terms()
            .iter()
            .filter_map(|t| store.color_of(t).map(|c| (t.clone(), c.clone())))
            .collect();
        Self::new(terms)
    }

    /// Build from `(term, colour)` pairs in insertion order
    pub fn new(terms: Vec<(String, Color)>) -> Result<Self, BuildError> {
        let mut terms: Vec<MatcherTerm> = terms
            .into_iter()
            .map(|(term, color)| (term.to_lowercase(), color))
            .filter(|(term, _)| !term.is_empty())
            .map(|(term, color)| MatcherTerm {
                term,
                color,
                pattern: OnceCell::new(),
            })
            .collect();
        // stable: equal lengths keep insertion order
        terms.sort_by(|a, b| b.term.chars().count().cmp(&a.term.chars().count()));

        let prefilter = AhoCorasickBuilder::new()
            .match_kind(MatchKind::Standard)
            .build(terms.iter().map(|t| t.term.as_str()))?;

        Ok(Self { terms, prefilter })
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in application order (longest first)
    pub fn ordered_terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.term.as_str())
    }

    /// Phase 1: does the text contain any term as a plain substring?
    pub fn prefilter(&self, text: &str) -> bool {
        self.prefilter.is_match(&text.to_lowercase())
    }

    /// Phase 1 candidates, in application order
    fn candidates(&self, lowered: &str) -> BTreeSet<usize> {
        self.prefilter
            .find_overlapping_iter(lowered)
            .map(|m| m.pattern().as_usize())
            .collect()
    }

    fn pattern(&self, idx: usize) -> Option<&Regex> {
        let entry = &self.terms[idx];
        entry
            .pattern
            .get_or_init(|| match whole_word_regex(&entry.term, true) {
                Ok(re) => Some(re),
                Err(e) => {
                    console_warn!("[Highlighter] Skipping term {:?}: {}", entry.term, e);
                    None
                }
            })
            .as_ref()
    }

    /// Rewrite `text` into fragments. Returns None when nothing qualifies,
    /// so the caller leaves the node alone.
    pub fn rewrite(&self, text: &str) -> Option<Vec<Fragment>> {
        let candidates = self.candidates(&text.to_lowercase());
        if candidates.is_empty() {
            return None;
        }

        let mut fragments = vec![Fragment::text(text)];
        for idx in candidates {
            let Some(pattern) = self.pattern(idx) else {
                continue;
            };
            let entry = &self.terms[idx];
            fragments = splice(fragments, pattern, |matched| Fragment::Term {
                term: entry.term.clone(),
                text: matched.to_string(),
                color: entry.color.clone(),
            });
        }

        fragments.iter().any(Fragment::is_marker).then_some(fragments)
    }
}
