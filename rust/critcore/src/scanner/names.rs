//! NameMatcher - the known-name link pass
//!
//! Exact, case-insensitive, whole-word matching of a fixed list of proper
//! names. Longest name first; each match becomes a link fragment that shows
//! the canonical spelling.

use regex::Regex;

use super::boundary::whole_word_regex;
use super::matcher::{splice, Fragment};
use crate::vocabulary::KnownName;

struct NameEntry {
    name: KnownName,
    lowered: String,
    pattern: Regex,
}

pub struct NameMatcher {
    entries: Vec<NameEntry>,
}

impl NameMatcher {
    pub fn new(names: Vec<KnownName>) -> Self {
        let mut entries: Vec<NameEntry> = names
            .into_iter()
            .filter_map(|name| {
                let trimmed = name.name.trim().to_string();
                match whole_word_regex(&trimmed, true) {
                    Ok(pattern) => Some(NameEntry {
                        lowered: trimmed.to_lowercase(),
                        name: KnownName {
                            name: trimmed,
                            url: name.url,
                        },
                        pattern,
                    }),
                    Err(e) => {
                        console_warn!("[Names] Skipping {:?}: {}", name.name, e);
                        None
                    }
                }
            })
            .collect();
        entries.sort_by(|a, b| b.name.name.chars().count().cmp(&a.name.name.chars().count()));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite `text` into fragments, or None if no name occurs
    pub fn rewrite(&self, text: &str) -> Option<Vec<Fragment>> {
        let lowered = text.to_lowercase();
        let mut fragments = vec![Fragment::text(text)];
        let mut hit = false;

        for entry in &self.entries {
            if !lowered.contains(&entry.lowered) {
                continue;
            }
            fragments = splice(fragments, &entry.pattern, |_| {
                hit = true;
                Fragment::Name {
                    name: entry.name.name.clone(),
                    url: entry.name.url.clone(),
                }
            });
        }

        hit.then_some(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> NameMatcher {
        NameMatcher::new(
            list.iter()
                .map(|n| KnownName {
                    name: n.to_string(),
                    url: format!("https://example.org/{}", n.len()),
                })
                .collect(),
        )
    }

    #[test]
    fn test_longest_name_wins() {
        let m = names(&["Rams", "Dieter Rams"]);
        let fragments = m.rewrite("an essay on dieter rams").unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(
            fragments[1],
            Fragment::Name {
                name: "Dieter Rams".into(),
                url: "https://example.org/11".into()
            }
        );
    }

    #[test]
    fn test_whole_word_only() {
        let m = names(&["Eames"]);
        assert!(m.rewrite("the Eameses chair").is_none());
        assert!(m.rewrite("Charles EAMES, 1956").is_some());
    }

    #[test]
    fn test_no_names() {
        let m = names(&[]);
        assert!(m.is_empty());
        assert!(m.rewrite("Dieter Rams").is_none());
    }
}
