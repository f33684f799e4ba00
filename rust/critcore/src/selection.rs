//! SelectionTracker - the activated-mark state machine
//!
//! Holds at most one mark per term plus the ordered set of activated terms.
//! A click on mark `m` with term `t`:
//! 1. `m` already activated -> deselect it and drop `t`
//! 2. another mark of `t` activated -> swap in `m`, terms unchanged
//! 3. otherwise -> activate `m` and add `t`
//!
//! Term order is insertion order, like a JS `Set`, and it is the order of
//! the `keyword` parameters on navigation.

use serde::{Deserialize, Serialize};

/// Which transition a toggle took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    Deselected,
    Replaced,
    Added,
}

#[derive(Debug, Clone)]
struct Activated<M> {
    term: String,
    mark: M,
}

#[derive(Debug, Clone)]
pub struct SelectionTracker<M> {
    entries: Vec<Activated<M>>,
    terms: Vec<String>,
}

impl<M> Default for SelectionTracker<M> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            terms: Vec::new(),
        }
    }
}

impl<M: PartialEq> SelectionTracker<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, mark: M, term: &str) -> Transition {
        if let Some(idx) = self.entries.iter().position(|e| e.mark == mark) {
            let removed = self.entries.remove(idx);
            self.terms.retain(|t| t != &removed.term);
            return Transition::Deselected;
        }

        if let Some(entry) = self.entries.iter_mut().find(|e| e.term == term) {
            entry.mark = mark;
            return Transition::Replaced;
        }

        self.entries.push(Activated {
            term: term.to_string(),
            mark,
        });
        if !self.terms.iter().any(|t| t == term) {
            self.terms.push(term.to_string());
        }
        Transition::Added
    }

    pub fn is_activated(&self, mark: &M) -> bool {
        self.entries.iter().any(|e| &e.mark == mark)
    }

    /// Activated marks in activation order
    pub fn marks(&self) -> impl Iterator<Item = &M> {
        self.entries.iter().map(|e| &e.mark)
    }

    /// Activated terms in insertion order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn mark_for(&self, term: &str) -> Option<&M> {
        self.entries.iter().find(|e| e.term == term).map(|e| &e.mark)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_empties() {
        let mut sel = SelectionTracker::new();
        assert_eq!(sel.toggle(1, "design"), Transition::Added);
        assert_eq!(sel.toggle(1, "design"), Transition::Deselected);
        assert!(sel.is_empty());
        assert!(sel.terms().is_empty());
    }

    #[test]
    fn test_other_occurrence_replaces() {
        let mut sel = SelectionTracker::new();
        sel.toggle(1, "design");
        sel.toggle(2, "critical");
        assert_eq!(sel.toggle(3, "design"), Transition::Replaced);

        assert_eq!(sel.len(), 2);
        assert_eq!(sel.terms(), &["design", "critical"]);
        assert_eq!(sel.mark_for("design"), Some(&3));
        assert!(!sel.is_activated(&1));
        assert!(sel.is_activated(&3));
    }

    #[test]
    fn test_replaced_mark_deselects_term() {
        let mut sel = SelectionTracker::new();
        sel.toggle(1, "design");
        sel.toggle(3, "design");
        // the old occurrence is no longer activated, so clicking it swaps back
        assert_eq!(sel.toggle(1, "design"), Transition::Replaced);
        assert_eq!(sel.toggle(1, "design"), Transition::Deselected);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_term_order_is_insertion_order() {
        let mut sel = SelectionTracker::new();
        sel.toggle(1, "a");
        sel.toggle(2, "b");
        sel.toggle(1, "a");
        sel.toggle(4, "a");
        let marks: Vec<_> = sel.marks().copied().collect();
        assert_eq!(sel.terms(), &["b", "a"]);
        assert_eq!(marks, vec![2, 4]);
    }
}
