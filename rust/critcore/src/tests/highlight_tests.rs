//! Tests for the highlighting passes and the gating check

use super::fake_host::FakeHost;
use super::{controller, ARTICLE_URL};
use crate::host::PageHost;
use crate::scanner::ExclusionPolicy;
use crate::vocabulary::{KnownName, VocabularySource, VocabularyStore};

const VARIANTS: &str = r#"{
  "design_group": { "design": ["design", "designs"], "designer": ["designer"] },
  "critical_group": { "critical": ["critical"], "speculative": ["speculative"] }
}"#;

const COLORS: &str = r##"{ "design": "#111111", "designer": "#222222", "critical": "#333333" }"##;

fn rich_store() -> VocabularyStore {
    VocabularyStore::resolve(Ok(VARIANTS.to_string()), Ok(COLORS.to_string()))
}

// ============================================================================
// Term pass
// ============================================================================

#[test]
fn test_fallback_terms_highlighted() {
    let host = FakeHost::with_paragraphs(ARTICLE_URL, &["Critical design is a practice."]);
    let mut c = controller(host);

    let stats = c.highlight_terms();

    assert_eq!(stats.rewritten, 1);
    assert_eq!(stats.marks, 3);
    let h = c.host();
    assert_eq!(h.marks_for("critical").len(), 1);
    assert_eq!(h.marks_for("design").len(), 1);
    assert_eq!(h.marks_for("practice").len(), 1);

    // page casing survives inside the marker
    let critical = h.mark(h.marks_for("critical")[0]).unwrap();
    assert_eq!(critical.text, "Critical");

    let text: Vec<&str> = h.leaves.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(text.concat(), "Critical design is a practice.");
}

#[test]
fn test_longest_term_wins() {
    let host = FakeHost::with_paragraphs(ARTICLE_URL, &["designer workshop"]);
    let mut c = controller(host);
    c.install_vocabulary(rich_store());

    c.highlight_terms();

    let h = c.host();
    assert_eq!(h.marks_for("designer").len(), 1);
    assert!(h.marks_for("design").is_empty());
    assert_eq!(h.mark(h.marks_for("designer")[0]).unwrap().text, "designer");
}

#[test]
fn test_every_term_has_color() {
    let store = rich_store();
    assert_eq!(store.source(), VocabularySource::Rich);
    for term in store.all_terms() {
        assert!(store.color_of(term).is_some(), "{} has no colour", term);
    }
    // canonical term missing from the colour map still gets one
    assert!(store.color_of("speculative").is_some());
}

#[test]
fn test_second_pass_is_noop() {
    let host = FakeHost::with_paragraphs(ARTICLE_URL, &["A critical practice of design."]);
    let mut c = controller(host);

    let first = c.highlight_terms();
    let second = c.highlight_terms();

    assert_eq!(first.marks, 3);
    assert_eq!(second.marks, 0);
    assert_eq!(c.host().marks.len(), 3);

    // text already inside a marker is never admitted again
    let policy = ExclusionPolicy::default();
    let admitted_marker_text = c
        .host()
        .text_leaves()
        .iter()
        .filter(|l| l.parent_tag.as_deref() == Some("MARK"))
        .any(|l| policy.admits(l));
    assert!(!admitted_marker_text);
}

#[test]
fn test_excluded_containers_untouched() {
    let mut host = FakeHost::new(ARTICLE_URL);
    host.push_leaf("var design = critical;", "SCRIPT", "");
    host.push_leaf("Design", "BUTTON", "");
    host.push_leaf("design menu", "DIV", "main-nav");
    host.push_leaf("design", "SPAN", "goog-te-gadget");
    host.push_leaf("is", "P", "");
    host.push_leaf("Practice makes design.", "P", "");
    let mut c = controller(host);

    let stats = c.highlight_terms();

    assert_eq!(stats.rewritten, 1);
    assert_eq!(c.host().marks_for("design").len(), 1);
    assert_eq!(c.host().leaves[0].text, "var design = critical;");
}

#[test]
fn test_no_match_leaves_node_alone() {
    let host = FakeHost::with_paragraphs(ARTICLE_URL, &["Redesigned toolkits abound."]);
    let mut c = controller(host);

    let stats = c.highlight_terms();

    // "design" and "tool" occur only inside longer words
    assert_eq!(stats.rewritten, 0);
    assert_eq!(c.host().leaves.len(), 1);
}

#[test]
fn test_suppressed_on_landscape() {
    let host = FakeHost::with_paragraphs(
        "https://classy-genie-854a0e.netlify.app/?keyword=design",
        &["critical design"],
    );
    let mut c = controller(host);

    assert!(c.is_suppressed());
    assert_eq!(c.highlight_terms().marks, 0);
    assert!(c.host().marks.is_empty());
}

// ============================================================================
// Name pass
// ============================================================================

#[test]
fn test_names_then_terms() {
    let host = FakeHost::with_paragraphs(
        ARTICLE_URL,
        &["As donald schön argued, design is reflective practice."],
    );
    let mut c = controller(host);

    let names = c.highlight_names(vec![KnownName {
        name: "Donald Schön".into(),
        url: "https://example.org/schon".into(),
    }]);
    let terms = c.highlight_terms();

    assert_eq!(names.rewritten, 1);
    let h = c.host();
    assert_eq!(h.links.len(), 1);
    assert_eq!(h.links[0].name, "Donald Schön");
    assert_eq!(h.links[0].url, "https://example.org/schon");

    assert_eq!(terms.marks, 3);
    assert_eq!(h.marks_for("reflective").len(), 1);
}

#[test]
fn test_name_pass_runs_once() {
    let host = FakeHost::with_paragraphs(ARTICLE_URL, &["Ettore Sottsass and friends"]);
    let mut c = controller(host);
    let names = vec![KnownName {
        name: "Ettore Sottsass".into(),
        url: "https://example.org/sottsass".into(),
    }];

    c.highlight_names(names.clone());
    let again = c.highlight_names(names);

    assert_eq!(again.rewritten, 0);
    assert_eq!(c.host().links.len(), 1);
}

// ============================================================================
// Gating check
// ============================================================================

#[test]
fn test_check_both_groups() {
    let host = FakeHost::with_paragraphs(
        ARTICLE_URL,
        &["Notes on design thinking and critical analysis."],
    );
    let c = controller(host);

    let check = c.check_keywords().unwrap();

    assert!(check.has_both_groups);
    assert!(check.design_keywords_found.contains(&"design".to_string()));
    assert!(check.critical_keywords_found.contains(&"critical".to_string()));
    // "analysis" is not the whole word "analytical"
    assert!(!check.critical_keywords_found.contains(&"analytical".to_string()));
}

#[test]
fn test_check_one_group_only() {
    let host = FakeHost::with_paragraphs(ARTICLE_URL, &["A design for living."]);
    let check = controller(host).check_keywords().unwrap();

    assert!(!check.has_both_groups);
    assert_eq!(check.design_keywords_found, vec!["design".to_string()]);
    assert!(check.critical_keywords_found.is_empty());
}

#[test]
fn test_check_without_body() {
    let mut host = FakeHost::new(ARTICLE_URL);
    host.has_body = false;
    assert!(controller(host).check_keywords().is_none());
}

#[test]
fn test_check_ignores_installed_vocabulary() {
    let host = FakeHost::with_paragraphs(ARTICLE_URL, &["We explore design."]);
    let mut c = controller(host);
    // the rich groups spell it "explorative"
    c.install_vocabulary(VocabularyStore::resolve(
        Ok(r#"{
          "design_group": { "design": ["design"] },
          "critical_group": { "explorative": ["explorative", "explore"] }
        }"#
        .to_string()),
        Ok(COLORS.to_string()),
    ));

    let check = c.check_keywords().unwrap();

    assert!(check.has_both_groups);
    assert_eq!(check.critical_keywords_found, vec!["explore".to_string()]);
}
