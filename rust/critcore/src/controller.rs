//! PageController: per-page context object for the highlighter
//!
//! # Lifecycle
//! 1. `new()` with the built-in vocabulary
//! 2. `highlight_names()` runs the known-name pass
//! 3. `install_vocabulary()` + `highlight_terms()` runs the term pass (once)
//! 4. `on_mark_clicked()` for every click on a term marker
//! 5. `on_timer()` when a navigation timer fires
//!
//! All state (selection, pending navigation, vocabulary) lives here and is
//! only touched from the UI thread through `&mut self`.

use crate::config::EngineConfig;
use crate::host::PageHost;
use crate::navigation::{landscape_url, NavigationScheduler, Ticket};
use crate::overlay::LinkOverlay;
use crate::scanner::{ExclusionPolicy, Fragment, KeywordCheck, NameMatcher, PageScanner, TermMatcher};
use crate::selection::{SelectionTracker, Transition};
use crate::vocabulary::{KnownName, VocabularyStore};

/// Counts from one rewriting pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub leaves: usize,
    pub rewritten: usize,
    pub marks: usize,
}

/// Rewrite every admitted leaf of a fresh snapshot
fn rewrite_pass<H, F>(host: &mut H, policy: &ExclusionPolicy, rewrite: F) -> PassStats
where
    H: PageHost,
    F: Fn(&str) -> Option<Vec<Fragment>>,
{
    // snapshot first: replacing a node must not disturb the walk
    let leaves = host.text_leaves();
    let mut stats = PassStats {
        leaves: leaves.len(),
        ..PassStats::default()
    };

    for leaf in leaves.iter().filter(|&leaf| policy.admits(leaf)) {
        if let Some(fragments) = rewrite(&leaf.text) {
            stats.marks += host.replace_text(&leaf.node, &fragments).len();
            stats.rewritten += 1;
        }
    }
    stats
}

pub struct PageController<H: PageHost> {
    host: H,
    config: EngineConfig,
    policy: ExclusionPolicy,
    vocabulary: VocabularyStore,
    scanner: PageScanner,
    selection: SelectionTracker<H::Mark>,
    overlay: LinkOverlay,
    scheduler: NavigationScheduler<H::Timer>,
    names_highlighted: bool,
    terms_highlighted: bool,
}

impl<H: PageHost> PageController<H> {
    pub fn new(host: H, config: EngineConfig) -> Self {
        let vocabulary = VocabularyStore::fallback();
        Self {
            host,
            policy: ExclusionPolicy::from_config(&config),
            scanner: PageScanner::builtin(),
            selection: SelectionTracker::new(),
            overlay: LinkOverlay::new(),
            scheduler: NavigationScheduler::new(config.quiet_period_ms),
            vocabulary,
            config,
            names_highlighted: false,
            terms_highlighted: false,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &VocabularyStore {
        &self.vocabulary
    }

    pub fn selection(&self) -> &SelectionTracker<H::Mark> {
        &self.selection
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay.is_visible()
    }

    pub fn navigation_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// True on the landscape page itself (or other suppressed hosts)
    pub fn is_suppressed(&self) -> bool {
        self.config.is_suppressed(&self.host.location())
    }

    /// Swap in a fully built vocabulary for highlighting. The gating check
    /// keeps the built-in group lists.
    pub fn install_vocabulary(&mut self, vocabulary: VocabularyStore) {
        self.vocabulary = vocabulary;
    }

    // -------------------------------------------------------------------------
    // Highlighting
    // -------------------------------------------------------------------------

    /// Known-name link pass. Runs at most once per page.
    pub fn highlight_names(&mut self, names: Vec<KnownName>) -> PassStats {
        if self.names_highlighted || self.is_suppressed() {
            return PassStats::default();
        }
        self.names_highlighted = true;

        let matcher = NameMatcher::new(names);
        if matcher.is_empty() {
            console_log!("[Names] No names to highlight");
            return PassStats::default();
        }

        let stats = rewrite_pass(&mut self.host, &self.policy, |text| matcher.rewrite(text));
        console_log!(
            "[Names] Linked names in {} of {} text nodes",
            stats.rewritten,
            stats.leaves
        );
        stats
    }

    /// Term highlight pass over the installed vocabulary. Runs at most once
    /// per page; a second call is a no-op.
    pub fn highlight_terms(&mut self) -> PassStats {
        if self.is_suppressed() {
            console_log!("[Highlighter] Skipping keyword highlighting on landscape page");
            return PassStats::default();
        }
        if self.terms_highlighted {
            console_warn!("[Highlighter] Terms already highlighted; ignoring re-run");
            return PassStats::default();
        }
        if self.vocabulary.is_empty() {
            console_log!("[Highlighter] No keywords loaded yet");
            return PassStats::default();
        }

        let matcher = match TermMatcher::from_store(&self.vocabulary) {
            Ok(m) => m,
            Err(e) => {
                console_error!("[Highlighter] Could not build term matcher: {}", e);
                return PassStats::default();
            }
        };
        self.terms_highlighted = true;

        let stats = rewrite_pass(&mut self.host, &self.policy, |text| matcher.rewrite(text));
        self.refresh_styles();
        console_log!(
            "[Highlighter] {} marks in {} of {} text nodes ({} terms)",
            stats.marks,
            stats.rewritten,
            stats.leaves,
            matcher.len()
        );
        stats
    }

    /// Gating check over the page text against the built-in groups; None
    /// when the page has no body
    pub fn check_keywords(&self) -> Option<KeywordCheck> {
        let text = self.host.page_text()?;
        let report = self.scanner.scan(&text);
        console_log!(
            "[Gate] design found {:?}, missing {}; critical found {:?}, missing {}; both: {}",
            report.design_found,
            report.design_missing.len(),
            report.critical_found,
            report.critical_missing.len(),
            report.both_groups_present
        );
        Some(KeywordCheck::from(&report))
    }

    // -------------------------------------------------------------------------
    // Interaction
    // -------------------------------------------------------------------------

    /// Click on a term marker
    pub fn on_mark_clicked(&mut self, mark: H::Mark, term: &str) -> Transition {
        let transition = self.selection.toggle(mark, term);
        console_log!(
            "[Selection] {:?} {:?}; active terms {:?}",
            transition,
            term,
            self.selection.terms()
        );

        self.refresh_styles();

        let activated: Vec<H::Mark> = self.selection.marks().cloned().collect();
        if activated.len() >= 2 {
            self.overlay.render(&mut self.host, &activated, &self.config.overlay);
        } else {
            self.overlay.remove(&mut self.host);
        }

        let terms = self.selection.terms().to_vec();
        if self.scheduler.rearm(&mut self.host, &terms).is_some() {
            console_log!(
                "[Navigation] Will navigate in {}ms with {:?}",
                self.scheduler.quiet_period_ms(),
                terms
            );
        }
        transition
    }

    /// Timer callback; navigates if `ticket` is still the live one.
    /// Returns the URL navigated to.
    pub fn on_timer(&mut self, ticket: Ticket) -> Option<String> {
        let terms = self.scheduler.fire(ticket)?;
        let url = landscape_url(&self.config.landscape_url, &terms);
        console_log!("[Navigation] Navigating to landscape: {}", url);
        self.host.navigate(&url);
        Some(url)
    }

    /// Glow on activated marks, cleared everywhere else
    fn refresh_styles(&mut self) {
        let glow = self.config.overlay.glow();
        for mark in self.host.marks() {
            let activated = self.selection.is_activated(&mark);
            self.host.set_activated(&mark, activated, &glow);
        }
    }
}
