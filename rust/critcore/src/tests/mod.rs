//! Controller-level tests against an in-memory page

mod highlight_tests;

use crate::config::EngineConfig;
use crate::controller::PageController;
use fake_host::FakeHost;

pub(crate) const ARTICLE_URL: &str = "https://example.org/essays/on-practice";

pub(crate) fn controller(host: FakeHost) -> PageController<FakeHost> {
    PageController::new(host, EngineConfig::default())
}

/// Advance the fake clock and deliver due timers; returns the URLs navigated to
pub(crate) fn run_timers(controller: &mut PageController<FakeHost>, ms: u64) -> Vec<String> {
    let due = controller.host_mut().advance(ms);
    due.into_iter().filter_map(|t| controller.on_timer(t)).collect()
}
