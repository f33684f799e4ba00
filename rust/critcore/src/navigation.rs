//! Navigation scheduler - debounced jump to the keyword landscape
//!
//! Every selection change re-arms a single timer. Arming cancels whatever
//! was pending, so timers never stack. Each arm also mints a fresh `Ticket`,
//! and a callback carrying a stale ticket is ignored. A timer that fires
//! after being replaced therefore cannot navigate.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::host::PageHost;

/// Bytes left unescaped by `URLSearchParams` (besides alphanumerics)
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Identity of one arming of the navigation timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket(pub u64);

#[derive(Debug)]
struct PendingNavigation<T> {
    ticket: Ticket,
    timer: T,
    terms: Vec<String>,
}

#[derive(Debug)]
pub struct NavigationScheduler<T> {
    quiet_period_ms: u32,
    issued: u64,
    pending: Option<PendingNavigation<T>>,
}

impl<T> NavigationScheduler<T> {
    pub fn new(quiet_period_ms: u32) -> Self {
        Self {
            quiet_period_ms,
            issued: 0,
            pending: None,
        }
    }

    pub fn quiet_period_ms(&self) -> u32 {
        self.quiet_period_ms
    }

    /// Cancel any pending navigation, then arm a new one carrying a snapshot
    /// of `terms` unless it is empty
    pub fn rearm<H>(&mut self, host: &mut H, terms: &[String]) -> Option<Ticket>
    where
        H: PageHost<Timer = T>,
    {
        self.cancel(host);
        if terms.is_empty() {
            return None;
        }

        self.issued += 1;
        let ticket = Ticket(self.issued);
        let timer = host.start_timer(self.quiet_period_ms, ticket);
        self.pending = Some(PendingNavigation {
            ticket,
            timer,
            terms: terms.to_vec(),
        });
        Some(ticket)
    }

    pub fn cancel<H>(&mut self, host: &mut H)
    where
        H: PageHost<Timer = T>,
    {
        if let Some(pending) = self.pending.take() {
            host.cancel_timer(pending.timer);
        }
    }

    /// Consume the pending navigation if `ticket` is the live one
    pub fn fire(&mut self, ticket: Ticket) -> Option<Vec<String>> {
        match &self.pending {
            Some(p) if p.ticket == ticket => self.pending.take().map(|p| p.terms),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Landscape URL with one `keyword` parameter per term, in order.
/// Encoding follows `URLSearchParams`: spaces become `+`. A fragment on the
/// base stays at the end.
pub fn landscape_url(base: &str, terms: &[String]) -> String {
    let base = base.trim();
    let (head, fragment) = base.split_at(base.find('#').unwrap_or(base.len()));
    let mut url = head.to_string();

    // a bare origin gets a root path, as `new URL()` would give it
    let path_start = url.find("://").map(|i| i + 3).unwrap_or(0);
    if !url[path_start..].contains(['/', '?']) {
        url.push('/');
    }

    let query: Vec<String> = terms
        .iter()
        .map(|t| format!("keyword={}", encode_query_value(t)))
        .collect();
    if !query.is_empty() {
        let separator = if url.contains('?') {
            if url.ends_with('?') || url.ends_with('&') {
                ""
            } else {
                "&"
            }
        } else {
            "?"
        };
        url.push_str(separator);
        url.push_str(&query.join("&"));
    }

    url.push_str(fragment);
    url
}

fn encode_query_value(value: &str) -> String {
    value
        .split(' ')
        .map(|part| utf8_percent_encode(part, QUERY_VALUE).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_repeated_keyword_parameters_in_order() {
        let url = landscape_url(
            "https://classy-genie-854a0e.netlify.app",
            &terms(&["critical", "design"]),
        );
        assert_eq!(
            url,
            "https://classy-genie-854a0e.netlify.app/?keyword=critical&keyword=design"
        );
    }

    #[test]
    fn test_encoding_matches_url_search_params() {
        let url = landscape_url("https://x.app/land", &terms(&["applied art", "a&b", "café"]));
        assert_eq!(
            url,
            "https://x.app/land?keyword=applied+art&keyword=a%26b&keyword=caf%C3%A9"
        );
    }

    #[test]
    fn test_existing_query_is_extended() {
        let url = landscape_url("https://x.app/?mode=3d", &terms(&["plan"]));
        assert_eq!(url, "https://x.app/?mode=3d&keyword=plan");
    }

    #[test]
    fn test_query_goes_before_fragment() {
        let url = landscape_url("https://x.app/#top", &terms(&["design"]));
        assert_eq!(url, "https://x.app/?keyword=design#top");

        let url = landscape_url("https://x.app/land?mode=3d#view", &terms(&["a b"]));
        assert_eq!(url, "https://x.app/land?mode=3d&keyword=a+b#view");

        let url = landscape_url("https://x.app#top", &terms(&["plan"]));
        assert_eq!(url, "https://x.app/?keyword=plan#top");
    }

    #[test]
    fn test_no_terms() {
        assert_eq!(landscape_url("https://x.app", &[]), "https://x.app/");
    }
}
