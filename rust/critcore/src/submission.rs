//! Submission of the current page to the landscape
//!
//! Pure decision logic for the ADD action: the gating check, the catalog
//! duplicate check, the request payload, and how a reply is read. The
//! network round-trip itself lives in `runtime.rs`.

use serde::{Deserialize, Serialize};

use crate::scanner::KeywordCheck;
use crate::vocabulary::CatalogEntry;

// ==================== ERRORS ====================

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// The request never produced a response
    Network(String),
    /// The server failed (5xx) or sent something unreadable
    Server { status: u16, message: String },
    /// Nothing to scan
    NoDocument,
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Network(msg) => write!(f, "Network error: {}", msg),
            SubmitError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            SubmitError::NoDocument => write!(f, "Page has no readable body"),
        }
    }
}

impl std::error::Error for SubmitError {}

// ==================== TYPE DEFINITIONS ====================

/// POST body for the submission endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub url: String,
    pub design_keywords: Vec<String>,
    pub critical_keywords: Vec<String>,
}

/// Reply body from the submission endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmissionReply {
    pub success: bool,
    pub total_urls: Option<u64>,
    pub error: Option<String>,
    pub message: Option<String>,
}

/// Why a page was not sent
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitBlock {
    MissingGroups { design: bool, critical: bool },
    AlreadyCatalogued,
}

/// What the server said
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Added { total_urls: Option<u64> },
    Rejected { reason: String },
}

// ==================== DECISIONS ====================

/// Gate the page, then build the payload
pub fn prepare_submission(
    url: &str,
    check: &KeywordCheck,
    catalog: &[CatalogEntry],
) -> Result<SubmissionPayload, SubmitBlock> {
    if !check.has_both_groups {
        return Err(SubmitBlock::MissingGroups {
            design: !check.design_keywords_found.is_empty(),
            critical: !check.critical_keywords_found.is_empty(),
        });
    }
    if catalog.iter().any(|entry| entry.url == url) {
        return Err(SubmitBlock::AlreadyCatalogued);
    }

    Ok(SubmissionPayload {
        url: url.to_string(),
        design_keywords: check.design_keywords_found.clone(),
        critical_keywords: check.critical_keywords_found.clone(),
    })
}

/// Read a reply: 2xx with success -> added, 4xx or `success: false` ->
/// rejected, 5xx or unreadable -> error
pub fn interpret_reply(status: u16, body: &str) -> Result<SubmitOutcome, SubmitError> {
    let reply: Option<SubmissionReply> = serde_json::from_str(body).ok();

    if status >= 500 {
        let message = reply
            .and_then(|r| r.error)
            .unwrap_or_else(|| "internal failure".to_string());
        return Err(SubmitError::Server { status, message });
    }

    let reply = reply.ok_or_else(|| SubmitError::Server {
        status,
        message: "unreadable reply".to_string(),
    })?;

    if (200..300).contains(&status) && reply.success {
        Ok(SubmitOutcome::Added {
            total_urls: reply.total_urls,
        })
    } else {
        Ok(SubmitOutcome::Rejected {
            reason: reply
                .error
                .or(reply.message)
                .unwrap_or_else(|| format!("HTTP {}", status)),
        })
    }
}

/// Text shown to the user with `alert()`
pub fn alert_text(result: &Result<SubmitOutcome, SubmitError>) -> String {
    match result {
        Ok(SubmitOutcome::Added { .. }) => "✓ URL added to landscape database!".to_string(),
        Ok(SubmitOutcome::Rejected { reason }) => format!("❌ Error: {}", reason),
        Err(e) => format!("❌ Error: {}", e),
    }
}

pub fn block_text(block: &SubmitBlock) -> String {
    match block {
        SubmitBlock::MissingGroups { design, critical } => format!(
            "This page needs keywords from both groups (design: {}, critical: {})",
            if *design { "✓" } else { "✗" },
            if *critical { "✓" } else { "✗" }
        ),
        SubmitBlock::AlreadyCatalogued => "This page is already in the landscape".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(design: &[&str], critical: &[&str]) -> KeywordCheck {
        KeywordCheck {
            has_both_groups: !design.is_empty() && !critical.is_empty(),
            design_keywords_found: design.iter().map(|s| s.to_string()).collect(),
            critical_keywords_found: critical.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_missing_group_blocks() {
        let block = prepare_submission("https://a.org", &check(&["design"], &[]), &[]).unwrap_err();
        assert_eq!(
            block,
            SubmitBlock::MissingGroups {
                design: true,
                critical: false
            }
        );
    }

    #[test]
    fn test_catalogued_url_blocks() {
        let catalog = vec![CatalogEntry {
            url: "https://a.org".into(),
        }];
        let block = prepare_submission("https://a.org", &check(&["design"], &["critical"]), &catalog)
            .unwrap_err();
        assert_eq!(block, SubmitBlock::AlreadyCatalogued);
    }

    #[test]
    fn test_payload_serializes_camel_case() {
        let payload =
            prepare_submission("https://a.org", &check(&["design"], &["critical"]), &[]).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["url"], "https://a.org");
        assert_eq!(json["designKeywords"][0], "design");
        assert_eq!(json["criticalKeywords"][0], "critical");
    }

    #[test]
    fn test_interpret_success() {
        let outcome = interpret_reply(200, r#"{"success": true, "totalUrls": 42}"#).unwrap();
        assert_eq!(outcome, SubmitOutcome::Added { total_urls: Some(42) });
    }

    #[test]
    fn test_interpret_duplicate() {
        let outcome =
            interpret_reply(400, r#"{"success": false, "error": "URL already in database"}"#)
                .unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                reason: "URL already in database".into()
            }
        );
    }

    #[test]
    fn test_interpret_server_failure() {
        let err = interpret_reply(500, r#"{"success": false, "error": "db down"}"#).unwrap_err();
        assert_eq!(
            err,
            SubmitError::Server {
                status: 500,
                message: "db down".into()
            }
        );
        assert!(interpret_reply(502, "<html>").is_err());
        assert!(interpret_reply(200, "<html>").is_err());
    }

    #[test]
    fn test_alert_text() {
        let added = Ok(SubmitOutcome::Added { total_urls: None });
        assert!(alert_text(&added).contains("added"));
        let failed: Result<SubmitOutcome, SubmitError> = Err(SubmitError::Network("offline".into()));
        assert_eq!(alert_text(&failed), "❌ Error: Network error: offline");
    }
}
