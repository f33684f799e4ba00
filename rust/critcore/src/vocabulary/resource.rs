//! Bundled resource formats
//!
//! Parses the four static resources shipped with the extension:
//! - Variant vocabulary: `{ design_group: { term: [variants] }, critical_group: {...} }`,
//!   either as plain JSON or wrapped in a JS module (`const keywords = {...}; export default`)
//! - Colour vocabulary: flat `{ term: "#hex" }`
//! - Known names: `[{ name, url }]`
//! - Catalog: `[{ url }]` of pages already in the landscape
//!
//! Any shape mismatch is reported as `ResourceError::Malformed`, which callers
//! treat exactly like a network failure.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use super::palette::Color;

pub const DESIGN_GROUP_KEY: &str = "design_group";
pub const CRITICAL_GROUP_KEY: &str = "critical_group";

// ==================== ERRORS ====================

/// Resource loading errors
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// The request never produced a response
    Fetch(String),
    /// The response came back with a non-2xx status
    Status { path: String, status: u16 },
    /// The body was not valid JSON
    Parse(String),
    /// Valid JSON, wrong shape
    Malformed(String),
}

impl std::fmt::Display for ResourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceError::Fetch(msg) => write!(f, "Fetch failed: {}", msg),
            ResourceError::Status { path, status } => {
                write!(f, "Failed to load {}: HTTP {}", path, status)
            }
            ResourceError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ResourceError::Malformed(msg) => write!(f, "Malformed resource: {}", msg),
        }
    }
}

impl std::error::Error for ResourceError {}

impl From<serde_json::Error> for ResourceError {
    fn from(e: serde_json::Error) -> Self {
        ResourceError::Parse(e.to_string())
    }
}

fn malformed(msg: impl Into<String>) -> ResourceError {
    ResourceError::Malformed(msg.into())
}

// ==================== VARIANT VOCABULARY ====================

/// A canonical term and its surface variants, in resource order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTerm {
    pub term: String,
    pub variants: Vec<String>,
}

/// Parsed variant vocabulary (both groups)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariantResource {
    pub design: Vec<GroupTerm>,
    pub critical: Vec<GroupTerm>,
}

impl VariantResource {
    /// Parse the variant resource from JSON or from its JS module wrapper
    pub fn parse(text: &str) -> Result<Self, ResourceError> {
        let object = module_object(text)
            .ok_or_else(|| malformed("no object literal in variant resource"))?;
        let root: Value = serde_json::from_str(object)?;
        let root = root
            .as_object()
            .ok_or_else(|| malformed("variant resource is not an object"))?;

        let design = parse_group(root, DESIGN_GROUP_KEY)?;
        let critical = parse_group(root, CRITICAL_GROUP_KEY)?;

        let design_terms: HashSet<&str> = design.iter().map(|g| g.term.as_str()).collect();
        if let Some(shared) = critical.iter().find(|g| design_terms.contains(g.term.as_str())) {
            return Err(malformed(format!("term {:?} is in both groups", shared.term)));
        }

        Ok(Self { design, critical })
    }
}

/// Slice out the outermost `{...}` of a JS module, or the whole text if it is
/// already a bare object. The module is never evaluated.
fn module_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    // the literal closes before the export; anything after it is ignored
    let body = match text.find("export default") {
        Some(export) if export > start => &text[..export],
        _ => text,
    };
    let end = body.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn parse_group(root: &Map<String, Value>, key: &str) -> Result<Vec<GroupTerm>, ResourceError> {
    let group = root
        .get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| malformed(format!("missing group {:?}", key)))?;

    let mut seen = HashSet::new();
    let mut terms = Vec::with_capacity(group.len());

    for (term, variants) in group {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Err(malformed(format!("empty term in {:?}", key)));
        }
        let variants = variants
            .as_array()
            .ok_or_else(|| malformed(format!("variants of {:?} are not a list", term)))?
            .iter()
            .map(|v| {
                v.as_str()
                    .map(|s| s.trim().to_lowercase())
                    .ok_or_else(|| malformed(format!("non-string variant under {:?}", term)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if seen.insert(term.clone()) {
            terms.push(GroupTerm { term, variants });
        }
    }

    Ok(terms)
}

// ==================== COLOUR VOCABULARY ====================

/// Parsed term -> colour mapping, in resource order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorResource {
    pub entries: Vec<(String, Color)>,
}

impl ColorResource {
    pub fn parse(text: &str) -> Result<Self, ResourceError> {
        let root: Value = serde_json::from_str(text)?;
        let map = root
            .as_object()
            .ok_or_else(|| malformed("colour resource is not an object"))?;

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(map.len());
        for (term, color) in map {
            let term = term.trim().to_lowercase();
            if term.is_empty() {
                return Err(malformed("empty term in colour resource"));
            }
            let color = color
                .as_str()
                .and_then(Color::parse)
                .ok_or_else(|| malformed(format!("colour of {:?} is not hex", term)))?;
            if seen.insert(term.clone()) {
                entries.push((term, color));
            }
        }

        if entries.is_empty() {
            return Err(malformed("colour resource has no terms"));
        }
        Ok(Self { entries })
    }
}

// ==================== KNOWN NAMES ====================

/// A proper name highlighted as a link by the name pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownName {
    pub name: String,
    pub url: String,
}

/// Parse the known-name list. Entries with an empty name or a non-http(s)
/// URL are dropped.
pub fn parse_names(text: &str) -> Result<Vec<KnownName>, ResourceError> {
    let names: Vec<KnownName> = serde_json::from_str(text)?;
    let total = names.len();
    let kept: Vec<KnownName> = names
        .into_iter()
        .filter(|n| !n.name.trim().is_empty())
        .filter(|n| is_web_url(&n.url))
        .collect();

    if kept.len() < total {
        console_warn!("[Vocabulary] Dropped {} unusable name entries", total - kept.len());
    }
    Ok(kept)
}

fn is_web_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

// ==================== CATALOG ====================

/// One page already recorded in the landscape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub url: String,
}

pub fn parse_catalog(text: &str) -> Result<Vec<CatalogEntry>, ResourceError> {
    Ok(serde_json::from_str(text)?)
}
