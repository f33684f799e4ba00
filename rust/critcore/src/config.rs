//! Configuration types and defaults for the content script engine
//!
//! Every field has a default, so the JS side can pass `undefined`, `null` or
//! any partial object to `bootstrap()`.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

// =============================================================================
// Defaults
// =============================================================================

/// Host of the external keyword landscape visualization
pub const LANDSCAPE_HOST: &str = "classy-genie-854a0e.netlify.app";

fn default_landscape_url() -> String {
    format!("https://{}", LANDSCAPE_HOST)
}

fn default_submit_endpoint() -> String {
    format!("https://{}/.netlify/functions/add-url", LANDSCAPE_HOST)
}

fn default_suppress_hosts() -> Vec<String> {
    vec![LANDSCAPE_HOST.to_string(), "localhost".to_string()]
}

fn default_skip_tags() -> Vec<String> {
    [
        "BUTTON", "INPUT", "TEXTAREA", "SELECT", "SCRIPT", "STYLE", "NOSCRIPT", "SVG", "IMG",
        "VIDEO", "AUDIO", "IFRAME", "CODE", "PRE",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect()
}

fn default_skip_class_markers() -> Vec<String> {
    ["goog-", "google-", "icon", "btn", "logo", "nav"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

// =============================================================================
// Resource Paths
// =============================================================================

/// Paths of the resources bundled with the extension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourcePaths {
    /// Group -> canonical term -> surface variants (JSON or JS module)
    pub variants: String,
    /// Flat term -> hex colour mapping
    pub colors: String,
    /// Ordered `{name, url}` list for the known-name pass
    pub names: String,
    /// Catalog of already-submitted pages (`[{url}]`)
    pub catalog: String,
}

impl Default for ResourcePaths {
    fn default() -> Self {
        Self {
            variants: "keywords.js".to_string(),
            colors: "keywords_with_colors.json".to_string(),
            names: "designers.json".to_string(),
            catalog: "nodes.json".to_string(),
        }
    }
}

// =============================================================================
// Overlay Style
// =============================================================================

/// Fixed visual parameters of the link overlay and the activation glow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStyle {
    pub color: String,
    pub stroke_width: f64,
    pub marker_radius: f64,
    pub marker_opacity: f64,
    pub z_index: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: "#FF6600".to_string(),
            stroke_width: 4.0,
            marker_radius: 6.0,
            marker_opacity: 0.8,
            z_index: 999_999,
        }
    }
}

impl OverlayStyle {
    /// CSS `box-shadow` applied to activated marks
    pub fn glow(&self) -> String {
        format!("0 0 15px {c}, 0 0 25px {c}", c = self.color)
    }
}

// =============================================================================
// Engine Configuration
// =============================================================================

/// Configuration for the page engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Navigation target; activated terms are appended as `keyword` parameters
    pub landscape_url: String,
    /// Location substrings on which no highlighting happens
    pub suppress_hosts: Vec<String>,
    /// Quiet period before navigating after the last selection change
    pub quiet_period_ms: u32,
    /// Text nodes whose trimmed length is below this are skipped
    pub min_text_length: usize,
    /// Parent tags (upper-case) that are never rewritten
    pub skip_tags: Vec<String>,
    /// Parent class substrings that are never rewritten
    pub skip_class_markers: Vec<String>,
    pub resources: ResourcePaths,
    pub submit_endpoint: String,
    /// Fixed; not read from or written to the JS config
    #[serde(skip)]
    pub overlay: OverlayStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            landscape_url: default_landscape_url(),
            suppress_hosts: default_suppress_hosts(),
            quiet_period_ms: 2000,
            min_text_length: 3,
            skip_tags: default_skip_tags(),
            skip_class_markers: default_skip_class_markers(),
            resources: ResourcePaths::default(),
            submit_endpoint: default_submit_endpoint(),
            overlay: OverlayStyle::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a JS config object; `null`/`undefined` yield the defaults
    pub fn from_js(value: JsValue) -> Result<Self, JsValue> {
        if value.is_null() || value.is_undefined() {
            return Ok(Self::default());
        }
        serde_wasm_bindgen::from_value(value)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))
    }

    /// True when highlighting must be suppressed for this location
    pub fn is_suppressed(&self, location: &str) -> bool {
        self.suppress_hosts
            .iter()
            .any(|host| !host.is_empty() && location.contains(host.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.quiet_period_ms, 2000);
        assert_eq!(config.min_text_length, 3);
        assert_eq!(config.landscape_url, "https://classy-genie-854a0e.netlify.app");
        assert!(config.skip_tags.iter().any(|t| t == "SCRIPT"));
        assert_eq!(config.resources.colors, "keywords_with_colors.json");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{ "quietPeriodMs": 500 }"#).unwrap();
        assert_eq!(config.quiet_period_ms, 500);
        assert_eq!(config.min_text_length, 3);
    }

    #[test]
    fn test_overlay_style_not_configurable() {
        let config: EngineConfig = serde_json::from_str(
            r##"{ "overlay": { "color": "#00FF00", "strokeWidth": 2, "zIndex": 1 } }"##,
        )
        .unwrap();
        assert_eq!(config.overlay, OverlayStyle::default());
        assert_eq!(config.overlay.stroke_width, 4.0);

        let json = serde_json::to_value(EngineConfig::default()).unwrap();
        assert!(json.get("overlay").is_none());
    }

    #[test]
    fn test_suppressed_locations() {
        let config = EngineConfig::default();
        assert!(config.is_suppressed("https://classy-genie-854a0e.netlify.app/?keyword=design"));
        assert!(config.is_suppressed("http://localhost:8080/page"));
        assert!(!config.is_suppressed("https://example.org/essay"));
    }

    #[test]
    fn test_glow() {
        let style = OverlayStyle::default();
        assert_eq!(style.glow(), "0 0 15px #FF6600, 0 0 25px #FF6600");
    }
}
