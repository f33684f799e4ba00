//! Display colours for vocabulary terms
//!
//! Colours are stored as validated hex strings so they can be dropped straight
//! into inline CSS without escaping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed palette used whenever a term has no externally supplied colour.
/// Assignment cycles through it in term insertion order.
pub const PALETTE: [&str; 35] = [
    "#FFD700", // gold
    "#FF6B6B", // red
    "#4ECDC4", // teal
    "#95E1D3", // mint
    "#F38181", // pink
    "#AA96DA", // purple
    "#FCBAD3", // light pink
    "#A8D8EA", // light blue
    "#FFB4A2", // salmon
    "#E0BBE4", // lavender
    "#CAFFBF", // light green
    "#FFD6A5", // peach
    "#FFC6FF", // light purple
    "#BDB2FF", // periwinkle
    "#A0D995", // pistachio
    "#FF7F50", // coral
    "#6495ED", // cornflower blue
    "#DDA0DD", // plum
    "#F0E68C", // khaki
    "#FF69B4", // hot pink
    "#87CEEB", // sky blue
    "#98FB98", // pale green
    "#FFB347", // pastel orange
    "#DA70D6", // orchid
    "#B0E0E6", // powder blue
    "#FFE4B5", // moccasin
    "#F0FFFF", // azure
    "#FFDAB9", // peach puff
    "#EEE8AA", // pale goldenrod
    "#F5DEB3", // wheat
    "#CD5C5C", // indian red
    "#66CDAA", // medium aquamarine
    "#7FFFD4", // aquamarine
    "#20B2AA", // light sea green
    "#FF8C00", // dark orange
];

/// A hex colour (`#rgb`, `#rrggbb` or `#rrggbbaa`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Validate a hex colour string
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let digits = raw.strip_prefix('#')?;
        let valid_len = matches!(digits.len(), 3 | 6 | 8);
        if valid_len && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Color(raw.to_string()))
        } else {
            None
        }
    }

    /// Palette colour for the given insertion index (cycles)
    pub fn cycled(index: usize) -> Self {
        Color(PALETTE[index % PALETTE.len()].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value).ok_or_else(|| format!("not a hex colour: {:?}", value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert!(Color::parse("#fff").is_some());
        assert!(Color::parse("#a1b2c3").is_some());
        assert!(Color::parse("#A1B2C3FF").is_some());
        assert!(Color::parse("red").is_none());
        assert!(Color::parse("#12345").is_none());
        assert!(Color::parse("#ggg").is_none());
        assert!(Color::parse("#fff; background: url(x)").is_none());
    }

    #[test]
    fn test_cycled_wraps() {
        assert_eq!(Color::cycled(0).as_str(), "#FFD700");
        assert_eq!(Color::cycled(PALETTE.len()), Color::cycled(0));
        assert_eq!(Color::cycled(36).as_str(), "#FF6B6B");
    }

    #[test]
    fn test_palette_entries_are_valid() {
        for raw in PALETTE {
            assert!(Color::parse(raw).is_some(), "{} should parse", raw);
        }
    }
}
