//! CritCore: Design Discourse Highlighter + Keyword Linking Engine
//!
//! A Rust/WASM implementation of the Crit content script.
//!
//! # Architecture
//!
//! ## Vocabulary
//! - `vocabulary/store.rs` - VocabularyStore: two term groups plus the term -> colour mapping
//! - `vocabulary/resource.rs` - Parsing of the bundled variant, colour and name resources
//! - `vocabulary/palette.rs` - Fixed 35-colour palette and the `Color` newtype
//!
//! ## Scanner
//! - `scanner/gate.rs` - PageScanner: whole-word group detection used to gate submissions
//! - `scanner/matcher.rs` - TermMatcher: two-phase (Aho-Corasick pre-filter, regex confirm) rewriting
//! - `scanner/names.rs` - NameMatcher: known-name link pass
//! - `scanner/filter.rs` - ExclusionPolicy: which text nodes are never rewritten
//!
//! ## Interaction
//! - `selection.rs` - SelectionTracker: activated marks, one per term
//! - `overlay.rs` - Overlay scene geometry (complete graph of lines + endpoint markers)
//! - `navigation.rs` - NavigationScheduler + landscape URL building
//! - `controller.rs` - PageController: per-page context object wiring it all to a `PageHost`
//!
//! ## Browser
//! - `host/dom.rs` - DomHost: `web-sys` implementation of `PageHost`
//! - `runtime.rs` - `bootstrap()` entry point, resource fetching, submission
//!
//! # Usage (content script)
//! ```javascript,ignore
//! import init, { bootstrap, checkKeywordsOnPage } from './critcore.js';
//!
//! await init();
//! await bootstrap({ quietPeriodMs: 2000 });
//!
//! const check = checkKeywordsOnPage();
//! console.log(check.hasBothGroups, check.designKeywordsFound);
//! ```

#[macro_use]
mod log;

pub mod config;
pub mod vocabulary;
pub mod scanner;
pub mod selection;
pub mod overlay;
pub mod navigation;
pub mod submission;
pub mod host;
pub mod controller;
pub mod runtime;

#[cfg(test)]
mod tests;

pub use config::*;
pub use vocabulary::*;
pub use scanner::*;
pub use selection::*;
pub use overlay::*;
pub use navigation::*;
pub use submission::*;
pub use host::{PageHost, TextLeaf};
pub use controller::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("critcore v{}", env!("CARGO_PKG_VERSION"))
}
