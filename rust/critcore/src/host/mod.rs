//! Host capability: everything the engine needs from a live document
//!
//! The engine never touches the DOM directly. `DomHost` implements this trait
//! with `web-sys`; tests use an in-memory fake.

pub mod dom;

use crate::navigation::Ticket;
use crate::overlay::{OverlayScene, Rect, Viewport};
use crate::scanner::Fragment;

/// A text-bearing leaf captured by `text_leaves()`
#[derive(Debug, Clone, PartialEq)]
pub struct TextLeaf<N> {
    pub node: N,
    pub text: String,
    /// Tag of the nearest element ancestor; None for detached text
    pub parent_tag: Option<String>,
    pub parent_class: String,
}

pub trait PageHost {
    /// Handle to a text node
    type Node;
    /// Handle to a term marker; equality is element identity
    type Mark: Clone + PartialEq;
    /// Handle to a pending timer
    type Timer;

    fn location(&self) -> String;

    /// Visible text of the whole page; None when there is no body
    fn page_text(&self) -> Option<String>;

    /// Every text leaf under the body in document order, captured before
    /// any mutation
    fn text_leaves(&self) -> Vec<TextLeaf<Self::Node>>;

    /// Replace one text node with an inline container holding `fragments`.
    /// Term markers get a click handler that stops propagation and reports
    /// back to the controller. Returns the new term markers.
    fn replace_text(&mut self, node: &Self::Node, fragments: &[Fragment]) -> Vec<Self::Mark>;

    /// All term markers currently in the document
    fn marks(&self) -> Vec<Self::Mark>;

    fn set_activated(&mut self, mark: &Self::Mark, activated: bool, glow: &str);

    /// Viewport-relative bounding box; None if the mark is gone
    fn bounding_rect(&self, mark: &Self::Mark) -> Option<Rect>;

    fn viewport(&self) -> Viewport;

    /// Create the overlay on first use, then resize and redraw it
    fn draw_overlay(&mut self, scene: &OverlayScene);

    fn remove_overlay(&mut self);

    /// Deliver `ticket` back to the controller after `delay_ms`
    fn start_timer(&mut self, delay_ms: u32, ticket: Ticket) -> Self::Timer;

    fn cancel_timer(&mut self, timer: Self::Timer);

    /// Full top-level navigation
    fn navigate(&mut self, url: &str);
}
