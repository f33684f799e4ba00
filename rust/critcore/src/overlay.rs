//! Link overlay - geometry of the connection mesh between activated marks
//!
//! Points are document-space centres (bounding box centre plus scroll
//! offset), so the drawing stays put while the page scrolls. The scene is a
//! complete graph: N points give N*(N-1)/2 lines plus one marker per point.
//! Drawing is left to the host; the overlay never takes pointer events.

use serde::{Deserialize, Serialize};

use crate::config::OverlayStyle;
use crate::host::PageHost;

// ==================== GEOMETRY ====================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Viewport-relative box as reported by `getBoundingClientRect`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Scroll offset plus viewport and scrollable content sizes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub inner_width: f64,
    pub inner_height: f64,
    pub content_width: f64,
    pub content_height: f64,
}

impl Viewport {
    /// Document-space centre of a viewport-relative box
    pub fn to_document(&self, rect: &Rect) -> Point {
        let c = rect.center();
        Point::new(c.x + self.scroll_x, c.y + self.scroll_y)
    }

    /// Canvas size: the larger of viewport and scrollable content
    pub fn canvas_size(&self) -> (f64, f64) {
        (
            self.content_width.max(self.inner_width),
            self.content_height.max(self.inner_height),
        )
    }
}

// ==================== SCENE ====================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub center: Point,
    pub radius: f64,
}

/// Everything the host needs to draw one frame of the overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayScene {
    pub width: f64,
    pub height: f64,
    pub lines: Vec<Line>,
    pub markers: Vec<Marker>,
    pub style: OverlayStyle,
}

impl OverlayScene {
    /// Build the mesh for `points`; None below two points
    pub fn compose(points: &[Point], viewport: &Viewport, style: &OverlayStyle) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let mut lines = Vec::with_capacity(points.len() * (points.len() - 1) / 2);
        for (i, from) in points.iter().enumerate() {
            for to in &points[i + 1..] {
                lines.push(Line { from: *from, to: *to });
            }
        }

        let markers = points
            .iter()
            .map(|p| Marker {
                center: *p,
                radius: style.marker_radius,
            })
            .collect();

        let (width, height) = viewport.canvas_size();
        Some(Self {
            width,
            height,
            lines,
            markers,
            style: style.clone(),
        })
    }

    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }
}

// ==================== RENDERER ====================

/// Tracks whether the host currently shows an overlay
#[derive(Debug, Default)]
pub struct LinkOverlay {
    visible: bool,
}

impl LinkOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Redraw for the activated marks, or remove when fewer than two can be
    /// located. Returns the number of lines drawn.
    pub fn render<H: PageHost>(&mut self, host: &mut H, marks: &[H::Mark], style: &OverlayStyle) -> usize {
        let viewport = host.viewport();
        let points: Vec<Point> = marks
            .iter()
            .filter_map(|m| host.bounding_rect(m))
            .map(|r| viewport.to_document(&r))
            .collect();

        match OverlayScene::compose(&points, &viewport, style) {
            Some(scene) => {
                host.draw_overlay(&scene);
                self.visible = true;
                scene.lines.len()
            }
            None => {
                self.remove(host);
                0
            }
        }
    }

    pub fn remove<H: PageHost>(&mut self, host: &mut H) {
        if self.visible {
            host.remove_overlay();
            self.visible = false;
        }
    }
}
