//! DomHost - `web-sys` implementation of `PageHost`
//!
//! Click and timer callbacks hold a `Weak` back to the controller that owns
//! this host. A callback that arrives while the controller is already
//! borrowed (re-entrant event) is dropped with a warning.

use std::cell::RefCell;
use std::rc::Weak;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, MouseEvent, Node, Window};

use super::{PageHost, TextLeaf};
use crate::controller::PageController;
use crate::navigation::Ticket;
use crate::overlay::{OverlayScene, Rect, Viewport};
use crate::scanner::{Fragment, MARK_CLASS, NAME_LINK_CLASS};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const OVERLAY_ID: &str = "connection-svg";
const ACTIVATED_CLASS: &str = "clicked";
/// `NodeFilter.SHOW_TEXT`
const SHOW_TEXT: u32 = 0x4;

const NAME_LINK_STYLE: &str = "background-color: black; color: white; \
    padding: 0 2px; text-decoration: none; border-radius: 2px;";

pub type DomController = PageController<DomHost>;

/// A pending `setTimeout`. Owns its callback, so the callback is released
/// when the timer is cancelled or consumed.
pub struct DomTimer {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

pub struct DomHost {
    window: Window,
    document: Document,
    dispatch: Weak<RefCell<DomController>>,
}

impl DomHost {
    /// None when the window has no document
    pub fn new(window: Window) -> Option<Self> {
        let document = window.document()?;
        Some(Self {
            window,
            document,
            dispatch: Weak::new(),
        })
    }

    /// Attach the controller that receives click and timer callbacks
    pub fn bound(mut self, dispatch: Weak<RefCell<DomController>>) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn build_replacement(&self, node: &Node, fragments: &[Fragment]) -> Result<Vec<Element>, JsValue> {
        let Some(parent) = node.parent_node() else {
            return Ok(Vec::new());
        };

        let container = self.document.create_element("span")?;
        let mut marks = Vec::new();

        for fragment in fragments {
            match fragment {
                Fragment::Text { text } => {
                    container.append_child(&self.document.create_text_node(text))?;
                }
                Fragment::Term { term, text, color } => {
                    let mark = self.document.create_element("mark")?;
                    mark.set_class_name(MARK_CLASS);
                    mark.set_attribute("data-keyword", term)?;
                    mark.set_attribute(
                        "style",
                        &format!("background-color: {}; cursor: pointer;", color),
                    )?;
                    mark.set_text_content(Some(text));
                    self.wire_click(&mark, term.clone())?;
                    container.append_child(&mark)?;
                    marks.push(mark);
                }
                Fragment::Name { name, url } => {
                    let link = self.document.create_element("a")?;
                    link.set_class_name(NAME_LINK_CLASS);
                    link.set_attribute("href", url)?;
                    link.set_attribute("target", "_blank")?;
                    link.set_attribute("rel", "noopener noreferrer")?;
                    link.set_attribute("style", NAME_LINK_STYLE)?;
                    link.set_text_content(Some(name));
                    container.append_child(&link)?;
                }
            }
        }

        // swap only once the container is complete
        parent.replace_child(&container, node)?;
        Ok(marks)
    }

    fn wire_click(&self, mark: &Element, term: String) -> Result<(), JsValue> {
        let dispatch = self.dispatch.clone();
        let target = mark.clone();
        let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            event.stop_propagation();
            let Some(controller) = dispatch.upgrade() else {
                return;
            };
            let Ok(mut controller) = controller.try_borrow_mut() else {
                console_warn!("[Highlighter] Click on {:?} arrived mid-update; dropped", term);
                return;
            };
            controller.on_mark_clicked(target.clone(), &term);
        });
        mark.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        // the listener lives as long as the mark
        on_click.forget();
        Ok(())
    }

    fn overlay_element(&self, scene: &OverlayScene) -> Result<Element, JsValue> {
        if let Some(svg) = self.document.get_element_by_id(OVERLAY_ID) {
            return Ok(svg);
        }
        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;

        let svg = self.document.create_element_ns(Some(SVG_NS), "svg")?;
        svg.set_id(OVERLAY_ID);
        svg.set_attribute(
            "style",
            &format!(
                "position: absolute; top: 0; left: 0; pointer-events: none; z-index: {};",
                scene.style.z_index
            ),
        )?;
        body.append_child(&svg)?;
        Ok(svg)
    }

    fn try_draw(&self, scene: &OverlayScene) -> Result<(), JsValue> {
        let svg = self.overlay_element(scene)?;
        svg.set_attribute("width", &scene.width.to_string())?;
        svg.set_attribute("height", &scene.height.to_string())?;
        svg.set_attribute("viewBox", &scene.view_box())?;

        while let Some(child) = svg.first_child() {
            svg.remove_child(&child)?;
        }

        let style = &scene.style;
        for line in &scene.lines {
            let el = self.document.create_element_ns(Some(SVG_NS), "line")?;
            el.set_attribute("x1", &line.from.x.to_string())?;
            el.set_attribute("y1", &line.from.y.to_string())?;
            el.set_attribute("x2", &line.to.x.to_string())?;
            el.set_attribute("y2", &line.to.y.to_string())?;
            el.set_attribute("stroke", &style.color)?;
            el.set_attribute("stroke-width", &style.stroke_width.to_string())?;
            el.set_attribute("stroke-linecap", "round")?;
            svg.append_child(&el)?;
        }

        for marker in &scene.markers {
            let el = self.document.create_element_ns(Some(SVG_NS), "circle")?;
            el.set_attribute("cx", &marker.center.x.to_string())?;
            el.set_attribute("cy", &marker.center.y.to_string())?;
            el.set_attribute("r", &marker.radius.to_string())?;
            el.set_attribute("fill", &style.color)?;
            el.set_attribute("opacity", &style.marker_opacity.to_string())?;
            el.set_attribute(
                "style",
                &format!("filter: drop-shadow(0 0 4px {});", style.color),
            )?;
            svg.append_child(&el)?;
        }
        Ok(())
    }
}

impl PageHost for DomHost {
    type Node = Node;
    type Mark = Element;
    type Timer = Option<DomTimer>;

    fn location(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn page_text(&self) -> Option<String> {
        self.document.body().map(|body| body.inner_text())
    }

    fn text_leaves(&self) -> Vec<TextLeaf<Node>> {
        let Some(body) = self.document.body() else {
            return Vec::new();
        };
        let walker = match self.document.create_tree_walker_with_what_to_show(&body, SHOW_TEXT) {
            Ok(walker) => walker,
            Err(e) => {
                console_error!("[Highlighter] Could not walk the document: {:?}", e);
                return Vec::new();
            }
        };

        let mut leaves = Vec::new();
        while let Ok(Some(node)) = walker.next_node() {
            let parent = node.parent_element();
            let parent_tag = parent.as_ref().map(|p| {
                // text inside inline SVG counts as SVG however deep it sits
                if p.namespace_uri().as_deref() == Some(SVG_NS) {
                    "SVG".to_string()
                } else {
                    p.tag_name()
                }
            });
            leaves.push(TextLeaf {
                text: node.text_content().unwrap_or_default(),
                parent_tag,
                parent_class: parent
                    .and_then(|p| p.get_attribute("class"))
                    .unwrap_or_default(),
                node,
            });
        }
        leaves
    }

    fn replace_text(&mut self, node: &Node, fragments: &[Fragment]) -> Vec<Element> {
        match self.build_replacement(node, fragments) {
            Ok(marks) => marks,
            Err(e) => {
                console_error!("[Highlighter] Could not rewrite text node: {:?}", e);
                Vec::new()
            }
        }
    }

    fn marks(&self) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(&format!(".{}", MARK_CLASS)) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn set_activated(&mut self, mark: &Element, activated: bool, glow: &str) {
        let classes = mark.class_list();
        let toggled = if activated {
            classes.add_1(ACTIVATED_CLASS)
        } else {
            classes.remove_1(ACTIVATED_CLASS)
        };
        if let Err(e) = toggled {
            console_warn!("[Highlighter] Could not update mark class: {:?}", e);
        }

        if let Some(el) = mark.dyn_ref::<HtmlElement>() {
            let shadow = if activated { glow } else { "none" };
            if let Err(e) = el.style().set_property("box-shadow", shadow) {
                console_warn!("[Highlighter] Could not update mark style: {:?}", e);
            }
        }
    }

    fn bounding_rect(&self, mark: &Element) -> Option<Rect> {
        if !mark.is_connected() {
            return None;
        }
        let r = mark.get_bounding_client_rect();
        Some(Rect {
            left: r.left(),
            top: r.top(),
            width: r.width(),
            height: r.height(),
        })
    }

    fn viewport(&self) -> Viewport {
        let dimension = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let body = self.document.body();
        Viewport {
            scroll_x: self.window.scroll_x().unwrap_or(0.0),
            scroll_y: self.window.scroll_y().unwrap_or(0.0),
            inner_width: dimension(self.window.inner_width()),
            inner_height: dimension(self.window.inner_height()),
            content_width: body.as_ref().map(|b| b.scroll_width() as f64).unwrap_or(0.0),
            content_height: body.as_ref().map(|b| b.scroll_height() as f64).unwrap_or(0.0),
        }
    }

    fn draw_overlay(&mut self, scene: &OverlayScene) {
        if let Err(e) = self.try_draw(scene) {
            console_error!("[Overlay] Could not draw connections: {:?}", e);
        }
    }

    fn remove_overlay(&mut self) {
        if let Some(svg) = self.document.get_element_by_id(OVERLAY_ID) {
            svg.remove();
        }
    }

    fn start_timer(&mut self, delay_ms: u32, ticket: Ticket) -> Option<DomTimer> {
        let dispatch = self.dispatch.clone();
        let callback = Closure::once(move || {
            let Some(controller) = dispatch.upgrade() else {
                return;
            };
            match controller.try_borrow_mut() {
                Ok(mut controller) => {
                    controller.on_timer(ticket);
                }
                Err(_) => console_warn!("[Navigation] Timer {:?} fired mid-update; dropped", ticket),
            };
        });

        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), delay)
        {
            Ok(handle) => Some(DomTimer {
                handle,
                _callback: callback,
            }),
            Err(e) => {
                console_error!("[Navigation] Could not start timer: {:?}", e);
                None
            }
        }
    }

    fn cancel_timer(&mut self, timer: Option<DomTimer>) {
        if let Some(timer) = timer {
            self.window.clear_timeout_with_handle(timer.handle);
        }
    }

    fn navigate(&mut self, url: &str) {
        if let Err(e) = self.window.location().set_href(url) {
            console_error!("[Navigation] Could not navigate: {:?}", e);
        }
    }
}
