//! Rendered geometry.
//!
//! Scroll-spy and navigation only need three facts about a rendered node:
//! its top relative to its positioning ancestor, that ancestor, and its
//! height. [`Geometry`] exposes exactly those; [`FlowLayout`] is a simple
//! block-flow model that produces them from the DOM so the viewer can run
//! without a browser engine.

use statute_dom::{Document, NodeId, NodeKind, TagName};

use crate::config::LayoutMetrics;

/// Classes that establish a positioning context.
pub const POSITIONED_CLASSES: &[&str] = &["act-section"];

/// Class marking a content section whose body is folded away.
pub const COLLAPSED_SECTION_CLASS: &str = "collapsed-section";

/// Rendered position queries.
///
/// Nodes that are not rendered (hidden, collapsed, detached) answer `None`.
pub trait Geometry {
    /// Top edge relative to [`offset_parent`](Geometry::offset_parent).
    fn offset_top(&self, node: NodeId) -> Option<i32>;
    /// Nearest positioned ancestor.
    fn offset_parent(&self, node: NodeId) -> Option<NodeId>;
    fn height(&self, node: NodeId) -> Option<i32>;
}

/// Document-relative top of `node`, summing offsets up the positioning
/// chain.
pub fn absolute_top(geometry: &dyn Geometry, node: NodeId) -> Option<i32> {
    let mut top = geometry.offset_top(node)?;
    let mut cur = geometry.offset_parent(node);
    while let Some(parent) = cur {
        top += geometry.offset_top(parent).unwrap_or(0);
        cur = geometry.offset_parent(parent);
    }
    Some(top)
}

// -------------------------------------------------------------------
// TextMeasurer
// -------------------------------------------------------------------

/// Measures the rendered width of a text run.
pub trait TextMeasurer {
    /// Width in pixels of `text` rendered at `font_size`.
    fn measure_text(&self, text: &str, font_size: u32) -> u32;
}

/// Fixed-advance measurer: every glyph is `glyph_width * font_size` wide.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasurer {
    pub glyph_width: f32,
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure_text(&self, text: &str, font_size: u32) -> u32 {
        (text.chars().count() as f32 * self.glyph_width * font_size as f32).ceil() as u32
    }
}

// -------------------------------------------------------------------
// FlowLayout
// -------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
struct NodeBox {
    abs_top: i32,
    height: i32,
    offset_parent: Option<NodeId>,
}

/// Block-flow layout of one subtree.
///
/// Blocks stack vertically with a fixed gap; inline content fills lines of
/// the available width. The layout root and every element carrying a
/// [`POSITIONED_CLASSES`] class are positioning contexts.
#[derive(Debug, Clone, Default)]
pub struct FlowLayout {
    boxes: Vec<Option<NodeBox>>,
    total_height: i32,
}

impl FlowLayout {
    /// Lay out the subtree under `root`.
    pub fn compute(
        doc: &Document,
        root: NodeId,
        metrics: &LayoutMetrics,
        measurer: &dyn TextMeasurer,
        font_size: u32,
        width: u32,
    ) -> Self {
        let line_height = (font_size as f32 * metrics.line_height).round().max(1.0) as i32;
        let mut flow = Flow {
            doc,
            metrics,
            measurer,
            font_size,
            width: width.max(1),
            line_height,
            y: 0,
            run_width: 0,
            boxes: vec![None; doc.len()],
        };
        flow.block(root, None);
        let total_height = flow.y;
        Self {
            boxes: flow.boxes,
            total_height,
        }
    }

    /// Height of the whole laid-out subtree.
    pub fn total_height(&self) -> i32 {
        self.total_height
    }

    /// Document-relative top, read straight from the layout.
    pub fn top(&self, node: NodeId) -> Option<i32> {
        self.node_box(node).map(|b| b.abs_top)
    }

    pub fn is_rendered(&self, node: NodeId) -> bool {
        self.node_box(node).is_some()
    }

    fn node_box(&self, node: NodeId) -> Option<&NodeBox> {
        self.boxes.get(node).and_then(|b| b.as_ref())
    }
}

impl Geometry for FlowLayout {
    fn offset_top(&self, node: NodeId) -> Option<i32> {
        let b = self.node_box(node)?;
        let base = b
            .offset_parent
            .and_then(|p| self.node_box(p))
            .map_or(0, |p| p.abs_top);
        Some(b.abs_top - base)
    }

    fn offset_parent(&self, node: NodeId) -> Option<NodeId> {
        self.node_box(node)?.offset_parent
    }

    fn height(&self, node: NodeId) -> Option<i32> {
        self.node_box(node).map(|b| b.height)
    }
}

struct Flow<'a> {
    doc: &'a Document,
    metrics: &'a LayoutMetrics,
    measurer: &'a dyn TextMeasurer,
    font_size: u32,
    width: u32,
    line_height: i32,
    y: i32,
    /// Width consumed by the open inline run.
    run_width: u32,
    boxes: Vec<Option<NodeBox>>,
}

impl Flow<'_> {
    fn record(&mut self, id: NodeId, abs_top: i32, height: i32, offset_parent: Option<NodeId>) {
        if let Some(slot) = self.boxes.get_mut(id) {
            *slot = Some(NodeBox {
                abs_top,
                height,
                offset_parent,
            });
        }
    }

    /// Top of the line the inline run is currently filling.
    fn line_top(&self) -> i32 {
        self.y + (self.run_width / self.width) as i32 * self.line_height
    }

    fn flush_run(&mut self) {
        if self.run_width > 0 {
            let lines = self.run_width.div_ceil(self.width) as i32;
            self.y += lines * self.line_height;
            self.run_width = 0;
        }
    }

    fn block(&mut self, id: NodeId, ctx: Option<NodeId>) {
        let doc = self.doc;
        let top = self.y;
        let positioned = ctx.is_none()
            || doc
                .element(id)
                .is_some_and(|e| POSITIONED_CLASSES.iter().any(|c| e.has_class(c)));
        let child_ctx = if positioned { Some(id) } else { ctx };

        let saved_line_height = self.line_height;
        if doc.element(id).is_some_and(|e| e.tag.is_heading()) {
            self.line_height = (self.line_height as f32 * self.metrics.heading_scale).round() as i32;
        }

        let collapsed = doc.has_class(id, COLLAPSED_SECTION_CLASS);
        for &child in &doc.get(id).children {
            if collapsed && !self.survives_collapse(child) {
                continue;
            }
            self.node(child, child_ctx);
        }
        self.flush_run();
        self.line_height = saved_line_height;

        if ctx.is_some() {
            self.y += self.metrics.block_gap;
        }
        self.record(id, top, self.y - top, ctx);
    }

    /// Headings and controls stay visible inside a collapsed section.
    fn survives_collapse(&self, child: NodeId) -> bool {
        self.doc
            .element(child)
            .is_some_and(|e| e.tag.is_heading() || e.tag.is_control())
    }

    fn node(&mut self, id: NodeId, ctx: Option<NodeId>) {
        let doc = self.doc;
        match &doc.get(id).kind {
            NodeKind::Text(text) => {
                if text.trim().is_empty() && self.run_width == 0 {
                    self.record(id, self.y, 0, ctx);
                    return;
                }
                let top = self.line_top();
                self.run_width += self.measurer.measure_text(text, self.font_size);
                self.record(id, top, self.line_height, ctx);
            },
            NodeKind::Element(data) => {
                if is_hidden(data) {
                    return;
                }
                if data.tag == TagName::Br {
                    let top = self.line_top();
                    self.run_width = self.run_width.div_ceil(self.width).max(1) * self.width;
                    self.record(id, top, self.line_height, ctx);
                    return;
                }
                if data.tag.is_block_level() || data.tag.is_heading() {
                    self.flush_run();
                    self.block(id, ctx);
                    return;
                }
                let top = self.line_top();
                for &child in &doc.get(id).children {
                    self.node(child, ctx);
                }
                let bottom = self.line_top() + self.line_height;
                self.record(id, top, (bottom - top).max(self.line_height), ctx);
            },
            NodeKind::Comment(_) | NodeKind::Doctype(_) | NodeKind::Document => {},
        }
    }
}

fn is_hidden(data: &statute_dom::ElementData) -> bool {
    if matches!(
        data.tag,
        TagName::Script | TagName::Style | TagName::Head | TagName::Title | TagName::Meta | TagName::Link
    ) {
        return true;
    }
    if data.get_attribute("hidden").is_some() {
        return true;
    }
    data.get_attribute("style").is_some_and(|s| {
        s.split(';').any(|decl| {
            let mut parts = decl.splitn(2, ':');
            let prop = parts.next().unwrap_or("").trim();
            let value = parts.next().unwrap_or("").trim();
            prop.eq_ignore_ascii_case("display") && value.eq_ignore_ascii_case("none")
        })
    })
}
