//! Scroll-spy: which heading is the reader currently in?

use statute_dom::{Document, NodeId};

use crate::geometry::{Geometry, absolute_top};
use crate::outline::{HeadingIndex, HeadingLevel};

/// Pick the current heading for a scroll offset.
///
/// The current heading is the last one in document order whose top is at
/// or above `scroll_y + lookahead`. Sub-headings of a container for which
/// `is_collapsed` holds are skipped, as are headings without geometry.
/// Above the first heading nothing is current.
pub fn compute_current(
    index: &HeadingIndex,
    geometry: &dyn Geometry,
    scroll_y: i32,
    lookahead: i32,
    is_collapsed: impl Fn(NodeId) -> bool,
) -> Option<String> {
    let position = scroll_y + lookahead;
    for entry in index.entries().iter().rev() {
        if entry.level == HeadingLevel::Subsection && is_collapsed(entry.container) {
            log::trace!("skipping {}: container collapsed", entry.id);
            continue;
        }
        let Some(top) = absolute_top(geometry, entry.node) else {
            continue;
        };
        if top <= position {
            log::trace!("current heading {} at {top} (line {position})", entry.id);
            return Some(entry.id.clone());
        }
    }
    None
}

/// Is `container`'s content folded away by its section toggle button?
pub fn container_collapsed(doc: &Document, container: NodeId, toggle_class: &str) -> bool {
    doc.find_first(container, |e| e.has_class(toggle_class))
        .and_then(|b| doc.element(b))
        .and_then(|e| e.get_attribute("aria-expanded"))
        == Some("false")
}

/// Outcome of one scroll-spy pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpyUpdate {
    pub current: Option<String>,
    /// The current heading differs from the previous pass.
    pub changed: bool,
    /// The active outline entry should be scrolled into view. False on
    /// the first pass after a reset.
    pub reveal: bool,
}

/// Tracks the current heading and the navigation override.
///
/// While an override is held (after an outline click) the pinned heading
/// wins over whatever geometry says, so the smooth scroll to the target
/// cannot make the highlight flicker through intermediate headings.
#[derive(Debug, Clone)]
pub struct ScrollSpy {
    current: Option<String>,
    pinned: Option<String>,
    first_pass: bool,
}

impl ScrollSpy {
    pub fn new() -> Self {
        Self {
            current: None,
            pinned: None,
            first_pass: true,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn begin_override(&mut self, id: &str) {
        self.pinned = Some(id.to_string());
    }

    pub fn end_override(&mut self) {
        self.pinned = None;
    }

    pub fn is_overridden(&self) -> bool {
        self.pinned.is_some()
    }

    /// Forget the current heading; the next pass counts as a first pass.
    pub fn reset(&mut self) {
        self.current = None;
        self.first_pass = true;
    }

    /// Settle the current heading. `computed` is ignored while an
    /// override is held.
    pub fn resolve(&mut self, computed: Option<String>) -> SpyUpdate {
        let next = self.pinned.clone().or(computed);
        let changed = next != self.current || self.first_pass;
        let reveal = !self.first_pass && changed;
        self.first_pass = false;
        self.current = next;
        SpyUpdate {
            current: self.current.clone(),
            changed,
            reveal,
        }
    }
}

impl Default for ScrollSpy {
    fn default() -> Self {
        Self::new()
    }
}
