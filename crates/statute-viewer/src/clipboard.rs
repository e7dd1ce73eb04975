//! Copy-to-clipboard for content sections.
//!
//! Copying walks a short fallback chain: the primary backend, then the
//! legacy backend if one is configured. When both fail the caller shows a
//! transient error banner.

use statute_dom::{Document, NodeId, NodeKind, TagName};
use statute_types::{Result, ViewerError};

pub const COPY_BUTTON_CLASS: &str = "copy-button";
pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied!";
pub const COPY_TITLE: &str = "Copy section text";
pub const COPY_FAILED_MESSAGE: &str = "Failed to copy. Please try again or copy manually.";

/// Something that can receive copied text.
pub trait ClipboardBackend {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Clipboard that keeps the last write in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
    /// Fail every write, to exercise fallbacks.
    pub broken: bool,
}

impl MemoryClipboard {
    pub fn broken() -> Self {
        Self {
            contents: None,
            broken: true,
        }
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        if self.broken {
            return Err(ViewerError::Clipboard("clipboard unavailable".into()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// Which link of the chain took the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Primary,
    Fallback,
    Failed,
}

impl CopyOutcome {
    pub fn succeeded(&self) -> bool {
        !matches!(self, Self::Failed)
    }
}

pub struct ClipboardChain {
    primary: Box<dyn ClipboardBackend>,
    fallback: Option<Box<dyn ClipboardBackend>>,
}

impl ClipboardChain {
    pub fn new(primary: Box<dyn ClipboardBackend>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Box<dyn ClipboardBackend>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn copy(&mut self, text: &str) -> CopyOutcome {
        match self.primary.write_text(text) {
            Ok(()) => return CopyOutcome::Primary,
            Err(e) => log::warn!("primary clipboard failed: {e}"),
        }
        let Some(fallback) = self.fallback.as_mut() else {
            return CopyOutcome::Failed;
        };
        match fallback.write_text(text) {
            Ok(()) => CopyOutcome::Fallback,
            Err(e) => {
                log::error!("fallback clipboard failed: {e}");
                CopyOutcome::Failed
            },
        }
    }
}

impl Default for ClipboardChain {
    fn default() -> Self {
        Self::new(Box::new(MemoryClipboard::default()))
    }
}

/// Rendered text of a section the way a reader would select it: one line
/// per block, whitespace collapsed, copy buttons and other controls left
/// out.
pub fn section_text(doc: &Document, section: NodeId) -> String {
    let mut raw = String::new();
    collect_visible(doc, section, &mut raw);
    raw.lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_visible(doc: &Document, id: NodeId, out: &mut String) {
    match &doc.get(id).kind {
        NodeKind::Text(t) => out.extend(t.chars().map(|c| if c.is_whitespace() { ' ' } else { c })),
        NodeKind::Element(e) => {
            if e.tag.is_raw_text() || e.tag.is_control() || e.has_class(COPY_BUTTON_CLASS) {
                return;
            }
            if e.tag == TagName::Br {
                out.push('\n');
                return;
            }
            let block = e.tag.is_block_level() || e.tag.is_heading();
            if block {
                out.push('\n');
            }
            for &child in &doc.get(id).children {
                collect_visible(doc, child, out);
            }
            if block {
                out.push('\n');
            }
        },
        NodeKind::Document => {
            for &child in &doc.get(id).children {
                collect_visible(doc, child, out);
            }
        },
        NodeKind::Comment(_) | NodeKind::Doctype(_) => {},
    }
}
