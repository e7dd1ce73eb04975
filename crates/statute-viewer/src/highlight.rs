//! Literal, case-insensitive text matching with in-place highlighting.

use std::ops::Range;

use regex::{Regex, RegexBuilder};
use statute_dom::{Document, ElementData, NodeId, NodeKind, TagName};

/// Class on every inserted highlight span.
pub const HIGHLIGHT_CLASS: &str = "highlight";
/// Extra class on the span the cursor is on.
pub const CURRENT_MATCH_CLASS: &str = "current-match";

/// A compiled search term.
///
/// The term is matched literally: regex metacharacters in user input are
/// escaped before compilation.
#[derive(Debug, Clone)]
pub struct SearchPattern {
    term: String,
    regex: Regex,
}

impl SearchPattern {
    /// Compile `term`. Returns `None` for an empty term.
    pub fn new(term: &str) -> Option<Self> {
        if term.is_empty() {
            return None;
        }
        let regex = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
            .ok()?;
        Some(Self {
            term: term.to_string(),
            regex,
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Byte ranges of the non-overlapping matches in `text`, left to
    /// right.
    pub fn find_ranges(&self, text: &str) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        let mut at = 0;
        while at <= text.len() {
            let Some(m) = self.regex.find_at(text, at) else {
                break;
            };
            if m.start() == m.end() {
                // Step past an empty match by one whole character.
                at = m.end() + text[m.end()..].chars().next().map_or(1, char::len_utf8);
                continue;
            }
            ranges.push(m.range());
            at = m.end();
        }
        ranges
    }
}

/// One highlighted occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchMarker {
    /// The inserted highlight span.
    pub span: NodeId,
    /// Matched text as it appears in the document.
    pub text: String,
}

/// Regions of the page whose text is never searched.
#[derive(Debug, Clone)]
pub struct ControlRegions {
    ids: Vec<String>,
}

impl ControlRegions {
    pub fn new(ids: &[String]) -> Self {
        Self { ids: ids.to_vec() }
    }

    /// Page chrome containers, form controls and raw-text elements.
    pub fn matches(&self, data: &ElementData) -> bool {
        data.tag.is_raw_text()
            || data.tag.is_control()
            || data.id().is_some_and(|id| self.ids.iter().any(|r| r == id))
    }

    fn contains_node(&self, doc: &Document, node: NodeId) -> bool {
        doc.closest(node, |_, e| self.matches(e)).is_some()
    }
}

impl Default for ControlRegions {
    fn default() -> Self {
        Self::new(&["top-controls-wrapper".to_string(), "toc-sidebar".to_string()])
    }
}

/// Highlight every occurrence of `pattern` under `root`.
///
/// Every matching text node is split into plain text and
/// `<span class="highlight">` pieces. Only the spans inside `scope` are
/// returned as markers, in document order; matches outside `scope` are
/// still highlighted. A detached `root` or `scope` yields no markers and
/// leaves the document untouched.
pub fn find_and_highlight(
    doc: &mut Document,
    root: NodeId,
    pattern: &SearchPattern,
    scope: NodeId,
    regions: &ControlRegions,
) -> Vec<MatchMarker> {
    if root >= doc.len() || scope >= doc.len() || !doc.is_attached(root) || !doc.is_attached(scope) {
        log::warn!("search root or scope is not attached; nothing highlighted");
        return Vec::new();
    }

    let candidates: Vec<NodeId> = doc
        .descendants(root)
        .into_iter()
        .filter(|&n| matches!(doc.get(n).kind, NodeKind::Text(_)))
        .filter(|&n| !regions.contains_node(doc, n))
        .collect();

    let mut markers = Vec::new();
    for node in candidates {
        let Some(text) = doc.text(node).map(str::to_string) else {
            continue;
        };
        let ranges = pattern.find_ranges(&text);
        if ranges.is_empty() {
            continue;
        }
        let in_scope = doc.contains(scope, node);

        let mut pieces = Vec::with_capacity(ranges.len() * 2 + 1);
        let mut spans = Vec::with_capacity(ranges.len());
        let mut last = 0;
        for range in ranges {
            if range.start > last {
                pieces.push(doc.create_text(&text[last..range.start]));
            }
            let matched = &text[range.clone()];
            let span = doc.create_element(ElementData::new(TagName::Span).with_attr("class", HIGHLIGHT_CLASS));
            let inner = doc.create_text(matched);
            doc.append_child(span, inner);
            pieces.push(span);
            spans.push((span, matched.to_string()));
            last = range.end;
        }
        if last < text.len() {
            pieces.push(doc.create_text(&text[last..]));
        }

        if !doc.replace_with(node, &pieces) {
            continue;
        }
        if in_scope {
            markers.extend(spans.into_iter().map(|(span, text)| MatchMarker { span, text }));
        }
    }

    log::debug!(
        "highlighted '{}': {} marker(s) in scope",
        pattern.term(),
        markers.len()
    );
    markers
}
