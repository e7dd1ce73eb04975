//! Search state and the match cursor.

use statute_dom::NodeId;

use crate::highlight::MatchMarker;
use crate::outline::SCOPE_ALL;

/// Which part of the content a search counts matches in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchScope {
    #[default]
    All,
    /// An act container, by element id.
    Container(String),
}

impl SearchScope {
    /// Parse a scope selector value. Blank and `all` mean everything.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == SCOPE_ALL {
            Self::All
        } else {
            Self::Container(value.to_string())
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::All => SCOPE_ALL,
            Self::Container(id) => id,
        }
    }
}

/// Status line and control state derived from the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchStatus {
    /// `"i of n"`, `"0 found"`, or empty.
    pub text: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// A cursor move: the span to un-mark (if any) and the span to mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorMove {
    pub previous: Option<NodeId>,
    pub current: NodeId,
}

/// Current term, scope, markers and cursor position.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    markers: Vec<MatchMarker>,
    index: Option<usize>,
    /// The trimmed term the markers were produced for.
    last_term: String,
    scope: SearchScope,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[MatchMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn current(&self) -> Option<&MatchMarker> {
        self.index.and_then(|i| self.markers.get(i))
    }

    pub fn last_term(&self) -> &str {
        &self.last_term
    }

    pub fn scope(&self) -> &SearchScope {
        &self.scope
    }

    pub fn set_scope(&mut self, scope: SearchScope) {
        self.scope = scope;
    }

    pub fn set_last_term(&mut self, term: &str) {
        self.last_term = term.to_string();
    }

    /// Drop markers and cursor. Scope and last term survive.
    pub fn clear_results(&mut self) {
        self.markers.clear();
        self.index = None;
    }

    /// Install fresh markers; the cursor is unset until the first move.
    pub fn set_results(&mut self, markers: Vec<MatchMarker>) {
        self.markers = markers;
        self.index = None;
    }

    /// Move the cursor to `index`. Out-of-range requests are ignored.
    pub fn go_to(&mut self, index: usize) -> Option<CursorMove> {
        let current = self.markers.get(index)?.span;
        let previous = self.current().map(|m| m.span);
        self.index = Some(index);
        Some(CursorMove { previous, current })
    }

    /// Index after the cursor, wrapping to the first match.
    pub fn next_index(&self) -> Option<usize> {
        let len = self.markers.len();
        if len == 0 {
            return None;
        }
        Some(self.index.map_or(0, |i| (i + 1) % len))
    }

    /// Index before the cursor, wrapping to the last match.
    pub fn previous_index(&self) -> Option<usize> {
        let len = self.markers.len();
        if len == 0 {
            return None;
        }
        Some(self.index.map_or(len - 1, |i| (i + len - 1) % len))
    }

    /// Whether Enter in the search box should advance instead of
    /// re-running the search.
    pub fn should_advance(&self, term: &str) -> bool {
        !self.markers.is_empty()
            && term == self.last_term
            && self.index.is_some_and(|i| i + 1 < self.markers.len())
    }

    /// Status for the search box holding `box_term` (already trimmed).
    pub fn status(&self, box_term: &str) -> SearchStatus {
        if !self.markers.is_empty() {
            let position = self.index.map_or(0, |i| i + 1);
            return SearchStatus {
                text: format!("{position} of {}", self.markers.len()),
                prev_enabled: true,
                next_enabled: true,
            };
        }
        SearchStatus {
            text: if box_term.is_empty() {
                String::new()
            } else {
                "0 found".to_string()
            },
            prev_enabled: false,
            next_enabled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state(n: usize) -> SearchState {
        let mut s = SearchState::new();
        s.set_results(
            (0..n)
                .map(|i| MatchMarker {
                    span: 100 + i,
                    text: "x".into(),
                })
                .collect(),
        );
        s.set_last_term("x");
        s
    }

    #[test]
    fn scope_parsing() {
        assert_eq!(SearchScope::parse("all"), SearchScope::All);
        assert_eq!(SearchScope::parse("  "), SearchScope::All);
        assert_eq!(SearchScope::parse("act-two"), SearchScope::Container("act-two".into()));
        assert_eq!(SearchScope::Container("act-two".into()).value(), "act-two");
    }

    #[test]
    fn go_to_reports_previous_and_current() {
        let mut s = state(3);
        assert_eq!(s.go_to(0), Some(CursorMove { previous: None, current: 100 }));
        assert_eq!(
            s.go_to(2),
            Some(CursorMove {
                previous: Some(100),
                current: 102
            })
        );
        assert_eq!(s.go_to(3), None);
        assert_eq!(s.index(), Some(2));
    }

    #[test]
    fn navigation_wraps() {
        let mut s = state(3);
        s.go_to(2);
        assert_eq!(s.next_index(), Some(0));
        s.go_to(0);
        assert_eq!(s.previous_index(), Some(2));
        assert_eq!(state(0).next_index(), None);
    }

    #[test]
    fn status_strings() {
        let mut s = state(3);
        s.go_to(1);
        let st = s.status("x");
        assert_eq!(st.text, "2 of 3");
        assert!(st.prev_enabled && st.next_enabled);

        let empty = SearchState::new();
        assert_eq!(empty.status("zzz").text, "0 found");
        assert!(!empty.status("zzz").next_enabled);
        assert_eq!(empty.status("").text, "");
    }

    #[test]
    fn enter_advances_only_mid_list_with_same_term() {
        let mut s = state(3);
        s.go_to(0);
        assert!(s.should_advance("x"));
        assert!(!s.should_advance("y"));
        s.go_to(2);
        assert!(!s.should_advance("x"));
    }

    #[test]
    fn clear_results_keeps_scope() {
        let mut s = state(2);
        s.set_scope(SearchScope::Container("a".into()));
        s.go_to(1);
        s.clear_results();
        assert!(s.is_empty());
        assert_eq!(s.index(), None);
        assert_eq!(s.scope().value(), "a");
    }

    proptest! {
        #[test]
        fn next_then_previous_returns_home((n, i) in (1usize..20).prop_flat_map(|n| (Just(n), 0..n))) {
            let mut s = state(n);
            s.go_to(i);
            let next = s.next_index().unwrap();
            s.go_to(next);
            let back = s.previous_index().unwrap();
            s.go_to(back);
            prop_assert_eq!(s.index(), Some(i));
        }
    }
}
