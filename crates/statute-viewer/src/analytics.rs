//! Optional search analytics.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

/// Sent after every non-empty search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchEvent {
    /// Lowercased term.
    pub search_term: String,
    /// Label of the active scope.
    pub search_category: String,
}

impl SearchEvent {
    pub fn new(term: &str, scope_label: &str) -> Self {
        Self {
            search_term: term.to_lowercase(),
            search_category: scope_label.to_string(),
        }
    }
}

pub trait AnalyticsSink {
    fn search(&mut self, event: &SearchEvent);
}

/// Writes events to the log as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl AnalyticsSink for LogSink {
    fn search(&mut self, event: &SearchEvent) {
        match serde_json::to_string(event) {
            Ok(json) => log::info!("analytics search {json}"),
            Err(e) => log::warn!("could not encode analytics event: {e}"),
        }
    }
}

/// Keeps events in memory. Clones share one event list, so a handle kept
/// by the caller sees what the viewer recorded.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<SearchEvent>>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SearchEvent> {
        self.events.borrow().clone()
    }
}

impl AnalyticsSink for RecordingSink {
    fn search(&mut self, event: &SearchEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
