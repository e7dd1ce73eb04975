//! Shared fixtures for viewer tests.
//!
//! The page has two acts. Act One (`h-one`) holds an intro and one folded
//! section (`h-one-a`); Act Two (`h-two`) has no sections. "lorem"
//! occurs twice in Act One and once in Act Two, plus once in the page
//! chrome outside the content.

use statute_dom::NodeId;

use crate::{MemoryStore, PreferenceStore, Viewer, ViewerConfig};

pub const FILLER: &str = "Filler paragraph with plain words for layout";

pub fn fillers(n: usize) -> String {
    (0..n).map(|i| format!("<p>{FILLER} {i}.</p>")).collect()
}

pub fn statute_page() -> String {
    format!(
        "<html><head><title>Statutes</title></head><body>\
         <div id=\"top-controls-wrapper\"><input id=\"searchBox\"><span>lorem in the chrome</span></div>\
         <div id=\"content\">\
         <div class=\"act-section\" id=\"act-one-wrap\">\
         <h2 id=\"h-one\">Act One</h2>\
         <button class=\"toggle-sections-btn\" aria-controls=\"act-one-sections\">Collapse Sections</button>\
         <p>Lorem opens the first act.</p>{intro}\
         <div id=\"act-one-sections\">\
         <div class=\"section collapsed-section\" id=\"sec-one-a\"><h3 id=\"h-one-a\">Section 1A</h3>\
         <p>The second lorem sits here.</p>{one_a}</div>\
         </div></div>\
         <div class=\"act-section\" id=\"act-two-wrap\">\
         <h2 id=\"h-two\">Act Two</h2><p>A final LOREM.</p>{two}</div>\
         </div></body></html>",
        intro = fillers(10),
        one_a = fillers(20),
        two = fillers(40),
    )
}

/// A viewer on [`statute_page`] after its first frame.
pub fn viewer() -> Viewer {
    viewer_with(ViewerConfig::default(), Box::new(MemoryStore::new()))
}

pub fn viewer_with(config: ViewerConfig, store: Box<dyn PreferenceStore>) -> Viewer {
    let mut v = Viewer::from_html(&statute_page(), config, store);
    v.tick(0);
    v
}

pub fn node(v: &Viewer, id: &str) -> NodeId {
    v.document()
        .get_element_by_id(id)
        .unwrap_or_else(|| panic!("no element #{id}"))
}

pub fn top_of(v: &Viewer, id: &str) -> i32 {
    v.layout()
        .top(node(v, id))
        .unwrap_or_else(|| panic!("#{id} is not laid out"))
}

pub fn highlight_count(v: &Viewer) -> usize {
    v.content_html().matches("class=\"highlight").count()
}
