//! Statute document viewer.
//!
//! Owns a parsed statute page and everything derived from its content
//! container: highlighted search matches, the heading index and
//! navigation outline, the scroll-spy, and the match cursor. The content
//! markup is the single source of truth. Every reset restores it from a
//! pristine snapshot and rebuilds the derived state on the next frame.
//!
//! Hosts drive a [`Viewer`] with input (search terms, scroll offsets,
//! clicks, key presses) and advance its clock with [`Viewer::tick`];
//! debounced scroll-spy passes, the post-reset rebuild and transient
//! labels all run from there.

pub mod analytics;
pub mod bindings;
pub mod chrome;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod cursor;
pub mod geometry;
pub mod highlight;
pub mod location;
pub mod outline;
pub mod prefs;
pub mod scheduler;
pub mod scroll_spy;
pub mod slug;
pub mod viewport;

#[cfg(test)]
pub(crate) mod test_utils;

// -----------------------------------------------------------------------
// Public re-exports
// -----------------------------------------------------------------------

pub use analytics::{AnalyticsSink, LogSink, RecordingSink, SearchEvent};
pub use bindings::Action;
pub use chrome::{Chrome, NavPanel, SearchBox};
pub use clipboard::{ClipboardBackend, ClipboardChain, CopyOutcome, MemoryClipboard};
pub use commands::{Command, execute, parse_command};
pub use config::{FontBounds, LayoutMetrics, ViewerConfig};
pub use cursor::{SearchScope, SearchState, SearchStatus};
pub use location::{FragmentUpdate, Location};
pub use outline::{HeadingEntry, HeadingIndex, HeadingLevel, Outline, ScopeOption};
pub use prefs::{FileStore, MemoryStore, PreferenceStore, Preferences, Theme};
pub use viewport::{ScrollBehavior, Viewport};

// -----------------------------------------------------------------------
// Imports
// -----------------------------------------------------------------------

use statute_dom::{Document, ElementData, NodeId, TagName, parse_html, serialize_children};

use bindings::Bindings;
use chrome::act_status_line;
use clipboard::{COPIED_LABEL, COPY_BUTTON_CLASS, COPY_FAILED_MESSAGE, COPY_LABEL, COPY_TITLE, section_text};
use geometry::{COLLAPSED_SECTION_CLASS, FlowLayout, Geometry, MonospaceMeasurer, absolute_top};
use highlight::{CURRENT_MATCH_CLASS, ControlRegions, SearchPattern, find_and_highlight};
use outline::{ACT_SECTION_CLASS, SCOPE_ALL_LABEL, SECTION_CLASS, build_outline, normalize_title};
use scheduler::Scheduler;
use scroll_spy::{ScrollSpy, compute_current, container_collapsed};
use viewport::FRAME_MS;

/// Buttons that fold every section of the wrapper named by their
/// `aria-controls` attribute.
pub const TOGGLE_SECTIONS_CLASS: &str = "toggle-sections-btn";
pub const COLLAPSE_SECTIONS_LABEL: &str = "Collapse Sections";
pub const EXPAND_SECTIONS_LABEL: &str = "Expand Sections";

/// Marks controls inserted by the viewer.
const ADDED_ATTR: &str = "data-viewer-added";

/// Upper bound on ticks taken by [`Viewer::settle`].
const SETTLE_LIMIT: usize = 10_000;

// -----------------------------------------------------------------------
// Events and input
// -----------------------------------------------------------------------

/// Side effects the host has to carry out or may want to observe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// Scroll the navigation panel so the entry for `id` is visible.
    RevealOutlineEntry { id: String, smooth: bool },
    /// Move keyboard focus to the search box.
    FocusSearchBox,
    /// The location fragment changed.
    Navigated { id: String, update: FragmentUpdate },
    /// Section text went to the clipboard.
    Copied(String),
    /// Show a transient error banner.
    BannerShown(String),
    BannerDismissed,
}

/// Which part of a top-level outline entry was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineTarget {
    /// The expand/collapse icon. Never navigates.
    Icon,
    /// The title text.
    Title,
}

/// Keys with viewer-level bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Slash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKey {
    ScrollSpy,
    Resize,
    Override,
    CopyLabel(NodeId),
    Banner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    /// Rebuild derived state after a content reset.
    Rebuild,
    ScrollSpy,
    Resize,
    EndOverride,
    RestoreCopyLabel(NodeId),
    DismissBanner,
}

// -----------------------------------------------------------------------
// Viewer
// -----------------------------------------------------------------------

/// Session state for one statute page.
pub struct Viewer {
    pub config: ViewerConfig,

    /// The live page.
    doc: Document,
    /// The page as loaded. `None` when the content container is missing.
    pristine: Option<Document>,
    /// The content container.
    content: Option<NodeId>,

    measurer: MonospaceMeasurer,
    regions: ControlRegions,
    layout: FlowLayout,
    viewport: Viewport,

    headings: HeadingIndex,
    outline: Outline,
    scope_options: Vec<ScopeOption>,
    bindings: Bindings,

    search: SearchState,
    /// A search is waiting for the rebuild frame.
    search_pending: bool,
    spy: ScrollSpy,
    scheduler: Scheduler<TimerKey, Task>,

    chrome: Chrome,
    prefs: Preferences,
    store: Box<dyn PreferenceStore>,
    clipboard: ClipboardChain,
    analytics: Option<Box<dyn AnalyticsSink>>,
    location: Location,

    events: Vec<ViewEvent>,
    now_ms: u64,
}

impl Viewer {
    /// Take ownership of a parsed page.
    ///
    /// Preferences are read from `store` and the rebuild frame is queued;
    /// the outline and scroll-spy exist after the first [`tick`](Self::tick).
    /// A page without the configured content container still loads, with
    /// search, outline and scroll-spy disabled.
    pub fn new(doc: Document, config: ViewerConfig, store: Box<dyn PreferenceStore>) -> Self {
        let prefs = Preferences::load(store.as_ref(), &config.fonts);
        let content = doc.get_element_by_id(&config.content_id);
        match content {
            Some(_) => log::info!(
                "Viewer ready: #{} ({} nodes, font {}px, {} theme)",
                config.content_id,
                doc.len(),
                prefs.font_size,
                prefs.theme.as_str()
            ),
            None => log::error!(
                "content element #{} not found; search, outline and scroll-spy disabled",
                config.content_id
            ),
        }
        let pristine = content.map(|_| doc.clone());

        let mut chrome = Chrome {
            theme: prefs.theme,
            ..Chrome::default()
        };
        chrome.panel.apply_width(config.viewport_width, config.narrow_breakpoint);

        let mut viewer = Self {
            measurer: MonospaceMeasurer {
                glyph_width: config.layout.glyph_width,
            },
            regions: ControlRegions::new(&config.control_region_ids),
            layout: FlowLayout::default(),
            viewport: Viewport::new(config.viewport_width, config.viewport_height, config.smooth_scroll),
            headings: HeadingIndex::default(),
            outline: Outline::default(),
            scope_options: Vec::new(),
            bindings: Bindings::new(),
            search: SearchState::new(),
            search_pending: false,
            spy: ScrollSpy::new(),
            scheduler: Scheduler::new(),
            chrome,
            prefs,
            store,
            clipboard: ClipboardChain::default(),
            analytics: None,
            location: Location::new(config.push_state),
            events: Vec::new(),
            now_ms: 0,
            config,
            doc,
            pristine,
            content,
        };
        if viewer.content.is_some() {
            viewer.reset_content();
        } else {
            viewer.relayout();
        }
        viewer
    }

    /// Parse `html` and load it.
    pub fn from_html(html: &str, config: ViewerConfig, store: Box<dyn PreferenceStore>) -> Self {
        Self::new(parse_html(html), config, store)
    }

    pub fn with_clipboard(mut self, clipboard: ClipboardChain) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_analytics(mut self, sink: Box<dyn AnalyticsSink>) -> Self {
        self.analytics = Some(sink);
        self
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn content(&self) -> Option<NodeId> {
        self.content
    }

    /// Inner markup of the content container.
    pub fn content_html(&self) -> String {
        self.content
            .map(|c| serialize_children(&self.doc, c))
            .unwrap_or_default()
    }

    /// Inner markup of the content container as loaded.
    pub fn pristine_content_html(&self) -> String {
        match (&self.pristine, self.content) {
            (Some(doc), Some(c)) => serialize_children(doc, c),
            _ => String::new(),
        }
    }

    pub fn headings(&self) -> &HeadingIndex {
        &self.headings
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn outline_html(&self) -> String {
        self.outline.render_html()
    }

    pub fn scope_options(&self) -> &[ScopeOption] {
        &self.scope_options
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn status(&self) -> &SearchStatus {
        &self.chrome.status
    }

    /// `(In: {title})` for the current match, or empty.
    pub fn act_status(&self) -> &str {
        &self.chrome.act_status
    }

    pub fn chrome(&self) -> &Chrome {
        &self.chrome
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn layout(&self) -> &FlowLayout {
        &self.layout
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Id of the heading the scroll-spy considers current.
    pub fn current_heading(&self) -> Option<&str> {
        self.spy.current()
    }

    pub fn is_spy_overridden(&self) -> bool {
        self.spy.is_overridden()
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Drain pending events.
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    /// The copy button inserted for the section with element id
    /// `section_id`.
    pub fn copy_button_for(&self, section_id: &str) -> Option<NodeId> {
        let section = self.doc.get_element_by_id(section_id)?;
        self.bindings
            .nodes_where(|a| matches!(a, Action::CopySection { section: s } if *s == section))
            .first()
            .copied()
    }

    /// The section toggle button controlling the wrapper `wrapper_id`.
    pub fn toggle_button_for(&self, wrapper_id: &str) -> Option<NodeId> {
        let wrapper = self.doc.get_element_by_id(wrapper_id)?;
        self.bindings
            .nodes_where(|a| matches!(a, Action::ToggleSections { wrapper: w } if *w == wrapper))
            .first()
            .copied()
    }

    // -------------------------------------------------------------------
    // Clock
    // -------------------------------------------------------------------

    /// Advance the clock to `now_ms`: step the scroll animation, run the
    /// queued frame, then every timer that has come due.
    pub fn tick(&mut self, now_ms: u64) {
        let elapsed = now_ms.saturating_sub(self.now_ms);
        self.now_ms = self.now_ms.max(now_ms);

        if elapsed > 0 && self.viewport.is_animating() {
            let before = self.viewport.scroll_y;
            self.viewport.tick(elapsed);
            if self.viewport.scroll_y != before {
                self.note_scrolled();
            }
        }

        self.run_frame();
        loop {
            let due = self.scheduler.take_due(self.now_ms);
            if due.is_empty() {
                break;
            }
            for task in due {
                self.run_task(task);
            }
            self.run_frame();
        }
    }

    /// Advance the clock by `ms`.
    pub fn advance(&mut self, ms: u64) {
        self.tick(self.now_ms.saturating_add(ms));
    }

    /// Run until no frame, animation or timer is pending.
    pub fn settle(&mut self) {
        for _ in 0..SETTLE_LIMIT {
            let next = if self.scheduler.has_frame_work() {
                Some(self.now_ms)
            } else if self.viewport.is_animating() {
                Some(self.now_ms + FRAME_MS)
            } else {
                self.scheduler.next_deadline()
            };
            let Some(at) = next else {
                return;
            };
            self.tick(at.max(self.now_ms));
        }
        log::warn!("viewer still busy after {SETTLE_LIMIT} ticks");
    }

    fn run_frame(&mut self) {
        for task in self.scheduler.take_frame() {
            self.run_task(task);
        }
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::Rebuild => self.rebuild(),
            Task::ScrollSpy => self.update_scroll_spy(),
            Task::Resize => {
                self.chrome
                    .panel
                    .apply_width(self.viewport.width, self.config.narrow_breakpoint);
                self.update_scroll_spy();
            },
            Task::EndOverride => {
                log::debug!("navigation override released");
                self.spy.end_override();
                self.update_scroll_spy();
            },
            Task::RestoreCopyLabel(button) => {
                if self.doc.is_attached(button) && self.doc.has_class(button, COPY_BUTTON_CLASS) {
                    self.doc.set_text_content(button, COPY_LABEL);
                }
            },
            Task::DismissBanner => {
                if self.chrome.banner.take().is_some() {
                    self.events.push(ViewEvent::BannerDismissed);
                }
            },
        }
    }

    // -------------------------------------------------------------------
    // Content lifecycle
    // -------------------------------------------------------------------

    /// Restore the pristine content and queue the rebuild frame. Markers,
    /// outline, heading index and control bindings are dropped at once.
    fn reset_content(&mut self) {
        let Some(pristine) = &self.pristine else {
            log::warn!("no content snapshot; reset skipped");
            return;
        };
        self.doc = pristine.clone();
        self.apply_font_size();
        self.search.clear_results();
        self.bindings.clear();
        self.headings = HeadingIndex::default();
        self.outline = Outline::default();
        self.spy.reset();
        self.relayout();
        self.scheduler.request_frame(Task::Rebuild);
    }

    fn rebuild(&mut self) {
        let Some(content) = self.content else {
            return;
        };
        self.add_copy_buttons(content);
        self.init_section_toggles(content);

        let build = build_outline(&mut self.doc, content);
        self.headings = build.headings;
        self.outline = build.outline;
        self.scope_options = build.scope_options;
        if let SearchScope::Container(id) = self.search.scope()
            && !self.scope_options.iter().any(|o| o.value == *id)
        {
            log::warn!("search scope #{id} is not offered; searching everything");
            self.search.set_scope(SearchScope::All);
        }
        self.relayout();

        if std::mem::take(&mut self.search_pending) {
            self.run_search(content);
        }
        self.update_scroll_spy();
    }

    /// Put a copy button after every section heading.
    fn add_copy_buttons(&mut self, content: NodeId) {
        let stale = self.doc.find_all(content, |e| {
            e.has_class(COPY_BUTTON_CLASS) && e.get_attribute(ADDED_ATTR).is_some()
        });
        for button in stale {
            self.doc.remove(button);
            self.bindings.detach(button);
        }

        let doc = &self.doc;
        let targets: Vec<(NodeId, NodeId)> = doc
            .find_all(content, |e| e.tag == TagName::H3)
            .into_iter()
            .filter_map(|h3| {
                let section = doc.closest(doc.get(h3).parent?, |_, e| e.has_class(SECTION_CLASS))?;
                doc.closest(doc.get(section).parent?, |_, e| e.has_class(ACT_SECTION_CLASS))?;
                Some((h3, section))
            })
            .collect();

        for (h3, section) in targets {
            let button = self.doc.create_element(
                ElementData::new(TagName::Button)
                    .with_attr("class", COPY_BUTTON_CLASS)
                    .with_attr("title", COPY_TITLE)
                    .with_attr(ADDED_ATTR, "true"),
            );
            let label = self.doc.create_text(COPY_LABEL);
            self.doc.append_child(button, label);
            self.doc.insert_after(h3, button);
            self.bindings.attach(button, Action::CopySection { section });
        }
    }

    /// Bind every section toggle button to its wrapper and sync its
    /// state with the sections inside.
    fn init_section_toggles(&mut self, content: NodeId) {
        for button in self.doc.find_all(content, |e| e.has_class(TOGGLE_SECTIONS_CLASS)) {
            let wrapper = self
                .doc
                .element(button)
                .and_then(|e| e.get_attribute("aria-controls"))
                .and_then(|id| self.doc.get_element_by_id(id));
            let Some(wrapper) = wrapper else {
                log::warn!("section toggle without a valid aria-controls target skipped");
                continue;
            };
            let expanded = !self.any_section_collapsed(wrapper);
            self.set_toggle_state(button, expanded);
            self.bindings.attach(button, Action::ToggleSections { wrapper });
        }
    }

    fn any_section_collapsed(&self, wrapper: NodeId) -> bool {
        self.doc
            .find_first(wrapper, |e| e.has_class(SECTION_CLASS) && e.has_class(COLLAPSED_SECTION_CLASS))
            .is_some()
    }

    fn set_toggle_state(&mut self, button: NodeId, expanded: bool) {
        if let Some(e) = self.doc.element_mut(button) {
            e.set_attribute("aria-expanded", if expanded { "true" } else { "false" });
        }
        let label = if expanded {
            COLLAPSE_SECTIONS_LABEL
        } else {
            EXPAND_SECTIONS_LABEL
        };
        self.doc.set_text_content(button, label);
    }

    fn set_sections_collapsed(&mut self, wrapper: NodeId, collapsed: bool) {
        for section in self.doc.find_all(wrapper, |e| e.has_class(SECTION_CLASS)) {
            if let Some(e) = self.doc.element_mut(section) {
                e.toggle_class(COLLAPSED_SECTION_CLASS, Some(collapsed));
            }
        }
    }

    fn toggle_buttons(&self) -> Vec<(NodeId, NodeId)> {
        self.bindings
            .nodes_where(|a| matches!(a, Action::ToggleSections { .. }))
            .into_iter()
            .filter_map(|button| match self.bindings.get(button) {
                Some(Action::ToggleSections { wrapper }) => Some((button, wrapper)),
                _ => None,
            })
            .collect()
    }

    fn sync_toggles(&mut self) {
        for (button, wrapper) in self.toggle_buttons() {
            let expanded = !self.any_section_collapsed(wrapper);
            self.set_toggle_state(button, expanded);
        }
    }

    fn apply_font_size(&mut self) {
        let size = self.prefs.font_size;
        if let Some(content) = self.content
            && let Some(e) = self.doc.element_mut(content)
        {
            let style = with_font_size(e.get_attribute("style"), size);
            e.set_attribute("style", &style);
        }
    }

    fn relayout(&mut self) {
        let root = self.content.unwrap_or(self.doc.root);
        let width = self.config.content_width(self.viewport.width);
        self.layout = FlowLayout::compute(
            &self.doc,
            root,
            &self.config.layout,
            &self.measurer,
            self.prefs.font_size,
            width,
        );
        self.viewport.set_content_height(self.layout.total_height());
    }

    // -------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------

    /// Replace the search box text.
    pub fn set_search_term(&mut self, term: &str) {
        self.chrome.search_box.value = term.to_string();
    }

    /// Select a search scope by selector value and search again.
    pub fn set_scope(&mut self, value: &str) {
        let mut scope = SearchScope::parse(value);
        if let SearchScope::Container(id) = &scope
            && !self.scope_options.is_empty()
            && !self.scope_options.iter().any(|o| o.value == *id)
        {
            log::warn!("unknown search scope {id:?}; searching everything");
            scope = SearchScope::All;
        }
        self.search.set_scope(scope);
        self.perform_search();
    }

    /// Search the content for the term in the search box.
    ///
    /// The content is reset right away; highlighting and the jump to the
    /// first match happen in the rebuild frame.
    pub fn perform_search(&mut self) {
        let term = self.chrome.search_box.term().to_string();
        self.search.set_last_term(&term);
        self.reset_content();
        self.chrome.clear_statuses();
        if term.is_empty() || self.content.is_none() {
            self.search_pending = false;
            return;
        }
        self.search_pending = true;

        let label = self.scope_label();
        if let Some(sink) = self.analytics.as_mut() {
            sink.search(&SearchEvent::new(&term, &label));
        }
    }

    /// Clear the search box and restore the content.
    pub fn clear_search(&mut self) {
        self.chrome.search_box.value.clear();
        self.search.set_last_term("");
        self.search_pending = false;
        self.reset_content();
        self.chrome.clear_statuses();
    }

    /// Enter in the search box: step to the next match while the box
    /// still holds the searched term, otherwise search.
    pub fn submit_search(&mut self) {
        if self.search.should_advance(self.chrome.search_box.term()) {
            self.next_match();
        } else {
            self.perform_search();
        }
    }

    pub fn next_match(&mut self) -> bool {
        match self.search.next_index() {
            Some(i) => self.go_to_match(i),
            None => false,
        }
    }

    pub fn previous_match(&mut self) -> bool {
        match self.search.previous_index() {
            Some(i) => self.go_to_match(i),
            None => false,
        }
    }

    /// Make match `index` current: mark it, unfold its section, center it
    /// in the viewport and name its act in the status line.
    pub fn go_to_match(&mut self, index: usize) -> bool {
        let Some(step) = self.search.go_to(index) else {
            return false;
        };
        if let Some(previous) = step.previous
            && let Some(e) = self.doc.element_mut(previous)
        {
            e.remove_class(CURRENT_MATCH_CLASS);
        }

        let span = step.current;
        if !self.doc.is_attached(span) {
            self.chrome.act_status.clear();
            self.refresh_status();
            return true;
        }
        if let Some(e) = self.doc.element_mut(span) {
            e.add_class(CURRENT_MATCH_CLASS);
        }
        self.expand_section_of(span);
        self.relayout();

        if let (Some(top), Some(height)) = (absolute_top(&self.layout, span), self.layout.height(span)) {
            self.scroll_viewport(|v| v.center_on(top, height, ScrollBehavior::Smooth));
        }
        self.chrome.act_status = self
            .act_title_of(span)
            .map(|t| act_status_line(&t))
            .unwrap_or_default();
        self.refresh_status();
        true
    }

    fn run_search(&mut self, content: NodeId) {
        let term = self.search.last_term().to_string();
        let Some(pattern) = SearchPattern::new(&term) else {
            return;
        };
        let scope = self.resolve_scope(content);
        let markers = find_and_highlight(&mut self.doc, content, &pattern, scope, &self.regions);
        log::debug!("search {term:?}: {} match(es) in scope", markers.len());
        self.search.set_results(markers);
        self.relayout();
        if !self.go_to_match(0) {
            self.refresh_status();
        }
    }

    fn resolve_scope(&self, content: NodeId) -> NodeId {
        let SearchScope::Container(id) = self.search.scope() else {
            return content;
        };
        match self.doc.get_element_by_id(id) {
            Some(node) if self.doc.contains(content, node) => node,
            _ => {
                log::warn!("search scope #{id} not found; searching everything");
                content
            },
        }
    }

    fn scope_label(&self) -> String {
        let value = self.search.scope().value();
        self.scope_options
            .iter()
            .find(|o| o.value == value)
            .map_or_else(|| SCOPE_ALL_LABEL.to_string(), |o| o.label.clone())
    }

    fn refresh_status(&mut self) {
        self.chrome.status = self.search.status(self.chrome.search_box.term());
        if self.search.is_empty() {
            self.chrome.act_status.clear();
        }
    }

    /// Unfold the collapsed section holding `node`.
    fn expand_section_of(&mut self, node: NodeId) -> bool {
        let Some(section) = self
            .doc
            .closest(node, |_, e| e.has_class(SECTION_CLASS) && e.has_class(COLLAPSED_SECTION_CLASS))
        else {
            return false;
        };
        if let Some(e) = self.doc.element_mut(section) {
            e.remove_class(COLLAPSED_SECTION_CLASS);
        }
        self.sync_toggles();
        true
    }

    fn act_title_of(&self, node: NodeId) -> Option<String> {
        let act = self.doc.closest(node, |_, e| e.has_class(ACT_SECTION_CLASS))?;
        let h2 = self.doc.find_first(act, |e| e.tag == TagName::H2)?;
        Some(normalize_title(&self.doc.text_content(h2)))
    }

    // -------------------------------------------------------------------
    // Scrolling and scroll-spy
    // -------------------------------------------------------------------

    /// The reader scrolled to `y`.
    pub fn on_scroll(&mut self, y: i32) {
        self.scroll_viewport(|v| v.scroll_to(y, ScrollBehavior::Instant));
        self.note_scrolled();
    }

    /// The viewport changed size. Layout follows at once; the panel mode
    /// and scroll-spy follow after the resize burst.
    pub fn on_resize(&mut self, width: u32, height: i32) {
        self.viewport.set_size(width, height);
        self.relayout();
        self.scheduler.schedule(
            TimerKey::Resize,
            self.now_ms,
            self.config.resize_debounce_ms,
            Task::Resize,
        );
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_viewport(|v| v.scroll_to_top(ScrollBehavior::Smooth));
    }

    fn scroll_viewport(&mut self, f: impl FnOnce(&mut Viewport)) {
        let before = self.viewport.scroll_y;
        f(&mut self.viewport);
        if self.viewport.scroll_y != before {
            self.note_scrolled();
        }
    }

    fn note_scrolled(&mut self) {
        self.chrome.scroll_top_visible = self.viewport.scroll_y > self.config.scroll_top_threshold;
        self.scheduler.schedule(
            TimerKey::ScrollSpy,
            self.now_ms,
            self.config.scroll_debounce_ms,
            Task::ScrollSpy,
        );
    }

    fn update_scroll_spy(&mut self) {
        if self.headings.is_empty() {
            return;
        }
        let computed = if self.spy.is_overridden() {
            None
        } else {
            let doc = &self.doc;
            compute_current(
                &self.headings,
                &self.layout,
                self.viewport.scroll_y,
                self.config.scroll_spy_offset,
                |container| container_collapsed(doc, container, TOGGLE_SECTIONS_CLASS),
            )
        };
        let update = self.spy.resolve(computed);
        if !update.changed {
            return;
        }
        self.outline.focus(update.current.as_deref());
        if update.reveal
            && let Some(id) = update.current
        {
            self.events.push(ViewEvent::RevealOutlineEntry { id, smooth: true });
        }
    }

    // -------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------

    /// Scroll to heading `id` and point the location at it. The heading
    /// stays current for `override_ms` whatever the scroll position.
    pub fn navigate_to(&mut self, id: &str) -> bool {
        let Some(target) = self.doc.get_element_by_id(id) else {
            log::warn!("navigation target #{id} not found");
            return false;
        };
        if let Some(top) = absolute_top(&self.layout, target) {
            let y = top - self.config.header_height - self.config.nav_buffer;
            self.scroll_viewport(|v| v.scroll_to(y, ScrollBehavior::Smooth));
        }
        let update = self.location.navigate(id);
        self.events.push(ViewEvent::Navigated {
            id: id.to_string(),
            update,
        });
        if self.chrome.panel.close_after_navigation() {
            log::debug!("navigation panel closed after link click");
        }

        self.spy.begin_override(id);
        self.update_scroll_spy();
        self.scheduler.schedule(
            TimerKey::Override,
            self.now_ms,
            self.config.override_ms,
            Task::EndOverride,
        );
        true
    }

    /// Click on an outline entry. A top-level entry with sub-links folds
    /// or unfolds; a title click also navigates.
    pub fn click_outline(&mut self, id: &str, target: OutlineTarget) -> bool {
        if let Some(index) = self.outline.find_section(id) {
            let toggled = self.outline.toggle(index).is_some();
            return match target {
                OutlineTarget::Icon => toggled,
                OutlineTarget::Title => self.navigate_to(id),
            };
        }
        if self.outline.links().any(|l| l.id == id) {
            return self.navigate_to(id);
        }
        log::warn!("no outline entry for #{id}");
        false
    }

    /// Fold every outline entry and every content section.
    pub fn collapse_all(&mut self) {
        self.outline.collapse_all();
        for (button, wrapper) in self.toggle_buttons() {
            self.set_sections_collapsed(wrapper, true);
            self.set_toggle_state(button, false);
        }
        self.relayout();
        self.scheduler.request_frame(Task::ScrollSpy);
    }

    pub fn toggle_outline_panel(&mut self) {
        self.chrome.panel.toggle();
    }

    // -------------------------------------------------------------------
    // Controls
    // -------------------------------------------------------------------

    /// Click on a node in the page. Returns whether a control handled it.
    pub fn click(&mut self, node: NodeId) -> bool {
        let Some(action) = self.bindings.get(node) else {
            return false;
        };
        match action {
            Action::ToggleSections { wrapper } => self.toggle_sections(node, wrapper),
            Action::CopySection { section } => self.copy_section(node, section),
        }
        true
    }

    fn toggle_sections(&mut self, button: NodeId, wrapper: NodeId) {
        let expanded = self
            .doc
            .element(button)
            .and_then(|e| e.get_attribute("aria-expanded"))
            == Some("true");
        self.set_sections_collapsed(wrapper, expanded);
        self.set_toggle_state(button, !expanded);
        self.relayout();
        self.scheduler.request_frame(Task::ScrollSpy);
    }

    fn copy_section(&mut self, button: NodeId, section: NodeId) {
        let text = section_text(&self.doc, section);
        match self.clipboard.copy(&text) {
            CopyOutcome::Failed => {
                self.chrome.banner = Some(COPY_FAILED_MESSAGE.to_string());
                self.events.push(ViewEvent::BannerShown(COPY_FAILED_MESSAGE.to_string()));
                self.scheduler.schedule(
                    TimerKey::Banner,
                    self.now_ms,
                    self.config.error_banner_ms,
                    Task::DismissBanner,
                );
            },
            outcome => {
                log::debug!("copied {} byte(s) ({outcome:?})", text.len());
                self.doc.set_text_content(button, COPIED_LABEL);
                self.scheduler.schedule(
                    TimerKey::CopyLabel(button),
                    self.now_ms,
                    self.config.copy_feedback_ms,
                    Task::RestoreCopyLabel(button),
                );
                self.events.push(ViewEvent::Copied(text));
            },
        }
    }

    /// Handle a key pressed outside any other handler. Returns whether
    /// the key was consumed.
    pub fn key_press(&mut self, key: Key) -> bool {
        match key {
            Key::Slash if !self.chrome.search_box.focused => {
                self.focus_search_box();
                true
            },
            Key::Enter if self.chrome.search_box.focused => {
                self.submit_search();
                true
            },
            Key::Slash | Key::Enter => false,
        }
    }

    pub fn focus_search_box(&mut self) {
        self.chrome.search_box.focused = true;
        self.events.push(ViewEvent::FocusSearchBox);
    }

    pub fn blur_search_box(&mut self) {
        self.chrome.search_box.focused = false;
    }

    // -------------------------------------------------------------------
    // Preferences
    // -------------------------------------------------------------------

    pub fn toggle_theme(&mut self) {
        self.prefs.toggle_theme(self.store.as_mut());
        self.chrome.theme = self.prefs.theme;
    }

    pub fn increase_font(&mut self) -> bool {
        let changed = self.prefs.increase_font(&self.config.fonts, self.store.as_mut());
        if changed {
            self.font_changed();
        }
        changed
    }

    pub fn decrease_font(&mut self) -> bool {
        let changed = self.prefs.decrease_font(&self.config.fonts, self.store.as_mut());
        if changed {
            self.font_changed();
        }
        changed
    }

    fn font_changed(&mut self) {
        self.apply_font_size();
        self.relayout();
        self.scheduler.request_frame(Task::ScrollSpy);
    }
}

/// `style` with its font-size declaration replaced by `size` pixels.
fn with_font_size(style: Option<&str>, size: u32) -> String {
    let font = format!("font-size: {size}px");
    let mut decls: Vec<&str> = style
        .unwrap_or("")
        .split(';')
        .map(str::trim)
        .filter(|d| {
            !d.is_empty()
                && !d
                    .split(':')
                    .next()
                    .is_some_and(|p| p.trim().eq_ignore_ascii_case("font-size"))
        })
        .collect();
    decls.push(&font);
    decls.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{highlight_count, node, statute_page, top_of, viewer, viewer_with};

    fn search(v: &mut Viewer, term: &str) {
        v.set_search_term(term);
        v.perform_search();
        v.tick(v.now());
    }

    fn aria_expanded(v: &Viewer, button: NodeId) -> Option<String> {
        v.document()
            .element(button)
            .and_then(|e| e.get_attribute("aria-expanded"))
            .map(str::to_string)
    }

    // ---------------------------------------------------------------
    // Search
    // ---------------------------------------------------------------

    #[test]
    fn search_all_counts_every_occurrence() {
        let mut v = viewer();
        search(&mut v, "lorem");
        assert_eq!(v.search().len(), 3);
        assert_eq!(v.status().text, "1 of 3");
        assert!(v.status().prev_enabled && v.status().next_enabled);
        assert_eq!(v.act_status(), "(In: Act One)");
        assert_eq!(highlight_count(&v), 3);

        let first = v.search().current().unwrap();
        assert_eq!(first.text, "Lorem");
        assert!(v.document().has_class(first.span, CURRENT_MATCH_CLASS));
    }

    #[test]
    fn scoped_search_highlights_everywhere_but_counts_in_scope() {
        let mut v = viewer();
        v.set_search_term("lorem");
        v.set_scope("act-two-wrap");
        v.tick(v.now());
        assert_eq!(v.search().len(), 1);
        assert_eq!(highlight_count(&v), 3);
        assert_eq!(v.status().text, "1 of 1");
        assert_eq!(v.search().current().unwrap().text, "LOREM");
        assert_eq!(v.act_status(), "(In: Act Two)");
    }

    #[test]
    fn unknown_scope_falls_back_to_everything() {
        let mut v = viewer();
        v.set_search_term("lorem");
        v.set_scope("no-such-act");
        v.tick(v.now());
        assert_eq!(v.search().scope(), &SearchScope::All);
        assert_eq!(v.search().len(), 3);
    }

    #[test]
    fn zero_matches_report_zero_found() {
        let mut v = viewer();
        search(&mut v, "zzz");
        assert!(v.search().is_empty());
        assert_eq!(v.status().text, "0 found");
        assert!(!v.status().prev_enabled);
        assert!(!v.status().next_enabled);
        assert_eq!(v.act_status(), "");
    }

    #[test]
    fn empty_term_resets_without_searching() {
        let sink = RecordingSink::default();
        let mut v = viewer().with_analytics(Box::new(sink.clone()));
        search(&mut v, "lorem");
        search(&mut v, "   ");
        assert!(v.search().is_empty());
        assert_eq!(v.status().text, "");
        assert_eq!(highlight_count(&v), 0);
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn analytics_get_lowercased_term_and_scope_label() {
        let sink = RecordingSink::default();
        let mut v = viewer().with_analytics(Box::new(sink.clone()));
        search(&mut v, "LoReM");
        v.set_scope("act-two-wrap");
        assert_eq!(
            sink.events(),
            vec![
                SearchEvent::new("lorem", SCOPE_ALL_LABEL),
                SearchEvent::new("lorem", "Act Two"),
            ]
        );
    }

    #[test]
    fn clear_restores_pristine_markup() {
        let mut v = viewer();
        search(&mut v, "lorem");
        assert_ne!(v.content_html(), v.pristine_content_html());
        v.clear_search();
        assert_eq!(v.content_html(), v.pristine_content_html());
        assert!(v.search().is_empty());
        assert_eq!(v.status().text, "");
        assert_eq!(v.chrome().search_box.value, "");

        v.tick(v.now());
        assert_eq!(v.headings().len(), 3);
        assert_eq!(highlight_count(&v), 0);
    }

    #[test]
    fn repeated_search_is_idempotent() {
        let mut v = viewer();
        search(&mut v, "lorem");
        let first = (v.search().len(), v.search().current().cloned(), v.content_html());
        v.perform_search();
        v.tick(v.now());
        let second = (v.search().len(), v.search().current().cloned(), v.content_html());
        assert_eq!(first, second);
    }

    #[test]
    fn next_and_previous_are_inverse_and_wrap() {
        let mut v = viewer();
        search(&mut v, "lorem");
        for i in 0..3 {
            assert!(v.go_to_match(i));
            v.next_match();
            v.previous_match();
            assert_eq!(v.search().index(), Some(i));
        }
        v.go_to_match(2);
        v.next_match();
        assert_eq!(v.search().index(), Some(0));
        v.previous_match();
        assert_eq!(v.search().index(), Some(2));
        assert!(!v.go_to_match(3));
        assert_eq!(v.search().index(), Some(2));
    }

    #[test]
    fn moving_the_cursor_moves_the_current_mark() {
        let mut v = viewer();
        search(&mut v, "lorem");
        let spans: Vec<NodeId> = v.search().markers().iter().map(|m| m.span).collect();
        v.next_match();
        assert!(!v.document().has_class(spans[0], CURRENT_MATCH_CLASS));
        assert!(v.document().has_class(spans[1], CURRENT_MATCH_CLASS));
        assert_eq!(v.status().text, "2 of 3");
    }

    #[test]
    fn going_to_a_folded_match_unfolds_its_section() {
        let mut v = viewer();
        search(&mut v, "lorem");
        let section = node(&v, "sec-one-a");
        let toggle = v.toggle_button_for("act-one-sections").unwrap();
        assert!(v.document().has_class(section, COLLAPSED_SECTION_CLASS));
        assert_eq!(aria_expanded(&v, toggle).as_deref(), Some("false"));

        v.go_to_match(1);
        assert!(!v.document().has_class(section, COLLAPSED_SECTION_CLASS));
        assert_eq!(aria_expanded(&v, toggle).as_deref(), Some("true"));
        assert_eq!(v.document().text_content(toggle), COLLAPSE_SECTIONS_LABEL);
        assert_eq!(v.act_status(), "(In: Act One)");

        let span = v.search().current().unwrap().span;
        assert!(v.layout().is_rendered(span));
    }

    #[test]
    fn go_to_centers_the_match() {
        let mut v = viewer();
        search(&mut v, "lorem");
        v.go_to_match(2);
        v.settle();
        let span = v.search().current().unwrap().span;
        let top = v.layout().top(span).unwrap();
        let height = v.layout().height(span).unwrap();
        let expected = (top + height / 2 - v.viewport().viewport_height / 2).clamp(0, v.viewport().max_scroll());
        assert_eq!(v.viewport().scroll_y, expected);
    }

    #[test]
    fn enter_searches_then_advances() {
        let mut v = viewer();
        assert!(v.key_press(Key::Slash));
        assert!(v.chrome().search_box.focused);
        assert!(v.take_events().contains(&ViewEvent::FocusSearchBox));
        assert!(!v.key_press(Key::Slash));

        v.set_search_term("lorem");
        assert!(v.key_press(Key::Enter));
        v.tick(v.now());
        assert_eq!(v.status().text, "1 of 3");
        v.key_press(Key::Enter);
        assert_eq!(v.status().text, "2 of 3");
        v.key_press(Key::Enter);
        assert_eq!(v.status().text, "3 of 3");

        v.key_press(Key::Enter);
        assert_eq!(v.status().text, "");
        v.tick(v.now());
        assert_eq!(v.status().text, "1 of 3");

        v.blur_search_box();
        assert!(!v.key_press(Key::Enter));
    }

    // ---------------------------------------------------------------
    // Outline and rebuild
    // ---------------------------------------------------------------

    #[test]
    fn derived_state_appears_after_the_first_frame() {
        let mut v = Viewer::from_html(&statute_page(), ViewerConfig::default(), Box::new(MemoryStore::new()));
        assert!(v.outline().is_empty());
        assert!(v.headings().is_empty());

        v.tick(0);
        let ids: Vec<&str> = v.headings().entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["h-one", "h-one-a", "h-two"]);
        let sections = v.outline().sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].children[0].id, "h-one-a");
        let scopes: Vec<&str> = v.scope_options().iter().map(|o| o.value.as_str()).collect();
        assert_eq!(scopes, vec!["all", "act-one-wrap", "act-two-wrap"]);
        assert_eq!(v.current_heading(), Some("h-one"));
        assert!(v.take_events().is_empty());
    }

    #[test]
    fn controls_are_bound_once_per_rebuild() {
        let mut v = viewer();
        let button = v.copy_button_for("sec-one-a").unwrap();
        assert_eq!(v.document().text_content(button), COPY_LABEL);
        let toggle = v.toggle_button_for("act-one-sections").unwrap();
        assert_eq!(v.document().text_content(toggle), EXPAND_SECTIONS_LABEL);

        for _ in 0..3 {
            v.perform_search();
            v.tick(v.now());
        }
        let buttons = v
            .document()
            .find_all(v.content().unwrap(), |e| e.has_class(COPY_BUTTON_CLASS));
        assert_eq!(buttons.len(), 1);
        assert_eq!(v.bindings.len(), 2);
    }

    #[test]
    fn outline_icon_folds_without_navigating() {
        let mut v = viewer();
        assert!(v.outline().sections()[0].expanded, "current act starts unfolded");
        assert!(v.click_outline("h-one", OutlineTarget::Icon));
        assert!(!v.outline().sections()[0].expanded);
        assert!(v.click_outline("h-one", OutlineTarget::Icon));
        assert!(v.outline().sections()[0].expanded);
        assert!(v.location().fragment().is_none());
        assert!(!v.click_outline("h-two", OutlineTarget::Icon));
        assert!(!v.click_outline("nope", OutlineTarget::Title));
    }

    #[test]
    fn outline_title_folds_and_navigates() {
        let mut v = viewer();
        assert!(v.click_outline("h-one", OutlineTarget::Title));
        assert!(!v.outline().sections()[0].expanded);
        assert_eq!(v.location().hash(), "#h-one");
        assert!(v.click_outline("h-one-a", OutlineTarget::Title));
        assert!(v.outline().sections()[0].expanded);
        assert_eq!(v.location().hash(), "#h-one-a");
        assert_eq!(v.location().history_len(), 2);
    }

    #[test]
    fn act_unfolds_when_its_title_becomes_current() {
        let mut v = viewer();
        v.collapse_all();
        v.tick(v.now());
        assert!(!v.outline().sections()[0].expanded);

        assert!(v.navigate_to("h-two"));
        assert_eq!(v.current_heading(), Some("h-two"));
        assert!(v.outline().sections().iter().all(|s| !s.expanded));

        assert!(v.navigate_to("h-one"));
        assert_eq!(v.current_heading(), Some("h-one"));
        assert!(v.outline().sections()[0].expanded);
        assert!(v.outline().sections()[0].link.active);
    }

    #[test]
    fn collapse_all_folds_outline_and_sections() {
        let mut v = viewer();
        let toggle = v.toggle_button_for("act-one-sections").unwrap();
        v.click(toggle);
        v.click_outline("h-one", OutlineTarget::Icon);
        assert_eq!(aria_expanded(&v, toggle).as_deref(), Some("true"));

        v.collapse_all();
        v.tick(v.now());
        assert!(v.outline().sections().iter().all(|s| !s.expanded));
        assert!(v.document().has_class(node(&v, "sec-one-a"), COLLAPSED_SECTION_CLASS));
        assert_eq!(aria_expanded(&v, toggle).as_deref(), Some("false"));
    }

    // ---------------------------------------------------------------
    // Scroll-spy and navigation
    // ---------------------------------------------------------------

    #[test]
    fn scroll_spy_follows_the_scroll_offset() {
        let mut v = viewer();
        let two = top_of(&v, "h-two");
        v.on_scroll(two - v.config.scroll_spy_offset);
        assert_eq!(v.current_heading(), Some("h-one"));
        v.advance(v.config.scroll_debounce_ms);
        assert_eq!(v.current_heading(), Some("h-two"));
        assert!(v.take_events().contains(&ViewEvent::RevealOutlineEntry {
            id: "h-two".to_string(),
            smooth: true,
        }));
    }

    #[test]
    fn scroll_bursts_are_debounced() {
        let mut v = viewer();
        let two = top_of(&v, "h-two");
        v.on_scroll(two);
        v.advance(60);
        v.on_scroll(two + 10);
        v.advance(60);
        assert_eq!(v.current_heading(), Some("h-one"));
        v.advance(40);
        assert_eq!(v.current_heading(), Some("h-two"));
    }

    #[test]
    fn folded_sections_hide_their_headings_from_the_spy() {
        let mut v = viewer();
        let a = top_of(&v, "h-one-a");
        v.on_scroll(a - v.config.scroll_spy_offset + 1);
        v.advance(v.config.scroll_debounce_ms);
        assert_eq!(v.current_heading(), Some("h-one"));

        let toggle = v.toggle_button_for("act-one-sections").unwrap();
        assert!(v.click(toggle));
        v.tick(v.now());
        assert_eq!(v.current_heading(), Some("h-one-a"));
        assert!(v.outline().sections()[0].expanded);
    }

    #[test]
    fn scroll_spy_never_moves_backwards() {
        let mut v = viewer();
        let order: Vec<String> = v.headings().entries().iter().map(|e| e.id.clone()).collect();
        let max = v.viewport().max_scroll();
        let mut last = 0;
        for y in (0..=max).step_by(40) {
            v.on_scroll(y);
            v.advance(v.config.scroll_debounce_ms);
            let pos = v
                .current_heading()
                .and_then(|id| order.iter().position(|o| o == id))
                .unwrap();
            assert!(pos >= last, "heading went back at {y}");
            assert_ne!(order[pos], "h-one-a");
            last = pos;
        }
        assert_eq!(v.current_heading(), Some("h-two"));
    }

    #[test]
    fn navigation_pins_the_target_until_the_override_ends() {
        let mut v = viewer();
        v.take_events();
        assert!(v.navigate_to("h-two"));
        assert_eq!(v.current_heading(), Some("h-two"));
        assert!(v.is_spy_overridden());
        let events = v.take_events();
        assert!(events.contains(&ViewEvent::Navigated {
            id: "h-two".to_string(),
            update: FragmentUpdate::Pushed,
        }));
        assert!(events.contains(&ViewEvent::RevealOutlineEntry {
            id: "h-two".to_string(),
            smooth: true,
        }));

        v.advance(v.config.override_ms - 1);
        assert!(v.is_spy_overridden());
        assert_eq!(v.current_heading(), Some("h-two"));
        v.advance(1);
        assert!(!v.is_spy_overridden());

        v.settle();
        assert_eq!(v.viewport().scroll_y, top_of(&v, "h-two") - v.config.nav_buffer);
        assert_eq!(v.current_heading(), Some("h-two"));
    }

    #[test]
    fn navigation_without_push_assigns_the_fragment() {
        let config = ViewerConfig {
            push_state: false,
            ..ViewerConfig::default()
        };
        let mut v = viewer_with(config, Box::new(MemoryStore::new()));
        v.navigate_to("h-one-a");
        assert_eq!(v.location().hash(), "#h-one-a");
        assert_eq!(v.location().history_len(), 0);
        assert!(!v.navigate_to("missing"));
    }

    #[test]
    fn narrow_layout_closes_the_panel_after_navigation() {
        let config = ViewerConfig {
            viewport_width: 800,
            ..ViewerConfig::default()
        };
        let mut v = viewer_with(config, Box::new(MemoryStore::new()));
        assert_eq!(v.chrome().body_classes(), vec!["toc-open"]);
        v.navigate_to("h-two");
        assert!(v.chrome().panel.collapsed);
        assert_eq!(v.chrome().body_classes(), vec!["toc-collapsed"]);
        v.toggle_outline_panel();
        assert!(!v.chrome().panel.collapsed);
    }

    #[test]
    fn resize_switches_panel_mode_after_the_burst() {
        let mut v = viewer();
        v.on_resize(700, 600);
        assert!(!v.chrome().panel.narrow);
        v.advance(v.config.resize_debounce_ms);
        assert!(v.chrome().panel.narrow);
        v.on_resize(1400, 600);
        v.advance(v.config.resize_debounce_ms);
        assert!(!v.chrome().panel.narrow);
        assert!(!v.chrome().panel.collapsed);
    }

    #[test]
    fn scroll_to_top_button_tracks_offset() {
        let mut v = viewer();
        v.on_scroll(400);
        assert!(v.chrome().scroll_top_visible);
        v.scroll_to_top();
        assert!(v.viewport().is_animating());
        v.settle();
        assert_eq!(v.viewport().scroll_y, 0);
        assert!(!v.chrome().scroll_top_visible);
    }

    // ---------------------------------------------------------------
    // Copy, preferences
    // ---------------------------------------------------------------

    #[test]
    fn copy_shows_feedback_then_restores_label() {
        let mut v = viewer();
        let button = v.copy_button_for("sec-one-a").unwrap();
        assert!(v.click(button));
        assert_eq!(v.document().text_content(button), COPIED_LABEL);
        let copied = v.take_events().into_iter().find_map(|e| match e {
            ViewEvent::Copied(text) => Some(text),
            _ => None,
        });
        let copied = copied.unwrap();
        assert!(copied.starts_with("Section 1A\nThe second lorem sits here."));
        assert!(!copied.contains(COPY_LABEL));

        v.advance(v.config.copy_feedback_ms);
        assert_eq!(v.document().text_content(button), COPY_LABEL);
    }

    #[test]
    fn failed_copy_shows_a_self_dismissing_banner() {
        let broken = ClipboardChain::new(Box::new(MemoryClipboard::broken()))
            .with_fallback(Box::new(MemoryClipboard::broken()));
        let mut v = viewer().with_clipboard(broken);
        let button = v.copy_button_for("sec-one-a").unwrap();
        v.click(button);
        assert_eq!(v.chrome().banner.as_deref(), Some(COPY_FAILED_MESSAGE));
        assert_eq!(v.document().text_content(button), COPY_LABEL);
        assert!(v.take_events().contains(&ViewEvent::BannerShown(COPY_FAILED_MESSAGE.to_string())));

        v.advance(v.config.error_banner_ms);
        assert!(v.chrome().banner.is_none());
        assert_eq!(v.take_events(), vec![ViewEvent::BannerDismissed]);
    }

    #[test]
    fn stored_preferences_apply_on_load() {
        let store = MemoryStore::new()
            .with(prefs::THEME_KEY, "dark")
            .with(prefs::FONT_SIZE_KEY, "30");
        let mut v = viewer_with(ViewerConfig::default(), Box::new(store));
        assert_eq!(v.preferences().font_size, 24);
        assert_eq!(v.chrome().body_classes(), vec!["dark-theme"]);
        assert_eq!(v.chrome().theme_button_label(), "Light Mode");
        let content = v.content().unwrap();
        assert_eq!(
            v.document().element(content).unwrap().get_attribute("style"),
            Some("font-size: 24px")
        );

        assert!(!v.increase_font());
        assert!(v.decrease_font());
        assert_eq!(
            v.document().element(content).unwrap().get_attribute("style"),
            Some("font-size: 23px")
        );
    }

    #[test]
    fn font_size_survives_content_reset() {
        let mut v = viewer();
        let before = top_of(&v, "h-two");
        v.increase_font();
        v.increase_font();
        assert!(top_of(&v, "h-two") > before);
        search(&mut v, "lorem");
        let content = v.content().unwrap();
        assert_eq!(
            v.document().element(content).unwrap().get_attribute("style"),
            Some("font-size: 18px")
        );
    }

    #[test]
    fn theme_toggle_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let store = FileStore::open(&path).unwrap();
        let mut v = viewer_with(ViewerConfig::default(), Box::new(store));
        v.toggle_theme();
        v.increase_font();
        assert_eq!(v.chrome().theme, Theme::Dark);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(prefs::THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(reopened.get(prefs::FONT_SIZE_KEY).as_deref(), Some("17"));
    }

    #[test]
    fn font_size_replaces_only_its_declaration() {
        assert_eq!(with_font_size(None, 16), "font-size: 16px");
        assert_eq!(
            with_font_size(Some("color: red; Font-Size: 12px;"), 18),
            "color: red; font-size: 18px"
        );
    }

    #[test]
    fn missing_content_disables_features() {
        let mut v = Viewer::from_html(
            "<div id=\"other\"><h2>Title</h2></div>",
            ViewerConfig::default(),
            Box::new(MemoryStore::new()),
        );
        v.set_search_term("title");
        v.perform_search();
        v.settle();
        assert!(v.content().is_none());
        assert!(v.headings().is_empty());
        assert!(v.search().is_empty());
        assert_eq!(v.content_html(), "");
        assert!(!v.navigate_to("nowhere"));
    }
}
