//! Heading index and navigation outline.
//!
//! Content is organised as `.act-section` containers, each titled by an
//! `h2` and holding `.section` blocks titled by `h3`. Building the index
//! assigns every heading a stable id, mirrors the hierarchy into an
//! [`Outline`] of links, and lists the act containers as search scopes.

use statute_dom::{Document, ElementData, NodeId, TagName, serialize_children};

use crate::slug::{IdAllocator, generate_id};

pub const ACT_SECTION_CLASS: &str = "act-section";
pub const SECTION_CLASS: &str = "section";

pub const ACT_TITLE_CLASS: &str = "toc-act-title";
pub const TOGGLE_ICON_CLASS: &str = "toc-act-toggle-icon";
pub const SUB_LIST_CLASS: &str = "toc-sections";
pub const COLLAPSED_CLASS: &str = "collapsed";
pub const ACTIVE_LINK_CLASS: &str = "active-toc-link";

pub const ICON_COLLAPSED: &str = "\u{25B8}";
pub const ICON_EXPANDED: &str = "\u{25BE}";

/// Scope value meaning "the whole content".
pub const SCOPE_ALL: &str = "all";
pub const SCOPE_ALL_LABEL: &str = "All Acts & Regulations";

// -------------------------------------------------------------------
// Heading index
// -------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    /// Act title (`h2`).
    Section,
    /// Section title (`h3`) inside an act.
    Subsection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingEntry {
    pub node: NodeId,
    pub id: String,
    pub title: String,
    pub level: HeadingLevel,
    /// The `.act-section` container the heading belongs to.
    pub container: NodeId,
}

/// Headings in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingIndex {
    entries: Vec<HeadingEntry>,
}

impl HeadingIndex {
    pub fn entries(&self) -> &[HeadingEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, id: &str) -> Option<&HeadingEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}

// -------------------------------------------------------------------
// Outline
// -------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineLink {
    pub id: String,
    pub title: String,
    pub active: bool,
}

impl OutlineLink {
    fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            active: false,
        }
    }

    pub fn href(&self) -> String {
        format!("#{}", self.id)
    }
}

/// A top-level outline entry and its sub-links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineSection {
    pub link: OutlineLink,
    pub expanded: bool,
    pub children: Vec<OutlineLink>,
}

impl OutlineSection {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// The navigation outline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    sections: Vec<OutlineSection>,
}

impl Outline {
    pub fn sections(&self) -> &[OutlineSection] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Every link, top-level ones followed by their children.
    pub fn links(&self) -> impl Iterator<Item = &OutlineLink> {
        self.sections
            .iter()
            .flat_map(|s| std::iter::once(&s.link).chain(s.children.iter()))
    }

    /// Index of the top-level entry whose own link targets `id`.
    pub fn find_section(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.link.id == id)
    }

    /// Flip an entry's expansion. Entries without children never expand.
    /// Returns the new state.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let section = self.sections.get_mut(index)?;
        if !section.has_children() {
            return None;
        }
        section.expanded = !section.expanded;
        Some(section.expanded)
    }

    pub fn expand(&mut self, index: usize) {
        if let Some(section) = self.sections.get_mut(index)
            && section.has_children()
        {
            section.expanded = true;
        }
    }

    pub fn collapse_all(&mut self) {
        for section in &mut self.sections {
            section.expanded = false;
        }
    }

    /// Mark the link targeting `id` active and clear every other mark.
    /// Returns whether a link was found.
    pub fn set_active(&mut self, id: Option<&str>) -> bool {
        let mut found = false;
        for section in &mut self.sections {
            for link in std::iter::once(&mut section.link).chain(section.children.iter_mut()) {
                link.active = id == Some(link.id.as_str());
                found |= link.active;
            }
        }
        found
    }

    pub fn active(&self) -> Option<&OutlineLink> {
        self.links().find(|l| l.active)
    }

    /// Activate `id`, expand the entry that is or holds its link, and
    /// collapse every other entry.
    pub fn focus(&mut self, id: Option<&str>) {
        self.set_active(id);
        for section in &mut self.sections {
            let own = id == Some(section.link.id.as_str());
            let holds = section.children.iter().any(|c| id == Some(c.id.as_str()));
            section.expanded = (own || holds) && section.has_children();
        }
    }

    /// Outline as a detached list of `<li>` entries.
    pub fn render(&self) -> Document {
        let mut doc = Document::new();
        let root = doc.root;
        for section in &self.sections {
            let item = doc.create_element(ElementData::new(TagName::Li));
            doc.append_child(root, item);

            let mut title_class = ACT_TITLE_CLASS.to_string();
            if section.link.active {
                title_class.push(' ');
                title_class.push_str(ACTIVE_LINK_CLASS);
            }
            let anchor = doc.create_element(
                ElementData::new(TagName::A)
                    .with_attr("href", &section.link.href())
                    .with_attr("class", &title_class),
            );
            doc.append_child(item, anchor);

            let mut icon = ElementData::new(TagName::Span).with_attr("class", TOGGLE_ICON_CLASS);
            if !section.has_children() {
                icon = icon.with_attr("style", "visibility: hidden");
            }
            let icon = doc.create_element(icon);
            doc.append_child(anchor, icon);
            let glyph = doc.create_text(if section.expanded { ICON_EXPANDED } else { ICON_COLLAPSED });
            doc.append_child(icon, glyph);
            let title = doc.create_text(format!(" {}", section.link.title));
            doc.append_child(anchor, title);

            if !section.has_children() {
                continue;
            }
            let mut list_class = SUB_LIST_CLASS.to_string();
            if !section.expanded {
                list_class.push(' ');
                list_class.push_str(COLLAPSED_CLASS);
            }
            let list = doc.create_element(ElementData::new(TagName::Ul).with_attr("class", &list_class));
            doc.append_child(item, list);
            for child in &section.children {
                let li = doc.create_element(ElementData::new(TagName::Li));
                doc.append_child(list, li);
                let mut a = ElementData::new(TagName::A).with_attr("href", &child.href());
                if child.active {
                    a = a.with_attr("class", ACTIVE_LINK_CLASS);
                }
                let a = doc.create_element(a);
                doc.append_child(li, a);
                let text = doc.create_text(child.title.as_str());
                doc.append_child(a, text);
            }
        }
        doc
    }

    pub fn render_html(&self) -> String {
        let doc = self.render();
        serialize_children(&doc, doc.root)
    }
}

// -------------------------------------------------------------------
// Search scopes
// -------------------------------------------------------------------

/// One entry of the search scope selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeOption {
    pub value: String,
    pub label: String,
}

// -------------------------------------------------------------------
// Build
// -------------------------------------------------------------------

/// Result of indexing the content.
#[derive(Debug, Clone, Default)]
pub struct OutlineBuild {
    pub headings: HeadingIndex,
    pub outline: Outline,
    pub scope_options: Vec<ScopeOption>,
}

/// Collapse whitespace runs and trim.
pub fn normalize_title(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Index headings under `content`, assigning ids to those that lack one.
///
/// Act headings without an id get `act-{slug}`, section headings get
/// `{act id}-sec-{slug}`, and act containers without an id get
/// `act-filter-option-{slug}`. Generated ids never collide with ids
/// already in the document.
pub fn build_outline(doc: &mut Document, content: NodeId) -> OutlineBuild {
    let mut ids = IdAllocator::new();
    for node in doc.descendants(doc.root) {
        if let Some(id) = doc.element(node).and_then(|e| e.id()) {
            ids.reserve(id);
        }
    }

    let mut build = OutlineBuild::default();
    build.scope_options.push(ScopeOption {
        value: SCOPE_ALL.to_string(),
        label: SCOPE_ALL_LABEL.to_string(),
    });

    let acts = doc.find_all(content, |e| e.has_class(ACT_SECTION_CLASS));
    for act in acts {
        let Some(h2) = doc.find_first(act, |e| e.tag == TagName::H2) else {
            log::debug!("act section without a title heading skipped");
            continue;
        };
        let act_title = normalize_title(&doc.text_content(h2));
        let act_id = ensure_id(doc, h2, &mut ids, || generate_id(&act_title, "act"));

        let mut section = OutlineSection {
            link: OutlineLink::new(&act_id, &act_title),
            expanded: false,
            children: Vec::new(),
        };
        build.headings.entries.push(HeadingEntry {
            node: h2,
            id: act_id.clone(),
            title: act_title.clone(),
            level: HeadingLevel::Section,
            container: act,
        });

        let sub_prefix = format!("{act_id}-sec");
        for h3 in doc.find_all(act, |e| e.tag == TagName::H3) {
            let title = normalize_title(&doc.text_content(h3));
            let id = ensure_id(doc, h3, &mut ids, || generate_id(&title, &sub_prefix));
            section.children.push(OutlineLink::new(&id, &title));
            build.headings.entries.push(HeadingEntry {
                node: h3,
                id,
                title,
                level: HeadingLevel::Subsection,
                container: act,
            });
        }
        build.outline.sections.push(section);

        let scope_id = ensure_id(doc, act, &mut ids, || generate_id(&act_title, "act-filter-option"));
        build.scope_options.push(ScopeOption {
            value: scope_id,
            label: act_title,
        });
    }

    log::debug!(
        "indexed {} heading(s) in {} act(s)",
        build.headings.len(),
        build.outline.sections.len()
    );
    build
}

/// Existing id of `node`, or a freshly claimed one written back to it.
fn ensure_id(
    doc: &mut Document,
    node: NodeId,
    ids: &mut IdAllocator,
    generate: impl FnOnce() -> String,
) -> String {
    if let Some(existing) = doc.element(node).and_then(|e| e.id()) {
        return existing.to_string();
    }
    let id = ids.claim(generate());
    if let Some(e) = doc.element_mut(node) {
        e.set_attribute("id", &id);
    }
    id
}
