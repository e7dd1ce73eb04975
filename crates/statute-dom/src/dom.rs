//! Arena-based DOM tree with an in-place mutation API.
//!
//! Nodes live in a flat `Vec` arena and are linked by index. Mutations
//! detach nodes rather than freeing them, so a [`NodeId`] stays valid for
//! the lifetime of the arena; detached nodes are simply unreachable from
//! the root. Cloning a [`Document`] preserves every id, which is what makes
//! snapshot-and-restore of rendered content cheap.

/// Index into the [`Document`]'s node arena.
pub type NodeId = usize;

// ------------------------------------------------------------------
// Node types
// ------------------------------------------------------------------

/// An HTML document or fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub nodes: Vec<Node>,
    pub root: NodeId,
}

/// A single node in the DOM tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// The kind of DOM node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,
    Doctype(String),
    Element(ElementData),
    Text(String),
    Comment(String),
}

/// Data associated with an Element node.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag: TagName,
    pub attributes: Vec<Attribute>,
}

/// An element attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

// ------------------------------------------------------------------
// TagName
// ------------------------------------------------------------------

/// Tag names the viewer dispatches on.
///
/// Everything else is kept verbatim as `Unknown(String)` so markup
/// survives a serialize round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagName {
    Html,
    Head,
    Body,
    Title,
    Meta,
    Link,
    Style,
    Script,
    Div,
    Span,
    P,
    A,
    Br,
    Hr,
    Img,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Ul,
    Ol,
    Li,
    Dl,
    Dt,
    Dd,
    Table,
    Tr,
    Th,
    Td,
    Form,
    Input,
    Button,
    Select,
    Option,
    Textarea,
    Label,
    Pre,
    Blockquote,
    Em,
    Strong,
    B,
    I,
    U,
    Mark,
    Nav,
    Header,
    Footer,
    Main,
    Section,
    Article,
    Aside,
    Unknown(String),
}

impl TagName {
    /// Parse a tag name, case-insensitively.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "html" => Self::Html,
            "head" => Self::Head,
            "body" => Self::Body,
            "title" => Self::Title,
            "meta" => Self::Meta,
            "link" => Self::Link,
            "style" => Self::Style,
            "script" => Self::Script,
            "div" => Self::Div,
            "span" => Self::Span,
            "p" => Self::P,
            "a" => Self::A,
            "br" => Self::Br,
            "hr" => Self::Hr,
            "img" => Self::Img,
            "h1" => Self::H1,
            "h2" => Self::H2,
            "h3" => Self::H3,
            "h4" => Self::H4,
            "h5" => Self::H5,
            "h6" => Self::H6,
            "ul" => Self::Ul,
            "ol" => Self::Ol,
            "li" => Self::Li,
            "dl" => Self::Dl,
            "dt" => Self::Dt,
            "dd" => Self::Dd,
            "table" => Self::Table,
            "tr" => Self::Tr,
            "th" => Self::Th,
            "td" => Self::Td,
            "form" => Self::Form,
            "input" => Self::Input,
            "button" => Self::Button,
            "select" => Self::Select,
            "option" => Self::Option,
            "textarea" => Self::Textarea,
            "label" => Self::Label,
            "pre" => Self::Pre,
            "blockquote" => Self::Blockquote,
            "em" => Self::Em,
            "strong" => Self::Strong,
            "b" => Self::B,
            "i" => Self::I,
            "u" => Self::U,
            "mark" => Self::Mark,
            "nav" => Self::Nav,
            "header" => Self::Header,
            "footer" => Self::Footer,
            "main" => Self::Main,
            "section" => Self::Section,
            "article" => Self::Article,
            "aside" => Self::Aside,
            _ => Self::Unknown(lower),
        }
    }

    /// Lowercase tag name as written in markup.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Html => "html",
            Self::Head => "head",
            Self::Body => "body",
            Self::Title => "title",
            Self::Meta => "meta",
            Self::Link => "link",
            Self::Style => "style",
            Self::Script => "script",
            Self::Div => "div",
            Self::Span => "span",
            Self::P => "p",
            Self::A => "a",
            Self::Br => "br",
            Self::Hr => "hr",
            Self::Img => "img",
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
            Self::Ul => "ul",
            Self::Ol => "ol",
            Self::Li => "li",
            Self::Dl => "dl",
            Self::Dt => "dt",
            Self::Dd => "dd",
            Self::Table => "table",
            Self::Tr => "tr",
            Self::Th => "th",
            Self::Td => "td",
            Self::Form => "form",
            Self::Input => "input",
            Self::Button => "button",
            Self::Select => "select",
            Self::Option => "option",
            Self::Textarea => "textarea",
            Self::Label => "label",
            Self::Pre => "pre",
            Self::Blockquote => "blockquote",
            Self::Em => "em",
            Self::Strong => "strong",
            Self::B => "b",
            Self::I => "i",
            Self::U => "u",
            Self::Mark => "mark",
            Self::Nav => "nav",
            Self::Header => "header",
            Self::Footer => "footer",
            Self::Main => "main",
            Self::Section => "section",
            Self::Article => "article",
            Self::Aside => "aside",
            Self::Unknown(s) => s.as_str(),
        }
    }

    /// Void elements never have children or an end tag.
    pub fn is_void(&self) -> bool {
        matches!(
            self,
            Self::Br | Self::Hr | Self::Img | Self::Input | Self::Meta | Self::Link
        ) || matches!(self, Self::Unknown(s) if matches!(s.as_str(), "col" | "source" | "wbr" | "area" | "base" | "embed" | "track"))
    }

    /// Block-level by default (starts a new line box).
    pub fn is_block_level(&self) -> bool {
        matches!(
            self,
            Self::Html
                | Self::Body
                | Self::Div
                | Self::P
                | Self::Hr
                | Self::H1
                | Self::H2
                | Self::H3
                | Self::H4
                | Self::H5
                | Self::H6
                | Self::Ul
                | Self::Ol
                | Self::Li
                | Self::Dl
                | Self::Dt
                | Self::Dd
                | Self::Table
                | Self::Tr
                | Self::Form
                | Self::Pre
                | Self::Blockquote
                | Self::Nav
                | Self::Header
                | Self::Footer
                | Self::Main
                | Self::Section
                | Self::Article
                | Self::Aside
        )
    }

    /// `h1`..`h6`.
    pub fn is_heading(&self) -> bool {
        self.heading_level().is_some()
    }

    /// Numeric heading level for `h1`..`h6`.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            Self::H1 => Some(1),
            Self::H2 => Some(2),
            Self::H3 => Some(3),
            Self::H4 => Some(4),
            Self::H5 => Some(5),
            Self::H6 => Some(6),
            _ => None,
        }
    }

    /// Contents are raw text (no markup, no character references).
    pub fn is_raw_text(&self) -> bool {
        matches!(self, Self::Script | Self::Style)
    }

    /// Form controls and buttons.
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            Self::Button | Self::Input | Self::Textarea | Self::Select
        )
    }
}

// ------------------------------------------------------------------
// ElementData
// ------------------------------------------------------------------

impl ElementData {
    /// Create a new `ElementData` with the given tag and no attributes.
    pub fn new(tag: TagName) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Get an attribute value by name.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists
    /// so attribute order is stable.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name == name) {
            attr.value = value.to_string();
        } else {
            self.attributes.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }

    /// Remove an attribute. Returns `true` if it was present.
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|a| a.name != name);
        self.attributes.len() != before
    }

    /// Check if this element has a given CSS class.
    pub fn has_class(&self, class: &str) -> bool {
        self.get_attribute("class")
            .map(|v| v.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Add a class token if not already present.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let value = match self.get_attribute("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attribute("class", &value);
    }

    /// Remove a class token. The attribute is kept (possibly empty) so
    /// attribute order does not shift.
    pub fn remove_class(&mut self, class: &str) {
        let Some(existing) = self.get_attribute("class") else {
            return;
        };
        if !existing.split_ascii_whitespace().any(|c| c == class) {
            return;
        }
        let value = existing
            .split_ascii_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute("class", &value);
    }

    /// Toggle a class. With `force` set, adds on `true` and removes on
    /// `false`. Returns whether the class is present afterwards.
    pub fn toggle_class(&mut self, class: &str, force: Option<bool>) -> bool {
        let want = force.unwrap_or(!self.has_class(class));
        if want {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
        want
    }

    /// Get the `id` attribute if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id").filter(|v| !v.is_empty())
    }

    /// Get the `href` attribute if present.
    pub fn href(&self) -> Option<&str> {
        self.get_attribute("href")
    }
}

// ------------------------------------------------------------------
// Document: construction and mutation
// ------------------------------------------------------------------

impl Document {
    /// Create an empty document with a synthetic `Document` root node.
    pub fn new() -> Self {
        let root_node = Node {
            kind: NodeKind::Document,
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root_node],
            root: 0,
        }
    }

    /// Add a new detached node to the arena and return its [`NodeId`].
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, data: ElementData) -> NodeId {
        self.add_node(NodeKind::Element(data))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.add_node(NodeKind::Text(text.into()))
    }

    /// Number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root node exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append `child_id` as the last child of `parent_id`, detaching it
    /// from any previous parent first.
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        self.detach(child_id);
        self.nodes[parent_id].children.push(child_id);
        self.nodes[child_id].parent = Some(parent_id);
    }

    /// Insert `new_id` immediately before `reference` under the same
    /// parent. No-op when `reference` is detached.
    pub fn insert_before(&mut self, reference: NodeId, new_id: NodeId) {
        self.detach(new_id);
        let Some(parent) = self.nodes[reference].parent else {
            return;
        };
        let pos = self.child_position(parent, reference);
        self.nodes[parent].children.insert(pos, new_id);
        self.nodes[new_id].parent = Some(parent);
    }

    /// Insert `new_id` immediately after `reference` under the same parent.
    pub fn insert_after(&mut self, reference: NodeId, new_id: NodeId) {
        self.detach(new_id);
        let Some(parent) = self.nodes[reference].parent else {
            return;
        };
        let pos = self.child_position(parent, reference);
        self.nodes[parent].children.insert(pos + 1, new_id);
        self.nodes[new_id].parent = Some(parent);
    }

    /// Detach `id` from its parent. The node and its subtree stay in the
    /// arena.
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
    }

    /// Replace `old` with the `replacements` sequence, in order.
    ///
    /// Returns `false` (and changes nothing) when `old` has no parent.
    pub fn replace_with(&mut self, old: NodeId, replacements: &[NodeId]) -> bool {
        let Some(parent) = self.nodes[old].parent else {
            return false;
        };
        for &r in replacements {
            self.detach(r);
        }
        let pos = self.child_position(parent, old);
        self.nodes[parent]
            .children
            .splice(pos..=pos, replacements.iter().copied());
        for &r in replacements {
            self.nodes[r].parent = Some(parent);
        }
        self.nodes[old].parent = None;
        true
    }

    /// Detach every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id].children);
        for child in children {
            self.nodes[child].parent = None;
        }
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|&c| c != id);
        }
    }

    fn child_position(&self, parent: NodeId, child: NodeId) -> usize {
        self.nodes[parent]
            .children
            .iter()
            .position(|&c| c == child)
            .unwrap_or(self.nodes[parent].children.len())
    }

    // ------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------

    /// Get a reference to a node by ID.
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Get a mutable reference to a node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Get the [`ElementData`] for a node, if it is an `Element`.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.nodes.get(id).map(|n| &n.kind) {
            Some(NodeKind::Element(data)) => Some(data),
            _ => None,
        }
    }

    /// Mutable [`ElementData`] for a node, if it is an `Element`.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.nodes.get_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Element(data)) => Some(data),
            _ => None,
        }
    }

    /// Text of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.nodes.get(id).map(|n| &n.kind) {
            Some(NodeKind::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Does element `id` carry `class`?
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    /// Is element `id` of the given tag?
    pub fn is_tag(&self, id: NodeId, tag: &TagName) -> bool {
        self.element(id).is_some_and(|e| e.tag == *tag)
    }

    /// Set the text of a text node, or replace the children of an element
    /// with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if let NodeKind::Text(s) = &mut self.nodes[id].kind {
            *s = text.to_string();
            return;
        }
        self.clear_children(id);
        if !text.is_empty() {
            let t = self.create_text(text);
            self.append_child(id, t);
        }
    }

    // ------------------------------------------------------------------
    // Tree queries
    // ------------------------------------------------------------------

    /// Get the concatenated text content of a node and all its
    /// descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id].kind {
            NodeKind::Text(s) => out.push_str(s),
            NodeKind::Comment(_) | NodeKind::Doctype(_) => {},
            _ => {
                for &child in &self.nodes[id].children {
                    self.collect_text(child, out);
                }
            },
        }
    }

    /// `true` when `node` is `ancestor` or lies beneath it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// `true` when the node is reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id < self.nodes.len() && self.contains(self.root, id)
    }

    /// Nearest inclusive ancestor element satisfying `pred`.
    pub fn closest<F>(&self, id: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(NodeId, &ElementData) -> bool,
    {
        let mut cur = Some(id);
        while let Some(node) = cur {
            if let Some(data) = self.element(node)
                && pred(node, data)
            {
                return Some(node);
            }
            cur = self.nodes.get(node).and_then(|n| n.parent);
        }
        None
    }

    /// All descendants of `id` (excluding `id`) in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.nodes[node].children.iter().rev().copied());
        }
        out
    }

    /// Descendant elements of `id` satisfying `pred`, in document order.
    pub fn find_all<F>(&self, id: NodeId, pred: F) -> Vec<NodeId>
    where
        F: Fn(&ElementData) -> bool,
    {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.element(n).is_some_and(&pred))
            .collect()
    }

    /// First descendant element of `id` satisfying `pred`.
    pub fn find_first<F>(&self, id: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&ElementData) -> bool,
    {
        self.descendants(id)
            .into_iter()
            .find(|&n| self.element(n).is_some_and(&pred))
    }

    /// Find the first attached element whose `id` attribute matches.
    pub fn get_element_by_id(&self, target: &str) -> Option<NodeId> {
        if target.is_empty() {
            return None;
        }
        self.find_first(self.root, |e| e.id() == Some(target))
    }

    /// Find the `<body>` element.
    pub fn body(&self) -> Option<NodeId> {
        self.find_first(self.root, |e| e.tag == TagName::Body)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
