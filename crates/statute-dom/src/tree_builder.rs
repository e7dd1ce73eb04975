//! HTML tree builder.
//!
//! Consumes a token stream and constructs an arena-based DOM. Unlike a
//! full WHATWG parser it never synthesises `<html>`/`<head>`/`<body>`, so
//! a content fragment parses to exactly the nodes it spells out. That
//! keeps serialization of the pristine snapshot faithful to the source.
//! It still implements the implicit end tags that real statute markup
//! leans on (`<p>` closed by a block, `<li>` closed by a sibling `<li>`).

use crate::dom::{Attribute, Document, ElementData, NodeId, NodeKind, TagName};
use crate::tokenizer::{StartTagToken, Token, Tokenizer};

/// Builds a DOM tree from a token stream.
pub struct TreeBuilder {
    doc: Document,
    /// Stack of open element node IDs. The document root is implicit.
    open_elements: Vec<NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            doc: Document::new(),
            open_elements: Vec::new(),
        }
    }

    /// Build a DOM tree from a token stream.
    pub fn build(tokens: Vec<Token>) -> Document {
        let mut builder = TreeBuilder::new();
        for token in tokens {
            builder.process_token(token);
        }
        builder.doc
    }

    fn current(&self) -> NodeId {
        self.open_elements.last().copied().unwrap_or(self.doc.root)
    }

    fn current_tag(&self) -> Option<&TagName> {
        let id = *self.open_elements.last()?;
        self.doc.element(id).map(|e| &e.tag)
    }

    fn process_token(&mut self, token: Token) {
        match token {
            Token::Doctype(name) => {
                let id = self.doc.add_node(NodeKind::Doctype(name));
                self.doc.append_child(self.doc.root, id);
            },
            Token::Comment(text) => {
                let id = self.doc.add_node(NodeKind::Comment(text));
                self.doc.append_child(self.current(), id);
            },
            Token::Character(text) => self.insert_text(text),
            Token::StartTag(tag) => self.insert_element(tag),
            Token::EndTag(tag) => self.close_element(&TagName::from_str(&tag.name)),
            Token::Eof => self.open_elements.clear(),
        }
    }

    fn insert_text(&mut self, text: String) {
        let parent = self.current();
        // Merge with a preceding text sibling so splits never come from
        // the parser.
        if let Some(&last) = self.doc.get(parent).children.last()
            && let NodeKind::Text(existing) = &mut self.doc.get_mut(last).kind
        {
            existing.push_str(&text);
            return;
        }
        let id = self.doc.create_text(text);
        self.doc.append_child(parent, id);
    }

    fn insert_element(&mut self, token: StartTagToken) {
        let tag = TagName::from_str(&token.name);
        self.apply_implicit_end_tags(&tag);

        let mut data = ElementData::new(tag.clone());
        data.attributes = token
            .attributes
            .into_iter()
            .map(|(name, value)| Attribute { name, value })
            .collect();
        let id = self.doc.create_element(data);
        self.doc.append_child(self.current(), id);

        if !tag.is_void() && !token.self_closing {
            self.open_elements.push(id);
        }
    }

    /// Close elements whose end tag is optional when `incoming` opens.
    fn apply_implicit_end_tags(&mut self, incoming: &TagName) {
        match incoming {
            TagName::Li => self.close_if_open_in_scope(&TagName::Li, &[TagName::Ul, TagName::Ol]),
            TagName::Dt | TagName::Dd => {
                self.close_if_open_in_scope(&TagName::Dt, &[TagName::Dl]);
                self.close_if_open_in_scope(&TagName::Dd, &[TagName::Dl]);
            },
            TagName::Option => {
                if self.current_tag() == Some(&TagName::Option) {
                    self.open_elements.pop();
                }
            },
            t if t.is_block_level() => {
                if self.current_tag() == Some(&TagName::P) {
                    self.open_elements.pop();
                }
            },
            _ => {},
        }
    }

    /// Pop up to and including `target` if it is open above the nearest
    /// `boundary` element.
    fn close_if_open_in_scope(&mut self, target: &TagName, boundary: &[TagName]) {
        for i in (0..self.open_elements.len()).rev() {
            let Some(data) = self.doc.element(self.open_elements[i]) else {
                continue;
            };
            if data.tag == *target {
                self.open_elements.truncate(i);
                return;
            }
            if boundary.contains(&data.tag) {
                return;
            }
        }
    }

    fn close_element(&mut self, tag: &TagName) {
        let found = self
            .open_elements
            .iter()
            .rposition(|&id| self.doc.element(id).is_some_and(|e| e.tag == *tag));
        match found {
            Some(i) => self.open_elements.truncate(i),
            None => log::trace!("ignoring stray </{}>", tag.as_str()),
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse markup (a full page or a fragment) into a [`Document`].
pub fn parse_html(input: &str) -> Document {
    let tokens = Tokenizer::new(input).tokenize();
    TreeBuilder::build(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_tags(doc: &Document, id: NodeId) -> Vec<String> {
        doc.get(id)
            .children
            .iter()
            .filter_map(|&c| doc.element(c).map(|e| e.tag.as_str().to_string()))
            .collect()
    }

    #[test]
    fn fragment_has_no_synthesized_wrappers() {
        let doc = parse_html("<div id=\"content\"><h2>Act One</h2></div>");
        assert_eq!(child_tags(&doc, doc.root), vec!["div"]);
        let div = doc.get_element_by_id("content").unwrap();
        assert_eq!(doc.text_content(div), "Act One");
    }

    #[test]
    fn paragraph_closed_by_block() {
        let doc = parse_html("<div id=\"c\"><p>one<div>two</div></div>");
        let c = doc.get_element_by_id("c").unwrap();
        assert_eq!(child_tags(&doc, c), vec!["p", "div"]);
    }

    #[test]
    fn list_items_close_siblings() {
        let doc = parse_html("<ul id=\"l\"><li>a<li>b<li>c</ul>");
        let l = doc.get_element_by_id("l").unwrap();
        assert_eq!(child_tags(&doc, l), vec!["li", "li", "li"]);
    }

    #[test]
    fn void_elements_do_not_nest() {
        let doc = parse_html("<p id=\"p\">a<br>b<img src=\"x\">c</p>");
        let p = doc.get_element_by_id("p").unwrap();
        assert_eq!(doc.get(p).children.len(), 5);
        assert_eq!(doc.text_content(p), "abc");
    }

    #[test]
    fn stray_end_tag_is_ignored() {
        let doc = parse_html("<div id=\"d\">x</span>y</div>");
        let d = doc.get_element_by_id("d").unwrap();
        assert_eq!(doc.text_content(d), "xy");
        assert_eq!(doc.get(d).children.len(), 1);
    }

    #[test]
    fn unclosed_elements_are_tolerated() {
        let doc = parse_html("<div id=\"a\"><section><h3>Sec");
        let a = doc.get_element_by_id("a").unwrap();
        assert_eq!(doc.text_content(a), "Sec");
    }

    #[test]
    fn script_text_is_kept_raw() {
        let doc = parse_html("<script>a<b</script><p>x</p>");
        let script = doc.find_first(doc.root, |e| e.tag == TagName::Script).unwrap();
        assert_eq!(doc.text_content(script), "a<b");
    }
}
