//! HTML serialization (outer/inner HTML).

use crate::dom::{Document, NodeId, NodeKind};

/// Serialize a node and its subtree (outer HTML).
pub fn serialize(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

/// Serialize only the children of a node (inner HTML).
pub fn serialize_children(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    for &child in &doc.get(id).children {
        write_node(doc, child, &mut out);
    }
    out
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let node = doc.get(id);
    match &node.kind {
        NodeKind::Document => {
            for &child in &node.children {
                write_node(doc, child, out);
            }
        },
        NodeKind::Doctype(name) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        },
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        },
        NodeKind::Text(text) => {
            let raw = node
                .parent
                .and_then(|p| doc.element(p))
                .is_some_and(|e| e.tag.is_raw_text());
            if raw {
                out.push_str(text);
            } else {
                escape_text(text, out);
            }
        },
        NodeKind::Element(data) => {
            out.push('<');
            out.push_str(data.tag.as_str());
            for attr in &data.attributes {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                escape_attr(&attr.value, out);
                out.push('"');
            }
            out.push('>');
            if data.tag.is_void() {
                return;
            }
            for &child in &node.children {
                write_node(doc, child, out);
            }
            out.push_str("</");
            out.push_str(data.tag.as_str());
            out.push('>');
        },
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_builder::parse_html;

    #[test]
    fn canonical_markup_round_trips() {
        let src = "<div id=\"content\" class=\"a b\"><h2>Act &amp; Rules</h2><p>x<br>y</p><!-- c --></div>";
        let doc = parse_html(src);
        assert_eq!(serialize(&doc, doc.root), src);
    }

    #[test]
    fn inner_html_excludes_wrapper() {
        let doc = parse_html("<div id=\"c\"><p>a</p></div>");
        let c = doc.get_element_by_id("c").unwrap();
        assert_eq!(serialize_children(&doc, c), "<p>a</p>");
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let doc = parse_html("<a title='say \"hi\"'>1 &lt; 2</a>");
        assert_eq!(
            serialize(&doc, doc.root),
            "<a title=\"say &quot;hi&quot;\">1 &lt; 2</a>"
        );
    }

    #[test]
    fn raw_text_is_not_escaped() {
        let src = "<style>a > b { color: red }</style>";
        let doc = parse_html(src);
        assert_eq!(serialize(&doc, doc.root), src);
    }
}
