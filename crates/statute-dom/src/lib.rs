//! HTML tokenizer, parser, mutable DOM and serializer.
//!
//! The viewer treats the rendered content subtree as its single source of
//! truth; this crate provides that tree. [`parse_html`] turns markup into
//! an arena [`Document`], the mutation API on [`Document`] supports the
//! in-place edits the viewer makes (highlight spans, copy buttons, class
//! toggles), and [`serialize`] writes markup back out.

pub mod dom;
pub mod entities;
pub mod serialize;
pub mod tokenizer;
pub mod tree_builder;

pub use dom::{Attribute, Document, ElementData, Node, NodeId, NodeKind, TagName};
pub use serialize::{serialize, serialize_children};
pub use tree_builder::parse_html;

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn parser_never_panics(input in "\\PC{0,200}") {
            let doc = parse_html(&input);
            let _ = serialize(&doc, doc.root);
        }

        #[test]
        fn serialized_output_reparses_to_same_markup(input in "[a-z<>/ =\"&;]{0,80}") {
            let first = serialize(&parse_html(&input), 0);
            let second = serialize(&parse_html(&first), 0);
            prop_assert_eq!(first, second);
        }
    }
}
