//! Click bindings for controls inserted into the content.
//!
//! Each control node maps to exactly one action. Attaching to a node that
//! already has one replaces it, and a content rebuild clears the table, so
//! repeated rebuilds never stack duplicate handlers.

use std::collections::BTreeMap;

use statute_dom::NodeId;

/// What a bound control does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Fold or unfold every `.section` inside `wrapper`.
    ToggleSections { wrapper: NodeId },
    /// Copy the text of `section` to the clipboard.
    CopySection { section: NodeId },
}

#[derive(Debug, Clone, Default)]
pub struct Bindings {
    actions: BTreeMap<NodeId, Action>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `action` to `node`, returning the action it replaced.
    pub fn attach(&mut self, node: NodeId, action: Action) -> Option<Action> {
        self.actions.insert(node, action)
    }

    pub fn detach(&mut self, node: NodeId) -> Option<Action> {
        self.actions.remove(&node)
    }

    pub fn get(&self, node: NodeId) -> Option<Action> {
        self.actions.get(&node).copied()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Bound nodes whose action satisfies `pred`, in node order.
    pub fn nodes_where(&self, pred: impl Fn(&Action) -> bool) -> Vec<NodeId> {
        self.actions
            .iter()
            .filter(|(_, a)| pred(a))
            .map(|(&n, _)| n)
            .collect()
    }
}
