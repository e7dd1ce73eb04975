//! Location fragment and in-page history.

/// How a fragment change was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentUpdate {
    /// A history entry was pushed.
    Pushed,
    /// The fragment was assigned directly.
    Assigned,
}

/// The page location as far as in-page navigation is concerned.
#[derive(Debug, Clone)]
pub struct Location {
    fragment: Option<String>,
    back_stack: Vec<Option<String>>,
    push_supported: bool,
}

impl Location {
    pub fn new(push_supported: bool) -> Self {
        Self {
            fragment: None,
            back_stack: Vec::new(),
            push_supported,
        }
    }

    /// Current fragment, without the `#`.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// `#id`, or empty.
    pub fn hash(&self) -> String {
        self.fragment.as_ref().map(|f| format!("#{f}")).unwrap_or_default()
    }

    /// Point the location at `#id`.
    pub fn navigate(&mut self, id: &str) -> FragmentUpdate {
        let previous = self.fragment.replace(id.to_string());
        if self.push_supported {
            self.back_stack.push(previous);
            FragmentUpdate::Pushed
        } else {
            FragmentUpdate::Assigned
        }
    }

    /// Pop one pushed entry. Returns the restored fragment.
    pub fn back(&mut self) -> Option<Option<String>> {
        let previous = self.back_stack.pop()?;
        self.fragment = previous.clone();
        Some(previous)
    }

    pub fn history_len(&self) -> usize {
        self.back_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_records_history() {
        let mut loc = Location::new(true);
        assert_eq!(loc.navigate("act-one"), FragmentUpdate::Pushed);
        assert_eq!(loc.navigate("act-two"), FragmentUpdate::Pushed);
        assert_eq!(loc.hash(), "#act-two");
        assert_eq!(loc.history_len(), 2);
        assert_eq!(loc.back(), Some(Some("act-one".to_string())));
        assert_eq!(loc.back(), Some(None));
        assert_eq!(loc.back(), None);
        assert_eq!(loc.fragment(), None);
    }

    #[test]
    fn without_push_the_fragment_is_assigned() {
        let mut loc = Location::new(false);
        assert_eq!(loc.navigate("act-one"), FragmentUpdate::Assigned);
        assert_eq!(loc.fragment(), Some("act-one"));
        assert_eq!(loc.history_len(), 0);
    }
}
