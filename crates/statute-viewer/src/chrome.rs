//! Page chrome state: navigation panel, search box, status lines, banner.
//!
//! None of this lives in the content tree, so resetting the content never
//! touches it.

use crate::cursor::SearchStatus;
use crate::prefs::Theme;

pub const PANEL_OPEN_ICON: &str = "\u{00D7}";
pub const PANEL_CLOSED_ICON: &str = "\u{2630}";

pub const PLACEHOLDER_IDLE: &str = "Search... (Press /)";
pub const PLACEHOLDER_FOCUSED: &str = "Search...";

// -------------------------------------------------------------------
// Navigation panel
// -------------------------------------------------------------------

/// The collapsible navigation panel holding the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavPanel {
    pub collapsed: bool,
    /// At or below the responsive breakpoint.
    pub narrow: bool,
}

impl NavPanel {
    pub fn toggle(&mut self) {
        self.collapsed = !self.collapsed;
    }

    /// Re-evaluate the layout for a new viewport width. Wide layouts
    /// always show the panel.
    pub fn apply_width(&mut self, width: u32, breakpoint: u32) {
        self.narrow = width <= breakpoint;
        if !self.narrow {
            self.collapsed = false;
        }
    }

    /// Link clicks on narrow layouts close an open panel.
    pub fn close_after_navigation(&mut self) -> bool {
        if self.narrow && !self.collapsed {
            self.collapsed = true;
            return true;
        }
        false
    }

    pub fn button_label(&self) -> &'static str {
        if self.collapsed {
            PANEL_CLOSED_ICON
        } else {
            PANEL_OPEN_ICON
        }
    }

    /// Body class describing the panel on narrow layouts.
    pub fn body_class(&self) -> Option<&'static str> {
        match (self.narrow, self.collapsed) {
            (false, _) => None,
            (true, true) => Some("toc-collapsed"),
            (true, false) => Some("toc-open"),
        }
    }
}

// -------------------------------------------------------------------
// Search box
// -------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchBox {
    pub value: String,
    pub focused: bool,
}

impl SearchBox {
    pub fn term(&self) -> &str {
        self.value.trim()
    }

    pub fn placeholder(&self) -> &'static str {
        if self.focused || !self.value.is_empty() {
            PLACEHOLDER_FOCUSED
        } else {
            PLACEHOLDER_IDLE
        }
    }
}

// -------------------------------------------------------------------
// Chrome
// -------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Chrome {
    pub panel: NavPanel,
    pub search_box: SearchBox,
    pub status: SearchStatus,
    /// `(In: {title})` for the current match, or empty.
    pub act_status: String,
    pub scroll_top_visible: bool,
    pub banner: Option<String>,
    pub theme: Theme,
}

impl Chrome {
    pub fn body_classes(&self) -> Vec<&'static str> {
        self.theme
            .body_class()
            .into_iter()
            .chain(self.panel.body_class())
            .collect()
    }

    pub fn theme_button_label(&self) -> &'static str {
        self.theme.button_label()
    }

    pub fn clear_statuses(&mut self) {
        self.status = SearchStatus::default();
        self.act_status.clear();
    }
}

/// Status-line text for the section containing the current match.
pub fn act_status_line(title: &str) -> String {
    format!("(In: {title})")
}
