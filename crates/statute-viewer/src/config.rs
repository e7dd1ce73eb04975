//! Viewer configuration.
//!
//! Every tuning constant the viewer uses lives here so hosts can override
//! it from a TOML file. Missing keys fall back to [`ViewerConfig::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use statute_types::Result;

/// Font-size preference bounds, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontBounds {
    pub min: u32,
    pub max: u32,
    pub default: u32,
    pub step: u32,
}

impl Default for FontBounds {
    fn default() -> Self {
        Self {
            min: 10,
            max: 24,
            default: 16,
            step: 1,
        }
    }
}

impl FontBounds {
    /// Clamp a stored value into range.
    pub fn clamp(&self, size: u32) -> u32 {
        size.clamp(self.min, self.max)
    }
}

/// Metrics for the block-flow geometry model.
///
/// Lengths scale with the active font size, so changing the font
/// preference moves every heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// Average glyph advance as a multiple of the font size.
    pub glyph_width: f32,
    /// Vertical gap after every block, in pixels.
    pub block_gap: i32,
    /// Line height multiplier applied to `h1`..`h6`.
    pub heading_scale: f32,
    /// Horizontal space the content column loses to the navigation panel
    /// on wide layouts.
    pub sidebar_width: u32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            line_height: 1.5,
            glyph_width: 0.5,
            block_gap: 8,
            heading_scale: 1.6,
            sidebar_width: 300,
        }
    }
}

/// Viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Id of the content container whose markup is the source of truth.
    pub content_id: String,
    /// Ids of page chrome regions whose text is never highlighted.
    pub control_region_ids: Vec<String>,
    /// Distance added to the scroll offset when picking the current heading.
    pub scroll_spy_offset: i32,
    pub scroll_debounce_ms: u64,
    pub resize_debounce_ms: u64,
    /// How long a navigation click pins the current heading.
    pub override_ms: u64,
    /// Height of the fixed header subtracted from navigation targets.
    pub header_height: i32,
    /// Extra gap left above a navigation target.
    pub nav_buffer: i32,
    /// Viewport widths at or below this use the overlay navigation panel.
    pub narrow_breakpoint: u32,
    /// Scroll offset past which the scroll-to-top button shows.
    pub scroll_top_threshold: i32,
    pub copy_feedback_ms: u64,
    pub error_banner_ms: u64,
    pub fonts: FontBounds,
    pub viewport_width: u32,
    pub viewport_height: i32,
    pub smooth_scroll: bool,
    /// Whether the host supports pushing history entries. When false,
    /// navigation assigns the fragment directly.
    pub push_state: bool,
    pub layout: LayoutMetrics,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            content_id: "content".to_string(),
            control_region_ids: vec!["top-controls-wrapper".to_string(), "toc-sidebar".to_string()],
            scroll_spy_offset: 180,
            scroll_debounce_ms: 100,
            resize_debounce_ms: 150,
            override_ms: 1200,
            header_height: 0,
            nav_buffer: 20,
            narrow_breakpoint: 900,
            scroll_top_threshold: 300,
            copy_feedback_ms: 1500,
            error_banner_ms: 3000,
            fonts: FontBounds::default(),
            viewport_width: 1280,
            viewport_height: 800,
            smooth_scroll: true,
            push_state: true,
            layout: LayoutMetrics::default(),
        }
    }
}

impl ViewerConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded viewer config from {}", path.display());
        Ok(config)
    }

    /// Width available to the content column at the given viewport width.
    pub fn content_width(&self, viewport_width: u32) -> u32 {
        if viewport_width > self.narrow_breakpoint {
            viewport_width.saturating_sub(self.layout.sidebar_width)
        } else {
            viewport_width
        }
        .max(1)
    }
}
