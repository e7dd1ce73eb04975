//! Viewport and scroll offset management.

/// Milliseconds per animation frame.
pub const FRAME_MS: u64 = 16;

/// Fraction of the remaining distance covered per animation frame.
const EASE: f32 = 0.25;

/// How a programmatic scroll reaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// Scroll state for the document viewport.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Current vertical scroll offset in pixels.
    pub scroll_y: i32,
    /// Total content height (from layout).
    pub content_height: i32,
    /// Visible viewport height.
    pub viewport_height: i32,
    /// Viewport width, used for the responsive breakpoint.
    pub width: u32,
    /// Destination of an in-flight smooth scroll.
    target: Option<i32>,
    /// Whether smooth scrolling is enabled at all.
    smooth: bool,
}

impl Viewport {
    pub fn new(width: u32, viewport_height: i32, smooth: bool) -> Self {
        Self {
            scroll_y: 0,
            content_height: 0,
            viewport_height,
            width,
            target: None,
            smooth,
        }
    }

    /// Scroll to an absolute position.
    ///
    /// Smooth requests degrade to instant ones when smooth scrolling is
    /// disabled.
    pub fn scroll_to(&mut self, y: i32, behavior: ScrollBehavior) {
        let y = self.clamped(y);
        if behavior == ScrollBehavior::Smooth && self.smooth && y != self.scroll_y {
            self.target = Some(y);
        } else {
            self.target = None;
            self.scroll_y = y;
        }
    }

    /// Scroll so that a box of the given top and height sits in the
    /// middle of the viewport.
    pub fn center_on(&mut self, top: i32, height: i32, behavior: ScrollBehavior) {
        let center = top + height / 2;
        self.scroll_to(center - self.viewport_height / 2, behavior);
    }

    /// Scroll to top of document.
    pub fn scroll_to_top(&mut self, behavior: ScrollBehavior) {
        self.scroll_to(0, behavior);
    }

    /// Update content height (after layout).
    pub fn set_content_height(&mut self, height: i32) {
        self.content_height = height;
        self.clamp();
    }

    /// Update the viewport size (after a resize).
    pub fn set_size(&mut self, width: u32, height: i32) {
        self.width = width;
        self.viewport_height = height;
        self.clamp();
    }

    /// Advance the smooth scroll animation by `elapsed_ms`. Returns true
    /// while still animating.
    pub fn tick(&mut self, elapsed_ms: u64) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        let frames = (elapsed_ms / FRAME_MS).max(1);
        for _ in 0..frames {
            let dist = target - self.scroll_y;
            if dist == 0 {
                break;
            }
            let step = (dist as f32 * EASE).round() as i32;
            let step = if step == 0 { dist.signum() } else { step };
            self.scroll_y += step;
        }
        if self.scroll_y == target {
            self.target = None;
        }
        self.target.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    /// Get the maximum scroll offset.
    pub fn max_scroll(&self) -> i32 {
        (self.content_height - self.viewport_height).max(0)
    }

    fn clamped(&self, y: i32) -> i32 {
        y.clamp(0, self.max_scroll())
    }

    /// Clamp scroll_y (and any animation target) to [0, max_scroll].
    fn clamp(&mut self) {
        self.scroll_y = self.clamped(self.scroll_y);
        if let Some(t) = self.target {
            self.target = Some(self.clamped(t));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(smooth: bool) -> Viewport {
        let mut v = Viewport::new(1000, 200, smooth);
        v.set_content_height(1000);
        v
    }

    #[test]
    fn instant_scroll_is_clamped() {
        let mut v = viewport(false);
        v.scroll_to(5000, ScrollBehavior::Instant);
        assert_eq!(v.scroll_y, 800);
        v.scroll_to(-10, ScrollBehavior::Instant);
        assert_eq!(v.scroll_y, 0);
    }

    #[test]
    fn smooth_request_without_smooth_support_jumps() {
        let mut v = viewport(false);
        v.scroll_to(300, ScrollBehavior::Smooth);
        assert_eq!(v.scroll_y, 300);
        assert!(!v.is_animating());
    }

    #[test]
    fn smooth_scroll_converges_on_target() {
        let mut v = viewport(true);
        v.scroll_to(400, ScrollBehavior::Smooth);
        assert!(v.is_animating());
        assert_eq!(v.scroll_y, 0);

        assert!(v.tick(FRAME_MS));
        assert!(v.scroll_y > 0 && v.scroll_y < 400);

        let mut guard = 0;
        while v.tick(FRAME_MS) {
            guard += 1;
            assert!(guard < 200);
        }
        assert_eq!(v.scroll_y, 400);
    }

    #[test]
    fn long_tick_finishes_animation() {
        let mut v = viewport(true);
        v.scroll_to(600, ScrollBehavior::Smooth);
        assert!(!v.tick(5000));
        assert_eq!(v.scroll_y, 600);
    }

    #[test]
    fn center_on_places_box_mid_viewport() {
        let mut v = viewport(false);
        // Center: 600 + 10 = 610, so scroll_y = 610 - 100 = 510.
        v.center_on(600, 20, ScrollBehavior::Instant);
        assert_eq!(v.scroll_y, 510);
    }

    #[test]
    fn shrinking_content_clamps_target() {
        let mut v = viewport(true);
        v.scroll_to(700, ScrollBehavior::Smooth);
        v.set_content_height(500);
        assert!(!v.tick(5000));
        assert_eq!(v.scroll_y, 300);
    }
}
