//! Visible-height and scroll policy.

/// Scroll behaviour for a list of `len` options showing at most `max_visible`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPolicy {
    pub max_visible: usize,
    pub len: usize,
}

impl ScrollPolicy {
    pub fn new(max_visible: usize, len: usize) -> Self {
        Self { max_visible, len }
    }

    /// The list needs a fixed-height scrolling viewport.
    pub fn is_constrained(&self) -> bool {
        self.max_visible > 0 && self.max_visible < self.len
    }

    /// Fixed viewport height, or `None` when no height should be forced.
    pub fn menu_height(&self, option_height: f32) -> Option<f32> {
        if !self.is_constrained() || option_height <= 0.0 {
            return None;
        }
        Some(self.max_visible as f32 * option_height)
    }

    /// Largest valid scroll offset.
    pub fn max_offset(&self) -> usize {
        if self.is_constrained() {
            self.len - self.max_visible
        } else {
            0
        }
    }

    pub fn clamp(&self, offset: usize) -> usize {
        offset.min(self.max_offset())
    }

    /// Scroll offset after the cursor moved to `cursor`.
    pub fn follow_cursor(&self, offset: usize, cursor: usize) -> usize {
        if !self.is_constrained() {
            return 0;
        }
        let next = if cursor == offset + self.max_visible {
            offset + 1
        } else if cursor < offset || cursor > offset + self.max_visible {
            cursor
        } else {
            offset
        };
        self.clamp(next)
    }

    /// Scroll position in px for an offset.
    pub fn scroll_top(offset: usize, option_height: f32) -> f32 {
        offset as f32 * option_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constrained() {
        assert!(ScrollPolicy::new(3, 4).is_constrained());
        assert!(!ScrollPolicy::new(5, 4).is_constrained());
        assert!(!ScrollPolicy::new(4, 4).is_constrained());
        assert!(!ScrollPolicy::new(0, 8).is_constrained());
    }

    #[test]
    fn test_menu_height() {
        assert_eq!(ScrollPolicy::new(3, 8).menu_height(33.0), Some(99.0));
        assert_eq!(ScrollPolicy::new(3, 8).menu_height(0.0), None);
        assert_eq!(ScrollPolicy::new(5, 4).menu_height(33.0), None);
    }

    #[test]
    fn test_follow_cursor() {
        let policy = ScrollPolicy::new(3, 8);
        // Walking down past the window advances one row at a time.
        assert_eq!(policy.follow_cursor(0, 2), 0);
        assert_eq!(policy.follow_cursor(0, 3), 1);
        assert_eq!(policy.follow_cursor(1, 4), 2);
        // Wrapping back to the top.
        assert_eq!(policy.follow_cursor(5, 0), 0);
        // Jumps land at the cursor, clamped to the last full window.
        assert_eq!(policy.follow_cursor(0, 6), 5);
        assert_eq!(policy.follow_cursor(0, 7), 5);

        assert_eq!(ScrollPolicy::new(0, 8).follow_cursor(4, 7), 0);
    }

    #[test]
    fn test_scroll_top() {
        assert_eq!(ScrollPolicy::scroll_top(2, 33.0), 66.0);
    }
}
