//! Interaction state.

/// Transient state mutated by user interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionState {
    pub open: bool,
    /// Highlighted option.
    pub cursor: Option<usize>,
    /// Committed option.
    pub selected: Option<usize>,
    /// First visible row when scroll-constrained.
    pub scroll_offset: usize,
}

impl InteractionState {
    /// Clear cursor, selection and scroll after the option list changed.
    pub fn reset_for_options(&mut self) {
        self.cursor = None;
        self.selected = None;
        self.scroll_offset = 0;
    }

    /// Cursor position to use when the menu opens.
    pub fn opening_cursor(&self, len: usize) -> Option<usize> {
        match self.selected {
            Some(selected) if selected < len => Some(selected),
            _ if len > 0 => Some(0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_for_options() {
        let mut state = InteractionState {
            open: true,
            cursor: Some(2),
            selected: Some(1),
            scroll_offset: 3,
        };
        state.reset_for_options();
        assert_eq!(state.cursor, None);
        assert_eq!(state.selected, None);
        assert_eq!(state.scroll_offset, 0);
        assert!(state.open);
    }

    #[test]
    fn test_opening_cursor() {
        let mut state = InteractionState::default();
        assert_eq!(state.opening_cursor(4), Some(0));
        assert_eq!(state.opening_cursor(0), None);

        state.selected = Some(2);
        assert_eq!(state.opening_cursor(4), Some(2));
        // A stale selection past the end falls back to the first row.
        assert_eq!(state.opening_cursor(2), Some(0));
    }
}
