//! Keyboard classification and cursor movement.

use crate::props::DropdownOption;

/// Keys the dropdown reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownKey {
    /// Space or Enter.
    Activate,
    ArrowDown,
    ArrowUp,
    Escape,
    Tab,
    /// A single ASCII letter or digit.
    Char(char),
    /// Anything else.
    Other,
}

impl DropdownKey {
    /// Classify a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Self {
        match key {
            " " | "Enter" => DropdownKey::Activate,
            "ArrowDown" => DropdownKey::ArrowDown,
            "ArrowUp" => DropdownKey::ArrowUp,
            "Escape" => DropdownKey::Escape,
            "Tab" => DropdownKey::Tab,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphanumeric() => DropdownKey::Char(c),
                    _ => DropdownKey::Other,
                }
            }
        }
    }

    /// Keys that open a closed menu.
    pub fn opens_menu(&self) -> bool {
        matches!(
            self,
            DropdownKey::Activate | DropdownKey::ArrowDown | DropdownKey::ArrowUp
        )
    }
}

/// Next index with wraparound. Without a cursor the first option is next.
pub fn next_index(cursor: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match cursor {
        Some(c) => (c + 1) % len,
        None => 0,
    })
}

/// Previous index with wraparound. Without a cursor the last option is
/// previous.
pub fn prev_index(cursor: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match cursor {
        Some(c) => (len + (c % len) - 1) % len,
        None => len - 1,
    })
}

/// First option after `cursor` whose label starts with `ch`
/// (case-insensitive), wrapping to the start of the list.
pub fn type_ahead(options: &[DropdownOption], cursor: Option<usize>, ch: char) -> Option<usize> {
    let matches = |option: &DropdownOption| {
        option
            .name
            .chars()
            .next()
            .is_some_and(|first| first.to_lowercase().eq(ch.to_lowercase()))
    };

    let after = cursor.map(|c| c + 1).unwrap_or(0);
    options
        .iter()
        .enumerate()
        .skip(after)
        .find(|(_, option)| matches(option))
        .or_else(|| options.iter().enumerate().find(|(_, option)| matches(option)))
        .map(|(index, _)| index)
}
