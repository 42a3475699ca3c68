//! Event handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::state::Focus;

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Navigation
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    JumpToTop,
    JumpToBottom,
    PageUp,
    PageDown,

    // Tree operations
    ToggleExpand,
    /// Make the folder under the cursor current (tree), or plain-click a row (table).
    Activate,
    /// Pop one breadcrumb level.
    NavigateBack,
    /// Back to the root listing.
    NavigateRoot,

    // Selection
    /// Ctrl-click equivalent.
    ToggleMark,
    /// Shift-click equivalent.
    RangeMark,
    /// Select-all checkbox.
    SelectAll,

    // Operations
    Delete,
    /// Pick up the element under the cursor for a move.
    PickUp,

    // Table
    Search,
    SortByName,
    SortByStatus,

    // UI
    SwitchFocus,
    ToggleHelp,
    ToggleTheme,
    Refresh,

    Confirm,
    Cancel,

    Quit,
    ForceQuit,

    None,
}

impl KeyAction {
    /// Convert a key event to an action.
    pub fn from_key_event(event: KeyEvent) -> Self {
        match (event.code, event.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::ForceQuit,
            (KeyCode::Esc, _) => KeyAction::Cancel,

            // Navigation - vim style
            (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::MoveDown,
            (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::MoveUp,
            (KeyCode::Char('h'), KeyModifiers::NONE) => KeyAction::MoveLeft,
            (KeyCode::Char('l'), KeyModifiers::NONE) => KeyAction::MoveRight,

            // Navigation - arrow keys
            (KeyCode::Down, _) => KeyAction::MoveDown,
            (KeyCode::Up, _) => KeyAction::MoveUp,
            (KeyCode::Left, _) => KeyAction::MoveLeft,
            (KeyCode::Right, _) => KeyAction::MoveRight,

            (KeyCode::Char('g'), KeyModifiers::NONE) => KeyAction::JumpToTop,
            (KeyCode::Char('G'), KeyModifiers::SHIFT) => KeyAction::JumpToBottom,
            (KeyCode::Home, _) => KeyAction::JumpToTop,
            (KeyCode::End, _) => KeyAction::JumpToBottom,
            (KeyCode::PageUp, _) => KeyAction::PageUp,
            (KeyCode::PageDown, _) => KeyAction::PageDown,
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => KeyAction::PageUp,
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => KeyAction::PageDown,

            (KeyCode::Char('o'), KeyModifiers::NONE) => KeyAction::ToggleExpand,
            (KeyCode::Enter, _) => KeyAction::Activate,
            (KeyCode::Backspace, _) => KeyAction::NavigateBack,
            (KeyCode::Char('-'), KeyModifiers::NONE) => KeyAction::NavigateBack,
            (KeyCode::Char('~'), _) => KeyAction::NavigateRoot,

            // Selection: Space toggles, Shift-Space or V extends a range
            (KeyCode::Char(' '), KeyModifiers::SHIFT) => KeyAction::RangeMark,
            (KeyCode::Char(' '), KeyModifiers::NONE) => KeyAction::ToggleMark,
            (KeyCode::Char('V'), KeyModifiers::SHIFT) => KeyAction::RangeMark,
            (KeyCode::Char('a'), KeyModifiers::NONE) => KeyAction::SelectAll,

            (KeyCode::Char('d'), KeyModifiers::NONE) => KeyAction::Delete,
            (KeyCode::Delete, _) => KeyAction::Delete,
            (KeyCode::Char('m'), KeyModifiers::NONE) => KeyAction::PickUp,

            (KeyCode::Char('/'), KeyModifiers::NONE) => KeyAction::Search,
            (KeyCode::Char('s'), KeyModifiers::NONE) => KeyAction::SortByName,
            (KeyCode::Char('S'), KeyModifiers::SHIFT) => KeyAction::SortByStatus,

            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => KeyAction::SwitchFocus,
            (KeyCode::Char('?'), _) => KeyAction::ToggleHelp,
            (KeyCode::Char('t'), KeyModifiers::NONE) => KeyAction::ToggleTheme,
            (KeyCode::Char('R'), KeyModifiers::SHIFT) => KeyAction::Refresh,

            (KeyCode::Char('y'), KeyModifiers::NONE) => KeyAction::Confirm,
            (KeyCode::Char('n'), KeyModifiers::NONE) => KeyAction::Cancel,

            _ => KeyAction::None,
        }
    }
}

/// A section of key bindings for the help display.
pub struct HelpSection {
    pub title: &'static str,
    /// Pane the bindings act on, `None` when they work everywhere.
    pub pane: Option<Focus>,
    pub bindings: Vec<KeyBinding>,
}

/// Key binding for display in help.
pub struct KeyBinding {
    pub keys: &'static str,
    pub description: &'static str,
}

/// Get all key bindings organized by section for help display.
pub fn get_help_sections() -> Vec<HelpSection> {
    vec![
        HelpSection {
            title: "Navigation",
            pane: Some(Focus::Tree),
            bindings: vec![
                KeyBinding { keys: "j/k ↑/↓", description: "Move up/down" },
                KeyBinding { keys: "h/l ←/→", description: "Collapse/expand folder" },
                KeyBinding { keys: "o", description: "Toggle folder" },
                KeyBinding { keys: "Enter", description: "Open folder / select row" },
                KeyBinding { keys: "Backspace/-", description: "Parent folder" },
                KeyBinding { keys: "~", description: "Back to root" },
                KeyBinding { keys: "g/G", description: "Jump to top/bottom" },
                KeyBinding { keys: "Tab", description: "Switch tree/table" },
            ],
        },
        HelpSection {
            title: "Selection",
            pane: Some(Focus::Table),
            bindings: vec![
                KeyBinding { keys: "Space", description: "Toggle row" },
                KeyBinding { keys: "S-Space/V", description: "Select range" },
                KeyBinding { keys: "a", description: "Select all visible" },
                KeyBinding { keys: "Esc", description: "Cancel" },
            ],
        },
        HelpSection {
            title: "Knowledge",
            pane: Some(Focus::Table),
            bindings: vec![
                KeyBinding { keys: "/", description: "Search" },
                KeyBinding { keys: "s/S", description: "Sort by name/status" },
                KeyBinding { keys: "d/Del", description: "Delete selection" },
                KeyBinding { keys: "m", description: "Pick up for move" },
                KeyBinding { keys: "R", description: "Refresh" },
            ],
        },
        HelpSection {
            title: "Application",
            pane: None,
            bindings: vec![
                KeyBinding { keys: "t", description: "Toggle dark/light theme" },
                KeyBinding { keys: "?", description: "Show this help" },
                KeyBinding { keys: "q", description: "Quit" },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_click_kind_keys() {
        assert_eq!(
            KeyAction::from_key_event(key(KeyCode::Char(' '), KeyModifiers::NONE)),
            KeyAction::ToggleMark
        );
        assert_eq!(
            KeyAction::from_key_event(key(KeyCode::Char(' '), KeyModifiers::SHIFT)),
            KeyAction::RangeMark
        );
        assert_eq!(
            KeyAction::from_key_event(key(KeyCode::Enter, KeyModifiers::NONE)),
            KeyAction::Activate
        );
    }

    #[test]
    fn test_unbound_key() {
        assert_eq!(
            KeyAction::from_key_event(key(KeyCode::F(5), KeyModifiers::NONE)),
            KeyAction::None
        );
    }

    #[test]
    fn test_help_sections_not_empty() {
        assert!(get_help_sections().iter().all(|s| !s.bindings.is_empty()));
    }
}
