#![forbid(unsafe_code)]

//! Keyboard protocol: key events to widget operations.
//!
//! A pure, state-independent mapping evaluated while the widget has focus.
//! Arrow keys with Ctrl/Alt/Super held pass through so host-level
//! shortcuts keep working; every other unmapped key passes through to
//! default text-input behavior in the search field.

use droplist_core::{KeyCode, KeyEvent};

/// Operation a key event maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Close the dropdown (no-op if already closed).
    Close,
    /// Move the highlight by the given offset through the visible options.
    MoveHighlight(isize),
    /// Commit the highlighted option as the selection.
    CommitHighlight,
    /// Not ours; leave the event to default handling.
    Pass,
}

/// Whether the widget consumed a key event.
///
/// `Handled` means the host should suppress the default behavior (page
/// scrolling for arrows, form submission for Enter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    /// The widget consumed the event.
    Handled,
    /// The event passed through.
    Ignored,
}

/// Map a key event to its widget operation.
#[must_use]
pub fn action_for(event: &KeyEvent) -> KeyAction {
    let nav_modifiers = event.ctrl() || event.alt() || event.super_key();
    match event.code {
        KeyCode::Escape => KeyAction::Close,
        KeyCode::ArrowUp if !nav_modifiers => KeyAction::MoveHighlight(-1),
        KeyCode::ArrowDown if !nav_modifiers => KeyAction::MoveHighlight(1),
        KeyCode::Enter => KeyAction::CommitHighlight,
        _ => KeyAction::Pass,
    }
}
