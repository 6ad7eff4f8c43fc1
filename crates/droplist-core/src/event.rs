#![forbid(unsafe_code)]

//! Canonical input event types.
//!
//! The host (a DOM binding, a test harness) translates its native keyboard
//! events into these types before relaying them to the widget. Only the keys
//! the widget protocol cares about get their own variant; everything else
//! arrives as [`KeyCode::Char`] or [`KeyCode::Other`] and passes through to
//! default text-input behavior.

use bitflags::bitflags;

/// A keyboard event relayed by the host while the widget has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether Ctrl is held.
    #[inline]
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Whether Alt is held.
    #[inline]
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Whether the Super/Meta key is held.
    #[inline]
    #[must_use]
    pub const fn super_key(&self) -> bool {
        self.modifiers.contains(Modifiers::SUPER)
    }
}

/// Key codes the widget distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// Escape key.
    Escape,
    /// Enter / Return key.
    Enter,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Backspace key.
    Backspace,
    /// Tab key.
    Tab,
    /// A printable character.
    Char(char),
    /// Any key the protocol does not map.
    Other,
}

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE = 0;
        /// Shift key.
        const SHIFT = 1 << 0;
        /// Control key.
        const CTRL = 1 << 1;
        /// Alt / Option key.
        const ALT = 1 << 2;
        /// Super / Meta / Command key.
        const SUPER = 1 << 3;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}
