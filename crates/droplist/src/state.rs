#![forbid(unsafe_code)]

//! The widget's reactive record: field keys and value payloads.
//!
//! One [`crate::Store`]`<Field, Value>` per widget instance holds the full
//! state. The option index itself (ordered entries, immutable after
//! attach) lives on the widget; the store only carries [`crate::OptionId`]
//! references, so every field stays cheap to clone and compare.

use crate::options::OptionId;

/// Keys of the widget's reactive record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The committed selection, `Value::OptionRef`. At most one.
    SelectedOption,
    /// The keyboard/pointer cursor, `Value::OptionRef`. Only meaningful
    /// while open; when set it must be a member of `VisibleOptions`.
    HighlightedOption,
    /// Whether the dropdown is open, `Value::Bool`.
    IsOpen,
    /// The last *applied* normalized search query, `Value::Text`. Empty
    /// means "show all".
    SearchQuery,
    /// Ordered ids currently passing the filter, `Value::OptionList`.
    /// Always a subset of the index preserving relative order.
    VisibleOptions,
    /// Where the option list renders, `Value::Direction`.
    DropDirection,
    /// Result of the value-consistency check, `Value::Bool`.
    HasValidValue,
}

/// Whether the option list renders above or below the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropDirection {
    /// Above the trigger (not enough room below).
    Up,
    /// Below the trigger.
    Down,
    /// No constraint; the widget is closed or the list fits.
    #[default]
    None,
}

/// Value payloads for the widget's store fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A boolean flag.
    Bool(bool),
    /// A text field.
    Text(String),
    /// An optional option reference.
    OptionRef(Option<OptionId>),
    /// An ordered list of option ids.
    OptionList(Vec<OptionId>),
    /// A drop direction.
    Direction(DropDirection),
}

impl Value {
    /// The boolean payload, if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// The text payload, if this is a `Text`.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The option reference payload, if this is an `OptionRef`.
    #[must_use]
    pub fn as_option_ref(&self) -> Option<Option<OptionId>> {
        match self {
            Self::OptionRef(id) => Some(*id),
            _ => None,
        }
    }

    /// The option list payload, if this is an `OptionList`.
    #[must_use]
    pub fn as_option_list(&self) -> Option<&[OptionId]> {
        match self {
            Self::OptionList(ids) => Some(ids),
            _ => None,
        }
    }

    /// The direction payload, if this is a `Direction`.
    #[must_use]
    pub fn as_direction(&self) -> Option<DropDirection> {
        match self {
            Self::Direction(direction) => Some(*direction),
            _ => None,
        }
    }
}
