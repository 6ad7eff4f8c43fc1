#![forbid(unsafe_code)]

//! Option index: the ordered collection of selectable choices.
//!
//! Built once when the widget attaches, from the native control's ordered
//! children, and immutable afterward (dynamic option lists are out of
//! scope). Entry order is load-bearing: it is both display order and the
//! traversal order for keyboard navigation.

use ahash::AHashMap;
use droplist_core::Diag;

use crate::host::{NativeEntry, NodeId};

/// Stable opaque identity of one option within a widget instance.
///
/// Doubles as the correlation identifier shared between the native entry
/// and its generated counterpart for debugging/testing traceability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionId(u32);

impl OptionId {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw id, for hosts that surface it (e.g. as a data attribute).
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// One selectable choice, present in both native and generated forms.
#[derive(Debug, Clone)]
pub struct OptionEntry {
    id: OptionId,
    value: String,
    display_text: String,
    search_key: String,
    native: NodeId,
    element: NodeId,
}

impl OptionEntry {
    /// Stable identity within this widget.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> OptionId {
        self.id
    }

    /// The form value. Non-empty and unique within the index.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The trimmed label shown to the user.
    #[inline]
    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Lowercased display text, used for substring matching.
    #[inline]
    #[must_use]
    pub fn search_key(&self) -> &str {
        &self.search_key
    }

    /// The original control's option element. Borrowed, never owned.
    #[inline]
    #[must_use]
    pub const fn native(&self) -> NodeId {
        self.native
    }

    /// The generated option element.
    #[inline]
    #[must_use]
    pub const fn element(&self) -> NodeId {
        self.element
    }
}

/// Why a native child was excluded from the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The entry has no value; it cannot be submitted.
    MissingValue,
    /// The entry's value collides with an earlier one; first occurrence
    /// wins (case-sensitive by value).
    DuplicateValue,
}

/// A native child that did not make it into the index.
///
/// Its generated element still exists so the view can keep DOM shapes
/// aligned; the widget hides it and it is never selectable.
#[derive(Debug, Clone)]
pub struct RejectedOption {
    /// The native child element.
    pub native: NodeId,
    /// The generated (hidden) counterpart.
    pub element: NodeId,
    /// Why it was excluded.
    pub reason: RejectReason,
}

/// Result of building an index from the native control's children.
pub struct IndexBuild {
    /// The usable options, in DOM order.
    pub index: OptionIndex,
    /// The entry carrying the native pre-selected marker, if any.
    pub preselected: Option<OptionId>,
    /// Children excluded from selection.
    pub rejected: Vec<RejectedOption>,
}

/// Ordered, immutable collection of the usable options.
#[derive(Debug)]
pub struct OptionIndex {
    entries: Vec<OptionEntry>,
    by_id: AHashMap<OptionId, usize>,
}

impl OptionIndex {
    /// Build the index from the native control's ordered children.
    ///
    /// `make_element` creates the generated counterpart for every child,
    /// including excluded ones, so the generated list mirrors the native
    /// one shape-for-shape. Exclusions are logged and reported in the
    /// result rather than failing the build.
    pub fn build(
        natives: &[NativeEntry],
        mut make_element: impl FnMut(OptionId, &str) -> NodeId,
        diag: &Diag,
    ) -> IndexBuild {
        let mut entries = Vec::with_capacity(natives.len());
        let mut by_id = AHashMap::with_capacity(natives.len());
        let mut rejected = Vec::new();
        let mut preselected = None;

        for (ordinal, native) in natives.iter().enumerate() {
            let id = OptionId::new(ordinal as u32);
            let display_text = native.label.trim().to_string();
            let element = make_element(id, &display_text);

            if native.value.is_empty() {
                diag.warn("option without a value skipped");
                rejected.push(RejectedOption {
                    native: native.node,
                    element,
                    reason: RejectReason::MissingValue,
                });
                continue;
            }
            if entries
                .iter()
                .any(|entry: &OptionEntry| entry.value == native.value)
            {
                diag.warn(&format!(
                    "option with duplicate value {:?} skipped, first occurrence wins",
                    native.value
                ));
                rejected.push(RejectedOption {
                    native: native.node,
                    element,
                    reason: RejectReason::DuplicateValue,
                });
                continue;
            }

            if native.selected {
                preselected = Some(id);
            }
            by_id.insert(id, entries.len());
            entries.push(OptionEntry {
                id,
                search_key: display_text.to_lowercase(),
                display_text,
                value: native.value.clone(),
                native: native.node,
                element,
            });
        }

        IndexBuild {
            index: Self { entries, by_id },
            preselected,
            rejected,
        }
    }

    /// Number of usable options.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no usable options.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate the entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionEntry> {
        self.entries.iter()
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn get(&self, id: OptionId) -> Option<&OptionEntry> {
        self.by_id.get(&id).map(|&position| &self.entries[position])
    }

    /// The id of the first usable option, if any.
    #[must_use]
    pub fn first_id(&self) -> Option<OptionId> {
        self.entries.first().map(OptionEntry::id)
    }

    /// Find the option carrying the given form value.
    #[must_use]
    pub fn id_by_value(&self, value: &str) -> Option<OptionId> {
        self.entries
            .iter()
            .find(|entry| entry.value == value)
            .map(OptionEntry::id)
    }

    /// All ids in display order.
    #[must_use]
    pub fn ids(&self) -> Vec<OptionId> {
        self.entries.iter().map(OptionEntry::id).collect()
    }
}
