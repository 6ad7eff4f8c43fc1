#![forbid(unsafe_code)]

//! Boundary traits between the widget core and its host.
//!
//! The core is headless. Everything it knows about the page arrives
//! through [`NativeSelect`] (the borrowed native control) and
//! [`WidgetView`] (the generated presentation); everything it does to the
//! page leaves through the same two traits. A DOM binding implements them
//! against real elements; the test harness implements them against
//! recorded state.
//!
//! Elements are referred to by [`NodeId`], an opaque token minted by the
//! host. The core never interprets it beyond equality.

use droplist_core::Rect;

use crate::options::OptionId;
use crate::state::DropDirection;

/// Opaque host-side element identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw host token.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw host token.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// One ordered child of the native control, as read at attach time.
#[derive(Debug, Clone)]
pub struct NativeEntry {
    /// The child element.
    pub node: NodeId,
    /// The form value. May be empty (the index rejects it).
    pub value: String,
    /// The raw label text. The index trims it.
    pub label: String,
    /// Whether the child carries the native pre-selected marker.
    pub selected: bool,
}

/// How a programmatic scroll should animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Jump without animation. Used on open and when resetting.
    Instant,
    /// Smooth-animated. Used for keyboard navigation.
    Smooth,
}

/// Position of an option within the scrolling option container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionBounds {
    /// Offset of the option's top edge from the top of the scroll content.
    pub top: f64,
    /// The option's height.
    pub height: f64,
}

/// The borrowed native control.
///
/// The widget reads its children once at attach and writes its value and
/// selected marker on every committed selection; it never destroys or
/// replaces the control. Clearing the previously selected entry's marker
/// when a new one is marked is the native control's own behavior, not the
/// widget's responsibility.
pub trait NativeSelect {
    /// The control's element id. `None` is a configuration error: without
    /// it no label can reference the control, and the widget refuses to
    /// attach.
    fn id(&self) -> Option<String>;

    /// Text of the label referencing the control. `None` is a
    /// configuration error.
    fn label_text(&self) -> Option<String>;

    /// The ordered children, read once at attach.
    fn entries(&self) -> Vec<NativeEntry>;

    /// Whether the control carries a required-ness marker. Read and
    /// surfaced, not enforced.
    fn is_required(&self) -> bool;

    /// The control's current form value.
    fn value(&self) -> String;

    /// Set the control's form value.
    fn set_value(&self, value: &str);

    /// Clear the control's value and selection entirely.
    fn clear_value(&self);

    /// Mark the given child as the selected one.
    fn mark_selected(&self, node: NodeId);

    /// Attach the correlation identifier to a native child, mirroring the
    /// tag the view puts on the generated counterpart.
    fn tag_option(&self, node: NodeId, id: OptionId);
}

/// The generated presentation.
///
/// The widget drives it exclusively through store subscriptions and the
/// controllers; view methods must not call back into the widget.
pub trait WidgetView {
    // --- construction ---

    /// Create the generated counterpart for one native child, tagged with
    /// its correlation id. Called once per child at attach, in order.
    fn build_option(&self, id: OptionId, text: &str) -> NodeId;

    /// The widget's root element.
    fn root(&self) -> NodeId;

    /// The label element associated with the widget.
    fn label(&self) -> NodeId;

    // --- trigger and search surface ---

    /// Current text of the search field (which doubles as the trigger's
    /// visible text).
    fn search_text(&self) -> String;

    /// Replace the search field text.
    fn set_search_text(&self, text: &str);

    /// Select (highlight for replacement) the search field text.
    fn select_search_text(&self);

    /// Move input focus to the search field.
    fn focus_search(&self);

    /// Move input focus to the trigger control.
    fn focus_trigger(&self);

    /// Move input focus to a generated option element.
    fn focus_option(&self, node: NodeId);

    /// Whether input focus currently rests inside the widget.
    fn focus_within_widget(&self) -> bool;

    // --- declared state marks ---

    /// The widget's declared current value.
    fn widget_value(&self) -> String;

    /// Update the declared current value.
    fn set_widget_value(&self, value: &str);

    /// Mark the widget expanded/collapsed (open attribute, ARIA state).
    fn set_expanded(&self, open: bool);

    /// Reflect the drop direction (presentation hook, e.g. a class).
    fn set_drop_direction(&self, direction: DropDirection);

    /// Constrain the option container's height, or lift the constraint.
    fn set_max_options_height(&self, px: Option<f64>);

    /// Hide or show a generated option element.
    fn set_option_hidden(&self, node: NodeId, hidden: bool);

    /// Whether a generated option element is currently hidden.
    fn is_option_hidden(&self, node: NodeId) -> bool;

    /// Toggle the highlight mark on a generated option element.
    fn set_option_highlighted(&self, node: NodeId, highlighted: bool);

    /// Toggle the selected mark on a generated option element.
    fn set_option_selected_mark(&self, node: NodeId, selected: bool);

    /// Reflect the value-consistency state (validity indicator).
    fn set_validity(&self, valid: bool);

    // --- geometry and scrolling ---

    /// The widget's bounding rect in viewport coordinates.
    fn widget_rect(&self) -> Rect;

    /// Height of the visible viewport.
    fn viewport_height(&self) -> f64;

    /// Natural (unconstrained) height of the option container content.
    fn options_height(&self) -> f64;

    /// Bounds of a generated option within the scrolling container.
    fn option_bounds(&self, node: NodeId) -> OptionBounds;

    /// Current scroll offset of the option container.
    fn scroll_top(&self) -> f64;

    /// Visible height of the scrolling option container.
    fn options_viewport_height(&self) -> f64;

    /// Scroll the option container to the given offset.
    fn scroll_options_to(&self, y: f64, behavior: ScrollBehavior);

    // --- outside-click wiring ---

    /// Arm or disarm the document-level click observer. While armed the
    /// host relays document clicks to the widget with their element path;
    /// each widget instance evaluates only its own state.
    fn observe_document_clicks(&self, armed: bool);
}
