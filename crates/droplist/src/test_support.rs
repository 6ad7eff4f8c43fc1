#![forbid(unsafe_code)]

//! Fake host implementations for tests.
//!
//! [`FakeSelect`] and [`FakeView`] implement the boundary traits against
//! recorded state instead of a DOM, so the full widget state machine can
//! be driven and observed without a browser. Geometry is simplified to
//! uniform option heights; write counters let tests assert the absence of
//! redundant view churn, not just final state.

use std::cell::{Cell, RefCell};

use ahash::AHashMap;
use droplist_core::Rect;

use crate::host::{
    NativeEntry, NativeSelect, NodeId, OptionBounds, ScrollBehavior, WidgetView,
};
use crate::options::OptionId;
use crate::state::DropDirection;

/// Where the fake page's input focus currently rests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Outside,
    Trigger,
    Search,
    Option(NodeId),
}

/// A fake native select control.
pub struct FakeSelect {
    id: Option<String>,
    label: Option<String>,
    required: bool,
    entries: RefCell<Vec<NativeEntry>>,
    value: RefCell<String>,
    tags: RefCell<AHashMap<NodeId, OptionId>>,
}

impl FakeSelect {
    /// Build a control from `(value, label)` pairs, with an id and a
    /// label wired up.
    #[must_use]
    pub fn new(options: &[(&str, &str)]) -> Self {
        let entries = options
            .iter()
            .enumerate()
            .map(|(position, (value, label))| NativeEntry {
                node: NodeId::new(position as u64 + 1),
                value: (*value).to_string(),
                label: (*label).to_string(),
                selected: false,
            })
            .collect();
        Self {
            id: Some("country".to_string()),
            label: Some("Country".to_string()),
            required: false,
            entries: RefCell::new(entries),
            value: RefCell::new(String::new()),
            tags: RefCell::new(AHashMap::new()),
        }
    }

    /// Drop the element id (builder).
    #[must_use]
    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }

    /// Drop the label linkage (builder).
    #[must_use]
    pub fn without_label(mut self) -> Self {
        self.label = None;
        self
    }

    /// Mark the child at `position` pre-selected (builder).
    #[must_use]
    pub fn with_selected(self, position: usize) -> Self {
        self.entries.borrow_mut()[position].selected = true;
        self
    }

    /// Set the required-ness marker (builder).
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// The control's current form value.
    #[must_use]
    pub fn current_value(&self) -> String {
        self.value.borrow().clone()
    }

    /// Position of the child carrying the selected marker.
    #[must_use]
    pub fn selected_position(&self) -> Option<usize> {
        self.entries.borrow().iter().position(|entry| entry.selected)
    }

    /// The correlation id tagged onto a child, if any.
    #[must_use]
    pub fn tag_for(&self, node: NodeId) -> Option<OptionId> {
        self.tags.borrow().get(&node).copied()
    }

    /// Corrupt the control's value from outside the widget, for
    /// consistency-check tests.
    pub fn set_value_directly(&self, value: &str) {
        *self.value.borrow_mut() = value.to_string();
    }
}

impl NativeSelect for FakeSelect {
    fn id(&self) -> Option<String> {
        self.id.clone()
    }

    fn label_text(&self) -> Option<String> {
        self.label.clone()
    }

    fn entries(&self) -> Vec<NativeEntry> {
        self.entries.borrow().clone()
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn value(&self) -> String {
        self.value.borrow().clone()
    }

    fn set_value(&self, value: &str) {
        // Native behavior: assigning a value no child carries clears the
        // control instead.
        let known = self
            .entries
            .borrow()
            .iter()
            .any(|entry| entry.value == value);
        *self.value.borrow_mut() = if known { value.to_string() } else { String::new() };
    }

    fn clear_value(&self) {
        self.value.borrow_mut().clear();
        for entry in self.entries.borrow_mut().iter_mut() {
            entry.selected = false;
        }
    }

    fn mark_selected(&self, node: NodeId) {
        // Clearing the previous marker is native behavior.
        for entry in self.entries.borrow_mut().iter_mut() {
            entry.selected = entry.node == node;
        }
    }

    fn tag_option(&self, node: NodeId, id: OptionId) {
        self.tags.borrow_mut().insert(node, id);
    }
}

struct FakeOption {
    node: NodeId,
    id: OptionId,
    text: String,
    hidden: bool,
    highlighted: bool,
    selected_mark: bool,
}

/// A fake generated presentation with uniform option geometry.
pub struct FakeView {
    root: NodeId,
    label: NodeId,
    options: RefCell<Vec<FakeOption>>,
    search: RefCell<String>,
    search_selected: Cell<bool>,
    widget_value: RefCell<String>,
    expanded: Cell<bool>,
    direction_mark: Cell<DropDirection>,
    max_height: Cell<Option<f64>>,
    validity: Cell<bool>,
    scroll: Cell<f64>,
    scrolls: RefCell<Vec<(f64, ScrollBehavior)>>,
    observing: Cell<bool>,
    focus: Cell<Focus>,
    rect: Cell<Rect>,
    viewport_h: Cell<f64>,
    option_height: Cell<f64>,
    window_height: Cell<f64>,
    hidden_writes: Cell<usize>,
    highlight_writes: Cell<usize>,
    validity_writes: Cell<usize>,
}

impl FakeView {
    /// A view sized like a short page: options 20px tall, a 200px scroll
    /// window, the widget at y=100 in a 768px viewport.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: NodeId::new(1),
            label: NodeId::new(2),
            options: RefCell::new(Vec::new()),
            search: RefCell::new(String::new()),
            search_selected: Cell::new(false),
            widget_value: RefCell::new(String::new()),
            expanded: Cell::new(false),
            direction_mark: Cell::new(DropDirection::None),
            max_height: Cell::new(None),
            validity: Cell::new(false),
            scroll: Cell::new(0.0),
            scrolls: RefCell::new(Vec::new()),
            observing: Cell::new(false),
            focus: Cell::new(Focus::Outside),
            rect: Cell::new(Rect::new(0.0, 100.0, 300.0, 40.0)),
            viewport_h: Cell::new(768.0),
            option_height: Cell::new(20.0),
            window_height: Cell::new(200.0),
            hidden_writes: Cell::new(0),
            highlight_writes: Cell::new(0),
            validity_writes: Cell::new(0),
        }
    }

    fn position_of(&self, node: NodeId) -> Option<usize> {
        self.options
            .borrow()
            .iter()
            .position(|option| option.node == node)
    }

    // --- test knobs ---

    /// Put text in the search field, as if the user typed it.
    pub fn type_search(&self, text: &str) {
        *self.search.borrow_mut() = text.to_string();
    }

    /// Move the page's focus somewhere outside the widget.
    pub fn focus_outside(&self) {
        self.focus.set(Focus::Outside);
    }

    /// Reposition the widget in the viewport.
    pub fn set_widget_rect(&self, rect: Rect) {
        self.rect.set(rect);
    }

    /// Resize the viewport.
    pub fn set_viewport_height(&self, height: f64) {
        self.viewport_h.set(height);
    }

    /// Change the uniform option height.
    pub fn set_option_height(&self, height: f64) {
        self.option_height.set(height);
    }

    /// Set the scroll offset directly.
    pub fn set_scroll_top(&self, y: f64) {
        self.scroll.set(y);
    }

    // --- observations ---

    /// Hidden flag of the option at build position.
    #[must_use]
    pub fn option_hidden(&self, position: usize) -> bool {
        self.options.borrow()[position].hidden
    }

    /// Highlight mark of the option at build position.
    #[must_use]
    pub fn option_highlighted(&self, position: usize) -> bool {
        self.options.borrow()[position].highlighted
    }

    /// Selected mark of the option at build position.
    #[must_use]
    pub fn option_selected_mark(&self, position: usize) -> bool {
        self.options.borrow()[position].selected_mark
    }

    /// Display text of the option at build position.
    #[must_use]
    pub fn option_text(&self, position: usize) -> String {
        self.options.borrow()[position].text.clone()
    }

    /// Correlation id of the option at build position, for simulating
    /// pointer events on it.
    #[must_use]
    pub fn option_id_at(&self, position: usize) -> OptionId {
        self.options.borrow()[position].id
    }

    /// Number of hidden-flag writes so far.
    #[must_use]
    pub fn hidden_writes(&self) -> usize {
        self.hidden_writes.get()
    }

    /// Number of highlight-mark writes so far.
    #[must_use]
    pub fn highlight_writes(&self) -> usize {
        self.highlight_writes.get()
    }

    /// Number of validity-indicator writes so far.
    #[must_use]
    pub fn validity_writes(&self) -> usize {
        self.validity_writes.get()
    }

    /// The expanded mark.
    #[must_use]
    pub fn expanded(&self) -> bool {
        self.expanded.get()
    }

    /// Whether the document click observer is armed.
    #[must_use]
    pub fn observing_clicks(&self) -> bool {
        self.observing.get()
    }

    /// Whether the search field has focus.
    #[must_use]
    pub fn search_focused(&self) -> bool {
        self.focus.get() == Focus::Search
    }

    /// Whether the search field text was select-all'd for replacement.
    #[must_use]
    pub fn search_text_selected(&self) -> bool {
        self.search_selected.get()
    }

    /// Whether the trigger has focus.
    #[must_use]
    pub fn trigger_focused(&self) -> bool {
        self.focus.get() == Focus::Trigger
    }

    /// The current height constraint.
    #[must_use]
    pub fn max_options_height(&self) -> Option<f64> {
        self.max_height.get()
    }

    /// The drop direction presentation mark.
    #[must_use]
    pub fn drop_direction_mark(&self) -> DropDirection {
        self.direction_mark.get()
    }

    /// The validity indicator.
    #[must_use]
    pub fn validity_mark(&self) -> bool {
        self.validity.get()
    }

    /// Current scroll offset of the option container.
    #[must_use]
    pub fn scroll_position(&self) -> f64 {
        self.scroll.get()
    }

    /// Number of programmatic scrolls so far.
    #[must_use]
    pub fn scroll_count(&self) -> usize {
        self.scrolls.borrow().len()
    }

    /// The last programmatic scroll, if any.
    #[must_use]
    pub fn last_scroll(&self) -> Option<(f64, ScrollBehavior)> {
        self.scrolls.borrow().last().copied()
    }
}

impl Default for FakeView {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetView for FakeView {
    fn build_option(&self, id: OptionId, text: &str) -> NodeId {
        let mut options = self.options.borrow_mut();
        let node = NodeId::new(100 + options.len() as u64);
        options.push(FakeOption {
            node,
            id,
            text: text.to_string(),
            hidden: false,
            highlighted: false,
            selected_mark: false,
        });
        node
    }

    fn root(&self) -> NodeId {
        self.root
    }

    fn label(&self) -> NodeId {
        self.label
    }

    fn search_text(&self) -> String {
        self.search.borrow().clone()
    }

    fn set_search_text(&self, text: &str) {
        *self.search.borrow_mut() = text.to_string();
    }

    fn select_search_text(&self) {
        self.search_selected.set(true);
    }

    fn focus_search(&self) {
        self.focus.set(Focus::Search);
    }

    fn focus_trigger(&self) {
        self.focus.set(Focus::Trigger);
    }

    fn focus_option(&self, node: NodeId) {
        self.focus.set(Focus::Option(node));
    }

    fn focus_within_widget(&self) -> bool {
        self.focus.get() != Focus::Outside
    }

    fn widget_value(&self) -> String {
        self.widget_value.borrow().clone()
    }

    fn set_widget_value(&self, value: &str) {
        *self.widget_value.borrow_mut() = value.to_string();
    }

    fn set_expanded(&self, open: bool) {
        self.expanded.set(open);
    }

    fn set_drop_direction(&self, direction: DropDirection) {
        self.direction_mark.set(direction);
    }

    fn set_max_options_height(&self, px: Option<f64>) {
        self.max_height.set(px);
    }

    fn set_option_hidden(&self, node: NodeId, hidden: bool) {
        if let Some(position) = self.position_of(node) {
            self.options.borrow_mut()[position].hidden = hidden;
            self.hidden_writes.set(self.hidden_writes.get() + 1);
        }
    }

    fn is_option_hidden(&self, node: NodeId) -> bool {
        self.position_of(node)
            .is_some_and(|position| self.options.borrow()[position].hidden)
    }

    fn set_option_highlighted(&self, node: NodeId, highlighted: bool) {
        if let Some(position) = self.position_of(node) {
            self.options.borrow_mut()[position].highlighted = highlighted;
            self.highlight_writes.set(self.highlight_writes.get() + 1);
        }
    }

    fn set_option_selected_mark(&self, node: NodeId, selected: bool) {
        if let Some(position) = self.position_of(node) {
            self.options.borrow_mut()[position].selected_mark = selected;
        }
    }

    fn set_validity(&self, valid: bool) {
        self.validity.set(valid);
        self.validity_writes.set(self.validity_writes.get() + 1);
    }

    fn widget_rect(&self) -> Rect {
        self.rect.get()
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_h.get()
    }

    fn options_height(&self) -> f64 {
        self.options.borrow().len() as f64 * self.option_height.get()
    }

    fn option_bounds(&self, node: NodeId) -> OptionBounds {
        // Uniform geometry: position in build order times option height.
        let top = self
            .position_of(node)
            .map_or(0.0, |position| position as f64 * self.option_height.get());
        OptionBounds {
            top,
            height: self.option_height.get(),
        }
    }

    fn scroll_top(&self) -> f64 {
        self.scroll.get()
    }

    fn options_viewport_height(&self) -> f64 {
        self.window_height.get()
    }

    fn scroll_options_to(&self, y: f64, behavior: ScrollBehavior) {
        self.scroll.set(y);
        self.scrolls.borrow_mut().push((y, behavior));
    }

    fn observe_document_clicks(&self, armed: bool) {
        self.observing.set(armed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_select_emulates_native_value_assignment() {
        let select = FakeSelect::new(&[("se", "Sweden"), ("ch", "Switzerland")]);
        select.set_value("ch");
        assert_eq!(select.current_value(), "ch");
        // Unknown values clear the control, as a real select would.
        select.set_value("xx");
        assert_eq!(select.current_value(), "");
    }

    #[test]
    fn fake_select_moves_the_selected_marker() {
        let select = FakeSelect::new(&[("se", "Sweden"), ("ch", "Switzerland")]);
        let nodes: Vec<NodeId> = select.entries().iter().map(|entry| entry.node).collect();
        select.mark_selected(nodes[1]);
        assert_eq!(select.selected_position(), Some(1));
        select.mark_selected(nodes[0]);
        assert_eq!(select.selected_position(), Some(0));
    }

    #[test]
    fn fake_view_geometry_is_uniform() {
        let view = FakeView::new();
        let first = view.build_option(OptionId::new(0), "a");
        let second = view.build_option(OptionId::new(1), "b");
        assert_eq!(view.option_bounds(first).top, 0.0);
        assert_eq!(view.option_bounds(second).top, 20.0);
        assert_eq!(view.options_height(), 40.0);
    }
}
