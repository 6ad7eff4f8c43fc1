#![forbid(unsafe_code)]

//! Open/close controller.
//!
//! A two-state machine driven by the `IsOpen` store field. Opening
//! measures the widget against the viewport to pick a drop direction and
//! height, reconciles option visibility with whatever is in the search
//! field, and arms outside-click dismissal; closing tears all of that
//! down and returns focus to the trigger unless the user has already
//! moved it elsewhere.

use crate::host::{NodeId, ScrollBehavior};
use crate::state::{DropDirection, Field, Value};
use crate::widget::WidgetInner;

impl WidgetInner {
    /// Transition handler for `IsOpen` changes. Same-state writes are
    /// no-ops.
    pub(crate) fn open_changed(&self, new: &Value, old: Option<&Value>) {
        let Some(open) = new.as_bool() else {
            self.diag.error("open field holds a non-boolean value");
            return;
        };
        let was_open = old.and_then(Value::as_bool).unwrap_or(false);
        if open == was_open {
            return;
        }
        if open {
            self.open_dropdown();
        } else {
            self.close_dropdown();
        }
    }

    fn open_dropdown(&self) {
        self.update_drop_geometry();
        // Visibility may be stale relative to the search field (the
        // debounced run may never have fired before the last close).
        let query = self.view.search_text();
        self.apply_filter(&query);

        self.view.observe_document_clicks(true);
        self.view.set_expanded(true);

        match self.selected_id() {
            Some(selected) => {
                // The cursor starts on the selection, but never on an
                // option the current filter hides.
                if self.visible_ids().contains(&selected) {
                    self.put(Field::HighlightedOption, Value::OptionRef(Some(selected)));
                    self.ensure_option_visible(selected, ScrollBehavior::Instant);
                }
            }
            None => {
                self.diag
                    .error("no selected option on open, which should not happen");
            }
        }
        self.view.focus_search();

        if self.diag.allows(droplist_core::DiagLevel::Verbose) {
            tracing::debug!(
                target: "droplist",
                widget = %self.diag.prefix(),
                visible = self.visible_ids().len(),
                "dropdown.open"
            );
        }
    }

    fn close_dropdown(&self) {
        self.put(Field::HighlightedOption, Value::OptionRef(None));
        self.put(Field::DropDirection, Value::Direction(DropDirection::None));
        self.view.set_max_options_height(None);
        self.view.observe_document_clicks(false);
        self.view.scroll_options_to(0.0, ScrollBehavior::Instant);
        self.view.set_expanded(false);
        // Hand focus back to the trigger, but never steal it from
        // something the user focused outside the widget.
        if self.view.focus_within_widget() {
            self.view.focus_trigger();
        }
    }

    /// Measure the widget against the viewport and publish the drop
    /// direction and height constraint.
    ///
    /// The list drops down unconstrained when it fits below the trigger.
    /// When it would overflow the viewport bottom, it drops toward the
    /// larger space: up if the widget sits in the lower half of the
    /// viewport, down otherwise, with a max height of the available space
    /// minus the configured margin.
    pub(crate) fn update_drop_geometry(&self) {
        let rect = self.view.widget_rect();
        let viewport = self.view.viewport_height();
        let natural = self.view.options_height();
        let margin = self.config.drop_margin;

        let overflows = rect.bottom() + natural > viewport;
        let (direction, max_height) = if !overflows {
            (DropDirection::None, None)
        } else if rect.top() > viewport / 2.0 {
            (DropDirection::Up, Some(rect.top().floor() - margin))
        } else {
            (
                DropDirection::Down,
                Some((viewport - rect.bottom()).floor() - margin),
            )
        };

        self.put(Field::DropDirection, Value::Direction(direction));
        self.view.set_max_options_height(max_height);
    }

    /// View effect for `DropDirection` changes.
    pub(crate) fn drop_direction_changed(&self, new: &Value, old: Option<&Value>) {
        let Some(direction) = new.as_direction() else {
            self.diag
                .error("drop direction field holds a non-direction value");
            return;
        };
        if old.and_then(Value::as_direction) == Some(direction) {
            return;
        }
        self.view.set_drop_direction(direction);
    }

    /// A document click observed while this widget's observer is armed.
    ///
    /// Closes the widget when the click's element path contains neither
    /// the widget root nor its label. Only this instance's open state is
    /// consulted; other widgets on the page are not our business.
    pub(crate) fn handle_document_click(&self, path: &[NodeId]) {
        if !self.is_open() {
            return;
        }
        let root = self.view.root();
        let label = self.view.label();
        let inside = path.iter().any(|&node| node == root || node == label);
        if !inside {
            self.diag.verbose("click outside the widget, closing");
            self.put(Field::IsOpen, Value::Bool(false));
        }
    }
}
