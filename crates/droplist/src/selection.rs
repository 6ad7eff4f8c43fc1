#![forbid(unsafe_code)]

//! Selection synchronizer and the value-consistency check.
//!
//! Committing a selection must leave three surfaces agreeing on one
//! value: the trigger text (the search field), the widget's declared
//! value, and the native control that the form actually submits. The
//! synchronizer runs as the `SelectedOption` subscriber so every commit
//! (click, Enter, programmatic) flows through the same path, and closes
//! the dropdown as its final step even when the selection did not change.

use crate::state::{Field, Value};
use crate::widget::WidgetInner;

impl WidgetInner {
    /// Subscriber for `SelectedOption` changes.
    pub(crate) fn selection_changed(&self, new: &Value, old: Option<&Value>) {
        let Some(new_id) = new.as_option_ref() else {
            self.diag.error("selection field holds a non-option value");
            return;
        };
        let old_id = old.and_then(Value::as_option_ref).flatten();

        let Some(id) = new_id else {
            self.diag.warn("selection cleared, native state left as-is");
            self.put(Field::HasValidValue, Value::Bool(false));
            return;
        };
        let Some(entry) = self.index.get(id) else {
            self.diag.warn("selected option is not in the index");
            self.put(Field::HasValidValue, Value::Bool(false));
            return;
        };
        if entry.value().is_empty() {
            // The index never admits valueless options; keep the guard
            // anyway so a broken host cannot corrupt the form value.
            self.diag.warn("selected option has no value");
            self.put(Field::HasValidValue, Value::Bool(false));
            return;
        }

        if new_id != old_id {
            if let Some(previous) = old_id
                && let Some(previous_entry) = self.index.get(previous)
            {
                self.view
                    .set_option_selected_mark(previous_entry.element(), false);
            }
            self.view.set_option_selected_mark(entry.element(), true);
            self.view.set_search_text(entry.display_text());
            self.view.set_widget_value(entry.value());
            // The native control is the source of truth for submission.
            self.select.set_value(entry.value());
            self.select.mark_selected(entry.native());
        }

        if self.diag.allows(droplist_core::DiagLevel::Verbose) {
            tracing::debug!(
                target: "droplist",
                widget = %self.diag.prefix(),
                value = %entry.value(),
                changed = new_id != old_id,
                "selection.commit"
            );
        }

        self.check_valid_value();
        // Close regardless of whether the selection changed: reselecting
        // the current option still dismisses the dropdown.
        self.put(Field::IsOpen, Value::Bool(false));
    }

    /// Four-way value-consistency check.
    ///
    /// Independent assertions, every one always evaluated: a selection
    /// exists; the declared value is non-empty; declared value matches
    /// the selected option; the search text matches its label; the
    /// native control matches the declared value. Any failure forces the
    /// result false. The outcome lands in `HasValidValue`.
    pub(crate) fn check_valid_value(&self) -> bool {
        let mut valid = true;
        let selected = self.selected_id().and_then(|id| self.index.get(id));

        if selected.is_none() {
            self.diag.warn("no option selected");
            valid = false;
        }

        let declared = self.view.widget_value();
        if declared.is_empty() {
            self.diag.warn("widget has no declared value");
            // An empty declared value must not leave a stale value on the
            // control the form submits.
            if !self.select.value().is_empty() {
                self.select.clear_value();
            }
            valid = false;
        }

        if let Some(entry) = selected {
            if declared != entry.value() {
                self.diag
                    .error("declared value does not match the selected option's value");
                valid = false;
            }
            let search = self.view.search_text();
            if search.trim() != entry.display_text() {
                self.diag
                    .warn("search text does not match the selected option's label");
                valid = false;
            }
        }

        if self.select.value() != declared {
            self.diag
                .error("declared value does not match the native control's value");
            valid = false;
        }

        self.put(Field::HasValidValue, Value::Bool(valid));
        valid
    }

    /// View effect for `HasValidValue` changes.
    pub(crate) fn validity_changed(&self, new: &Value, old: Option<&Value>) {
        let Some(valid) = new.as_bool() else {
            self.diag.error("validity field holds a non-boolean value");
            return;
        };
        if old.and_then(Value::as_bool) == Some(valid) {
            return;
        }
        self.view.set_validity(valid);
    }
}
