#![forbid(unsafe_code)]

//! Navigation and highlight controller.
//!
//! The highlight is a transient cursor over the *visible* options,
//! distinct from the selection. Keyboard navigation moves it with
//! clamping at both ends (no wraparound); pointer hover overwrites it
//! directly. The view effect subscribed to the highlight field keeps the
//! marks in sync, skipping redundant churn when the value did not change.

use crate::host::ScrollBehavior;
use crate::options::OptionId;
use crate::state::{Field, Value};
use crate::widget::WidgetInner;

impl WidgetInner {
    /// Move the highlight by `offset` steps through the visible options.
    ///
    /// With nothing highlighted this bootstraps the cursor onto the first
    /// visible option without applying the offset. A highlight that is
    /// not in the visible set is an invariant violation: reported, and
    /// the move aborts leaving prior state intact.
    pub(crate) fn navigate(&self, offset: isize) {
        let visible = self.visible_ids();
        let Some(current) = self.highlighted_id() else {
            self.diag
                .warn("nothing highlighted, putting the cursor on the first visible option");
            if let Some(first) = visible.first().copied() {
                self.put(Field::HighlightedOption, Value::OptionRef(Some(first)));
            }
            return;
        };

        let Some(position) = visible.iter().position(|&id| id == current) else {
            self.diag
                .error("highlighted option is not in the visible set");
            return;
        };

        let last = visible.len() as isize - 1;
        let target = (position as isize + offset).clamp(0, last) as usize;
        let id = visible[target];

        self.put(Field::HighlightedOption, Value::OptionRef(Some(id)));
        if let Some(entry) = self.index.get(id) {
            self.view.focus_option(entry.element());
        }
        self.ensure_option_visible(id, ScrollBehavior::Smooth);
    }

    /// Pointer hover/focus: overwrite the cursor unconditionally.
    pub(crate) fn set_highlight(&self, id: OptionId) {
        self.put(Field::HighlightedOption, Value::OptionRef(Some(id)));
    }

    /// View effect for `HighlightedOption` changes.
    pub(crate) fn highlight_changed(&self, new: &Value, old: Option<&Value>) {
        let Some(new_id) = new.as_option_ref() else {
            self.diag.error("highlight field holds a non-option value");
            return;
        };
        let old_id = old.and_then(Value::as_option_ref).flatten();
        if new_id == old_id {
            return;
        }
        if let Some(id) = old_id
            && let Some(entry) = self.index.get(id)
        {
            self.view.set_option_highlighted(entry.element(), false);
        }
        if let Some(id) = new_id
            && let Some(entry) = self.index.get(id)
        {
            self.view.set_option_highlighted(entry.element(), true);
        }
    }

    /// Keep an option inside the scrolled view of the option container.
    ///
    /// If the option's top edge sits above the visible window, scroll so
    /// it lands a quarter of the container height below the top; if its
    /// bottom edge sits below, scroll so it rests a quarter above the
    /// bottom. Fully visible options trigger no scroll at all.
    pub(crate) fn ensure_option_visible(&self, id: OptionId, behavior: ScrollBehavior) {
        let Some(entry) = self.index.get(id) else {
            return;
        };
        let bounds = self.view.option_bounds(entry.element());
        let container = self.view.options_viewport_height();
        let visible_top = self.view.scroll_top();
        let visible_bottom = visible_top + container;

        let target = if bounds.top < visible_top {
            Some(bounds.top - container * 0.25)
        } else if bounds.top + bounds.height > visible_bottom {
            Some(bounds.top + bounds.height - container * 0.75)
        } else {
            None
        };

        if let Some(y) = target {
            self.view.scroll_options_to(y.max(0.0), behavior);
        }
    }
}
