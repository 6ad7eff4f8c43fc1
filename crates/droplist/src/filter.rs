#![forbid(unsafe_code)]

//! Search/filter engine.
//!
//! Computes the visible subset of the option index for a query, preserving
//! index order, and designates the first match as the navigation cursor.
//! Matching is plain case-insensitive substring over each option's search
//! key; no fuzzy matching, no tokenization.
//!
//! Input arrives through the externally debounced search field; the engine
//! itself only guards against re-running an identical query.

use crate::host::ScrollBehavior;
use crate::state::{Field, Value};
use crate::widget::WidgetInner;

impl WidgetInner {
    /// Apply a (raw) search query to the option list.
    ///
    /// Store writes land in the order `SearchQuery`, `VisibleOptions`,
    /// `HighlightedOption`, so highlight subscribers always observe a
    /// visible set consistent with the new query. The visible set is
    /// recomputed wholly on every change, never incrementally.
    pub(crate) fn apply_filter(&self, raw_query: &str) {
        let query = raw_query.trim().to_lowercase();

        if self.search_query() == query {
            self.diag.verbose("search skipped, query unchanged");
            return;
        }
        self.put(Field::SearchQuery, Value::Text(query.clone()));

        if query.is_empty() {
            self.diag.verbose("search empty, showing all options");
            self.show_all_options();
            self.check_valid_value();
            return;
        }

        let mut visible = Vec::new();
        for entry in self.index.iter() {
            if entry.search_key().contains(&query) {
                if self.view.is_option_hidden(entry.element()) {
                    self.view.set_option_hidden(entry.element(), false);
                }
                visible.push(entry.id());
            } else if !self.view.is_option_hidden(entry.element()) {
                self.view.set_option_hidden(entry.element(), true);
            }
        }

        // Zero matches leaves the visible set empty and clears the cursor;
        // the highlight must never point at a hidden option.
        let first_match = visible.first().copied();
        self.put(Field::VisibleOptions, Value::OptionList(visible));
        self.put(Field::HighlightedOption, Value::OptionRef(first_match));
        self.check_valid_value();
    }

    /// Show every option, reset the visible set to the full index, and
    /// put the cursor back on the selection.
    pub(crate) fn show_all_options(&self) {
        for entry in self.index.iter() {
            if self.view.is_option_hidden(entry.element()) {
                self.view.set_option_hidden(entry.element(), false);
            }
        }
        self.put(Field::VisibleOptions, Value::OptionList(self.index.ids()));
        let selected = self.selected_id();
        self.put(Field::HighlightedOption, Value::OptionRef(selected));
        if let Some(id) = selected {
            self.ensure_option_visible(id, ScrollBehavior::Instant);
        }
    }
}
