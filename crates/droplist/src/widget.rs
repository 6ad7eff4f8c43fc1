#![forbid(unsafe_code)]

//! The widget facade: attach, wiring, and the host API.
//!
//! [`SelectWidget`] is the component object owning the option index and
//! the reactive store. At attach time it validates the configuration,
//! builds the index from the native control, seeds the store, and wires
//! the controller subscriptions; afterward every host interaction funnels
//! into store writes and the subscribed controllers do the rest.
//!
//! Hosts own widget instances directly; there is no global registry, so
//! dropping the last handle tears the whole widget down (subscriber
//! callbacks hold only weak references back to the internals).

use std::rc::{Rc, Weak};

use droplist_core::{Debouncer, Diag, DiagLevel, KeyEvent};
use thiserror::Error;
use web_time::{Duration, Instant};

use crate::host::{NativeSelect, NodeId, WidgetView};
use crate::keymap::{self, KeyAction, KeyResponse};
use crate::options::{OptionId, OptionIndex};
use crate::state::{DropDirection, Field, Value};
use crate::store::Store;

/// Per-widget configuration.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub(crate) log_level: DiagLevel,
    pub(crate) log_prefix: String,
    pub(crate) default_value: Option<String>,
    pub(crate) search_delay: Duration,
    pub(crate) drop_margin: f64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            log_level: DiagLevel::Errors,
            log_prefix: "droplist".to_string(),
            default_value: None,
            search_delay: Duration::from_millis(250),
            drop_margin: 20.0,
        }
    }
}

impl WidgetConfig {
    /// Start from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the diagnostic verbosity (builder).
    #[must_use]
    pub fn with_log_level(mut self, level: DiagLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Set the diagnostic message prefix (builder).
    #[must_use]
    pub fn with_log_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_prefix = prefix.into();
        self
    }

    /// Value to select when no native entry carries the pre-selected
    /// marker (builder).
    #[must_use]
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Quiescence delay gating the search filter (builder).
    #[must_use]
    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = delay;
        self
    }

    /// Margin kept between the option list and the viewport edge when
    /// computing the drop height (builder).
    #[must_use]
    pub fn with_drop_margin(mut self, margin: f64) -> Self {
        self.drop_margin = margin;
        self
    }
}

/// Configuration errors that prevent the widget from attaching.
///
/// On any of these the host page keeps the unmodified native control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AttachError {
    /// The native control has no element id, so no label can reference it.
    #[error("native control has no id; a label must be able to reference it")]
    MissingControlId,
    /// No label references the native control.
    #[error("no label references the native control")]
    MissingLabel,
    /// Every child of the control was excluded, leaving nothing to select.
    #[error("native control offers no selectable option")]
    NoSelectableOptions,
}

/// A select-replacement dropdown bound to one native control.
pub struct SelectWidget {
    pub(crate) inner: Rc<WidgetInner>,
}

pub(crate) struct WidgetInner {
    pub(crate) diag: Diag,
    pub(crate) config: WidgetConfig,
    pub(crate) select: Rc<dyn NativeSelect>,
    pub(crate) view: Rc<dyn WidgetView>,
    pub(crate) index: OptionIndex,
    pub(crate) store: Store<Field, Value>,
    pub(crate) search_debounce: Debouncer,
}

impl SelectWidget {
    /// Progressively enhance a native control.
    ///
    /// Validates the control/label linkage, builds the option index (and
    /// the generated option elements through the view), resolves the
    /// initial selection, and synchronizes it everywhere. Configuration
    /// errors refuse the attach loudly; the native control is left
    /// untouched.
    pub fn attach(
        select: Rc<dyn NativeSelect>,
        view: Rc<dyn WidgetView>,
        config: WidgetConfig,
    ) -> Result<Self, AttachError> {
        let diag = Diag::new(config.log_level, config.log_prefix.clone());

        if select.id().is_none() {
            diag.error(
                "native control needs an id with a label pointing at it; leaving it untouched",
            );
            return Err(AttachError::MissingControlId);
        }
        if select.label_text().is_none() {
            diag.error("no label found for the native control; leaving it untouched");
            return Err(AttachError::MissingLabel);
        }

        let natives = select.entries();
        let build = OptionIndex::build(&natives, |id, text| view.build_option(id, text), &diag);

        for entry in build.index.iter() {
            select.tag_option(entry.native(), entry.id());
        }
        for reject in &build.rejected {
            view.set_option_hidden(reject.element, true);
        }

        let initial = build
            .preselected
            .or_else(|| {
                config
                    .default_value
                    .as_deref()
                    .and_then(|value| build.index.id_by_value(value))
            })
            .or_else(|| build.index.first_id());
        let Some(initial) = initial else {
            diag.error("native control has no selectable options; leaving it untouched");
            return Err(AttachError::NoSelectableOptions);
        };

        let inner = Rc::new(WidgetInner {
            search_debounce: Debouncer::new(config.search_delay),
            store: Store::new(diag.clone()),
            diag,
            config,
            select,
            view,
            index: build.index,
        });
        inner.seed_state();
        WidgetInner::wire_subscribers(&inner);
        // Committing the initial selection through the store runs the full
        // synchronizer: trigger text, declared value, native write-back.
        inner.put(Field::SelectedOption, Value::OptionRef(Some(initial)));
        Ok(Self { inner })
    }

    /// Open the dropdown. Idempotent.
    pub fn open(&self) {
        self.inner.put(Field::IsOpen, Value::Bool(true));
    }

    /// Close the dropdown. Idempotent.
    pub fn close(&self) {
        self.inner.put(Field::IsOpen, Value::Bool(false));
    }

    /// Whether the dropdown is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    /// The widget's declared current value. Equal to the native control's
    /// value after any committed selection.
    #[must_use]
    pub fn value(&self) -> String {
        self.inner.view.widget_value()
    }

    /// The committed selection.
    #[must_use]
    pub fn selected_option(&self) -> Option<OptionId> {
        self.inner.selected_id()
    }

    /// The current highlight cursor.
    #[must_use]
    pub fn highlighted_option(&self) -> Option<OptionId> {
        self.inner.highlighted_id()
    }

    /// Ids currently passing the filter, in display order.
    #[must_use]
    pub fn visible_options(&self) -> Vec<OptionId> {
        self.inner.visible_ids()
    }

    /// The current drop direction.
    #[must_use]
    pub fn drop_direction(&self) -> DropDirection {
        self.inner
            .store
            .get(Field::DropDirection)
            .and_then(|value| value.as_direction())
            .unwrap_or_default()
    }

    /// Result of the last value-consistency check.
    #[must_use]
    pub fn has_valid_value(&self) -> bool {
        self.inner
            .store
            .get(Field::HasValidValue)
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    /// The option index, for hosts that render from it.
    #[must_use]
    pub fn options(&self) -> &OptionIndex {
        &self.inner.index
    }

    /// Whether the native control is marked required. Surfaced, not
    /// enforced.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.inner.select.is_required()
    }

    /// Select the option carrying the given form value.
    ///
    /// Returns false (with a logged warning) when no usable option has
    /// that value. Reselecting the current value still closes the
    /// dropdown.
    pub fn select_by_value(&self, value: &str) -> bool {
        match self.inner.index.id_by_value(value) {
            Some(id) => {
                self.inner
                    .put(Field::SelectedOption, Value::OptionRef(Some(id)));
                true
            }
            None => {
                self.inner
                    .diag
                    .warn(&format!("no selectable option has value {value:?}"));
                false
            }
        }
    }

    /// Handle a key event relayed by the host while the widget has focus.
    pub fn handle_key(&self, event: KeyEvent) -> KeyResponse {
        match keymap::action_for(&event) {
            KeyAction::Close => {
                self.inner.put(Field::IsOpen, Value::Bool(false));
                KeyResponse::Handled
            }
            KeyAction::MoveHighlight(offset) => {
                self.inner.navigate(offset);
                KeyResponse::Handled
            }
            KeyAction::CommitHighlight => {
                if self.inner.is_open()
                    && let Some(id) = self.inner.highlighted_id()
                {
                    self.inner
                        .put(Field::SelectedOption, Value::OptionRef(Some(id)));
                }
                KeyResponse::Handled
            }
            KeyAction::Pass => KeyResponse::Ignored,
        }
    }

    /// A generated option was clicked.
    pub fn notify_option_click(&self, id: OptionId) {
        if self.inner.index.get(id).is_some() {
            self.inner
                .put(Field::SelectedOption, Value::OptionRef(Some(id)));
        } else {
            self.inner
                .diag
                .warn("click on an option that is not in the index");
        }
    }

    /// The pointer moved over (or focus landed on) a generated option.
    pub fn notify_option_hover(&self, id: OptionId) {
        if self.inner.index.get(id).is_some() {
            self.inner.set_highlight(id);
        } else {
            self.inner
                .diag
                .warn("hover on an option that is not in the index");
        }
    }

    /// The trigger was clicked: toggle.
    pub fn notify_trigger_click(&self) {
        let open = self.inner.is_open();
        self.inner.put(Field::IsOpen, Value::Bool(!open));
    }

    /// The widget's label was clicked: open and hand focus to search.
    pub fn notify_label_click(&self) {
        self.inner.view.focus_search();
        self.inner.view.select_search_text();
        self.inner.put(Field::IsOpen, Value::Bool(true));
    }

    /// The search field was clicked: a click there always opens.
    pub fn notify_search_click(&self) {
        self.inner.put(Field::IsOpen, Value::Bool(true));
    }

    /// The search field text changed (keystroke or change event). Arms
    /// the debounce window; the filter runs from [`Self::on_tick`] once
    /// input quiesces.
    pub fn notify_search_input(&self, now: Instant) {
        self.inner.search_debounce.poke(now);
    }

    /// Host event-loop tick. Runs the pending debounced filter when its
    /// window has elapsed.
    pub fn on_tick(&self, now: Instant) {
        if self.inner.search_debounce.fire_ready(now) {
            let query = self.inner.view.search_text();
            self.inner.apply_filter(&query);
        }
    }

    /// A document-level click was observed while the widget had the
    /// observer armed. `path` is the event's element path, innermost
    /// first.
    pub fn notify_document_click(&self, path: &[NodeId]) {
        self.inner.handle_document_click(path);
    }
}

impl WidgetInner {
    /// Seed every store field before any subscriber exists, so wiring
    /// never observes a missing key.
    fn seed_state(&self) {
        self.put(Field::SelectedOption, Value::OptionRef(None));
        self.put(Field::HighlightedOption, Value::OptionRef(None));
        self.put(Field::IsOpen, Value::Bool(false));
        self.put(Field::SearchQuery, Value::Text(String::new()));
        self.put(Field::VisibleOptions, Value::OptionList(self.index.ids()));
        self.put(Field::DropDirection, Value::Direction(DropDirection::None));
        self.put(Field::HasValidValue, Value::Bool(false));
    }

    /// Connect the controllers to the store. Callbacks hold weak
    /// references so dropping the facade tears everything down.
    fn wire_subscribers(this: &Rc<Self>) {
        fn forward(
            this: &Rc<WidgetInner>,
            handler: impl Fn(&WidgetInner, &Value, Option<&Value>) + 'static,
        ) -> impl Fn(&Value, Option<&Value>) + 'static {
            let weak: Weak<WidgetInner> = Rc::downgrade(this);
            move |new, old| {
                if let Some(inner) = weak.upgrade() {
                    handler(&inner, new, old);
                }
            }
        }

        this.store
            .subscribe(Field::IsOpen, forward(this, WidgetInner::open_changed));
        this.store.subscribe(
            Field::SelectedOption,
            forward(this, WidgetInner::selection_changed),
        );
        this.store.subscribe(
            Field::HighlightedOption,
            forward(this, WidgetInner::highlight_changed),
        );
        this.store.subscribe(
            Field::DropDirection,
            forward(this, WidgetInner::drop_direction_changed),
        );
        this.store.subscribe(
            Field::HasValidValue,
            forward(this, WidgetInner::validity_changed),
        );
    }

    /// Store write that treats the depth-cap rejection as already
    /// reported (the store logs it).
    pub(crate) fn put(&self, field: Field, value: Value) {
        let _ = self.store.set(field, value);
    }

    pub(crate) fn is_open(&self) -> bool {
        self.store
            .get(Field::IsOpen)
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    pub(crate) fn selected_id(&self) -> Option<OptionId> {
        self.store
            .get(Field::SelectedOption)
            .and_then(|value| value.as_option_ref())
            .flatten()
    }

    pub(crate) fn highlighted_id(&self) -> Option<OptionId> {
        self.store
            .get(Field::HighlightedOption)
            .and_then(|value| value.as_option_ref())
            .flatten()
    }

    pub(crate) fn visible_ids(&self) -> Vec<OptionId> {
        self.store
            .get(Field::VisibleOptions)
            .and_then(|value| value.as_option_list().map(<[OptionId]>::to_vec))
            .unwrap_or_default()
    }

    pub(crate) fn search_query(&self) -> String {
        self.store
            .get(Field::SearchQuery)
            .and_then(|value| value.as_text().map(str::to_string))
            .unwrap_or_default()
    }
}
