#![forbid(unsafe_code)]

//! Accessible select-replacement dropdown core.
//!
//! `droplist` progressively enhances a native single-select form control
//! into a richer dropdown with keyboard navigation, text search, and
//! open/close state, while the original control stays the source of truth
//! for form submission.
//!
//! The core is headless: it owns the widget state machine and its
//! synchronized view-model, and reaches the outside world only through two
//! traits the host implements: [`NativeSelect`] for the borrowed native
//! control and [`WidgetView`] for the generated presentation. A DOM
//! binding, a server-side renderer, and the test harness all drive the
//! same state machine.
//!
//! # Architecture
//!
//! All mutation funnels through the reactive [`Store`]: user input relayed
//! by the host calls `set`, and the controllers (open/close, selection
//! synchronizer, highlight, validity) subscribe to the fields they care
//! about and produce view side effects. The store's publish/subscribe
//! boundary is the sole integration seam between widget logic and
//! presentation.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use droplist::test_support::{FakeSelect, FakeView};
//! use droplist::{SelectWidget, WidgetConfig};
//!
//! let select = Rc::new(FakeSelect::new(&[
//!     ("se", "Sweden"),
//!     ("ch", "Switzerland"),
//! ]));
//! let view = Rc::new(FakeView::new());
//! let widget = SelectWidget::attach(select.clone(), view, WidgetConfig::default()).unwrap();
//!
//! widget.open();
//! assert!(widget.is_open());
//! assert_eq!(widget.value(), select.current_value());
//! ```

mod dropdown;
mod filter;
mod nav;
mod selection;

pub mod host;
pub mod keymap;
pub mod options;
pub mod state;
pub mod store;
pub mod widget;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use droplist_core::{Debouncer, Diag, DiagLevel, KeyCode, KeyEvent, Modifiers, Rect};
pub use host::{NativeEntry, NativeSelect, NodeId, OptionBounds, ScrollBehavior, WidgetView};
pub use keymap::{KeyAction, KeyResponse};
pub use options::{OptionEntry, OptionId, OptionIndex, RejectReason};
pub use state::{DropDirection, Field, Value};
pub use store::{Store, StoreError, SubscriptionId};
pub use widget::{AttachError, SelectWidget, WidgetConfig};
