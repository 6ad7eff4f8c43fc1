#![forbid(unsafe_code)]

//! End-to-end widget scenarios through the public API and the fake hosts.
//!
//! Proves that:
//! 1. The widget and the native control agree on the value after every
//!    committed selection, across whole interaction sequences
//! 2. The highlight cursor is always absent or a member of the visible set
//! 3. Search filtering, keyboard navigation, and selection compose the way
//!    a user experiences them (type, arrow, Enter)
//! 4. Open/close round-trips restore all transient state
//! 5. Widget instances on one page stay fully independent
//!
//! Run:
//!   cargo test -p droplist --test widget_scenarios

use std::rc::Rc;

use droplist::test_support::{FakeSelect, FakeView};
use droplist::{
    DropDirection, KeyCode, KeyEvent, KeyResponse, NodeId, Rect, SelectWidget, WidgetConfig,
    WidgetView,
};
use web_time::{Duration, Instant};

const SEARCH_DELAY: Duration = Duration::from_millis(250);

fn attach(
    options: &[(&str, &str)],
) -> (SelectWidget, Rc<FakeSelect>, Rc<FakeView>) {
    let select = Rc::new(FakeSelect::new(options));
    let view = Rc::new(FakeView::new());
    let widget =
        SelectWidget::attach(select.clone(), view.clone(), WidgetConfig::default()).unwrap();
    (widget, select, view)
}

fn attach_numbered(count: usize) -> (SelectWidget, Rc<FakeSelect>, Rc<FakeView>) {
    let owned: Vec<(String, String)> = (0..count)
        .map(|i| (format!("v{i}"), format!("Entry {i}")))
        .collect();
    let pairs: Vec<(&str, &str)> = owned
        .iter()
        .map(|(value, label)| (value.as_str(), label.as_str()))
        .collect();
    attach(&pairs)
}

/// Type into the search field and let the debounce window elapse.
fn search(widget: &SelectWidget, view: &FakeView, text: &str) {
    let now = Instant::now();
    view.type_search(text);
    widget.notify_search_input(now);
    widget.on_tick(now + SEARCH_DELAY);
}

/// The cross-entity invariant plus the highlight-visibility invariant.
fn assert_invariants(widget: &SelectWidget, select: &FakeSelect) {
    assert_eq!(
        widget.value(),
        select.current_value(),
        "declared value and native value must agree"
    );
    if widget.is_open()
        && let Some(highlighted) = widget.highlighted_option()
    {
        assert!(
            widget.visible_options().contains(&highlighted),
            "highlight must be a member of the visible set"
        );
    }
}

fn key(widget: &SelectWidget, code: KeyCode) -> KeyResponse {
    widget.handle_key(KeyEvent::new(code))
}

// ============================================================================
// 1. Initial synchronization
// ============================================================================

#[test]
fn attach_commits_and_synchronizes_the_initial_selection() {
    let (widget, select, view) = attach(&[("se", "Sweden"), ("ch", "Switzerland")]);
    assert_eq!(widget.value(), "se");
    assert_eq!(select.current_value(), "se");
    assert_eq!(select.selected_position(), Some(0));
    assert_eq!(view.option_text(0), "Sweden");
    assert!(widget.has_valid_value());
    assert_invariants(&widget, &select);
}

// ============================================================================
// 2. Scenario A: duplicate option values
// ============================================================================

#[test]
fn duplicate_value_option_is_excluded_and_its_element_hidden() {
    let owned: Vec<(String, String)> = (0..20)
        .map(|i| {
            if i == 7 {
                // Child 7 reuses child 3's value.
                ("v3".to_string(), "Duplicate of three".to_string())
            } else {
                (format!("v{i}"), format!("Entry {i}"))
            }
        })
        .collect();
    let pairs: Vec<(&str, &str)> = owned
        .iter()
        .map(|(value, label)| (value.as_str(), label.as_str()))
        .collect();
    let (widget, select, view) = attach(&pairs);

    assert_eq!(widget.options().len(), 19);
    assert!(view.option_hidden(7));
    assert!(!view.option_hidden(3));
    assert_eq!(widget.options().id_by_value("v3").map(|id| {
        widget.options().get(id).unwrap().display_text().to_string()
    }), Some("Entry 3".to_string()));
    assert_invariants(&widget, &select);
}

// ============================================================================
// 3. Scenario B: search filtering
// ============================================================================

#[test]
fn typing_sw_filters_to_the_three_sw_countries_in_order() {
    let (widget, select, view) = attach(&[
        ("se", "Sweden"),
        ("ch", "Switzerland"),
        ("sz", "Swaziland"),
        ("tw", "Taiwan"),
    ]);
    view.type_search("");
    widget.open();
    search(&widget, &view, "sw");

    let labels: Vec<String> = widget
        .visible_options()
        .iter()
        .map(|&id| widget.options().get(id).unwrap().display_text().to_string())
        .collect();
    assert_eq!(labels, vec!["Sweden", "Switzerland", "Swaziland"]);

    let highlighted = widget.highlighted_option().unwrap();
    assert_eq!(
        widget.options().get(highlighted).unwrap().display_text(),
        "Sweden"
    );
    assert!(view.option_hidden(3));
    assert_invariants(&widget, &select);
}

#[test]
fn debounce_coalesces_rapid_keystrokes_into_one_filter_run() {
    let (widget, _select, view) = attach(&[
        ("se", "Sweden"),
        ("ch", "Switzerland"),
        ("tw", "Taiwan"),
    ]);
    view.type_search("");
    widget.open();
    let t0 = Instant::now();

    view.type_search("s");
    widget.notify_search_input(t0);
    view.type_search("sw");
    widget.notify_search_input(t0 + Duration::from_millis(100));

    // The first keystroke's window was superseded; nothing ran yet.
    widget.on_tick(t0 + SEARCH_DELAY);
    assert_eq!(widget.visible_options().len(), 3);

    // After quiescence the filter runs once, against the final text.
    widget.on_tick(t0 + Duration::from_millis(100) + SEARCH_DELAY);
    assert_eq!(widget.visible_options().len(), 2);
}

#[test]
fn clearing_the_search_restores_all_options_and_the_selection_cursor() {
    let (widget, select, view) = attach(&[
        ("se", "Sweden"),
        ("ch", "Switzerland"),
        ("tw", "Taiwan"),
    ]);
    view.type_search("");
    widget.open();
    search(&widget, &view, "taiwan");
    assert_eq!(widget.visible_options().len(), 1);

    search(&widget, &view, "");
    assert_eq!(widget.visible_options().len(), 3);
    assert_eq!(widget.highlighted_option(), widget.selected_option());
    assert_invariants(&widget, &select);
}

// ============================================================================
// 4. Scenario C: keyboard navigation and commit
// ============================================================================

#[test]
fn four_arrow_downs_then_enter_selects_the_fifth_visible_option() {
    let (widget, select, view) = attach_numbered(10);
    view.type_search("");
    widget.open();
    assert_eq!(widget.visible_options().len(), 10);

    // The cursor opens on the selection at index 0.
    let visible = widget.visible_options();
    assert_eq!(widget.highlighted_option(), Some(visible[0]));

    for _ in 0..4 {
        assert_eq!(key(&widget, KeyCode::ArrowDown), KeyResponse::Handled);
        assert_invariants(&widget, &select);
    }
    assert_eq!(widget.highlighted_option(), Some(visible[4]));

    assert_eq!(key(&widget, KeyCode::Enter), KeyResponse::Handled);
    assert!(!widget.is_open());
    assert_eq!(widget.value(), "v4");
    assert_eq!(select.current_value(), "v4");
    assert_eq!(select.selected_position(), Some(4));
    assert!(widget.has_valid_value());
    assert_invariants(&widget, &select);
}

#[test]
fn navigation_clamps_at_both_ends_of_the_visible_set() {
    let (widget, select, view) = attach_numbered(5);
    view.type_search("");
    widget.open();
    let visible = widget.visible_options();

    for _ in 0..12 {
        key(&widget, KeyCode::ArrowDown);
    }
    assert_eq!(widget.highlighted_option(), Some(visible[4]));

    for _ in 0..12 {
        key(&widget, KeyCode::ArrowUp);
    }
    assert_eq!(widget.highlighted_option(), Some(visible[0]));
    assert_invariants(&widget, &select);
}

#[test]
fn enter_without_an_open_dropdown_commits_nothing() {
    let (widget, select, _view) = attach_numbered(3);
    assert_eq!(key(&widget, KeyCode::Enter), KeyResponse::Handled);
    assert_eq!(widget.value(), "v0");
    assert!(!widget.is_open());
    assert_invariants(&widget, &select);
}

#[test]
fn escape_closes_and_unmapped_keys_pass_through() {
    let (widget, _select, view) = attach_numbered(3);
    view.type_search("");
    widget.open();

    assert_eq!(key(&widget, KeyCode::Char('a')), KeyResponse::Ignored);
    assert!(widget.is_open());

    assert_eq!(key(&widget, KeyCode::Escape), KeyResponse::Handled);
    assert!(!widget.is_open());
    // Escape while closed stays a handled no-op.
    assert_eq!(key(&widget, KeyCode::Escape), KeyResponse::Handled);
    assert!(!widget.is_open());
}

// ============================================================================
// 5. Scenario D: close-on-reselect
// ============================================================================

#[test]
fn programmatic_reselection_of_the_same_value_still_closes() {
    let (widget, select, _view) = attach_numbered(5);
    assert!(widget.select_by_value("v2"));
    assert!(!widget.is_open());

    widget.open();
    assert!(widget.is_open());
    assert!(widget.select_by_value("v2"));
    assert!(!widget.is_open());
    assert_eq!(select.current_value(), "v2");
    assert_invariants(&widget, &select);
}

// ============================================================================
// 6. Open/close round-trip
// ============================================================================

#[test]
fn open_close_round_trip_restores_all_transient_state() {
    let (widget, select, view) = attach_numbered(30);
    // Park the widget low in the viewport so opening picks a direction.
    view.set_widget_rect(Rect::new(0.0, 700.0, 300.0, 40.0));
    view.type_search("");
    widget.open();
    assert_eq!(widget.drop_direction(), DropDirection::Up);

    // Navigate far enough that the option container actually scrolled.
    for _ in 0..20 {
        key(&widget, KeyCode::ArrowDown);
    }
    assert!(view.scroll_position() > 0.0);

    widget.close();
    assert!(!widget.is_open());
    assert_eq!(widget.highlighted_option(), None);
    assert_eq!(widget.drop_direction(), DropDirection::None);
    assert_eq!(view.scroll_position(), 0.0);
    assert_invariants(&widget, &select);
}

#[test]
fn open_and_close_commands_are_idempotent() {
    let (widget, _select, view) = attach_numbered(3);
    widget.close();
    assert!(!widget.is_open());

    view.type_search("");
    widget.open();
    widget.open();
    assert!(widget.is_open());
    widget.close();
    widget.close();
    assert!(!widget.is_open());
}

// ============================================================================
// 7. Outside-click dismissal and instance independence
// ============================================================================

#[test]
fn clicks_outside_the_widget_and_label_close_it() {
    let (widget, _select, view) = attach_numbered(3);
    view.type_search("");
    widget.open();

    widget.notify_document_click(&[view.root()]);
    assert!(widget.is_open());
    widget.notify_document_click(&[view.label()]);
    assert!(widget.is_open());
    widget.notify_document_click(&[NodeId::new(4242)]);
    assert!(!widget.is_open());
}

#[test]
fn widget_instances_share_no_state() {
    let (first, first_select, first_view) = attach_numbered(3);
    let (second, second_select, _second_view) = attach_numbered(3);

    first_view.type_search("");
    first.open();
    assert!(second.select_by_value("v2"));

    // The second widget's selection never leaks into the first.
    assert_eq!(first.value(), "v0");
    assert_eq!(second.value(), "v2");
    assert_eq!(first_select.current_value(), "v0");
    assert_eq!(second_select.current_value(), "v2");

    // A click inside the first widget does not close it, and means
    // nothing to the (closed) second widget.
    second.notify_document_click(&[first_view.root()]);
    assert!(first.is_open());
    assert!(!second.is_open());
}

// ============================================================================
// 8. Continuous value consistency
// ============================================================================

#[test]
fn value_stays_synchronized_across_a_full_interaction_sequence() {
    let (widget, select, view) = attach(&[
        ("se", "Sweden"),
        ("ch", "Switzerland"),
        ("sz", "Swaziland"),
        ("tw", "Taiwan"),
    ]);
    assert_invariants(&widget, &select);

    view.type_search("");
    widget.open();
    assert_invariants(&widget, &select);

    search(&widget, &view, "sw");
    assert_invariants(&widget, &select);

    key(&widget, KeyCode::ArrowDown);
    assert_invariants(&widget, &select);

    key(&widget, KeyCode::Enter);
    assert_eq!(widget.value(), "ch");
    assert_invariants(&widget, &select);

    widget.select_by_value("tw");
    assert_invariants(&widget, &select);
    assert_eq!(select.current_value(), "tw");

    view.type_search("");
    widget.open();
    widget.notify_document_click(&[NodeId::new(999)]);
    assert!(!widget.is_open());
    assert_invariants(&widget, &select);
}

// ============================================================================
// 9. Pointer interaction
// ============================================================================

#[test]
fn hovering_highlights_and_clicking_commits() {
    let (widget, select, view) = attach_numbered(5);
    view.type_search("");
    widget.open();

    let third = view.option_id_at(2);
    widget.notify_option_hover(third);
    assert_eq!(widget.highlighted_option(), Some(third));
    assert_invariants(&widget, &select);

    widget.notify_option_click(third);
    assert!(!widget.is_open());
    assert_eq!(widget.value(), "v2");
    assert_invariants(&widget, &select);
}

#[test]
fn label_and_trigger_drive_open_state() {
    let (widget, _select, view) = attach_numbered(3);
    view.type_search("");

    widget.notify_label_click();
    assert!(widget.is_open());
    assert!(view.search_focused());
    assert!(view.search_text_selected());

    widget.notify_trigger_click();
    assert!(!widget.is_open());
    widget.notify_trigger_click();
    assert!(widget.is_open());

    widget.notify_search_click();
    assert!(widget.is_open());
}

// ============================================================================
// 10. Stale search text reconciliation on open
// ============================================================================

#[test]
fn reopening_reconciles_visibility_with_the_search_field() {
    let (widget, _select, view) = attach(&[
        ("se", "Sweden"),
        ("ch", "Switzerland"),
        ("tw", "Taiwan"),
    ]);
    view.type_search("");
    widget.open();
    search(&widget, &view, "taiwan");
    assert_eq!(widget.visible_options().len(), 1);
    widget.close();

    // The user cleared the field while closed; the debounced run never
    // fired. Opening re-runs the filter against the current text.
    view.type_search("");
    widget.open();
    assert_eq!(widget.visible_options().len(), 3);
}
