use std::sync::{Arc, Mutex};

use selection::prelude::*;

fn build(registry: &Registry, config: SelectionConfig) -> Selection {
    Selection::builder(config)
        .sources(&["A", "B", "C"])
        .build(registry)
        .unwrap()
}

fn recorder(selection: &Selection) -> Arc<Mutex<Vec<NotificationKind>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    selection.subscribe(move |n: &Notification| {
        sink.lock().unwrap().push(n.kind);
        Verdict::Proceed
    });
    seen
}

// =============================================================================
// Notifications and vetoes
// =============================================================================

#[test]
fn test_open_close_notification_order() {
    let registry = Registry::new();
    let s = build(&registry, SelectionConfig::new(Mode::Single, "f"));
    let seen = recorder(&s);

    s.open();
    s.toggle_item(&ItemId::from("A")).unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            NotificationKind::Show,
            NotificationKind::Shown,
            NotificationKind::Change,
            NotificationKind::Hidden,
        ]
    );
}

#[test]
fn test_show_veto_keeps_closed() {
    let registry = Registry::new();
    let s = build(&registry, SelectionConfig::new(Mode::Multiple, "f"));
    s.subscribe(|n: &Notification| match n.kind {
        NotificationKind::Show => Verdict::Veto,
        _ => Verdict::Proceed,
    });

    assert_eq!(s.open(), Outcome::Vetoed);
    assert!(!s.is_open());
}

#[test]
fn test_hide_veto_keeps_other_open() {
    let registry = Registry::new();
    let sticky = build(&registry, SelectionConfig::new(Mode::Multiple, "a"));
    let other = build(&registry, SelectionConfig::new(Mode::Multiple, "b"));
    sticky.subscribe(|n: &Notification| match n.kind {
        NotificationKind::Hide => Verdict::Veto,
        _ => Verdict::Proceed,
    });

    sticky.open();
    other.open();
    assert!(sticky.is_open());
    assert!(other.is_open());

    let report = registry.close_all_except(None, None);
    assert_eq!(report.vetoed, vec![sticky.id()]);
    assert_eq!(report.closed, vec![other.id()]);
}

#[test]
fn test_listener_may_query_selection() {
    let registry = Registry::new();
    let s = build(&registry, SelectionConfig::new(Mode::Multiple, "f"));
    let probe = s.clone();
    let opened = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&opened);
    s.subscribe(move |n: &Notification| {
        if n.kind == NotificationKind::Shown {
            *sink.lock().unwrap() = Some(probe.is_open());
        }
        Verdict::Proceed
    });

    s.open();
    assert_eq!(*opened.lock().unwrap(), Some(true));
}

#[test]
fn test_close_is_idempotent() {
    let registry = Registry::new();
    let s = build(&registry, SelectionConfig::new(Mode::Single, "f"));
    let seen = recorder(&s);

    assert_eq!(s.close(), Outcome::Skipped);
    s.open();
    assert_eq!(s.close(), Outcome::Proceeded);
    assert_eq!(s.close(), Outcome::Skipped);

    let hidden = seen
        .lock()
        .unwrap()
        .iter()
        .filter(|k| **k == NotificationKind::Hidden)
        .count();
    assert_eq!(hidden, 1);
}

// =============================================================================
// Guards
// =============================================================================

#[test]
fn test_disabled_open_is_silent_noop() {
    let registry = Registry::new();
    let s = build(&registry, SelectionConfig::new(Mode::Single, "f").disabled());
    let seen = recorder(&s);

    assert_eq!(s.open(), Outcome::Skipped);
    assert_eq!(s.toggle(), Outcome::Skipped);
    assert!(!s.is_open());
    assert!(seen.lock().unwrap().is_empty());

    s.set_disabled(false);
    assert_eq!(s.open(), Outcome::Proceeded);
}

#[test]
fn test_open_reentry_only_refreshes() {
    let registry = Registry::new();
    let s = build(&registry, SelectionConfig::new(Mode::Multiple, "f"));
    let seen = recorder(&s);

    s.open();
    assert_eq!(s.open(), Outcome::Skipped);
    assert!(s.is_open());
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[test]
fn test_unknown_item_is_error() {
    let registry = Registry::new();
    let s = build(&registry, SelectionConfig::new(Mode::Single, "f"));
    let err = s.toggle_item(&ItemId::from("Z")).unwrap_err();
    assert!(matches!(err, SelectionError::UnknownItem(id) if id.as_str() == "Z"));
}

#[test]
fn test_duplicate_ids_rejected_at_build() {
    let registry = Registry::new();
    let result = Selection::builder(SelectionConfig::default())
        .sources(&["A", "A"])
        .build(&registry);
    assert!(matches!(result, Err(SelectionError::DuplicateItem(_))));
    assert!(registry.is_empty());
}

#[test]
fn test_zero_overflow_limit_rejected() {
    let registry = Registry::new();
    let result = Selection::builder(SelectionConfig::new(Mode::Multiple, "f").overflow_limit(0))
        .build(&registry);
    assert!(matches!(
        result,
        Err(SelectionError::Config(ConfigError::ZeroOverflowLimit))
    ));
}

// =============================================================================
// Generic dispatch
// =============================================================================

#[test]
fn test_invoke_by_name() {
    let registry = Registry::new();
    let s = build(&registry, SelectionConfig::new(Mode::Single, "f"));
    assert_eq!(s.invoke("open").unwrap(), Outcome::Proceeded);
    assert_eq!(s.invoke("close").unwrap(), Outcome::Proceeded);
    assert_eq!(s.invoke("refresh").unwrap(), Outcome::Proceeded);
}

#[test]
fn test_invoke_unknown_name_fails_loudly() {
    let registry = Registry::new();
    let s = build(&registry, SelectionConfig::new(Mode::Single, "f"));
    let err = s.invoke("selectAll").unwrap_err();
    assert!(matches!(&err, SelectionError::InvalidMethod(name) if name == "selectAll"));
    assert_eq!(err.to_string(), "No method named \"selectAll\"");
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_dispose_unregisters_and_ignores_input() {
    let registry = Registry::new();
    let s = build(&registry, SelectionConfig::new(Mode::Multiple, "f"));
    s.open();
    s.dispose();

    assert!(registry.is_empty());
    assert!(!s.is_open());
    assert!(s.is_disposed());
    assert_eq!(s.open(), Outcome::Skipped);
    s.toggle_item(&ItemId::from("A")).unwrap();
    assert!(s.checked().is_empty());
}

#[test]
fn test_dispose_by_name() {
    let registry = Registry::new();
    let s = build(&registry, SelectionConfig::new(Mode::Single, "f"));
    s.invoke("dispose").unwrap();
    assert!(registry.get(s.id()).is_none());
}

#[test]
fn test_selection_outlives_registry() {
    let registry = Registry::new();
    let s = build(&registry, SelectionConfig::new(Mode::Multiple, "f"));
    drop(registry);

    assert_eq!(s.open(), Outcome::Proceeded);
    assert_eq!(s.toggle(), Outcome::Proceeded);
    assert!(!s.is_open());
}

#[test]
fn test_set_items_reapplies_filter_and_relinks_range() {
    let registry = Registry::new();
    let s = Selection::builder(SelectionConfig::new(Mode::Range, "p"))
        .sources(&["10", "20", "30"])
        .build(&registry)
        .unwrap();
    s.open();
    s.toggle_item(&ItemId::from("10")).unwrap();
    s.toggle_item(&ItemId::from("30")).unwrap();

    s.set_items([
        Item::new("ten", "10", "10"),
        Item::new("thirty", "30", "30"),
    ])
    .unwrap();
    let state = s.range_state().unwrap();
    assert_eq!(state.min_item(), Some(&ItemId::from("ten")));
    assert_eq!(state.max_item(), Some(&ItemId::from("thirty")));

    let m = Selection::builder(SelectionConfig::new(Mode::Multiple, "m"))
        .sources(&["Apple", "Banana"])
        .build(&registry)
        .unwrap();
    m.apply_filter("an");
    m.set_items(["Mango", "Kiwi", "Banana"].into_iter().map(Item::labeled))
        .unwrap();
    let visible: Vec<String> = m.view().visible_items().map(|i| i.text.clone()).collect();
    assert_eq!(visible, vec!["Mango", "Banana"]);
}

#[test]
fn test_view_and_dirty_flag() {
    let registry = Registry::new();
    let s = build(
        &registry,
        SelectionConfig::new(Mode::Multiple, "f").label("Letters").cleanable(),
    );
    s.clear_dirty();
    s.open();
    s.toggle_item(&ItemId::from("B")).unwrap();
    assert!(s.is_dirty());

    let view = s.view();
    assert!(view.open);
    assert!(view.clean_button);
    assert_eq!(view.caption.to_string(), "Letters B");
    assert_eq!(view.form, vec![FormField::new("f", "B")]);
    assert_eq!(view.range, None);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["mode"], "multiple");
    assert_eq!(json["items"][1]["checked"], true);
}
