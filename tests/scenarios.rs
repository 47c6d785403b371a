//! End-to-end persisted-value scenarios through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use persisted_state::{
    AbsentValuePolicy, Diagnostic, DiagnosticKind, DiagnosticSink, KeyValueStore, MemoryStore, PersistedValueStore,
    SetValue, StoreConfig, WriteOutcome,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Preferences {
    dark_mode: bool,
    left_panel_width: f64,
    recent_boards: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self { dark_mode: false, left_panel_width: 160.0, recent_boards: Vec::new() }
    }
}

fn counting_sink(counter: &Rc<RefCell<Vec<DiagnosticKind>>>) -> Box<dyn DiagnosticSink> {
    let counter = Rc::clone(counter);
    Box::new(move |d: &Diagnostic| counter.borrow_mut().push(d.kind))
}

#[test]
fn preferences_survive_a_reload() {
    let backend = MemoryStore::new();

    {
        let store = PersistedValueStore::new(backend.clone());
        let mut prefs = store.acquire(Preferences::default(), "prefs").unwrap();
        prefs.update(|p| Preferences { dark_mode: true, ..p.clone() });
        prefs.update(|p| {
            let mut next = p.clone();
            next.recent_boards.push("board-1".to_owned());
            next
        });
    }

    // A fresh store over the same backend models a new session.
    let store = PersistedValueStore::new(backend);
    let prefs = store.acquire(Preferences::default(), "prefs").unwrap();
    assert!(prefs.value().dark_mode);
    assert_eq!(prefs.value().recent_boards, vec!["board-1".to_owned()]);
}

#[test]
fn full_store_forgets_across_sessions_but_not_within_one() {
    let backend = MemoryStore::with_quota(24);
    let reports = Rc::new(RefCell::new(Vec::new()));
    let store = PersistedValueStore::from_parts(backend.clone(), StoreConfig::default(), Some(counting_sink(&reports)));

    let mut note = store.acquire(String::new(), "note").unwrap();
    assert_eq!(note.set("short".to_owned()), WriteOutcome::Persisted);
    assert_eq!(note.set("this note is much longer than the quota".to_owned()), WriteOutcome::Failed);
    assert_eq!(note.value(), "this note is much longer than the quota");
    drop(note);

    let reloaded = PersistedValueStore::new(backend).read("note", String::new());
    assert_eq!(reloaded, "short");
    assert_eq!(*reports.borrow(), vec![DiagnosticKind::StoreWriteFailure]);
}

#[test]
fn disabled_store_still_behaves_in_memory() {
    let backend = MemoryStore::new();
    backend.set_unavailable(true);
    let reports = Rc::new(RefCell::new(Vec::new()));
    let store = PersistedValueStore::from_parts(backend, StoreConfig::default(), Some(counting_sink(&reports)));

    let mut counter = store.acquire(0_u32, "visits").unwrap();
    counter.apply(SetValue::update(|n: &u32| n + 1));
    counter.apply(SetValue::update(|n: &u32| n + 1));

    assert_eq!(*counter.value(), 2);
    assert_eq!(
        *reports.borrow(),
        vec![DiagnosticKind::StoreUnavailable, DiagnosticKind::StoreUnavailable, DiagnosticKind::StoreUnavailable]
    );
}

#[test]
fn corrupted_entry_recovers_on_next_write() {
    let backend = MemoryStore::new();
    backend.insert_raw("prefs", "{\"dark_mode\": tru");
    let store = PersistedValueStore::from_parts(backend.clone(), StoreConfig::default(), None);

    let mut prefs = store.acquire(Preferences::default(), "prefs").unwrap();
    assert_eq!(*prefs.value(), Preferences::default());

    prefs.update(|p| Preferences { left_panel_width: 240.0, ..p.clone() });
    let stored: Preferences = serde_json::from_str(&backend.raw("prefs").unwrap()).unwrap();
    assert_eq!(stored.left_panel_width, 240.0);
}

#[test]
fn clearing_an_optional_value_falls_back_to_default_next_session() {
    let backend = MemoryStore::new();
    let store = PersistedValueStore::from_parts(backend.clone(), StoreConfig::default(), None);
    let mut board = store.acquire(Some("board-1".to_owned()), "last_board").unwrap();

    board.set(Some("board-2".to_owned()));
    assert_eq!(backend.raw("last_board").as_deref(), Some("\"board-2\""));
    assert_eq!(board.set(None), WriteOutcome::Removed);
    assert_eq!(backend.get("last_board").unwrap(), None);
    drop(board);

    let next = store.read("last_board", Some("fallback".to_owned()));
    assert_eq!(next.as_deref(), Some("fallback"));
}

#[test]
fn skip_policy_keeps_last_stored_value_after_clearing() {
    let backend = MemoryStore::new();
    let config = StoreConfig::default().with_absent_policy(AbsentValuePolicy::Skip);
    let store = PersistedValueStore::from_parts(backend.clone(), config, None);
    let mut board = store.acquire(None::<String>, "last_board").unwrap();

    board.set(Some("board-2".to_owned()));
    assert_eq!(board.set(None), WriteOutcome::Skipped);
    assert_eq!(board.value(), &None);
    assert_eq!(backend.raw("last_board").as_deref(), Some("\"board-2\""));
}

#[test]
fn two_consumers_stay_in_step_through_subscriptions() {
    let store = PersistedValueStore::from_parts(MemoryStore::new(), StoreConfig::default(), None);
    let mirrored = Rc::new(RefCell::new(String::from("default")));

    let sink = Rc::clone(&mirrored);
    let _sub = store.subscribe::<String, _>("testKey", move |value| {
        *sink.borrow_mut() = value.unwrap_or_else(|| "default".to_owned());
    });

    let mut editor = store.acquire("default".to_owned(), "testKey").unwrap();
    editor.set("newValue".to_owned());
    assert_eq!(*mirrored.borrow(), "newValue");

    store.remove("testKey");
    assert_eq!(*mirrored.borrow(), "default");
}

#[test]
fn namespaces_isolate_stores_sharing_a_backend() {
    let backend = MemoryStore::new();
    let board = PersistedValueStore::from_parts(
        backend.clone(),
        StoreConfig::default().with_namespace("board"),
        None,
    );
    let chat = PersistedValueStore::from_parts(backend.clone(), StoreConfig::default().with_namespace("chat"), None);

    board.write("draft", "shapes");
    chat.write("draft", "hello");

    assert_eq!(board.read("draft", String::new()), "shapes");
    assert_eq!(chat.read("draft", String::new()), "hello");
    assert_eq!(backend.keys(), vec!["board:draft".to_owned(), "chat:draft".to_owned()]);
}
