//! Integration tests for the todo collection manager.
//!
//! These tests drive the manager through its public API the way a front end
//! would, checking the visible list after each step.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tickler_core::storage::MemoryStore;
use tickler_core::types::{FilterKind, NewTodo, SortKind, TodoPatch};
use tickler_core::{Persistence, TodoManager};

// =============================================================================
// Test Helpers
// =============================================================================

/// Creates a manager backed by an in-memory store with a short debounce window.
fn create_test_manager() -> (Arc<MemoryStore>, TodoManager) {
    let store = Arc::new(MemoryStore::new());
    let persistence = Persistence::with_debounce(store.clone(), Duration::from_millis(20));
    (store, TodoManager::new(persistence))
}

fn visible_titles(manager: &TodoManager) -> Vec<String> {
    manager
        .visible_todos()
        .iter()
        .map(|t| t.title.clone())
        .collect()
}

/// Adds a mix of open and completed todos.
fn seed(manager: &mut TodoManager) {
    let t0 = Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap();

    manager.add(NewTodo::titled("Buy milk").with_notes("Oat, not dairy"));
    manager.add(NewTodo::titled("Walk dog").completed_at(t0));
    manager.add(NewTodo::titled("answer email"));
    manager.add(NewTodo::titled("File taxes").with_due_date(t0));
    manager.add(NewTodo::titled("Book dentist").completed_at(t0 + chrono::Duration::hours(1)));
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_incomplete_todo_listed_before_completed() {
    let (_, mut manager) = create_test_manager();
    let t0 = Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap();

    let a = manager.add(NewTodo::titled("Buy milk"));
    let b = manager.add(NewTodo::titled("Walk dog").completed_at(t0));

    manager.set_filter(FilterKind::All);
    manager.set_sort(SortKind::Default);

    let ids: Vec<_> = manager.visible_todos().iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, vec![a, b]);
    assert_eq!(manager.get(&ids[1]).unwrap().completed_at, Some(t0));
}

#[tokio::test]
async fn test_query_narrows_to_matching_todo() {
    let (_, mut manager) = create_test_manager();
    let t0 = Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap();

    let a = manager.add(NewTodo::titled("Buy milk"));
    manager.add(NewTodo::titled("Walk dog").completed_at(t0));

    manager.set_query("milk");

    let visible = manager.visible_todos();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, a);
}

#[tokio::test]
async fn test_query_searches_notes() {
    let (_, mut manager) = create_test_manager();
    seed(&mut manager);

    manager.set_query("OAT");
    assert_eq!(visible_titles(&manager), vec!["Buy milk"]);

    manager.set_query("");
    assert_eq!(manager.visible_todos().len(), 5);
}

#[tokio::test]
async fn test_add_is_visible_immediately() {
    let (store, mut manager) = create_test_manager();

    manager.add(NewTodo::titled("Right away"));

    // Storage has not been written yet, memory already has the todo
    assert_eq!(store.write_count(), 0);
    assert_eq!(visible_titles(&manager), vec!["Right away"]);
}

#[tokio::test]
async fn test_status_filters_never_leak() {
    let (_, mut manager) = create_test_manager();
    seed(&mut manager);

    manager.set_filter(FilterKind::Active);
    let active = manager.visible_todos();
    assert_eq!(active.len(), 3);
    assert!(active.iter().all(|t| !t.completed));

    manager.set_filter(FilterKind::Completed);
    let completed = manager.visible_todos();
    assert_eq!(completed.len(), 2);
    assert!(completed.iter().all(|t| t.completed));
}

#[tokio::test]
async fn test_completed_listed_oldest_completion_first() {
    let (_, mut manager) = create_test_manager();
    seed(&mut manager);

    manager.set_filter(FilterKind::Completed);
    assert_eq!(visible_titles(&manager), vec!["Walk dog", "Book dentist"]);
}

#[tokio::test]
async fn test_alphabetical_order() {
    let (_, mut manager) = create_test_manager();
    seed(&mut manager);

    manager.set_sort(SortKind::Alphabetical);
    let titles = visible_titles(&manager);

    assert_eq!(
        titles,
        vec!["answer email", "Book dentist", "Buy milk", "File taxes", "Walk dog"]
    );
}

#[tokio::test]
async fn test_alphabetical_order_with_accents_and_case() {
    let (_, mut manager) = create_test_manager();
    for title in ["Zebra", "Éclair", "Apple", "apple", "école"] {
        manager.add(NewTodo::titled(title));
    }

    manager.set_sort(SortKind::Alphabetical);
    assert_eq!(
        visible_titles(&manager),
        vec!["apple", "Apple", "Éclair", "école", "Zebra"]
    );
}

#[tokio::test]
async fn test_due_date_order_puts_undated_last() {
    let (_, mut manager) = create_test_manager();
    seed(&mut manager);

    manager.set_sort(SortKind::DueDate);
    let titles = visible_titles(&manager);

    assert_eq!(titles[0], "File taxes");
    assert_eq!(titles.len(), 5);
}

#[tokio::test]
async fn test_visible_todos_is_repeatable() {
    let (_, mut manager) = create_test_manager();
    seed(&mut manager);
    manager.set_sort(SortKind::Alphabetical);

    let first = visible_titles(&manager);
    let second = visible_titles(&manager);
    assert_eq!(first, second);
    assert_eq!(manager.todos().len(), 5);
}

#[tokio::test]
async fn test_edit_then_toggle_keeps_identity() {
    let (_, mut manager) = create_test_manager();
    let id = manager.add(NewTodo::titled("Draft"));
    let created_at = manager.get(&id).unwrap().created_at;

    manager.update(
        &id,
        TodoPatch {
            title: Some("Final".to_string()),
            notes: Some(Some("ship it".to_string())),
            ..TodoPatch::default()
        },
    );
    manager.toggle_complete(&id);

    let todo = manager.get(&id).unwrap();
    assert_eq!(todo.title, "Final");
    assert_eq!(todo.notes.as_deref(), Some("ship it"));
    assert_eq!(todo.created_at, created_at);
    assert!(todo.completed);
}

#[tokio::test]
async fn test_past_due_date_accepted_verbatim() {
    let (_, mut manager) = create_test_manager();
    let past = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 0).unwrap();

    let id = manager.add(NewTodo::titled("Party").with_due_date(past));

    let todo = manager.get(&id).unwrap();
    assert_eq!(todo.due_date, Some(past));
    assert!(todo.is_overdue(Utc::now()));
}

#[tokio::test]
async fn test_invalid_input_stored_when_validation_bypassed() {
    let (_, mut manager) = create_test_manager();

    let id = manager.add(NewTodo::titled(""));
    assert_eq!(manager.get(&id).unwrap().title, "");

    let long = "x".repeat(1_000);
    manager.update(
        &id,
        TodoPatch {
            title: Some(long.clone()),
            ..TodoPatch::default()
        },
    );
    assert_eq!(manager.get(&id).unwrap().title, long);
}

#[tokio::test]
async fn test_delete_and_undo() {
    let (_, mut manager) = create_test_manager();
    seed(&mut manager);
    let victim = manager
        .todos()
        .iter()
        .find(|t| t.title == "Buy milk")
        .map(|t| t.id.clone())
        .unwrap();

    assert!(manager.delete(&victim));
    assert!(!visible_titles(&manager).contains(&"Buy milk".to_string()));

    // Everything on the deleted id is a quiet no-op
    assert!(!manager.toggle_complete(&victim));
    assert!(!manager.update(&victim, TodoPatch::default()));
    assert!(!manager.delete(&victim));

    assert_eq!(manager.restore_last_deleted(), Some(victim.clone()));
    assert_eq!(manager.get(&victim).unwrap().notes.as_deref(), Some("Oat, not dairy"));
}
