//! Derivation of the visible todo list from the view selection.
//!
//! The visible list is computed on every read: text filter, then status
//! filter, then sort. All functions here are pure.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use feruca::{Collator, Locale, Tailoring};

use crate::types::{FilterKind, SortKind, Todo};

/// Returns the todos matching `query` and `filter`, in collection order.
///
/// A query that is blank after trimming matches everything. Otherwise a todo
/// matches when its title or notes contain the query, ignoring case.
#[must_use]
pub fn filter_todos<'a>(todos: &'a [Todo], query: &str, filter: FilterKind) -> Vec<&'a Todo> {
    let needle = (!query.trim().is_empty()).then(|| query.to_lowercase());

    todos
        .iter()
        .filter(|todo| needle.as_deref().map_or(true, |n| matches_query(todo, n)))
        .filter(|todo| matches_filter(todo, filter))
        .collect()
}

/// Case-insensitive substring match on title or notes. `needle` is already lowercase.
fn matches_query(todo: &Todo, needle: &str) -> bool {
    todo.title.to_lowercase().contains(needle)
        || todo
            .notes
            .as_deref()
            .is_some_and(|notes| notes.to_lowercase().contains(needle))
}

fn matches_filter(todo: &Todo, filter: FilterKind) -> bool {
    match filter {
        FilterKind::All => true,
        FilterKind::Active => !todo.completed,
        FilterKind::Completed => todo.completed,
    }
}

/// Sorts todos in place. The sort is stable.
pub fn sort_todos(todos: &mut [&Todo], sort: SortKind) {
    match sort {
        SortKind::DueDate => todos.sort_by(|a, b| compare_due_dates(a.due_date, b.due_date)),
        SortKind::Alphabetical => {
            let mut collator = title_collator();
            todos.sort_by(|a, b| collator.collate(a.title.as_str(), b.title.as_str()));
        }
        SortKind::Default => todos.sort_by(|a, b| compare_default(a, b)),
    }
}

/// Applies the text filter, the status filter and the sort, in that order.
#[must_use]
pub fn visible_todos<'a>(
    todos: &'a [Todo],
    query: &str,
    filter: FilterKind,
    sort: SortKind,
) -> Vec<&'a Todo> {
    let mut visible = filter_todos(todos, query, filter);
    sort_todos(&mut visible, sort);
    visible
}

/// Earlier due dates first; todos without a due date go last.
fn compare_due_dates(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Builds the collator used for alphabetical order: CLDR root collation,
/// punctuation and spaces significant, byte order as the final tie-break.
fn title_collator() -> Collator {
    Collator::new(Tailoring::Cldr(Locale::Root), false, true)
}

/// Compares titles in locale order. Accents and case only decide between
/// titles whose letters are otherwise equal, and lowercase comes first.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use tickler_core::view::compare_titles;
///
/// assert_eq!(compare_titles("apple", "Banana"), Ordering::Less);
/// assert_eq!(compare_titles("apple", "Apple"), Ordering::Less);
/// assert_eq!(compare_titles("école", "Zebra"), Ordering::Less);
/// ```
#[must_use]
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    title_collator().collate(a, b)
}

/// Open todos first (newest created first), then completed todos (oldest
/// completion first, falling back to creation time).
fn compare_default(a: &Todo, b: &Todo) -> Ordering {
    match (a.completed, b.completed) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (false, false) => b.created_at.cmp(&a.created_at),
        (true, true) => {
            let a_done = a.completed_at.unwrap_or(a.created_at);
            let b_done = b.completed_at.unwrap_or(b.created_at);
            a_done.cmp(&b_done)
        }
    }
}
