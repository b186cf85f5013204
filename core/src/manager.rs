//! The todo collection manager.
//!
//! [`TodoManager`] owns the authoritative list of todos and the current view
//! selection (query, status filter, sort). Every mutation updates memory
//! first and then hands a snapshot to the [`Persistence`] adapter, whose
//! debounced write may land up to one debounce window later. Reads always
//! reflect the in-memory state.
//!
//! Operations on an unknown id are silent no-ops. Nothing here validates
//! titles or notes; see [`crate::validation`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tickler_core::manager::TodoManager;
//! use tickler_core::persistence::Persistence;
//! use tickler_core::storage::FileStore;
//! use tickler_core::types::{FilterKind, NewTodo};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(FileStore::new("/home/user/.tickler"));
//!     let mut manager = TodoManager::new(Persistence::new(store));
//!     manager.initialize().await;
//!
//!     let id = manager.add(NewTodo::titled("Buy milk"));
//!     manager.toggle_complete(&id);
//!     manager.set_filter(FilterKind::Completed);
//!
//!     for todo in manager.visible_todos() {
//!         println!("{} {}", todo.id, todo.title);
//!     }
//!
//!     manager.flush().await;
//! }
//! ```

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::persistence::Persistence;
use crate::types::{generate_todo_id, FilterKind, NewTodo, SortKind, Todo, TodoId, TodoPatch};
use crate::view;

/// Holds the todo collection and view selection.
///
/// The manager is a plain owned value: create one per process (or per test)
/// and pass it to whatever drives it.
#[derive(Debug)]
pub struct TodoManager {
    todos: Vec<Todo>,
    query: String,
    filter: FilterKind,
    sort: SortKind,
    /// The most recently deleted todo, for a single-step undo.
    last_deleted: Option<Todo>,
    persistence: Persistence,
}

impl TodoManager {
    /// Creates a manager with an empty collection and the default view
    /// selection. Call [`initialize`](Self::initialize) before first use.
    #[must_use]
    pub fn new(persistence: Persistence) -> Self {
        Self {
            todos: Vec::new(),
            query: String::new(),
            filter: FilterKind::default(),
            sort: SortKind::default(),
            last_deleted: None,
            persistence,
        }
    }

    /// Loads the persisted collection and replaces the in-memory list with it.
    ///
    /// An unreadable store yields an empty collection. The loaded collection
    /// is not written back, so a corrupt stored value stays on disk until the
    /// first mutation replaces it. This is where it departs from
    /// [`replace_all`](Self::replace_all), which persists.
    pub async fn initialize(&mut self) {
        let loaded = self.persistence.load_collection().await;
        self.todos = dedupe_ids(loaded);
        info!(count = self.todos.len(), "Todo collection initialized");
    }

    /// Adds a new todo and returns its id.
    pub fn add(&mut self, data: NewTodo) -> TodoId {
        let now = Utc::now();
        let mut todo = Todo::create(data, now);
        while self.contains(&todo.id) {
            todo.id = generate_todo_id(now);
        }

        let id = todo.id.clone();
        debug!(id = %id, "Todo added");
        self.todos.push(todo);
        self.persist();
        id
    }

    /// Merges `patch` into the todo with `id`.
    ///
    /// Returns `false` if no such todo exists. The collection is persisted
    /// either way.
    pub fn update(&mut self, id: &str, patch: TodoPatch) -> bool {
        let found = match self.todos.iter_mut().find(|t| t.id == id) {
            Some(todo) => {
                patch.apply(todo, Utc::now());
                debug!(id, "Todo updated");
                true
            }
            None => {
                debug!(id, "Update ignored, todo not found");
                false
            }
        };
        self.persist();
        found
    }

    /// Removes the todo with `id`, remembering it for
    /// [`restore_last_deleted`](Self::restore_last_deleted).
    ///
    /// Returns `false` if no such todo exists.
    pub fn delete(&mut self, id: &str) -> bool {
        let found = match self.todos.iter().position(|t| t.id == id) {
            Some(index) => {
                self.last_deleted = Some(self.todos.remove(index));
                debug!(id, "Todo deleted");
                true
            }
            None => {
                debug!(id, "Delete ignored, todo not found");
                false
            }
        };
        self.persist();
        found
    }

    /// Flips the completion flag of the todo with `id`, stamping
    /// `completed_at` when it becomes complete and clearing it otherwise.
    ///
    /// Returns `false` if no such todo exists.
    pub fn toggle_complete(&mut self, id: &str) -> bool {
        let found = match self.todos.iter_mut().find(|t| t.id == id) {
            Some(todo) => {
                todo.set_completed(!todo.completed, Utc::now());
                debug!(id, completed = todo.completed, "Todo toggled");
                true
            }
            None => {
                debug!(id, "Toggle ignored, todo not found");
                false
            }
        };
        self.persist();
        found
    }

    /// Replaces the whole collection, e.g. for a bulk import.
    ///
    /// Records whose id repeats an earlier record are dropped.
    pub fn replace_all(&mut self, todos: Vec<Todo>) {
        self.todos = dedupe_ids(todos);
        info!(count = self.todos.len(), "Todo collection replaced");
        self.persist();
    }

    /// Puts the most recently deleted todo back and returns its id.
    ///
    /// The todo keeps its original id and timestamps unless the id has been
    /// reused since, in which case it gets a fresh one. Returns `None` when
    /// there is nothing to restore.
    pub fn restore_last_deleted(&mut self) -> Option<TodoId> {
        let mut todo = self.last_deleted.take()?;
        while self.contains(&todo.id) {
            todo.id = generate_todo_id(Utc::now());
        }

        let id = todo.id.clone();
        debug!(id = %id, "Deleted todo restored");
        self.todos.push(todo);
        self.persist();
        Some(id)
    }

    /// The todo that [`restore_last_deleted`](Self::restore_last_deleted) would bring back.
    #[must_use]
    pub fn last_deleted(&self) -> Option<&Todo> {
        self.last_deleted.as_ref()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn set_filter(&mut self, filter: FilterKind) {
        self.filter = filter;
    }

    pub fn set_sort(&mut self, sort: SortKind) {
        self.sort = sort;
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn filter(&self) -> FilterKind {
        self.filter
    }

    #[must_use]
    pub fn sort(&self) -> SortKind {
        self.sort
    }

    /// The full collection in storage order.
    #[must_use]
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// The todos to display under the current query, filter and sort.
    ///
    /// Recomputed on every call; does not change any state.
    #[must_use]
    pub fn visible_todos(&self) -> Vec<&Todo> {
        view::visible_todos(&self.todos, &self.query, self.filter, self.sort)
    }

    /// The persistence adapter, e.g. for the theme preference.
    #[must_use]
    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    /// Writes any pending snapshot now and waits for it.
    pub async fn flush(&self) {
        self.persistence.flush().await;
    }

    fn contains(&self, id: &str) -> bool {
        self.todos.iter().any(|t| t.id == id)
    }

    fn persist(&self) {
        self.persistence.save_collection(&self.todos);
    }
}

/// Drops records whose id was already seen, keeping the first occurrence.
fn dedupe_ids(todos: Vec<Todo>) -> Vec<Todo> {
    let mut seen = HashSet::with_capacity(todos.len());
    let before = todos.len();

    let unique: Vec<Todo> = todos
        .into_iter()
        .filter(|todo| seen.insert(todo.id.clone()))
        .collect();

    if unique.len() != before {
        warn!(
            dropped = before - unique.len(),
            "Dropped todos with duplicate ids"
        );
    }
    unique
}
