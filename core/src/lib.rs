//! Tickler - personal todo collection manager.
//!
//! This crate holds the state behind a small todo application: the todo
//! collection, the view selection used to display it, and debounced local
//! persistence.
//!
//! # Overview
//!
//! A [`TodoManager`] owns the collection. Callers mutate it through
//! add/update/delete/toggle operations and read it back through
//! [`TodoManager::visible_todos`], which applies the current text query,
//! status filter and sort. Each mutation hands a snapshot to the
//! [`Persistence`] adapter, which coalesces bursts into a single write to a
//! [`KeyValueStore`].
//!
//! # Modules
//!
//! - [`types`]: Todo record, patches and view-selection kinds
//! - [`view`]: Pure filter and sort functions
//! - [`manager`]: The todo collection manager
//! - [`persistence`]: Debounced storage of todos and the theme preference
//! - [`storage`]: Key-value store backends (file and in-memory)
//! - [`validation`]: Title and notes checks for user input
//! - [`config`]: Configuration from environment variables
//! - [`error`]: Error types
//! - [`utils`]: Shared utilities (debouncing)

pub mod config;
pub mod error;
pub mod manager;
pub mod persistence;
pub mod storage;
pub mod types;
pub mod utils;
pub mod validation;
pub mod view;

pub use config::{Config, ConfigError};
pub use error::{Result, TicklerError};
pub use manager::TodoManager;
pub use persistence::{Persistence, THEME_KEY, TODOS_KEY};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use types::{FilterKind, NewTodo, SortKind, ThemeMode, Todo, TodoId, TodoPatch};
pub use utils::{Debouncer, DebouncerError, DEFAULT_DEBOUNCE_MS};
pub use validation::{validate_notes, validate_title, ValidationError};
