//! Persistence adapter for the todo collection and theme preference.
//!
//! # Design
//!
//! - **Best-effort**: no operation here reports failure to its caller. Read
//!   failures fall back to an empty collection (or the `system` theme); write
//!   failures are logged and dropped. In-memory state stays the source of
//!   truth.
//!
//! - **Debounced collection writes**: [`Persistence::save_collection`] returns
//!   immediately. The snapshot is written once no newer snapshot has arrived
//!   for the debounce window (300ms by default). A newer snapshot cancels the
//!   pending one, so only the last snapshot of a burst reaches storage.
//!
//! - **Theme writes** are infrequent and go straight to storage.
//!
//! # Storage Format
//!
//! | Key | Value |
//! |-----|-------|
//! | `todos` | JSON array of todo records |
//! | `theme` | one of `light`, `dark`, `system` |
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tickler_core::persistence::Persistence;
//! use tickler_core::storage::FileStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let persistence = Persistence::new(Arc::new(FileStore::new("/home/user/.tickler")));
//!
//!     let mut todos = persistence.load_collection().await;
//!     todos.clear();
//!     persistence.save_collection(&todos);
//!
//!     // Make the pending write durable before exiting
//!     persistence.flush().await;
//! }
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::Result;
use crate::storage::KeyValueStore;
use crate::types::{ThemeMode, Todo};
use crate::utils::debounce::{Debouncer, DEFAULT_DEBOUNCE_MS};

/// Storage key holding the serialized todo collection.
pub const TODOS_KEY: &str = "todos";

/// Storage key holding the theme preference.
pub const THEME_KEY: &str = "theme";

/// Debounce window applied to collection writes.
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(DEFAULT_DEBOUNCE_MS);

/// Reads and writes todos and the theme preference through a [`KeyValueStore`].
///
/// Must be created inside a Tokio runtime. Dropping the adapter writes any
/// pending snapshot.
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
    writer: Debouncer<Vec<Todo>>,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("debounce", &self.writer.interval())
            .finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates an adapter with the default 300ms debounce window.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_debounce(store, DEFAULT_SAVE_DEBOUNCE)
    }

    /// Creates an adapter with a custom debounce window.
    #[must_use]
    pub fn with_debounce(store: Arc<dyn KeyValueStore>, window: Duration) -> Self {
        let writer_store = Arc::clone(&store);
        let writer = Debouncer::new(window, move |todos: Vec<Todo>| {
            write_collection(writer_store.as_ref(), &todos);
        });

        Self { store, writer }
    }

    /// Returns the debounce window for collection writes.
    #[must_use]
    pub fn debounce_window(&self) -> Duration {
        self.writer.interval()
    }

    /// Loads the last saved collection.
    ///
    /// Returns an empty collection when nothing was saved yet or the stored
    /// value cannot be read or decoded.
    pub async fn load_collection(&self) -> Vec<Todo> {
        let Some(json) = self.read_key(TODOS_KEY).await else {
            return Vec::new();
        };

        match decode_collection(&json) {
            Ok(todos) => {
                debug!(count = todos.len(), "Todo collection loaded");
                todos
            }
            Err(e) => {
                warn!(error = %e, "Stored todo collection is unreadable, starting empty");
                Vec::new()
            }
        }
    }

    /// Schedules a write of `todos`, replacing any write still pending.
    ///
    /// Returns immediately; the write happens after the debounce window.
    pub fn save_collection(&self, todos: &[Todo]) {
        if !self.writer.try_send(todos.to_vec()) {
            warn!(
                count = todos.len(),
                "Collection writer has stopped, snapshot dropped"
            );
        }
    }

    /// Loads the theme preference, defaulting to [`ThemeMode::System`].
    pub async fn load_theme_preference(&self) -> ThemeMode {
        let Some(raw) = self.read_key(THEME_KEY).await else {
            return ThemeMode::default();
        };

        raw.trim().parse().unwrap_or_else(|e| {
            warn!(error = %e, "Stored theme preference is unreadable, using system");
            ThemeMode::default()
        })
    }

    /// Writes the theme preference immediately.
    pub async fn save_theme_preference(&self, mode: ThemeMode) {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || store.set(THEME_KEY, mode.as_str())).await;

        match result {
            Ok(Ok(())) => debug!(theme = %mode, "Theme preference saved"),
            Ok(Err(e)) => warn!(error = %e, "Failed to save theme preference"),
            Err(e) => warn!(error = %e, "Theme write task failed"),
        }
    }

    /// Writes the pending collection snapshot now, if there is one, and waits
    /// for the write to finish.
    pub async fn flush(&self) {
        if let Err(e) = self.writer.flush().await {
            warn!(error = %e, "Failed to flush pending collection write");
        }
    }

    /// Reads a key on the blocking pool. Any failure is logged and reported
    /// as "nothing stored".
    async fn read_key(&self, key: &'static str) -> Option<String> {
        let store = Arc::clone(&self.store);

        match tokio::task::spawn_blocking(move || store.get(key)).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                warn!(key, error = %e, "Failed to read from storage");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Storage read task failed");
                None
            }
        }
    }
}

/// Serializes and stores a collection snapshot, logging any failure.
fn write_collection(store: &dyn KeyValueStore, todos: &[Todo]) {
    let json = match serde_json::to_string(todos) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "Failed to serialize todo collection");
            return;
        }
    };

    match store.set(TODOS_KEY, &json) {
        Ok(()) => debug!(count = todos.len(), "Todo collection saved"),
        Err(e) => warn!(count = todos.len(), error = %e, "Failed to save todo collection"),
    }
}

/// Decodes a collection in the `todos` storage format.
///
/// # Errors
///
/// Returns the JSON error if `json` is not an array of todo records.
pub fn decode_collection(json: &str) -> std::result::Result<Vec<Todo>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a collection file for bulk import.
///
/// The file uses the same format as the `todos` storage key.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn read_collection_file(path: &Path) -> Result<Vec<Todo>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(decode_collection(&contents)?)
}

/// Writes `todos` to a file in the `todos` storage format, pretty-printed.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_collection_file(path: &Path, todos: &[Todo]) -> Result<()> {
    let json = serde_json::to_string_pretty(todos)?;
    std::fs::write(path, json)?;
    Ok(())
}
