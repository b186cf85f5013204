//! Todo record and view-selection types.
//!
//! All records serialize to camelCase JSON with ISO 8601 timestamps. Optional
//! fields (`notes`, `dueDate`, `completedAt`) are omitted when unset.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of the random base-36 suffix appended to the millisecond timestamp.
const TODO_ID_SUFFIX_LEN: usize = 9;

/// Opaque todo identifier.
pub type TodoId = String;

/// A single task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique identifier, assigned at creation and never changed.
    pub id: TodoId,

    /// Short title. Length limits are enforced by [`crate::validation`], not here.
    pub title: String,

    /// Optional free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Optional due date. Past dates are stored verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    /// When the todo was created.
    pub created_at: DateTime<Utc>,

    /// When the todo was last completed. Present only while `completed` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    /// Builds a new todo from caller-supplied data with a fresh id.
    ///
    /// A completed todo keeps the supplied `completed_at`, or gets `now` when
    /// none was given. An incomplete todo never carries `completed_at`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use tickler_core::types::{NewTodo, Todo};
    ///
    /// let now = Utc::now();
    /// let todo = Todo::create(NewTodo::titled("Buy milk"), now);
    ///
    /// assert_eq!(todo.title, "Buy milk");
    /// assert_eq!(todo.created_at, now);
    /// assert!(!todo.completed);
    /// assert!(todo.completed_at.is_none());
    /// ```
    #[must_use]
    pub fn create(data: NewTodo, now: DateTime<Utc>) -> Self {
        let completed_at = if data.completed {
            Some(data.completed_at.unwrap_or(now))
        } else {
            None
        };

        Self {
            id: generate_todo_id(now),
            title: data.title,
            notes: data.notes,
            due_date: data.due_date,
            created_at: now,
            completed_at,
            completed: data.completed,
        }
    }

    /// Sets the completion flag, stamping or clearing `completed_at` on a transition.
    ///
    /// Setting the flag to its current value leaves the record untouched.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        if self.completed == completed {
            return;
        }
        self.completed = completed;
        self.completed_at = completed.then_some(now);
    }

    /// Returns `true` when the todo is still open and its due date fell on an
    /// earlier calendar day (UTC) than `now`.
    ///
    /// A todo due earlier today is not overdue.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) if !self.completed => due < now && due.date_naive() < now.date_naive(),
            _ => false,
        }
    }
}

/// Data supplied by the caller when adding a todo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub notes: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    /// Completion time to record for a todo added as already completed.
    /// Ignored unless `completed` is true.
    pub completed_at: Option<DateTime<Utc>>,
}

impl NewTodo {
    /// An open todo with only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Marks the new todo as already completed at `completed_at`.
    #[must_use]
    pub fn completed_at(mut self, completed_at: DateTime<Utc>) -> Self {
        self.completed = true;
        self.completed_at = Some(completed_at);
        self
    }
}

/// A partial update merged into an existing todo.
///
/// `None` leaves a field untouched. For the optional fields, `Some(None)`
/// clears the value. The id and creation time can never be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub notes: Option<Option<String>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// Changes the completion flag with the same `completed_at` rules as a toggle.
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Returns `true` if the patch would not change anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.notes.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
    }

    /// Merges the patch into `todo`.
    pub fn apply(self, todo: &mut Todo, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            todo.title = title;
        }
        if let Some(notes) = self.notes {
            todo.notes = notes;
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = due_date;
        }
        if let Some(completed) = self.completed {
            todo.set_completed(completed, now);
        }
    }
}

/// Error returned when a view-selection or theme literal is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseKindError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// Status filter applied to the visible list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKind {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(ParseKindError {
                kind: "filter",
                value: other.to_string(),
                expected: "all, active, completed",
            }),
        }
    }
}

/// Ordering applied to the visible list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKind {
    /// Open todos newest first, then completed todos oldest-completed first.
    #[default]
    Default,
    DueDate,
    Alphabetical,
}

impl SortKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::DueDate => "dueDate",
            Self::Alphabetical => "alphabetical",
        }
    }
}

impl fmt::Display for SortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "dueDate" | "due-date" => Ok(Self::DueDate),
            "alphabetical" => Ok(Self::Alphabetical),
            other => Err(ParseKindError {
                kind: "sort",
                value: other.to_string(),
                expected: "default, dueDate, alphabetical",
            }),
        }
    }
}

/// Persisted colour-scheme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the platform setting.
    #[default]
    System,
}

impl ThemeMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(ParseKindError {
                kind: "theme",
                value: other.to_string(),
                expected: "light, dark, system",
            }),
        }
    }
}

/// Generates a todo id: the millisecond timestamp followed by 9 random
/// base-36 characters, so ids created within the same millisecond still differ.
#[must_use]
pub fn generate_todo_id(now: DateTime<Utc>) -> TodoId {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

    let mut rng = rand::rng();
    let suffix: String = (0..TODO_ID_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();

    format!("{}{suffix}", now.timestamp_millis())
}
