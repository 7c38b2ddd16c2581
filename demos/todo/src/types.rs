//! Domain types for the task list.
//!
//! The whole application state is one [`AppState`] value: the task
//! collection (insertion order) plus the optional stub session. All
//! mutation goes through [`AppPatch`] merges, so every change produces a
//! fresh snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskstore_core::store::Patchable;
use uuid::Uuid;

/// Sentinel creator name used when no session exists.
pub const GUEST_AUTHOR: &str = "Guest";

/// Unique identifier for a task
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new random `TaskId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `TaskId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single task item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// Title of the task, stored exactly as passed (trimming is the view
    /// layer's job)
    pub title: String,
    /// Whether the task is completed
    pub completed: bool,
    /// When the task was created
    pub created_at: DateTime<Utc>,
    /// Display name of whoever created the task
    pub created_by: String,
}

impl Task {
    /// Creates a new, not-yet-completed task
    #[must_use]
    pub const fn new(
        id: TaskId,
        title: String,
        created_at: DateTime<Utc>,
        created_by: String,
    ) -> Self {
        Self {
            id,
            title,
            completed: false,
            created_at,
            created_by,
        }
    }

    /// Flips the completion flag
    pub const fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// The stub session identity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name
    pub name: String,
    /// Contact address
    pub email: String,
}

impl User {
    /// Creates a new user
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// The whole application state behind the store
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// Current session, absent when nobody is logged in
    pub user: Option<User>,
    /// All tasks, in insertion order
    pub todos: Vec<Task>,
}

impl AppState {
    /// Creates an empty state with no session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of tasks
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the number of completed tasks
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// Returns a task by id
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.todos.iter().find(|t| &t.id == id)
    }

    /// Checks if a task exists
    #[must_use]
    pub fn exists(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }
}

/// Partial update over [`AppState`].
///
/// The outer `Option` marks whether the field takes part in the merge; for
/// `user` the inner `Option` is the session itself, so `Some(None)` clears
/// the session while `None` leaves it untouched. Present fields replace the
/// state's value wholesale (shallow merge).
#[derive(Clone, Debug, Default)]
pub struct AppPatch {
    /// Replacement session, if part of this update
    pub user: Option<Option<User>>,
    /// Replacement task collection, if part of this update
    pub todos: Option<Vec<Task>>,
}

impl Patchable for AppState {
    type Patch = AppPatch;

    fn apply_patch(&mut self, patch: AppPatch) {
        if let Some(user) = patch.user {
            self.user = user;
        }
        if let Some(todos) = patch.todos {
            self.todos = todos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_display() {
        let id = TaskId::new();
        let display = format!("{id}");
        assert!(!display.is_empty());
    }

    #[test]
    fn task_new() {
        let id = TaskId::new();
        let now = Utc::now();
        let task = Task::new(
            id.clone(),
            "Test task".to_string(),
            now,
            GUEST_AUTHOR.to_string(),
        );

        assert_eq!(task.id, id);
        assert_eq!(task.title, "Test task");
        assert!(!task.completed);
        assert_eq!(task.created_at, now);
        assert_eq!(task.created_by, "Guest");
    }

    #[test]
    fn task_toggle_flips_both_ways() {
        let mut task = Task::new(
            TaskId::new(),
            "Test".to_string(),
            Utc::now(),
            GUEST_AUTHOR.to_string(),
        );

        task.toggle();
        assert!(task.completed);
        task.toggle();
        assert!(!task.completed);
    }

    #[test]
    fn app_state_counts() {
        let mut state = AppState::new();
        assert_eq!(state.count(), 0);
        assert_eq!(state.completed_count(), 0);

        let id = TaskId::new();
        let mut task = Task::new(
            id.clone(),
            "Task 1".to_string(),
            Utc::now(),
            GUEST_AUTHOR.to_string(),
        );
        task.toggle();
        state.todos.push(task);

        assert_eq!(state.count(), 1);
        assert_eq!(state.completed_count(), 1);
        assert!(state.exists(&id));
    }

    #[test]
    fn patch_clears_session_only_when_present() {
        let mut state = AppState {
            user: Some(User::new("Someone", "someone@test")),
            todos: Vec::new(),
        };

        // Absent field: session untouched.
        state.apply_patch(AppPatch {
            todos: Some(Vec::new()),
            ..AppPatch::default()
        });
        assert!(state.user.is_some());

        // Present field: session replaced wholesale.
        state.apply_patch(AppPatch {
            user: Some(None),
            ..AppPatch::default()
        });
        assert!(state.user.is_none());
    }
}
