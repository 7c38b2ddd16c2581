//! The domain store: task-list mutations over a `taskstore-core` engine.
//!
//! [`TaskStore`] owns one [`Store<AppState>`] and defines the five mutation
//! operations in terms of the engine's primitives. Operations are methods on
//! the store (dependency injection of the mutator) rather than closures
//! captured inside the state. All mutators are synchronous and total for
//! well-formed input: a missing id is a defined no-op, not an error.

use crate::types::{AppPatch, AppState, GUEST_AUTHOR, Task, TaskId, User};
use std::sync::Arc;
use taskstore_core::Store;
use taskstore_core::environment::{Clock, IdGenerator, RandomIdGenerator, SystemClock};

/// Display name of the fixed stub identity set by [`TaskStore::login`].
pub const STUB_USER_NAME: &str = "Artur Ceschin";

/// Contact address of the fixed stub identity.
pub const STUB_USER_EMAIL: &str = "arturceschin@test.com.br";

/// Environment dependencies for the task store
#[derive(Clone)]
pub struct TaskEnvironment {
    /// Clock for creation timestamps
    pub clock: Arc<dyn Clock>,
    /// Generator for fresh task identifiers
    pub ids: Arc<dyn IdGenerator>,
}

impl TaskEnvironment {
    /// Creates a new `TaskEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// Production environment: system clock, random v4 ids
    #[must_use]
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(RandomIdGenerator))
    }
}

impl std::fmt::Debug for TaskEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskEnvironment").finish_non_exhaustive()
    }
}

/// The task-list store: one engine instance plus injected dependencies.
///
/// Reads and subscriptions go through [`TaskStore::engine`] (or the
/// [`TaskStore::state`] / [`TaskStore::snapshot`] conveniences); writes go
/// through the five operations below, each of which replaces the affected
/// collection wholesale (copy-on-write) and notifies subscribers
/// synchronously.
pub struct TaskStore {
    engine: Store<AppState>,
    env: TaskEnvironment,
}

impl TaskStore {
    /// Creates a store with an empty task list and no session
    #[must_use]
    pub fn new(env: TaskEnvironment) -> Self {
        Self::with_state(AppState::new(), env)
    }

    /// Creates a store seeded with an existing state
    #[must_use]
    pub fn with_state(state: AppState, env: TaskEnvironment) -> Self {
        Self {
            engine: Store::new(state),
            env,
        }
    }

    /// The underlying engine, for bindings and raw subscriptions
    #[must_use]
    pub const fn engine(&self) -> &Store<AppState> {
        &self.engine
    }

    /// Read current state via a selector closure
    pub fn state<F, T>(&self, selector: F) -> T
    where
        F: FnOnce(&AppState) -> T,
    {
        self.engine.state(selector)
    }

    /// Clone the current state snapshot
    #[must_use]
    pub fn snapshot(&self) -> AppState {
        self.engine.snapshot()
    }

    /// Unconditionally set the session to the fixed stub identity.
    ///
    /// No validation, no async step, no failure path.
    pub fn login(&self) {
        tracing::debug!(user = STUB_USER_NAME, "Logging in stub identity");
        self.engine.patch(AppPatch {
            user: Some(Some(User::new(STUB_USER_NAME, STUB_USER_EMAIL))),
            ..AppPatch::default()
        });
    }

    /// Unconditionally clear the session.
    pub fn logout(&self) {
        tracing::debug!("Logging out");
        self.engine.patch(AppPatch {
            user: Some(None),
            ..AppPatch::default()
        });
    }

    /// Append a new task with a fresh id.
    ///
    /// The creator is the explicit `author` if provided, else the current
    /// session's display name, else `"Guest"`. The title is stored exactly
    /// as passed: trimming and non-empty enforcement are the caller's
    /// responsibility before invoking this operation.
    ///
    /// Returns the id of the new task.
    pub fn add_todo(&self, title: impl Into<String>, author: Option<&str>) -> TaskId {
        let id = TaskId::from_uuid(self.env.ids.generate());
        let created_at = self.env.clock.now();
        let title = title.into();
        let author = author.map(str::to_owned);

        let task_id = id.clone();
        self.engine.update_with(move |state| {
            let created_by = author.unwrap_or_else(|| {
                state
                    .user
                    .as_ref()
                    .map_or_else(|| GUEST_AUTHOR.to_owned(), |user| user.name.clone())
            });

            let mut todos = state.todos.clone();
            todos.push(Task::new(task_id, title, created_at, created_by));
            AppPatch {
                todos: Some(todos),
                ..AppPatch::default()
            }
        });

        tracing::debug!(%id, "Task added");
        id
    }

    /// Flip the completion flag of the task matching `id`.
    ///
    /// Not idempotent (each call flips), but safe for a missing id: the
    /// collection is left unchanged, same elements, same order.
    pub fn toggle_todo_done(&self, id: &TaskId) {
        let id = id.clone();
        tracing::debug!(%id, "Toggling task");
        self.engine.update_with(move |state| {
            let todos = state
                .todos
                .iter()
                .cloned()
                .map(|mut task| {
                    if task.id == id {
                        task.toggle();
                    }
                    task
                })
                .collect();
            AppPatch {
                todos: Some(todos),
                ..AppPatch::default()
            }
        });
    }

    /// Remove the task matching `id`, preserving the relative order of the
    /// rest. No-op for a missing id.
    pub fn remove_todo(&self, id: &TaskId) {
        let id = id.clone();
        tracing::debug!(%id, "Removing task");
        self.engine.update_with(move |state| {
            let todos = state
                .todos
                .iter()
                .filter(|task| task.id != id)
                .cloned()
                .collect();
            AppPatch {
                todos: Some(todos),
                ..AppPatch::default()
            }
        });
    }
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use taskstore_testing::mocks::{SequentialIdGenerator, test_clock};
    use uuid::Uuid;

    fn test_store() -> TaskStore {
        TaskStore::new(TaskEnvironment::new(
            Arc::new(test_clock()),
            Arc::new(SequentialIdGenerator::new()),
        ))
    }

    #[test]
    fn add_todo_without_session_uses_guest() {
        let store = test_store();

        let id = store.add_todo("Buy milk", None);

        let state = store.snapshot();
        assert_eq!(state.count(), 1);
        let task = state.get(&id).unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.created_by, "Guest");
        assert!(!task.completed);
        assert_eq!(task.created_at, test_clock().now());
    }

    #[test]
    fn add_todo_stores_title_verbatim() {
        let store = test_store();

        // Trimming is the view layer's job; the store must not touch it.
        let id = store.add_todo("  spaced out  ", None);

        assert_eq!(
            store.state(|s| s.get(&id).map(|t| t.title.clone())),
            Some("  spaced out  ".to_string())
        );
    }

    #[test]
    fn add_todo_uses_session_author_after_login() {
        let store = test_store();

        store.login();
        let id = store.add_todo("Plan sprint", None);

        assert_eq!(
            store.state(|s| s.get(&id).map(|t| t.created_by.clone())),
            Some(STUB_USER_NAME.to_string())
        );
    }

    #[test]
    fn explicit_author_wins_over_session() {
        let store = test_store();

        store.login();
        let id = store.add_todo("Review", Some("Reviewer"));

        assert_eq!(
            store.state(|s| s.get(&id).map(|t| t.created_by.clone())),
            Some("Reviewer".to_string())
        );
    }

    #[test]
    fn added_tasks_keep_insertion_order_and_unique_ids() {
        let store = test_store();

        let first = store.add_todo("one", None);
        let second = store.add_todo("two", None);
        let third = store.add_todo("three", None);

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_eq!(first, TaskId::from_uuid(Uuid::from_u128(1)));

        let titles: Vec<String> = store.state(|s| s.todos.iter().map(|t| t.title.clone()).collect());
        assert_eq!(titles, vec!["one", "two", "three"]);
    }

    #[test]
    fn toggle_flips_only_the_matching_task() {
        let store = test_store();
        let first = store.add_todo("one", None);
        let second = store.add_todo("two", None);

        store.toggle_todo_done(&first);

        let state = store.snapshot();
        assert!(state.get(&first).unwrap().completed);
        assert!(!state.get(&second).unwrap().completed);
        // No reordering on toggle.
        assert_eq!(state.todos[0].id, first);
        assert_eq!(state.todos[1].id, second);

        store.toggle_todo_done(&first);
        assert!(!store.state(|s| s.get(&first).unwrap().completed));
    }

    #[test]
    fn toggle_missing_id_leaves_collection_unchanged() {
        let store = test_store();
        store.add_todo("one", None);
        store.add_todo("two", None);
        let before = store.snapshot();

        store.toggle_todo_done(&TaskId::from_uuid(Uuid::from_u128(999)));

        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn remove_decrements_count_and_preserves_order() {
        let store = test_store();
        let first = store.add_todo("one", None);
        let second = store.add_todo("two", None);
        let third = store.add_todo("three", None);

        store.remove_todo(&second);

        let state = store.snapshot();
        assert_eq!(state.count(), 2);
        assert_eq!(state.todos[0].id, first);
        assert_eq!(state.todos[1].id, third);
    }

    #[test]
    fn remove_missing_id_is_a_noop() {
        let store = test_store();
        store.add_todo("one", None);
        let before = store.snapshot();

        store.remove_todo(&TaskId::from_uuid(Uuid::from_u128(999)));

        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn login_then_logout_restores_absent_session() {
        let store = test_store();
        assert!(store.state(|s| s.user.is_none()));

        store.login();
        let user = store.state(|s| s.user.clone()).unwrap();
        assert_eq!(user.name, STUB_USER_NAME);
        assert_eq!(user.email, STUB_USER_EMAIL);

        store.logout();
        assert!(store.state(|s| s.user.is_none()));
    }
}
