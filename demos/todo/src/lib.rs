//! Task-list demo built on the taskstore engine.
//!
//! This crate is the concrete domain store from the design: one
//! `Store<AppState>` holding the task collection and the stub session, with
//! the five mutation operations (`login`, `logout`, `add_todo`,
//! `toggle_todo_done`, `remove_todo`) defined in terms of the engine's
//! primitives. The CLI binary is the view layer: it trims and validates
//! input, renders the list, and drives a header binding off the task count.
//!
//! # Quick Start
//!
//! ```
//! use tasklist::{TaskEnvironment, TaskStore};
//!
//! let store = TaskStore::new(TaskEnvironment::system());
//!
//! let id = store.add_todo("Buy milk", None);
//! store.toggle_todo_done(&id);
//! assert_eq!(store.state(|s| s.completed_count()), 1);
//!
//! store.remove_todo(&id);
//! assert_eq!(store.state(|s| s.count()), 0);
//! ```

pub mod commands;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use commands::{Command, CommandError};
pub use store::{STUB_USER_EMAIL, STUB_USER_NAME, TaskEnvironment, TaskStore};
pub use types::{AppPatch, AppState, GUEST_AUTHOR, Task, TaskId, User};
