//! # Taskstore Core
//!
//! A minimal reactive state container: one observable state value with
//! shallow-merge partial updates, synchronous subscribe/notify semantics,
//! and selector-based bindings that re-render only when the selected value
//! changes.
//!
//! ## Core Concepts
//!
//! - **Store**: owns exactly one state value; the canonical way to read,
//!   update, and observe it
//! - **Patchable**: the shallow-merge contract between a state and its
//!   partial-update (patch) type
//! - **Update**: a sum type - either a plain value-patch or a pure transform
//!   of the current state
//! - **Binding**: a selector subscription that re-renders its consumer only
//!   on selected-value changes
//! - **Environment**: injected dependencies (`Clock`, `IdGenerator`) for
//!   domain stores built on top of the engine
//!
//! ## Architecture Principles
//!
//! - Copy-on-write state: every update produces a new snapshot; external
//!   code never mutates state in place
//! - Synchronous notification: listeners run exactly once per update, inside
//!   the update call, before it returns
//! - Explicit subscriptions: listener lifetime is owned by a handle with
//!   idempotent cancellation and release-on-drop
//! - Dependency injection via traits, not closure capture
//!
//! ## Example
//!
//! ```ignore
//! use taskstore_core::{Binding, Patchable, Store, Update};
//!
//! let store = Store::new(AppState::default());
//! let count = Binding::new(&store, |s: &AppState| s.todos.len());
//!
//! store.update(Update::with(|s: &AppState| AppPatch {
//!     todos: Some(with_new_task(&s.todos)),
//!     ..Default::default()
//! }));
//!
//! assert_eq!(count.renders(), 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

/// Selector bindings that re-render on selected-value changes.
pub mod binding;

/// Injected dependencies (`Clock`, `IdGenerator`).
pub mod environment;

/// The observable store engine.
pub mod store;

pub use binding::Binding;
pub use store::{Patchable, Store, Subscription, Update};
