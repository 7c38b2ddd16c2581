//! Observable state container with shallow-merge updates.
//!
//! The [`Store`] owns a single state value and is the canonical way to read,
//! update, and observe it. Updates are expressed as [`Update`] values: either
//! a plain patch (field-by-field replacement) or a pure transform computed
//! from the current state. After a merge, every registered listener is
//! invoked exactly once, synchronously, before the update call returns.
//!
//! # Merge semantics
//!
//! The merge contract lives in the [`Patchable`] trait: every field present
//! in a patch replaces the corresponding state field wholesale. The merge is
//! shallow - nested structures are never deep-merged. Untouched fields keep
//! their prior value.
//!
//! # Listener lifecycle
//!
//! [`Store::subscribe`] returns a [`Subscription`] handle. Cancelling is
//! idempotent, and dropping the handle cancels it, so a subscription is
//! released on every exit path of its owner. The listener set is snapshotted
//! before each notification pass: subscribing or cancelling during a pass
//! neither skips nor double-invokes the listeners already scheduled for it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

/// State types that support shallow-merge partial updates.
///
/// A `Patch` is the statically-typed rendition of a partial state: one
/// `Option` per field. Applying a patch replaces each present field
/// wholesale and leaves absent fields untouched.
///
/// # Example
///
/// ```
/// use taskstore_core::store::Patchable;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Settings {
///     volume: u8,
///     muted: bool,
/// }
///
/// #[derive(Default)]
/// struct SettingsPatch {
///     volume: Option<u8>,
///     muted: Option<bool>,
/// }
///
/// impl Patchable for Settings {
///     type Patch = SettingsPatch;
///
///     fn apply_patch(&mut self, patch: SettingsPatch) {
///         if let Some(volume) = patch.volume {
///             self.volume = volume;
///         }
///         if let Some(muted) = patch.muted {
///             self.muted = muted;
///         }
///     }
/// }
/// ```
pub trait Patchable {
    /// The partial-state type merged over this state.
    type Patch;

    /// Merge `patch` into `self`, replacing present fields wholesale.
    fn apply_patch(&mut self, patch: Self::Patch);
}

/// A partial update applied to a [`Store`].
///
/// Updates are an explicit sum type: either a plain value-patch or a pure
/// transform of the current state into a patch. Transforms are computed
/// synchronously against the state that is current at merge time, then
/// merged exactly like a plain patch.
pub enum Update<S: Patchable> {
    /// A plain value-patch, merged over the current state.
    Patch(S::Patch),

    /// A pure transform from the current state to a patch.
    With(Box<dyn FnOnce(&S) -> S::Patch + Send>),
}

impl<S: Patchable> Update<S> {
    /// Build a transform update from a closure.
    pub fn with<F>(transform: F) -> Self
    where
        F: FnOnce(&S) -> S::Patch + Send + 'static,
    {
        Self::With(Box::new(transform))
    }
}

// Manual Debug implementation since the transform closure doesn't implement Debug
impl<S: Patchable> std::fmt::Debug for Update<S>
where
    S::Patch: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Update::Patch(patch) => f.debug_tuple("Update::Patch").field(patch).finish(),
            Update::With(_) => write!(f, "Update::With(<transform>)"),
        }
    }
}

/// An opaque listener invoked after every merge with the new state snapshot.
type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Internal: registry of listeners keyed by registration id.
struct Registry<S> {
    entries: Mutex<HashMap<u64, Listener<S>>>,
    next_id: AtomicU64,
}

impl<S> Registry<S> {
    fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    fn insert(&self, listener: Listener<S>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, listener);
        id
    }

    /// Snapshot the current listener set for one notification pass.
    fn snapshot(&self) -> Vec<Listener<S>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

/// Internal: type-erased removal hook so [`Subscription`] stays non-generic.
trait Unsubscribe: Send + Sync {
    fn remove(&self, id: u64);
}

impl<S> Unsubscribe for Registry<S> {
    fn remove(&self, id: u64) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        tracing::trace!(listener_id = id, "Listener removed");
    }
}

/// Handle to a registered listener.
///
/// [`Subscription::cancel`] is idempotent: calling it twice has no
/// additional effect. Dropping the handle cancels it, which gives owners
/// scoped acquisition with guaranteed release on all exit paths.
#[must_use = "the listener is removed when the subscription is dropped"]
pub struct Subscription {
    registry: Weak<dyn Unsubscribe>,
    id: u64,
    cancelled: AtomicBool,
}

impl Subscription {
    /// Remove the listener from the store.
    ///
    /// Idempotent: repeated calls are no-ops. Cancelling during a
    /// notification pass does not affect listeners already snapshotted for
    /// that pass.
    pub fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("cancelled", &self.cancelled.load(Ordering::Acquire))
            .finish()
    }
}

/// Observable state container.
///
/// The store holds exactly one state value. External code never mutates the
/// state in place: every change goes through [`Store::update`] (or its
/// conveniences), which merges a patch and then notifies every registered
/// listener exactly once, synchronously, before returning.
///
/// The merge-then-notify sequence is serialized under locks, so the store is
/// safe to share across threads, but the state lock is released before
/// listeners run: a listener may reentrantly call `update` without
/// deadlocking (reentrant updates are sequential, not nested-blocking).
///
/// # Example
///
/// ```
/// use taskstore_core::store::{Patchable, Store, Update};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Counter {
///     count: i32,
///     step: i32,
/// }
///
/// #[derive(Default)]
/// struct CounterPatch {
///     count: Option<i32>,
///     step: Option<i32>,
/// }
///
/// impl Patchable for Counter {
///     type Patch = CounterPatch;
///
///     fn apply_patch(&mut self, patch: CounterPatch) {
///         if let Some(count) = patch.count {
///             self.count = count;
///         }
///         if let Some(step) = patch.step {
///             self.step = step;
///         }
///     }
/// }
///
/// let store = Store::new(Counter { count: 0, step: 2 });
///
/// store.update(Update::with(|current: &Counter| CounterPatch {
///     count: Some(current.count + current.step),
///     ..Default::default()
/// }));
///
/// assert_eq!(store.state(|s| s.count), 2);
/// ```
pub struct Store<S> {
    state: Arc<RwLock<S>>,
    registry: Arc<Registry<S>>,
}

impl<S> Store<S> {
    /// Create a store owning `initial` as its state.
    #[must_use]
    pub fn new(initial: S) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
            registry: Arc::new(Registry::new()),
        }
    }

    /// Read current state via a selector closure.
    ///
    /// Access goes through a closure so the read lock is released promptly:
    ///
    /// ```ignore
    /// let task_count = store.state(|s| s.todos.len());
    /// ```
    pub fn state<F, T>(&self, selector: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        selector(&state)
    }

    /// Clone the current state snapshot.
    #[must_use]
    pub fn snapshot(&self) -> S
    where
        S: Clone,
    {
        self.state(S::clone)
    }

    /// Register a listener, invoked with the new state snapshot after every
    /// merge.
    ///
    /// The returned [`Subscription`] removes the listener when cancelled or
    /// dropped. Listener invocation order is unspecified.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&S) + Send + Sync + 'static,
        S: 'static,
    {
        let id = self.registry.insert(Arc::new(listener));
        tracing::trace!(listener_id = id, "Listener registered");

        let registry: Arc<dyn Unsubscribe> = self.registry.clone();
        Subscription {
            registry: Arc::downgrade(&registry),
            id,
            cancelled: AtomicBool::new(false),
        }
    }
}

impl<S> Store<S>
where
    S: Patchable + Clone,
{
    /// Apply an [`Update`] and synchronously notify all listeners.
    pub fn update(&self, update: Update<S>) {
        match update {
            Update::Patch(patch) => self.patch(patch),
            Update::With(transform) => self.update_with(transform),
        }
    }

    /// Merge a plain patch over the current state and notify listeners.
    pub fn patch(&self, patch: S::Patch) {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            tracing::trace!("Acquired write lock on state");
            state.apply_patch(patch);
        }
        self.notify();
    }

    /// Compute a patch from the current state, merge it, and notify
    /// listeners.
    ///
    /// The transform runs synchronously under the write lock, so it observes
    /// the state that the patch will be merged over.
    pub fn update_with<F>(&self, transform: F)
    where
        F: FnOnce(&S) -> S::Patch,
    {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            tracing::trace!("Acquired write lock on state");
            let patch = transform(&state);
            state.apply_patch(patch);
        }
        self.notify();
    }

    /// Invoke every currently registered listener once with the new state.
    ///
    /// The listener set is snapshotted before iterating and the state lock
    /// is released before any listener runs, so listeners may subscribe,
    /// cancel, or reentrantly update without deadlock.
    fn notify(&self) {
        let snapshot = self
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let pass = self.registry.snapshot();

        tracing::trace!(listeners = pass.len(), "Notifying listeners");
        for listener in pass {
            listener(&snapshot);
        }
    }
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<S> std::fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
