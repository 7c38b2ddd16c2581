//! Selector-based bindings over a [`Store`].
//!
//! A [`Binding`] lets a consumer re-render exactly when a derived value
//! changes, without re-rendering on unrelated state changes. It evaluates a
//! pure selector against the state for an initial value, subscribes to the
//! store, and on every notification re-evaluates the selector; only when the
//! newly selected value differs (by [`PartialEq`]) does the held value swap
//! and the render generation advance.
//!
//! # Caveat: selectors and equality
//!
//! Equality here is value equality on the selected type. A selector whose
//! result incorporates a component that genuinely differs on every
//! notification (a counter, a timestamp, a freshly generated id) defeats the
//! check and re-renders on every pass regardless of relevance. That is a
//! caller responsibility, not a store bug: select the narrowest value the
//! consumer actually renders.

use crate::store::{Store, Subscription};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// A live view of `selector(state)`, updated only when the selected value
/// changes.
///
/// The binding owns its [`Subscription`]: dropping the binding (or calling
/// [`Binding::cancel`]) removes the listener, including when the consumer is
/// torn down before any notification ever arrives.
///
/// # Example
///
/// ```
/// use taskstore_core::binding::Binding;
/// use taskstore_core::store::{Patchable, Store};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct App {
///     count: i32,
///     label: String,
/// }
///
/// #[derive(Default)]
/// struct AppPatch {
///     count: Option<i32>,
///     label: Option<String>,
/// }
///
/// impl Patchable for App {
///     type Patch = AppPatch;
///
///     fn apply_patch(&mut self, patch: AppPatch) {
///         if let Some(count) = patch.count {
///             self.count = count;
///         }
///         if let Some(label) = patch.label {
///             self.label = label;
///         }
///     }
/// }
///
/// let store = Store::new(App { count: 1, label: "a".to_string() });
/// let count = Binding::new(&store, |s: &App| s.count);
///
/// // Unrelated field: selected value unchanged, no re-render.
/// store.patch(AppPatch { label: Some("b".to_string()), ..Default::default() });
/// assert_eq!(count.renders(), 0);
///
/// store.patch(AppPatch { count: Some(2), ..Default::default() });
/// assert_eq!(count.get(), 2);
/// assert_eq!(count.renders(), 1);
/// ```
pub struct Binding<T> {
    current: Arc<Mutex<T>>,
    renders: Arc<AtomicU64>,
    subscription: Subscription,
}

impl<T> Binding<T>
where
    T: PartialEq + Clone + Send + 'static,
{
    /// Bind `selector` over `store` with no observer.
    pub fn new<S, F>(store: &Store<S>, selector: F) -> Self
    where
        S: Clone + Send + Sync + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        Self::with_observer(store, selector, |_| {})
    }

    /// Bind `selector` over `store`, invoking `observer` with the new value
    /// on every re-render.
    ///
    /// The observer is the hook for a host view layer: it fires after the
    /// held value has been swapped, and only when the selected value actually
    /// changed.
    pub fn with_observer<S, F, O>(store: &Store<S>, selector: F, observer: O) -> Self
    where
        S: Clone + Send + Sync + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
        O: Fn(&T) + Send + Sync + 'static,
    {
        let current = Arc::new(Mutex::new(store.state(&selector)));
        let renders = Arc::new(AtomicU64::new(0));

        let subscription = store.subscribe({
            let current = Arc::clone(&current);
            let renders = Arc::clone(&renders);
            move |state: &S| {
                let next = selector(state);
                let mut held = current.lock().unwrap_or_else(PoisonError::into_inner);
                if *held == next {
                    tracing::trace!("Selected value unchanged, skipping re-render");
                    return;
                }
                *held = next.clone();
                drop(held); // release before the observer runs
                renders.fetch_add(1, Ordering::AcqRel);
                tracing::trace!("Selected value changed, re-rendering");
                observer(&next);
            }
        });

        Self {
            current,
            renders,
            subscription,
        }
    }

    /// The currently held selected value.
    #[must_use]
    pub fn get(&self) -> T {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of re-renders so far (selected-value changes since creation).
    #[must_use]
    pub fn renders(&self) -> u64 {
        self.renders.load(Ordering::Acquire)
    }

    /// Tear the binding down, removing its listener.
    ///
    /// Idempotent; dropping the binding has the same effect.
    pub fn cancel(&self) {
        self.subscription.cancel();
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("renders", &self.renders.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}
