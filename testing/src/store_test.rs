//! Ergonomic testing utilities for stores
//!
//! This module provides a fluent API for testing stores with readable
//! Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // StoreTest is the natural name

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use taskstore_core::store::{Patchable, Store, Update};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Fluent API for testing stores with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// use taskstore_testing::StoreTest;
///
/// StoreTest::new()
///     .given_state(AppState::default())
///     .when_patch(AppPatch { user: Some(Some(user)), ..Default::default() })
///     .then_state(|state| {
///         assert!(state.user.is_some());
///     })
///     .then_notifications(1)
///     .run();
/// ```
pub struct StoreTest<S: Patchable> {
    initial_state: Option<S>,
    updates: Vec<Update<S>>,
    state_assertions: Vec<StateAssertion<S>>,
    expected_notifications: Option<usize>,
}

impl<S> StoreTest<S>
where
    S: Patchable + Clone + Send + Sync + 'static,
{
    /// Create a new store test
    #[must_use]
    pub const fn new() -> Self {
        Self {
            initial_state: None,
            updates: Vec::new(),
            state_assertions: Vec::new(),
            expected_notifications: None,
        }
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Queue an update to apply (When)
    #[must_use]
    pub fn when_update(mut self, update: Update<S>) -> Self {
        self.updates.push(update);
        self
    }

    /// Queue a plain patch to apply (When)
    #[must_use]
    pub fn when_patch(mut self, patch: S::Patch) -> Self {
        self.updates.push(Update::Patch(patch));
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Assert how many listener notifications the updates produced (Then)
    #[must_use]
    pub const fn then_notifications(mut self, expected: usize) -> Self {
        self.expected_notifications = Some(expected);
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if the initial state is not set, or if any assertions fail.
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let initial = self
            .initial_state
            .expect("Initial state must be set with given_state()");
        let store = Store::new(initial);

        let notifications = Arc::new(AtomicUsize::new(0));
        let sub = store.subscribe({
            let notifications = Arc::clone(&notifications);
            move |_: &S| {
                notifications.fetch_add(1, Ordering::SeqCst);
            }
        });

        for update in self.updates {
            store.update(update);
        }

        let state = store.snapshot();
        for assertion in self.state_assertions {
            assertion(&state);
        }

        if let Some(expected) = self.expected_notifications {
            assert_eq!(
                notifications.load(Ordering::SeqCst),
                expected,
                "Expected {expected} notifications"
            );
        }

        drop(sub);
    }
}

impl<S> Default for StoreTest<S>
where
    S: Patchable + Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    struct TestState {
        count: i32,
    }

    #[derive(Default)]
    struct TestPatch {
        count: Option<i32>,
    }

    impl Patchable for TestState {
        type Patch = TestPatch;

        fn apply_patch(&mut self, patch: TestPatch) {
            if let Some(count) = patch.count {
                self.count = count;
            }
        }
    }

    #[test]
    fn store_test_applies_patches_in_order() {
        StoreTest::new()
            .given_state(TestState::default())
            .when_patch(TestPatch { count: Some(1) })
            .when_patch(TestPatch { count: Some(2) })
            .then_state(|state| {
                assert_eq!(state.count, 2);
            })
            .then_notifications(2)
            .run();
    }

    #[test]
    fn store_test_supports_transforms() {
        StoreTest::new()
            .given_state(TestState { count: 3 })
            .when_update(Update::with(|s: &TestState| TestPatch {
                count: Some(s.count * 10),
            }))
            .then_state(|state| {
                assert_eq!(state.count, 30);
            })
            .run();
    }
}
