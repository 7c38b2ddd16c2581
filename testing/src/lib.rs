//! # Taskstore Testing
//!
//! Testing utilities and helpers for taskstore stores.
//!
//! This crate provides:
//! - Mock implementations of environment traits (`FixedClock`,
//!   `SequentialIdGenerator`)
//! - A fluent [`StoreTest`] builder with Given-When-Then syntax
//! - A [`helpers::RenderCounter`] probe for asserting re-render counts on
//!   bindings
//!
//! ## Example
//!
//! ```ignore
//! use taskstore_testing::{mocks, StoreTest};
//!
//! StoreTest::new()
//!     .given_state(AppState::default())
//!     .when_update(Update::Patch(patch))
//!     .then_state(|state| assert_eq!(state.todos.len(), 1))
//!     .then_notifications(1)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use taskstore_core::environment::{Clock, IdGenerator};

mod store_test;

pub use store_test::StoreTest;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};
    use uuid::Uuid;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use taskstore_testing::mocks::FixedClock;
    /// use taskstore_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Sequential id generator for predictable ids in tests.
    ///
    /// Produces `Uuid::from_u128(1)`, `Uuid::from_u128(2)`, ... in order.
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator starting at 1.
        #[must_use]
        pub const fn new() -> Self {
            Self {
                next: AtomicU64::new(0),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn generate(&self) -> Uuid {
            let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
            Uuid::from_u128(u128::from(n))
        }
    }
}

/// Test helpers and utilities.
pub mod helpers {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts binding re-renders.
    ///
    /// Hand [`RenderCounter::observer`] to `Binding::with_observer` and
    /// assert on [`RenderCounter::count`] afterwards.
    #[derive(Debug, Clone, Default)]
    pub struct RenderCounter {
        count: Arc<AtomicUsize>,
    }

    impl RenderCounter {
        /// Create a counter at zero.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of re-renders observed so far.
        #[must_use]
        pub fn count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }

        /// An observer closure that increments this counter.
        pub fn observer<T>(&self) -> impl Fn(&T) + Send + Sync + 'static {
            let count = Arc::clone(&self.count);
            move |_: &T| {
                count.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}

/// Initialize tracing for tests (idempotent, honors `RUST_LOG`).
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
