//! Dependency injection traits for domain stores.
//!
//! External dependencies (time, id generation) are abstracted behind traits
//! and injected into domain stores, keeping mutation operations
//! deterministic and testable.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Clock trait - abstracts time operations for testability.
///
/// # Examples
///
/// ```
/// use taskstore_core::environment::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let now = clock.now();
/// assert!(clock.now() >= now);
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Id generation trait - abstracts identifier creation for domain entities.
///
/// Generation policy is caller-defined: production uses random v4 UUIDs,
/// tests typically inject a sequential generator for predictable ids.
pub trait IdGenerator: Send + Sync {
    /// Produce a fresh identifier.
    fn generate(&self) -> Uuid;
}

/// Production id generator backed by random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_are_unique() {
        let ids = RandomIdGenerator;
        assert_ne!(ids.generate(), ids.generate());
    }
}
