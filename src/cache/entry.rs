//! Cache Entry Module
//!
//! Defines the structure for one stored computation result and its metadata.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// A single memoized result plus the moment it was created.
///
/// The value is type-erased so that one store can hold segments of
/// different result types. Cloning an entry is shallow: the value is
/// shared behind an `Arc` and never mutated after insertion.
#[derive(Clone)]
pub struct CacheEntry {
    /// The stored value
    value: Arc<dyn Any + Send + Sync>,
    /// Creation timestamp (Unix milliseconds), never refreshed by a hit
    pub created_at: u64,
    /// Human-readable key the entry was stored under
    pub generated_key: Option<String>,
    /// Dependency values observed when the entry was computed
    pub dependencies: Option<Vec<Value>>,
    /// Insertion order within the owning segment, breaks `created_at` ties
    pub(crate) sequence: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry holding `value`, created at `created_at` (Unix ms).
    pub fn new<T: Any + Send + Sync>(value: T, created_at: u64) -> Self {
        Self {
            value: Arc::new(value),
            created_at,
            generated_key: None,
            dependencies: None,
            sequence: 0,
        }
    }

    /// Attaches the human-readable key used for diagnostics.
    pub fn with_generated_key(mut self, key: impl Into<String>) -> Self {
        self.generated_key = Some(key.into());
        self
    }

    /// Attaches the dependency values the result was computed against.
    pub fn with_dependencies(mut self, dependencies: Vec<Value>) -> Self {
        self.dependencies = Some(dependencies);
        self
    }

    // == Value Access ==
    /// Returns the stored value if it is of type `T`.
    pub fn value<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Returns true if the stored value is of type `T`.
    pub fn holds<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    // == Age ==
    /// Milliseconds elapsed between creation and `now`.
    pub fn age_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_at)
    }

    // == Is Stale ==
    /// Checks whether the entry has outlived `max_age`.
    ///
    /// An entry exactly `max_age` milliseconds old is still fresh; it becomes
    /// stale once the age strictly exceeds the bound. Without a bound the
    /// entry never goes stale.
    pub fn is_stale(&self, max_age: Option<u64>, now: u64) -> bool {
        match max_age {
            Some(max_age) => self.age_ms(now) > max_age,
            None => false,
        }
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("created_at", &self.created_at)
            .field("generated_key", &self.generated_key)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new(42_i64, 1_000);

        assert_eq!(entry.value::<i64>(), Some(&42));
        assert_eq!(entry.created_at, 1_000);
        assert!(entry.generated_key.is_none());
        assert!(entry.dependencies.is_none());
    }

    #[test]
    fn test_entry_wrong_type() {
        let entry = CacheEntry::new("text".to_string(), 0);

        assert!(entry.value::<i64>().is_none());
        assert!(entry.holds::<String>());
        assert!(!entry.holds::<i64>());
    }

    #[test]
    fn test_entry_metadata() {
        let entry = CacheEntry::new(1_u8, 0)
            .with_generated_key("[1,2]")
            .with_dependencies(vec![json!({"theme": "dark"})]);

        assert_eq!(entry.generated_key.as_deref(), Some("[1,2]"));
        assert_eq!(entry.dependencies, Some(vec![json!({"theme": "dark"})]));
    }

    #[test]
    fn test_entry_never_stale_without_max_age() {
        let entry = CacheEntry::new(1_u8, 0);
        assert!(!entry.is_stale(None, u64::MAX));
    }

    #[test]
    fn test_staleness_boundary_condition() {
        let entry = CacheEntry::new(1_u8, 1_000);

        // Exactly max_age old is still fresh
        assert!(!entry.is_stale(Some(500), 1_500));
        assert!(entry.is_stale(Some(500), 1_501));
    }

    #[test]
    fn test_age_saturates_when_clock_is_behind() {
        let entry = CacheEntry::new(1_u8, 2_000);
        assert_eq!(entry.age_ms(1_000), 0);
    }

    #[test]
    fn test_clone_is_shallow() {
        let entry = CacheEntry::new(vec![1, 2, 3], 0);
        let copy = entry.clone();

        let original = entry.value::<Vec<i32>>().unwrap();
        let cloned = copy.value::<Vec<i32>>().unwrap();
        assert!(std::ptr::eq(original, cloned));
    }

    #[test]
    fn test_current_timestamp_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(current_timestamp_ms() > 1_577_836_800_000);
    }
}
