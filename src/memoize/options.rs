//! Memoize Options
//!
//! Per-member configuration: staleness bound, capacity, key strategy,
//! diagnostics label, observers and dependency supplier.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::config::Config;
use crate::error::{MemoizeError, Result};
use crate::keys::{CacheKey, KeyStrategy};

/// Produces the human-readable key reported to observers and traces.
pub type HumanKeyFn = Arc<dyn Fn(&[Value]) -> CacheKey + Send + Sync>;

/// Observer called with the human-readable key on hit or miss.
pub type KeyObserver = Arc<dyn Fn(&str) + Send + Sync>;

/// Supplies the external state a memoized result depends on.
pub type DependencySupplier = Arc<dyn Fn() -> Vec<Value> + Send + Sync>;

// == Memoize Options ==
/// Options recognized by a [`Memoizer`](crate::memoize::Memoizer).
///
/// # Example
/// ```
/// use std::time::Duration;
/// use memo_cache::memoize::MemoizeOptions;
///
/// let options = MemoizeOptions::new()
///     .max_age(Duration::from_secs(30))
///     .max_size(100)
///     .debug_label("subtotal");
/// assert_eq!(options.max_age_ms, Some(30_000));
/// ```
#[derive(Clone, Default)]
pub struct MemoizeOptions {
    /// Entries older than this many milliseconds are stale on next lookup
    pub max_age_ms: Option<u64>,
    /// Capacity bound of the segment
    pub max_size: Option<usize>,
    /// Strategy for the storage key
    pub key_strategy: KeyStrategy,
    /// Tag emitted with hit/miss/evict trace lines
    pub debug_label: Option<String>,
    pub(crate) key_generator: Option<HumanKeyFn>,
    pub(crate) on_cache_hit: Option<KeyObserver>,
    pub(crate) on_cache_miss: Option<KeyObserver>,
    pub(crate) dependencies: Option<DependencySupplier>,
}

impl MemoizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds options with the defaults loaded from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_age_ms: config.default_max_age_ms,
            max_size: config.default_max_size,
            key_strategy: config.key_strategy,
            ..Self::default()
        }
    }

    /// Sets the staleness bound.
    ///
    /// A non-zero bound shorter than a millisecond rounds up to one
    /// millisecond; bounds past `u64::MAX` milliseconds saturate.
    pub fn max_age(mut self, max_age: Duration) -> Self {
        let millis = match max_age.as_millis() {
            0 if !max_age.is_zero() => 1,
            millis => u64::try_from(millis).unwrap_or(u64::MAX),
        };
        self.max_age_ms = Some(millis);
        self
    }

    pub fn max_age_ms(mut self, max_age_ms: u64) -> Self {
        self.max_age_ms = Some(max_age_ms);
        self
    }

    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn key_strategy(mut self, strategy: KeyStrategy) -> Self {
        self.key_strategy = strategy;
        self
    }

    /// Overrides the human-readable key. The storage key is unaffected.
    pub fn key_generator<F>(mut self, generator: F) -> Self
    where
        F: Fn(&[Value]) -> CacheKey + Send + Sync + 'static,
    {
        self.key_generator = Some(Arc::new(generator));
        self
    }

    pub fn debug_label(mut self, label: impl Into<String>) -> Self {
        self.debug_label = Some(label.into());
        self
    }

    pub fn on_cache_hit<F>(mut self, observer: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_cache_hit = Some(Arc::new(observer));
        self
    }

    pub fn on_cache_miss<F>(mut self, observer: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_cache_miss = Some(Arc::new(observer));
        self
    }

    /// Makes results depend on external state.
    ///
    /// The supplier runs on every invocation; its composed output is folded
    /// into the key but never passed to the callable.
    pub fn dependencies<F>(mut self, supplier: F) -> Self
    where
        F: Fn() -> Vec<Value> + Send + Sync + 'static,
    {
        self.dependencies = Some(Arc::new(supplier));
        self
    }

    // == Validate ==
    /// Rejects bounds that could never hold an entry.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == Some(0) {
            return Err(MemoizeError::Configuration(
                "max_size must be at least 1".to_string(),
            ));
        }
        if self.max_age_ms == Some(0) {
            return Err(MemoizeError::Configuration(
                "max_age must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for MemoizeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoizeOptions")
            .field("max_age_ms", &self.max_age_ms)
            .field("max_size", &self.max_size)
            .field("key_strategy", &self.key_strategy)
            .field("debug_label", &self.debug_label)
            .field("key_generator", &self.key_generator.is_some())
            .field("on_cache_hit", &self.on_cache_hit.is_some())
            .field("on_cache_miss", &self.on_cache_miss.is_some())
            .field("dependencies", &self.dependencies.is_some())
            .finish()
    }
}
