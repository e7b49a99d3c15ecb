//! Memo Cache - An in-process memoization engine
//!
//! Caches the results of pure(ish) computations per memoized member, with
//! staleness bounds, creation-order eviction, hit/miss accounting,
//! dependency-aware keys and deferred (future) results.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod keys;
pub mod memoize;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStore, SegmentStats};
pub use config::Config;
pub use error::{MemoizeError, Result};
pub use keys::{CacheKey, KeyGenerator, KeyStrategy};
pub use memoize::{Cacheable, Deferred, MemoizeOptions, Memoizer};
pub use tasks::spawn_sweep_task;

#[doc(hidden)]
pub use serde_json;

/// Builds an argument list of JSON values.
///
/// ```
/// use memo_cache::args;
///
/// let args = args![1, "two", [3]];
/// assert_eq!(args.len(), 3);
/// assert!(args![].is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::serde_json::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::serde_json::json!($arg)),+]
    };
}
