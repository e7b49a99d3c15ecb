//! Memoize Module
//!
//! The orchestrator that runs callables through the cache, its options and
//! the storage predicate gating what gets stored.

mod options;
mod orchestrator;
mod predicate;

pub use options::{DependencySupplier, HumanKeyFn, KeyObserver, MemoizeOptions};
pub use orchestrator::{Deferred, Memoizer};
pub use predicate::Cacheable;
