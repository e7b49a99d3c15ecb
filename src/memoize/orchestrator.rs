//! Memoization Orchestrator
//!
//! Control flow around one memoized callable: key computation, lookup,
//! staleness check, eviction, invocation and conditional storage.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::cache::{CacheEntry, CacheStore, Clock, SystemClock};
use crate::error::{MemoizeError, Result};
use crate::keys::{compose_dependencies, CacheKey, KeyGenerator, StructuralKeyGenerator};
use crate::memoize::{Cacheable, MemoizeOptions};

/// Handle to a deferred computation; clones resolve to the same output.
pub type Deferred<T> = Shared<BoxFuture<'static, T>>;

/// Key material computed for one invocation.
#[derive(Debug, Clone)]
struct CallKeys {
    /// Arguments with nulls removed, as passed to the callable
    args: Vec<Value>,
    /// Storage key
    key: CacheKey,
    /// Key reported to observers and traces
    human_key: CacheKey,
    /// Raw dependency values, when a supplier is configured
    dependencies: Option<Vec<Value>>,
}

/// Where and how a computed result is stored.
struct Placement<'a> {
    store: &'a CacheStore,
    identifier: &'a str,
    debug_label: Option<&'a str>,
    max_size: Option<usize>,
    max_age: Option<u64>,
}

impl Placement<'_> {
    /// Stores an entry, evicting first when a new key would exceed `max_size`.
    fn insert(&self, key: CacheKey, entry: CacheEntry) {
        let evicted = self
            .store
            .insert_bounded(self.identifier, key, entry, self.max_size, self.max_age);
        for (key, entry) in evicted {
            trace_status(self.debug_label, self.identifier, "eviction", &human_key(key, entry));
        }
    }
}

/// Outcome of the locked lookup phase.
enum Lookup<V> {
    Hit(V),
    Miss { expired: bool, evicted: Vec<CacheKey> },
}

// == Memoizer ==
/// Memoizes calls for one member against an injected [`CacheStore`].
///
/// The memoizer is the explicit wrapper applied at composition time: it
/// owns the segment identifier and options, and runs any callable of N
/// arguments through the cache.
///
/// # Example
/// ```
/// use memo_cache::{args, CacheStore, MemoizeOptions, Memoizer};
///
/// let store = CacheStore::shared();
/// let add = Memoizer::for_member(store.clone(), "Calculator", "add", MemoizeOptions::new())
///     .unwrap();
///
/// let sum = |args: &[serde_json::Value]| {
///     args.iter().filter_map(|arg| arg.as_i64()).sum::<i64>()
/// };
/// assert_eq!(add.invoke(args![1, 1], sum), 2);
/// assert_eq!(add.invoke(args![1, 1], sum), 2);
/// assert_eq!(store.stats()["Calculator_add"].hit_rate, 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Memoizer {
    store: Arc<CacheStore>,
    identifier: String,
    options: MemoizeOptions,
    clock: Arc<dyn Clock>,
}

impl Memoizer {
    // == Constructor ==
    /// Creates a memoizer for the segment `identifier`.
    ///
    /// Invalid options and empty identifiers are rejected here, never at
    /// call time.
    pub fn new(
        store: Arc<CacheStore>,
        identifier: impl Into<String>,
        options: MemoizeOptions,
    ) -> Result<Self> {
        let identifier = identifier.into();
        if identifier.trim().is_empty() {
            return Err(MemoizeError::Configuration(
                "cache identifier must not be empty".to_string(),
            ));
        }
        options.validate()?;

        Ok(Self {
            store,
            identifier,
            options,
            clock: Arc::new(SystemClock),
        })
    }

    /// Creates a memoizer identified as `"<owner>_<member>"`.
    pub fn for_member(
        store: Arc<CacheStore>,
        owner: &str,
        member: &str,
        options: MemoizeOptions,
    ) -> Result<Self> {
        if owner.is_empty() || member.is_empty() {
            return Err(MemoizeError::Configuration(
                "owner and member names must not be empty".to_string(),
            ));
        }
        Self::new(store, format!("{}_{}", owner, member), options)
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn options(&self) -> &MemoizeOptions {
        &self.options
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// Drops this member's segment and counters.
    pub fn clear(&self) {
        self.store.clear(Some(&self.identifier));
    }

    // == Invoke ==
    /// Returns the cached result for `args`, or computes it with `f`.
    ///
    /// `f` receives the arguments with nulls removed. The result is stored
    /// only when it passes the storage predicate.
    pub fn invoke<T, F>(&self, args: Vec<Value>, f: F) -> T
    where
        T: Cacheable + Clone + Send + Sync + 'static,
        F: FnOnce(&[Value]) -> T,
    {
        let keys = self.call_keys(args);
        let now = self.clock.now_ms();

        if let Some(value) = self.lookup::<T>(&keys, now) {
            return value;
        }

        let result = f(&keys.args);
        if result.is_cacheable() {
            let entry = self.entry_for(&keys, result.clone(), now);
            self.placement().insert(keys.key, entry);
        } else {
            trace!(identifier = %self.identifier, key = %keys.human_key, "Result not cacheable");
        }
        result
    }

    // == Invoke Deferred ==
    /// Memoizes an asynchronous computation.
    ///
    /// The returned handle is handed back immediately. A completion task on
    /// the current tokio runtime drives the computation and, once it
    /// resolves to a cacheable output, stores the handle itself under the
    /// key with the invocation timestamp. A later hit returns a clone that
    /// resolves at once to the same output. Overlapping calls with the same
    /// key each run `f`.
    ///
    /// Errors with [`MemoizeError::NoRuntime`] before running `f` when no
    /// tokio runtime is available.
    pub fn invoke_deferred<T, F, Fut>(&self, args: Vec<Value>, f: F) -> Result<Deferred<T>>
    where
        T: Cacheable + Clone + Send + Sync + 'static,
        F: FnOnce(&[Value]) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| MemoizeError::NoRuntime)?;

        let keys = self.call_keys(args);
        let now = self.clock.now_ms();

        if let Some(pending) = self.lookup::<Deferred<T>>(&keys, now) {
            return Ok(pending);
        }

        let deferred: Deferred<T> = f(&keys.args).boxed().shared();
        let entry = self.entry_for(&keys, deferred.clone(), now);

        let completion = deferred.clone();
        let store = Arc::clone(&self.store);
        let identifier = self.identifier.clone();
        let debug_label = self.options.debug_label.clone();
        let (max_size, max_age) = (self.options.max_size, self.options.max_age_ms);
        runtime.spawn(async move {
            let output = completion.await;
            if output.is_cacheable() {
                let placement = Placement {
                    store: &store,
                    identifier: &identifier,
                    debug_label: debug_label.as_deref(),
                    max_size,
                    max_age,
                };
                placement.insert(keys.key, entry);
            } else {
                trace!(
                    identifier = %identifier,
                    key = %keys.human_key,
                    "Deferred result not cacheable"
                );
            }
        });

        Ok(deferred)
    }

    // == Key Material ==
    /// Filters nulls, folds in dependencies and computes both keys.
    fn call_keys(&self, args: Vec<Value>) -> CallKeys {
        let args: Vec<Value> = args.into_iter().filter(|arg| !arg.is_null()).collect();

        let dependencies = self.options.dependencies.as_ref().map(|supplier| supplier());
        let mut material = args.clone();
        if let Some(dependencies) = &dependencies {
            material.push(Value::String(compose_dependencies(dependencies)));
        }

        let key = self.options.key_strategy.generate(&material);
        let human_key = match &self.options.key_generator {
            Some(generator) => generator(&material),
            None => StructuralKeyGenerator::positional().generate(&material),
        };

        CallKeys {
            args,
            key,
            human_key,
            dependencies,
        }
    }

    fn placement(&self) -> Placement<'_> {
        Placement {
            store: &self.store,
            identifier: &self.identifier,
            debug_label: self.options.debug_label.as_deref(),
            max_size: self.options.max_size,
            max_age: self.options.max_age_ms,
        }
    }

    fn entry_for<V: Any + Send + Sync>(&self, keys: &CallKeys, value: V, now: u64) -> CacheEntry {
        let entry = CacheEntry::new(value, now).with_generated_key(keys.human_key.clone());
        match &keys.dependencies {
            Some(dependencies) => entry.with_dependencies(dependencies.clone()),
            None => entry,
        }
    }

    // == Lookup ==
    /// Runs the hit/stale/miss decision and pre-insert eviction under one
    /// store lock, then reports to observers outside of it.
    fn lookup<V: Any + Clone>(&self, keys: &CallKeys, now: u64) -> Option<V> {
        let max_age = self.options.max_age_ms;
        let max_size = self.options.max_size;

        let outcome = self.store.with_segment(&self.identifier, |segment| {
            segment.set_max_age(max_age);

            let mut expired = false;
            if let Some(entry) = segment.get(&keys.key) {
                if entry.is_stale(max_age, now) {
                    expired = true;
                } else if let Some(value) = entry.value::<V>() {
                    let value = value.clone();
                    segment.record_hit();
                    return Lookup::Hit(value);
                } else {
                    warn!(
                        identifier = %segment.identifier(),
                        key = %keys.human_key,
                        "Cached value has an unexpected type, recomputing"
                    );
                }
                segment.remove(&keys.key);
            }

            segment.record_miss();
            let evicted = match max_size {
                Some(max_size) => segment
                    .make_room(max_size)
                    .into_iter()
                    .map(|(key, entry)| human_key(key, entry))
                    .collect(),
                None => Vec::new(),
            };
            Lookup::Miss { expired, evicted }
        });

        match outcome {
            Lookup::Hit(value) => {
                self.trace_status("hit", &keys.human_key);
                if let Some(observer) = &self.options.on_cache_hit {
                    observer(&keys.human_key);
                }
                Some(value)
            }
            Lookup::Miss { expired, evicted } => {
                let status = if expired { "miss (expired)" } else { "miss" };
                self.trace_status(status, &keys.human_key);
                for key in &evicted {
                    self.trace_status("eviction", key);
                }
                if let Some(observer) = &self.options.on_cache_miss {
                    observer(&keys.human_key);
                }
                None
            }
        }
    }

    fn trace_status(&self, status: &str, key: &str) {
        trace_status(self.options.debug_label.as_deref(), &self.identifier, status, key);
    }
}

/// Emits one hit/miss/eviction line, tagged with the debug label when set.
fn trace_status(label: Option<&str>, identifier: &str, status: &str, key: &str) {
    match label {
        Some(label) => debug!("[Memoize: {}] Cache {} for key: {}", label, status, key),
        None => trace!(identifier, "Cache {} for key: {}", status, key),
    }
}

/// Key an evicted entry is reported under: its human-readable key if known.
fn human_key(key: CacheKey, entry: CacheEntry) -> CacheKey {
    entry.generated_key.unwrap_or(key)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::cache::ManualClock;
    use crate::keys::KeyStrategy;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn memoizer(options: MemoizeOptions) -> (Memoizer, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000));
        let memoizer = Memoizer::new(CacheStore::shared(), "Calc_add", options)
            .unwrap()
            .with_clock(clock.clone());
        (memoizer, clock)
    }

    fn sum(args: &[Value]) -> i64 {
        args.iter().filter_map(Value::as_i64).sum()
    }

    #[test]
    fn test_empty_identifier_rejected() {
        let result = Memoizer::new(CacheStore::shared(), "  ", MemoizeOptions::new());
        assert!(matches!(result, Err(MemoizeError::Configuration(_))));
    }

    #[test]
    fn test_invalid_options_rejected_at_setup() {
        let result = Memoizer::new(CacheStore::shared(), "id", MemoizeOptions::new().max_size(0));
        assert!(matches!(result, Err(MemoizeError::Configuration(_))));
    }

    #[test]
    fn test_for_member_identifier() {
        let memoizer =
            Memoizer::for_member(CacheStore::shared(), "Product", "subtotal", MemoizeOptions::new())
                .unwrap();
        assert_eq!(memoizer.identifier(), "Product_subtotal");
    }

    #[test]
    fn test_second_call_hits() {
        let (memoizer, _) = memoizer(MemoizeOptions::new());
        let calls = AtomicUsize::new(0);
        let counted = |args: &[Value]| {
            calls.fetch_add(1, Ordering::SeqCst);
            sum(args)
        };

        assert_eq!(memoizer.invoke(args![2, 3], counted), 5);
        assert_eq!(memoizer.invoke(args![2, 3], counted), 5);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let segment = memoizer.store().get_segment("Calc_add");
        assert_eq!(segment.hits(), 1);
        assert_eq!(segment.misses(), 1);
    }

    #[test]
    fn test_nulls_are_filtered_from_key_and_callable() {
        let (memoizer, _) = memoizer(MemoizeOptions::new());
        let seen = Mutex::new(Vec::new());

        memoizer.invoke(vec![json!(1), Value::Null, json!(2)], |args| {
            seen.lock().unwrap().push(args.to_vec());
            sum(args)
        });
        let value = memoizer.invoke(args![1, 2], sum);

        assert_eq!(value, 3);
        assert_eq!(*seen.lock().unwrap(), vec![vec![json!(1), json!(2)]]);
        assert!(memoizer.store().get_segment("Calc_add").contains("[1,2]"));
    }

    #[test]
    fn test_stale_entry_recomputed() {
        let (memoizer, clock) = memoizer(MemoizeOptions::new().max_age_ms(100));
        let calls = AtomicUsize::new(0);
        let counted = |args: &[Value]| {
            calls.fetch_add(1, Ordering::SeqCst);
            sum(args)
        };

        memoizer.invoke(args![1], counted);
        clock.advance(100);
        memoizer.invoke(args![1], counted);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        clock.advance(1);
        memoizer.invoke(args![1], counted);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let segment = memoizer.store().get_segment("Calc_add");
        assert_eq!(segment.get("[1]").unwrap().created_at, 1_101);
        // One miss per non-hit invocation, the expired one included
        assert_eq!(segment.misses(), 2);
        assert_eq!(segment.hits(), 1);
    }

    #[test]
    fn test_falsy_results_never_stored() {
        let (memoizer, _) = memoizer(MemoizeOptions::new());
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let empty: Vec<i32> = memoizer.invoke(args!["q"], |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                Vec::new()
            });
            assert!(empty.is_empty());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(memoizer.store().get_segment("Calc_add").is_empty());
    }

    #[test]
    fn test_observers_receive_human_key() {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let misses = Arc::new(Mutex::new(Vec::new()));
        let (hit_log, miss_log) = (hits.clone(), misses.clone());

        let options = MemoizeOptions::new()
            .key_strategy(KeyStrategy::ContentHash)
            .key_generator(|args| format!("add({})", args.len()))
            .on_cache_hit(move |key| hit_log.lock().unwrap().push(key.to_string()))
            .on_cache_miss(move |key| miss_log.lock().unwrap().push(key.to_string()));
        let (memoizer, _) = memoizer(options);

        memoizer.invoke(args![1, 2], sum);
        memoizer.invoke(args![1, 2], sum);

        assert_eq!(*misses.lock().unwrap(), vec!["add(2)".to_string()]);
        assert_eq!(*hits.lock().unwrap(), vec!["add(2)".to_string()]);

        // Storage key still comes from the strategy
        let segment = memoizer.store().get_segment("Calc_add");
        let (key, entry) = segment.entries().next().unwrap();
        assert_eq!(key.len(), 64);
        assert_eq!(entry.generated_key.as_deref(), Some("add(2)"));
    }

    #[test]
    fn test_miss_observer_called_once_on_expiry() {
        let misses = Arc::new(AtomicUsize::new(0));
        let counter = misses.clone();
        let options = MemoizeOptions::new()
            .max_age_ms(10)
            .on_cache_miss(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        let (memoizer, clock) = memoizer(options);

        memoizer.invoke(args![1], sum);
        clock.advance(11);
        memoizer.invoke(args![1], sum);

        assert_eq!(misses.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dependencies_change_key() {
        let theme = Arc::new(Mutex::new("light"));
        let current = theme.clone();
        let options = MemoizeOptions::new()
            .dependencies(move || vec![json!({ "theme": *current.lock().unwrap() })]);
        let (memoizer, _) = memoizer(options);
        let calls = AtomicUsize::new(0);
        let render = |args: &[Value]| {
            calls.fetch_add(1, Ordering::SeqCst);
            format!("rendered {}", args.len())
        };

        assert_eq!(memoizer.invoke(args!["page"], render), "rendered 1");
        memoizer.invoke(args!["page"], render);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        *theme.lock().unwrap() = "dark";
        memoizer.invoke(args!["page"], render);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let segment = memoizer.store().get_segment("Calc_add");
        assert_eq!(segment.len(), 2);
        assert!(segment
            .entries()
            .any(|(_, entry)| entry.dependencies == Some(vec![json!({"theme": "dark"})])));
    }

    #[test]
    fn test_type_mismatch_recomputes() {
        let store = CacheStore::shared();
        let as_number = Memoizer::new(store.clone(), "shared", MemoizeOptions::new()).unwrap();
        let as_text = Memoizer::new(store.clone(), "shared", MemoizeOptions::new()).unwrap();

        assert_eq!(as_number.invoke(args![1], sum), 1);
        assert_eq!(as_text.invoke(args![1], |_| "one".to_string()), "one");
        assert_eq!(as_text.invoke(args![1], |_| "two".to_string()), "one");
    }

    #[test]
    fn test_clear_drops_segment() {
        let (memoizer, _) = memoizer(MemoizeOptions::new());
        memoizer.invoke(args![1], sum);

        memoizer.clear();
        assert!(!memoizer.store().contains_segment("Calc_add"));
    }

    #[test]
    fn test_deferred_without_runtime() {
        let (memoizer, _) = memoizer(MemoizeOptions::new());
        let result = memoizer.invoke_deferred(args![1], |_| async { 1_i64 });
        assert!(matches!(result, Err(MemoizeError::NoRuntime)));
    }

    #[test]
    fn test_deferred_stores_after_resolution() {
        let (memoizer, _) = memoizer(MemoizeOptions::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let first = tokio_test::block_on(async {
            let counter = calls.clone();
            let pending = memoizer
                .invoke_deferred(args!["rust"], move |args| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let query = args[0].as_str().unwrap_or_default().to_string();
                    async move { vec![format!("{} book", query)] }
                })
                .unwrap();
            let value = pending.await;
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }
            value
        });
        assert_eq!(first, vec!["rust book".to_string()]);
        assert_eq!(memoizer.store().get_segment("Calc_add").len(), 1);

        let second = tokio_test::block_on(async {
            memoizer
                .invoke_deferred(args!["rust"], |_| async { vec!["recomputed".to_string()] })
                .unwrap()
                .await
        });
        assert_eq!(second, vec!["rust book".to_string()]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    // == Debug Label Output ==
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Runs `f` with a subscriber that records every line it emits.
    fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap())
            .lines()
            .map(str::to_string)
            .collect();
        (result, logs)
    }

    fn lines_with<'a>(logs: &'a [String], status: &str) -> Vec<&'a String> {
        let needle = format!("Cache {} for key", status);
        logs.iter().filter(|line| line.contains(&needle)).collect()
    }

    #[test]
    fn test_debug_label_tags_hit_miss_and_eviction() {
        let options = MemoizeOptions::new()
            .max_size(1)
            .key_strategy(KeyStrategy::ContentHash)
            .debug_label("add");
        let (memoizer, _) = memoizer(options);

        let (_, logs) = capture_logs(|| {
            memoizer.invoke(args![1], sum);
            memoizer.invoke(args![1], sum);
            memoizer.invoke(args![2], sum);
        });

        let misses = lines_with(&logs, "miss");
        let hits = lines_with(&logs, "hit");
        let evictions = lines_with(&logs, "eviction");
        assert_eq!(misses.len(), 2);
        assert_eq!(hits.len(), 1);
        assert_eq!(evictions.len(), 1);
        for line in misses.iter().chain(&hits).chain(&evictions) {
            assert!(line.contains("[Memoize: add]"), "untagged line: {}", line);
        }
        // Evictions report the human-readable key, not the digest
        assert!(evictions[0].ends_with("Cache eviction for key: [1]"));
    }

    #[test]
    fn test_debug_label_tags_deferred_eviction() {
        let options = MemoizeOptions::new().max_size(1).debug_label("search");
        let (memoizer, _) = memoizer(options);

        let (_, logs) = capture_logs(|| {
            tokio_test::block_on(async {
                let first = memoizer.invoke_deferred(args![1], |_| async { 1_i64 }).unwrap();
                let second = memoizer.invoke_deferred(args![2], |_| async { 2_i64 }).unwrap();
                assert_eq!((first.await, second.await), (1, 2));
                for _ in 0..10 {
                    tokio::task::yield_now().await;
                }
            })
        });

        // Both lookups missed on an empty segment, so the eviction is at store time
        let evictions = lines_with(&logs, "eviction");
        assert_eq!(evictions.len(), 1);
        assert!(evictions[0].contains("[Memoize: search]"));
        assert_eq!(memoizer.store().get_segment("Calc_add").len(), 1);
    }

    #[test]
    fn test_without_label_nothing_logged_at_debug() {
        let (memoizer, _) = memoizer(MemoizeOptions::new().max_size(1));

        let (_, logs) = capture_logs(|| {
            memoizer.invoke(args![1], sum);
            memoizer.invoke(args![2], sum);
        });

        assert!(logs.iter().all(|line| !line.contains("[Memoize:")));
        assert!(logs.iter().any(|line| line.contains("TRACE")));
    }

    #[test]
    fn test_deferred_store_after_clear_keeps_max_age() {
        let (memoizer, clock) = memoizer(MemoizeOptions::new().max_age_ms(100));

        tokio_test::block_on(async {
            let pending = memoizer.invoke_deferred(args![5], |_| async { 5_i64 }).unwrap();
            memoizer.store().clear(None);
            pending.await;
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }
        });

        let store = memoizer.store();
        assert_eq!(store.get_segment("Calc_add").max_age(), Some(100));
        assert_eq!(store.sweep_expired(clock.now_ms() + 1_000), 1);
    }
}
