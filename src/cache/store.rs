//! Cache Store Module
//!
//! Owns every segment, creating them lazily by identifier.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::cache::{CacheEntry, CacheSegment, SegmentStats};
use crate::keys::CacheKey;

// == Cache Store ==
/// All cache segments, guarded by one lock.
///
/// Every operation takes the lock for its whole duration, so a lookup,
/// eviction and counter update done inside [`with_segment`](Self::with_segment)
/// is never interleaved with another caller's.
#[derive(Debug, Default)]
pub struct CacheStore {
    segments: RwLock<HashMap<String, CacheSegment>>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty, independent store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store ready to be shared between memoizers.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Process-wide store for callers that do not inject their own.
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<CacheStore>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(CacheStore::shared))
    }

    // == Get Segment ==
    /// Returns a snapshot of the segment, creating it on first reference.
    pub fn get_segment(&self, identifier: &str) -> CacheSegment {
        self.with_segment(identifier, |segment| segment.clone())
    }

    /// Runs `f` on the segment under the store's write lock, creating the
    /// segment with zeroed counters if needed.
    ///
    /// `f` must not call back into the store.
    pub fn with_segment<R>(&self, identifier: &str, f: impl FnOnce(&mut CacheSegment) -> R) -> R {
        let mut segments = self.segments.write();
        let segment = segments
            .entry(identifier.to_string())
            .or_insert_with(|| CacheSegment::new(identifier));
        f(segment)
    }

    pub fn contains_segment(&self, identifier: &str) -> bool {
        self.segments.read().contains_key(identifier)
    }

    // == Insert Bounded ==
    /// Stores `entry` under `key`, first evicting the oldest entries if a new
    /// key would push the segment past `max_size`.
    ///
    /// The segment adopts `max_age` as its sweep bound, including a segment
    /// recreated here after a clear. Returns the evicted entries with their
    /// keys.
    pub fn insert_bounded(
        &self,
        identifier: &str,
        key: CacheKey,
        entry: CacheEntry,
        max_size: Option<usize>,
        max_age: Option<u64>,
    ) -> Vec<(CacheKey, CacheEntry)> {
        self.with_segment(identifier, |segment| {
            segment.set_max_age(max_age);
            let evicted = match max_size {
                Some(max_size) if !segment.contains(&key) => segment.make_room(max_size),
                _ => Vec::new(),
            };
            segment.insert(key, entry);
            evicted
        })
    }

    // == Clear ==
    /// Removes one segment and its counters, or every segment when
    /// `identifier` is None. Unknown identifiers are ignored.
    pub fn clear(&self, identifier: Option<&str>) {
        let mut segments = self.segments.write();
        match identifier {
            Some(identifier) => {
                if segments.remove(identifier).is_some() {
                    info!(identifier, "Cleared cache segment");
                }
            }
            None => {
                let count = segments.len();
                segments.clear();
                info!("Cleared {} cache segments", count);
            }
        }
    }

    // == Record Hit / Miss ==
    /// Increments the hit counter of an existing segment; no-op otherwise.
    pub fn record_hit(&self, identifier: &str) {
        if let Some(segment) = self.segments.write().get_mut(identifier) {
            segment.record_hit();
        }
    }

    /// Increments the miss counter of an existing segment; no-op otherwise.
    pub fn record_miss(&self, identifier: &str) {
        if let Some(segment) = self.segments.write().get_mut(identifier) {
            segment.record_miss();
        }
    }

    // == Stats ==
    /// Returns stats for every segment, ordered by identifier.
    pub fn stats(&self) -> BTreeMap<String, SegmentStats> {
        self.segments
            .read()
            .iter()
            .map(|(identifier, segment)| (identifier.clone(), segment.stats()))
            .collect()
    }

    /// Returns stats for one segment without creating it.
    pub fn segment_stats(&self, identifier: &str) -> Option<SegmentStats> {
        self.segments.read().get(identifier).map(CacheSegment::stats)
    }

    // == Dump ==
    /// Read-only snapshot of every segment.
    ///
    /// Entries are cloned shallowly; stored values are shared but immutable.
    pub fn dump(&self) -> BTreeMap<String, CacheSegment> {
        self.segments
            .read()
            .iter()
            .map(|(identifier, segment)| (identifier.clone(), segment.clone()))
            .collect()
    }

    // == Sweep Expired ==
    /// Removes expired entries from every segment that has a `max_age`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&self, now: u64) -> usize {
        let mut segments = self.segments.write();
        let removed = segments
            .values_mut()
            .map(|segment| segment.sweep_expired(now))
            .sum();
        debug!("Swept {} expired entries", removed);
        removed
    }

    // == Length ==
    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.read().is_empty()
    }
}
