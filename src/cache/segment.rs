//! Cache Segment Module
//!
//! One named partition of the store: the entries of a single memoized
//! member together with its hit/miss counters.

use std::collections::HashMap;

use crate::cache::{CacheEntry, SegmentStats};
use crate::keys::CacheKey;

// == Cache Segment ==
/// Entries and counters for one memoized member.
///
/// Eviction is creation-order: the entry with the smallest `created_at`
/// goes first, ties broken by insertion order. Hits never move an entry.
#[derive(Debug, Clone)]
pub struct CacheSegment {
    /// Caller-supplied identifier, e.g. `"PriceCalculator_subtotal"`
    identifier: String,
    /// Stored results by key
    entries: HashMap<CacheKey, CacheEntry>,
    /// Number of lookups answered from the segment
    hits: u64,
    /// Number of lookups that had to compute
    misses: u64,
    /// Staleness bound of the memoizer owning the segment, used by sweeps
    max_age: Option<u64>,
    /// Next insertion sequence number
    next_sequence: u64,
}

impl CacheSegment {
    // == Constructor ==
    /// Creates an empty segment with zeroed counters.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
            max_age: None,
            next_sequence: 0,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn max_age(&self) -> Option<u64> {
        self.max_age
    }

    pub(crate) fn set_max_age(&mut self, max_age: Option<u64>) {
        self.max_age = max_age;
    }

    // == Lookup ==
    /// Returns the entry stored under `key`.
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over all entries in unspecified order.
    pub fn entries(&self) -> impl Iterator<Item = (&CacheKey, &CacheEntry)> {
        self.entries.iter()
    }

    // == Insert ==
    /// Stores `entry` under `key`, replacing any entry with the same key.
    ///
    /// Returns the replaced entry. Capacity is not checked here; see
    /// [`make_room`](Self::make_room).
    pub fn insert(&mut self, key: CacheKey, mut entry: CacheEntry) -> Option<CacheEntry> {
        entry.sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.insert(key, entry)
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        self.entries.remove(key)
    }

    // == Evict Oldest ==
    /// Removes and returns the entry created first, with its key.
    ///
    /// Returns None if the segment is empty.
    pub fn evict_oldest(&mut self) -> Option<(CacheKey, CacheEntry)> {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| (entry.created_at, entry.sequence))
            .map(|(key, _)| key.clone())?;

        self.entries.remove_entry(&oldest)
    }

    // == Make Room ==
    /// Evicts oldest entries until one more insertion fits in `max_size`.
    ///
    /// Returns the evicted entries, oldest first.
    pub fn make_room(&mut self, max_size: usize) -> Vec<(CacheKey, CacheEntry)> {
        let mut evicted = Vec::new();
        while !self.entries.is_empty() && self.entries.len() >= max_size {
            match self.evict_oldest() {
                Some(pair) => evicted.push(pair),
                None => break,
            }
        }
        evicted
    }

    // == Counters ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Last Accessed ==
    /// Largest `created_at` across current entries, None when empty.
    pub fn last_accessed(&self) -> Option<u64> {
        self.entries.values().map(|entry| entry.created_at).max()
    }

    // == Stats ==
    pub fn stats(&self) -> SegmentStats {
        SegmentStats::new(self.len(), self.last_accessed(), self.hits, self.misses)
    }

    // == Sweep Expired ==
    /// Removes every entry older than the segment's `max_age`.
    ///
    /// Returns the number of entries removed. Counters are untouched.
    pub fn sweep_expired(&mut self, now: u64) -> usize {
        let max_age = self.max_age;
        if max_age.is_none() {
            return 0;
        }

        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_stale(max_age, now));
        before - self.entries.len()
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
