//! Cache Statistics Module
//!
//! Per-segment performance summary: size, newest entry and hit/miss rates.

use serde::Serialize;

// == Segment Stats ==
/// Snapshot of one segment's performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentStats {
    /// Current number of entries in the segment
    pub size: usize,
    /// Largest `created_at` across current entries, `None` when empty
    pub last_accessed: Option<u64>,
    /// hits / (hits + misses), 0.0 before any access
    pub hit_rate: f64,
    /// misses / (hits + misses), 0.0 before any access
    pub miss_rate: f64,
}

impl SegmentStats {
    // == Constructor ==
    /// Builds stats from raw counters.
    pub fn new(size: usize, last_accessed: Option<u64>, hits: u64, misses: u64) -> Self {
        let total = hits + misses;
        let (hit_rate, miss_rate) = if total == 0 {
            (0.0, 0.0)
        } else {
            (hits as f64 / total as f64, misses as f64 / total as f64)
        };

        Self {
            size,
            last_accessed,
            hit_rate,
            miss_rate,
        }
    }
}
