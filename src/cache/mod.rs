//! Cache Module
//!
//! Provides the segmented in-memory store backing memoized calls, with
//! creation-order eviction, staleness checks and hit/miss accounting.

mod clock;
mod entry;
mod segment;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{current_timestamp_ms, CacheEntry};
pub use segment::CacheSegment;
pub use stats::SegmentStats;
pub use store::CacheStore;
