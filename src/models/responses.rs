//! Response DTOs for the diagnostics API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheEntry, CacheSegment};

/// One entry as shown by the dump endpoint (GET /dump)
///
/// Stored values are opaque and not rendered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDump {
    /// Storage key
    pub key: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Human-readable key
    pub generated_key: Option<String>,
    /// Dependency values observed at computation time
    pub dependencies: Option<Vec<Value>>,
}

impl EntryDump {
    pub fn new(key: impl Into<String>, entry: &CacheEntry) -> Self {
        Self {
            key: key.into(),
            created_at: entry.created_at,
            generated_key: entry.generated_key.clone(),
            dependencies: entry.dependencies.clone(),
        }
    }
}

/// One segment as shown by the dump endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SegmentDump {
    pub identifier: String,
    pub hits: u64,
    pub misses: u64,
    /// Entries ordered by creation time, oldest first
    pub entries: Vec<EntryDump>,
}

impl From<&CacheSegment> for SegmentDump {
    fn from(segment: &CacheSegment) -> Self {
        let mut entries: Vec<EntryDump> = segment
            .entries()
            .map(|(key, entry)| EntryDump::new(key.as_str(), entry))
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.key.cmp(&b.key)));

        Self {
            identifier: segment.identifier().to_string(),
            hits: segment.hits(),
            misses: segment.misses(),
            entries,
        }
    }
}

/// Response body for the dump endpoint (GET /dump)
#[derive(Debug, Clone, Serialize)]
pub struct DumpResponse {
    /// Segments ordered by identifier
    pub segments: Vec<SegmentDump>,
}

/// Response body for the clear endpoints (DELETE /cache, DELETE /cache/:id)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// Cleared identifier, None when every segment was cleared
    pub identifier: Option<String>,
}

impl ClearResponse {
    /// Creates a ClearResponse for one segment
    pub fn segment(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self {
            message: format!("Segment '{}' cleared", identifier),
            identifier: Some(identifier),
        }
    }

    /// Creates a ClearResponse for the whole store
    pub fn all() -> Self {
        Self {
            message: "All segments cleared".to_string(),
            identifier: None,
        }
    }
}

/// Response body for the health check endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// Number of live segments
    pub segments: usize,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(segments: usize) -> Self {
        Self {
            status: "healthy".to_string(),
            segments,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
