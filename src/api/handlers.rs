//! API Handlers
//!
//! HTTP request handlers for each diagnostics endpoint.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{CacheStore, SegmentStats};
use crate::error::{MemoizeError, Result};
use crate::models::{ClearResponse, DumpResponse, HealthResponse, SegmentDump};

/// Application state shared across all handlers.
///
/// Holds the same store handle the memoizers were built with; the store
/// does its own locking.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CacheStore>,
}

impl AppState {
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self { store }
    }
}

/// Handler for GET /stats
///
/// Returns stats for every segment, keyed by identifier.
pub async fn stats_handler(State(state): State<AppState>) -> Json<BTreeMap<String, SegmentStats>> {
    Json(state.store.stats())
}

/// Handler for GET /segments/:id
///
/// Returns one segment's stats without creating it.
pub async fn segment_handler(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<SegmentStats>> {
    state
        .store
        .segment_stats(&identifier)
        .map(Json)
        .ok_or(MemoizeError::SegmentNotFound(identifier))
}

/// Handler for GET /dump
///
/// Returns every segment with its entry metadata.
pub async fn dump_handler(State(state): State<AppState>) -> Json<DumpResponse> {
    let segments = state
        .store
        .dump()
        .values()
        .map(SegmentDump::from)
        .collect();

    Json(DumpResponse { segments })
}

/// Handler for DELETE /cache/:id
///
/// Clears one segment; unknown identifiers are not an error.
pub async fn clear_segment_handler(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Json<ClearResponse> {
    state.store.clear(Some(&identifier));
    Json(ClearResponse::segment(identifier))
}

/// Handler for DELETE /cache
pub async fn clear_all_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.store.clear(None);
    Json(ClearResponse::all())
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.store.len()))
}
