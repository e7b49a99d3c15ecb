//! API Module
//!
//! HTTP handlers and routing for the cache diagnostics surface. This is the
//! only place outside the memoizers where application code touches the
//! store: reading stats, dumping segments and triggering clears.
//!
//! # Endpoints
//! - `GET /stats` - Stats for every segment
//! - `GET /segments/:id` - Stats for one segment
//! - `GET /dump` - Entry metadata for every segment
//! - `DELETE /cache/:id` - Clear one segment
//! - `DELETE /cache` - Clear every segment
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
