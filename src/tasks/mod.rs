//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the engine.
//!
//! # Tasks
//! - Sweep: removes entries that outlived their segment's max age

mod sweep;

pub use sweep::spawn_sweep_task;
