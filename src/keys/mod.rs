//! Keys Module
//!
//! Key material handling: argument-to-key strategies and dependency
//! composition.

mod dependency;
mod generator;

pub use dependency::compose_dependencies;
pub use generator::{
    canonicalize, CacheKey, ContentHashKeyGenerator, KeyGenerator, KeyStrategy,
    StructuralKeyGenerator,
};
