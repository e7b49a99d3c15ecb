//! Key Generator Module
//!
//! Maps an ordered argument list to a cache key. Two families are provided:
//! structural keys (canonical JSON of the arguments) and content-hash keys
//! (a SHA-256 digest of the order-insensitive canonical form).

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Key identifying one memoized call within a segment.
pub type CacheKey = String;

// == Key Generator ==
/// Deterministic, side-effect free mapping from arguments to a key.
///
/// Null elements are serialized like any other value; filtering them out
/// is the caller's job.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self, args: &[Value]) -> CacheKey;
}

impl<F> KeyGenerator for F
where
    F: Fn(&[Value]) -> CacheKey + Send + Sync,
{
    fn generate(&self, args: &[Value]) -> CacheKey {
        self(args)
    }
}

// == Structural ==
/// Serializes the argument array as compact JSON.
///
/// Positional mode keeps object fields in declaration order, so `{a,b}` and
/// `{b,a}` produce different keys. Unordered mode sorts every object's
/// fields by name first. Arrays are always order-sensitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructuralKeyGenerator {
    unordered: bool,
}

impl StructuralKeyGenerator {
    pub fn positional() -> Self {
        Self { unordered: false }
    }

    pub fn unordered() -> Self {
        Self { unordered: true }
    }
}

impl KeyGenerator for StructuralKeyGenerator {
    fn generate(&self, args: &[Value]) -> CacheKey {
        if self.unordered {
            canonicalize(&Value::Array(args.to_vec())).to_string()
        } else {
            Value::Array(args.to_vec()).to_string()
        }
    }
}

// == Content Hash ==
/// Hex-encoded SHA-256 digest of the unordered structural form.
///
/// Keys are always 64 characters. Object field order is ignored, array
/// order is not, and values keep their JSON type (`1` and `"1"` differ).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentHashKeyGenerator;

impl KeyGenerator for ContentHashKeyGenerator {
    fn generate(&self, args: &[Value]) -> CacheKey {
        let canonical = StructuralKeyGenerator::unordered().generate(args);

        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Returns a copy of `value` with every object's fields sorted by name.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut fields: Vec<(&String, &Value)> = map.iter().collect();
            fields.sort_by(|(a, _), (b, _)| a.cmp(b));

            let mut sorted = Map::with_capacity(fields.len());
            for (name, field) in fields {
                sorted.insert(name.clone(), canonicalize(field));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

// == Key Strategy ==
/// Storage-key strategy selected per memoized member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyStrategy {
    /// Positional structural keys
    #[default]
    Structural,
    /// Structural keys with object fields sorted
    StructuralUnordered,
    /// Fixed-size SHA-256 keys
    ContentHash,
}

impl KeyGenerator for KeyStrategy {
    fn generate(&self, args: &[Value]) -> CacheKey {
        match self {
            KeyStrategy::Structural => StructuralKeyGenerator::positional().generate(args),
            KeyStrategy::StructuralUnordered => StructuralKeyGenerator::unordered().generate(args),
            KeyStrategy::ContentHash => ContentHashKeyGenerator.generate(args),
        }
    }
}

impl FromStr for KeyStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structural" | "positional" => Ok(KeyStrategy::Structural),
            "unordered" => Ok(KeyStrategy::StructuralUnordered),
            "hash" | "sha256" => Ok(KeyStrategy::ContentHash),
            other => Err(format!("Unknown key strategy: {}", other)),
        }
    }
}

impl fmt::Display for KeyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyStrategy::Structural => "structural",
            KeyStrategy::StructuralUnordered => "unordered",
            KeyStrategy::ContentHash => "hash",
        };
        f.write_str(name)
    }
}
