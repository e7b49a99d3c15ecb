//! Dependency Composition
//!
//! Folds externally observed state into one stable string that can be
//! appended to call arguments as key material.

use serde_json::Value;

/// Composes dependency values into a single canonical string.
///
/// Keyed records become a list of `"name:value"` strings sorted by field
/// name, so field order never changes the result. Any other value is kept
/// as is. The parts are joined as a compact JSON array.
pub fn compose_dependencies(dependencies: &[Value]) -> String {
    let parts: Vec<Value> = dependencies
        .iter()
        .map(|dependency| match dependency {
            Value::Object(record) => {
                let mut fields: Vec<(&String, &Value)> = record.iter().collect();
                fields.sort_by(|(a, _), (b, _)| a.cmp(b));
                Value::Array(
                    fields
                        .into_iter()
                        .map(|(name, value)| Value::String(format!("{}:{}", name, value)))
                        .collect(),
                )
            }
            other => other.clone(),
        })
        .collect();

    Value::Array(parts).to_string()
}
