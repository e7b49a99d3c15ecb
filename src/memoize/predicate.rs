//! Storage Predicate
//!
//! Decides whether a computed result is worth caching. Falsy scalars and
//! empty sequences are never stored, so calls producing them recompute
//! until a cacheable result appears.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use serde_json::Value;

/// Results that can be gated by the storage predicate.
///
/// The default implementation treats every value as cacheable, which suits
/// plain records. Implement it with an override for types that have an
/// "empty" or "falsy" state of their own.
pub trait Cacheable {
    fn is_cacheable(&self) -> bool {
        true
    }
}

impl Cacheable for bool {
    fn is_cacheable(&self) -> bool {
        *self
    }
}

macro_rules! impl_cacheable_int {
    ($($ty:ty),*) => {
        $(
            impl Cacheable for $ty {
                fn is_cacheable(&self) -> bool {
                    *self != 0
                }
            }
        )*
    };
}

impl_cacheable_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Cacheable for f32 {
    fn is_cacheable(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl Cacheable for f64 {
    fn is_cacheable(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl Cacheable for () {
    fn is_cacheable(&self) -> bool {
        false
    }
}

impl Cacheable for str {
    fn is_cacheable(&self) -> bool {
        !self.is_empty()
    }
}

impl Cacheable for String {
    fn is_cacheable(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Cacheable for [T] {
    fn is_cacheable(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Cacheable for Vec<T> {
    fn is_cacheable(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Cacheable for VecDeque<T> {
    fn is_cacheable(&self) -> bool {
        !self.is_empty()
    }
}

impl<T, S> Cacheable for HashSet<T, S> {
    fn is_cacheable(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Cacheable for BTreeSet<T> {
    fn is_cacheable(&self) -> bool {
        !self.is_empty()
    }
}

// Keyed records are truthy even when empty
impl<K, V, S> Cacheable for HashMap<K, V, S> {}

impl<K, V> Cacheable for BTreeMap<K, V> {}

impl<T: Cacheable> Cacheable for Option<T> {
    fn is_cacheable(&self) -> bool {
        self.as_ref().is_some_and(Cacheable::is_cacheable)
    }
}

/// An `Err` is a failed computation and is never stored.
impl<T: Cacheable, E> Cacheable for Result<T, E> {
    fn is_cacheable(&self) -> bool {
        self.as_ref().is_ok_and(Cacheable::is_cacheable)
    }
}

impl<T: Cacheable + ?Sized> Cacheable for &T {
    fn is_cacheable(&self) -> bool {
        (**self).is_cacheable()
    }
}

impl<T: Cacheable + ?Sized> Cacheable for Box<T> {
    fn is_cacheable(&self) -> bool {
        (**self).is_cacheable()
    }
}

impl<T: Cacheable + ?Sized> Cacheable for Arc<T> {
    fn is_cacheable(&self) -> bool {
        (**self).is_cacheable()
    }
}

impl Cacheable for Value {
    fn is_cacheable(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
            Value::String(text) => !text.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_falsy_scalars() {
        assert!(!0_i32.is_cacheable());
        assert!(!0.0_f64.is_cacheable());
        assert!(!f64::NAN.is_cacheable());
        assert!(!false.is_cacheable());
        assert!(!String::new().is_cacheable());
        assert!(!"".is_cacheable());
        assert!(!().is_cacheable());
    }

    #[test]
    fn test_truthy_scalars() {
        assert!(2_u64.is_cacheable());
        assert!((-1_i64).is_cacheable());
        assert!(0.5_f32.is_cacheable());
        assert!(true.is_cacheable());
        assert!("x".is_cacheable());
    }

    #[test]
    fn test_sequences() {
        assert!(!Vec::<i32>::new().is_cacheable());
        assert!(vec![0].is_cacheable());
        assert!(!VecDeque::<u8>::new().is_cacheable());
        assert!(!HashSet::<u8>::new().is_cacheable());
    }

    #[test]
    fn test_records_always_cacheable() {
        assert!(HashMap::<String, i32>::new().is_cacheable());
        assert!(BTreeMap::<String, i32>::new().is_cacheable());
    }

    #[test]
    fn test_option_and_result() {
        assert!(!None::<i32>.is_cacheable());
        assert!(!Some(0).is_cacheable());
        assert!(Some(3).is_cacheable());

        let failed: Result<i32, String> = Err("boom".into());
        assert!(!failed.is_cacheable());
        assert!(Ok::<_, String>(3).is_cacheable());
        assert!(!Ok::<_, String>(0).is_cacheable());
    }

    #[test]
    fn test_smart_pointers_delegate() {
        assert!(!Arc::new(0_u8).is_cacheable());
        assert!(Box::new("x".to_string()).is_cacheable());
    }

    #[test]
    fn test_json_values() {
        assert!(!Value::Null.is_cacheable());
        assert!(!json!(0).is_cacheable());
        assert!(!json!("").is_cacheable());
        assert!(!json!([]).is_cacheable());
        assert!(!json!(false).is_cacheable());
        assert!(json!({}).is_cacheable());
        assert!(json!([0]).is_cacheable());
        assert!(json!(-2.5).is_cacheable());
    }

    #[test]
    fn test_custom_type_default_is_cacheable() {
        struct Quote;
        impl Cacheable for Quote {}

        assert!(Quote.is_cacheable());
    }
}
