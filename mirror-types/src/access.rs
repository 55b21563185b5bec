//! Lenient accessors over decoded JSON objects.
//!
//! Payloads from the remote are semi-trusted: a field that is missing or has
//! the wrong JSON type reads as its default instead of failing the whole
//! message. Numbers may arrive as floats and are truncated.

use serde_json::{Map, Value};

/// Typed, defaulting reads from a JSON object.
pub trait ObjectExt {
    /// Integer field, or `default` when absent or not a number.
    fn int_or(&self, key: &str, default: i64) -> i64;

    /// String field, or `None` when absent or not a string.
    fn str_field(&self, key: &str) -> Option<&str>;

    /// Boolean field; only a JSON `true` reads as true.
    fn flag(&self, key: &str) -> bool;

    /// Array field, or an empty slice when absent or not an array.
    fn array_field(&self, key: &str) -> &[Value];

    /// Object field, or `None` when absent or not an object.
    fn object_field(&self, key: &str) -> Option<&Map<String, Value>>;
}

impl ObjectExt for Map<String, Value> {
    fn int_or(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(default),
            _ => default,
        }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::Bool(true)))
    }

    fn array_field(&self, key: &str) -> &[Value] {
        self.get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn object_field(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }
}
