// src/canon.rs
use serde::Serialize;
use serde_json::{Map, Value};

/// Compact JSON with object keys in sorted order, so harness log lines are
/// the same regardless of how the backend ordered its fields.
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> String {
    fn stable(v: &Value) -> Value {
        match v {
            Value::Object(m) => {
                let mut keys: Vec<_> = m.keys().cloned().collect();
                keys.sort();
                let mut out = Map::new();
                for k in keys {
                    out.insert(k.clone(), stable(&m[&k]));
                }
                Value::Object(out)
            }
            Value::Array(arr) => Value::Array(arr.iter().map(stable).collect()),
            _ => v.clone(),
        }
    }
    match serde_json::to_value(value) {
        Ok(v) => stable(&v).to_string(),
        Err(e) => format!("<unserializable: {e}>"),
    }
}
