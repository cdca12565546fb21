//! Deep merge of two independently validated values.
//!
//! Used by intersection schemas to combine the outputs of their options into
//! one value. The first point of conflict aborts the whole merge.

use super::value::{Value, ValueKind};
use std::fmt;

/// Where and why two values could not be merged.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeConflict {
    /// Keys and indices from the merge root to the conflicting pair
    pub path: Vec<Value>,
    pub left: ValueKind,
    pub right: ValueKind,
}

impl fmt::Display for MergeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot merge {:?} with {:?}", self.left, self.right)?;
        if !self.path.is_empty() {
            let segments: Vec<String> = self.path.iter().map(Value::to_string).collect();
            write!(f, " at {}", segments.join("."))?;
        }
        Ok(())
    }
}

/// Merges `right` into `left`.
///
/// Primitives and dates must be equal. Objects take every key of `right`,
/// merging recursively where `left` has the key too; keys only in `left` are
/// kept. Arrays must have equal length and merge element by element. Any
/// other pairing, including maps and sets, is a conflict.
///
/// # Examples
///
/// ```rust
/// use shape_guard::core::{merge_values, Value};
/// use serde_json::json;
///
/// let merged = merge_values(
///     Value::from(json!({"a": 1, "nested": {"x": true}})),
///     Value::from(json!({"b": 2, "nested": {"y": false}})),
/// ).unwrap();
/// assert_eq!(merged, Value::from(json!({"a": 1, "b": 2, "nested": {"x": true, "y": false}})));
///
/// assert!(merge_values(Value::from(1), Value::from(2)).is_err());
/// ```
pub fn merge_values(left: Value, right: Value) -> Result<Value, MergeConflict> {
    let mut path = Vec::new();
    merge_at(left, right, &mut path)
}

fn merge_at(left: Value, right: Value, path: &mut Vec<Value>) -> Result<Value, MergeConflict> {
    let conflict = |left: &Value, right: &Value, path: &Vec<Value>| MergeConflict {
        path: path.clone(),
        left: left.kind(),
        right: right.kind(),
    };

    if left.kind() != right.kind() {
        return Err(conflict(&left, &right, path));
    }

    match (left, right) {
        (left, right) if left.is_primitive() => {
            if left == right {
                Ok(left)
            } else {
                Err(conflict(&left, &right, path))
            }
        }
        (Value::Date(a), Value::Date(b)) => {
            if a == b {
                Ok(Value::Date(a))
            } else {
                Err(conflict(&Value::Date(a), &Value::Date(b), path))
            }
        }
        (Value::Object(mut a), Value::Object(b)) => {
            for (key, b_value) in b {
                match a.get_mut(&key) {
                    Some(slot) => {
                        path.push(Value::String(key.clone()));
                        let a_value = std::mem::take(slot);
                        *slot = merge_at(a_value, b_value, path)?;
                        path.pop();
                    }
                    None => {
                        a.insert(key, b_value);
                    }
                }
            }
            Ok(Value::Object(a))
        }
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                return Err(conflict(&Value::Array(a), &Value::Array(b), path));
            }
            let mut merged = Vec::with_capacity(a.len());
            for (index, (a_item, b_item)) in a.into_iter().zip(b).enumerate() {
                path.push(Value::from(index));
                merged.push(merge_at(a_item, b_item, path)?);
                path.pop();
            }
            Ok(Value::Array(merged))
        }
        (left, right) => Err(conflict(&left, &right, path)),
    }
}
