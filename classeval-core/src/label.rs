//! Label normalization.
//!
//! Expected and actual label values arrive either as a single label or as a
//! collection. Before they are compared, both are turned into a [`LabelSet`]:
//! every label becomes its canonical string and the sequence is sorted
//! ascending. Two labels are equal exactly when their canonical strings are.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::ops::Deref;

use crate::error::{EvalError, EvalResult};

/// Sorted sequence of canonical label strings.
///
/// Duplicates are kept: `["b", "a", "b"]` normalizes to `["a", "b", "b"]`.
/// The precision/recall recorder compares label lists as sets, so
/// multiplicity never reaches the statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    /// Sort already-canonical labels without stringifying them again.
    pub fn sorted<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        labels.sort();
        Self(labels)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// JSON array form, as printed in diagnostics.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Deref for LabelSet {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

impl From<LabelSet> for Value {
    fn from(set: LabelSet) -> Self {
        Value::Array(set.0.into_iter().map(Value::String).collect())
    }
}

/// Canonical string for a single label.
///
/// Strings are kept verbatim. Any other JSON value becomes its compact JSON
/// text (object keys are already ordered, so the form is deterministic).
/// `null` has no canonical form and is rejected.
pub fn canonical_label(label: &Value) -> EvalResult<String> {
    match label {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Err(EvalError::invalid_label(label)),
        other => Ok(serde_json::to_string(other)?),
    }
}

/// Normalize a scalar or array label value into a [`LabelSet`].
///
/// A scalar is treated as a one-element collection, so `"a"` and `["a"]`
/// normalize identically. The function is idempotent.
pub fn normalize(labels: &Value) -> EvalResult<LabelSet> {
    let canonical = match labels {
        Value::Array(items) => items
            .iter()
            .map(canonical_label)
            .collect::<EvalResult<Vec<_>>>()?,
        scalar => vec![canonical_label(scalar)?],
    };
    Ok(LabelSet::sorted(canonical))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_matches_single_element_array() {
        assert_eq!(normalize(&json!("a")).unwrap(), normalize(&json!(["a"])).unwrap());
    }

    #[test]
    fn test_sorts_ascending() {
        let set = normalize(&json!(["c", "a", "b"])).unwrap();
        assert_eq!(set.as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let set = normalize(&json!(["b", "a", "b"])).unwrap();
        assert_eq!(set.as_slice(), ["a", "b", "b"]);
    }

    #[test]
    fn test_non_string_labels_are_serialized() {
        let set = normalize(&json!([{"intent": "greet"}, 7, true])).unwrap();
        assert_eq!(set.as_slice(), ["7", "true", r#"{"intent":"greet"}"#]);
    }

    #[test]
    fn test_object_keys_serialize_in_order() {
        let a = normalize(&json!({"b": 1, "a": 2})).unwrap();
        let b = normalize(&json!({"a": 2, "b": 1})).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_slice(), [r#"{"a":2,"b":1}"#]);
    }

    #[test]
    fn test_null_label_is_rejected() {
        assert!(matches!(
            normalize(&Value::Null),
            Err(EvalError::InvalidLabelFormat { .. })
        ));
        assert!(matches!(
            normalize(&json!(["a", null])),
            Err(EvalError::InvalidLabelFormat { .. })
        ));
    }

    #[test]
    fn test_empty_array_is_empty_set() {
        assert!(normalize(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_idempotent_through_json() {
        let once = normalize(&json!(["z", 3, "a"])).unwrap();
        let twice = normalize(&Value::from(once.clone())).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_display_is_json_array() {
        let set = LabelSet::sorted(["B", "A"]);
        assert_eq!(set.to_string(), r#"["A","B"]"#);
    }
}
