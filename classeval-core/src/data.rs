//! Samples, datasets, and dataset serialization.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;
use std::path::Path;

use crate::error::{EvalError, EvalResult};

/// One labeled example. `input` is handed to the classifier untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub input: Value,
    pub output: Value,
}

impl Sample {
    pub fn new(input: impl Into<Value>, output: impl Into<Value>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Ordered collection of samples.
///
/// `all_classes` is the optional label universe; it only shows up in the
/// training diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub samples: Vec<Sample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_classes: Option<Vec<String>>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self {
            samples,
            all_classes: None,
        }
    }

    pub fn with_all_classes(mut self, classes: Vec<String>) -> Self {
        self.all_classes = Some(classes);
        self
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Parse a JSON array of samples, a dataset object (`samples` plus
    /// optional `all_classes`), or JSON lines (one sample per line).
    ///
    /// JSON lines are only tried when the whole content is not a single JSON
    /// document.
    pub fn from_json_str(content: &str) -> EvalResult<Self> {
        if let Ok(document) = serde_json::from_str::<Value>(content) {
            let is_dataset =
                matches!(&document, Value::Object(fields) if fields.contains_key("samples"));
            return match document {
                Value::Array(_) => Ok(Self::new(serde_json::from_value(document)?)),
                Value::Object(_) if is_dataset => serde_json::from_value(document)
                    .map_err(|e| EvalError::dataset(format!("dataset object: {e}"))),
                Value::Object(_) => Ok(Self::new(vec![serde_json::from_value(document)?])),
                other => Err(EvalError::dataset(format!(
                    "expected an array, a dataset object or JSON lines, found {other}"
                ))),
            };
        }

        let mut samples = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let sample: Sample = serde_json::from_str(line.trim_end_matches(','))
                .map_err(|e| EvalError::dataset(format!("line {}: {e}", idx + 1)))?;
            samples.push(sample);
        }
        Ok(Self::new(samples))
    }

    pub fn load(path: &Path) -> EvalResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
            .map_err(|e| EvalError::dataset(format!("{}: {e}", path.display())))
    }

    /// Deterministic shuffle; the same seed always yields the same order.
    pub fn shuffled(&self, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut samples = self.samples.clone();
        samples.shuffle(&mut rng);
        Self {
            samples,
            all_classes: self.all_classes.clone(),
        }
    }
}

impl From<Vec<Sample>> for Dataset {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Write a dataset as a JSON array with one sample per line.
///
/// `separator` follows every sample except the last. With `","` the output
/// is valid JSON and reloads through [`Dataset::from_json_str`].
pub fn write_dataset<W: Write + ?Sized>(dataset: &Dataset, separator: &str, out: &mut W) -> EvalResult<()> {
    writeln!(out, "[")?;
    let last = dataset.len().saturating_sub(1);
    for (idx, sample) in dataset.iter().enumerate() {
        let line = serde_json::to_string(sample)?;
        if idx < last {
            writeln!(out, "{line}{separator}")?;
        } else {
            writeln!(out, "{line}")?;
        }
    }
    writeln!(out, "]")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_set() -> Dataset {
        Dataset::new(vec![
            Sample::new("hello", "greet"),
            Sample::new("bye now", json!(["farewell", "polite"])),
        ])
    }

    #[test]
    fn test_write_dataset_layout() {
        let mut buf = Vec::new();
        write_dataset(&sample_set(), ",", &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "[\n{\"input\":\"hello\",\"output\":\"greet\"},\n{\"input\":\"bye now\",\"output\":[\"farewell\",\"polite\"]}\n]\n"
        );
    }

    #[test]
    fn test_write_empty_dataset() {
        let mut buf = Vec::new();
        write_dataset(&Dataset::default(), ",", &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[\n]\n");
    }

    #[test]
    fn test_written_dataset_reloads() {
        let mut buf = Vec::new();
        write_dataset(&sample_set(), ",", &mut buf).unwrap();
        let reloaded = Dataset::from_json_str(&String::from_utf8(buf).unwrap()).unwrap();
        assert_eq!(reloaded, sample_set());
    }

    #[test]
    fn test_json_lines() {
        let content = "{\"input\":\"a\",\"output\":\"x\"}\n\n{\"input\":\"b\",\"output\":[\"y\"]}\n";
        let dataset = Dataset::from_json_str(content).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.samples[1].output, json!(["y"]));
    }

    #[test]
    fn test_dataset_object_with_all_classes() {
        let content = r#"{"samples":[{"input":"a","output":"x"}],"all_classes":["x","y"]}"#;
        let dataset = Dataset::from_json_str(content).unwrap();
        assert_eq!(dataset.all_classes, Some(vec!["x".to_string(), "y".to_string()]));
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let err = Dataset::from_json_str("{\"input\":1,\"output\":\"a\"}\nnot json\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_pretty_dataset_object_reports_real_error() {
        let content = "{\n  \"samples\": [{\"input\": \"a\"}]\n}\n";
        let err = Dataset::from_json_str(content).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("missing field `output`"), "{message}");
        assert!(!message.contains("line 1:"), "{message}");
    }

    #[test]
    fn test_malformed_samples_field_is_rejected() {
        let content = r#"{"input":"x","output":"A","samples":"oops"}"#;
        assert!(matches!(
            Dataset::from_json_str(content),
            Err(EvalError::Dataset(_))
        ));
    }

    #[test]
    fn test_single_sample_object() {
        let dataset = Dataset::from_json_str(r#"{"input":"x","output":"A"}"#).unwrap();
        assert_eq!(dataset.samples, vec![Sample::new("x", "A")]);
    }

    #[test]
    fn test_scalar_document_is_rejected() {
        assert!(Dataset::from_json_str("42").is_err());
    }

    #[test]
    fn test_shuffle_is_deterministic_permutation() {
        let dataset: Dataset = (0..20)
            .map(|i| Sample::new(i, format!("c{}", i % 3)))
            .collect::<Vec<_>>()
            .into();
        let a = dataset.shuffled(7);
        let b = dataset.shuffled(7);
        assert_eq!(a, b);
        let mut sorted: Vec<_> = a.samples.iter().map(|s| s.input.as_i64().unwrap()).collect();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.json");
        std::fs::write(&path, r#"[{"input":"a","output":"x"}]"#).unwrap();
        assert_eq!(Dataset::load(&path).unwrap().len(), 1);
    }
}
