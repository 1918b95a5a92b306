//! The classifier seam consumed by the harness.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::Dataset;
use crate::error::EvalResult;
use crate::label::LabelSet;

/// What a classifier hands back for one input.
///
/// Classes are not required to be sorted. When the caller asked for an
/// explanation the classifier may attach an arbitrary payload; the harness
/// only prints it. A missing payload deserializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassificationOutcome {
    Plain(Vec<String>),
    Explained {
        classes: Vec<String>,
        #[serde(default, skip_serializing_if = "Value::is_null")]
        explanations: Value,
    },
}

impl ClassificationOutcome {
    pub fn explained(classes: Vec<String>, explanations: impl Into<Value>) -> Self {
        Self::Explained {
            classes,
            explanations: explanations.into(),
        }
    }

    /// The class list, whichever shape the classifier returned.
    pub fn classes(&self) -> &[String] {
        match self {
            Self::Plain(classes) | Self::Explained { classes, .. } => classes,
        }
    }

    pub fn into_classes(self) -> Vec<String> {
        match self {
            Self::Plain(classes) | Self::Explained { classes, .. } => classes,
        }
    }

    pub fn explanations(&self) -> Option<&Value> {
        match self {
            Self::Plain(_) => None,
            Self::Explained { explanations, .. } if explanations.is_null() => None,
            Self::Explained { explanations, .. } => Some(explanations),
        }
    }

    /// Classes sorted ascending, ready for element-wise comparison.
    pub fn sorted_classes(&self) -> LabelSet {
        LabelSet::sorted(self.classes().iter().cloned())
    }

    /// Full payload as JSON, used when diagnostics should show explanations.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<Vec<String>> for ClassificationOutcome {
    fn from(classes: Vec<String>) -> Self {
        Self::Plain(classes)
    }
}

impl From<LabelSet> for ClassificationOutcome {
    fn from(classes: LabelSet) -> Self {
        Self::Plain(classes.into_vec())
    }
}

/// A trainable multi-label classifier.
///
/// Both calls are blocking. Any error aborts the surrounding training or
/// evaluation run.
pub trait Classifier {
    /// Train on the whole dataset at once.
    fn train_batch(&mut self, dataset: &Dataset) -> EvalResult<()>;

    /// Classify one input. With `explain` set the classifier may return
    /// [`ClassificationOutcome::Explained`].
    fn classify(&self, input: &Value, explain: bool) -> EvalResult<ClassificationOutcome>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn train_batch(&mut self, dataset: &Dataset) -> EvalResult<()> {
        (**self).train_batch(dataset)
    }

    fn classify(&self, input: &Value, explain: bool) -> EvalResult<ClassificationOutcome> {
        (**self).classify(input, explain)
    }
}
