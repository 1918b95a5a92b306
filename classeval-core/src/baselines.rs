//! Reference classifiers used by the CLI and as sanity baselines.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::classifier::{ClassificationOutcome, Classifier};
use crate::data::Dataset;
use crate::error::{EvalError, EvalResult};
use crate::label::{LabelSet, normalize};

/// Built-in baseline classifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineKind {
    #[default]
    Majority,
    Memorize,
}

impl BaselineKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Majority => "majority",
            Self::Memorize => "memorize",
        }
    }

    /// Fresh, untrained classifier of this kind.
    pub fn build(&self) -> Box<dyn Classifier> {
        match self {
            Self::Majority => Box::new(MajorityClassifier::new()),
            Self::Memorize => Box::new(MemorizingClassifier::new()),
        }
    }
}

impl fmt::Display for BaselineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BaselineKind {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "majority" => Ok(Self::Majority),
            "memorize" | "memorise" => Ok(Self::Memorize),
            other => Err(EvalError::invalid_input(format!(
                "unknown classifier '{other}' (expected majority or memorize)"
            ))),
        }
    }
}

/// Predicts the label set seen most often during training.
///
/// Ties go to the set that appeared first.
#[derive(Debug, Clone, Default)]
pub struct MajorityClassifier {
    majority: LabelSet,
    support: usize,
    trained_on: usize,
}

impl MajorityClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn majority(&self) -> &LabelSet {
        &self.majority
    }
}

fn most_frequent(dataset: &Dataset) -> EvalResult<(LabelSet, usize)> {
    let mut order: Vec<LabelSet> = Vec::new();
    let mut counts: HashMap<LabelSet, usize> = HashMap::new();
    for sample in dataset {
        let labels = normalize(&sample.output)?;
        let count = counts.entry(labels.clone()).or_insert(0);
        if *count == 0 {
            order.push(labels);
        }
        *count += 1;
    }

    let mut best: Option<(LabelSet, usize)> = None;
    for labels in order {
        let count = counts[&labels];
        if best.as_ref().is_none_or(|(_, c)| count > *c) {
            best = Some((labels, count));
        }
    }
    Ok(best.unwrap_or_default())
}

impl Classifier for MajorityClassifier {
    fn train_batch(&mut self, dataset: &Dataset) -> EvalResult<()> {
        let (majority, support) = most_frequent(dataset)?;
        self.majority = majority;
        self.support = support;
        self.trained_on = dataset.len();
        Ok(())
    }

    fn classify(&self, _input: &Value, explain: bool) -> EvalResult<ClassificationOutcome> {
        let classes = self.majority.to_vec();
        if explain {
            Ok(ClassificationOutcome::explained(
                classes,
                json!({"support": self.support, "trained_on": self.trained_on}),
            ))
        } else {
            Ok(classes.into())
        }
    }
}

/// Recalls the labels of inputs seen during training verbatim and falls back
/// to the majority label set for anything new.
#[derive(Debug, Clone, Default)]
pub struct MemorizingClassifier {
    memory: HashMap<String, LabelSet>,
    fallback: MajorityClassifier,
}

impl MemorizingClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }
}

impl Classifier for MemorizingClassifier {
    fn train_batch(&mut self, dataset: &Dataset) -> EvalResult<()> {
        self.memory.clear();
        for sample in dataset {
            // Later samples overwrite earlier ones with the same input.
            self.memory
                .insert(sample.input.to_string(), normalize(&sample.output)?);
        }
        self.fallback.train_batch(dataset)
    }

    fn classify(&self, input: &Value, explain: bool) -> EvalResult<ClassificationOutcome> {
        let Some(labels) = self.memory.get(&input.to_string()) else {
            return self.fallback.classify(input, explain);
        };
        let classes = labels.to_vec();
        if explain {
            Ok(ClassificationOutcome::explained(classes, json!({"source": "memory"})))
        } else {
            Ok(classes.into())
        }
    }
}
