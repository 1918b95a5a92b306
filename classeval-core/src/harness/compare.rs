//! Head-to-head comparison of two classifiers on the same data.

use serde::Serialize;
use serde_json::Value;
use tracing::Level;

use crate::classifier::{ClassificationOutcome, Classifier};
use crate::data::Dataset;
use crate::error::EvalResult;
use crate::label::{LabelSet, normalize};
use crate::report::Reporter;

/// Which side of a divergence matched the expected labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    FirstCorrect,
    SecondCorrect,
    BothIncorrect,
}

impl Verdict {
    /// Exactly one verdict per divergence; the first classifier is checked first.
    pub fn judge(expected: &LabelSet, first: &LabelSet, second: &LabelSet) -> Self {
        if first == expected {
            Self::FirstCorrect
        } else if second == expected {
            Self::SecondCorrect
        } else {
            Self::BothIncorrect
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::FirstCorrect => "Classifier1 is correct",
            Self::SecondCorrect => "Classifier2 is correct",
            Self::BothIncorrect => "Both are incorrect",
        }
    }
}

/// One sample on which the classifiers disagreed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Divergence {
    pub index: usize,
    pub input: Value,
    pub expected: LabelSet,
    pub first: LabelSet,
    pub second: LabelSet,
    pub verdict: Verdict,
}

/// Record of a comparison run. Agreeing samples leave no trace.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comparison {
    pub samples: usize,
    pub divergences: Vec<Divergence>,
}

impl Comparison {
    pub fn count(&self, verdict: Verdict) -> usize {
        self.divergences.iter().filter(|d| d.verdict == verdict).count()
    }

    pub fn agreements(&self) -> usize {
        self.samples - self.divergences.len()
    }
}

fn describe(outcome: &ClassificationOutcome, sorted: &LabelSet, explain: bool) -> String {
    if explain {
        outcome.to_json().to_string()
    } else {
        sorted.to_json()
    }
}

/// Run both classifiers over `dataset` and report where they diverge.
///
/// Each divergence yields two lines: both outputs, then the verdict. Nothing
/// is reported for samples on which the classifiers agree, whether or not
/// they agree with the expected labels.
pub fn compare<C1, C2>(
    first: &C1,
    second: &C2,
    dataset: &Dataset,
    explain: bool,
    reporter: &mut dyn Reporter,
) -> EvalResult<Comparison>
where
    C1: Classifier + ?Sized,
    C2: Classifier + ?Sized,
{
    let mut comparison = Comparison {
        samples: dataset.len(),
        divergences: Vec::new(),
    };

    for (index, sample) in dataset.iter().enumerate() {
        let expected = normalize(&sample.output)?;
        let outcome1 = first.classify(&sample.input, explain)?;
        let outcome2 = second.classify(&sample.input, explain)?;
        let actual1 = outcome1.sorted_classes();
        let actual2 = outcome2.sorted_classes();

        if actual1 == actual2 {
            continue;
        }

        reporter.report(
            Level::INFO,
            &format!(
                "{}: classifier1 thinks {}, classifier2 thinks {}",
                sample.input,
                describe(&outcome1, &actual1, explain),
                describe(&outcome2, &actual2, explain),
            ),
        );
        let verdict = Verdict::judge(&expected, &actual1, &actual2);
        reporter.report(Level::INFO, verdict.message());

        comparison.divergences.push(Divergence {
            index,
            input: sample.input.clone(),
            expected,
            first: actual1,
            second: actual2,
            verdict,
        });
    }

    tracing::debug!(
        samples = comparison.samples,
        divergences = comparison.divergences.len(),
        "comparison finished"
    );
    Ok(comparison)
}
