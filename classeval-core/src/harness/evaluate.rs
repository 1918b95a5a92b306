//! Single-classifier evaluation.

use tracing::Level;

use crate::classifier::Classifier;
use crate::data::Dataset;
use crate::error::EvalResult;
use crate::label::normalize;
use crate::report::Reporter;
use crate::stats::{MergeSummary, OutcomeRecorder, PrecisionRecall};

/// Caller-owned accumulators shared across several evaluation runs.
///
/// `micro` receives every (expected, actual) pair of the run, pooling cases
/// across runs. `macro_sum` receives the finalized summary of the run,
/// summing per-run statistics. The harness only appends to them.
pub struct Accumulators<'a, R: OutcomeRecorder = PrecisionRecall> {
    pub micro: Option<&'a mut R>,
    pub macro_sum: Option<&'a mut R::Summary>,
}

impl<'a, R: OutcomeRecorder> Accumulators<'a, R> {
    pub fn new(micro: Option<&'a mut R>, macro_sum: Option<&'a mut R::Summary>) -> Self {
        Self { micro, macro_sum }
    }

    pub fn none() -> Self {
        Self {
            micro: None,
            macro_sum: None,
        }
    }
}

impl<R: OutcomeRecorder> Default for Accumulators<'_, R> {
    fn default() -> Self {
        Self::none()
    }
}

/// Evaluate `classifier` on `test_set` and return the finalized recorder.
///
/// Expected labels are normalized; the classifier's classes are recorded as
/// returned, unsorted. Verbosity gates diagnostics only:
/// `> 0` summary line, `> 1` per-sample explanations, `> 2` explanations are
/// requested from the recorder and the full statistics are dumped.
pub fn evaluate<C, R>(
    classifier: &C,
    test_set: &Dataset,
    verbosity: u8,
    reporter: &mut dyn Reporter,
    mut accumulators: Accumulators<'_, R>,
) -> EvalResult<R>
where
    C: Classifier + ?Sized,
    R: OutcomeRecorder + Default,
{
    let mut current = R::default();
    let want_explanations = verbosity > 2;

    for sample in test_set {
        let expected = normalize(&sample.output)?;
        let actual = classifier.classify(&sample.input, false)?.into_classes();

        let explanations = current.add_cases(&expected, &actual, want_explanations);
        if verbosity > 1 && !explanations.is_empty() {
            reporter.report(
                Level::DEBUG,
                &format!("{}: {}", sample.input, explanations.join(", ")),
            );
        }
        if let Some(micro) = accumulators.micro.as_deref_mut() {
            micro.add_cases(&expected, &actual, false);
        }
    }

    current.calculate_stats();
    if let Some(macro_sum) = accumulators.macro_sum.as_deref_mut() {
        macro_sum.merge_from(&current.full_stats());
    }

    tracing::debug!(samples = test_set.len(), "evaluation finished");
    if !test_set.is_empty() {
        if verbosity > 0 {
            reporter.report(Level::INFO, &format!("SUMMARY: {}", current.short_stats()));
        }
        if verbosity > 2 {
            let full = serde_json::to_string_pretty(&current.full_stats())?;
            reporter.report(Level::TRACE, &full);
        }
    }
    Ok(current)
}

/// Reduced-diagnostics evaluation.
///
/// Every sample whose sorted classes differ from the expected labels gets a
/// mismatch line; with `explain` set the line carries the classifier's full
/// payload. A one-line summary closes the run.
pub fn evaluate_lite<C, R>(
    classifier: &C,
    dataset: &Dataset,
    explain: bool,
    reporter: &mut dyn Reporter,
) -> EvalResult<R>
where
    C: Classifier + ?Sized,
    R: OutcomeRecorder + Default,
{
    let mut current = R::default();

    for sample in dataset {
        let expected = normalize(&sample.output)?;
        let outcome = classifier.classify(&sample.input, explain)?;
        let actual = outcome.sorted_classes();

        if expected != actual {
            let got = if explain {
                serde_json::to_string_pretty(&outcome.to_json())?
            } else {
                actual.to_json()
            };
            reporter.report(
                Level::INFO,
                &format!("{}: expected {} but got {}", sample.input, expected, got),
            );
        }
        current.add_cases(&expected, &actual, false);
    }

    current.calculate_stats();
    reporter.report(Level::INFO, &format!("SUMMARY: {}", current.short_stats()));
    Ok(current)
}
