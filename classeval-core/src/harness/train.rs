//! Train-then-evaluate orchestration.

use std::time::{Duration, Instant};
use tracing::Level;

use crate::classifier::Classifier;
use crate::data::Dataset;
use crate::error::EvalResult;
use crate::report::Reporter;
use crate::stats::OutcomeRecorder;

use super::compare::{Comparison, compare};
use super::evaluate::{Accumulators, evaluate};

fn scope(dataset: &Dataset) -> String {
    match &dataset.all_classes {
        Some(classes) => format!("{} samples, {} classes", dataset.len(), classes.len()),
        None => format!("{} samples", dataset.len()),
    }
}

/// Run one blocking `train_batch` call and measure its wall-clock time.
pub fn train_timed<C>(
    classifier: &mut C,
    train_set: &Dataset,
    verbosity: u8,
    reporter: &mut dyn Reporter,
) -> EvalResult<Duration>
where
    C: Classifier + ?Sized,
{
    if verbosity > 0 {
        reporter.report(Level::INFO, &format!("start training on {}", scope(train_set)));
    }
    let start = Instant::now();
    classifier.train_batch(train_set)?;
    let elapsed = start.elapsed();
    tracing::info!(
        samples = train_set.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "training finished"
    );
    if verbosity > 0 {
        reporter.report(
            Level::INFO,
            &format!(
                "end training on {}, {} [ms]",
                scope(train_set),
                elapsed.as_millis()
            ),
        );
    }
    Ok(elapsed)
}

/// Build a fresh classifier, train it on `train_set`, then [`evaluate`] it
/// on `test_set`.
pub fn train_and_test<F, C, R>(
    factory: F,
    train_set: &Dataset,
    test_set: &Dataset,
    verbosity: u8,
    reporter: &mut dyn Reporter,
    accumulators: Accumulators<'_, R>,
) -> EvalResult<R>
where
    F: FnOnce() -> C,
    C: Classifier,
    R: OutcomeRecorder + Default,
{
    let mut classifier = factory();
    train_timed(&mut classifier, train_set, verbosity, reporter)?;
    if verbosity > 0 {
        reporter.report(
            Level::INFO,
            &format!("start testing on {} samples", test_set.len()),
        );
    }
    evaluate(&classifier, test_set, verbosity, reporter, accumulators)
}

/// Train two freshly built classifiers one after the other, then [`compare`]
/// them on `test_set`. Explanations are requested when `verbosity > 1`.
pub fn train_and_compare<F1, F2, C1, C2>(
    factory1: F1,
    factory2: F2,
    train_set: &Dataset,
    test_set: &Dataset,
    verbosity: u8,
    reporter: &mut dyn Reporter,
) -> EvalResult<Comparison>
where
    F1: FnOnce() -> C1,
    F2: FnOnce() -> C2,
    C1: Classifier,
    C2: Classifier,
{
    let mut first = factory1();
    train_timed(&mut first, train_set, verbosity, reporter)?;
    let mut second = factory2();
    train_timed(&mut second, train_set, verbosity, reporter)?;
    if verbosity > 0 {
        reporter.report(
            Level::INFO,
            &format!("start comparing on {} samples", test_set.len()),
        );
    }
    compare(&first, &second, test_set, verbosity > 1, reporter)
}
