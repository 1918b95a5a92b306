//! # classeval-core: train/test evaluation for multi-label classifiers
//!
//! Trains a classifier on a labeled dataset, runs it over a held-out test
//! set, and folds every (expected, actual) label pair into precision/recall
//! statistics. Two classifiers can also be compared head-to-head.
//!
//! ## Pieces
//!
//! - [`label`] canonicalizes label values into sorted [`LabelSet`]s.
//! - [`stats`] holds the [`OutcomeRecorder`] seam and the default
//!   [`PrecisionRecall`] recorder.
//! - [`harness`] runs evaluations, comparisons and cross-validation.
//! - [`report`] receives every diagnostic line.

pub mod baselines;
pub mod classifier;
pub mod config;
pub mod data;
pub mod error;
pub mod harness;
pub mod label;
pub mod report;
pub mod stats;

// Re-exports
pub use baselines::{BaselineKind, MajorityClassifier, MemorizingClassifier};
pub use classifier::{ClassificationOutcome, Classifier};
pub use config::{EvalConfig, load_config};
pub use data::{Dataset, Sample, write_dataset};
pub use error::{EvalError, EvalResult};
pub use harness::{
    Accumulators, Comparison, CrossValidation, Divergence, Verdict, compare, cross_validate,
    evaluate, evaluate_lite, partitions, train_and_compare, train_and_test,
};
pub use label::{LabelSet, normalize};
pub use report::{ConsoleReporter, NullReporter, RecordingReporter, Reporter, TracingReporter};
pub use stats::{LabelStats, MergeSummary, Metrics, OutcomeRecorder, PrecisionRecall, StatsSummary};
