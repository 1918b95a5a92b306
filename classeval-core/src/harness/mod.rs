//! Evaluation entry points: evaluate, compare, train-and-evaluate, cross-validate.

pub mod compare;
pub mod cross_validation;
pub mod evaluate;
pub mod train;

pub use compare::{Comparison, Divergence, Verdict, compare};
pub use cross_validation::{CrossValidation, Partition, cross_validate, partitions};
pub use evaluate::{Accumulators, evaluate, evaluate_lite};
pub use train::{train_and_compare, train_and_test, train_timed};
