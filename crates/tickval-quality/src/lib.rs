//! Series-level data quality checks for captured tick streams.
//!
//! Where `tickval-core` judges one tick in isolation, this crate judges a
//! whole capture: is it fresh, complete, ordered, gap-free and dense
//! enough to trade on.

pub mod thresholds;
pub mod series;
pub mod report;
pub mod checker;

pub use thresholds::QualityThresholds;
pub use series::TickSeries;
pub use report::{CheckDetail, CheckResult, Criterion, QualityReport};
pub use checker::QualityChecker;

/// Quality check errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QualityError {
    /// No ticks to check.
    #[error("tick series is empty")]
    EmptySeries,
}
