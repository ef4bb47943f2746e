#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/invest/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Investment scoring.
//!
//! - [`InvestmentScorer`](scorer::InvestmentScorer) - Weighted 0-100 scoring
//! - [`ScoringConfig`](config::ScoringConfig) - Weights and recommendation cutoffs
//! - [`ThresholdTable`](threshold::ThresholdTable) - Per-metric point bands
//! - [`ScoreReport`](report::ScoreReport) - The scored result

/// Category weights and recommendation cutoffs.
pub mod config;
/// Strength and concern notes.
pub mod notes;
/// Score report types.
pub mod report;
/// The scorer.
pub mod scorer;
/// Threshold tables.
pub mod threshold;

pub use config::{CategoryWeights, DEFAULT_BUY_CUTOFF, DEFAULT_HOLD_CUTOFF, ScoringConfig};
pub use notes::{CONCERN_BAR, STRENGTH_BAR};
pub use report::{
    BAND_OFFSET, CategoryScore, MetricScore, Note, NoteKind, Recommendation, ScoreReport,
};
pub use scorer::InvestmentScorer;
pub use threshold::{Direction, ThresholdTable, table_for};
