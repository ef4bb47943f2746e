#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/invest/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Output for scored companies.
//!
//! An [`Analysis`] bundles a [`ScoreReport`](invest_scoring::ScoreReport) with
//! the metrics and market context it came from. Writers turn it into files.

/// Writer input.
pub mod analysis;
/// DataFrame views used by the tabular writers.
pub mod tables;
/// Terminal rendering.
pub mod text;
/// The writer trait and its implementations.
pub mod writer;

pub use analysis::{Analysis, MarketContext};
pub use tables::{LIST_SEPARATOR, metrics_frame, scores_frame, summary_frame};
pub use text::render_text;
pub use writer::{
    JsonWriter, OutputFormat, ReportWriter, SummaryWriter, TableFormat, WorkbookWriter, writer_for,
};
