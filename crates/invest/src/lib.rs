#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/invest/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Fundamental investment scoring.
//!
//! This crate wires the workspace together: an [`Analyzer`] fetches a
//! [`RawFinancialBundle`] from its providers, derives a [`MetricsRecord`] with
//! the [`MetricsCalculator`], scores it with the [`InvestmentScorer`] and hands
//! the resulting [`Analysis`] to a [`ReportWriter`]. The [`server`] module puts the
//! same batch run behind `POST /run`.
//!
//! # Example
//!
//! ```rust,ignore
//! use invest::{Analyzer, Settings, Symbol, writer_for};
//!
//! #[tokio::main]
//! async fn main() -> invest::Result<()> {
//!     let settings = Settings::from_env()?;
//!     let analyzer = Analyzer::from_settings(&settings)?;
//!
//!     let analysis = analyzer.analyze(&Symbol::new("AAPL")).await?;
//!     println!("{}: {}", analysis.symbol(), analysis.report.recommendation);
//!
//!     writer_for(settings.output_format, settings.table_format)
//!         .write(&analysis, &settings.output_dir)?;
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use invest_core::*;

// Metrics, scoring and output
pub use invest_metrics::{Category, Metric, MetricId, MetricsCalculator, MetricsRecord};
pub use invest_report::{
    Analysis, JsonWriter, MarketContext, OutputFormat, ReportWriter, SummaryWriter, TableFormat,
    WorkbookWriter, render_text, writer_for,
};
pub use invest_scoring::{
    CategoryScore, CategoryWeights, InvestmentScorer, Recommendation, ScoreReport, ScoringConfig,
};

// Providers
pub use invest_fmp::{FmpConfig, FmpProvider};

/// Settings read from the environment.
pub mod config;
/// Bundles saved as JSON files.
pub mod file_provider;
/// The fetch, calculate and score pipeline.
pub mod pipeline;
/// HTTP service for batch runs.
pub mod server;

pub use config::Settings;
pub use file_provider::JsonFileProvider;
pub use pipeline::Analyzer;
pub use server::{RunRequest, RunResponse, ServerState, TickerResult, build_router, serve};
