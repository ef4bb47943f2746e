#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/invest/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Financial ratio calculation.
//!
//! [`MetricsCalculator`] turns a [`RawFinancialBundle`](invest_core::RawFinancialBundle)
//! into a [`MetricsRecord`]: five groups of [`Metric`] values, each either a finite
//! number or explicitly unavailable.

/// The metrics calculator.
pub mod calculator;
/// Metric categories and identifiers.
pub mod category;
/// Growth and CAGR helpers.
pub mod growth;
/// The `Metric` value type and guarded ratios.
pub mod metric;
/// Grouped metrics record.
pub mod record;

pub use calculator::MetricsCalculator;
pub use category::{Category, MetricId, Unit};
pub use growth::{cagr, growth_rate, window_cagr, year_over_year};
pub use metric::{Metric, ratio, ratio_over_positive};
pub use record::{
    FinancialHealthMetrics, GrowthMetrics, MetricsRecord, ProfitabilityMetrics, QualityMetrics,
    ValuationMetrics,
};
