#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/invest/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for fundamental investment scoring.
//!
//! This crate provides the foundational abstractions shared by the workspace:
//!
//! - [`RawFinancialBundle`](bundle::RawFinancialBundle) - Everything known about one company
//! - [`StatementSeries`](bundle::StatementSeries) - Order-tagged statement sequences
//! - [`FinancialBundleProvider`](provider::FinancialBundleProvider) - Data-fetch seam
//! - [`InvestError`](error::InvestError) - Workspace error type

/// Financial data bundle and order-tagged statement series.
pub mod bundle;
/// Error types for fetching, scoring and writing.
pub mod error;
/// Reporting period and statement order definitions.
pub mod period;
/// Provider traits for fetching financial data.
pub mod provider;
/// Core data types (Symbol, statements, snapshots).
pub mod types;

// Re-export commonly used items at crate root
pub use bundle::{Dated, RawFinancialBundle, StatementSeries};
pub use error::{InvestError, Result};
pub use period::{PeriodType, StatementOrder};
pub use provider::{DataProvider, FinancialBundleProvider};
pub use types::{
    BalanceSheet, CashFlowStatement, CompanyProfile, IncomeStatement, KeyMetricsSnapshot,
    MarketSnapshot, Symbol,
};
