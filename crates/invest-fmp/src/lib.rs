#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/invest/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Financial Modeling Prep (FMP) data provider.
//!
//! # Usage
//!
//! ```rust,ignore
//! use invest_fmp::FmpProvider;
//! use invest_core::{FinancialBundleProvider, PeriodType, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = FmpProvider::new("your_api_key");
//!
//!     let bundle = provider
//!         .fetch_bundle(&Symbol::new("AAPL"), PeriodType::Annual, 6)
//!         .await?;
//!     println!("{} income statements", bundle.income_statements.len());
//!
//!     Ok(())
//! }
//! ```

/// The FMP provider and its request settings.
pub mod provider;
mod response;

pub use provider::{FMP_BASE_URL, FmpConfig, FmpProvider, normalize_symbol};
