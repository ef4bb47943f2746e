//! Provider traits for fetching financial data.
//!
//! This module defines the core provider traits:
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`FinancialBundleProvider`] - Assembles a [`RawFinancialBundle`] for one company

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{bundle::RawFinancialBundle, error::Result, period::PeriodType, types::Symbol};

/// Base trait for all data providers.
///
/// All data providers must implement this trait to provide basic metadata
/// about the provider.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "FMP").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for complete company financial bundles.
///
/// Implementations must tag every statement series with its order and must
/// report missing line items as `None`, never as a numeric sentinel.
#[async_trait]
pub trait FinancialBundleProvider: DataProvider {
    /// Fetches a financial bundle for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The stock symbol
    /// * `period_type` - Annual or Quarterly
    /// * `limit` - Maximum number of statement periods to fetch
    async fn fetch_bundle(
        &self,
        symbol: &Symbol,
        period_type: PeriodType,
        limit: usize,
    ) -> Result<RawFinancialBundle>;
}
