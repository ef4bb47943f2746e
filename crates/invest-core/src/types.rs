//! Core data types for company financial data.
//!
//! This module defines the records a [`RawFinancialBundle`](crate::RawFinancialBundle)
//! is assembled from:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`CompanyProfile`] - Company identity
//! - [`IncomeStatement`], [`BalanceSheet`], [`CashFlowStatement`] - One reporting period each
//! - [`KeyMetricsSnapshot`] - Provider-reported valuation figures
//! - [`MarketSnapshot`] - Current price and share count
//!
//! Every numeric field is an `Option<f64>`: `None` is the only way to say a line
//! item was not reported. Providers must never substitute zero for a missing value.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A trading symbol/ticker.
///
/// Symbols are automatically trimmed and uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the symbol is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Company identity information.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Stock symbol.
    pub symbol: Symbol,
    /// Company name.
    pub name: String,
    /// Business sector.
    pub sector: Option<String>,
    /// Industry within the sector.
    pub industry: Option<String>,
    /// Primary exchange.
    pub exchange: Option<String>,
    /// Trading currency.
    pub currency: Option<String>,
}

impl CompanyProfile {
    /// Creates a profile with the required fields.
    #[must_use]
    pub fn new(symbol: Symbol, name: impl Into<String>) -> Self {
        Self {
            symbol,
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the business sector.
    #[must_use]
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Sets the industry.
    #[must_use]
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }
}

/// Income statement for a single reporting period.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    /// End date of the reporting period.
    pub period_end: NaiveDate,
    /// Fiscal year.
    pub fiscal_year: Option<i32>,
    /// Total revenue.
    pub revenue: Option<f64>,
    /// Cost of revenue (COGS).
    pub cost_of_revenue: Option<f64>,
    /// Gross profit.
    pub gross_profit: Option<f64>,
    /// Operating income.
    pub operating_income: Option<f64>,
    /// Net income.
    pub net_income: Option<f64>,
    /// EBITDA.
    pub ebitda: Option<f64>,
    /// Basic earnings per share.
    pub eps: Option<f64>,
    /// Diluted earnings per share.
    pub eps_diluted: Option<f64>,
    /// Interest expense, reported as a positive amount.
    pub interest_expense: Option<f64>,
    /// Weighted average basic shares outstanding.
    pub weighted_average_shares: Option<f64>,
}

impl IncomeStatement {
    /// Creates an empty income statement for the given period end.
    #[must_use]
    pub fn new(period_end: NaiveDate) -> Self {
        Self {
            period_end,
            ..Default::default()
        }
    }
}

/// Balance sheet at the end of a single reporting period.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// End date of the reporting period.
    pub period_end: NaiveDate,
    /// Fiscal year.
    pub fiscal_year: Option<i32>,
    /// Total assets.
    pub total_assets: Option<f64>,
    /// Current assets.
    pub current_assets: Option<f64>,
    /// Cash and cash equivalents.
    pub cash_and_equivalents: Option<f64>,
    /// Inventory.
    pub inventory: Option<f64>,
    /// Total liabilities.
    pub total_liabilities: Option<f64>,
    /// Current liabilities.
    pub current_liabilities: Option<f64>,
    /// Total debt (short and long term).
    pub total_debt: Option<f64>,
    /// Stockholders' equity.
    pub stockholders_equity: Option<f64>,
}

impl BalanceSheet {
    /// Creates an empty balance sheet for the given period end.
    #[must_use]
    pub fn new(period_end: NaiveDate) -> Self {
        Self {
            period_end,
            ..Default::default()
        }
    }
}

/// Cash flow statement for a single reporting period.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    /// End date of the reporting period.
    pub period_end: NaiveDate,
    /// Fiscal year.
    pub fiscal_year: Option<i32>,
    /// Operating cash flow.
    pub operating_cash_flow: Option<f64>,
    /// Capital expenditure. Providers disagree on the sign.
    pub capital_expenditure: Option<f64>,
    /// Free cash flow as reported by the provider.
    pub free_cash_flow: Option<f64>,
    /// Dividends paid.
    pub dividends_paid: Option<f64>,
}

impl CashFlowStatement {
    /// Creates an empty cash flow statement for the given period end.
    #[must_use]
    pub fn new(period_end: NaiveDate) -> Self {
        Self {
            period_end,
            ..Default::default()
        }
    }
}

/// Provider-reported valuation figures for the most recent period.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyMetricsSnapshot {
    /// Date of the metrics.
    pub date: NaiveDate,
    /// Market capitalization.
    pub market_cap: Option<f64>,
    /// Enterprise value.
    pub enterprise_value: Option<f64>,
    /// Price-to-earnings ratio.
    pub pe_ratio: Option<f64>,
    /// Price-to-book ratio.
    pub pb_ratio: Option<f64>,
    /// Price-to-sales ratio.
    pub ps_ratio: Option<f64>,
    /// EV/EBITDA ratio.
    pub ev_to_ebitda: Option<f64>,
}

impl KeyMetricsSnapshot {
    /// Creates an empty snapshot for the given date.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            ..Default::default()
        }
    }
}

/// Market data at fetch time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Last traded price.
    pub price: Option<f64>,
    /// Shares outstanding.
    pub shares_outstanding: Option<f64>,
    /// Market capitalization as quoted.
    pub market_cap: Option<f64>,
    /// 52-week high price.
    pub year_high: Option<f64>,
    /// 52-week low price.
    pub year_low: Option<f64>,
    /// Time of the quote.
    pub as_of: Option<DateTime<Utc>>,
}

impl MarketSnapshot {
    /// Returns true if no market field is populated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.price.is_none()
            && self.shares_outstanding.is_none()
            && self.market_cap.is_none()
            && self.year_high.is_none()
            && self.year_low.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_normalization() {
        assert_eq!(Symbol::new(" aapl ").as_str(), "AAPL");
        assert_eq!(Symbol::from("brk.b").to_string(), "BRK.B");
        assert!(Symbol::new("  ").is_empty());
    }

    #[test]
    fn test_market_snapshot_empty() {
        let mut market = MarketSnapshot::default();
        assert!(market.is_empty());
        market.price = Some(10.0);
        assert!(!market.is_empty());
    }

    #[test]
    fn test_statement_serde_uses_null_for_missing() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let mut stmt = IncomeStatement::new(date);
        stmt.revenue = Some(1000.0);

        let json = serde_json::to_value(&stmt).unwrap();
        assert_eq!(json["revenue"], 1000.0);
        assert!(json["net_income"].is_null());

        let back: IncomeStatement = serde_json::from_value(json).unwrap();
        assert_eq!(back, stmt);
    }
}
