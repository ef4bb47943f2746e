//! Financial data bundle and order-tagged statement series.
//!
//! A [`RawFinancialBundle`] is the single input of the scoring pipeline: everything
//! a data-fetch collaborator gathered about one company. Statement sequences are
//! stored in [`StatementSeries`], which always knows whether index 0 is the newest
//! or the oldest period. Growth math must go through
//! [`StatementSeries::chronological`] or [`StatementSeries::latest`] rather than
//! indexing the raw records, since reading a newest-first list as oldest-first
//! silently inverts every growth sign.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    period::{PeriodType, StatementOrder},
    types::{
        BalanceSheet, CashFlowStatement, CompanyProfile, IncomeStatement, KeyMetricsSnapshot,
        MarketSnapshot, Symbol,
    },
};

/// A record that belongs to a reporting period.
pub trait Dated {
    /// End date of the reporting period.
    fn period_end(&self) -> NaiveDate;
}

impl Dated for IncomeStatement {
    fn period_end(&self) -> NaiveDate {
        self.period_end
    }
}

impl Dated for BalanceSheet {
    fn period_end(&self) -> NaiveDate {
        self.period_end
    }
}

impl Dated for CashFlowStatement {
    fn period_end(&self) -> NaiveDate {
        self.period_end
    }
}

/// A sequence of statement records tagged with its chronological order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatementSeries<T> {
    order: StatementOrder,
    records: Vec<T>,
}

impl<T> Default for StatementSeries<T> {
    fn default() -> Self {
        Self {
            order: StatementOrder::default(),
            records: Vec::new(),
        }
    }
}

impl<T> StatementSeries<T> {
    /// Creates a series from records stored in the given order.
    #[must_use]
    pub const fn new(records: Vec<T>, order: StatementOrder) -> Self {
        Self { order, records }
    }

    /// Creates a series from records whose first element is the most recent period.
    #[must_use]
    pub const fn newest_first(records: Vec<T>) -> Self {
        Self::new(records, StatementOrder::NewestFirst)
    }

    /// Creates a series from records whose first element is the oldest period.
    #[must_use]
    pub const fn oldest_first(records: Vec<T>) -> Self {
        Self::new(records, StatementOrder::OldestFirst)
    }

    /// Returns the storage order of this series.
    #[must_use]
    pub const fn order(&self) -> StatementOrder {
        self.order
    }

    /// Returns the number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the series holds no periods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the most recent period.
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        match self.order {
            StatementOrder::NewestFirst => self.records.first(),
            StatementOrder::OldestFirst => self.records.last(),
        }
    }

    /// Returns the period immediately before the most recent one.
    #[must_use]
    pub fn previous(&self) -> Option<&T> {
        if self.records.len() < 2 {
            return None;
        }
        match self.order {
            StatementOrder::NewestFirst => self.records.get(1),
            StatementOrder::OldestFirst => self.records.get(self.records.len() - 2),
        }
    }

    /// Returns the periods ordered oldest to newest.
    #[must_use]
    pub fn chronological(&self) -> Vec<&T> {
        match self.order {
            StatementOrder::OldestFirst => self.records.iter().collect(),
            StatementOrder::NewestFirst => self.records.iter().rev().collect(),
        }
    }

    /// Returns the records in storage order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.records
    }

    /// Drops all but the `n` most recent periods.
    pub fn keep_latest(&mut self, n: usize) {
        let excess = self.records.len().saturating_sub(n);
        if excess == 0 {
            return;
        }
        match self.order {
            StatementOrder::NewestFirst => self.records.truncate(n),
            StatementOrder::OldestFirst => {
                self.records.drain(..excess);
            }
        }
    }
}

impl<T: Dated> StatementSeries<T> {
    /// Creates an oldest-first series by sorting records on their period end.
    ///
    /// Use this when the source cannot vouch for the order it delivered.
    #[must_use]
    pub fn from_dated(mut records: Vec<T>) -> Self {
        records.sort_by_key(|r| r.period_end());
        Self::oldest_first(records)
    }
}

/// All financial data gathered for one company.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFinancialBundle {
    /// Company identity.
    pub profile: CompanyProfile,
    /// Period type of the statement series.
    pub period_type: PeriodType,
    /// Income statements.
    pub income_statements: StatementSeries<IncomeStatement>,
    /// Balance sheets.
    pub balance_sheets: StatementSeries<BalanceSheet>,
    /// Cash flow statements.
    pub cash_flows: StatementSeries<CashFlowStatement>,
    /// Provider-reported key metrics for the latest period.
    pub key_metrics: Option<KeyMetricsSnapshot>,
    /// Market data at fetch time.
    pub market: MarketSnapshot,
    /// When the data was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl RawFinancialBundle {
    /// Creates an empty bundle for the given company.
    #[must_use]
    pub fn new(profile: CompanyProfile) -> Self {
        Self {
            profile,
            ..Default::default()
        }
    }

    /// Returns the company's symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.profile.symbol
    }

    /// Sets the income statements.
    #[must_use]
    pub fn with_income_statements(mut self, series: StatementSeries<IncomeStatement>) -> Self {
        self.income_statements = series;
        self
    }

    /// Sets the balance sheets.
    #[must_use]
    pub fn with_balance_sheets(mut self, series: StatementSeries<BalanceSheet>) -> Self {
        self.balance_sheets = series;
        self
    }

    /// Sets the cash flow statements.
    #[must_use]
    pub fn with_cash_flows(mut self, series: StatementSeries<CashFlowStatement>) -> Self {
        self.cash_flows = series;
        self
    }

    /// Sets the key metrics snapshot.
    #[must_use]
    pub fn with_key_metrics(mut self, key_metrics: KeyMetricsSnapshot) -> Self {
        self.key_metrics = Some(key_metrics);
        self
    }

    /// Sets the market snapshot.
    #[must_use]
    pub fn with_market(mut self, market: MarketSnapshot) -> Self {
        self.market = market;
        self
    }

    /// Sets the fetch timestamp.
    #[must_use]
    pub fn with_fetched_at(mut self, fetched_at: DateTime<Utc>) -> Self {
        self.fetched_at = fetched_at;
        self
    }

    /// Returns true if the bundle carries no financial data at all.
    ///
    /// Such a bundle has nothing to compute from. A bundle missing only some
    /// sections is *not* empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.income_statements.is_empty()
            && self.balance_sheets.is_empty()
            && self.cash_flows.is_empty()
            && self.key_metrics.is_none()
            && self.market.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement(year: i32, revenue: f64) -> IncomeStatement {
        let mut stmt = IncomeStatement::new(NaiveDate::from_ymd_opt(year, 12, 31).unwrap());
        stmt.revenue = Some(revenue);
        stmt
    }

    fn revenues(records: Vec<&IncomeStatement>) -> Vec<f64> {
        records.iter().filter_map(|s| s.revenue).collect()
    }

    #[test]
    fn test_newest_first_series() {
        let series = StatementSeries::newest_first(vec![
            statement(2024, 300.0),
            statement(2023, 200.0),
            statement(2022, 100.0),
        ]);
        assert_eq!(series.latest().and_then(|s| s.revenue), Some(300.0));
        assert_eq!(series.previous().and_then(|s| s.revenue), Some(200.0));
        assert_eq!(revenues(series.chronological()), vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_oldest_first_series() {
        let series = StatementSeries::oldest_first(vec![
            statement(2022, 100.0),
            statement(2023, 200.0),
            statement(2024, 300.0),
        ]);
        assert_eq!(series.latest().and_then(|s| s.revenue), Some(300.0));
        assert_eq!(series.previous().and_then(|s| s.revenue), Some(200.0));
        assert_eq!(revenues(series.chronological()), vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_from_dated_sorts_by_period() {
        let series = StatementSeries::from_dated(vec![
            statement(2023, 200.0),
            statement(2024, 300.0),
            statement(2022, 100.0),
        ]);
        assert_eq!(series.order(), StatementOrder::OldestFirst);
        assert_eq!(revenues(series.chronological()), vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_single_period_has_no_previous() {
        let series = StatementSeries::newest_first(vec![statement(2024, 300.0)]);
        assert!(series.previous().is_none());
        assert!(series.latest().is_some());
    }

    #[test]
    fn test_keep_latest_respects_order() {
        let mut newest = StatementSeries::newest_first(vec![
            statement(2024, 300.0),
            statement(2023, 200.0),
            statement(2022, 100.0),
        ]);
        newest.keep_latest(2);
        assert_eq!(revenues(newest.chronological()), vec![200.0, 300.0]);

        let mut oldest = StatementSeries::oldest_first(vec![
            statement(2022, 100.0),
            statement(2023, 200.0),
            statement(2024, 300.0),
        ]);
        oldest.keep_latest(2);
        assert_eq!(revenues(oldest.chronological()), vec![200.0, 300.0]);

        oldest.keep_latest(10);
        assert_eq!(oldest.len(), 2);
    }

    #[test]
    fn test_bundle_emptiness() {
        let profile = CompanyProfile::new(Symbol::new("ACME"), "Acme Corp");
        let bundle = RawFinancialBundle::new(profile);
        assert!(bundle.is_empty());

        let bundle = bundle.with_income_statements(StatementSeries::newest_first(vec![
            statement(2024, 10.0),
        ]));
        assert!(!bundle.is_empty());
    }

    #[test]
    fn test_bundle_deserializes_with_missing_sections() {
        let json = r#"{
            "profile": { "symbol": "ACME", "name": "Acme Corp", "sector": null,
                         "industry": null, "exchange": null, "currency": null },
            "income_statements": {
                "order": "oldest_first",
                "records": [{ "period_end": "2024-12-31", "revenue": 10.0 }]
            }
        }"#;
        let bundle: RawFinancialBundle = serde_json::from_str(json).unwrap();
        assert_eq!(bundle.symbol().as_str(), "ACME");
        assert_eq!(bundle.income_statements.order(), StatementOrder::OldestFirst);
        assert!(bundle.balance_sheets.is_empty());
        assert!(bundle.key_metrics.is_none());
    }
}
