//! FMP API response types and their conversion into bundle records.
//!
//! Every numeric field is optional. FMP omits fields or sends `null` for line
//! items a company does not report, and those must stay distinguishable from zero.

use chrono::{DateTime, NaiveDate, Utc};
use invest_core::{
    BalanceSheet, CashFlowStatement, CompanyProfile, IncomeStatement, KeyMetricsSnapshot,
    MarketSnapshot, Symbol,
};
use serde::Deserialize;

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

fn parse_year(year: Option<&str>) -> Option<i32> {
    year.and_then(|y| y.trim().parse().ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// FMP company profile response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FmpProfile {
    #[serde(default)]
    pub(crate) company_name: Option<String>,
    #[serde(default)]
    pub(crate) sector: Option<String>,
    #[serde(default)]
    pub(crate) industry: Option<String>,
    #[serde(default, alias = "exchangeShortName")]
    pub(crate) exchange: Option<String>,
    #[serde(default)]
    pub(crate) currency: Option<String>,
    #[serde(default)]
    pub(crate) price: Option<f64>,
    #[serde(default, alias = "mktCap")]
    pub(crate) market_cap: Option<f64>,
}

impl FmpProfile {
    pub(crate) fn into_profile(self, symbol: Symbol) -> CompanyProfile {
        let name = non_empty(self.company_name).unwrap_or_else(|| symbol.to_string());
        CompanyProfile {
            symbol,
            name,
            sector: non_empty(self.sector),
            industry: non_empty(self.industry),
            exchange: non_empty(self.exchange),
            currency: non_empty(self.currency),
        }
    }
}

/// FMP quote response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FmpQuote {
    #[serde(default)]
    pub(crate) price: Option<f64>,
    #[serde(default)]
    pub(crate) market_cap: Option<f64>,
    #[serde(default)]
    pub(crate) shares_outstanding: Option<f64>,
    #[serde(default)]
    pub(crate) year_high: Option<f64>,
    #[serde(default)]
    pub(crate) year_low: Option<f64>,
    #[serde(default)]
    pub(crate) timestamp: Option<i64>,
}

impl FmpQuote {
    pub(crate) fn into_snapshot(self) -> MarketSnapshot {
        MarketSnapshot {
            price: self.price,
            shares_outstanding: self.shares_outstanding,
            market_cap: self.market_cap,
            year_high: self.year_high,
            year_low: self.year_low,
            as_of: self
                .timestamp
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
        }
    }
}

/// FMP income statement response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FmpIncomeStatement {
    pub(crate) date: String,
    #[serde(default, alias = "calendarYear")]
    fiscal_year: Option<String>,
    #[serde(default)]
    revenue: Option<f64>,
    #[serde(default)]
    cost_of_revenue: Option<f64>,
    #[serde(default)]
    gross_profit: Option<f64>,
    #[serde(default)]
    operating_income: Option<f64>,
    #[serde(default)]
    net_income: Option<f64>,
    #[serde(default)]
    ebitda: Option<f64>,
    #[serde(default)]
    eps: Option<f64>,
    #[serde(default)]
    eps_diluted: Option<f64>,
    #[serde(default)]
    interest_expense: Option<f64>,
    #[serde(default)]
    weighted_average_shs_out: Option<f64>,
}

impl FmpIncomeStatement {
    pub(crate) fn into_statement(self) -> Option<IncomeStatement> {
        let period_end = parse_date(&self.date)?;
        Some(IncomeStatement {
            period_end,
            fiscal_year: parse_year(self.fiscal_year.as_deref()),
            revenue: self.revenue,
            cost_of_revenue: self.cost_of_revenue,
            gross_profit: self.gross_profit,
            operating_income: self.operating_income,
            net_income: self.net_income,
            ebitda: self.ebitda,
            eps: self.eps,
            eps_diluted: self.eps_diluted,
            // Some filers report interest expense as a negative line.
            interest_expense: self.interest_expense.map(f64::abs),
            weighted_average_shares: self.weighted_average_shs_out,
        })
    }
}

/// FMP balance sheet response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FmpBalanceSheet {
    pub(crate) date: String,
    #[serde(default, alias = "calendarYear")]
    fiscal_year: Option<String>,
    #[serde(default)]
    total_assets: Option<f64>,
    #[serde(default)]
    total_current_assets: Option<f64>,
    #[serde(default)]
    cash_and_cash_equivalents: Option<f64>,
    #[serde(default)]
    inventory: Option<f64>,
    #[serde(default)]
    total_liabilities: Option<f64>,
    #[serde(default)]
    total_current_liabilities: Option<f64>,
    #[serde(default)]
    total_debt: Option<f64>,
    #[serde(default)]
    total_stockholders_equity: Option<f64>,
}

impl FmpBalanceSheet {
    pub(crate) fn into_statement(self) -> Option<BalanceSheet> {
        let period_end = parse_date(&self.date)?;
        Some(BalanceSheet {
            period_end,
            fiscal_year: parse_year(self.fiscal_year.as_deref()),
            total_assets: self.total_assets,
            current_assets: self.total_current_assets,
            cash_and_equivalents: self.cash_and_cash_equivalents,
            inventory: self.inventory,
            total_liabilities: self.total_liabilities,
            current_liabilities: self.total_current_liabilities,
            total_debt: self.total_debt,
            stockholders_equity: self.total_stockholders_equity,
        })
    }
}

/// FMP cash flow statement response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FmpCashFlow {
    pub(crate) date: String,
    #[serde(default, alias = "calendarYear")]
    fiscal_year: Option<String>,
    #[serde(default)]
    operating_cash_flow: Option<f64>,
    #[serde(default)]
    capital_expenditure: Option<f64>,
    #[serde(default)]
    free_cash_flow: Option<f64>,
    #[serde(default, alias = "netDividendsPaid")]
    dividends_paid: Option<f64>,
}

impl FmpCashFlow {
    pub(crate) fn into_statement(self) -> Option<CashFlowStatement> {
        let period_end = parse_date(&self.date)?;
        Some(CashFlowStatement {
            period_end,
            fiscal_year: parse_year(self.fiscal_year.as_deref()),
            operating_cash_flow: self.operating_cash_flow,
            capital_expenditure: self.capital_expenditure,
            free_cash_flow: self.free_cash_flow,
            dividends_paid: self.dividends_paid,
        })
    }
}

/// FMP key metrics response.
///
/// The stable and legacy APIs name the multiples differently; both are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FmpKeyMetrics {
    pub(crate) date: String,
    #[serde(default)]
    market_cap: Option<f64>,
    #[serde(default)]
    enterprise_value: Option<f64>,
    #[serde(default, alias = "priceToEarningsRatio")]
    pe_ratio: Option<f64>,
    #[serde(default, alias = "priceToBookRatio")]
    pb_ratio: Option<f64>,
    #[serde(default)]
    price_to_sales_ratio: Option<f64>,
    #[serde(default, rename = "evToEBITDA", alias = "enterpriseValueOverEBITDA")]
    ev_to_ebitda: Option<f64>,
}

impl FmpKeyMetrics {
    pub(crate) fn into_snapshot(self) -> Option<KeyMetricsSnapshot> {
        let date = parse_date(&self.date)?;
        Some(KeyMetricsSnapshot {
            date,
            market_cap: self.market_cap,
            enterprise_value: self.enterprise_value,
            pe_ratio: self.pe_ratio,
            pb_ratio: self.pb_ratio,
            ps_ratio: self.price_to_sales_ratio,
            ev_to_ebitda: self.ev_to_ebitda,
        })
    }
}
