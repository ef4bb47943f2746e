//! Metric categories and metric identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five semantic metric groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Margins and returns on capital.
    Profitability,
    /// Period-over-period and compound growth.
    Growth,
    /// Price multiples.
    Valuation,
    /// Leverage and cash-flow quality.
    Quality,
    /// Liquidity and debt service.
    FinancialHealth,
}

impl Category {
    /// All categories in report order.
    pub const ALL: [Self; 5] = [
        Self::Profitability,
        Self::Growth,
        Self::Valuation,
        Self::Quality,
        Self::FinancialHealth,
    ];

    /// Stable machine-readable key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Profitability => "profitability",
            Self::Growth => "growth",
            Self::Valuation => "valuation",
            Self::Quality => "quality",
            Self::FinancialHealth => "financial_health",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Profitability => "Profitability",
            Self::Growth => "Growth",
            Self::Valuation => "Valuation",
            Self::Quality => "Quality",
            Self::FinancialHealth => "Financial Health",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a metric's value is expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// A fraction shown as a percentage (0.25 → "25.0%").
    Percent,
    /// A multiple (12.5 → "12.50x").
    Multiple,
    /// A currency amount.
    Currency,
}

impl Unit {
    /// Formats a value in this unit for display.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Percent => format!("{:.1}%", value * 100.0),
            Self::Multiple => format!("{value:.2}x"),
            Self::Currency => format_currency(value),
        }
    }
}

fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    if abs >= 1e12 {
        format!("{sign}${:.2}T", abs / 1e12)
    } else if abs >= 1e9 {
        format!("{sign}${:.2}B", abs / 1e9)
    } else if abs >= 1e6 {
        format!("{sign}${:.2}M", abs / 1e6)
    } else if abs >= 1e3 {
        format!("{sign}${:.2}K", abs / 1e3)
    } else {
        format!("{sign}${abs:.2}")
    }
}

/// Identifies one metric in a [`MetricsRecord`](crate::MetricsRecord).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricId {
    /// Net income / revenue.
    NetMargin,
    /// Gross profit / revenue.
    GrossMargin,
    /// Operating income / revenue.
    OperatingMargin,
    /// Net income / shareholders' equity.
    ReturnOnEquity,
    /// Net income / total assets.
    ReturnOnAssets,
    /// Latest vs previous period revenue.
    RevenueGrowth,
    /// Latest vs previous period net income.
    EarningsGrowth,
    /// Compound annual revenue growth over the available window.
    RevenueCagr,
    /// Compound annual net income growth over the available window.
    EarningsCagr,
    /// Price / earnings per share.
    PriceToEarnings,
    /// Price / book value per share.
    PriceToBook,
    /// Market capitalisation / revenue.
    PriceToSales,
    /// Enterprise value / EBITDA.
    EvToEbitda,
    /// Total debt / shareholders' equity.
    DebtToEquity,
    /// Operating cash flow minus capital expenditure.
    FreeCashFlow,
    /// Operating cash flow / net income.
    CashFlowQuality,
    /// Total debt / EBITDA.
    DebtToEbitda,
    /// Current assets / current liabilities.
    CurrentRatio,
    /// (Current assets - inventory) / current liabilities.
    QuickRatio,
    /// Operating income / interest expense.
    InterestCoverage,
}

impl MetricId {
    /// Category this metric belongs to.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::NetMargin
            | Self::GrossMargin
            | Self::OperatingMargin
            | Self::ReturnOnEquity
            | Self::ReturnOnAssets => Category::Profitability,
            Self::RevenueGrowth | Self::EarningsGrowth | Self::RevenueCagr | Self::EarningsCagr => {
                Category::Growth
            }
            Self::PriceToEarnings | Self::PriceToBook | Self::PriceToSales | Self::EvToEbitda => {
                Category::Valuation
            }
            Self::DebtToEquity | Self::FreeCashFlow | Self::CashFlowQuality | Self::DebtToEbitda => {
                Category::Quality
            }
            Self::CurrentRatio | Self::QuickRatio | Self::InterestCoverage => {
                Category::FinancialHealth
            }
        }
    }

    /// Stable machine-readable key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::NetMargin => "net_margin",
            Self::GrossMargin => "gross_margin",
            Self::OperatingMargin => "operating_margin",
            Self::ReturnOnEquity => "roe",
            Self::ReturnOnAssets => "roa",
            Self::RevenueGrowth => "revenue_growth",
            Self::EarningsGrowth => "earnings_growth",
            Self::RevenueCagr => "revenue_cagr",
            Self::EarningsCagr => "earnings_cagr",
            Self::PriceToEarnings => "pe_ratio",
            Self::PriceToBook => "pb_ratio",
            Self::PriceToSales => "price_to_sales",
            Self::EvToEbitda => "ev_to_ebitda",
            Self::DebtToEquity => "debt_to_equity",
            Self::FreeCashFlow => "free_cash_flow",
            Self::CashFlowQuality => "cash_flow_quality",
            Self::DebtToEbitda => "debt_to_ebitda",
            Self::CurrentRatio => "current_ratio",
            Self::QuickRatio => "quick_ratio",
            Self::InterestCoverage => "interest_coverage",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NetMargin => "Net margin",
            Self::GrossMargin => "Gross margin",
            Self::OperatingMargin => "Operating margin",
            Self::ReturnOnEquity => "Return on equity",
            Self::ReturnOnAssets => "Return on assets",
            Self::RevenueGrowth => "Revenue growth",
            Self::EarningsGrowth => "Earnings growth",
            Self::RevenueCagr => "Revenue CAGR",
            Self::EarningsCagr => "Earnings CAGR",
            Self::PriceToEarnings => "P/E ratio",
            Self::PriceToBook => "P/B ratio",
            Self::PriceToSales => "Price to sales",
            Self::EvToEbitda => "EV/EBITDA",
            Self::DebtToEquity => "Debt to equity",
            Self::FreeCashFlow => "Free cash flow",
            Self::CashFlowQuality => "Operating cash flow to net income",
            Self::DebtToEbitda => "Debt to EBITDA",
            Self::CurrentRatio => "Current ratio",
            Self::QuickRatio => "Quick ratio",
            Self::InterestCoverage => "Interest coverage",
        }
    }

    /// Unit the value is expressed in.
    #[must_use]
    pub const fn unit(&self) -> Unit {
        match self {
            Self::NetMargin
            | Self::GrossMargin
            | Self::OperatingMargin
            | Self::ReturnOnEquity
            | Self::ReturnOnAssets
            | Self::RevenueGrowth
            | Self::EarningsGrowth
            | Self::RevenueCagr
            | Self::EarningsCagr => Unit::Percent,
            Self::FreeCashFlow => Unit::Currency,
            _ => Unit::Multiple,
        }
    }

    /// Formats a value of this metric for display.
    #[must_use]
    pub fn format_value(&self, value: f64) -> String {
        self.unit().format(value)
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
