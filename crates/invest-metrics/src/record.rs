//! The [`MetricsRecord`] produced by the calculator.

use invest_core::Symbol;
use serde::{Deserialize, Serialize};

use crate::{
    category::{Category, MetricId},
    metric::Metric,
};

/// Margins and returns on capital.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityMetrics {
    /// Net income / revenue.
    pub net_margin: Metric,
    /// Gross profit / revenue.
    pub gross_margin: Metric,
    /// Operating income / revenue.
    pub operating_margin: Metric,
    /// Net income / shareholders' equity.
    pub roe: Metric,
    /// Net income / total assets.
    pub roa: Metric,
}

impl ProfitabilityMetrics {
    /// Metrics in this group, keyed by id.
    #[must_use]
    pub const fn entries(&self) -> [(MetricId, Metric); 5] {
        [
            (MetricId::NetMargin, self.net_margin),
            (MetricId::GrossMargin, self.gross_margin),
            (MetricId::OperatingMargin, self.operating_margin),
            (MetricId::ReturnOnEquity, self.roe),
            (MetricId::ReturnOnAssets, self.roa),
        ]
    }
}

/// Period-over-period and compound growth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthMetrics {
    /// Revenue growth, latest vs previous period.
    pub revenue_growth: Metric,
    /// Net income growth, latest vs previous period.
    pub earnings_growth: Metric,
    /// Revenue CAGR over the available window.
    pub revenue_cagr: Metric,
    /// Net income CAGR over the available window.
    pub earnings_cagr: Metric,
}

impl GrowthMetrics {
    /// Metrics in this group, keyed by id.
    #[must_use]
    pub const fn entries(&self) -> [(MetricId, Metric); 4] {
        [
            (MetricId::RevenueGrowth, self.revenue_growth),
            (MetricId::EarningsGrowth, self.earnings_growth),
            (MetricId::RevenueCagr, self.revenue_cagr),
            (MetricId::EarningsCagr, self.earnings_cagr),
        ]
    }
}

/// Price multiples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationMetrics {
    /// Price / EPS. Negative when the company lost money.
    pub pe_ratio: Metric,
    /// Price / book value per share.
    pub pb_ratio: Metric,
    /// Market cap / revenue.
    pub price_to_sales: Metric,
    /// Enterprise value / EBITDA.
    pub ev_to_ebitda: Metric,
}

impl ValuationMetrics {
    /// Metrics in this group, keyed by id.
    #[must_use]
    pub const fn entries(&self) -> [(MetricId, Metric); 4] {
        [
            (MetricId::PriceToEarnings, self.pe_ratio),
            (MetricId::PriceToBook, self.pb_ratio),
            (MetricId::PriceToSales, self.price_to_sales),
            (MetricId::EvToEbitda, self.ev_to_ebitda),
        ]
    }
}

/// Leverage and cash-flow quality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Total debt / equity.
    pub debt_to_equity: Metric,
    /// Operating cash flow minus capital expenditure.
    pub free_cash_flow: Metric,
    /// Operating cash flow / net income.
    pub cash_flow_quality: Metric,
    /// Total debt / EBITDA.
    pub debt_to_ebitda: Metric,
}

impl QualityMetrics {
    /// Metrics in this group, keyed by id.
    #[must_use]
    pub const fn entries(&self) -> [(MetricId, Metric); 4] {
        [
            (MetricId::DebtToEquity, self.debt_to_equity),
            (MetricId::FreeCashFlow, self.free_cash_flow),
            (MetricId::CashFlowQuality, self.cash_flow_quality),
            (MetricId::DebtToEbitda, self.debt_to_ebitda),
        ]
    }
}

/// Liquidity and debt service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialHealthMetrics {
    /// Current assets / current liabilities.
    pub current_ratio: Metric,
    /// (Current assets - inventory) / current liabilities.
    pub quick_ratio: Metric,
    /// Operating income / interest expense.
    pub interest_coverage: Metric,
}

impl FinancialHealthMetrics {
    /// Metrics in this group, keyed by id.
    #[must_use]
    pub const fn entries(&self) -> [(MetricId, Metric); 3] {
        [
            (MetricId::CurrentRatio, self.current_ratio),
            (MetricId::QuickRatio, self.quick_ratio),
            (MetricId::InterestCoverage, self.interest_coverage),
        ]
    }
}

/// Every ratio derived for one company, grouped by category.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Stock symbol.
    pub symbol: Symbol,
    /// Company name.
    pub company_name: String,
    /// Business sector.
    pub sector: Option<String>,
    /// Profitability group.
    pub profitability: ProfitabilityMetrics,
    /// Growth group.
    pub growth: GrowthMetrics,
    /// Valuation group.
    pub valuation: ValuationMetrics,
    /// Quality group.
    pub quality: QualityMetrics,
    /// Financial health group.
    pub financial_health: FinancialHealthMetrics,
    /// Market capitalisation (informational, not scored).
    pub market_cap: Metric,
    /// Enterprise value (informational, not scored).
    pub enterprise_value: Metric,
}

impl MetricsRecord {
    /// Creates a record with every metric unavailable.
    #[must_use]
    pub fn new(symbol: Symbol, company_name: impl Into<String>) -> Self {
        Self {
            symbol,
            company_name: company_name.into(),
            ..Default::default()
        }
    }

    /// Metrics of one category, keyed by id.
    #[must_use]
    pub fn category(&self, category: Category) -> Vec<(MetricId, Metric)> {
        match category {
            Category::Profitability => self.profitability.entries().to_vec(),
            Category::Growth => self.growth.entries().to_vec(),
            Category::Valuation => self.valuation.entries().to_vec(),
            Category::Quality => self.quality.entries().to_vec(),
            Category::FinancialHealth => self.financial_health.entries().to_vec(),
        }
    }

    /// Every scored metric, in category order.
    pub fn iter(&self) -> impl Iterator<Item = (MetricId, Metric)> + '_ {
        Category::ALL
            .into_iter()
            .flat_map(move |category| self.category(category))
    }

    /// Looks up a single metric.
    #[must_use]
    pub fn get(&self, id: MetricId) -> Metric {
        self.category(id.category())
            .into_iter()
            .find_map(|(candidate, metric)| (candidate == id).then_some(metric))
            .unwrap_or_default()
    }

    /// Number of available metrics in a category.
    #[must_use]
    pub fn available_count(&self, category: Category) -> usize {
        self.category(category)
            .iter()
            .filter(|(_, metric)| metric.is_available())
            .count()
    }

    /// Number of categories with at least one available metric.
    #[must_use]
    pub fn available_categories(&self) -> usize {
        Category::ALL
            .into_iter()
            .filter(|category| self.available_count(*category) > 0)
            .count()
    }
}
