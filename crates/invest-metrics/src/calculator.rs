//! Metrics calculator.
//!
//! [`MetricsCalculator::calculate`] derives every ratio of a [`MetricsRecord`] from a
//! [`RawFinancialBundle`]. Point-in-time ratios use the most recent period of each
//! statement series; growth ratios read the income statements in chronological
//! order, established from the order tag each series carries, and are annualized
//! according to the bundle's period type.

use invest_core::{
    BalanceSheet, CashFlowStatement, IncomeStatement, InvestError, KeyMetricsSnapshot,
    MarketSnapshot, PeriodType, RawFinancialBundle, Result, StatementSeries,
};

use crate::{
    growth::{window_cagr, year_over_year},
    metric::{Metric, finite, ratio, ratio_over_positive},
    record::{
        FinancialHealthMetrics, GrowthMetrics, MetricsRecord, ProfitabilityMetrics,
        QualityMetrics, ValuationMetrics,
    },
};

/// Derives financial ratios from a raw financial bundle.
///
/// Stateless; a single value can be shared across threads and reused for any
/// number of companies.
#[derive(Clone, Copy, Debug, Default)]
pub struct MetricsCalculator;

/// Latest-period view of a bundle.
#[derive(Clone, Copy)]
struct Latest<'a> {
    income: Option<&'a IncomeStatement>,
    balance: Option<&'a BalanceSheet>,
    cash: Option<&'a CashFlowStatement>,
}

impl<'a> Latest<'a> {
    fn of(bundle: &'a RawFinancialBundle) -> Self {
        Self {
            income: bundle.income_statements.latest(),
            balance: bundle.balance_sheets.latest(),
            cash: bundle.cash_flows.latest(),
        }
    }

    fn income(&self, field: impl Fn(&IncomeStatement) -> Option<f64>) -> Option<f64> {
        finite(self.income.and_then(field))
    }

    fn balance(&self, field: impl Fn(&BalanceSheet) -> Option<f64>) -> Option<f64> {
        finite(self.balance.and_then(field))
    }

    fn cash(&self, field: impl Fn(&CashFlowStatement) -> Option<f64>) -> Option<f64> {
        finite(self.cash.and_then(field))
    }
}

impl MetricsCalculator {
    /// Creates a new calculator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Calculates every metric for the bundle.
    ///
    /// Missing sections leave the dependent metrics unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`InvestError::InvalidInput`] if the bundle has no ticker or carries
    /// no financial data at all.
    pub fn calculate(&self, bundle: &RawFinancialBundle) -> Result<MetricsRecord> {
        if bundle.symbol().is_empty() {
            return Err(InvestError::InvalidInput(
                "financial bundle has no ticker".to_string(),
            ));
        }
        if bundle.is_empty() {
            return Err(InvestError::InvalidInput(format!(
                "financial bundle for {} carries no financial data",
                bundle.symbol()
            )));
        }

        let latest = Latest::of(bundle);
        let market = MarketInputs::resolve(&latest, &bundle.market, bundle.key_metrics.as_ref());

        let mut record = MetricsRecord::new(bundle.symbol().clone(), bundle.profile.name.clone());
        record.sector = bundle.profile.sector.clone();
        record.profitability = Self::profitability(&latest);
        record.growth = Self::growth(&bundle.income_statements, bundle.period_type);
        record.valuation = Self::valuation(&latest, &market, bundle.key_metrics.as_ref());
        record.quality = Self::quality(&latest);
        record.financial_health = Self::financial_health(&latest);
        record.market_cap = market.market_cap;
        record.enterprise_value = market.enterprise_value;

        Ok(record)
    }

    fn profitability(latest: &Latest<'_>) -> ProfitabilityMetrics {
        let revenue = latest.income(|s| s.revenue);
        let net_income = latest.income(|s| s.net_income);

        ProfitabilityMetrics {
            net_margin: ratio_over_positive(net_income, revenue),
            gross_margin: ratio_over_positive(latest.income(|s| s.gross_profit), revenue),
            operating_margin: ratio_over_positive(latest.income(|s| s.operating_income), revenue),
            roe: ratio_over_positive(net_income, latest.balance(|b| b.stockholders_equity)),
            roa: ratio_over_positive(net_income, latest.balance(|b| b.total_assets)),
        }
    }

    fn growth(statements: &StatementSeries<IncomeStatement>, period: PeriodType) -> GrowthMetrics {
        let per_year = period.periods_per_year();
        let chronological = statements.chronological();
        let values = |field: fn(&IncomeStatement) -> Option<f64>| -> Vec<Option<f64>> {
            chronological.iter().map(|s| finite(field(s))).collect()
        };
        let revenue = values(|s| s.revenue);
        let net_income = values(|s| s.net_income);

        GrowthMetrics {
            revenue_growth: year_over_year(&revenue, per_year),
            earnings_growth: year_over_year(&net_income, per_year),
            revenue_cagr: window_cagr(&revenue, per_year),
            earnings_cagr: window_cagr(&net_income, per_year),
        }
    }

    fn valuation(
        latest: &Latest<'_>,
        market: &MarketInputs,
        key_metrics: Option<&KeyMetricsSnapshot>,
    ) -> ValuationMetrics {
        // Provider-reported ratios; a reported zero is a placeholder, not a multiple.
        let reported = |field: fn(&KeyMetricsSnapshot) -> Option<f64>| -> Metric {
            Metric::from_option(key_metrics.and_then(field).filter(|v| *v != 0.0))
        };

        let eps = latest
            .income(|s| s.eps_diluted)
            .or_else(|| latest.income(|s| s.eps));

        let pe_ratio = match market.price {
            Some(price) => ratio(Some(price), eps),
            None => reported(|k| k.pe_ratio),
        };

        let pb_ratio = match market.price {
            Some(price) => {
                let book_per_share =
                    ratio_over_positive(latest.balance(|b| b.stockholders_equity), market.shares);
                ratio_over_positive(Some(price), book_per_share.value())
            }
            None => reported(|k| k.pb_ratio),
        };

        let price_to_sales = match market.market_cap.value() {
            Some(cap) => ratio_over_positive(Some(cap), latest.income(|s| s.revenue)),
            None => reported(|k| k.ps_ratio),
        };

        let ev_to_ebitda = match market.enterprise_value.value() {
            Some(ev) => ratio_over_positive(Some(ev), latest.income(|s| s.ebitda)),
            None => reported(|k| k.ev_to_ebitda),
        };

        ValuationMetrics {
            pe_ratio,
            pb_ratio,
            price_to_sales,
            ev_to_ebitda,
        }
    }

    fn quality(latest: &Latest<'_>) -> QualityMetrics {
        let total_debt = latest.balance(|b| b.total_debt);
        let operating_cash_flow = latest.cash(|c| c.operating_cash_flow);

        let free_cash_flow = match (operating_cash_flow, latest.cash(|c| c.capital_expenditure)) {
            (Some(ocf), Some(capex)) => Metric::new(ocf - capex.abs()),
            _ => Metric::from_option(latest.cash(|c| c.free_cash_flow)),
        };

        QualityMetrics {
            debt_to_equity: ratio_over_positive(total_debt, latest.balance(|b| b.stockholders_equity)),
            free_cash_flow,
            cash_flow_quality: ratio_over_positive(
                operating_cash_flow,
                latest.income(|s| s.net_income),
            ),
            debt_to_ebitda: ratio_over_positive(total_debt, latest.income(|s| s.ebitda)),
        }
    }

    fn financial_health(latest: &Latest<'_>) -> FinancialHealthMetrics {
        let current_assets = latest.balance(|b| b.current_assets);
        let current_liabilities = latest.balance(|b| b.current_liabilities);
        // No inventory line means no inventory to strip out.
        let inventory = latest.balance(|b| b.inventory).unwrap_or(0.0);

        FinancialHealthMetrics {
            current_ratio: ratio_over_positive(current_assets, current_liabilities),
            quick_ratio: ratio_over_positive(
                current_assets.map(|assets| assets - inventory),
                current_liabilities,
            ),
            interest_coverage: ratio_over_positive(
                latest.income(|s| s.operating_income),
                latest.income(|s| s.interest_expense),
            ),
        }
    }
}

/// Market-side inputs resolved from the quote, the statements and the provider snapshot.
struct MarketInputs {
    price: Option<f64>,
    shares: Option<f64>,
    market_cap: Metric,
    enterprise_value: Metric,
}

impl MarketInputs {
    fn resolve(
        latest: &Latest<'_>,
        market: &MarketSnapshot,
        key_metrics: Option<&KeyMetricsSnapshot>,
    ) -> Self {
        let positive = |v: Option<f64>| finite(v).filter(|x| *x > 0.0);

        let price = positive(market.price);
        let shares = positive(market.shares_outstanding)
            .or_else(|| positive(latest.income(|s| s.weighted_average_shares)));

        let market_cap = match (price, shares) {
            (Some(price), Some(shares)) => Metric::new(price * shares),
            _ => Metric::from_option(
                positive(market.market_cap).or_else(|| positive(key_metrics.and_then(|k| k.market_cap))),
            ),
        };

        let enterprise_value = Metric::from_option(finite(
            key_metrics.and_then(|k| k.enterprise_value),
        ))
        .or(market_cap.map(|cap| {
            cap + latest.balance(|b| b.total_debt).unwrap_or(0.0)
                - latest.balance(|b| b.cash_and_equivalents).unwrap_or(0.0)
        }));

        Self {
            price,
            shares,
            market_cap,
            enterprise_value,
        }
    }
}
