//! The writer input: a scored company with its metrics and market context.

use chrono::{DateTime, Utc};
use invest_core::{RawFinancialBundle, Symbol};
use invest_metrics::MetricsRecord;
use invest_scoring::ScoreReport;
use serde::{Deserialize, Serialize};

/// Market facts at fetch time, shown alongside the score.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    /// Last traded price.
    pub price: Option<f64>,
    /// 52-week high.
    pub year_high: Option<f64>,
    /// 52-week low.
    pub year_low: Option<f64>,
    /// Trading currency.
    pub currency: Option<String>,
    /// When the underlying data was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl MarketContext {
    /// Extracts the context from a bundle.
    #[must_use]
    pub fn from_bundle(bundle: &RawFinancialBundle) -> Self {
        Self {
            price: bundle.market.price,
            year_high: bundle.market.year_high,
            year_low: bundle.market.year_low,
            currency: bundle.profile.currency.clone(),
            fetched_at: bundle.fetched_at,
        }
    }
}

/// Everything a writer needs about one scored company.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// The score report.
    pub report: ScoreReport,
    /// Metrics the report was computed from.
    pub metrics: MetricsRecord,
    /// Market context.
    pub context: MarketContext,
    /// When the analysis was produced. Used to stamp output file names.
    pub generated_at: DateTime<Utc>,
}

impl Analysis {
    /// Assembles an analysis stamped with the current time.
    #[must_use]
    pub fn new(bundle: &RawFinancialBundle, metrics: MetricsRecord, report: ScoreReport) -> Self {
        Self {
            report,
            metrics,
            context: MarketContext::from_bundle(bundle),
            generated_at: Utc::now(),
        }
    }

    /// Overrides the generation time.
    #[must_use]
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// The company's symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.report.symbol
    }

    /// File stem `{TICKER}_{kind}_{YYYYmmdd_HHMMSS}`.
    #[must_use]
    pub fn file_stem(&self, kind: &str) -> String {
        let ticker: String = self
            .symbol()
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
            .collect();
        format!("{ticker}_{kind}_{}", self.generated_at.format("%Y%m%d_%H%M%S"))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;
    use invest_core::{CompanyProfile, MarketSnapshot};
    use invest_metrics::Metric;
    use invest_scoring::InvestmentScorer;

    /// A scored company with a mix of available and unavailable metrics.
    pub(crate) fn analysis() -> Analysis {
        let mut metrics = MetricsRecord::new(Symbol::new("ACME"), "Acme Corp");
        metrics.sector = Some("Industrials".to_string());
        metrics.profitability.net_margin = Metric::Value(0.22);
        metrics.profitability.roe = Metric::Value(0.18);
        metrics.valuation.pe_ratio = Metric::Value(55.0);
        metrics.quality.free_cash_flow = Metric::Value(-3_500_000.0);
        metrics.financial_health.current_ratio = Metric::Value(2.2);
        let report = InvestmentScorer::default().score(&metrics).unwrap();

        let bundle = RawFinancialBundle::new(
            CompanyProfile::new(Symbol::new("ACME"), "Acme Corp").with_sector("Industrials"),
        )
        .with_market(MarketSnapshot {
            price: Some(42.5),
            year_high: Some(50.0),
            year_low: Some(30.0),
            ..Default::default()
        });

        Analysis::new(&bundle, metrics, report)
            .with_generated_at(Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap())
    }
}
