//! Fetch, calculate and score.

use std::sync::Arc;

use invest_core::{
    FinancialBundleProvider, InvestError, PeriodType, RawFinancialBundle, Result, Symbol,
};
use invest_fmp::FmpProvider;
use invest_metrics::MetricsCalculator;
use invest_report::Analysis;
use invest_scoring::InvestmentScorer;
use tracing::{debug, info, instrument, warn};

use crate::{config::Settings, file_provider::JsonFileProvider};

/// Runs the analysis pipeline for one company at a time.
///
/// Providers are tried in registration order until one returns a bundle.
pub struct Analyzer {
    providers: Vec<Arc<dyn FinancialBundleProvider>>,
    calculator: MetricsCalculator,
    scorer: InvestmentScorer,
    period_type: PeriodType,
    limit: usize,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("scorer", &self.scorer)
            .field("period_type", &self.period_type)
            .field("limit", &self.limit)
            .finish()
    }
}

impl Analyzer {
    /// Creates an analyzer with no providers.
    #[must_use]
    pub const fn new(scorer: InvestmentScorer) -> Self {
        Self {
            providers: Vec::new(),
            calculator: MetricsCalculator::new(),
            scorer,
            period_type: PeriodType::Annual,
            limit: crate::config::DEFAULT_STATEMENT_LIMIT,
        }
    }

    /// Builds an analyzer from settings.
    ///
    /// Saved bundles take precedence over FMP when a bundle directory is set.
    ///
    /// # Errors
    ///
    /// Returns [`InvestError::Config`] if the cutoffs are invalid or no data
    /// source is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let scorer = InvestmentScorer::new(settings.scoring_config()?);
        let mut analyzer = Self::new(scorer).with_limit(settings.statement_limit);

        if let Some(dir) = &settings.bundle_dir {
            analyzer.register(Arc::new(JsonFileProvider::new(dir)));
        }
        if let Some(key) = &settings.fmp_api_key {
            analyzer.register(Arc::new(FmpProvider::with_config(key, settings.fmp_config())));
        }
        if analyzer.providers.is_empty() {
            return Err(InvestError::Config(
                "FMP_API_KEY is required unless BUNDLE_DIR is set".to_string(),
            ));
        }
        Ok(analyzer)
    }

    /// Registers a bundle provider after the existing ones.
    pub fn register(&mut self, provider: Arc<dyn FinancialBundleProvider>) {
        debug!(provider = provider.name(), "Registering bundle provider");
        self.providers.push(provider);
    }

    /// Adds a provider.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn FinancialBundleProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Sets the reporting period to fetch.
    #[must_use]
    pub const fn with_period_type(mut self, period_type: PeriodType) -> Self {
        self.period_type = period_type;
        self
    }

    /// Sets how many statement periods to fetch.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// The scorer in use.
    #[must_use]
    pub const fn scorer(&self) -> &InvestmentScorer {
        &self.scorer
    }

    /// Fetches a bundle, trying providers in order until one succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`InvestError::ProviderNotConfigured`] with no providers, otherwise
    /// the last provider's error if all of them fail.
    pub async fn fetch(&self, symbol: &Symbol) -> Result<RawFinancialBundle> {
        if self.providers.is_empty() {
            return Err(InvestError::ProviderNotConfigured(
                "No bundle providers registered".to_string(),
            ));
        }

        let mut last_error = None;
        for provider in &self.providers {
            debug!(provider = provider.name(), symbol = %symbol, "Fetching bundle");

            match provider.fetch_bundle(symbol, self.period_type, self.limit).await {
                Ok(bundle) => return Ok(bundle),
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        symbol = %symbol,
                        error = %e,
                        "Provider failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| InvestError::Other("All providers failed with no error".to_string())))
    }

    /// Scores a bundle that is already in hand.
    ///
    /// # Errors
    ///
    /// Returns [`InvestError::InvalidInput`] if the bundle is empty or no
    /// category can be scored.
    pub fn analyze_bundle(&self, bundle: &RawFinancialBundle) -> Result<Analysis> {
        let metrics = self.calculator.calculate(bundle)?;
        let report = self.scorer.score(&metrics)?;
        info!(
            symbol = %report.symbol,
            total = report.total,
            recommendation = report.recommendation.label(),
            categories = report.available_categories(),
            "Scored company"
        );
        Ok(Analysis::new(bundle, metrics, report))
    }

    /// Fetches and scores one company.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, or [`InvestError::InvalidInput`] as for
    /// [`analyze_bundle`](Self::analyze_bundle).
    #[instrument(skip(self), fields(symbol = %symbol))]
    pub async fn analyze(&self, symbol: &Symbol) -> Result<Analysis> {
        let bundle = self.fetch(symbol).await?;
        self.analyze_bundle(&bundle)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, TimeZone, Utc};
    use invest_core::{
        BalanceSheet, CashFlowStatement, CompanyProfile, IncomeStatement, MarketSnapshot,
        RawFinancialBundle, StatementSeries, Symbol,
    };

    fn date(year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, 12, 31).unwrap()
    }

    /// A company growing 25% a year with wide margins, little debt and a cheap price.
    pub(crate) fn strong_bundle() -> RawFinancialBundle {
        let revenues = [1_000.0, 800.0, 640.0, 512.0, 409.6, 327.68];
        let earnings = [250.0, 200.0, 160.0, 128.0, 102.4, 81.92];

        let mut income: Vec<_> = revenues
            .iter()
            .zip(earnings)
            .zip(0..)
            .map(|((&revenue, net_income), age)| {
                let mut stmt = IncomeStatement::new(date(2024 - age));
                stmt.revenue = Some(revenue);
                stmt.net_income = Some(net_income);
                stmt
            })
            .collect();
        let latest = &mut income[0];
        latest.gross_profit = Some(600.0);
        latest.operating_income = Some(300.0);
        latest.ebitda = Some(350.0);
        latest.eps_diluted = Some(2.5);
        latest.interest_expense = Some(10.0);
        latest.weighted_average_shares = Some(100.0);

        let mut balance = BalanceSheet::new(date(2024));
        balance.total_assets = Some(2_000.0);
        balance.current_assets = Some(900.0);
        balance.cash_and_equivalents = Some(300.0);
        balance.inventory = Some(100.0);
        balance.current_liabilities = Some(300.0);
        balance.total_debt = Some(200.0);
        balance.stockholders_equity = Some(1_000.0);

        let mut cash = CashFlowStatement::new(date(2024));
        cash.operating_cash_flow = Some(350.0);
        cash.capital_expenditure = Some(-50.0);

        RawFinancialBundle::new(
            CompanyProfile::new(Symbol::new("ACME"), "Acme Corp").with_sector("Industrials"),
        )
        .with_income_statements(StatementSeries::newest_first(income))
        .with_balance_sheets(StatementSeries::newest_first(vec![balance]))
        .with_cash_flows(StatementSeries::newest_first(vec![cash]))
        .with_market(MarketSnapshot {
            price: Some(18.0),
            shares_outstanding: Some(100.0),
            year_high: Some(21.0),
            year_low: Some(14.0),
            ..Default::default()
        })
        .with_fetched_at(Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap())
    }

    /// The strong bundle with only the latest income statement, so no growth figure exists.
    pub(crate) fn without_growth() -> RawFinancialBundle {
        let mut bundle = strong_bundle();
        bundle.income_statements.keep_latest(1);
        bundle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use invest_core::DataProvider;
    use invest_metrics::Category;
    use invest_report::{OutputFormat, ReportWriter, TableFormat, writer_for};
    use invest_scoring::{Recommendation, ScoringConfig};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FailingProvider {
        calls: AtomicUsize,
    }

    impl DataProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn description(&self) -> &str {
            "Always fails"
        }
    }

    #[async_trait]
    impl FinancialBundleProvider for FailingProvider {
        async fn fetch_bundle(
            &self,
            symbol: &Symbol,
            _period_type: PeriodType,
            _limit: usize,
        ) -> Result<RawFinancialBundle> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(InvestError::Network(format!("connection refused for {symbol}")))
        }
    }

    #[derive(Debug)]
    struct StaticProvider(RawFinancialBundle);

    impl DataProvider for StaticProvider {
        fn name(&self) -> &str {
            "static"
        }

        fn description(&self) -> &str {
            "Returns a fixed bundle"
        }
    }

    #[async_trait]
    impl FinancialBundleProvider for StaticProvider {
        async fn fetch_bundle(
            &self,
            _symbol: &Symbol,
            _period_type: PeriodType,
            _limit: usize,
        ) -> Result<RawFinancialBundle> {
            Ok(self.0.clone())
        }
    }

    fn analyzer() -> Analyzer {
        Analyzer::new(InvestmentScorer::default())
    }

    #[test]
    fn test_strong_bundle_is_strong_buy() {
        let analysis = analyzer().analyze_bundle(&fixtures::strong_bundle()).unwrap();
        let report = &analysis.report;

        assert!(report.total >= 80.0, "total was {}", report.total);
        assert_eq!(report.recommendation, Recommendation::StrongBuy);
        assert_eq!(report.available_categories(), 5);
        assert!(report.concerns.is_empty());
        assert!(!report.strengths.is_empty());
        assert_eq!(analysis.context.price, Some(18.0));
    }

    #[test]
    fn test_missing_growth_renormalizes() {
        let analysis = analyzer().analyze_bundle(&fixtures::without_growth()).unwrap();
        let report = &analysis.report;

        assert_eq!(report.available_categories(), 4);
        assert!(report.category_score(Category::Growth).is_none());
        assert!((0.0..=100.0).contains(&report.total));

        let weights: f64 = report.categories.iter().map(|c| c.weight).sum();
        assert!((weights - 1.0).abs() < 1e-9);
        assert_eq!(report.category(Category::Growth).map(|c| c.weight), Some(0.0));
    }

    #[test]
    fn test_empty_bundle_is_invalid() {
        let bundle = RawFinancialBundle::new(invest_core::CompanyProfile::new(
            Symbol::new("EMPTY"),
            "Empty Inc",
        ));
        let err = analyzer().analyze_bundle(&bundle).unwrap_err();
        assert!(matches!(err, InvestError::InvalidInput(_)));
    }

    #[test]
    fn test_custom_cutoffs_change_recommendation() {
        let scorer = InvestmentScorer::new(ScoringConfig::with_cutoffs(95.0, 90.0).unwrap());
        let analysis = Analyzer::new(scorer)
            .analyze_bundle(&fixtures::strong_bundle())
            .unwrap();
        // A perfect score clears BUY but not BUY plus the band offset.
        assert_eq!(analysis.report.recommendation, Recommendation::Buy);
    }

    #[tokio::test]
    async fn test_no_providers() {
        let err = analyzer().analyze(&Symbol::new("ACME")).await.unwrap_err();
        assert!(matches!(err, InvestError::ProviderNotConfigured(_)));
    }

    #[tokio::test]
    async fn test_falls_back_to_next_provider() {
        let failing = Arc::new(FailingProvider {
            calls: AtomicUsize::new(0),
        });
        let analyzer = analyzer()
            .with_provider(failing.clone())
            .with_provider(Arc::new(StaticProvider(fixtures::strong_bundle())));

        let analysis = analyzer.analyze(&Symbol::new("ACME")).await.unwrap();
        assert_eq!(analysis.symbol().as_str(), "ACME");
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_providers_fail_returns_last_error() {
        let analyzer = analyzer().with_provider(Arc::new(FailingProvider {
            calls: AtomicUsize::new(0),
        }));
        let err = analyzer.analyze(&Symbol::new("ACME")).await.unwrap_err();
        assert!(matches!(err, InvestError::Network(_)));
    }

    #[tokio::test]
    async fn test_saved_bundle_to_workbook() {
        let tmp = tempfile::tempdir().unwrap();
        let bundles = JsonFileProvider::new(tmp.path().join("bundles"));
        bundles.save(&fixtures::strong_bundle()).await.unwrap();

        let analyzer = analyzer().with_provider(Arc::new(bundles));
        let analysis = analyzer.analyze(&Symbol::new("acme")).await.unwrap();

        let paths = writer_for(OutputFormat::Workbook, TableFormat::Csv)
            .write(&analysis, &tmp.path().join("out"))
            .unwrap();
        assert_eq!(paths.len(), 3);
        let summary = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(summary.contains("STRONG BUY"));
    }

    #[test]
    fn test_from_settings_requires_a_source() {
        let err = Analyzer::from_settings(&Settings::default()).unwrap_err();
        assert!(matches!(err, InvestError::Config(_)));

        let settings = Settings {
            bundle_dir: Some("/tmp/bundles".into()),
            fmp_api_key: Some("key".to_string()),
            ..Settings::default()
        };
        let analyzer = Analyzer::from_settings(&settings).unwrap();
        let debug = format!("{analyzer:?}");
        assert!(debug.contains("JSON files"));
        assert!(debug.contains("FMP"));
    }
}
