//! The FMP bundle provider.

use async_trait::async_trait;
use chrono::Utc;
use invest_core::{
    DataProvider, FinancialBundleProvider, InvestError, KeyMetricsSnapshot, PeriodType,
    RawFinancialBundle, Result, StatementSeries, Symbol,
};
use reqwest::{Client, StatusCode, header::RETRY_AFTER};
use serde::de::DeserializeOwned;
use std::{fmt, time::Duration};
use tracing::{debug, info, instrument, warn};

use crate::response::{
    FmpBalanceSheet, FmpCashFlow, FmpIncomeStatement, FmpKeyMetrics, FmpProfile, FmpQuote,
};

/// Base URL for the FMP stable API.
pub const FMP_BASE_URL: &str = "https://financialmodelingprep.com/stable";

/// Request behaviour of an [`FmpProvider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FmpConfig {
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retries after the first attempt for 429, 5xx and transport failures.
    pub max_retries: u32,
    /// Delay before the first retry; doubled on each further retry.
    pub backoff_base: Duration,
}

impl Default for FmpConfig {
    fn default() -> Self {
        Self {
            base_url: FMP_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
            max_retries: 4,
            backoff_base: Duration::from_millis(500),
        }
    }
}

impl FmpConfig {
    /// Delay before retry number `attempt` (zero-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(2_u32.saturating_pow(attempt))
    }
}

/// Normalizes a ticker for FMP, which uses dashes for share classes (`BRK.B` → `BRK-B`).
#[must_use]
pub fn normalize_symbol(symbol: &Symbol) -> Symbol {
    Symbol::new(symbol.as_str().replace('.', "-"))
}

/// Financial Modeling Prep bundle provider.
///
/// Provides, per company:
/// - Profile (required)
/// - Quote with price, market cap and 52-week range
/// - Income statements, balance sheets, cash flow statements
/// - The latest key metrics snapshot
#[derive(Clone)]
pub struct FmpProvider {
    client: Client,
    api_key: String,
    config: FmpConfig,
}

impl fmt::Debug for FmpProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmpProvider")
            .field("api_key", &"[REDACTED]")
            .field("config", &self.config)
            .finish()
    }
}

impl FmpProvider {
    /// Create a new FMP provider with the given API key and default settings.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(api_key, FmpConfig::default())
    }

    /// Create a new FMP provider with custom request settings.
    #[must_use]
    pub fn with_config(api_key: impl Into<String>, config: FmpConfig) -> Self {
        Self::with_client(Client::new(), api_key, config)
    }

    /// Create a new FMP provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, api_key: impl Into<String>, config: FmpConfig) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            config,
        }
    }

    /// The provider's request settings.
    #[must_use]
    pub const fn config(&self) -> &FmpConfig {
        &self.config
    }

    /// Build a URL with the API key appended.
    fn url(&self, endpoint: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if endpoint.contains('?') {
            format!("{base}/{endpoint}&apikey={}", self.api_key)
        } else {
            format!("{base}/{endpoint}?apikey={}", self.api_key)
        }
    }

    /// Make a GET request, retrying transient failures, and parse the JSON response.
    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let mut attempt = 0;
        loop {
            match self.get_once(endpoint).await {
                Err(err) if err.is_transient() && attempt < self.config.max_retries => {
                    let delay = match &err {
                        InvestError::RateLimited { retry_after: Some(after), .. } => *after,
                        _ => self.config.backoff(attempt),
                    };
                    warn!(
                        endpoint,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "FMP request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        debug!(endpoint, "FMP request");

        let response = self
            .client
            .get(&url)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| InvestError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(InvestError::RateLimited {
                provider: "FMP".to_string(),
                retry_after,
            });
        }

        if status.is_server_error() {
            return Err(InvestError::Network(format!("HTTP {status} from {endpoint}")));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(InvestError::SymbolNotFound(endpoint.to_string()));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(InvestError::Other(format!("HTTP {status} from {endpoint}: {text}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| InvestError::Network(e.without_url().to_string()))?;

        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| InvestError::Parse(format!("{endpoint}: {e}")))?;
        if let Some(message) = error_message(&value) {
            return Err(InvestError::Other(format!("FMP error from {endpoint}: {message}")));
        }

        serde_json::from_value(value).map_err(|e| InvestError::Parse(format!("{endpoint}: {e}")))
    }

    fn statement_endpoint(
        kind: &str,
        symbol: &Symbol,
        period_type: PeriodType,
        limit: usize,
    ) -> String {
        let period = match period_type {
            PeriodType::Annual => "annual",
            PeriodType::Quarterly => "quarter",
        };
        format!("{kind}?symbol={}&period={period}&limit={limit}", symbol.as_str())
    }

    async fn fetch_profile(&self, symbol: &Symbol) -> Result<FmpProfile> {
        let profiles: Vec<FmpProfile> =
            self.get(&format!("profile?symbol={}", symbol.as_str())).await?;
        profiles
            .into_iter()
            .next()
            .ok_or_else(|| InvestError::SymbolNotFound(symbol.to_string()))
    }

    async fn fetch_quote(&self, symbol: &Symbol) -> Result<Option<FmpQuote>> {
        let quotes: Vec<FmpQuote> = self.get(&format!("quote?symbol={}", symbol.as_str())).await?;
        Ok(quotes.into_iter().next())
    }

    async fn fetch_income_statements(
        &self,
        symbol: &Symbol,
        period_type: PeriodType,
        limit: usize,
    ) -> Result<Vec<FmpIncomeStatement>> {
        self.get(&Self::statement_endpoint("income-statement", symbol, period_type, limit))
            .await
    }

    async fn fetch_balance_sheets(
        &self,
        symbol: &Symbol,
        period_type: PeriodType,
        limit: usize,
    ) -> Result<Vec<FmpBalanceSheet>> {
        self.get(&Self::statement_endpoint("balance-sheet-statement", symbol, period_type, limit))
            .await
    }

    async fn fetch_cash_flows(
        &self,
        symbol: &Symbol,
        period_type: PeriodType,
        limit: usize,
    ) -> Result<Vec<FmpCashFlow>> {
        self.get(&Self::statement_endpoint("cash-flow-statement", symbol, period_type, limit))
            .await
    }

    async fn fetch_key_metrics(
        &self,
        symbol: &Symbol,
        period_type: PeriodType,
    ) -> Result<Vec<FmpKeyMetrics>> {
        self.get(&Self::statement_endpoint("key-metrics", symbol, period_type, 1))
            .await
    }
}

/// Unwraps an optional section, logging and dropping the failure.
fn section<T: Default>(symbol: &Symbol, name: &str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(symbol = %symbol, section = name, error = %err, "FMP section unavailable");
            T::default()
        }
    }
}

/// Converts raw rows, dropping any without a parseable date.
fn convert<R, T>(symbol: &Symbol, name: &str, rows: Vec<R>, f: impl Fn(R) -> Option<T>) -> Vec<T> {
    let total = rows.len();
    let converted: Vec<T> = rows.into_iter().filter_map(f).collect();
    if converted.len() < total {
        debug!(
            symbol = %symbol,
            section = name,
            dropped = total - converted.len(),
            "Dropped rows without a valid date"
        );
    }
    converted
}

impl DataProvider for FmpProvider {
    fn name(&self) -> &str {
        "FMP"
    }

    fn description(&self) -> &str {
        "Financial Modeling Prep - Financial statements, quotes and key metrics"
    }
}

#[async_trait]
impl FinancialBundleProvider for FmpProvider {
    #[instrument(skip(self), fields(provider = "FMP"))]
    async fn fetch_bundle(
        &self,
        symbol: &Symbol,
        period_type: PeriodType,
        limit: usize,
    ) -> Result<RawFinancialBundle> {
        if symbol.is_empty() {
            return Err(InvestError::InvalidInput("ticker is empty".to_string()));
        }
        let fmp_symbol = normalize_symbol(symbol);
        info!(symbol = %symbol, fmp_symbol = %fmp_symbol, "Fetching FMP data");

        let (profile, quote, income, balance, cash, metrics) = tokio::join!(
            self.fetch_profile(&fmp_symbol),
            self.fetch_quote(&fmp_symbol),
            self.fetch_income_statements(&fmp_symbol, period_type, limit),
            self.fetch_balance_sheets(&fmp_symbol, period_type, limit),
            self.fetch_cash_flows(&fmp_symbol, period_type, limit),
            self.fetch_key_metrics(&fmp_symbol, period_type),
        );

        let profile = profile.map_err(|err| match err {
            InvestError::SymbolNotFound(_) => InvestError::SymbolNotFound(symbol.to_string()),
            other => other,
        })?;
        let profile_price = profile.price;
        let profile_market_cap = profile.market_cap;

        let mut market = section(symbol, "quote", quote)
            .map(FmpQuote::into_snapshot)
            .unwrap_or_default();
        if market.price.is_none() {
            market.price = profile_price;
        }
        if market.market_cap.is_none() {
            market.market_cap = profile_market_cap;
        }
        if market.as_of.is_none() && !market.is_empty() {
            market.as_of = Some(Utc::now());
        }

        let income = convert(symbol, "income", section(symbol, "income", income), |r| {
            r.into_statement()
        });
        let balance = convert(symbol, "balance", section(symbol, "balance", balance), |r| {
            r.into_statement()
        });
        let cash = convert(symbol, "cash_flow", section(symbol, "cash_flow", cash), |r| {
            r.into_statement()
        });
        let key_metrics: Option<KeyMetricsSnapshot> = section(symbol, "key_metrics", metrics)
            .into_iter()
            .find_map(FmpKeyMetrics::into_snapshot);

        debug!(
            symbol = %symbol,
            income = income.len(),
            balance = balance.len(),
            cash_flow = cash.len(),
            key_metrics = key_metrics.is_some(),
            "FMP bundle assembled"
        );

        let mut bundle = RawFinancialBundle::new(profile.into_profile(symbol.clone()))
            .with_income_statements(StatementSeries::newest_first(income))
            .with_balance_sheets(StatementSeries::newest_first(balance))
            .with_cash_flows(StatementSeries::newest_first(cash))
            .with_market(market)
            .with_fetched_at(Utc::now());
        bundle.period_type = period_type;
        if let Some(snapshot) = key_metrics {
            bundle = bundle.with_key_metrics(snapshot);
        }

        Ok(bundle)
    }
}

/// Message of an FMP error object.
///
/// FMP reports bad keys and plan limits as a 200 whose body is an object with an
/// `Error Message` or `error` key instead of the expected payload.
fn error_message(value: &serde_json::Value) -> Option<String> {
    let object = value.as_object()?;
    let message = object.get("Error Message").or_else(|| object.get("error"))?;
    Some(message.as_str().map_or_else(|| message.to_string(), str::to_string))
}
