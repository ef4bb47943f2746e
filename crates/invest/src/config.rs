//! Runtime settings read from the environment.

use std::{
    fmt,
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use invest_core::{InvestError, Result};
use invest_fmp::FmpConfig;
use invest_report::{OutputFormat, TableFormat};
use invest_scoring::{DEFAULT_BUY_CUTOFF, DEFAULT_HOLD_CUTOFF, ScoringConfig};

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "/tmp/investor-analysis";

/// Default number of statement periods to fetch.
pub const DEFAULT_STATEMENT_LIMIT: usize = 6;

/// Default port of the HTTP server.
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Settings for one run.
#[derive(Clone)]
pub struct Settings {
    /// Financial Modeling Prep API key.
    pub fmp_api_key: Option<String>,
    /// Directory of saved JSON bundles. When set, bundles are scored offline.
    pub bundle_dir: Option<PathBuf>,
    /// Where writers put their files.
    pub output_dir: PathBuf,
    /// Which writer to use.
    pub output_format: OutputFormat,
    /// Table format for the workbook writer.
    pub table_format: TableFormat,
    /// BUY cutoff.
    pub buy_cutoff: f64,
    /// HOLD cutoff.
    pub hold_cutoff: f64,
    /// HTTP timeout for provider requests.
    pub fmp_timeout: Duration,
    /// Retry budget for rate limits and server errors.
    pub fmp_max_retries: u32,
    /// Statement periods to fetch.
    pub statement_limit: usize,
    /// Default log filter.
    pub log_level: String,
    /// Listen address of the HTTP server.
    pub server_addr: SocketAddr,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("fmp_api_key", &self.fmp_api_key.as_ref().map(|_| "<redacted>"))
            .field("bundle_dir", &self.bundle_dir)
            .field("output_dir", &self.output_dir)
            .field("output_format", &self.output_format)
            .field("table_format", &self.table_format)
            .field("buy_cutoff", &self.buy_cutoff)
            .field("hold_cutoff", &self.hold_cutoff)
            .field("fmp_timeout", &self.fmp_timeout)
            .field("fmp_max_retries", &self.fmp_max_retries)
            .field("statement_limit", &self.statement_limit)
            .field("log_level", &self.log_level)
            .field("server_addr", &self.server_addr)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        let fmp = FmpConfig::default();
        Self {
            fmp_api_key: None,
            bundle_dir: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_format: OutputFormat::default(),
            table_format: TableFormat::default(),
            buy_cutoff: DEFAULT_BUY_CUTOFF,
            hold_cutoff: DEFAULT_HOLD_CUTOFF,
            fmp_timeout: fmp.timeout,
            fmp_max_retries: fmp.max_retries,
            statement_limit: DEFAULT_STATEMENT_LIMIT,
            log_level: "info".to_string(),
            server_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_SERVER_PORT)),
        }
    }
}

impl Settings {
    /// Loads settings from the process environment, after reading `.env` if present.
    ///
    /// # Errors
    ///
    /// Returns [`InvestError::Config`] naming the first variable with an invalid value.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads settings through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`InvestError::Config`] naming the first variable with an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let settings = Self {
            fmp_api_key: var("FMP_API_KEY")
                .map(|key| key.trim_matches(|c| c == '"' || c == '\'').to_string())
                .filter(|key| !key.is_empty()),
            bundle_dir: var("BUNDLE_DIR").map(PathBuf::from),
            output_dir: var("OUTPUT_DIR").map_or(defaults.output_dir, PathBuf::from),
            output_format: parse(&var, "OUTPUT_FORMAT", defaults.output_format)?,
            table_format: parse(&var, "TABLE_FORMAT", defaults.table_format)?,
            buy_cutoff: parse(&var, "SCORE_THRESHOLD_BUY", defaults.buy_cutoff)?,
            hold_cutoff: parse(&var, "SCORE_THRESHOLD_HOLD", defaults.hold_cutoff)?,
            fmp_timeout: Duration::from_secs(parse(
                &var,
                "FMP_TIMEOUT_SECS",
                defaults.fmp_timeout.as_secs(),
            )?),
            fmp_max_retries: parse(&var, "FMP_MAX_RETRIES", defaults.fmp_max_retries)?,
            statement_limit: parse(&var, "STATEMENT_LIMIT", defaults.statement_limit)?,
            log_level: var("LOG_LEVEL").unwrap_or(defaults.log_level),
            server_addr: parse(&var, "SERVER_ADDR", defaults.server_addr)?,
        };

        if settings.fmp_timeout.is_zero() {
            return Err(InvestError::Config("FMP_TIMEOUT_SECS must be positive".to_string()));
        }
        if settings.statement_limit == 0 {
            return Err(InvestError::Config("STATEMENT_LIMIT must be positive".to_string()));
        }
        settings
            .scoring_config()
            .map_err(|e| InvestError::Config(format!("SCORE_THRESHOLD_BUY/HOLD: {e}")))?;

        Ok(settings)
    }

    /// Scoring configuration with the configured cutoffs and default weights.
    ///
    /// # Errors
    ///
    /// Returns [`InvestError::Config`] if the cutoffs are not positive or BUY is not above HOLD.
    pub fn scoring_config(&self) -> Result<ScoringConfig> {
        ScoringConfig::with_cutoffs(self.buy_cutoff, self.hold_cutoff)
    }

    /// HTTP settings for the FMP provider.
    #[must_use]
    pub fn fmp_config(&self) -> FmpConfig {
        FmpConfig {
            timeout: self.fmp_timeout,
            max_retries: self.fmp_max_retries,
            ..FmpConfig::default()
        }
    }
}

fn parse<T>(var: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| InvestError::Config(format!("{name}='{raw}' is invalid: {e}"))),
        None => Ok(default),
    }
}
