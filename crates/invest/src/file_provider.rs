//! Financial bundles saved as JSON files.
//!
//! Each bundle lives at `<dir>/<SYMBOL>.json`. Saving a fetched bundle and scoring
//! it later gives reproducible results without network access.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use invest_core::{
    DataProvider, FinancialBundleProvider, InvestError, PeriodType, RawFinancialBundle, Result,
    Symbol,
};
use tracing::{debug, info, instrument};

/// Reads bundles from a directory of JSON files.
#[derive(Clone, Debug)]
pub struct JsonFileProvider {
    dir: PathBuf,
}

impl JsonFileProvider {
    /// Creates a provider rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The bundle directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the bundle file for a symbol.
    ///
    /// Characters other than ASCII letters, digits, `-` and `.` become `_`, so
    /// the file always sits directly inside the bundle directory.
    #[must_use]
    pub fn path_for(&self, symbol: &Symbol) -> PathBuf {
        let stem: String = symbol
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
            .collect();
        self.dir.join(format!("{stem}.json"))
    }

    /// Writes a bundle so it can be read back by [`fetch_bundle`](FinancialBundleProvider::fetch_bundle).
    ///
    /// # Errors
    ///
    /// Returns [`InvestError::Output`] if the directory or file cannot be written.
    pub async fn save(&self, bundle: &RawFinancialBundle) -> Result<PathBuf> {
        let path = self.path_for(bundle.symbol());
        let json = serde_json::to_vec_pretty(bundle)
            .map_err(|e| InvestError::Output(format!("failed to encode bundle: {e}")))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| InvestError::Output(format!("{}: {e}", self.dir.display())))?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| InvestError::Output(format!("{}: {e}", path.display())))?;

        info!(symbol = %bundle.symbol(), path = %path.display(), "Saved bundle");
        Ok(path)
    }
}

impl DataProvider for JsonFileProvider {
    fn name(&self) -> &str {
        "JSON files"
    }

    fn description(&self) -> &str {
        "Financial bundles saved as JSON files"
    }
}

#[async_trait]
impl FinancialBundleProvider for JsonFileProvider {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn fetch_bundle(
        &self,
        symbol: &Symbol,
        period_type: PeriodType,
        limit: usize,
    ) -> Result<RawFinancialBundle> {
        let path = self.path_for(symbol);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(InvestError::SymbolNotFound(symbol.to_string()));
            }
            Err(e) => return Err(InvestError::Other(format!("{}: {e}", path.display()))),
        };

        let mut bundle: RawFinancialBundle = serde_json::from_str(&text)
            .map_err(|e| InvestError::Parse(format!("{}: {e}", path.display())))?;

        if bundle.symbol().is_empty() {
            bundle.profile.symbol = symbol.clone();
        }
        if bundle.period_type != period_type {
            debug!(
                saved = ?bundle.period_type,
                requested = ?period_type,
                "Saved bundle has a different period type"
            );
        }
        bundle.income_statements.keep_latest(limit);
        bundle.balance_sheets.keep_latest(limit);
        bundle.cash_flows.keep_latest(limit);

        debug!(
            income_statements = bundle.income_statements.len(),
            balance_sheets = bundle.balance_sheets.len(),
            cash_flows = bundle.cash_flows.len(),
            "Loaded bundle"
        );
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures;

    #[tokio::test]
    async fn test_save_and_fetch() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = JsonFileProvider::new(tmp.path().join("bundles"));
        let bundle = fixtures::strong_bundle();

        let path = provider.save(&bundle).await.unwrap();
        assert!(path.ends_with("bundles/ACME.json"));

        let loaded = provider
            .fetch_bundle(&Symbol::new("acme"), PeriodType::Annual, 10)
            .await
            .unwrap();
        assert_eq!(loaded, bundle);
    }

    #[tokio::test]
    async fn test_path_stays_inside_bundle_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("bundles");
        let provider = JsonFileProvider::new(&dir);

        for ticker in ["../x", "..\\x", "a/../../b", "/etc/passwd", ".."] {
            let path = provider.path_for(&Symbol::new(ticker));
            assert_eq!(path.parent(), Some(dir.as_path()), "{ticker}");
        }
        assert!(provider.path_for(&Symbol::new("brk.b")).ends_with("BRK.B.json"));

        let mut bundle = fixtures::strong_bundle();
        bundle.profile.symbol = Symbol::new("../x");
        let saved = provider.save(&bundle).await.unwrap();
        assert!(saved.ends_with("bundles/.._X.json"));
        assert!(!tmp.path().join("X.json").exists());

        let loaded = provider
            .fetch_bundle(&Symbol::new("../x"), PeriodType::Annual, 10)
            .await
            .unwrap();
        assert_eq!(loaded.symbol().as_str(), "../X");
    }

    #[tokio::test]
    async fn test_fetch_applies_limit() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = JsonFileProvider::new(tmp.path());
        provider.save(&fixtures::strong_bundle()).await.unwrap();

        let loaded = provider
            .fetch_bundle(&Symbol::new("ACME"), PeriodType::Annual, 2)
            .await
            .unwrap();
        assert_eq!(loaded.income_statements.len(), 2);
        assert_eq!(
            loaded.income_statements.latest().and_then(|s| s.revenue),
            Some(1_000.0)
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_symbol_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = JsonFileProvider::new(tmp.path());

        let err = provider
            .fetch_bundle(&Symbol::new("NOPE"), PeriodType::Annual, 6)
            .await
            .unwrap_err();
        assert!(matches!(err, InvestError::SymbolNotFound(s) if s == "NOPE"));
    }

    #[tokio::test]
    async fn test_malformed_file_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("BAD.json"), "{ not json").unwrap();
        let provider = JsonFileProvider::new(tmp.path());

        let err = provider
            .fetch_bundle(&Symbol::new("BAD"), PeriodType::Annual, 6)
            .await
            .unwrap_err();
        assert!(matches!(err, InvestError::Parse(_)));
    }
}
