//! Error types for investment analysis.
//!
//! This module defines [`InvestError`] which covers the error cases that can occur
//! when fetching financial data, scoring it, or writing the results out.
//!
//! A metric that cannot be computed is *not* an error: it is represented by an
//! unavailable metric value and flows silently through scoring. Only input that is
//! structurally absent escalates to [`InvestError::InvalidInput`].

use thiserror::Error;

/// Errors that can occur during investment analysis.
#[derive(Error, Debug)]
pub enum InvestError {
    /// Input is structurally absent or empty and nothing can be computed from it.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network-related errors (connection failures, timeouts, HTTP errors).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded by a provider.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// The requested symbol was not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// Error parsing data from a provider or a saved bundle.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error writing analysis output.
    #[error("Output error: {0}")]
    Output(String),

    /// No provider is configured for the requested operation.
    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl InvestError {
    /// Returns true if retrying the same request later may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::RateLimited { .. })
    }
}

/// Result type alias using [`InvestError`].
pub type Result<T> = std::result::Result<T, InvestError>;
