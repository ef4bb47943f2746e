//! HTTP front end for batch runs.
//!
//! `GET /health` answers `{"ok": true}`. `POST /run` scores every ticker in the
//! body, writes each result with the requested writer and reports one exit code
//! per ticker, the same codes the command line would exit with for it alone.

use std::{path::PathBuf, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use invest_core::{InvestError, Result, Symbol};
use invest_report::{OutputFormat, TableFormat, writer_for};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

use crate::{config::Settings, pipeline::Analyzer};

/// Exit code of a ticker whose output was written.
pub const EXIT_OK: i32 = 0;
/// Exit code of a ticker that could not be fetched, scored or written.
pub const EXIT_FAILED: i32 = 1;

/// State shared by every request.
#[derive(Clone, Debug)]
pub struct ServerState {
    analyzer: Arc<Analyzer>,
    output_dir: PathBuf,
    output_format: OutputFormat,
    table_format: TableFormat,
}

impl ServerState {
    /// Serves `analyzer`, writing summaries into `output_dir` unless a request
    /// asks for another format.
    pub fn new(analyzer: Analyzer, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            output_dir: output_dir.into(),
            output_format: OutputFormat::default(),
            table_format: TableFormat::default(),
        }
    }

    /// Builds the analyzer and output defaults from settings.
    ///
    /// # Errors
    ///
    /// See [`Analyzer::from_settings`].
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(Analyzer::from_settings(settings)?, settings.output_dir.clone())
            .with_output_format(settings.output_format)
            .with_table_format(settings.table_format))
    }

    /// Writer used when a request names none.
    #[must_use]
    pub const fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Table format for the workbook writer.
    #[must_use]
    pub const fn with_table_format(mut self, format: TableFormat) -> Self {
        self.table_format = format;
        self
    }

    async fn run_one(&self, symbol: &Symbol, format: OutputFormat) -> Result<Vec<PathBuf>> {
        if symbol.is_empty() {
            return Err(InvestError::InvalidInput("blank ticker".to_string()));
        }
        let analysis = self.analyzer.analyze(symbol).await?;

        // Writers do blocking file IO.
        let writer = writer_for(format, self.table_format);
        let output_dir = self.output_dir.clone();
        tokio::task::spawn_blocking(move || writer.write(&analysis, &output_dir))
            .await
            .map_err(|e| InvestError::Other(format!("writer task failed: {e}")))?
    }
}

/// Body of `POST /run`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Tickers to analyze, in order.
    pub tickers: Vec<String>,
    /// Writer name, as accepted by `OUTPUT_FORMAT`. Defaults to the server's.
    #[serde(default)]
    pub output_format: Option<String>,
}

/// Outcome for one ticker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerResult {
    /// Normalized ticker.
    pub ticker: String,
    /// [`EXIT_OK`] or [`EXIT_FAILED`].
    pub exit_code: i32,
    /// Why the ticker failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body answered by `POST /run`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResponse {
    /// Tickers whose output was written.
    pub updated: usize,
    /// When the batch finished.
    pub updated_at: DateTime<Utc>,
    /// One entry per requested ticker.
    pub results: Vec<TickerResult>,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<InvestError> for ApiError {
    fn from(err: InvestError) -> Self {
        let status = match &err {
            InvestError::InvalidInput(_) | InvestError::Config(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self { status, message: err.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "ok": false, "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// Routes for the batch service.
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/run", post(run_batch))
        .with_state(state)
}

/// Serves the batch routes on `listener` until Ctrl-C.
///
/// # Errors
///
/// Returns the IO error that stopped the server.
pub async fn serve(listener: TcpListener, state: ServerState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Listening");
    }
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

#[instrument(skip_all)]
async fn run_batch(
    State(state): State<ServerState>,
    Json(request): Json<RunRequest>,
) -> std::result::Result<Json<RunResponse>, ApiError> {
    let format = match request.output_format.as_deref() {
        Some(name) => name.parse::<OutputFormat>()?,
        None => state.output_format,
    };

    info!(tickers = request.tickers.len(), format = %format, "Starting batch");
    let mut results = Vec::with_capacity(request.tickers.len());
    for ticker in &request.tickers {
        let symbol = Symbol::new(ticker);
        let result = match state.run_one(&symbol, format).await {
            Ok(paths) => {
                info!(symbol = %symbol, files = paths.len(), "Output ready");
                TickerResult { ticker: symbol.to_string(), exit_code: EXIT_OK, error: None }
            }
            Err(e) => {
                error!(symbol = %symbol, error = %e, "Analysis failed");
                TickerResult {
                    ticker: symbol.to_string(),
                    exit_code: EXIT_FAILED,
                    error: Some(e.to_string()),
                }
            }
        };
        results.push(result);
    }

    let updated = results.iter().filter(|r| r.exit_code == EXIT_OK).count();
    info!(updated, failed = results.len() - updated, "Batch complete");
    Ok(Json(RunResponse { updated, updated_at: Utc::now(), results }))
}
