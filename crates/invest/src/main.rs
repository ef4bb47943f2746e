//! Command-line entry point: score each ticker and write the results.

use std::{net::SocketAddr, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use invest::{
    Analyzer, JsonFileProvider, OutputFormat, ReportWriter, ServerState, Settings, Symbol,
    TableFormat, render_text, writer_for,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Libraries whose debug output drowns out the pipeline's own.
const NOISY_MODULES: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls", "polars"];

#[derive(Debug, Parser)]
#[command(name = "invest", version, about = "Score companies on their fundamentals")]
struct Cli {
    /// Ticker symbols to analyze.
    #[arg(required_unless_present = "serve", value_name = "TICKER")]
    tickers: Vec<String>,

    /// Serve `GET /health` and `POST /run` instead of analyzing tickers.
    /// Listens on SERVER_ADDR unless an address is given.
    #[arg(
        long,
        value_name = "ADDR",
        num_args = 0..=1,
        conflicts_with_all = ["tickers", "save_bundles", "print"]
    )]
    serve: Option<Option<SocketAddr>>,

    /// Output writer: summary, workbook or json.
    #[arg(long, short)]
    format: Option<OutputFormat>,

    /// Table format for the workbook writer: csv or parquet.
    #[arg(long)]
    table_format: Option<TableFormat>,

    /// Directory for output files.
    #[arg(long, short)]
    output_dir: Option<PathBuf>,

    /// Score saved JSON bundles from this directory instead of calling FMP.
    #[arg(long)]
    bundle_dir: Option<PathBuf>,

    /// Save each fetched bundle as JSON into this directory.
    #[arg(long)]
    save_bundles: Option<PathBuf>,

    /// Log as JSON lines.
    #[arg(long)]
    json_logs: bool,

    /// Also print a readable report to stdout.
    #[arg(long, short)]
    print: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut directives = log_level.to_string();
        for module in NOISY_MODULES {
            directives.push_str(&format!(",{module}=warn"));
        }
        EnvFilter::new(directives)
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        let _ = registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init();
    } else {
        let _ = registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
    }
}

fn apply_overrides(cli: &Cli, settings: &mut Settings) {
    if let Some(format) = cli.format {
        settings.output_format = format;
    }
    if let Some(table_format) = cli.table_format {
        settings.table_format = table_format;
    }
    if let Some(dir) = &cli.output_dir {
        settings.output_dir.clone_from(dir);
    }
    if let Some(dir) = &cli.bundle_dir {
        settings.bundle_dir = Some(dir.clone());
    }
}

async fn serve(addr: SocketAddr, settings: &Settings) -> Result<()> {
    let state = ServerState::from_settings(settings).context("failed to configure analyzer")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    invest::serve(listener, state).await.context("server stopped")
}

/// Analyzes every ticker and returns how many failed.
async fn run(cli: &Cli, settings: &Settings) -> Result<usize> {
    let analyzer = Analyzer::from_settings(settings).context("failed to configure analyzer")?;
    let writer = writer_for(settings.output_format, settings.table_format);
    let archive = cli.save_bundles.as_ref().map(JsonFileProvider::new);
    info!(
        tickers = cli.tickers.len(),
        format = %settings.output_format,
        output_dir = %settings.output_dir.display(),
        "Starting analysis"
    );

    let mut failures = 0;
    for ticker in &cli.tickers {
        let symbol = Symbol::new(ticker);
        let outcome = analyze_one(
            &analyzer,
            writer.as_ref(),
            archive.as_ref(),
            &symbol,
            settings,
            cli.print,
        )
        .await;
        if let Err(e) = outcome {
            let message = format!("{e:#}");
            error!(symbol = %symbol, error = %message, "Analysis failed");
            failures += 1;
        }
    }

    info!(
        succeeded = cli.tickers.len() - failures,
        failed = failures,
        "Analysis complete"
    );
    Ok(failures)
}

async fn analyze_one(
    analyzer: &Analyzer,
    writer: &dyn ReportWriter,
    archive: Option<&JsonFileProvider>,
    symbol: &Symbol,
    settings: &Settings,
    print: bool,
) -> Result<()> {
    let bundle = analyzer
        .fetch(symbol)
        .await
        .with_context(|| format!("failed to fetch data for {symbol}"))?;
    if let Some(archive) = archive {
        archive
            .save(&bundle)
            .await
            .with_context(|| format!("failed to save bundle for {symbol}"))?;
    }

    let analysis = analyzer
        .analyze_bundle(&bundle)
        .with_context(|| format!("failed to score {symbol}"))?;
    let paths = writer
        .write(&analysis, &settings.output_dir)
        .with_context(|| format!("failed to write {} output for {symbol}", writer.kind()))?;

    if print {
        println!("{}", render_text(&analysis));
    }
    for path in paths {
        info!(symbol = %symbol, path = %path.display(), "Output ready");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = Settings::from_env();

    let log_level = settings.as_ref().map_or("info", |s| s.log_level.as_str());
    init_tracing(log_level, cli.json_logs);

    let result = match settings {
        Ok(mut settings) => {
            apply_overrides(&cli, &mut settings);
            match cli.serve {
                Some(addr) => serve(addr.unwrap_or(settings.server_addr), &settings)
                    .await
                    .map(|()| 0),
                None => run(&cli, &settings).await,
            }
        }
        Err(e) => Err(anyhow::Error::new(e).context("invalid configuration")),
    };

    match result {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            let message = format!("{e:#}");
            error!(error = %message, "Aborting");
            ExitCode::FAILURE
        }
    }
}
