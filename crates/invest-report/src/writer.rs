//! Report writers.
//!
//! Every writer implements [`ReportWriter`] and writes into an output directory,
//! creating it if needed, and returns the paths it produced.

use invest_core::{InvestError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, info};

use crate::{
    analysis::Analysis,
    tables::{frame_error, metrics_frame, scores_frame, summary_frame},
};

/// Writes an [`Analysis`] to durable output.
pub trait ReportWriter: Send + Sync + fmt::Debug {
    /// Short name used in file names, e.g. `summary`.
    fn kind(&self) -> &'static str;

    /// Writes the analysis under `output_dir` and returns the files written.
    ///
    /// # Errors
    ///
    /// Returns [`InvestError::Output`] if the directory or a file cannot be written.
    fn write(&self, analysis: &Analysis, output_dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Which writer to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One-row CSV summary.
    #[default]
    Summary,
    /// Summary, metrics and scores tables.
    Workbook,
    /// JSON archive.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Summary => "summary",
            Self::Workbook => "workbook",
            Self::Json => "json",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = InvestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" | "csv" | "sheets" => Ok(Self::Summary),
            "workbook" | "excel" => Ok(Self::Workbook),
            "json" => Ok(Self::Json),
            other => Err(InvestError::Config(format!(
                "unknown output format '{other}', expected summary, workbook or json"
            ))),
        }
    }
}

/// File format for workbook tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// Comma-separated values with a header row.
    #[default]
    Csv,
    /// Apache Parquet.
    Parquet,
}

impl TableFormat {
    /// File extension, without the dot.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TableFormat {
    type Err = InvestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "parquet" => Ok(Self::Parquet),
            other => Err(InvestError::Config(format!(
                "unknown table format '{other}', expected csv or parquet"
            ))),
        }
    }
}

/// Creates the writer for a format.
#[must_use]
pub fn writer_for(format: OutputFormat, table_format: TableFormat) -> Box<dyn ReportWriter> {
    match format {
        OutputFormat::Summary => Box::new(SummaryWriter),
        OutputFormat::Workbook => Box::new(WorkbookWriter::new(table_format)),
        OutputFormat::Json => Box::new(JsonWriter),
    }
}

fn io_error(path: &Path, err: std::io::Error) -> InvestError {
    InvestError::Output(format!("{}: {err}", path.display()))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| io_error(dir, e))
}

fn write_table(df: &mut DataFrame, path: &Path, format: TableFormat) -> Result<()> {
    let mut file = File::create(path).map_err(|e| io_error(path, e))?;
    match format {
        TableFormat::Csv => CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .map_err(frame_error)?,
        TableFormat::Parquet => {
            ParquetWriter::new(&mut file).finish(df).map_err(frame_error)?;
        }
    }
    debug!(path = %path.display(), rows = df.height(), "Wrote table");
    Ok(())
}

/// Writes the one-row summary as CSV.
#[derive(Clone, Copy, Debug, Default)]
pub struct SummaryWriter;

impl ReportWriter for SummaryWriter {
    fn kind(&self) -> &'static str {
        "summary"
    }

    fn write(&self, analysis: &Analysis, output_dir: &Path) -> Result<Vec<PathBuf>> {
        ensure_dir(output_dir)?;
        let path = output_dir.join(format!("{}.csv", analysis.file_stem(self.kind())));
        let mut df = summary_frame(analysis)?;
        write_table(&mut df, &path, TableFormat::Csv)?;
        info!(symbol = %analysis.symbol(), path = %path.display(), "Summary written");
        Ok(vec![path])
    }
}

/// Writes the summary, metrics and scores tables into a workbook directory.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkbookWriter {
    format: TableFormat,
}

impl WorkbookWriter {
    /// Creates a workbook writer for the given table format.
    #[must_use]
    pub const fn new(format: TableFormat) -> Self {
        Self { format }
    }

    /// The table format.
    #[must_use]
    pub const fn format(&self) -> TableFormat {
        self.format
    }
}

impl ReportWriter for WorkbookWriter {
    fn kind(&self) -> &'static str {
        "workbook"
    }

    fn write(&self, analysis: &Analysis, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let dir = output_dir.join(analysis.file_stem(self.kind()));
        ensure_dir(&dir)?;

        let tables = [
            ("summary", summary_frame(analysis)?),
            ("metrics", metrics_frame(analysis)?),
            ("scores", scores_frame(analysis)?),
        ];

        let mut paths = Vec::with_capacity(tables.len());
        for (name, mut df) in tables {
            let path = dir.join(format!("{name}.{}", self.format.extension()));
            write_table(&mut df, &path, self.format)?;
            paths.push(path);
        }

        info!(
            symbol = %analysis.symbol(),
            dir = %dir.display(),
            format = %self.format,
            "Workbook written"
        );
        Ok(paths)
    }
}

/// Writes the full analysis as pretty-printed JSON.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonWriter;

impl ReportWriter for JsonWriter {
    fn kind(&self) -> &'static str {
        "analysis"
    }

    fn write(&self, analysis: &Analysis, output_dir: &Path) -> Result<Vec<PathBuf>> {
        ensure_dir(output_dir)?;
        let path = output_dir.join(format!("{}.json", analysis.file_stem(self.kind())));
        let file = File::create(&path).map_err(|e| io_error(&path, e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), analysis)
            .map_err(|e| InvestError::Output(format!("{}: {e}", path.display())))?;
        info!(symbol = %analysis.symbol(), path = %path.display(), "JSON archive written");
        Ok(vec![path])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures;

    #[test]
    fn test_summary_writer_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("nested").join("out");

        let paths = SummaryWriter.write(&fixtures::analysis(), &out).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(
            paths[0].file_name().unwrap().to_str().unwrap(),
            "ACME_summary_20250314_092653.csv"
        );

        let text = fs::read_to_string(&paths[0]).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("ticker,company,sector,total_score,recommendation"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("ACME,Acme Corp,Industrials,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_workbook_writer_csv() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = WorkbookWriter::new(TableFormat::Csv)
            .write(&fixtures::analysis(), tmp.path())
            .unwrap();

        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["summary.csv", "metrics.csv", "scores.csv"]);
        assert!(paths[0].parent().unwrap().ends_with("ACME_workbook_20250314_092653"));

        let metrics = fs::read_to_string(&paths[1]).unwrap();
        // Header plus one line per metric.
        assert_eq!(metrics.lines().count(), 21);
        assert!(metrics.contains("pe_ratio"));
    }

    #[test]
    fn test_workbook_writer_parquet_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = WorkbookWriter::new(TableFormat::Parquet)
            .write(&fixtures::analysis(), tmp.path())
            .unwrap();
        assert!(paths.iter().all(|p| p.extension().unwrap() == "parquet"));

        let file = File::open(&paths[2]).unwrap();
        let df = ParquetReader::new(file).finish().unwrap();
        assert_eq!(df.height(), 5);
        assert_eq!(df.column("score").unwrap().null_count(), 1);
    }

    #[test]
    fn test_json_writer() {
        let tmp = tempfile::tempdir().unwrap();
        let analysis = fixtures::analysis();
        let paths = JsonWriter.write(&analysis, tmp.path()).unwrap();

        let text = fs::read_to_string(&paths[0]).unwrap();
        let back: Analysis = serde_json::from_str(&text).unwrap();
        assert_eq!(back.symbol(), analysis.symbol());
        assert_eq!(back.report.recommendation, analysis.report.recommendation);
        assert_eq!(back.report.concerns, analysis.report.concerns);
        assert_eq!(back.metrics.valuation.pe_ratio, analysis.metrics.valuation.pe_ratio);
        assert_eq!(back.generated_at, analysis.generated_at);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("Workbook".parse::<OutputFormat>().unwrap(), OutputFormat::Workbook);
        assert_eq!("excel".parse::<OutputFormat>().unwrap(), OutputFormat::Workbook);
        assert_eq!(" json ".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xlsx".parse::<OutputFormat>().is_err());
        assert_eq!("PARQUET".parse::<TableFormat>().unwrap(), TableFormat::Parquet);
        assert!("feather".parse::<TableFormat>().is_err());
    }

    #[test]
    fn test_writer_for() {
        assert_eq!(writer_for(OutputFormat::Summary, TableFormat::Csv).kind(), "summary");
        assert_eq!(writer_for(OutputFormat::Workbook, TableFormat::Parquet).kind(), "workbook");
        assert_eq!(writer_for(OutputFormat::Json, TableFormat::Csv).kind(), "analysis");
    }
}
