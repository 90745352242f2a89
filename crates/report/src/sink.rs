use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tally_core::DiscrepancyRecord;
use tally_import::SourceFingerprint;
use thiserror::Error;

use crate::csv::CsvReportWriter;
use crate::json::JsonReportWriter;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Destination for a finished reconciliation.
/// Implementations decide the format; `discrepancies` arrive ordered by identifier.
pub trait ReportSink {
    fn write_report(
        &mut self,
        discrepancies: &[DiscrepancyRecord],
        fully_reconciled: bool,
    ) -> Result<(), ReportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

impl ReportFormat {
    /// `.json` means JSON; anything else is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ReportFormat::Json,
            _ => ReportFormat::Csv,
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("Unknown report format: '{other}'")),
        }
    }
}

/// Writes the report to `path` and returns its absolute location.
pub fn write_report_file(
    path: &Path,
    format: ReportFormat,
    sources: &[SourceFingerprint],
    discrepancies: &[DiscrepancyRecord],
) -> Result<PathBuf, ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = BufWriter::new(File::create(path)?);
    let fully_reconciled = discrepancies.is_empty();

    match format {
        ReportFormat::Csv => {
            let mut sink = CsvReportWriter::new(file);
            sink.write_report(discrepancies, fully_reconciled)?;
            sink.flush()?;
        }
        ReportFormat::Json => {
            let mut sink = JsonReportWriter::new(file).with_sources(sources.to_vec());
            sink.write_report(discrepancies, fully_reconciled)?;
            sink.flush()?;
        }
    }

    let absolute = std::fs::canonicalize(path)?;
    tracing::info!(
        "Wrote {} discrepancies as {:?} to {}",
        discrepancies.len(),
        format,
        absolute.display()
    );
    Ok(absolute)
}
