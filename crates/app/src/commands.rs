use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tally_core::{reconcile_rows_with, MalformedRowPolicy, RawRow, ReconciliationSummary, RowOptions};
use tally_import::{load_rows, write_demo_inputs, DemoInputs, SourceFingerprint, SourceProfile};
use tally_report::{write_report_file, ConsoleSummary, ReportFormat, ReportSink};

use crate::config::Config;

/// Command-line overrides for `tally reconcile`; unset fields fall back to the config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileArgs {
    pub config: Option<PathBuf>,
    pub bank: Option<PathBuf>,
    pub ledger: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub format: Option<ReportFormat>,
    pub skip_malformed: bool,
}

impl ReconcileArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(bank) = &self.bank {
            config.inputs.bank = bank.clone();
        }
        if let Some(ledger) = &self.ledger {
            config.inputs.ledger = ledger.clone();
        }
        if let Some(report) = &self.report {
            config.output.report = report.clone();
        }
        if let Some(format) = self.format {
            config.output.format = Some(format);
        }
        if self.skip_malformed {
            config.policy.malformed_rows = MalformedRowPolicy::Skip;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub summary: ReconciliationSummary,
    pub skipped_rows: usize,
    /// Absolute path of the written report; `None` when fully reconciled.
    pub report: Option<PathBuf>,
}

fn load_source(path: &Path, profile: &SourceProfile) -> Result<(Vec<RawRow>, SourceFingerprint)> {
    let rows = load_rows(path, profile)
        .with_context(|| format!("Failed to load {} from {}", profile.name, path.display()))?;
    let fingerprint = SourceFingerprint::of_file(&profile.name, path, rows.len())
        .with_context(|| format!("Failed to hash {}", path.display()))?;
    Ok((rows, fingerprint))
}

/// Runs a full reconciliation and prints the summary to `out`.
/// The report file is only written when discrepancies were found.
pub fn reconcile<W: Write>(config: &Config, out: &mut W) -> Result<RunOutcome> {
    let (bank_rows, bank_source) = load_source(&config.inputs.bank, &config.bank)?;
    let (ledger_rows, ledger_source) = load_source(&config.inputs.ledger, &config.ledger)?;

    let options = RowOptions {
        policy: config.policy.malformed_rows,
        bank_date_format: config.bank.date_format.clone(),
        ledger_date_format: config.ledger.date_format.clone(),
    };
    let run = reconcile_rows_with(&bank_rows, &ledger_rows, &options)
        .context("Reconciliation aborted")?;

    for skipped in &run.skipped {
        tracing::warn!("Skipped malformed row: {skipped}");
    }

    let reconciliation = run.reconciliation;
    let summary = reconciliation.summary;
    let sources = vec![bank_source, ledger_source];
    let fully_reconciled = reconciliation.is_fully_reconciled();

    let mut console = ConsoleSummary::new(&mut *out)
        .with_sources(sources.clone())
        .with_summary(summary);
    console.write_report(&reconciliation.discrepancies, fully_reconciled)?;

    let report = if fully_reconciled {
        tracing::info!("No discrepancies, no report written");
        None
    } else {
        let format = config.output.resolved_format();
        let path = write_report_file(
            &config.output.report,
            format,
            &sources,
            &reconciliation.discrepancies,
        )
        .with_context(|| format!("Failed to write report {}", config.output.report.display()))?;
        writeln!(out, "Report written to {}", path.display())?;
        Some(path)
    };

    Ok(RunOutcome {
        summary,
        skipped_rows: run.skipped.len(),
        report,
    })
}

pub fn demo<W: Write>(dir: &Path, config: &Config, out: &mut W) -> Result<DemoInputs> {
    let inputs = write_demo_inputs(dir, &config.bank, &config.ledger)
        .with_context(|| format!("Failed to write demo inputs into {}", dir.display()))?;
    writeln!(out, "Wrote {}", inputs.bank.display())?;
    writeln!(out, "Wrote {}", inputs.ledger.display())?;
    Ok(inputs)
}
