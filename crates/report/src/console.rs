use std::io::Write;
use tally_core::{Amount, DiscrepancyRecord, ReconciliationSummary};
use tally_import::SourceFingerprint;

use crate::sink::{ReportError, ReportSink};

pub const FULLY_RECONCILED_MESSAGE: &str = "No discrepancies found. Accounts fully reconciled.";

/// Human-readable summary for a terminal: inputs, counts and a compact table.
pub struct ConsoleSummary<W: Write> {
    out: W,
    sources: Vec<SourceFingerprint>,
    summary: Option<ReconciliationSummary>,
}

impl<W: Write> ConsoleSummary<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            sources: Vec::new(),
            summary: None,
        }
    }

    pub fn with_sources(mut self, sources: Vec<SourceFingerprint>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_summary(mut self, summary: ReconciliationSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_sources(&mut self) -> Result<(), ReportError> {
        for s in &self.sources {
            writeln!(
                self.out,
                "{}: {} rows from {} (sha256 {})",
                s.name,
                s.rows,
                s.path.display(),
                s.short_digest()
            )?;
        }
        Ok(())
    }

    fn write_counts(&mut self) -> Result<(), ReportError> {
        if let Some(s) = self.summary {
            writeln!(
                self.out,
                "Reconciled: {} | Value mismatches: {} | Omitted from ledger: {} | Unsupported by bank: {}",
                s.reconciled, s.value_mismatches, s.omitted_from_ledger, s.unsupported_by_bank
            )?;
        }
        Ok(())
    }

    fn write_table(&mut self, discrepancies: &[DiscrepancyRecord]) -> Result<(), ReportError> {
        let rows: Vec<[String; 4]> = discrepancies
            .iter()
            .map(|d| {
                [
                    d.identifier.clone(),
                    d.status.to_string(),
                    amount_cell(d.bank_amount),
                    amount_cell(d.ledger_amount),
                ]
            })
            .collect();

        let header = ["IDENTIFIER", "STATUS", "BANK", "LEDGER"];
        let mut widths = header.map(str::len);
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.len());
            }
        }

        writeln!(
            self.out,
            "{:<w0$}  {:<w1$}  {:>w2$}  {:>w3$}",
            header[0],
            header[1],
            header[2],
            header[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3]
        )?;
        for row in &rows {
            writeln!(
                self.out,
                "{:<w0$}  {:<w1$}  {:>w2$}  {:>w3$}",
                row[0],
                row[1],
                row[2],
                row[3],
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
                w3 = widths[3]
            )?;
        }
        Ok(())
    }
}

fn amount_cell(amount: Option<Amount>) -> String {
    amount.map_or_else(|| "-".to_string(), |a| a.to_string())
}

impl<W: Write> ReportSink for ConsoleSummary<W> {
    fn write_report(
        &mut self,
        discrepancies: &[DiscrepancyRecord],
        fully_reconciled: bool,
    ) -> Result<(), ReportError> {
        self.write_sources()?;
        self.write_counts()?;

        if fully_reconciled {
            writeln!(self.out, "{FULLY_RECONCILED_MESSAGE}")?;
            return Ok(());
        }

        writeln!(self.out, "Discrepancies found: {}", discrepancies.len())?;
        self.write_table(discrepancies)?;
        self.out.flush()?;
        Ok(())
    }
}
