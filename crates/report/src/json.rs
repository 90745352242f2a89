use serde::Serialize;
use std::io::Write;
use tally_core::DiscrepancyRecord;
use tally_import::SourceFingerprint;

use crate::sink::{ReportError, ReportSink};

#[derive(Serialize)]
struct JsonReport<'a> {
    fully_reconciled: bool,
    discrepancy_count: usize,
    sources: &'a [SourceFingerprint],
    discrepancies: &'a [DiscrepancyRecord],
}

/// Pretty-printed JSON document; amounts are decimal strings.
pub struct JsonReportWriter<W: Write> {
    out: W,
    sources: Vec<SourceFingerprint>,
}

impl<W: Write> JsonReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<SourceFingerprint>) -> Self {
        self.sources = sources;
        self
    }

    pub fn flush(&mut self) -> Result<(), ReportError> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonReportWriter<W> {
    fn write_report(
        &mut self,
        discrepancies: &[DiscrepancyRecord],
        fully_reconciled: bool,
    ) -> Result<(), ReportError> {
        let report = JsonReport {
            fully_reconciled,
            discrepancy_count: discrepancies.len(),
            sources: &self.sources,
            discrepancies,
        };
        serde_json::to_writer_pretty(&mut self.out, &report)?;
        writeln!(self.out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use tally_core::{Amount, DiscrepancyStatus};

    fn mismatch() -> DiscrepancyRecord {
        DiscrepancyRecord {
            identifier: "TX004".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 10, 4).unwrap(),
            description: "Rent payment".to_string(),
            bank_amount: Some(Amount::from_cents(-200000)),
            ledger_amount: Some(Amount::from_cents(-20000)),
            status: DiscrepancyStatus::ValueMismatch,
            detail: "Difference of -1800.00. Bank: -2000.00 | Ledger: -200.00.".to_string(),
            recommendation: "Correct the recorded value.".to_string(),
        }
    }

    fn render(
        mut sink: JsonReportWriter<Vec<u8>>,
        discrepancies: &[DiscrepancyRecord],
    ) -> serde_json::Value {
        sink.write_report(discrepancies, discrepancies.is_empty()).unwrap();
        serde_json::from_slice(&sink.into_inner()).unwrap()
    }

    #[test]
    fn amounts_are_strings_and_missing_sides_null() {
        let mut rec = mismatch();
        rec.ledger_amount = None;
        let value = render(JsonReportWriter::new(Vec::new()), &[rec]);
        let d = &value["discrepancies"][0];
        assert_eq!(d["bank_amount"], "-2000.00");
        assert!(d["ledger_amount"].is_null());
        assert_eq!(d["date"], "2023-10-04");
        assert_eq!(value["fully_reconciled"], false);
    }

    #[test]
    fn sources_are_embedded() {
        let sink = JsonReportWriter::new(Vec::new()).with_sources(vec![SourceFingerprint {
            name: "bank statement".to_string(),
            path: PathBuf::from("input_bank_statement.csv"),
            sha256: "ab".repeat(32),
            rows: 6,
        }]);
        let value = render(sink, &[mismatch()]);
        assert_eq!(value["sources"][0]["rows"], 6);
        assert_eq!(value["sources"][0]["name"], "bank statement");
        assert_eq!(value["discrepancy_count"], 1);
    }

    #[test]
    fn empty_report_is_fully_reconciled() {
        let value = render(JsonReportWriter::new(Vec::new()), &[]);
        assert_eq!(value["fully_reconciled"], true);
        assert_eq!(value["discrepancies"].as_array().unwrap().len(), 0);
    }
}
