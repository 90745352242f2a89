use std::io::Write;
use tally_core::DiscrepancyRecord;

use crate::sink::{ReportError, ReportSink};

const HEADER: [&str; 8] = [
    "identifier",
    "date",
    "description",
    "bank_amount",
    "ledger_amount",
    "status",
    "detail",
    "recommendation",
];

/// One row per discrepancy; a missing side's amount is an empty cell.
pub struct CsvReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().has_headers(false).from_writer(out),
        }
    }

    pub fn flush(&mut self) -> Result<(), ReportError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, ReportError> {
        self.writer
            .into_inner()
            .map_err(|e| ReportError::Io(e.into_error()))
    }
}

impl<W: Write> ReportSink for CsvReportWriter<W> {
    fn write_report(
        &mut self,
        discrepancies: &[DiscrepancyRecord],
        _fully_reconciled: bool,
    ) -> Result<(), ReportError> {
        self.writer.write_record(HEADER)?;
        for d in discrepancies {
            self.writer.serialize(d)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
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

    fn unsupported() -> DiscrepancyRecord {
        DiscrepancyRecord {
            identifier: "TX999".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 10, 6).unwrap(),
            description: "Phantom payment".to_string(),
            bank_amount: None,
            ledger_amount: Some(Amount::from_cents(-50000)),
            status: DiscrepancyStatus::UnsupportedByBank,
            detail: "Ledger entry TX999 (Phantom payment) has no corresponding bank record."
                .to_string(),
            recommendation: "Verify supporting documentation or reverse the entry.".to_string(),
        }
    }

    fn render(discrepancies: &[DiscrepancyRecord]) -> String {
        let mut sink = CsvReportWriter::new(Vec::new());
        sink.write_report(discrepancies, discrepancies.is_empty()).unwrap();
        String::from_utf8(sink.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn rows_follow_header() {
        let text = render(&[mismatch(), unsupported()]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "identifier,date,description,bank_amount,ledger_amount,status,detail,recommendation"
        );
        assert_eq!(
            lines[1],
            "TX004,2023-10-04,Rent payment,-2000.00,-200.00,VALUE_MISMATCH,\
             Difference of -1800.00. Bank: -2000.00 | Ledger: -200.00.,Correct the recorded value."
        );
        assert_eq!(
            lines[2],
            "TX999,2023-10-06,Phantom payment,,-500.00,UNSUPPORTED_BY_BANK,\
             Ledger entry TX999 (Phantom payment) has no corresponding bank record.,\
             Verify supporting documentation or reverse the entry."
        );
    }

    #[test]
    fn empty_report_is_header_only() {
        let text = render(&[]);
        assert_eq!(text.lines().count(), 1);
    }
}
