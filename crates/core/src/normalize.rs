use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Amount;
use crate::record::{field, BankRecord, LedgerRecord, RawRow, Record, Side};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecordError {
    #[error("{side} row {line}: identifier is empty")]
    MissingIdentifier { side: Side, line: usize },
    #[error("{side} row {line}: amount {value:?} is not a valid decimal amount")]
    InvalidAmount {
        side: Side,
        line: usize,
        value: String,
    },
    #[error("{side} row {line}: date {value:?} is not a recognised calendar date")]
    InvalidDate {
        side: Side,
        line: usize,
        value: String,
    },
}

impl MalformedRecordError {
    pub fn side(&self) -> Side {
        match self {
            MalformedRecordError::MissingIdentifier { side, .. }
            | MalformedRecordError::InvalidAmount { side, .. }
            | MalformedRecordError::InvalidDate { side, .. } => *side,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            MalformedRecordError::MissingIdentifier { line, .. }
            | MalformedRecordError::InvalidAmount { line, .. }
            | MalformedRecordError::InvalidDate { line, .. } => *line,
        }
    }
}

/// What to do with a row that cannot be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRowPolicy {
    /// Fail the whole batch on the first malformed row.
    #[default]
    Abort,
    /// Leave the row out and report it in [`Normalized::skipped`].
    Skip,
}

impl std::str::FromStr for MalformedRowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(MalformedRowPolicy::Abort),
            "skip" => Ok(MalformedRowPolicy::Skip),
            other => Err(format!("Unknown malformed row policy: '{other}'")),
        }
    }
}

/// Output of a batch normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    /// Rows left out under [`MalformedRowPolicy::Skip`], in input order.
    pub skipped: Vec<MalformedRecordError>,
}

/// Records that can be built from a [`RawRow`].
pub trait Normalize: Record + Sized {
    /// `date_format` pins one chrono format; `None` tries the usual layouts.
    fn from_raw_with(
        row: &RawRow,
        date_format: Option<&str>,
    ) -> Result<Self, MalformedRecordError>;

    fn from_raw(row: &RawRow) -> Result<Self, MalformedRecordError> {
        Self::from_raw_with(row, None)
    }
}

struct Fields {
    identifier: String,
    date: NaiveDate,
    description: String,
    amount: Amount,
}

fn parse_fields(
    side: Side,
    row: &RawRow,
    date_format: Option<&str>,
) -> Result<Fields, MalformedRecordError> {
    let line = row.line;

    let identifier = row
        .get(field::IDENTIFIER)
        .ok_or(MalformedRecordError::MissingIdentifier { side, line })?
        .to_string();

    let raw_amount = row.get(field::AMOUNT).unwrap_or_default();
    let amount = raw_amount
        .parse::<Amount>()
        .map_err(|_| MalformedRecordError::InvalidAmount {
            side,
            line,
            value: raw_amount.to_string(),
        })?;

    let raw_date = row.get(field::DATE).unwrap_or_default();
    let date = parse_date(raw_date, date_format).ok_or_else(|| MalformedRecordError::InvalidDate {
        side,
        line,
        value: raw_date.to_string(),
    })?;

    let description = row.get(field::DESCRIPTION).unwrap_or_default().to_string();

    Ok(Fields {
        identifier,
        date,
        description,
        amount,
    })
}

// ISO first, then the common slash/dash orderings. Month-first wins when a
// date like 03/04/2023 is ambiguous; pin a format to read it day-first.
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%m-%d-%Y", "%d-%m-%Y",
];

fn parse_date(s: &str, pinned: Option<&str>) -> Option<NaiveDate> {
    match pinned {
        Some(fmt) => NaiveDate::parse_from_str(s, fmt).ok(),
        None => DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok()),
    }
}

impl Normalize for BankRecord {
    fn from_raw_with(
        row: &RawRow,
        date_format: Option<&str>,
    ) -> Result<Self, MalformedRecordError> {
        let f = parse_fields(Self::SIDE, row, date_format)?;
        Ok(BankRecord {
            identifier: f.identifier,
            date: f.date,
            description: f.description,
            amount: f.amount,
        })
    }
}

impl Normalize for LedgerRecord {
    fn from_raw_with(
        row: &RawRow,
        date_format: Option<&str>,
    ) -> Result<Self, MalformedRecordError> {
        let f = parse_fields(Self::SIDE, row, date_format)?;
        Ok(LedgerRecord {
            identifier: f.identifier,
            date: f.date,
            description: f.description,
            amount: f.amount,
        })
    }
}

pub fn normalize_rows<T: Normalize>(
    rows: &[RawRow],
    policy: MalformedRowPolicy,
) -> Result<Normalized<T>, MalformedRecordError> {
    normalize_rows_with(rows, policy, None)
}

pub fn normalize_rows_with<T: Normalize>(
    rows: &[RawRow],
    policy: MalformedRowPolicy,
    date_format: Option<&str>,
) -> Result<Normalized<T>, MalformedRecordError> {
    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();

    for row in rows {
        match T::from_raw_with(row, date_format) {
            Ok(record) => records.push(record),
            Err(e) if policy == MalformedRowPolicy::Skip => skipped.push(e),
            Err(e) => return Err(e),
        }
    }

    Ok(Normalized { records, skipped })
}

pub fn normalize_bank_rows(
    rows: &[RawRow],
    policy: MalformedRowPolicy,
) -> Result<Normalized<BankRecord>, MalformedRecordError> {
    normalize_rows(rows, policy)
}

pub fn normalize_ledger_rows(
    rows: &[RawRow],
    policy: MalformedRowPolicy,
) -> Result<Normalized<LedgerRecord>, MalformedRecordError> {
    normalize_rows(rows, policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(line: usize, id: &str, date: &str, desc: &str, amount: &str) -> RawRow {
        RawRow::new(line)
            .with(field::IDENTIFIER, id)
            .with(field::DATE, date)
            .with(field::DESCRIPTION, desc)
            .with(field::AMOUNT, amount)
    }

    #[test]
    fn bank_record_from_raw() {
        let rec = BankRecord::from_raw(&row(1, "TX001", "2023-10-01", "Supplier A", "-1500.00"))
            .unwrap();
        assert_eq!(rec.identifier, "TX001");
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2023, 10, 1).unwrap());
        assert_eq!(rec.description, "Supplier A");
        assert_eq!(rec.amount, Amount::from_cents(-150000));
    }

    #[test]
    fn fields_are_trimmed() {
        let rec = LedgerRecord::from_raw(&row(1, " TX004 ", " 2023-10-04", " Rent ", " -200.00 "))
            .unwrap();
        assert_eq!(rec.identifier, "TX004");
        assert_eq!(rec.description, "Rent");
        assert_eq!(rec.amount, Amount::from_cents(-20000));
    }

    #[test]
    fn missing_description_is_empty() {
        let r = RawRow::new(3)
            .with(field::IDENTIFIER, "TX003")
            .with(field::DATE, "2023-10-03")
            .with(field::AMOUNT, "-45.90");
        assert_eq!(BankRecord::from_raw(&r).unwrap().description, "");
    }

    #[test]
    fn us_date_fallback() {
        let rec = BankRecord::from_raw(&row(1, "TX001", "10/01/2023", "", "1")).unwrap();
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2023, 10, 1).unwrap());
    }

    #[test]
    fn ambiguous_date_reads_month_first() {
        let rec = BankRecord::from_raw(&row(1, "TX001", "03/04/2023", "", "1")).unwrap();
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2023, 3, 4).unwrap());
    }

    #[test]
    fn pinned_date_format_overrides_fallbacks() {
        let r = row(1, "TX001", "03/04/2023", "", "1");
        let rec = BankRecord::from_raw_with(&r, Some("%d/%m/%Y")).unwrap();
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2023, 4, 3).unwrap());

        // A pinned format does not fall back to other layouts.
        let iso = row(2, "TX002", "2023-04-03", "", "1");
        let err = LedgerRecord::from_raw_with(&iso, Some("%d/%m/%Y")).unwrap_err();
        assert!(matches!(err, MalformedRecordError::InvalidDate { line: 2, .. }));
    }

    #[test]
    fn pinned_format_applies_to_batch() {
        let rows = vec![
            row(1, "TX001", "31/10/2023", "a", "1.00"),
            row(2, "TX002", "10/31/2023", "b", "2.00"),
        ];
        let out =
            normalize_rows_with::<BankRecord>(&rows, MalformedRowPolicy::Skip, Some("%d/%m/%Y"))
                .unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].date, NaiveDate::from_ymd_opt(2023, 10, 31).unwrap());
        assert_eq!(out.skipped[0].line(), 2);
    }

    #[test]
    fn decimal_comma_amounts_are_malformed() {
        for (line, value) in [(1, "-45,90"), (2, "1,2,3"), (3, "12,34.5")] {
            let r = row(line, "TX1", "2023-10-01", "x", value);
            let err = BankRecord::from_raw(&r).unwrap_err();
            assert_eq!(
                err,
                MalformedRecordError::InvalidAmount {
                    side: Side::Bank,
                    line,
                    value: value.to_string(),
                }
            );
        }
        let ok = BankRecord::from_raw(&row(4, "TX1", "2023-10-01", "x", "1,234.50")).unwrap();
        assert_eq!(ok.amount, Amount::from_cents(123450));
    }

    #[test]
    fn oversized_amount_is_malformed() {
        let r = row(6, "TX1", "2023-10-01", "x", "79228162514264337593543950335");
        assert!(matches!(
            LedgerRecord::from_raw(&r),
            Err(MalformedRecordError::InvalidAmount { line: 6, .. })
        ));
    }

    #[test]
    fn empty_identifier_is_malformed() {
        let err = BankRecord::from_raw(&row(7, "  ", "2023-10-01", "x", "1.00")).unwrap_err();
        assert_eq!(
            err,
            MalformedRecordError::MissingIdentifier {
                side: Side::Bank,
                line: 7
            }
        );
    }

    #[test]
    fn unparsable_amount_is_malformed() {
        let err = LedgerRecord::from_raw(&row(2, "TX1", "2023-10-01", "x", "ten")).unwrap_err();
        assert!(matches!(
            err,
            MalformedRecordError::InvalidAmount { side: Side::Ledger, line: 2, ref value } if value == "ten"
        ));
    }

    #[test]
    fn missing_amount_is_malformed() {
        let r = RawRow::new(4)
            .with(field::IDENTIFIER, "TX1")
            .with(field::DATE, "2023-10-01");
        assert!(matches!(
            BankRecord::from_raw(&r),
            Err(MalformedRecordError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn unparsable_date_is_malformed() {
        let err = BankRecord::from_raw(&row(5, "TX1", "someday", "x", "1")).unwrap_err();
        assert!(matches!(err, MalformedRecordError::InvalidDate { line: 5, .. }));
        assert_eq!(err.side(), Side::Bank);
        assert_eq!(err.line(), 5);
    }

    #[test]
    fn abort_policy_fails_batch() {
        let rows = vec![
            row(1, "TX001", "2023-10-01", "a", "1.00"),
            row(2, "", "2023-10-02", "b", "2.00"),
            row(3, "TX003", "2023-10-03", "c", "oops"),
        ];
        let err = normalize_bank_rows(&rows, MalformedRowPolicy::Abort).unwrap_err();
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn skip_policy_reports_every_bad_row() {
        let rows = vec![
            row(1, "TX001", "2023-10-01", "a", "1.00"),
            row(2, "", "2023-10-02", "b", "2.00"),
            row(3, "TX003", "2023-10-03", "c", "oops"),
        ];
        let out = normalize_ledger_rows(&rows, MalformedRowPolicy::Skip).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].identifier, "TX001");
        assert_eq!(out.skipped.len(), 2);
        assert_eq!(out.skipped[0].line(), 2);
        assert_eq!(out.skipped[1].line(), 3);
    }

    #[test]
    fn policy_from_str() {
        assert_eq!("skip".parse::<MalformedRowPolicy>(), Ok(MalformedRowPolicy::Skip));
        assert_eq!("ABORT".parse::<MalformedRowPolicy>(), Ok(MalformedRowPolicy::Abort));
        assert!("ignore".parse::<MalformedRowPolicy>().is_err());
    }
}
