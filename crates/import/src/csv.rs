use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tally_core::{field, RawRow};
use thiserror::Error;

/// Header names in a source file for each canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub identifier: String,
    pub date: String,
    pub description: String,
    pub amount: String,
}

impl ColumnMapping {
    fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            (field::IDENTIFIER, self.identifier.as_str()),
            (field::DATE, self.date.as_str()),
            (field::DESCRIPTION, self.description.as_str()),
            (field::AMOUNT, self.amount.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// chrono format for the date column, e.g. `%d/%m/%Y`. When unset the
    /// normalizer tries ISO first, then month-first and day-first layouts.
    #[serde(default)]
    pub date_format: Option<String>,
    pub columns: ColumnMapping,
}

fn default_delimiter() -> String {
    ",".to_string()
}

impl SourceProfile {
    /// Bank statement export: `transaction_id,date,description,amount`.
    pub fn bank() -> Self {
        Self {
            name: "bank statement".to_string(),
            delimiter: default_delimiter(),
            date_format: None,
            columns: ColumnMapping {
                identifier: "transaction_id".to_string(),
                date: "date".to_string(),
                description: "description".to_string(),
                amount: "amount".to_string(),
            },
        }
    }

    /// Accounting ledger export: `reference_id,posted_date,memo,posted_amount`.
    pub fn ledger() -> Self {
        Self {
            name: "accounting ledger".to_string(),
            delimiter: default_delimiter(),
            date_format: None,
            columns: ColumnMapping {
                identifier: "reference_id".to_string(),
                date: "posted_date".to_string(),
                description: "memo".to_string(),
                amount: "posted_amount".to_string(),
            },
        }
    }

    pub(crate) fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Missing required column '{column}' in {source_name}")]
    MissingColumn { source_name: String, column: String },
}

/// Reads CSV rows into [`RawRow`]s keyed by canonical field name.
///
/// Identifier and amount headers must be present; date and description
/// columns are optional here and left for the normalizer to judge.
pub fn read_rows<R: Read>(data: R, profile: &SourceProfile) -> Result<Vec<RawRow>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(profile.delimiter_byte())
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    let mut columns = Vec::with_capacity(4);
    for (field_name, header) in profile.columns.pairs() {
        match position(header) {
            Some(idx) => columns.push((field_name, idx)),
            None if field_name == field::IDENTIFIER || field_name == field::AMOUNT => {
                return Err(ImportError::MissingColumn {
                    source_name: profile.name.clone(),
                    column: header.to_string(),
                });
            }
            None => {}
        }
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;

        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let mut row = RawRow::new(rows.len() + 1);
        for &(field_name, idx) in &columns {
            if let Some(value) = record.get(idx) {
                row.insert(field_name, value);
            }
        }
        rows.push(row);
    }

    Ok(rows)
}

pub fn load_rows(path: &Path, profile: &SourceProfile) -> Result<Vec<RawRow>, ImportError> {
    let file = File::open(path)?;
    let rows = read_rows(file, profile)?;
    tracing::info!(
        "Loaded {} rows from {} ({})",
        rows.len(),
        profile.name,
        path.display()
    );
    Ok(rows)
}
