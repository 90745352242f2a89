use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::money::Amount;

/// Which of the two feeds a record or error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Bank,
    Ledger,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bank => write!(f, "bank"),
            Side::Ledger => write!(f, "ledger"),
        }
    }
}

/// Canonical field names an input adapter maps its columns onto.
pub mod field {
    pub const IDENTIFIER: &str = "identifier";
    pub const DATE: &str = "date";
    pub const DESCRIPTION: &str = "description";
    pub const AMOUNT: &str = "amount";
}

/// An untyped input row: canonical field name → raw string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based data row number within its source.
    pub line: usize,
    values: HashMap<String, String>,
}

impl RawRow {
    pub fn new(line: usize) -> Self {
        RawRow {
            line,
            values: HashMap::new(),
        }
    }

    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<String>) {
        self.values.insert(field.to_string(), value.into());
    }

    /// Trimmed value of `field`, or `None` when absent or blank.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values
            .get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankRecord {
    pub identifier: String,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub identifier: String,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Amount,
}

/// Common read-only view over bank and ledger records.
pub trait Record {
    const SIDE: Side;

    fn identifier(&self) -> &str;
    fn date(&self) -> NaiveDate;
    fn description(&self) -> &str;
    fn amount(&self) -> Amount;
}

impl Record for BankRecord {
    const SIDE: Side = Side::Bank;

    fn identifier(&self) -> &str {
        &self.identifier
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn amount(&self) -> Amount {
        self.amount
    }
}

impl Record for LedgerRecord {
    const SIDE: Side = Side::Ledger;

    fn identifier(&self) -> &str {
        &self.identifier
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn amount(&self) -> Amount {
        self.amount
    }
}
