use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscrepancyStatus {
    /// In the bank statement, missing from the ledger.
    OmittedFromLedger,
    /// In the ledger, with no bank record behind it.
    UnsupportedByBank,
    /// In both, amounts differ by more than the tolerance.
    ValueMismatch,
}

impl DiscrepancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscrepancyStatus::OmittedFromLedger => "OMITTED_FROM_LEDGER",
            DiscrepancyStatus::UnsupportedByBank => "UNSUPPORTED_BY_BANK",
            DiscrepancyStatus::ValueMismatch => "VALUE_MISMATCH",
        }
    }
}

impl fmt::Display for DiscrepancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DiscrepancyStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OMITTED_FROM_LEDGER" => Ok(DiscrepancyStatus::OmittedFromLedger),
            "UNSUPPORTED_BY_BANK" => Ok(DiscrepancyStatus::UnsupportedByBank),
            "VALUE_MISMATCH" => Ok(DiscrepancyStatus::ValueMismatch),
            other => Err(format!("Unknown discrepancy status: '{other}'")),
        }
    }
}

/// One finding of the audit. Built by [`crate::rules::classify`] and never
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscrepancyRecord {
    pub identifier: String,
    pub date: NaiveDate,
    pub description: String,
    pub bank_amount: Option<Amount>,
    pub ledger_amount: Option<Amount>,
    pub status: DiscrepancyStatus,
    pub detail: String,
    pub recommendation: String,
}

impl DiscrepancyRecord {
    /// `bank_amount - ledger_amount` when both sides are present.
    pub fn difference(&self) -> Option<Amount> {
        Some(self.bank_amount? - self.ledger_amount?)
    }
}
