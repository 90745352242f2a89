use serde::Serialize;
use thiserror::Error;

use crate::correlate::{correlate, CorrelationOutcome, DuplicateIdentifierError};
use crate::discrepancy::{DiscrepancyRecord, DiscrepancyStatus};
use crate::normalize::{normalize_rows_with, MalformedRecordError, MalformedRowPolicy, Normalized};
use crate::record::{BankRecord, LedgerRecord, RawRow};
use crate::rules::classify;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Malformed(#[from] MalformedRecordError),
    #[error(transparent)]
    DuplicateIdentifier(#[from] DuplicateIdentifierError),
}

/// Classifies every outcome in order and keeps the discrepancies.
pub fn assemble(outcomes: &[CorrelationOutcome<'_>]) -> Vec<DiscrepancyRecord> {
    outcomes.iter().filter_map(classify).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationSummary {
    pub bank_records: usize,
    pub ledger_records: usize,
    /// Matched pairs whose amounts agree within tolerance.
    pub reconciled: usize,
    pub value_mismatches: usize,
    pub omitted_from_ledger: usize,
    pub unsupported_by_bank: usize,
}

impl ReconciliationSummary {
    fn tally(
        bank_records: usize,
        ledger_records: usize,
        outcomes: &[CorrelationOutcome<'_>],
        discrepancies: &[DiscrepancyRecord],
    ) -> Self {
        let mut summary = ReconciliationSummary {
            bank_records,
            ledger_records,
            ..Default::default()
        };
        let pairs = outcomes
            .iter()
            .filter(|o| matches!(o, CorrelationOutcome::MatchedPair { .. }))
            .count();
        for d in discrepancies {
            match d.status {
                DiscrepancyStatus::OmittedFromLedger => summary.omitted_from_ledger += 1,
                DiscrepancyStatus::UnsupportedByBank => summary.unsupported_by_bank += 1,
                DiscrepancyStatus::ValueMismatch => summary.value_mismatches += 1,
            }
        }
        summary.reconciled = pairs - summary.value_mismatches;
        summary
    }

    pub fn discrepancy_count(&self) -> usize {
        self.value_mismatches + self.omitted_from_ledger + self.unsupported_by_bank
    }
}

/// Result of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Ordered by identifier.
    pub discrepancies: Vec<DiscrepancyRecord>,
    pub summary: ReconciliationSummary,
}

impl Reconciliation {
    pub fn is_fully_reconciled(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

/// Correlates the two feeds and assembles the discrepancy list. Nothing is
/// returned when either feed has duplicate identifiers.
pub fn reconcile(
    bank: &[BankRecord],
    ledger: &[LedgerRecord],
) -> Result<Reconciliation, DuplicateIdentifierError> {
    let outcomes = correlate(bank, ledger)?;
    let discrepancies = assemble(&outcomes);
    let summary =
        ReconciliationSummary::tally(bank.len(), ledger.len(), &outcomes, &discrepancies);
    Ok(Reconciliation {
        discrepancies,
        summary,
    })
}

/// A reconciliation run starting from raw rows, with any rows left out
/// under [`MalformedRowPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowReconciliation {
    pub reconciliation: Reconciliation,
    pub skipped: Vec<MalformedRecordError>,
}

/// How raw rows are turned into records for [`reconcile_rows_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowOptions {
    pub policy: MalformedRowPolicy,
    pub bank_date_format: Option<String>,
    pub ledger_date_format: Option<String>,
}

pub fn reconcile_rows(
    bank_rows: &[RawRow],
    ledger_rows: &[RawRow],
    policy: MalformedRowPolicy,
) -> Result<RowReconciliation, ReconcileError> {
    let options = RowOptions {
        policy,
        ..Default::default()
    };
    reconcile_rows_with(bank_rows, ledger_rows, &options)
}

pub fn reconcile_rows_with(
    bank_rows: &[RawRow],
    ledger_rows: &[RawRow],
    options: &RowOptions,
) -> Result<RowReconciliation, ReconcileError> {
    let bank: Normalized<BankRecord> = normalize_rows_with(
        bank_rows,
        options.policy,
        options.bank_date_format.as_deref(),
    )?;
    let ledger: Normalized<LedgerRecord> = normalize_rows_with(
        ledger_rows,
        options.policy,
        options.ledger_date_format.as_deref(),
    )?;
    let reconciliation = reconcile(&bank.records, &ledger.records)?;

    let mut skipped = bank.skipped;
    skipped.extend(ledger.skipped);

    Ok(RowReconciliation {
        reconciliation,
        skipped,
    })
}
