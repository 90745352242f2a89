use crate::correlate::CorrelationOutcome;
use crate::discrepancy::{DiscrepancyRecord, DiscrepancyStatus};
use crate::money::Amount;

/// Largest absolute difference between matched amounts that still counts as agreement.
pub const AMOUNT_TOLERANCE: Amount = Amount::CENT;

/// Turns one correlation outcome into a discrepancy, or `None` when the pair
/// agrees within [`AMOUNT_TOLERANCE`].
pub fn classify(outcome: &CorrelationOutcome<'_>) -> Option<DiscrepancyRecord> {
    let (status, detail, recommendation) = match *outcome {
        CorrelationOutcome::BankOnly(bank) => (
            DiscrepancyStatus::OmittedFromLedger,
            format!(
                "Transaction {} ({}) was not recorded in the ledger.",
                bank.identifier, bank.description
            ),
            "Record the transaction in the ledger.",
        ),
        CorrelationOutcome::LedgerOnly(ledger) => (
            DiscrepancyStatus::UnsupportedByBank,
            format!(
                "Ledger entry {} ({}) has no corresponding bank record.",
                ledger.identifier, ledger.description
            ),
            "Verify supporting documentation or reverse the entry.",
        ),
        CorrelationOutcome::MatchedPair { bank, ledger } => {
            let diff = bank.amount - ledger.amount;
            if diff.abs() <= AMOUNT_TOLERANCE {
                return None;
            }
            (
                DiscrepancyStatus::ValueMismatch,
                format!(
                    "Difference of {:.2}. Bank: {} | Ledger: {}.",
                    diff.round_dp(2),
                    bank.amount,
                    ledger.amount
                ),
                "Correct the recorded value.",
            )
        }
    };

    // Bank side wins for date and description; the ledger fills in only when
    // there is no bank record.
    let (date, description) = match *outcome {
        CorrelationOutcome::MatchedPair { bank, .. } | CorrelationOutcome::BankOnly(bank) => {
            (bank.date, bank.description.clone())
        }
        CorrelationOutcome::LedgerOnly(ledger) => (ledger.date, ledger.description.clone()),
    };

    Some(DiscrepancyRecord {
        identifier: outcome.identifier().to_string(),
        date,
        description,
        bank_amount: outcome.bank().map(|b| b.amount),
        ledger_amount: outcome.ledger().map(|l| l.amount),
        status,
        detail,
        recommendation: recommendation.to_string(),
    })
}
