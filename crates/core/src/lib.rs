pub mod correlate;
pub mod discrepancy;
pub mod money;
pub mod normalize;
pub mod record;
pub mod report;
pub mod rules;

pub use correlate::{correlate, CorrelationOutcome, DuplicateIdentifierError};
pub use discrepancy::{DiscrepancyRecord, DiscrepancyStatus};
pub use money::{Amount, ParseAmountError};
pub use normalize::{
    normalize_bank_rows, normalize_ledger_rows, normalize_rows, normalize_rows_with,
    MalformedRecordError, MalformedRowPolicy, Normalize, Normalized,
};
pub use record::{field, BankRecord, LedgerRecord, RawRow, Record, Side};
pub use report::{
    assemble, reconcile, reconcile_rows, reconcile_rows_with, ReconcileError, Reconciliation,
    ReconciliationSummary, RowOptions, RowReconciliation,
};
pub use rules::{classify, AMOUNT_TOLERANCE};
