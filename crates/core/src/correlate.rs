use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::record::{BankRecord, LedgerRecord, Record, Side};

/// Where a single identifier ended up after the outer join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationOutcome<'a> {
    MatchedPair {
        bank: &'a BankRecord,
        ledger: &'a LedgerRecord,
    },
    BankOnly(&'a BankRecord),
    LedgerOnly(&'a LedgerRecord),
}

impl<'a> CorrelationOutcome<'a> {
    pub fn identifier(&self) -> &'a str {
        match *self {
            CorrelationOutcome::MatchedPair { bank, .. } | CorrelationOutcome::BankOnly(bank) => {
                &bank.identifier
            }
            CorrelationOutcome::LedgerOnly(ledger) => &ledger.identifier,
        }
    }

    pub fn bank(&self) -> Option<&'a BankRecord> {
        match *self {
            CorrelationOutcome::MatchedPair { bank, .. } | CorrelationOutcome::BankOnly(bank) => {
                Some(bank)
            }
            CorrelationOutcome::LedgerOnly(_) => None,
        }
    }

    pub fn ledger(&self) -> Option<&'a LedgerRecord> {
        match *self {
            CorrelationOutcome::MatchedPair { ledger, .. }
            | CorrelationOutcome::LedgerOnly(ledger) => Some(ledger),
            CorrelationOutcome::BankOnly(_) => None,
        }
    }
}

/// Two records in the same feed share an identifier, so the join is ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{count} {side} records share identifier {identifier:?}; the feed cannot be reconciled")]
pub struct DuplicateIdentifierError {
    pub side: Side,
    pub identifier: String,
    pub count: usize,
}

/// Builds identifier → record. On duplicates, reports the smallest duplicated
/// identifier so the error does not depend on row order.
fn index_by_identifier<T: Record>(
    records: &[T],
) -> Result<HashMap<&str, &T>, DuplicateIdentifierError> {
    let mut index = HashMap::with_capacity(records.len());
    let mut duplicates: BTreeMap<&str, usize> = BTreeMap::new();

    for record in records {
        let id = record.identifier();
        if index.insert(id, record).is_some() {
            *duplicates.entry(id).or_insert(1) += 1;
        }
    }

    match duplicates.into_iter().next() {
        Some((identifier, count)) => Err(DuplicateIdentifierError {
            side: T::SIDE,
            identifier: identifier.to_string(),
            count,
        }),
        None => Ok(index),
    }
}

/// Full outer join of the two feeds on identifier, ordered by identifier.
pub fn correlate<'a>(
    bank: &'a [BankRecord],
    ledger: &'a [LedgerRecord],
) -> Result<Vec<CorrelationOutcome<'a>>, DuplicateIdentifierError> {
    let bank_index = index_by_identifier(bank)?;
    let ledger_index = index_by_identifier(ledger)?;

    let mut identifiers: Vec<&str> = bank_index
        .keys()
        .chain(ledger_index.keys().filter(|id| !bank_index.contains_key(*id)))
        .copied()
        .collect();
    identifiers.sort_unstable();

    let outcomes = identifiers
        .into_iter()
        .filter_map(|id| {
            match (bank_index.get(id).copied(), ledger_index.get(id).copied()) {
                (Some(bank), Some(ledger)) => Some(CorrelationOutcome::MatchedPair { bank, ledger }),
                (Some(bank), None) => Some(CorrelationOutcome::BankOnly(bank)),
                (None, Some(ledger)) => Some(CorrelationOutcome::LedgerOnly(ledger)),
                (None, None) => None,
            }
        })
        .collect();

    Ok(outcomes)
}
