use std::path::{Path, PathBuf};

use crate::csv::{ImportError, SourceProfile};

pub const DEMO_BANK_FILE: &str = "input_bank_statement.csv";
pub const DEMO_LEDGER_FILE: &str = "input_ledger.csv";

// (id, date, description, amount)
const BANK_ROWS: &[(&str, &str, &str, &str)] = &[
    ("TX001", "2023-10-01", "Supplier A payment", "-1500.00"),
    ("TX002", "2023-10-02", "Customer X receipt", "5000.00"),
    ("TX003", "2023-10-03", "Bank fee", "-45.90"),
    ("TX004", "2023-10-04", "Rent payment", "-2000.00"),
    ("TX005", "2023-10-05", "Wire received", "10000.00"),
    ("TX006", "2023-10-06", "Software payment", "-150.00"),
];

// The ledger forgets the bank fee (TX003) and software payment (TX006),
// books rent as -200.00 and carries an entry the bank never saw (TX999).
const LEDGER_ROWS: &[(&str, &str, &str, &str)] = &[
    ("TX001", "2023-10-01", "Supplier A payment", "-1500.00"),
    ("TX002", "2023-10-02", "Customer X receipt", "5000.00"),
    ("TX004", "2023-10-04", "Rent payment", "-200.00"),
    ("TX005", "2023-10-05", "Wire received", "10000.00"),
    ("TX999", "2023-10-06", "Phantom payment", "-500.00"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoInputs {
    pub bank: PathBuf,
    pub ledger: PathBuf,
}

fn write_source(
    path: &Path,
    profile: &SourceProfile,
    rows: &[(&str, &str, &str, &str)],
) -> Result<(), ImportError> {
    let mut writer = ::csv::WriterBuilder::new()
        .delimiter(profile.delimiter_byte())
        .from_path(path)?;
    let c = &profile.columns;
    writer.write_record([&c.identifier, &c.date, &c.description, &c.amount])?;
    for (id, date, description, amount) in rows {
        writer.write_record([id, date, description, amount])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes a sample bank statement and ledger into `dir`, laid out per the
/// given profiles, so a full run can be tried without real exports.
pub fn write_demo_inputs(
    dir: &Path,
    bank_profile: &SourceProfile,
    ledger_profile: &SourceProfile,
) -> Result<DemoInputs, ImportError> {
    std::fs::create_dir_all(dir)?;
    let inputs = DemoInputs {
        bank: dir.join(DEMO_BANK_FILE),
        ledger: dir.join(DEMO_LEDGER_FILE),
    };

    write_source(&inputs.bank, bank_profile, BANK_ROWS)?;
    write_source(&inputs.ledger, ledger_profile, LEDGER_ROWS)?;

    tracing::info!(
        "Demo inputs written: {} and {}",
        inputs.bank.display(),
        inputs.ledger.display()
    );
    Ok(inputs)
}
