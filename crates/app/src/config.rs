use serde::Deserialize;
use std::path::{Path, PathBuf};
use tally_core::MalformedRowPolicy;
use tally_import::SourceProfile;
use tally_report::ReportFormat;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "tally.toml";
pub const DEFAULT_REPORT_FILE: &str = "reconciliation_audit.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InputPaths {
    pub bank: PathBuf,
    pub ledger: PathBuf,
}

impl Default for InputPaths {
    fn default() -> Self {
        Self {
            bank: PathBuf::from(tally_import::demo::DEMO_BANK_FILE),
            ledger: PathBuf::from(tally_import::demo::DEMO_LEDGER_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub report: PathBuf,
    /// Inferred from the report extension when unset.
    pub format: Option<ReportFormat>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            report: PathBuf::from(DEFAULT_REPORT_FILE),
            format: None,
        }
    }
}

impl OutputSettings {
    pub fn resolved_format(&self) -> ReportFormat {
        self.format
            .unwrap_or_else(|| ReportFormat::from_path(&self.report))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    pub malformed_rows: MalformedRowPolicy,
}

/// Everything a run needs; every section may be omitted from `tally.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub inputs: InputPaths,
    pub output: OutputSettings,
    pub policy: PolicySettings,
    pub bank: SourceProfile,
    pub ledger: SourceProfile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: InputPaths::default(),
            output: OutputSettings::default(),
            policy: PolicySettings::default(),
            bank: SourceProfile::bank(),
            ledger: SourceProfile::ledger(),
        }
    }
}

impl Config {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml_content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Explicit path if given, else `tally.toml` in `dir` if present, else defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!("Using configuration {}", candidate.display());
            return Self::from_file(&candidate);
        }
        Ok(Self::default())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (label, profile) in [("bank", &self.bank), ("ledger", &self.ledger)] {
            if profile.delimiter.len() != 1 || !profile.delimiter.is_ascii() {
                return Err(ConfigError::Invalid(format!(
                    "{label} delimiter must be a single ASCII character, got {:?}",
                    profile.delimiter
                )));
            }
            if profile.date_format.as_deref().is_some_and(|f| f.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "{label} date_format must not be empty"
                )));
            }
            let c = &profile.columns;
            if c.identifier.trim().is_empty() || c.amount.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "{label} identifier and amount columns must be named"
                )));
            }
        }
        Ok(())
    }
}
