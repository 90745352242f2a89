use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// SHA-256 of a file, streamed through the hasher.
pub fn sha256_file(path: &Path) -> io::Result<[u8; 32]> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hasher.finalize().into())
}

/// Encode a raw 32-byte hash as a lowercase hex string (64 chars).
pub fn to_hex(hash: &[u8; 32]) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

/// An input file as it was when the audit ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFingerprint {
    pub name: String,
    pub path: PathBuf,
    pub sha256: String,
    pub rows: usize,
}

impl SourceFingerprint {
    pub fn of_file(name: &str, path: &Path, rows: usize) -> io::Result<Self> {
        Ok(Self {
            name: name.to_string(),
            path: path.to_path_buf(),
            sha256: to_hex(&sha256_file(path)?),
            rows,
        })
    }

    /// First 12 hex chars, enough to tell runs apart on screen.
    pub fn short_digest(&self) -> &str {
        &self.sha256[..self.sha256.len().min(12)]
    }
}
