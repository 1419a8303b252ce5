//! Offset catalog: persisted `NAME=value` records.
//!
//! The upstream offset-discovery step (binwalk driven) records where
//! interesting structures live in a firmware image as one shell-style
//! assignment per line, e.g.:
//!
//! ```text
//! # offsets discovered 2026-08-12
//! BOOTLOADER_FIT_OFFSET=0x40000
//! KERNEL_FIT_OFFSET=4718592
//! ```
//!
//! Carve runs consume these entries to seed their scan regions, and record
//! newly located offsets back into the same file. Values may be decimal or
//! `0x`-prefixed hex; rendering is deterministic (sorted, hex).

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A non-comment line is not a `NAME=value` assignment.
    #[error("malformed catalog line {line_no}: {line:?}")]
    Malformed { line_no: usize, line: String },

    /// The value of an assignment is not a decimal or `0x` hex integer.
    #[error("invalid offset value for {name} on line {line_no}: {value:?}")]
    BadValue { name: String, line_no: usize, value: String },

    #[error("failed to read catalog {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write catalog {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// In-memory view of an offset catalog file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetCatalog {
    entries: BTreeMap<String, u64>,
}

impl OffsetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse catalog text. Blank lines and `#` comments are ignored.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let mut entries = BTreeMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((name, value)) = line.split_once('=') else {
                return Err(CatalogError::Malformed { line_no, line: line.to_string() });
            };
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(CatalogError::Malformed { line_no, line: line.to_string() });
            }
            let parsed = parse_offset(value).ok_or_else(|| CatalogError::BadValue {
                name: name.to_string(),
                line_no,
                value: value.to_string(),
            })?;
            entries.insert(name.to_string(), parsed);
        }
        Ok(Self { entries })
    }

    /// Load and parse the catalog at `path`.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path)
            .map_err(|source| CatalogError::Read { path: path.to_path_buf(), source })?;
        Self::parse(&text)
    }

    /// Load the catalog at `path`, treating a missing file as empty.
    pub fn load_or_default(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        Self::load(path)
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.entries.get(name).copied()
    }

    /// Insert or replace an entry.
    pub fn set(&mut self, name: impl Into<String>, value: u64) {
        self.entries.insert(name.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the catalog as `NAME=0x...` lines in sorted order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.entries {
            out.push_str(name);
            out.push('=');
            out.push_str(&format!("{value:#x}"));
            out.push('\n');
        }
        out
    }

    /// Write the rendered catalog to `path`, overwriting.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        fs::write(path, self.render())
            .map_err(|source| CatalogError::Write { path: path.to_path_buf(), source })
    }
}

/// Parse a decimal or `0x`/`0X`-prefixed hex offset.
pub fn parse_offset(value: &str) -> Option<u64> {
    if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        value.parse().ok()
    }
}
