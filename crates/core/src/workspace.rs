//! Workspace layout and configuration.
//!
//! A carve workspace is a directory holding the firmware under study and the
//! artifacts produced from it: extracted blobs, decompiled sources, reports,
//! and the offset catalog.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Logical layout of a carve workspace on disk.
///
/// This is derived from a chosen root path. It does *not* perform any IO
/// itself; the CLI or other frontends are responsible for actually creating
/// directories and files based on this layout.
#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
    /// Root directory of the workspace.
    pub root: PathBuf,
    /// Directory for internal metadata (.fdtcarve).
    pub meta_dir: PathBuf,
    /// Path to the workspace config file (JSON).
    pub config_path: PathBuf,
    /// Directory for extracted device-tree blobs.
    pub blobs_dir: PathBuf,
    /// Directory for decompiled device-tree sources.
    pub dts_dir: PathBuf,
    /// Directory for markdown extraction reports.
    pub reports_dir: PathBuf,
    /// Path to the offset catalog (`NAME=value` lines).
    pub catalog_path: PathBuf,
}

impl WorkspaceLayout {
    /// Compute the default layout for a workspace rooted at `root`.
    ///
    /// This does *not* touch the filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(".fdtcarve");
        let config_path = meta_dir.join("config.json");
        let blobs_dir = root.join("blobs");
        let dts_dir = root.join("dts");
        let reports_dir = root.join("reports");
        let catalog_path = root.join("offsets.env");

        Self { root, meta_dir, config_path, blobs_dir, dts_dir, reports_dir, catalog_path }
    }

    /// Destination path for a named blob: `blobs/<name>.dtb`.
    pub fn blob_path(&self, name: &str) -> PathBuf {
        self.blobs_dir.join(format!("{name}.dtb"))
    }

    /// Destination path for a named decompiled source: `dts/<name>.dts`.
    pub fn dts_path(&self, name: &str) -> PathBuf {
        self.dts_dir.join(format!("{name}.dts"))
    }

    /// Destination path for a named report: `reports/<name>.md`.
    pub fn report_path(&self, name: &str) -> PathBuf {
        self.reports_dir.join(format!("{name}.md"))
    }
}

/// Serializable configuration describing a carve workspace.
///
/// Lives at `.fdtcarve/config.json` in the workspace root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Human-friendly workspace name.
    pub name: String,
    /// Optional description / notes.
    pub description: Option<String>,
    /// Config format version.
    pub config_version: String,
    /// Optional path to the `dtc` decompiler, used when the CLI is not given
    /// one explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtc_path: Option<String>,
}

impl WorkspaceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            config_version: "0.1.0".to_string(),
            dtc_path: None,
        }
    }
}

/// Load the workspace config JSON from disk.
pub fn load_config(layout: &WorkspaceLayout) -> Result<WorkspaceConfig> {
    let json = fs::read_to_string(&layout.config_path).with_context(|| {
        format!("Failed to read workspace config at {}", layout.config_path.display())
    })?;
    serde_json::from_str(&json).context("Failed to parse workspace config JSON")
}

/// Serialize and write the workspace config, creating the meta dir if needed.
pub fn save_config(layout: &WorkspaceLayout, config: &WorkspaceConfig) -> Result<()> {
    fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create meta dir: {}", layout.meta_dir.display()))?;
    let json = serde_json::to_string_pretty(config)?;
    fs::write(&layout.config_path, json).with_context(|| {
        format!("Failed to write workspace config: {}", layout.config_path.display())
    })
}
