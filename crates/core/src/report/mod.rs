//! Markdown extraction reports.
//!
//! One report summarizes the carves performed against a single firmware
//! image: where each blob was found, how big it was, whether verification
//! passed (a failed carve never reaches the report), and which decompile
//! tier produced the source rendering.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::pipeline::{CarveOutcome, DecompileStatus};
use crate::workspace::WorkspaceLayout;

/// Render a markdown report for a set of carve outcomes against one image.
pub fn render_report(
    image: &Path,
    image_sha256: &str,
    outcomes: &[CarveOutcome],
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Device-tree extraction report");
    let _ = writeln!(out);
    let _ = writeln!(out, "- Image: `{}`", image.display());
    let _ = writeln!(out, "- SHA-256: `{image_sha256}`");
    let _ = writeln!(out, "- Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(out, "- Blobs extracted: {}", outcomes.len());

    for outcome in outcomes {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Blob at {:#x}", outcome.found_offset);
        let _ = writeln!(out);
        let _ = writeln!(out, "- Offset: {:#x} ({})", outcome.found_offset, outcome.found_offset);
        let _ = writeln!(out, "- Total size: {} bytes", outcome.total_size);
        let _ = writeln!(out, "- Blob file: `{}`", outcome.blob.path.display());
        let _ = writeln!(out, "- Blob SHA-256: `{}`", outcome.blob.sha256);
        let _ = writeln!(out, "- Magic verification: passed");
        match &outcome.decompile {
            DecompileStatus::Strict => {
                let _ = writeln!(out, "- Decompiled (strict): `{}`", dts_display(outcome));
            }
            DecompileStatus::Forced => {
                let _ = writeln!(out, "- Decompiled (forced): `{}`", dts_display(outcome));
            }
            DecompileStatus::Failed { reason } => {
                let _ = writeln!(out, "- Decompilation failed; raw blob preserved ({reason})");
            }
        }
    }

    out
}

fn dts_display(outcome: &CarveOutcome) -> String {
    outcome
        .dts_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<missing>".to_string())
}

/// Write a rendered report under the workspace reports dir, creating it if
/// needed. Returns the written path.
pub fn write_report(layout: &WorkspaceLayout, name: &str, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(&layout.reports_dir).with_context(|| {
        format!("Failed to create reports dir: {}", layout.reports_dir.display())
    })?;
    let path = layout.report_path(name);
    fs::write(&path, contents)
        .with_context(|| format!("Failed to write report at {}", path.display()))?;
    Ok(path)
}
