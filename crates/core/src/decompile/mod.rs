//! External `dtc` decompiler adapter with a strict-then-forced fallback.
//!
//! Decompilation converts a raw device-tree blob into its canonical source
//! text form (`dts`). Strict mode is attempted first; FIT-wrapped or
//! otherwise non-standard blobs that a strict decompiler rejects are retried
//! with the force flag, which tolerates structural irregularities. Only when
//! both tiers fail is a failure reported, and the raw blob is preserved
//! regardless: decompilation is a best-effort enrichment step, not a
//! prerequisite for extraction having succeeded.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming the `dtc` executable.
///
/// Checked after any explicitly configured path and before falling back to
/// `dtc` on `PATH`.
pub const DTC_ENV: &str = "FDTCARVE_DTC";

/// Test hook: set to `strict-ok`, `force-ok`, or `fail` to bypass the
/// external tool entirely. Any other value behaves like `fail`. This lets
/// the fallback chain be exercised in CI without `dtc` installed.
pub const DTC_FAKE_ENV: &str = "FDTCARVE_DTC_FAKE";

/// Error type for decompiler invocations.
#[derive(Debug, Error)]
pub enum DecompileError {
    /// The decompiler executable could not be spawned.
    #[error("decompiler not runnable at {path}: {source}")]
    ToolNotFound { path: PathBuf, source: io::Error },

    /// Both the strict and the forced attempt exited non-zero.
    #[error("decompilation failed in strict mode ({strict_stderr}) and forced mode ({forced_stderr})")]
    DecompileFailed { strict_stderr: String, forced_stderr: String },

    /// The version probe ran but produced no usable output.
    #[error("decompiler at {path} produced no version string")]
    VersionUnavailable { path: PathBuf },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Which tier of the fallback chain produced the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecompileOutcome {
    /// Strict mode succeeded on the first attempt.
    Strict,
    /// Strict mode failed; the forced retry succeeded.
    Forced,
}

/// Handle to a resolved `dtc` executable.
#[derive(Debug, Clone)]
pub struct Dtc {
    path: PathBuf,
}

impl Dtc {
    /// Resolve the decompiler path.
    ///
    /// Precedence: an explicitly supplied path, then [`DTC_ENV`], then plain
    /// `dtc` resolved via `PATH`.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(DTC_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("dtc"));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Probe the tool version (first line of `dtc --version`).
    pub fn version(&self) -> Result<String, DecompileError> {
        if env::var_os(DTC_FAKE_ENV).is_some() {
            return Ok("dtc (fake)".to_string());
        }
        let output = Command::new(&self.path)
            .arg("--version")
            .output()
            .map_err(|source| DecompileError::ToolNotFound { path: self.path.clone(), source })?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let first = stdout.lines().next().unwrap_or("").trim();
        if first.is_empty() {
            Err(DecompileError::VersionUnavailable { path: self.path.clone() })
        } else {
            Ok(first.to_string())
        }
    }

    /// Decompile `blob` into `out`, falling back to forced mode when the
    /// strict attempt exits non-zero.
    pub fn decompile(&self, blob: &Path, out: &Path) -> Result<DecompileOutcome, DecompileError> {
        if let Some(mode) = env::var_os(DTC_FAKE_ENV) {
            return fake_outcome(&mode.to_string_lossy(), out);
        }

        let strict = self.run(blob, out, false)?;
        if strict.status.success() {
            return Ok(DecompileOutcome::Strict);
        }
        let strict_stderr = stderr_summary(&strict);

        let forced = self.run(blob, out, true)?;
        if forced.status.success() {
            return Ok(DecompileOutcome::Forced);
        }

        Err(DecompileError::DecompileFailed {
            strict_stderr,
            forced_stderr: stderr_summary(&forced),
        })
    }

    fn run(&self, blob: &Path, out: &Path, force: bool) -> Result<Output, DecompileError> {
        let mut cmd = Command::new(&self.path);
        cmd.args(["-I", "dtb", "-O", "dts", "-o"]).arg(out).arg(blob);
        if force {
            cmd.arg("-f");
        }
        cmd.output()
            .map_err(|source| DecompileError::ToolNotFound { path: self.path.clone(), source })
    }
}

/// Synthetic outcome for [`DTC_FAKE_ENV`], writing a minimal dts so callers
/// see an output file in the success modes.
fn fake_outcome(mode: &str, out: &Path) -> Result<DecompileOutcome, DecompileError> {
    match mode {
        "strict-ok" | "force-ok" => {
            fs::write(out, "/dts-v1/;\n\n/ {\n};\n")
                .map_err(|source| DecompileError::Write { path: out.to_path_buf(), source })?;
            Ok(if mode == "strict-ok" { DecompileOutcome::Strict } else { DecompileOutcome::Forced })
        }
        other => Err(DecompileError::DecompileFailed {
            strict_stderr: format!("fake mode {other:?}"),
            forced_stderr: format!("fake mode {other:?}"),
        }),
    }
}

fn stderr_summary(output: &Output) -> String {
    let text = String::from_utf8_lossy(&output.stderr);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        format!("exit status {}", output.status)
    } else {
        trimmed.to_string()
    }
}
