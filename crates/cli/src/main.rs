use anyhow::Result;
use clap::{Parser, Subcommand};

use fdtcarve::commands;

/// Firmware device-tree carving CLI.
///
/// This CLI is a thin wrapper around `carve-core` (exposed in code as
/// `carve_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "fdtcarve",
    version,
    about = "Locate, extract, and decompile device-tree blobs in firmware images",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a carve workspace at the given root.
    ///
    /// This will:
    /// - Create a `.fdtcarve` metadata directory with a JSON config.
    /// - Create `blobs/`, `dts/`, and `reports/` directories.
    /// - Create an empty `offsets.env` catalog if none exists.
    Init {
        /// Workspace root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Optional workspace name. If omitted, derived from the root directory.
        #[arg(long)]
        name: Option<String>,
    },

    /// Show workspace config, directory status, and decompiler availability.
    Info {
        /// Workspace root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,
    },

    /// Scan an image region for the FDT magic at 4-byte-aligned offsets.
    Scan {
        /// Workspace root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Firmware image to scan (absolute, or relative to the root).
        #[arg(long)]
        image: String,

        /// Scan window start offset (decimal or 0x hex). Defaults to 0.
        #[arg(long)]
        start: Option<String>,

        /// Scan window length (decimal or 0x hex). Defaults to the rest of
        /// the image.
        #[arg(long)]
        length: Option<String>,

        /// List every aligned match instead of stopping at the first.
        #[arg(long, default_value_t = false)]
        all: bool,

        /// Record the first match into the offset catalog under this name.
        #[arg(long)]
        record: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Extract a bounded blob at a known offset, verifying the written file.
    Extract {
        /// Workspace root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Firmware image to read (absolute, or relative to the root).
        #[arg(long)]
        image: String,

        /// Blob offset (decimal or 0x hex). Mutually exclusive with
        /// `--from-catalog`.
        #[arg(long)]
        offset: Option<String>,

        /// Take the offset from the named catalog entry.
        #[arg(long)]
        from_catalog: Option<String>,

        /// Override the header-derived total size (decimal or 0x hex).
        #[arg(long)]
        size: Option<String>,

        /// Destination file for the blob.
        #[arg(long)]
        out: String,
    },

    /// Decompile an existing blob to device-tree source, with the forced
    /// fallback for FIT-wrapped or non-standard blobs.
    Decompile {
        /// Blob file to decompile.
        #[arg(long)]
        blob: String,

        /// Destination for the decompiled source.
        #[arg(long)]
        out: String,

        /// Path to the dtc executable. Defaults to `FDTCARVE_DTC` or `dtc`
        /// on PATH.
        #[arg(long)]
        dtc: Option<String>,
    },

    /// Run the full pipeline: scan, extract, verify, decompile, report.
    Carve {
        /// Workspace root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Firmware image to carve (absolute, or relative to the root).
        #[arg(long)]
        image: String,

        /// Name for the carved artifacts (blobs/<name>.dtb, dts/<name>.dts).
        #[arg(long)]
        name: String,

        /// Scan window start offset (decimal or 0x hex). Defaults to 0.
        #[arg(long)]
        start: Option<String>,

        /// Scan window length (decimal or 0x hex). Defaults to the rest of
        /// the image.
        #[arg(long)]
        length: Option<String>,

        /// Take the scan start from the named catalog entry instead of
        /// `--start`.
        #[arg(long)]
        from_catalog: Option<String>,

        /// Path to the dtc executable. Defaults to the workspace config,
        /// then `FDTCARVE_DTC`, then `dtc` on PATH.
        #[arg(long)]
        dtc: Option<String>,

        /// Write a markdown report under reports/.
        #[arg(long, default_value_t = false)]
        report: bool,

        /// Emit the carve outcome as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List the offset catalog entries.
    Offsets {
        /// Workspace root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Init { root, name } => commands::init_command(&root, name)?,
        Command::Info { root } => commands::info_command(&root)?,
        Command::Scan { root, image, start, length, all, record, json } => {
            commands::scan_command(&root, &image, start, length, all, record, json)?
        }
        Command::Extract { root, image, offset, from_catalog, size, out } => {
            commands::extract_command(&root, &image, offset, from_catalog, size, &out)?
        }
        Command::Decompile { blob, out, dtc } => commands::decompile_command(&blob, &out, dtc)?,
        Command::Carve { root, image, name, start, length, from_catalog, dtc, report, json } => {
            commands::carve_command(&root, &image, &name, start, length, from_catalog, dtc, report, json)?
        }
        Command::Offsets { root, json } => commands::offsets_command(&root, json)?,
    }

    Ok(())
}
