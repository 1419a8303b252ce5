use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use carve_core::catalog::OffsetCatalog;
use carve_core::pipeline::{run_carve, CarveRequest, DecompileStatus};
use carve_core::report::{render_report, write_report};
use carve_core::workspace::{load_config, WorkspaceLayout};
use chrono::Utc;

use crate::{canonicalize_or_current, parse_cli_offset, resolve_against_root};

/// Run the full carve pipeline against an image.
pub fn carve_command(
    root: &str,
    image: &str,
    name: &str,
    start: Option<String>,
    length: Option<String>,
    from_catalog: Option<String>,
    dtc: Option<String>,
    report: bool,
    json: bool,
) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = WorkspaceLayout::new(&root_path);
    let config = load_config(&layout)
        .context("No workspace config found; run `fdtcarve init` first")?;

    let image_path = resolve_against_root(&root_path, image);

    let start = match (start, from_catalog) {
        (Some(_), Some(_)) => bail!("--start and --from-catalog are mutually exclusive"),
        (Some(value), None) => parse_cli_offset(&value)? as usize,
        (None, Some(catalog_name)) => {
            let catalog = OffsetCatalog::load(&layout.catalog_path).with_context(|| {
                format!("Failed to load catalog {}", layout.catalog_path.display())
            })?;
            catalog.get(&catalog_name).ok_or_else(|| {
                anyhow!(
                    "No catalog entry named {catalog_name:?} in {}",
                    layout.catalog_path.display()
                )
            })? as usize
        }
        (None, None) => 0,
    };
    let length = length.as_deref().map(parse_cli_offset).transpose()?.map(|v| v as usize);

    fs::create_dir_all(&layout.blobs_dir)
        .with_context(|| format!("Failed to create {}", layout.blobs_dir.display()))?;
    fs::create_dir_all(&layout.dts_dir)
        .with_context(|| format!("Failed to create {}", layout.dts_dir.display()))?;

    let dtc_path = dtc.or(config.dtc_path).map(PathBuf::from);
    let request = CarveRequest {
        image_path: image_path.clone(),
        start,
        length,
        blob_dest: layout.blob_path(name),
        dts_dest: layout.dts_path(name),
        dtc_path,
    };

    let outcome = run_carve(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("Carved {name}:");
        println!("  Image: {}", outcome.image.display());
        println!("  Image SHA-256: {}", outcome.image_sha256);
        println!("  Found offset: {:#x}", outcome.found_offset);
        println!("  Total size: {} bytes", outcome.total_size);
        println!("  Blob: {}", outcome.blob.path.display());
        match &outcome.decompile {
            DecompileStatus::Strict => {
                println!("  Decompiled (strict mode): {}", request.dts_dest.display())
            }
            DecompileStatus::Forced => {
                println!("  Decompiled (forced mode): {}", request.dts_dest.display())
            }
            DecompileStatus::Failed { reason } => {
                println!("  Warning: decompilation failed ({reason}); raw blob preserved")
            }
        }
    }

    if report {
        let contents = render_report(
            &image_path,
            &outcome.image_sha256,
            std::slice::from_ref(&outcome),
            Utc::now(),
        );
        let path = write_report(&layout, name, &contents)?;
        println!("Report: {}", path.display());
    }

    Ok(())
}
