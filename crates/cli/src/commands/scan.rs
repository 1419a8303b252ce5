use anyhow::{bail, Context, Result};
use carve_core::catalog::OffsetCatalog;
use carve_core::fdt;
use carve_core::image::Image;
use carve_core::workspace::WorkspaceLayout;

use crate::{canonicalize_or_current, parse_cli_offset, resolve_against_root};

/// Scan an image region for aligned FDT magic matches.
pub fn scan_command(
    root: &str,
    image: &str,
    start: Option<String>,
    length: Option<String>,
    all: bool,
    record: Option<String>,
    json: bool,
) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = WorkspaceLayout::new(&root_path);

    let image_path = resolve_against_root(&root_path, image);
    let image = Image::load(&image_path)
        .with_context(|| format!("Failed to load image {}", image_path.display()))?;

    let start = start.as_deref().map(parse_cli_offset).transpose()?.unwrap_or(0) as usize;
    let region = match length.as_deref().map(parse_cli_offset).transpose()? {
        Some(length) => image.region(start, length as usize)?,
        None => image.region_to_end(start)?,
    };

    // Enumerate matches by repeated first-match scans; each found offset
    // stays 4-byte aligned relative to the region start.
    let mut matches: Vec<(usize, u32)> = Vec::new();
    let mut cursor = region.start;
    while let Some(found) = fdt::find_magic(image.bytes(), cursor, region.end() - cursor) {
        let total_size = image.header_total_size(found).with_context(|| {
            format!("Cannot read total_size for the magic at {found:#x}")
        })?;
        matches.push((found, total_size));
        if !all {
            break;
        }
        cursor = found + fdt::MAGIC_ALIGN;
    }

    if matches.is_empty() {
        bail!(
            "No FDT magic found in {} within [{:#x}, {:#x})",
            image_path.display(),
            region.start,
            region.end()
        );
    }

    if let Some(name) = record {
        let mut catalog = OffsetCatalog::load_or_default(&layout.catalog_path)?;
        catalog.set(&name, matches[0].0 as u64);
        catalog.save(&layout.catalog_path)?;
        println!("Recorded {name}={:#x} in {}", matches[0].0, layout.catalog_path.display());
    }

    if json {
        let entries: Vec<serde_json::Value> = matches
            .iter()
            .map(|(offset, total_size)| {
                serde_json::json!({ "offset": offset, "total_size": total_size })
            })
            .collect();
        let doc = serde_json::json!({
            "image": image_path.display().to_string(),
            "matches": entries,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        for (offset, total_size) in &matches {
            println!("Found FDT magic at {offset:#x} (total_size {total_size} bytes)");
        }
    }

    Ok(())
}
