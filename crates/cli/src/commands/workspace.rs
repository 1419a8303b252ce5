use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use carve_core::catalog::OffsetCatalog;
use carve_core::decompile::Dtc;
use carve_core::workspace::{load_config, save_config, WorkspaceConfig, WorkspaceLayout};

use crate::{canonicalize_or_current, infer_workspace_name};

/// Initialize a carve workspace at `root`.
pub fn init_command(root: &str, name: Option<String>) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = WorkspaceLayout::new(&root_path);

    let workspace_name = match name {
        Some(n) => n,
        None => infer_workspace_name(&root_path),
    };

    fs::create_dir_all(&layout.blobs_dir)
        .with_context(|| format!("Failed to create blobs dir: {}", layout.blobs_dir.display()))?;
    fs::create_dir_all(&layout.dts_dir)
        .with_context(|| format!("Failed to create dts dir: {}", layout.dts_dir.display()))?;
    fs::create_dir_all(&layout.reports_dir).with_context(|| {
        format!("Failed to create reports dir: {}", layout.reports_dir.display())
    })?;

    let config = WorkspaceConfig::new(workspace_name.as_str());
    save_config(&layout, &config)?;

    // Seed an empty catalog so follow-on commands (and tests) can rely on
    // its presence.
    if !layout.catalog_path.exists() {
        OffsetCatalog::new()
            .save(&layout.catalog_path)
            .with_context(|| format!("Failed to seed catalog at {}", layout.catalog_path.display()))?;
    }

    println!("Initialized carve workspace:");
    println!("  Name: {workspace_name}");
    println!("  Root: {}", layout.root.display());
    println!("  Config: {}", layout.config_path.display());
    println!("  Blobs dir: {}", layout.blobs_dir.display());
    println!("  Dts dir: {}", layout.dts_dir.display());
    println!("  Reports dir: {}", layout.reports_dir.display());
    println!("  Catalog: {}", layout.catalog_path.display());

    Ok(())
}

/// Show basic information about an existing workspace.
pub fn info_command(root: &str) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = WorkspaceLayout::new(&root_path);
    let config = load_config(&layout)?;

    println!("Carve Workspace Info");
    println!("====================");
    println!("Name: {}", config.name);
    println!("Root: {}", layout.root.display());
    println!("Config file: {}", layout.config_path.display());
    println!("Config version: {}", config.config_version);
    if let Some(desc) = &config.description {
        println!("Description: {desc}");
    }
    println!();

    println!("Directories:");
    print_dir_status("Meta dir (.fdtcarve)", &layout.meta_dir);
    print_dir_status("Blobs dir", &layout.blobs_dir);
    print_dir_status("Dts dir", &layout.dts_dir);
    print_dir_status("Reports dir", &layout.reports_dir);
    println!(
        "- Catalog: {} ({})",
        if layout.catalog_path.is_file() { "OK" } else { "MISSING" },
        layout.catalog_path.display()
    );
    println!();

    let dtc = Dtc::resolve(config.dtc_path.as_deref().map(Path::new));
    match dtc.version() {
        Ok(version) => println!("Decompiler: {} ({version})", dtc.path().display()),
        Err(_) => println!("Decompiler: {} (unavailable)", dtc.path().display()),
    }

    Ok(())
}

/// Helper to print whether a directory exists.
pub fn print_dir_status(label: &str, path: &Path) {
    let exists = path.is_dir();
    println!("- {label}: {} ({})", if exists { "OK" } else { "MISSING" }, path.display());
}
