use anyhow::{Context, Result};
use carve_core::catalog::OffsetCatalog;
use carve_core::workspace::WorkspaceLayout;

use crate::canonicalize_or_current;

/// List the offset catalog entries.
pub fn offsets_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = WorkspaceLayout::new(&root_path);

    let catalog = OffsetCatalog::load_or_default(&layout.catalog_path)
        .with_context(|| format!("Failed to load catalog {}", layout.catalog_path.display()))?;

    if json {
        let mut map = serde_json::Map::new();
        for (name, value) in catalog.iter() {
            map.insert(name.to_string(), serde_json::Value::from(value));
        }
        println!("{}", serde_json::to_string_pretty(&serde_json::Value::Object(map))?);
    } else {
        println!("Offsets ({}):", catalog.len());
        if catalog.is_empty() {
            println!("  (none)");
            return Ok(());
        }
        for (name, value) in catalog.iter() {
            println!("  - {name} = {value:#x} ({value})");
        }
    }

    Ok(())
}
