use std::path::Path;

use anyhow::{bail, Result};
use carve_core::decompile::{DecompileOutcome, Dtc};

/// Decompile an existing blob, with the forced fallback.
pub fn decompile_command(blob: &str, out: &str, dtc: Option<String>) -> Result<()> {
    let blob_path = Path::new(blob);
    if !blob_path.is_file() {
        bail!("Blob file does not exist: {}", blob_path.display());
    }

    let dtc = Dtc::resolve(dtc.as_deref().map(Path::new));
    match dtc.decompile(blob_path, Path::new(out))? {
        DecompileOutcome::Strict => println!("Decompiled (strict mode): {out}"),
        DecompileOutcome::Forced => println!("Decompiled (forced mode): {out}"),
    }

    Ok(())
}
