//! Carve orchestration: scan, validate, extract, best-effort decompile.
//!
//! The pipeline composes the byte-level primitives into the full
//! locate-and-extract routine. Unlike the low-level extractor, which trusts
//! its caller's size, the pipeline re-validates the header-derived
//! `total_size` against the image before extracting.

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decompile::{DecompileOutcome, Dtc};
use crate::extract::{self, ExtractError, ExtractedBlob};
use crate::fdt::FdtError;
use crate::image::Image;

/// Error type for carve runs.
#[derive(Debug, Error)]
pub enum CarveError {
    /// No aligned FDT magic in the scanned region.
    ///
    /// An ordinary negative result, surfaced as an error only at this level
    /// so callers can branch on absence explicitly (try another region,
    /// report to the user).
    #[error("no FDT magic found in {image} within [{start:#x}, {end:#x})")]
    NotFound { image: PathBuf, start: usize, end: usize },

    #[error("failed to load image {path}: {source}")]
    Image { path: PathBuf, source: io::Error },

    /// The header's `total_size` cannot drive a safe extraction.
    #[error("header total_size {total_size} at offset {offset:#x} is unusable: {reason}")]
    BadTotalSize { offset: usize, total_size: u64, reason: String },

    #[error(transparent)]
    Fdt(#[from] FdtError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Everything needed to run one carve.
#[derive(Debug, Clone)]
pub struct CarveRequest {
    /// Firmware image to scan.
    pub image_path: PathBuf,
    /// Scan window start offset.
    pub start: usize,
    /// Scan window length; `None` means "to the end of the image".
    pub length: Option<usize>,
    /// Destination for the extracted blob.
    pub blob_dest: PathBuf,
    /// Destination for the decompiled source.
    pub dts_dest: PathBuf,
    /// Explicit `dtc` path, if configured.
    pub dtc_path: Option<PathBuf>,
}

/// How the decompile step of a carve ended.
///
/// Failure here never fails the carve: downstream consumers may accept raw
/// blobs, so extraction correctness stands on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecompileStatus {
    Strict,
    Forced,
    Failed { reason: String },
}

/// Result of a successful carve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarveOutcome {
    pub image: PathBuf,
    pub image_sha256: String,
    pub found_offset: usize,
    pub total_size: usize,
    pub blob: ExtractedBlob,
    /// Present when decompilation produced output (strict or forced).
    pub dts_path: Option<PathBuf>,
    pub decompile: DecompileStatus,
}

/// Run one carve: locate the magic, validate the header size, extract and
/// verify the blob, then attempt decompilation.
pub fn run_carve(request: &CarveRequest) -> Result<CarveOutcome, CarveError> {
    let image = Image::load(&request.image_path)
        .map_err(|source| CarveError::Image { path: request.image_path.clone(), source })?;

    let region = match request.length {
        Some(length) => image.region(request.start, length)?,
        None => image.region_to_end(request.start)?,
    };

    let found_offset = image.find_magic(region).ok_or_else(|| CarveError::NotFound {
        image: request.image_path.clone(),
        start: region.start,
        end: region.end(),
    })?;

    let total_size = image.header_total_size(found_offset)?;
    if total_size == 0 {
        return Err(CarveError::BadTotalSize {
            offset: found_offset,
            total_size: total_size.into(),
            reason: "zero-length blob".to_string(),
        });
    }
    let size = total_size as usize;
    if found_offset.checked_add(size).map_or(true, |end| end > image.len()) {
        return Err(CarveError::BadTotalSize {
            offset: found_offset,
            total_size: total_size.into(),
            reason: format!("blob would extend past the {}-byte image", image.len()),
        });
    }

    let blob = extract::extract_blob(&image, found_offset, size, &request.blob_dest)?;

    let dtc = Dtc::resolve(request.dtc_path.as_deref());
    let (dts_path, decompile) = match dtc.decompile(&blob.path, &request.dts_dest) {
        Ok(DecompileOutcome::Strict) => (Some(request.dts_dest.clone()), DecompileStatus::Strict),
        Ok(DecompileOutcome::Forced) => (Some(request.dts_dest.clone()), DecompileStatus::Forced),
        Err(err) => (None, DecompileStatus::Failed { reason: err.to_string() }),
    };

    Ok(CarveOutcome {
        image: image.path().to_path_buf(),
        image_sha256: extract::sha256_hex(image.bytes()),
        found_offset,
        total_size: size,
        blob,
        dts_path,
        decompile,
    })
}
