//! Bounded blob extraction with post-write integrity verification.
//!
//! The extractor copies a caller-supplied byte range to a standalone file and
//! then re-reads the first 4 bytes of the destination from disk, confirming
//! the FDT magic is present at offset 0. A legitimate device-tree blob always
//! begins with its own magic by construction, so a mismatch indicates a
//! mis-located offset rather than data corruption and is reported as such.
//!
//! The supplied `size` is trusted as-is (typically the header-derived
//! `total_size`); the bound against the source is checked before any write so
//! a failed extraction never leaves a falsely-verified destination behind.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use thiserror::Error;

use crate::fdt::FDT_MAGIC;
use crate::image::Image;

/// Error type for extraction operations.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The requested range extends past the end of the source image.
    ///
    /// Reported before the destination is touched.
    #[error("truncated source: blob at offset {offset} with size {size} exceeds image size {image_size}")]
    Truncated { offset: usize, size: usize, image_size: usize },

    /// The destination was written but does not begin with the FDT magic.
    ///
    /// Distinct from [`ExtractError::Truncated`]: this indicates a logic or
    /// offset error in the caller's located position, not short data. The
    /// file is left in place for inspection but must be treated as
    /// unreliable.
    #[error("integrity mismatch: {path} does not begin with the FDT magic after extraction")]
    IntegrityMismatch { path: PathBuf },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to re-read {path} for verification: {source}")]
    Verify { path: PathBuf, source: io::Error },
}

/// A successfully extracted and verified blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedBlob {
    /// Destination file holding the blob.
    pub path: PathBuf,
    /// Offset of the blob within its source image.
    pub offset: usize,
    /// Length of the blob in bytes.
    pub size: usize,
    /// SHA-256 of the blob contents, for bookkeeping and reports.
    pub sha256: String,
}

/// Copy exactly `size` bytes from `image` starting at `offset` into `dest`,
/// overwriting any prior content, then verify the magic at offset 0 of the
/// written file.
pub fn extract_blob(
    image: &Image,
    offset: usize,
    size: usize,
    dest: &Path,
) -> Result<ExtractedBlob, ExtractError> {
    let end = offset.checked_add(size).filter(|&end| end <= image.len()).ok_or(
        ExtractError::Truncated { offset, size, image_size: image.len() },
    )?;
    let bytes = &image.bytes()[offset..end];

    fs::write(dest, bytes)
        .map_err(|source| ExtractError::Write { path: dest.to_path_buf(), source })?;

    // Verify against the file on disk, not the in-memory slice; this is the
    // guard against off-by-offset errors in the located position.
    let mut first = [0u8; 4];
    let mut file = fs::File::open(dest)
        .map_err(|source| ExtractError::Verify { path: dest.to_path_buf(), source })?;
    file.read_exact(&mut first)
        .map_err(|source| ExtractError::Verify { path: dest.to_path_buf(), source })?;
    if u32::from_be_bytes(first) != FDT_MAGIC {
        return Err(ExtractError::IntegrityMismatch { path: dest.to_path_buf() });
    }

    Ok(ExtractedBlob {
        path: dest.to_path_buf(),
        offset,
        size,
        sha256: sha256_hex(bytes),
    })
}

/// Compute the SHA-256 of a byte slice as a lowercase hex string.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
