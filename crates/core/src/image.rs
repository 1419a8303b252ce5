//! Firmware byte sources and scan regions.
//!
//! An [`Image`] is an immutable, fully-loaded copy of a firmware file (or of
//! a previously extracted sub-file). Firmware images handled here are small,
//! fixed-size files, so whole-file loading is the model; nothing in this
//! module ever mutates the source.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::fdt::{self, FdtError};

/// An immutable in-memory byte source, tagged with the path it was loaded
/// from for diagnostics.
#[derive(Debug, Clone)]
pub struct Image {
    path: PathBuf,
    data: Vec<u8>,
}

impl Image {
    /// Load the entire file at `path` into memory.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = fs::read(&path)?;
        Ok(Self { path, data })
    }

    /// Wrap an in-memory buffer, labelling it with `path` for diagnostics.
    ///
    /// Mainly useful for tests and for callers that already hold the bytes.
    pub fn from_bytes(path: impl Into<PathBuf>, data: Vec<u8>) -> Self {
        Self { path: path.into(), data }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Build a validated scan region over this image.
    pub fn region(&self, start: usize, length: usize) -> Result<Region, FdtError> {
        Region::new(self.len(), start, length)
    }

    /// Build a validated scan region from `start` to the end of this image.
    pub fn region_to_end(&self, start: usize) -> Result<Region, FdtError> {
        Region::to_end(self.len(), start)
    }

    /// Scan `region` for the first aligned FDT magic. See [`fdt::find_magic`].
    pub fn find_magic(&self, region: Region) -> Option<usize> {
        fdt::find_magic(&self.data, region.start, region.length)
    }

    /// Exact-offset magic check. See [`fdt::has_magic`].
    pub fn has_magic(&self, offset: usize) -> Result<bool, FdtError> {
        fdt::has_magic(&self.data, offset)
    }

    /// Big-endian u32 read. See [`fdt::read_be32`].
    pub fn read_be32(&self, offset: usize) -> Result<u32, FdtError> {
        fdt::read_be32(&self.data, offset)
    }

    /// Read the `total_size` field for the magic at `match_offset`.
    pub fn header_total_size(&self, match_offset: usize) -> Result<u32, FdtError> {
        fdt::header_total_size(&self.data, match_offset)
    }
}

/// A validated `(start, length)` scan window over a byte source.
///
/// Construction enforces `start + length <= source size`, so a `Region`
/// handed to the scanner is always in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub start: usize,
    pub length: usize,
}

impl Region {
    /// Validate `(start, length)` against a source of `source_len` bytes.
    pub fn new(source_len: usize, start: usize, length: usize) -> Result<Self, FdtError> {
        match start.checked_add(length) {
            Some(end) if end <= source_len => Ok(Self { start, length }),
            _ => Err(FdtError::RegionOutOfBounds { start, length, size: source_len }),
        }
    }

    /// Region spanning from `start` to the end of the source.
    pub fn to_end(source_len: usize, start: usize) -> Result<Self, FdtError> {
        if start > source_len {
            return Err(FdtError::RegionOutOfBounds { start, length: 0, size: source_len });
        }
        Ok(Self { start, length: source_len - start })
    }

    /// Exclusive end offset of the region.
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}
