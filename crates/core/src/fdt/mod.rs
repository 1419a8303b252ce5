//! Flattened Device Tree header constants and byte-level readers.
//!
//! An FDT blob begins with a fixed big-endian magic number followed by a
//! header of big-endian 32-bit fields; the second field (`total_size`) gives
//! the length of the entire blob including the header. Everything in this
//! module is a pure read-only query over a byte slice: no IO, no state.
//!
//! Valid magic occurrences are only recognized at 4-byte-aligned offsets
//! relative to the scan start, matching the on-disk structure's natural
//! alignment.

use thiserror::Error;

/// The FDT header magic number (`d0 0d fe ed` on disk, big-endian).
pub const FDT_MAGIC: u32 = 0xd00dfeed;

/// On-disk byte representation of [`FDT_MAGIC`].
pub const FDT_MAGIC_BYTES: [u8; 4] = FDT_MAGIC.to_be_bytes();

/// Stride between candidate offsets when scanning for the magic.
pub const MAGIC_ALIGN: usize = 4;

/// Byte offset of the big-endian `total_size` header field, relative to a
/// magic match.
pub const TOTALSIZE_OFFSET: usize = 4;

/// Error type for byte-level FDT reads.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FdtError {
    /// Fewer than 4 bytes were available for a header-field read.
    ///
    /// This is fatal for the caller: a header that cannot be read cannot be
    /// validated, so it signals a corrupt or mis-offset source.
    #[error("truncated read: need 4 bytes at offset {offset}, only {available} available")]
    Truncated { offset: usize, available: usize },

    /// A requested scan region does not fit inside the byte source.
    #[error("region out of bounds: start {start} + length {length} exceeds source size {size}")]
    RegionOutOfBounds { start: usize, length: usize, size: usize },
}

/// Read exactly 4 bytes at `offset` as an unsigned big-endian integer.
///
/// Decodes the canonical vector `d0 0d fe ed` as `3490578413`.
pub fn read_be32(data: &[u8], offset: usize) -> Result<u32, FdtError> {
    let end = offset.checked_add(4).filter(|&end| end <= data.len()).ok_or(FdtError::Truncated {
        offset,
        available: data.len().saturating_sub(offset),
    })?;
    let bytes = &data[offset..end];
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Report whether the 4 bytes at exactly `offset` equal the FDT magic.
///
/// Unlike [`find_magic`] this performs no scanning. It serves both as a
/// pre-check when a caller already believes a magic exists at a known offset
/// and as the post-extraction integrity check.
pub fn has_magic(data: &[u8], offset: usize) -> Result<bool, FdtError> {
    Ok(read_be32(data, offset)? == FDT_MAGIC)
}

/// Find the first FDT magic at a 4-byte-aligned offset within
/// `[start, start + length)`.
///
/// Candidates are examined at [`MAGIC_ALIGN`] strides beginning at `start`,
/// in increasing-offset order; the first match wins. Unaligned occurrences
/// are never reported, and candidate windows extending past the end of the
/// window or the source are not examined. Absence is `None`, not an error.
pub fn find_magic(data: &[u8], start: usize, length: usize) -> Option<usize> {
    let end = start.checked_add(length)?.min(data.len());
    let mut offset = start;
    while offset.checked_add(4).is_some_and(|candidate_end| candidate_end <= end) {
        if data[offset..offset + 4] == FDT_MAGIC_BYTES {
            return Some(offset);
        }
        offset += MAGIC_ALIGN;
    }
    None
}

/// Read the big-endian `total_size` header field belonging to the magic at
/// `match_offset`.
///
/// The field sits at `match_offset + 4`, immediately after the magic, and
/// gives the length in bytes of the whole blob including its header.
pub fn header_total_size(data: &[u8], match_offset: usize) -> Result<u32, FdtError> {
    read_be32(data, match_offset.saturating_add(TOTALSIZE_OFFSET))
}
