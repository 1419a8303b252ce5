//! carve-core
//!
//! Core library for locating, extracting, and decompiling Flattened Device
//! Tree (FDT) blobs embedded in firmware images.
//!
//! This crate defines the byte-level FDT readers, the bounded extractor with
//! post-write verification, the external `dtc` adapter with its
//! strict-then-forced fallback, the offset catalog, and the carve pipeline
//! that ties them together.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends (CLI, scripting, etc.).

pub mod catalog;
pub mod decompile;
pub mod extract;
pub mod fdt;
pub mod image;
pub mod pipeline;
pub mod report;
pub mod workspace;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
