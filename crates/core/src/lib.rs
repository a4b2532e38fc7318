//! vmlinux-core
//!
//! Core library for finding Linux kernel images hidden inside firmware and
//! bootloader blobs.
//!
//! The pipeline is: scan the blob for the magic bytes of every known
//! compression format, speculatively decompress at each hit, and keep the
//! outputs that look like an uncompressed kernel. All substantive logic
//! lives here so it is fully testable and reusable from multiple frontends;
//! reading files and writing outputs is the CLI's job.

pub mod codecs;
pub mod config;
pub mod scan;
pub mod services;

pub use codecs::{default_codec_registry, Codec, CodecDescriptor, CodecRegistry, DecodeCapability};
pub use services::extraction::{
    extract_all, list_headers, output_name, CandidateOutcome, CandidateResult, ExtractionEvent,
    ExtractionReport, HeaderScan, KernelExtractor,
};
pub use services::validate::looks_like_kernel_image;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
