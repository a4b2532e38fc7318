//! Codec registry: the compression formats we know how to recognize and,
//! for most of them, decode.
//!
//! A codec is always *recognized* (its magic bytes are scanned for and
//! reported). Whether it is also *decodable* is carried by
//! [`DecodeCapability`], so "we know this format but cannot unpack it" is a
//! checked state rather than a missing function.

pub mod decoders;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure raised by a decode function.
///
/// Bytes written to the output buffer before the fault are kept by the
/// caller; see `services::decode`.
#[derive(Debug, Error)]
pub enum DecoderFault {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Format(String),
}

/// Uniform decode contract: read a compressed stream from the start of
/// `input`, append the decompressed bytes to `output`.
///
/// Decoders stop at their own end-of-stream marker; trailing bytes in
/// `input` are not an error.
pub type DecodeFn = fn(input: &[u8], output: &mut Vec<u8>) -> Result<(), DecoderFault>;

/// Whether a codec can actually be decoded.
#[derive(Debug, Clone, Copy)]
pub enum DecodeCapability {
    Present(DecodeFn),
    Absent,
}

impl DecodeCapability {
    pub fn is_present(&self) -> bool {
        matches!(self, DecodeCapability::Present(_))
    }
}

/// Compression formats known to the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Codec {
    Gzip,
    Bzip2,
    Lzma,
    Lzop,
    Lz4,
    Xz,
    Zstd,
}

impl Codec {
    /// Every codec, in registry order.
    pub const ALL: [Codec; 7] =
        [Codec::Gzip, Codec::Bzip2, Codec::Lzma, Codec::Lzop, Codec::Lz4, Codec::Xz, Codec::Zstd];

    /// Stable upper-case identifier used in reports and output names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Codec::Gzip => "GZIP",
            Codec::Bzip2 => "BZIP2",
            Codec::Lzma => "LZMA",
            Codec::Lzop => "LZOP",
            Codec::Lz4 => "LZ4",
            Codec::Xz => "XZ",
            Codec::Zstd => "ZSTD",
        }
    }

    /// Magic bytes at the start of a stream of this format.
    ///
    /// LZMA has no real magic; `5D 00 00` is the usual properties byte
    /// (lc=3, lp=0, pb=2) followed by the two low bytes of the dictionary
    /// size, which are zero for every power-of-two dictionary of 64 KiB or
    /// more.
    pub fn magic(&self) -> &'static [u8] {
        match self {
            Codec::Gzip => b"\x1f\x8b\x08",
            Codec::Bzip2 => b"BZh",
            Codec::Lzma => b"\x5d\x00\x00",
            Codec::Lzop => b"\x89LZ",
            Codec::Lz4 => b"\x02\x21\x4c\x18",
            Codec::Xz => b"\xfd7zXZ\x00",
            Codec::Zstd => b"\x28\xb5\x2f\xfd",
        }
    }

    /// Conventional file suffix for the compressed format.
    pub fn suffix(&self) -> &'static str {
        match self {
            Codec::Gzip => "gz",
            Codec::Bzip2 => "bz2",
            Codec::Lzma => "lzma",
            Codec::Lzop => "lzo",
            Codec::Lz4 => "lz4",
            Codec::Xz => "xz",
            Codec::Zstd => "zst",
        }
    }

    /// Parse an identifier, case-insensitively. `BZIP` is accepted for bzip2.
    pub fn from_identifier(name: &str) -> Option<Codec> {
        let upper = name.trim().to_ascii_uppercase();
        match upper.as_str() {
            "BZIP" => Some(Codec::Bzip2),
            other => Codec::ALL.into_iter().find(|c| c.as_str() == other),
        }
    }

    /// Decode capability shipped with this crate.
    pub fn builtin_capability(&self) -> DecodeCapability {
        match self {
            Codec::Gzip => DecodeCapability::Present(decoders::decode_gzip),
            Codec::Bzip2 => DecodeCapability::Present(decoders::decode_bzip2),
            Codec::Lzma => DecodeCapability::Present(decoders::decode_lzma),
            Codec::Lzop => DecodeCapability::Absent,
            Codec::Lz4 => DecodeCapability::Present(decoders::decode_lz4_legacy),
            Codec::Xz => DecodeCapability::Present(decoders::decode_xz),
            Codec::Zstd => DecodeCapability::Present(decoders::decode_zstd),
        }
    }
}

impl std::fmt::Display for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry entry: one codec with its signature and decode capability.
#[derive(Debug, Clone, Copy)]
pub struct CodecDescriptor {
    pub codec: Codec,
    pub magic: &'static [u8],
    pub suffix: &'static str,
    pub capability: DecodeCapability,
}

impl CodecDescriptor {
    /// Descriptor using the built-in decoder (if any).
    pub fn new(codec: Codec) -> Self {
        Self {
            codec,
            magic: codec.magic(),
            suffix: codec.suffix(),
            capability: codec.builtin_capability(),
        }
    }

    /// Descriptor that is scanned for but never decoded.
    pub fn recognized_only(codec: Codec) -> Self {
        Self { capability: DecodeCapability::Absent, ..Self::new(codec) }
    }

    /// Builder-style helper to swap in a different decode function.
    pub fn with_decoder(mut self, decode: DecodeFn) -> Self {
        self.capability = DecodeCapability::Present(decode);
        self
    }

    pub fn identifier(&self) -> &'static str {
        self.codec.as_str()
    }

    pub fn is_decodable(&self) -> bool {
        self.capability.is_present()
    }
}

/// Ordered set of codec descriptors; one entry per codec.
///
/// Built once at startup and then only read, so it can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct CodecRegistry {
    descriptors: Vec<CodecDescriptor>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self { descriptors: Vec::new() }
    }

    /// Add a descriptor, replacing any existing entry for the same codec.
    pub fn register(&mut self, descriptor: CodecDescriptor) -> &mut Self {
        match self.descriptors.iter_mut().find(|d| d.codec == descriptor.codec) {
            Some(existing) => *existing = descriptor,
            None => self.descriptors.push(descriptor),
        }
        self
    }

    pub fn get(&self, codec: Codec) -> Option<&CodecDescriptor> {
        self.descriptors.iter().find(|d| d.codec == codec)
    }

    /// Look up by identifier (case-insensitive).
    pub fn get_by_identifier(&self, identifier: &str) -> Option<&CodecDescriptor> {
        Codec::from_identifier(identifier).and_then(|codec| self.get(codec))
    }

    pub fn descriptors(&self) -> &[CodecDescriptor] {
        &self.descriptors
    }

    /// Identifiers in registry order, for error messages and listings.
    pub fn identifiers(&self) -> Vec<&'static str> {
        self.descriptors.iter().map(|d| d.identifier()).collect()
    }

    /// Keep only the listed codecs. Order of the registry is preserved.
    pub fn retain(&mut self, allowed: &[Codec]) {
        self.descriptors.retain(|d| allowed.contains(&d.codec));
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Registry with every known codec and its built-in decoder.
pub fn default_codec_registry() -> CodecRegistry {
    let mut registry = CodecRegistry::new();
    for codec in Codec::ALL {
        registry.register(CodecDescriptor::new(codec));
    }
    registry
}
