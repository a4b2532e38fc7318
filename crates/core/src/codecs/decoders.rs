//! Decode functions for the formats we can unpack.
//!
//! Every function follows [`DecodeFn`](super::DecodeFn): it decodes one
//! stream from the start of `input`, appends to `output`, and leaves
//! whatever it already produced in `output` when it fails.

use std::io::Read;

use super::{Codec, DecoderFault};

/// Magic word that opens (and may re-open) an LZ4 legacy frame.
const LZ4_LEGACY_MAGIC: u32 = 0x184C_2102;

/// Every block of a legacy frame decompresses to at most 8 MiB.
const LZ4_LEGACY_BLOCK_SIZE: usize = 8 << 20;

/// Largest compressed size an 8 MiB block can have (LZ4_compressBound).
const LZ4_LEGACY_MAX_COMPRESSED: usize =
    LZ4_LEGACY_BLOCK_SIZE + LZ4_LEGACY_BLOCK_SIZE / 255 + 16;

/// Single gzip member; anything after the member trailer is ignored.
pub fn decode_gzip(input: &[u8], output: &mut Vec<u8>) -> Result<(), DecoderFault> {
    let mut decoder = flate2::read::GzDecoder::new(input);
    decoder.read_to_end(output)?;
    Ok(())
}

/// Single bzip2 stream.
pub fn decode_bzip2(input: &[u8], output: &mut Vec<u8>) -> Result<(), DecoderFault> {
    let mut decoder = bzip2::read::BzDecoder::new(input);
    decoder.read_to_end(output)?;
    Ok(())
}

/// Cap on liblzma memory use. Kernel streams use dictionaries of a few MiB;
/// a bogus header asking for more is refused instead of allocated.
const LZMA_MEMLIMIT: u64 = 512 << 20;

/// Output grown per liblzma call.
const LZMA_CHUNK: usize = 64 << 10;

/// Legacy `.lzma` (LZMA-alone) stream, as produced by `lzma -9` for kernels.
///
/// Stops at the end-of-stream marker (or the size in the header); the
/// uncompressed length the kernel build appends is left unread.
pub fn decode_lzma(input: &[u8], output: &mut Vec<u8>) -> Result<(), DecoderFault> {
    let stream = xz2::stream::Stream::new_lzma_decoder(LZMA_MEMLIMIT)
        .map_err(|e| DecoderFault::Format(format!("lzma: {e}")))?;
    drive_liblzma("lzma", stream, input, output)
}

/// Single `.xz` stream. Concatenated streams and padding after it are ignored.
pub fn decode_xz(input: &[u8], output: &mut Vec<u8>) -> Result<(), DecoderFault> {
    let stream = xz2::stream::Stream::new_stream_decoder(LZMA_MEMLIMIT, 0)
        .map_err(|e| DecoderFault::Format(format!("xz: {e}")))?;
    drive_liblzma("xz", stream, input, output)
}

/// Feed `input` through a liblzma decoder until it reports stream end.
///
/// Output is appended as it is produced, so a corrupt or truncated stream
/// leaves everything decoded before the fault in `output`.
fn drive_liblzma(
    label: &str,
    mut stream: xz2::stream::Stream,
    input: &[u8],
    output: &mut Vec<u8>,
) -> Result<(), DecoderFault> {
    loop {
        let consumed = stream.total_in() as usize;
        let produced = stream.total_out();
        output.reserve(LZMA_CHUNK);

        let status = stream
            .process_vec(&input[consumed..], output, xz2::stream::Action::Run)
            .map_err(|e| DecoderFault::Format(format!("{label}: {e}")))?;
        if matches!(status, xz2::stream::Status::StreamEnd) {
            return Ok(());
        }

        if stream.total_in() as usize == consumed && stream.total_out() == produced {
            return Err(DecoderFault::Format(format!(
                "{label}: stream truncated after {} input bytes",
                consumed
            )));
        }
    }
}

/// Single Zstandard frame.
pub fn decode_zstd(input: &[u8], output: &mut Vec<u8>) -> Result<(), DecoderFault> {
    let mut decoder = zstd::stream::read::Decoder::with_buffer(input)?.single_frame();
    decoder.read_to_end(output)?;
    Ok(())
}

/// LZ4 legacy frame (`lz4 -l`), the layout the kernel build uses.
///
/// Layout: magic, then `[u32 LE compressed size][block]` repeated. The
/// frame has no end marker; the walk stops at the end of input or at a size
/// word that cannot start a block (the kernel appends the uncompressed
/// length there). A repeated magic word starts a new frame.
pub fn decode_lz4_legacy(input: &[u8], output: &mut Vec<u8>) -> Result<(), DecoderFault> {
    let mut rest = input
        .strip_prefix(Codec::Lz4.magic())
        .ok_or_else(|| DecoderFault::Format("lz4: missing legacy frame magic".into()))?;

    while rest.len() >= 4 {
        let word = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]);
        if word == LZ4_LEGACY_MAGIC {
            rest = &rest[4..];
            continue;
        }

        let size = word as usize;
        if size == 0 || size > LZ4_LEGACY_MAX_COMPRESSED || size > rest.len() - 4 {
            break;
        }

        let block = &rest[4..4 + size];
        let start = output.len();
        output.resize(start + LZ4_LEGACY_BLOCK_SIZE, 0);
        match lz4_flex::block::decompress_into(block, &mut output[start..]) {
            Ok(written) => output.truncate(start + written),
            Err(e) => {
                output.truncate(start);
                return Err(DecoderFault::Format(format!("lz4: {e}")));
            }
        }
        rest = &rest[4 + size..];
    }

    Ok(())
}
