use thiserror::Error;

use crate::codecs::{Codec, CodecDescriptor, DecodeCapability};

/// Why a speculative decode produced nothing usable.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The codec is recognized but has no decoder registered.
    #[error("Currently don't support {codec} extraction")]
    Unsupported { codec: Codec },
    /// The decoder rejected the data before producing any output.
    #[error("{codec} decode failed: {reason}")]
    Failed { codec: Codec, reason: String },
    /// The decoder finished cleanly but produced zero bytes.
    #[error("{codec} decode produced no data")]
    Empty { codec: Codec },
}

/// Bytes produced by a speculative decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeSuccess {
    pub data: Vec<u8>,
    /// Set when the decoder faulted after producing output; the output is
    /// kept and the fault text is recorded here instead of failing.
    pub recovered: Option<String>,
}

/// Decode the stream starting at the beginning of `input` (a view from the
/// matched offset to the end of the blob).
///
/// Compressed streams embedded in firmware are usually followed by
/// unrelated bytes that trip strict decoders, so a fault after some output
/// was produced counts as success with whatever was decoded so far.
pub fn decode(descriptor: &CodecDescriptor, input: &[u8]) -> Result<DecodeSuccess, DecodeError> {
    let codec = descriptor.codec;
    let decode_fn = match descriptor.capability {
        DecodeCapability::Present(f) => f,
        DecodeCapability::Absent => return Err(DecodeError::Unsupported { codec }),
    };

    let mut data = Vec::new();
    match decode_fn(input, &mut data) {
        Ok(()) if data.is_empty() => {
            tracing::debug!("{codec}: stream decoded to 0 bytes");
            Err(DecodeError::Empty { codec })
        }
        Ok(()) => {
            tracing::debug!("{codec}: decoded {} bytes", data.len());
            Ok(DecodeSuccess { data, recovered: None })
        }
        Err(fault) if data.is_empty() => {
            tracing::debug!("{codec}: decoder failed before any output: {fault}");
            Err(DecodeError::Failed { codec, reason: fault.to_string() })
        }
        Err(fault) => {
            tracing::debug!("{codec}: decoder stopped after {} bytes: {fault}", data.len());
            Ok(DecodeSuccess { data, recovered: Some(fault.to_string()) })
        }
    }
}
