use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codecs::{default_codec_registry, Codec, CodecDescriptor, CodecRegistry};
use crate::scan::PatternIndex;
use crate::services::decode::{decode, DecodeError};
use crate::services::validate::{looks_like_kernel_image, REJECTION_REASON};

/// Progress and diagnostic record emitted while scanning/extracting.
///
/// `Display` renders the human-readable line; serde renders a tagged JSON
/// object for machine consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExtractionEvent {
    HeaderFound { codec: Codec, offsets: Vec<usize> },
    NotFound { codec: Codec },
    Attempting { codec: Codec, offset: usize },
    PartialRecovered { codec: Codec, offset: usize, bytes: usize, error: String },
    Extracted { codec: Codec, offset: usize, bytes: usize, name: String },
    Unsupported { codec: Codec, offset: usize, reason: String },
    DecodeFailed { codec: Codec, offset: usize, reason: String },
    Rejected { codec: Codec, offset: usize, bytes: usize, reason: String },
}

impl fmt::Display for ExtractionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionEvent::HeaderFound { codec, offsets } => {
                write!(f, "{codec} header found at {offsets:?}")
            }
            ExtractionEvent::NotFound { codec } => write!(f, "No {codec} found"),
            ExtractionEvent::Attempting { codec, offset } => {
                write!(f, "Attempting extraction with {codec} offset:{offset}")
            }
            ExtractionEvent::PartialRecovered { codec, offset, bytes, error } => {
                write!(f, "{codec} offset:{offset} stopped early ({error}), keeping {bytes} bytes")
            }
            ExtractionEvent::Extracted { bytes, .. } => write!(f, "{bytes} bytes extracted"),
            ExtractionEvent::Unsupported { reason, .. }
            | ExtractionEvent::DecodeFailed { reason, .. }
            | ExtractionEvent::Rejected { reason, .. } => f.write_str(reason),
        }
    }
}

/// Terminal state of one (codec, offset) candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOutcome {
    Accepted,
    Rejected,
    DecodeFailed,
    Unsupported,
}

/// Bookkeeping for one (codec, offset) attempt.
///
/// Accepted bytes live in [`ExtractionReport::files`] under `name`; bytes of
/// rejected candidates are dropped and only their length is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub codec: Codec,
    pub offset: usize,
    pub outcome: CandidateOutcome,
    pub decoded_len: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Offsets found for one codec during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderScan {
    pub codec: Codec,
    pub offsets: Vec<usize>,
}

impl HeaderScan {
    pub fn found(&self) -> bool {
        !self.offsets.is_empty()
    }
}

/// Everything a full extraction pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Accepted outputs keyed by [`output_name`].
    pub files: BTreeMap<String, Vec<u8>>,
    pub candidates: Vec<CandidateResult>,
    pub events: Vec<ExtractionEvent>,
}

impl ExtractionReport {
    pub fn accepted(&self) -> impl Iterator<Item = &CandidateResult> {
        self.candidates.iter().filter(|c| c.outcome == CandidateOutcome::Accepted)
    }
}

/// Name under which an accepted candidate is reported and written.
///
/// Unique per run since a codec never matches twice at the same offset.
pub fn output_name(codec: Codec, offset: usize) -> String {
    format!("vmlinux_{}_{}.bin", codec.as_str(), offset)
}

/// Drives scan → speculative decode → validate over one borrowed blob.
///
/// The pattern index is built once in [`KernelExtractor::new`] and reused
/// for every codec in the registry.
pub struct KernelExtractor<'a> {
    index: PatternIndex<'a>,
    registry: &'a CodecRegistry,
    ignore_validation: bool,
}

impl<'a> KernelExtractor<'a> {
    pub fn new(data: &'a [u8], registry: &'a CodecRegistry, ignore_validation: bool) -> Self {
        Self { index: PatternIndex::build(data), registry, ignore_validation }
    }

    pub fn data(&self) -> &'a [u8] {
        self.index.data()
    }

    pub fn ignore_validation(&self) -> bool {
        self.ignore_validation
    }

    /// View of the blob from `offset` to the end (empty past the end).
    pub fn bytes_from(&self, offset: usize) -> &'a [u8] {
        self.data().get(offset..).unwrap_or_default()
    }

    /// All offsets of the descriptor's magic bytes, ascending.
    pub fn search(&self, descriptor: &CodecDescriptor) -> Vec<usize> {
        self.index.find_all(descriptor.magic)
    }

    /// Kernel heuristic with this extractor's `ignore_validation` flag.
    pub fn is_kernel_image(&self, data: &[u8]) -> bool {
        looks_like_kernel_image(data, self.ignore_validation)
    }

    /// Scan-only reconnaissance over every registered codec.
    pub fn list_headers(&self) -> Vec<HeaderScan> {
        self.list_headers_with(|_| {})
    }

    /// Like [`list_headers`](Self::list_headers), streaming a `HeaderFound`
    /// or `NotFound` event per codec.
    pub fn list_headers_with<F>(&self, mut on_event: F) -> Vec<HeaderScan>
    where
        F: FnMut(&ExtractionEvent),
    {
        self.registry
            .descriptors()
            .iter()
            .map(|descriptor| {
                let offsets = self.search(descriptor);
                let codec = descriptor.codec;
                let event = if offsets.is_empty() {
                    ExtractionEvent::NotFound { codec }
                } else {
                    ExtractionEvent::HeaderFound { codec, offsets: offsets.clone() }
                };
                on_event(&event);
                HeaderScan { codec, offsets }
            })
            .collect()
    }

    /// Try every offset of every registered codec and collect the outputs
    /// that pass validation.
    pub fn extract_all(&self) -> ExtractionReport {
        self.extract_all_with(|_| {})
    }

    /// Like [`extract_all`](Self::extract_all), handing each event to
    /// `on_event` as it happens. Events are also collected in the report.
    ///
    /// No single candidate failure stops the run.
    pub fn extract_all_with<F>(&self, mut on_event: F) -> ExtractionReport
    where
        F: FnMut(&ExtractionEvent),
    {
        let mut files = BTreeMap::new();
        let mut candidates = Vec::new();
        let mut events = Vec::new();
        let mut emit = |event: ExtractionEvent| {
            on_event(&event);
            events.push(event);
        };

        for descriptor in self.registry.descriptors() {
            let codec = descriptor.codec;
            let offsets = self.search(descriptor);
            if offsets.is_empty() {
                emit(ExtractionEvent::NotFound { codec });
                continue;
            }
            emit(ExtractionEvent::HeaderFound { codec, offsets: offsets.clone() });

            for offset in offsets {
                emit(ExtractionEvent::Attempting { codec, offset });
                let (candidate, accepted) = self.attempt(descriptor, offset, &mut emit);
                if let (Some(name), Some(data)) = (candidate.name.clone(), accepted) {
                    files.insert(name, data);
                }
                candidates.push(candidate);
            }
        }

        ExtractionReport { files, candidates, events }
    }

    /// One candidate: decode, then validate. Emits exactly one terminal
    /// event and returns the accepted bytes, if any.
    fn attempt(
        &self,
        descriptor: &CodecDescriptor,
        offset: usize,
        emit: &mut impl FnMut(ExtractionEvent),
    ) -> (CandidateResult, Option<Vec<u8>>) {
        let codec = descriptor.codec;
        let mut candidate = CandidateResult {
            codec,
            offset,
            outcome: CandidateOutcome::DecodeFailed,
            decoded_len: 0,
            error: None,
            name: None,
        };

        let decoded = match decode(descriptor, self.bytes_from(offset)) {
            Ok(decoded) => decoded,
            Err(err) => {
                let reason = err.to_string();
                let event = match err {
                    DecodeError::Unsupported { .. } => {
                        candidate.outcome = CandidateOutcome::Unsupported;
                        ExtractionEvent::Unsupported { codec, offset, reason: reason.clone() }
                    }
                    DecodeError::Failed { .. } | DecodeError::Empty { .. } => {
                        ExtractionEvent::DecodeFailed { codec, offset, reason: reason.clone() }
                    }
                };
                emit(event);
                candidate.error = Some(reason);
                return (candidate, None);
            }
        };

        let bytes = decoded.data.len();
        candidate.decoded_len = bytes;
        if let Some(error) = decoded.recovered {
            emit(ExtractionEvent::PartialRecovered { codec, offset, bytes, error });
        }

        if !self.is_kernel_image(&decoded.data) {
            candidate.outcome = CandidateOutcome::Rejected;
            candidate.error = Some(REJECTION_REASON.to_string());
            emit(ExtractionEvent::Rejected {
                codec,
                offset,
                bytes,
                reason: REJECTION_REASON.to_string(),
            });
            return (candidate, None);
        }

        let name = output_name(codec, offset);
        candidate.outcome = CandidateOutcome::Accepted;
        candidate.name = Some(name.clone());
        emit(ExtractionEvent::Extracted { codec, offset, bytes, name });
        (candidate, Some(decoded.data))
    }
}

/// Full extraction with every known codec.
pub fn extract_all(data: &[u8], ignore_validation: bool) -> ExtractionReport {
    let registry = default_codec_registry();
    KernelExtractor::new(data, &registry, ignore_validation).extract_all()
}

/// Scan-only pass with every known codec.
pub fn list_headers(data: &[u8]) -> Vec<HeaderScan> {
    let registry = default_codec_registry();
    KernelExtractor::new(data, &registry, false).list_headers()
}
