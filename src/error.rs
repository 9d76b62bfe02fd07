use crate::chunk::ChunkTag;
use crate::fmt::SampleFormat;

/// Result type alias used throughout the crate
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for decoding and encoding failures
#[derive(thiserror::Error, Debug, PartialEq, Clone)]
pub enum Error {
    /// The RIFF structure itself is broken (bad sizes, truncated headers, wrong root)
    #[error("malformed RIFF container: {0}")]
    MalformedContainer(&'static str),
    /// The root chunk is a RIFF container, but not a `WAVE` one
    #[error("RIFF form type is {0:?}, expected WAVE")]
    InvalidFormat([u8; 4]),
    /// No `fmt ` chunk found
    #[error("no fmt chunk found")]
    MissingFormatChunk,
    /// No `data` chunk found
    #[error("no data chunk found")]
    MissingDataChunk,
    /// Format code is neither PCM (1) nor IEEE float (3)
    #[error("unsupported format code {0:#06x}")]
    UnsupportedFormatCode(u16),
    /// Bit depth not supported for the given format code
    #[error("unsupported bit depth {bits} for format code {format_code}")]
    UnsupportedBitDepth {
        /// Format code from the `fmt ` chunk
        format_code: u16,
        /// Declared bits per sample
        bits: u16,
    },
    /// Data payload length is not a multiple of the sample width
    #[error("data chunk of {len} bytes is not a multiple of the {width} byte sample width")]
    TruncatedData {
        /// Payload length in bytes
        len: usize,
        /// Bytes per sample
        width: usize,
    },
    /// Recognized sample format that cannot be handled in this direction
    #[error("{0:?} is not implemented for this operation")]
    NotImplemented(SampleFormat),
    /// Descriptor fields out of range (zero channels, zero sample rate)
    #[error("invalid format descriptor: {0}")]
    InvalidDescriptor(&'static str),
    /// A known chunk has a payload that can't be interpreted
    #[error("malformed {tag:?} chunk: {reason}")]
    MalformedChunk {
        /// Tag of the offending chunk
        tag: ChunkTag,
        /// What is wrong with it
        reason: &'static str,
    },
    /// `include_peak` was set without a timestamp
    #[error("PEAK chunk requested without a timestamp")]
    MissingPeakTimestamp,
}
