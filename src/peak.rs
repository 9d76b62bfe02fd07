use crate::chunk::{Chunk, ChunkTag};
use crate::error::{Error, Result};
use crate::fmt::Fmt;
use alloc::vec;
use alloc::vec::Vec;

/// Only known version of the `PEAK` chunk layout
pub const PEAK_VERSION: u32 = 1;

/// Peak amplitude of a single channel.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct PeakPosition {
    /// absolute value of the most extreme sample
    pub value: f32,
    /// sample frame (not sample, not byte) at which the peak first occurs
    pub position: u32,
}

/// Struct representing the `PEAK` chunk
///
/// Like [`Fact`](crate::Fact) this is derived from the samples when writing and
/// never kept in a [`Wav`](crate::Wav).
#[derive(Debug, PartialEq, Clone)]
pub struct Peak {
    /// layout version, always [`PEAK_VERSION`] when written by this crate
    pub version: u32,
    /// unix timestamp supplied by the caller, used by readers to detect stale peak data
    pub timestamp: u32,
    /// one entry per channel, in interleaving order
    pub peaks: Vec<PeakPosition>,
}

impl Peak {
    /// Scan interleaved samples for the per channel peak.
    ///
    /// When several frames share the peak magnitude the first one wins. A
    /// trailing partial frame is not scanned.
    ///
    /// ```
    /// use wavnorm::{Fmt, Peak, PeakPosition, SampleFormat};
    ///
    /// let fmt = Fmt::new(SampleFormat::Float32, 2, 48_000).unwrap();
    /// let peak = Peak::from_samples(&fmt, &[0.25, -0.5, -0.75, 0.5], 0).unwrap();
    ///
    /// assert_eq!(
    ///     peak.peaks,
    ///     vec![
    ///         PeakPosition { value: 0.75, position: 1 },
    ///         PeakPosition { value: 0.5, position: 0 },
    ///     ]
    /// );
    /// ```
    pub fn from_samples(fmt: &Fmt, samples: &[f64], timestamp: u32) -> Result<Self> {
        let channels = fmt.num_channels as usize;

        if channels == 0 {
            return Err(Error::InvalidDescriptor("channel count must be at least 1"));
        }

        if samples.len() / channels > u32::MAX as usize {
            return Err(Error::MalformedChunk {
                tag: ChunkTag::Peak,
                reason: "frame count exceeds 32 bits",
            });
        }

        let mut magnitudes = vec![0.0f64; channels];
        let mut positions = vec![0u32; channels];

        for (frame, samples) in samples.chunks_exact(channels).enumerate() {
            for (channel, sample) in samples.iter().enumerate() {
                let magnitude = if *sample < 0.0 { -*sample } else { *sample };

                if magnitude > magnitudes[channel] {
                    magnitudes[channel] = magnitude;
                    positions[channel] = frame as u32;
                }
            }
        }

        let peaks = magnitudes
            .into_iter()
            .zip(positions)
            .map(|(value, position)| PeakPosition {
                value: value as f32,
                position,
            })
            .collect();

        Ok(Peak {
            version: PEAK_VERSION,
            timestamp,
            peaks,
        })
    }

    /// Parse the payload of a `PEAK` chunk.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let malformed = |reason| Error::MalformedChunk {
            tag: ChunkTag::Peak,
            reason,
        };

        if bytes.len() < 8 || (bytes.len() - 8) % 8 != 0 {
            return Err(malformed("payload is not 8 bytes plus 8 per channel"));
        }

        let word = |at: usize| {
            u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };

        let version = word(0);

        if version != PEAK_VERSION {
            return Err(malformed("unknown version"));
        }

        let peaks = bytes[8..]
            .chunks_exact(8)
            .map(|b| PeakPosition {
                value: f32::from_le_bytes([b[0], b[1], b[2], b[3]]),
                position: u32::from_le_bytes([b[4], b[5], b[6], b[7]]),
            })
            .collect();

        Ok(Peak {
            version,
            timestamp: word(4),
            peaks,
        })
    }

    pub(crate) fn to_chunk(&self) -> Chunk {
        let mut bytes = Vec::with_capacity(8 + 8 * self.peaks.len());

        bytes.extend_from_slice(&self.version.to_le_bytes());
        bytes.extend_from_slice(&self.timestamp.to_le_bytes());

        for peak in &self.peaks {
            bytes.extend_from_slice(&peak.value.to_le_bytes());
            bytes.extend_from_slice(&peak.position.to_le_bytes());
        }

        Chunk::leaf(ChunkTag::Peak, bytes)
    }
}
