use crate::chunk::{Chunk, ChunkTag};
use crate::error::{Error, Result};
use crate::fmt::Fmt;
use core::convert::TryInto;

/// Struct representing the `fact` chunk: the number of sample frames.
///
/// Never stored in a [`Wav`](crate::Wav), it is recomputed from the samples on
/// every write.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Fact {
    /// sample frames per channel
    pub num_frames: u32,
}

impl Fact {
    /// Count the complete frames in an interleaved sample buffer.
    pub fn from_samples(fmt: &Fmt, samples: &[f64]) -> Result<Self> {
        let num_frames = samples
            .len()
            .checked_div(fmt.num_channels as usize)
            .ok_or(Error::InvalidDescriptor("channel count must be at least 1"))?
            .try_into()
            .map_err(|_| Error::MalformedChunk {
                tag: ChunkTag::Fact,
                reason: "frame count exceeds 32 bits",
            })?;

        Ok(Fact { num_frames })
    }

    /// Parse the payload of a `fact` chunk.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let num_frames = bytes
            .try_into()
            .map(u32::from_le_bytes)
            .map_err(|_| Error::MalformedChunk {
                tag: ChunkTag::Fact,
                reason: "payload is not 4 bytes",
            })?;

        Ok(Fact { num_frames })
    }

    pub(crate) fn to_chunk(&self) -> Chunk {
        Chunk::leaf(ChunkTag::Fact, self.num_frames.to_le_bytes().to_vec())
    }
}
