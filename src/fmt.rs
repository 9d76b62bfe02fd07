use crate::chunk::{Chunk, ChunkTag};
use crate::error::{Error, Result};
use alloc::vec;

/// Format code for linear PCM integer samples
pub const FORMAT_PCM: u16 = 0x0001;
/// Format code for IEEE 754 floating point samples
pub const FORMAT_IEEE_FLOAT: u16 = 0x0003;

/// Every supported combination of format code and bit depth.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleFormat {
    /// 8 bit unsigned PCM
    Pcm8,
    /// 16 bit signed PCM
    Pcm16,
    /// 24 bit signed PCM, packed in 3 bytes
    Pcm24,
    /// 32 bit signed PCM
    Pcm32,
    /// 32 bit IEEE float
    Float32,
    /// 64 bit IEEE float, decode only
    Float64,
}

impl SampleFormat {
    /// Resolve the raw `fmt ` fields into a supported format.
    ///
    /// ```
    /// use wavnorm::{Error, SampleFormat};
    ///
    /// assert_eq!(SampleFormat::from_code_and_bits(1, 24), Ok(SampleFormat::Pcm24));
    /// assert_eq!(SampleFormat::from_code_and_bits(3, 64), Ok(SampleFormat::Float64));
    /// assert_eq!(
    ///     SampleFormat::from_code_and_bits(3, 16),
    ///     Err(Error::UnsupportedBitDepth { format_code: 3, bits: 16 })
    /// );
    /// ```
    pub fn from_code_and_bits(format_code: u16, bits: u16) -> Result<Self> {
        match (format_code, bits) {
            (FORMAT_PCM, 8) => Ok(SampleFormat::Pcm8),
            (FORMAT_PCM, 16) => Ok(SampleFormat::Pcm16),
            (FORMAT_PCM, 24) => Ok(SampleFormat::Pcm24),
            (FORMAT_PCM, 32) => Ok(SampleFormat::Pcm32),
            (FORMAT_IEEE_FLOAT, 32) => Ok(SampleFormat::Float32),
            (FORMAT_IEEE_FLOAT, 64) => Ok(SampleFormat::Float64),
            (FORMAT_PCM, _) | (FORMAT_IEEE_FLOAT, _) => {
                Err(Error::UnsupportedBitDepth { format_code, bits })
            }
            _ => Err(Error::UnsupportedFormatCode(format_code)),
        }
    }

    /// Format code as stored in the `fmt ` chunk.
    pub fn format_code(self) -> u16 {
        match self {
            SampleFormat::Pcm8 | SampleFormat::Pcm16 | SampleFormat::Pcm24 | SampleFormat::Pcm32 => {
                FORMAT_PCM
            }
            SampleFormat::Float32 | SampleFormat::Float64 => FORMAT_IEEE_FLOAT,
        }
    }

    /// Bits per sample as stored in the `fmt ` chunk.
    pub fn bit_depth(self) -> u16 {
        match self {
            SampleFormat::Pcm8 => 8,
            SampleFormat::Pcm16 => 16,
            SampleFormat::Pcm24 => 24,
            SampleFormat::Pcm32 | SampleFormat::Float32 => 32,
            SampleFormat::Float64 => 64,
        }
    }

    /// Width of a single sample in the `data` chunk.
    pub fn bytes_per_sample(self) -> usize {
        (self.bit_depth() / 8) as usize
    }
}

/// Struct representing the `fmt ` section of a WAV file
///
/// for more information see [`here`]
///
/// [`here`]: http://soundfile.sapp.org/doc/WaveFormat/
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Fmt {
    /// sample encoding, determines both the format code and the bit depth
    pub sample_format: SampleFormat,
    /// number of audio channels in the sample data, channels are interleaved
    pub num_channels: u16,
    /// sample rate, typical values are `44_100`, `48_000` or `96_000`
    pub sample_rate: u32,
}

impl Fmt {
    /// Create a validated descriptor.
    pub fn new(sample_format: SampleFormat, num_channels: u16, sample_rate: u32) -> Result<Self> {
        let fmt = Fmt {
            sample_format,
            num_channels,
            sample_rate,
        };

        fmt.validate()?;

        Ok(fmt)
    }

    /// Check the fields a [`SampleFormat`] can't rule out by construction.
    pub fn validate(&self) -> Result<()> {
        if self.num_channels == 0 {
            return Err(Error::InvalidDescriptor("channel count must be at least 1"));
        }

        if self.sample_rate == 0 {
            return Err(Error::InvalidDescriptor("sample rate must be positive"));
        }

        let block_align = self.sample_format.bytes_per_sample() * self.num_channels as usize;

        if block_align > u16::MAX as usize {
            return Err(Error::InvalidDescriptor("block align exceeds 16 bits"));
        }

        if block_align as u64 * self.sample_rate as u64 > u32::MAX as u64 {
            return Err(Error::InvalidDescriptor("byte rate exceeds 32 bits"));
        }

        Ok(())
    }

    /// Bits per sample
    pub fn bit_depth(&self) -> u16 {
        self.sample_format.bit_depth()
    }

    /// Bytes per sample frame (all channels).
    pub fn block_align(&self) -> u16 {
        (self.sample_format.bytes_per_sample() as u16).saturating_mul(self.num_channels)
    }

    /// Bytes per second.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.saturating_mul(self.block_align() as u32)
    }

    /// Parse the payload of a `fmt ` chunk.
    ///
    /// Byte rate and block align are derived from the other fields, whatever
    /// the file claims for them is ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 16 {
            return Err(Error::MalformedChunk {
                tag: ChunkTag::Fmt,
                reason: "shorter than 16 bytes",
            });
        }

        let format_code = u16::from_le_bytes([bytes[0], bytes[1]]);
        let num_channels = u16::from_le_bytes([bytes[2], bytes[3]]);
        let sample_rate = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let bit_depth = u16::from_le_bytes([bytes[14], bytes[15]]);

        let sample_format = SampleFormat::from_code_and_bits(format_code, bit_depth)?;

        Fmt::new(sample_format, num_channels, sample_rate)
    }

    pub(crate) fn to_chunk(&self) -> Chunk {
        let fc = self.sample_format.format_code().to_le_bytes();
        let nc = self.num_channels.to_le_bytes();
        let sr = self.sample_rate.to_le_bytes();
        let br = self.byte_rate().to_le_bytes();
        let ba = self.block_align().to_le_bytes();
        let bd = self.bit_depth().to_le_bytes();

        let bytes = vec![
            fc[0], fc[1], // audio format
            nc[0], nc[1], // num channels
            sr[0], sr[1], sr[2], sr[3], // sample rate
            br[0], br[1], br[2], br[3], // byte rate
            ba[0], ba[1], // block align
            bd[0], bd[1], // bits per sample
        ];

        Chunk::leaf(ChunkTag::Fmt, bytes)
    }
}
