use crate::chunk::{parse_riff, serialize_riff, Chunk, ChunkTag};
use crate::data::{decode_samples, encode_samples};
use crate::error::{Error, Result};
use crate::fact::Fact;
use crate::fmt::{Fmt, SampleFormat};
use crate::peak::Peak;
use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;
use log::debug;

/// Settings for [`Wav::to_bytes_with`]
///
/// ```
/// use wavnorm::EncodeOptions;
///
/// let options = EncodeOptions::default().with_fact().with_peak(1_600_000_000);
///
/// assert!(options.include_fact);
/// assert!(options.include_peak);
/// assert_eq!(options.peak_timestamp, Some(1_600_000_000));
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EncodeOptions {
    /// write a `fact` chunk between `fmt ` and `data`
    pub include_fact: bool,
    /// write a `PEAK` chunk after `data`, requires `peak_timestamp`
    pub include_peak: bool,
    /// unix timestamp stored in the `PEAK` chunk
    pub peak_timestamp: Option<u32>,
}

impl EncodeOptions {
    /// Enable the `fact` chunk.
    pub fn with_fact(mut self) -> Self {
        self.include_fact = true;
        self
    }

    /// Enable the `PEAK` chunk with the given timestamp.
    pub fn with_peak(mut self, timestamp: u32) -> Self {
        self.include_peak = true;
        self.peak_timestamp = Some(timestamp);
        self
    }
}

/// Struct representing a WAV file
#[derive(Debug, PartialEq, Clone)]
pub struct Wav {
    /// Contains data from the fmt chunk / header part of the file
    pub fmt: Fmt,
    /// Normalized samples, channels interleaved in file order
    pub samples: Vec<f64>,
}

impl Wav {
    /// Create new [`Wav`] instance from a slice of bytes
    ///
    /// ```
    /// use wavnorm::{SampleFormat, Wav};
    ///
    /// let bytes: [u8; 48] = [
    ///     0x52, 0x49, 0x46, 0x46, // RIFF
    ///     0x28, 0x00, 0x00, 0x00, // chunk size
    ///     0x57, 0x41, 0x56, 0x45, // WAVE
    ///     0x66, 0x6d, 0x74, 0x20, // fmt_
    ///     0x10, 0x00, 0x00, 0x00, // chunk size
    ///     0x01, 0x00, // audio format
    ///     0x01, 0x00, // num channels
    ///     0x40, 0x1f, 0x00, 0x00, // sample rate
    ///     0x40, 0x1f, 0x00, 0x00, // byte rate
    ///     0x01, 0x00, // block align
    ///     0x08, 0x00, // bits per sample
    ///     0x64, 0x61, 0x74, 0x61, // data
    ///     0x04, 0x00, 0x00, 0x00, // chunk size
    ///     0x00, 0x7f, 0xff, 0x00, // samples
    /// ];
    ///
    /// let wav = Wav::from_bytes(&bytes).unwrap();
    ///
    /// assert_eq!(wav.fmt.sample_format, SampleFormat::Pcm8);
    /// assert_eq!(wav.fmt.sample_rate, 8_000);
    /// assert_eq!(wav.samples, vec![0.0, 127.0 / 255.0, 1.0, 0.0]);
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let root = parse_riff(bytes)?;
        let chunks = wave_chunks(&root)?;

        // `fmt ` decides how `data` is laid out, so it goes first
        // regardless of the order the chunks appeared in.
        let fmt = chunks
            .get(&ChunkTag::Fmt)
            .ok_or(Error::MissingFormatChunk)
            .and_then(|bytes| Fmt::from_bytes(bytes))?;

        let samples = chunks
            .get(&ChunkTag::Data)
            .ok_or(Error::MissingDataChunk)
            .and_then(|bytes| decode_samples(fmt.sample_format, bytes))?;

        Ok(Wav { fmt, samples })
    }

    /// Create a [`Wav`] struct from normalized samples.
    ///
    /// ```
    /// use wavnorm::{SampleFormat, Wav};
    ///
    /// let samples = vec![0.0, 0.0, 0.0, 0.0];
    /// let wav = Wav::from_samples(samples, SampleFormat::Pcm24, 44_100, 2).unwrap();
    ///
    /// assert_eq!(wav.fmt.num_channels, 2);
    /// assert_eq!(wav.fmt.bit_depth(), 24);
    /// assert_eq!(wav.fmt.sample_rate, 44_100);
    /// assert_eq!(wav.num_frames(), 2);
    /// ```
    pub fn from_samples(
        samples: Vec<f64>,
        sample_format: SampleFormat,
        sample_rate: u32,
        num_channels: u16,
    ) -> Result<Self> {
        let fmt = Fmt::new(sample_format, num_channels, sample_rate)?;

        Ok(Wav { fmt, samples })
    }

    /// Number of sample frames, a trailing partial frame is not counted.
    pub fn num_frames(&self) -> usize {
        self.samples.len() / (self.fmt.num_channels.max(1) as usize)
    }

    /// Play time in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.num_frames() as f64 / self.fmt.sample_rate.max(1) as f64
    }

    /// Give up the wav, keeping the descriptor and the sample buffer.
    pub fn into_parts(self) -> (Fmt, Vec<f64>) {
        (self.fmt, self.samples)
    }

    /// Convert a [`Wav`] instance into bytes, with only the `fmt ` and `data` chunks.
    ///
    /// ```
    /// use wavnorm::{SampleFormat, Wav};
    ///
    /// let samples = vec![1.0 / 32_767.0, 2.0 / 32_767.0, 3.0 / 32_767.0, -1.0 / 32_767.0];
    /// let wav = Wav::from_samples(samples, SampleFormat::Pcm16, 48_000, 2).unwrap();
    ///
    /// let bytes: [u8; 52] = [
    ///     0x52, 0x49, 0x46, 0x46, // RIFF
    ///     0x2c, 0x00, 0x00, 0x00, // chunk size
    ///     0x57, 0x41, 0x56, 0x45, // WAVE
    ///     0x66, 0x6d, 0x74, 0x20, // fmt_
    ///     0x10, 0x00, 0x00, 0x00, // chunk size
    ///     0x01, 0x00, // audio format
    ///     0x02, 0x00, // num channels
    ///     0x80, 0xbb, 0x00, 0x00, // sample rate
    ///     0x00, 0xee, 0x02, 0x00, // byte rate
    ///     0x04, 0x00, // block align
    ///     0x10, 0x00, // bits per sample
    ///     0x64, 0x61, 0x74, 0x61, // data
    ///     0x08, 0x00, 0x00, 0x00, // chunk size
    ///     0x01, 0x00, 0x02, 0x00, // samples
    ///     0x03, 0x00, 0xff, 0xff, // samples
    /// ];
    ///
    /// assert_eq!(wav.to_bytes().unwrap(), bytes);
    /// ```
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes_with(&EncodeOptions::default())
    }

    /// Convert a [`Wav`] instance into bytes.
    ///
    /// Chunks are always written as `fmt `, `fact`, `data`, `PEAK`, with the
    /// optional ones left out entirely unless requested.
    pub fn to_bytes_with(&self, options: &EncodeOptions) -> Result<Vec<u8>> {
        serialize_riff(&self.to_chunk(options)?)
    }

    fn to_chunk(&self, options: &EncodeOptions) -> Result<Chunk> {
        self.fmt.validate()?;

        let peak_timestamp = if options.include_peak {
            Some(options.peak_timestamp.ok_or(Error::MissingPeakTimestamp)?)
        } else {
            None
        };

        let mut children = vec![self.fmt.to_chunk()];

        if options.include_fact {
            children.push(Fact::from_samples(&self.fmt, &self.samples)?.to_chunk());
        }

        let data = encode_samples(self.fmt.sample_format, &self.samples)?;

        // Peaks describe the samples a reader gets back, after clamping and
        // quantization, not the ones held in the model.
        let peak = match peak_timestamp {
            Some(timestamp) => {
                let written = decode_samples(self.fmt.sample_format, &data)?;
                Some(Peak::from_samples(&self.fmt, &written, timestamp)?)
            }
            None => None,
        };

        children.push(Chunk::leaf(ChunkTag::Data, data));
        children.extend(peak.map(|peak| peak.to_chunk()));

        Ok(Chunk::List {
            id: ChunkTag::Riff,
            form: ChunkTag::Wave,
            children,
        })
    }
}

/// The optional chunks a [`Wav`] leaves out.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ExtendedMetadata {
    /// Contents of the `fact` chunk, if any
    pub fact: Option<Fact>,
    /// Contents of the `PEAK` chunk, if any
    pub peak: Option<Peak>,
}

impl ExtendedMetadata {
    /// Read the `fact` and `PEAK` chunks of a WAV file.
    ///
    /// The samples are not decoded, the file only has to be a well formed
    /// `WAVE` container.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let root = parse_riff(bytes)?;
        let chunks = wave_chunks(&root)?;

        let fact = chunks
            .get(&ChunkTag::Fact)
            .map(|bytes| Fact::from_bytes(bytes))
            .transpose()?;

        let peak = chunks
            .get(&ChunkTag::Peak)
            .map(|bytes| Peak::from_bytes(bytes))
            .transpose()?;

        Ok(ExtendedMetadata { fact, peak })
    }
}

/// Collect the chunks of a `WAVE` form into a lookup by tag. Chunks this crate
/// doesn't interpret are skipped, a repeated tag replaces the earlier chunk.
fn wave_chunks(root: &Chunk) -> Result<BTreeMap<ChunkTag, &[u8]>> {
    match root {
        Chunk::List {
            form: ChunkTag::Wave,
            ..
        } => {}
        Chunk::List { form, .. } => return Err(Error::InvalidFormat(form.to_bytes())),
        Chunk::Leaf { .. } => return Err(Error::MalformedContainer("root chunk is not RIFF")),
    }

    let mut chunks = BTreeMap::new();

    for chunk in root.children() {
        match (chunk.id(), chunk.bytes()) {
            (id @ ChunkTag::Fmt, Some(bytes))
            | (id @ ChunkTag::Fact, Some(bytes))
            | (id @ ChunkTag::Data, Some(bytes))
            | (id @ ChunkTag::Peak, Some(bytes)) => {
                if chunks.insert(id, bytes).is_some() {
                    debug!("replacing earlier {:?} chunk", id);
                }
            }
            (id, _) => debug!("skipping {:?} chunk", id),
        }
    }

    Ok(chunks)
}
