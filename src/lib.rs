//! `#![no_std]` codec between WAV files and normalized floating point samples.
//!
//! Supports 8, 16, 24 and 32 bit PCM plus 32 bit IEEE float in both directions,
//! and 64 bit IEEE float for reading only. Samples are normalized by the
//! largest positive value of their bit depth; float samples pass through as is.
//!
//! ```rust
//! use wavnorm::{EncodeOptions, SampleFormat, Wav};
//!
//! let samples = vec![0.0, 0.5, -0.5, 1.0];
//! let wav = Wav::from_samples(samples, SampleFormat::Pcm16, 48_000, 2).unwrap();
//!
//! let options = EncodeOptions::default().with_fact().with_peak(1_600_000_000);
//! let bytes = wav.to_bytes_with(&options).unwrap();
//!
//! let decoded = Wav::from_bytes(&bytes).unwrap();
//!
//! println!(
//!     "sample rate: {}, channels: {}, bit depth: {}",
//!     decoded.fmt.sample_rate,
//!     decoded.fmt.num_channels,
//!     decoded.fmt.bit_depth()
//! );
//!
//! assert_eq!(decoded.fmt, wav.fmt);
//! assert_eq!(decoded.num_frames(), 2);
//! ```

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

mod chunk;
mod data;
mod error;
mod fact;
mod fmt;
mod peak;
mod wav;

pub use chunk::{parse_riff, serialize_riff, Chunk, ChunkTag};
pub use data::{decode_samples, encode_samples};
pub use error::{Error, Result};
pub use fact::Fact;
pub use fmt::{Fmt, SampleFormat, FORMAT_IEEE_FLOAT, FORMAT_PCM};
pub use peak::{Peak, PeakPosition, PEAK_VERSION};
pub use wav::{EncodeOptions, ExtendedMetadata, Wav};
