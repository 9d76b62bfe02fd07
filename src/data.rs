use crate::error::{Error, Result};
use crate::fmt::SampleFormat;
use alloc::vec::Vec;

// Normalization denominators, a decoded sample is `raw / scale`.
const PCM8_SCALE: f64 = 255.0;
const PCM16_SCALE: f64 = 32_767.0;
const PCM24_SCALE: f64 = 8_388_607.0;
const PCM32_SCALE: f64 = 2_147_483_647.0;

const PCM24_MIN: i64 = -8_388_608;
const PCM24_MAX: i64 = 8_388_607;

/// Decode the payload of a `data` chunk into normalized samples.
///
/// PCM values are divided by the largest positive value of their width, 8 bit
/// samples are read as plain unsigned values (`raw / 255`). Float samples are
/// passed through unscaled and unclamped.
///
/// ```
/// use wavnorm::{decode_samples, SampleFormat};
///
/// let samples = decode_samples(SampleFormat::Pcm16, &[0xff, 0x7f, 0x01, 0x00]).unwrap();
///
/// assert_eq!(samples, vec![1.0, 1.0 / 32_767.0]);
/// ```
pub fn decode_samples(format: SampleFormat, bytes: &[u8]) -> Result<Vec<f64>> {
    let width = format.bytes_per_sample();

    if bytes.len() % width != 0 {
        return Err(Error::TruncatedData {
            len: bytes.len(),
            width,
        });
    }

    let raw = bytes.chunks_exact(width);

    let samples: Vec<f64> = match format {
        SampleFormat::Pcm8 => raw.map(|b| b[0] as f64 / PCM8_SCALE).collect(),
        SampleFormat::Pcm16 => raw
            .map(|b| i16::from_le_bytes([b[0], b[1]]) as f64 / PCM16_SCALE)
            .collect(),
        SampleFormat::Pcm24 => raw
            .map(|b| {
                let sign = b[2] >> 7;
                let sign_byte = if sign == 1 { 0xff } else { 0x0 };

                i32::from_le_bytes([b[0], b[1], b[2], sign_byte]) as f64 / PCM24_SCALE
            })
            .collect(),
        SampleFormat::Pcm32 => raw
            .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64 / PCM32_SCALE)
            .collect(),
        SampleFormat::Float32 => raw
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64)
            .collect(),
        SampleFormat::Float64 => raw
            .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
            .collect(),
    };

    Ok(samples)
}

/// Encode normalized samples into the payload of a `data` chunk.
///
/// PCM samples are scaled, rounded to the nearest integer (ties away from
/// zero) and clamped to the range of the target width. 32 bit float samples
/// are narrowed and written as is. 64 bit float output is not supported.
///
/// ```
/// use wavnorm::{encode_samples, SampleFormat};
///
/// let bytes = encode_samples(SampleFormat::Pcm16, &[1.5, -1.5]).unwrap();
///
/// assert_eq!(bytes, vec![0xff, 0x7f, 0x00, 0x80]);
/// ```
pub fn encode_samples(format: SampleFormat, samples: &[f64]) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(samples.len() * format.bytes_per_sample());

    match format {
        SampleFormat::Pcm8 => {
            for s in samples {
                bytes.push(quantize(*s, PCM8_SCALE, 0, 255) as u8);
            }
        }
        SampleFormat::Pcm16 => {
            for s in samples {
                let v = quantize(*s, PCM16_SCALE, i16::MIN as i64, i16::MAX as i64) as i16;
                bytes.extend_from_slice(&v.to_le_bytes());
            }
        }
        SampleFormat::Pcm24 => {
            for s in samples {
                let b = (quantize(*s, PCM24_SCALE, PCM24_MIN, PCM24_MAX) as i32).to_le_bytes();
                bytes.extend_from_slice(&[b[0], b[1], b[2]]);
            }
        }
        SampleFormat::Pcm32 => {
            for s in samples {
                let v = quantize(*s, PCM32_SCALE, i32::MIN as i64, i32::MAX as i64) as i32;
                bytes.extend_from_slice(&v.to_le_bytes());
            }
        }
        SampleFormat::Float32 => {
            for s in samples {
                bytes.extend_from_slice(&(*s as f32).to_le_bytes());
            }
        }
        SampleFormat::Float64 => return Err(Error::NotImplemented(SampleFormat::Float64)),
    }

    Ok(bytes)
}

/// Scale and clamp in the float domain, then round half away from zero.
/// The clamp has to happen before the cast so overflowing values saturate
/// instead of wrapping. NaN ends up as 0.
fn quantize(sample: f64, scale: f64, min: i64, max: i64) -> i64 {
    libm::round((sample * scale).clamp(min as f64, max as f64)) as i64
}
