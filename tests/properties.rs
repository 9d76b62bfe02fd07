//! Property based round-trip tests.

use proptest::collection::vec;
use proptest::prelude::*;

use wavnorm::{decode_samples, EncodeOptions, SampleFormat, Wav};

fn pcm_format() -> impl Strategy<Value = SampleFormat> {
    prop_oneof![
        Just(SampleFormat::Pcm8),
        Just(SampleFormat::Pcm16),
        Just(SampleFormat::Pcm24),
        Just(SampleFormat::Pcm32),
    ]
}

fn writable_format() -> impl Strategy<Value = SampleFormat> {
    prop_oneof![pcm_format(), Just(SampleFormat::Float32)]
}

fn scale(format: SampleFormat) -> f64 {
    match format {
        SampleFormat::Pcm8 => 255.0,
        SampleFormat::Pcm16 => 32_767.0,
        SampleFormat::Pcm24 => 8_388_607.0,
        SampleFormat::Pcm32 => 2_147_483_647.0,
        SampleFormat::Float32 | SampleFormat::Float64 => 1.0,
    }
}

proptest! {
    /// Any PCM payload decodes and re-encodes to the exact same bytes.
    #[test]
    fn pcm_payloads_round_trip_bit_for_bit(
        format in pcm_format(),
        channels in 1u16..=4,
        raw in vec(any::<u8>(), 0..512),
    ) {
        let frame = format.bytes_per_sample() * channels as usize;
        let mut raw = raw;
        raw.truncate(raw.len() / frame * frame);

        let samples = decode_samples(format, &raw).unwrap();
        let wav = Wav::from_samples(samples, format, 44_100, channels).unwrap();
        let bytes = wav.to_bytes().unwrap();

        // canonical 44 byte header, then the payload (plus a padding byte if odd)
        prop_assert_eq!(&bytes[44..44 + raw.len()], &raw[..]);
        prop_assert_eq!(Wav::from_bytes(&bytes).unwrap(), wav);
    }

    /// Normalized samples come back within half a quantization step.
    #[test]
    fn normalized_samples_round_trip_within_quantization(
        format in pcm_format(),
        samples in vec(-1.0f64..=1.0, 0..128),
    ) {
        // 8 bit samples are unsigned, negative values clamp to zero
        let samples: Vec<f64> = if format == SampleFormat::Pcm8 {
            samples.iter().map(|s| s.abs()).collect()
        } else {
            samples
        };

        let wav = Wav::from_samples(samples.clone(), format, 48_000, 1).unwrap();
        let decoded = Wav::from_bytes(&wav.to_bytes().unwrap()).unwrap();

        prop_assert_eq!(decoded.fmt, wav.fmt);
        prop_assert_eq!(decoded.samples.len(), samples.len());

        let tolerance = 0.5 / scale(format) + 1e-12;

        for (original, decoded) in samples.iter().zip(&decoded.samples) {
            prop_assert!(
                (original - decoded).abs() <= tolerance,
                "{:?}: {} came back as {}", format, original, decoded
            );
        }
    }

    /// 32 bit float is stored without scaling or clamping.
    #[test]
    fn float_samples_round_trip_exactly(samples in vec(-10.0f32..10.0, 0..128)) {
        let samples: Vec<f64> = samples.into_iter().map(f64::from).collect();

        let wav = Wav::from_samples(samples, SampleFormat::Float32, 96_000, 2).unwrap();
        let decoded = Wav::from_bytes(&wav.to_bytes().unwrap()).unwrap();

        prop_assert_eq!(decoded, wav);
    }

    /// Encoding the same wav twice gives identical bytes.
    #[test]
    fn encoding_is_idempotent(
        format in writable_format(),
        channels in 1u16..=8,
        samples in vec(-1.5f64..=1.5, 0..256),
        timestamp in any::<u32>(),
    ) {
        let wav = Wav::from_samples(samples, format, 22_050, channels).unwrap();
        let options = EncodeOptions::default().with_fact().with_peak(timestamp);

        prop_assert_eq!(
            wav.to_bytes_with(&options).unwrap(),
            wav.to_bytes_with(&options).unwrap()
        );
    }

    /// Garbage input produces an error, never a panic.
    #[test]
    fn decoding_arbitrary_bytes_never_panics(bytes in vec(any::<u8>(), 0..256)) {
        let _ = Wav::from_bytes(&bytes);
    }

    /// Garbage after a valid RIFF header produces an error, never a panic.
    #[test]
    fn decoding_arbitrary_chunks_never_panics(body in vec(any::<u8>(), 0..256)) {
        let mut bytes = b"RIFF".to_vec();
        bytes.extend_from_slice(&(body.len() as u32 + 4).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(&body);

        let _ = Wav::from_bytes(&bytes);
    }
}
