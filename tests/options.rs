#![cfg(feature = "serde")]

use wavnorm::{EncodeOptions, SampleFormat};

#[test]
fn options_load_from_json() {
    let options: EncodeOptions =
        serde_json::from_str(r#"{ "include_peak": true, "peak_timestamp": 1700000000 }"#).unwrap();

    assert_eq!(options, EncodeOptions::default().with_peak(1_700_000_000));
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let options: EncodeOptions = serde_json::from_str("{}").unwrap();

    assert_eq!(options, EncodeOptions::default());
}

#[test]
fn sample_formats_serialize_by_name() {
    assert_eq!(serde_json::to_string(&SampleFormat::Pcm24).unwrap(), r#""Pcm24""#);
    assert_eq!(
        serde_json::from_str::<SampleFormat>(r#""Float32""#).unwrap(),
        SampleFormat::Float32
    );
}
