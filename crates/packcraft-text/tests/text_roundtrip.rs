use chrono::NaiveDate;
use packcraft::{Codec, Field, FieldKind, ReadError, Record, Schema, Value};
use packcraft_text::{TextCodec, TextError};

fn chocolate_box() -> Codec {
    Codec::new(
        Schema::compile(&[
            Field::new("count", FieldKind::integer(50)),
            Field::new("wrapped", FieldKind::boolean()),
            Field::new("color", FieldKind::hex(6).unwrap()),
            Field::new(
                "kind",
                FieldKind::choice(["bitter", "milky", "white"]).unwrap(),
            ),
            Field::new(
                "shapes",
                FieldKind::multi_choice(["bear", "car", "beer bottle", "heart"]).unwrap(),
            ),
            Field::new("made_on", FieldKind::date(2000, 2016).unwrap()),
        ])
        .unwrap(),
    )
}

fn record() -> Record {
    Record::from([
        ("count".to_string(), Value::Int(25)),
        ("wrapped".to_string(), Value::Bool(true)),
        ("color".to_string(), Value::hex("ff0000")),
        ("kind".to_string(), Value::choice("bitter")),
        ("shapes".to_string(), Value::choices(["bear", "heart"])),
        (
            "made_on".to_string(),
            Value::Date(NaiveDate::from_ymd_opt(2015, 9, 16).unwrap()),
        ),
    ])
}

#[test]
fn test_base64_roundtrip() {
    let codec = chocolate_box();
    let text = codec.encode_base64(&record()).unwrap();

    // 7 bytes -> 10 characters once padding is dropped
    assert_eq!(text.len(), 10);
    assert!(!text.ends_with('='));
    assert_eq!(codec.decode_base64(&text).unwrap(), record());

    let padded = format!("{text}==");
    assert_eq!(codec.decode_base64(&padded).unwrap(), record());
}

#[test]
fn test_base58_roundtrip() {
    let codec = chocolate_box();
    let text = codec.encode_base58(&record()).unwrap();
    assert_eq!(codec.decode_base58(&text).unwrap(), record());
}

#[test]
fn test_schema_and_codec_agree() {
    let codec = chocolate_box();
    let schema: &Schema = codec.schema();
    assert_eq!(
        schema.encode_base58(&record()).unwrap(),
        codec.encode_base58(&record()).unwrap()
    );
}

#[test]
fn test_wrong_length_surfaces_read_error() {
    let codec = chocolate_box();
    let err = codec.decode_base58("1").unwrap_err();
    assert!(matches!(
        err,
        TextError::Read(ReadError::LengthMismatch {
            expected: 7,
            actual: 1
        })
    ));
}
