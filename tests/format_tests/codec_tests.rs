//! Codec Tests
//!
//! These tests verify:
//! - Type-tagged encoding of every value kind
//! - Minimal-width integer encoding (including zero)
//! - Rejection of negative and oversized values
//! - Corruption detection on malformed content

use lazykv::format::{decode_value, encode_value, HeaderRecord, TypeTag};
use lazykv::{LazyError, Value};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn header() -> HeaderRecord {
    HeaderRecord::default()
}

fn round_trip(value: Value) -> Value {
    let encoded = encode_value(&value, &header()).unwrap();
    decode_value(&encoded, &header()).unwrap()
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_text_is_tag_plus_utf8() {
    let encoded = encode_value(&Value::from("héllo"), &header()).unwrap();

    assert_eq!(encoded[0], TypeTag::Text as u8);
    assert_eq!(&encoded[1..], "héllo".as_bytes());
}

#[test]
fn test_integer_zero_takes_one_byte() {
    let encoded = encode_value(&Value::Integer(0), &header()).unwrap();

    assert_eq!(encoded, vec![0x02, 0x00]);
    assert_eq!(round_trip(Value::Integer(0)), Value::Integer(0));
}

#[test]
fn test_integer_minimal_width() {
    let cases: [(i128, usize); 6] = [
        (1, 1),
        (255, 1),
        (256, 2),
        (346_735, 3),
        (u32::MAX as i128, 4),
        (u64::MAX as i128, 8),
    ];

    for (value, width) in cases {
        let encoded = encode_value(&Value::Integer(value), &header()).unwrap();
        assert_eq!(encoded.len(), 1 + width, "width of {}", value);
        assert_eq!(round_trip(Value::Integer(value)), Value::Integer(value));
    }
}

#[test]
fn test_negative_integer_rejected() {
    let result = encode_value(&Value::Integer(-1), &header());

    assert!(matches!(result, Err(LazyError::Encoding(_))));
}

#[test]
fn test_document_is_compact_json() {
    let document = json!({"x": [1, 2, 3]});
    let encoded = encode_value(&Value::Document(document.clone()), &header()).unwrap();

    assert_eq!(encoded[0], TypeTag::Document as u8);
    assert_eq!(&encoded[1..], br#"{"x":[1,2,3]}"#);
    assert_eq!(round_trip(Value::Document(document.clone())), Value::Document(document));
}

#[test]
fn test_nested_document() {
    let document = json!({
        "name": "lazy",
        "tags": ["a", "b"],
        "nested": {"depth": 2, "ratio": 0.5, "empty": {}}
    });

    assert_eq!(round_trip(Value::Document(document.clone())), Value::Document(document));
}

#[test]
fn test_int_list_fixed_width_elements() {
    let header = HeaderRecord {
        int_size: 2,
        ..HeaderRecord::default()
    };
    let encoded = encode_value(&Value::IntList(vec![1, 0x0203]), &header).unwrap();

    assert_eq!(encoded, vec![0x04, 0x01, 0x00, 0x03, 0x02]);
}

#[test]
fn test_int_list_all_equal_elements() {
    let list = Value::IntList(vec![7; 10]);

    assert_eq!(round_trip(list.clone()), list);
}

#[test]
fn test_empty_int_list() {
    assert_eq!(round_trip(Value::IntList(vec![])), Value::IntList(vec![]));
}

#[test]
fn test_int_list_element_too_large() {
    let header = HeaderRecord {
        int_size: 1,
        ..HeaderRecord::default()
    };
    let result = encode_value(&Value::IntList(vec![1, 256]), &header);

    assert!(matches!(
        result,
        Err(LazyError::ValueTooLarge { value: 256, width: 1 })
    ));
}

#[test]
fn test_raw_bytes_verbatim() {
    let raw = vec![0x00, 0xff, 0x00, 0x10];
    let encoded = encode_value(&Value::Bytes(raw.clone()), &header()).unwrap();

    assert_eq!(encoded[0], TypeTag::Bytes as u8);
    assert_eq!(&encoded[1..], raw.as_slice());
    assert_eq!(round_trip(Value::Bytes(raw.clone())), Value::Bytes(raw));
}

// =============================================================================
// List Conversion Tests
// =============================================================================

#[test]
fn test_signed_list_with_negative_rejected() {
    let result = Value::try_from(vec![1i64, -2, 3]);

    assert!(matches!(result, Err(LazyError::Encoding(_))));
}

#[test]
fn test_signed_list_converts() {
    let value = Value::try_from(vec![1i64, 2, 3]).unwrap();

    assert_eq!(value, Value::IntList(vec![1, 2, 3]));
}

#[test]
fn test_mixed_json_list_rejected() {
    let result = Value::int_list_from_json(&json!([1, "two", 3]));

    assert!(matches!(result, Err(LazyError::Encoding(_))));
}

#[test]
fn test_json_int_list_converts() {
    let value = Value::int_list_from_json(&json!([4, 5, 6])).unwrap();

    assert_eq!(value, Value::IntList(vec![4, 5, 6]));
}

// =============================================================================
// Decoding Error Tests
// =============================================================================

#[test]
fn test_unknown_tag_is_corruption() {
    let err = decode_value(&[0x09, 1, 2, 3], &header()).unwrap_err();

    assert!(err.is_corruption());
    assert!(matches!(err, LazyError::Corruption(_)));
}

#[test]
fn test_empty_content_is_corruption() {
    let result = decode_value(&[], &header());

    assert!(matches!(result, Err(LazyError::Corruption(_))));
}

#[test]
fn test_ragged_int_list_is_corruption() {
    // 4-byte elements, 6 payload bytes
    let result = decode_value(&[0x04, 1, 0, 0, 0, 2, 0], &header());

    assert!(matches!(result, Err(LazyError::Corruption(_))));
}

#[test]
fn test_empty_integer_payload_is_corruption() {
    let result = decode_value(&[0x02], &header());

    assert!(matches!(result, Err(LazyError::Corruption(_))));
}

#[test]
fn test_invalid_utf8_text_is_corruption() {
    let result = decode_value(&[0x01, 0xff, 0xfe], &header());

    assert!(matches!(result, Err(LazyError::Corruption(_))));
}

#[test]
fn test_invalid_document_is_corruption() {
    let result = decode_value(b"\x03{not json", &header());

    assert!(matches!(result, Err(LazyError::Corruption(_))));
}
