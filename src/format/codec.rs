//! Value codec
//!
//! Conversion between typed values and type-tagged content bytes.
//!
//! ## Content Format
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Tag (1)  │         Payload             │
//! └──────────┴─────────────────────────────┘
//! ```
//!
//! Payloads carry no internal length framing; the entry's content-length
//! field already bounds them.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{LazyError, Result};

use super::{HeaderRecord, TypeTag, Value};

/// Widest integer payload the codec will decode
const MAX_INTEGER_PAYLOAD: usize = 16;

// =============================================================================
// Integer Helpers
// =============================================================================

/// Fewest bytes that hold `value` without truncation (zero takes one byte)
pub fn min_width(value: u128) -> usize {
    let bits = 128 - value.leading_zeros() as usize;
    bits.div_ceil(8).max(1)
}

/// Encode `value` as exactly `width` little-endian bytes
///
/// `width` must be in `1..=8`; a value that needs more bytes is
/// `ValueTooLarge`.
pub fn encode_fixed_uint(value: u64, width: usize) -> Result<Vec<u8>> {
    if min_width(value as u128) > width {
        return Err(LazyError::ValueTooLarge {
            value: value as u128,
            width,
        });
    }
    let mut buf = Vec::with_capacity(width);
    buf.put_uint_le(value, width);
    Ok(buf)
}

/// Decode a little-endian unsigned integer of 1..=8 bytes
pub fn decode_fixed_uint(mut bytes: &[u8]) -> u64 {
    let width = bytes.len();
    bytes.get_uint_le(width)
}

// =============================================================================
// Value Encoding/Decoding
// =============================================================================

/// Encode a value to `tag | payload`
///
/// Every check happens here, so a failing value never reaches the file.
pub fn encode_value(value: &Value, header: &HeaderRecord) -> Result<Vec<u8>> {
    let mut content = BytesMut::new();
    content.put_u8(value.type_tag() as u8);

    match value {
        Value::Text(text) => content.put_slice(text.as_bytes()),
        Value::Integer(int) => {
            let int = u128::try_from(*int).map_err(|_| {
                LazyError::Encoding(format!(
                    "negative integers are not supported, got {}",
                    int
                ))
            })?;
            let width = min_width(int);
            content.put_slice(&int.to_le_bytes()[..width]);
        }
        Value::Document(document) => {
            let json = serde_json::to_vec(document)
                .map_err(|e| LazyError::Encoding(format!("document: {}", e)))?;
            content.put_slice(&json);
        }
        Value::IntList(items) => {
            content.reserve(items.len() * header.int_size);
            for item in items {
                content.put_slice(&encode_fixed_uint(*item, header.int_size)?);
            }
        }
        Value::Bytes(raw) => content.put_slice(raw),
    }

    Ok(content.to_vec())
}

/// Decode `tag | payload` back into a value, dispatching strictly on the tag
pub fn decode_value(content: &[u8], header: &HeaderRecord) -> Result<Value> {
    let (&tag, payload) = content
        .split_first()
        .ok_or_else(|| LazyError::Corruption("entry content is empty".to_string()))?;

    match TypeTag::try_from(tag)? {
        TypeTag::Text => String::from_utf8(payload.to_vec())
            .map(Value::Text)
            .map_err(|e| LazyError::Corruption(format!("text value is not UTF-8: {}", e))),
        TypeTag::Integer => decode_integer(payload),
        TypeTag::Document => serde_json::from_slice(payload)
            .map(Value::Document)
            .map_err(|e| LazyError::Corruption(format!("unreadable document: {}", e))),
        TypeTag::IntList => decode_int_list(payload, header.int_size),
        TypeTag::Bytes => Ok(Value::Bytes(payload.to_vec())),
    }
}

fn decode_integer(payload: &[u8]) -> Result<Value> {
    if payload.is_empty() || payload.len() > MAX_INTEGER_PAYLOAD {
        return Err(LazyError::Corruption(format!(
            "integer payload of {} bytes",
            payload.len()
        )));
    }

    let mut raw = [0u8; MAX_INTEGER_PAYLOAD];
    raw[..payload.len()].copy_from_slice(payload);
    let value = u128::from_le_bytes(raw);

    i128::try_from(value)
        .map(Value::Integer)
        .map_err(|_| LazyError::Corruption(format!("integer {} out of range", value)))
}

fn decode_int_list(payload: &[u8], width: usize) -> Result<Value> {
    if payload.len() % width != 0 {
        return Err(LazyError::Corruption(format!(
            "integer list payload of {} bytes is not a multiple of {}",
            payload.len(),
            width
        )));
    }

    let items = payload.chunks_exact(width).map(decode_fixed_uint).collect();
    Ok(Value::IntList(items))
}
