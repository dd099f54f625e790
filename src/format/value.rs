//! Value definitions
//!
//! The typed values an entry's content can hold.

use crate::error::{LazyError, Result};

/// Content type tag (first byte of every entry's content)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TypeTag {
    Text = 0x01,
    Integer = 0x02,
    Document = 0x03,
    IntList = 0x04,
    Bytes = 0x05,
}

impl TryFrom<u8> for TypeTag {
    type Error = LazyError;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            0x01 => Ok(TypeTag::Text),
            0x02 => Ok(TypeTag::Integer),
            0x03 => Ok(TypeTag::Document),
            0x04 => Ok(TypeTag::IntList),
            0x05 => Ok(TypeTag::Bytes),
            _ => Err(LazyError::Corruption(format!(
                "incorrect content type byte: 0x{:02x}",
                byte
            ))),
        }
    }
}

/// A stored value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 text
    Text(String),

    /// Non-negative integer (negative values are rejected when encoding)
    Integer(i128),

    /// Structured document (nested text/number/list/mapping)
    Document(serde_json::Value),

    /// Homogeneous list of non-negative integers
    IntList(Vec<u64>),

    /// Opaque byte blob
    Bytes(Vec<u8>),
}

impl Value {
    /// The tag this value is written with
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Text(_) => TypeTag::Text,
            Value::Integer(_) => TypeTag::Integer,
            Value::Document(_) => TypeTag::Document,
            Value::IntList(_) => TypeTag::IntList,
            Value::Bytes(_) => TypeTag::Bytes,
        }
    }

    /// Build an integer list from a JSON array
    ///
    /// Only arrays made entirely of non-negative integers qualify; anything
    /// else is an `Encoding` error rather than a silent coercion.
    pub fn int_list_from_json(json: &serde_json::Value) -> Result<Self> {
        let items = json.as_array().ok_or_else(|| {
            LazyError::Encoding(format!("expected a list of integers, got {}", json))
        })?;

        items
            .iter()
            .map(|item| {
                item.as_u64().ok_or_else(|| {
                    LazyError::Encoding(format!(
                        "lists must contain only non-negative integers, found {}",
                        item
                    ))
                })
            })
            .collect::<Result<Vec<u64>>>()
            .map(Value::IntList)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i128)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value as i128)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value as i128)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Integer(value as i128)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::Document(value)
    }
}

impl From<Vec<u64>> for Value {
    fn from(value: Vec<u64>) -> Self {
        Value::IntList(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl TryFrom<Vec<i64>> for Value {
    type Error = LazyError;

    fn try_from(items: Vec<i64>) -> Result<Self> {
        items
            .into_iter()
            .map(|item| {
                u64::try_from(item).map_err(|_| {
                    LazyError::Encoding(format!(
                        "integer lists are unsigned, found {}",
                        item
                    ))
                })
            })
            .collect::<Result<Vec<u64>>>()
            .map(Value::IntList)
    }
}
