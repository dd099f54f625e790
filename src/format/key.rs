//! Key definitions
//!
//! Keys are either UTF-8 text or unsigned integers, unique across both kinds.

use std::fmt;

use bytes::{BufMut, BytesMut};

use crate::error::{LazyError, Result};

use super::codec::encode_fixed_uint;
use super::{ENTRY_MARKER, KEY_TAG_INT, KEY_TAG_TEXT};

/// A database key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// UTF-8 text key (may not contain NUL)
    Text(String),

    /// Integer key, stored in `key_int_size` bytes
    Int(u64),
}

impl Key {
    /// Length of the key body on disk, excluding its type tag
    pub fn body_len(&self, key_int_size: usize) -> usize {
        match self {
            Key::Text(text) => text.len(),
            Key::Int(_) => key_int_size,
        }
    }

    /// Append `tag | body` to `buf`
    ///
    /// Fails before touching `buf` if the key can't be represented.
    pub fn encode_into(&self, buf: &mut BytesMut, key_int_size: usize) -> Result<()> {
        match self {
            Key::Text(text) => {
                if text.as_bytes().contains(&ENTRY_MARKER) {
                    return Err(LazyError::Encoding(format!(
                        "text key {:?} contains a NUL byte",
                        text
                    )));
                }
                buf.put_u8(KEY_TAG_TEXT);
                buf.put_slice(text.as_bytes());
            }
            Key::Int(value) => {
                let body = encode_fixed_uint(*value, key_int_size)?;
                buf.put_u8(KEY_TAG_INT);
                buf.put_slice(&body);
            }
        }
        Ok(())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Text(text) => write!(f, "{:?}", text),
            Key::Int(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Text(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value)
    }
}

impl From<&String> for Key {
    fn from(value: &String) -> Self {
        Key::Text(value.clone())
    }
}

impl From<u64> for Key {
    fn from(value: u64) -> Self {
        Key::Int(value)
    }
}

impl From<u32> for Key {
    fn from(value: u32) -> Self {
        Key::Int(value as u64)
    }
}

impl From<&Key> for Key {
    fn from(value: &Key) -> Self {
        value.clone()
    }
}
