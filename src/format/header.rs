//! Header Record
//!
//! The width configuration persisted once at offset 0 of every file.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::config::MAX_INT_WIDTH;
use crate::error::{LazyError, Result};

use super::HEADER_TERMINATOR;

/// File-level integer-width configuration, serialized as compact JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRecord {
    /// Width of each integer-list element, in bytes
    pub int_size: usize,

    /// Width of integer keys, in bytes
    pub key_int_size: usize,

    /// Width of the content-length field, in bytes
    pub content_int_size: usize,
}

impl Default for HeaderRecord {
    fn default() -> Self {
        Self {
            int_size: 4,
            key_int_size: 4,
            content_int_size: 4,
        }
    }
}

impl HeaderRecord {
    /// Every width must be a positive byte count no larger than `MAX_INT_WIDTH`
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (name, width) in [
            ("int_size", self.int_size),
            ("key_int_size", self.key_int_size),
            ("content_int_size", self.content_int_size),
        ] {
            if width == 0 || width > MAX_INT_WIDTH {
                return Err(format!(
                    "{} must be between 1 and {} bytes, got {}",
                    name, MAX_INT_WIDTH, width
                ));
            }
        }
        Ok(())
    }

    /// Serialized form including the trailing terminator
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec(self)
            .map_err(|e| LazyError::Encoding(format!("header record: {}", e)))?;
        bytes.push(HEADER_TERMINATOR);
        Ok(bytes)
    }

    /// Write the record (and terminator) at the writer's current position
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<u64> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        Ok(bytes.len() as u64)
    }

    /// Read a record up to the first terminator
    ///
    /// Returns the record and the number of bytes consumed (terminator
    /// included), which is also the offset of the first entry.
    pub fn read_from<R: BufRead>(reader: &mut R) -> Result<(Self, u64)> {
        let mut raw = Vec::new();
        let consumed = reader.read_until(HEADER_TERMINATOR, &mut raw)?;

        if raw.pop() != Some(HEADER_TERMINATOR) {
            return Err(LazyError::Corruption(
                "header record is not terminated".to_string(),
            ));
        }

        let record: HeaderRecord = serde_json::from_slice(&raw)
            .map_err(|e| LazyError::Corruption(format!("unreadable header record: {}", e)))?;
        record
            .validate()
            .map_err(|reason| LazyError::Corruption(format!("header record: {}", reason)))?;

        Ok((record, consumed as u64))
    }
}
