//! Compactor
//!
//! Physically removes an entry from the middle of the file.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use tracing::debug;

use crate::error::{LazyError, Result};
use crate::format::{decode_fixed_uint, KEY_FRAMING_LEN};

/// The bytes one entry occupies, marker through content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntrySpan {
    /// Offset of the entry's leading marker byte
    pub start: u64,

    /// Total length of the entry
    pub len: u64,
}

impl EntrySpan {
    /// Offset just past the entry's content
    pub fn end(&self) -> u64 {
        self.start + self.len
    }
}

/// Shifts trailing bytes over a removed entry in fixed-size chunks
#[derive(Debug, Clone, Copy)]
pub struct Compactor {
    chunk_size: usize,
}

impl Compactor {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Work out an entry's span from its index offset
    ///
    /// `key_body_len` is the key's on-disk length without its type tag.
    /// Reads only the content-length field.
    pub fn locate<R: Read + Seek>(
        file: &mut R,
        length_offset: u64,
        key_body_len: usize,
        content_int_size: usize,
    ) -> Result<EntrySpan> {
        file.seek(SeekFrom::Start(length_offset))?;
        let mut length_bytes = vec![0u8; content_int_size];
        file.read_exact(&mut length_bytes)
            .map_err(|e| LazyError::truncated(e, "content length"))?;
        let content_len = decode_fixed_uint(&length_bytes);

        let framing = key_body_len as u64 + KEY_FRAMING_LEN;
        let start = length_offset.checked_sub(framing).ok_or_else(|| {
            LazyError::Corruption(format!(
                "index offset {} is too small for its key",
                length_offset
            ))
        })?;
        let header_len = framing + content_int_size as u64;
        let len = header_len
            .checked_add(content_len)
            .filter(|len| start.checked_add(*len).is_some())
            .ok_or_else(|| {
                LazyError::Corruption(format!(
                    "entry at offset {} declares {} content bytes",
                    start, content_len
                ))
            })?;

        Ok(EntrySpan { start, len })
    }

    /// Remove `span` from the file, returning the new file length
    ///
    /// Each chunk is read completely before it is written to a strictly
    /// lower offset, so overlapping source and destination ranges are safe
    /// for any chunk size.
    pub fn remove(&self, file: &mut File, span: EntrySpan) -> Result<u64> {
        let file_len = file.seek(SeekFrom::End(0))?;
        if span.end() > file_len {
            return Err(LazyError::Corruption(format!(
                "entry at offset {} extends {} bytes past end of file",
                span.start,
                span.end() - file_len
            )));
        }

        let mut read_pos = span.end();
        let mut write_pos = span.start;
        let mut buf = vec![0u8; self.chunk_size];
        let mut chunks = 0usize;

        while read_pos < file_len {
            let n = (file_len - read_pos).min(self.chunk_size as u64) as usize;

            file.seek(SeekFrom::Start(read_pos))?;
            file.read_exact(&mut buf[..n])?;

            file.seek(SeekFrom::Start(write_pos))?;
            file.write_all(&buf[..n])?;

            read_pos += n as u64;
            write_pos += n as u64;
            chunks += 1;
        }

        file.set_len(write_pos)?;

        debug!(
            start = span.start,
            removed = span.len,
            shifted = file_len - span.end(),
            chunks,
            "Compacted entry"
        );

        Ok(write_pos)
    }
}
