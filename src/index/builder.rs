//! Index Builder
//!
//! Reconstructs the index with a single forward pass over the entries.

use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};

use tracing::{debug, warn};

use crate::error::{LazyError, Result};
use crate::format::{decode_fixed_uint, HeaderRecord, Key, ENTRY_MARKER, KEY_TAG_INT, KEY_TAG_TEXT};

use super::Index;

/// What a scan found besides the index itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    /// Number of entries indexed
    pub entries: usize,

    /// Offset just past the last indexed entry
    pub end_offset: u64,

    /// True if the scan stopped at a non-marker byte before end-of-file
    pub stopped_early: bool,
}

/// Scans the entry region of a database file
///
/// Only framing bytes are read: each entry's content is skipped over by its
/// declared length, never decoded.
pub struct IndexBuilder<'h> {
    header: &'h HeaderRecord,
}

impl<'h> IndexBuilder<'h> {
    pub fn new(header: &'h HeaderRecord) -> Self {
        Self { header }
    }

    /// Scan from `data_start` (the byte after the header terminator) to the
    /// end of valid data.
    pub fn build<R: Read + Seek>(&self, source: R, data_start: u64) -> Result<(Index, ScanSummary)> {
        let mut reader = BufReader::new(source);
        let file_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(data_start))?;

        let mut index = Index::new();
        let mut pos = data_start;
        let mut stopped_early = false;

        loop {
            let entry_start = pos;

            // Step 1: Entry marker (or end of data)
            let mut marker = [0u8; 1];
            match reader.read_exact(&mut marker) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            }
            if marker[0] != ENTRY_MARKER {
                warn!(
                    offset = entry_start,
                    byte = marker[0],
                    "Stopped indexing at non-marker byte"
                );
                stopped_early = true;
                break;
            }
            pos += 1;

            // Step 2: Key
            let key = self.read_key(&mut reader, &mut pos)?;

            // Step 3: The index points at the length field
            let length_offset = pos;

            // Step 4: Length, then skip the content without reading it
            let mut length_bytes = vec![0u8; self.header.content_int_size];
            reader
                .read_exact(&mut length_bytes)
                .map_err(|e| LazyError::truncated(e, "content length"))?;
            pos += length_bytes.len() as u64;

            let content_len = decode_fixed_uint(&length_bytes);
            let content_end = pos
                .checked_add(content_len)
                .filter(|end| *end <= file_len)
                .ok_or_else(|| {
                    LazyError::Corruption(format!(
                        "entry at offset {} declares {} content bytes but only {} remain",
                        entry_start,
                        content_len,
                        file_len.saturating_sub(pos)
                    ))
                })?;
            reader.seek_relative(content_len as i64)?;
            pos = content_end;

            debug!(key = %key, offset = length_offset, content_len, "Indexed entry");

            if index.insert(key.clone(), length_offset).is_some() {
                return Err(LazyError::Indexing {
                    offset: entry_start,
                    reason: format!("key {} appears more than once", key),
                });
            }
        }

        let summary = ScanSummary {
            entries: index.len(),
            end_offset: pos,
            stopped_early,
        };
        Ok((index, summary))
    }

    /// Read `tag | body | separator`, advancing `pos` past the separator
    fn read_key<R: BufRead>(&self, reader: &mut R, pos: &mut u64) -> Result<Key> {
        let tag_offset = *pos;
        let mut tag = [0u8; 1];
        reader
            .read_exact(&mut tag)
            .map_err(|e| LazyError::truncated(e, "key type"))?;
        *pos += 1;

        match tag[0] {
            KEY_TAG_TEXT => {
                let mut raw = Vec::new();
                *pos += reader.read_until(ENTRY_MARKER, &mut raw)? as u64;
                if raw.pop() != Some(ENTRY_MARKER) {
                    return Err(LazyError::Corruption(
                        "unexpected end of file while reading text key".to_string(),
                    ));
                }
                String::from_utf8(raw)
                    .map(Key::Text)
                    .map_err(|e| LazyError::Indexing {
                        offset: tag_offset,
                        reason: format!("text key is not valid UTF-8: {}", e),
                    })
            }
            KEY_TAG_INT => {
                let mut body = vec![0u8; self.header.key_int_size + 1];
                reader
                    .read_exact(&mut body)
                    .map_err(|e| LazyError::truncated(e, "integer key"))?;
                *pos += body.len() as u64;

                let separator = body.pop();
                if separator != Some(ENTRY_MARKER) {
                    return Err(LazyError::Indexing {
                        offset: tag_offset,
                        reason: format!("integer key is followed by {:?}, not a separator", separator),
                    });
                }
                Ok(Key::Int(decode_fixed_uint(&body)))
            }
            other => Err(LazyError::Indexing {
                offset: tag_offset,
                reason: format!("key header byte 0x{:02x} is not a supported header byte", other),
            }),
        }
    }
}
