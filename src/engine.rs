//! Engine Module
//!
//! The storage engine that owns the database file and its index.
//!
//! ## Responsibilities
//! - Bootstrap a new file or read the header of an existing one
//! - Build the index with a single scan at open
//! - Append entries, read them back lazily, delete them by compaction
//!
//! Every file access seeks to an absolute offset first; no operation relies
//! on where a previous one left the cursor.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;

use bytes::{BufMut, BytesMut};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{LazyError, Result};
use crate::format::{
    decode_fixed_uint, decode_value, encode_fixed_uint, encode_value, HeaderRecord, Key, Value,
    ENTRY_MARKER, KEY_FRAMING_LEN,
};
use crate::index::{Index, IndexBuilder};
use crate::storage::Compactor;

/// The main storage engine
///
/// ## Concurrency Model: Single Owner
///
/// The engine holds one file handle and expects to be its only user.
/// Every operation that touches the file takes `&mut self`, reads included,
/// since they move the file cursor. Sharing across threads goes through
/// [`SharedEngine`](crate::SharedEngine) or another exclusive lock chosen
/// by the caller.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// The database file
    file: File,

    /// Widths in effect (persisted ones win over `config`)
    header: HeaderRecord,

    /// Offset of the first entry (header record length, terminator included)
    data_start: u64,

    /// Offset just past the last indexed entry
    data_end: u64,

    /// Current physical file length
    file_len: u64,

    /// Key → content-length field offset
    index: Index,

    /// Removes entries on delete
    compactor: Compactor,
}

impl Engine {
    /// Open or create a database with the given config
    ///
    /// On startup:
    /// 1. Open/create the file
    /// 2. Empty file: validate the configured widths and write them as the
    ///    header record
    /// 3. Otherwise: read the persisted header record and scan the entries;
    ///    the configured widths are ignored
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&config.path)?;

        let existing_len = file.metadata()?.len();

        let (header, data_start, data_end, index) = if existing_len == 0 {
            config.validate_widths()?;
            let header = config.header_record();
            file.seek(SeekFrom::Start(0))?;
            let data_start = header.write_to(&mut file)?;
            if config.sync_on_write {
                file.sync_data()?;
            }

            info!(
                path = %config.path.display(),
                key_int_size = header.key_int_size,
                content_int_size = header.content_int_size,
                int_size = header.int_size,
                "Bootstrapped new database"
            );

            (header, data_start, data_start, Index::new())
        } else {
            file.seek(SeekFrom::Start(0))?;
            let (header, data_start) = HeaderRecord::read_from(&mut BufReader::new(&mut file))?;

            if header != config.header_record() {
                debug!(?header, "Using persisted widths instead of configured ones");
            }

            let (index, summary) = IndexBuilder::new(&header).build(&mut file, data_start)?;
            if summary.stopped_early {
                warn!(
                    end_offset = summary.end_offset,
                    file_len = existing_len,
                    "Bytes after the last entry are not indexed and will be discarded on the next write"
                );
            }

            info!(
                path = %config.path.display(),
                entries = summary.entries,
                file_len = existing_len,
                "Opened database"
            );

            (header, data_start, summary.end_offset, index)
        };

        let file_len = file.seek(SeekFrom::End(0))?;
        let compactor = Compactor::new(config.compaction_chunk_size);

        Ok(Self {
            config,
            file,
            header,
            data_start,
            data_end,
            file_len,
            index,
            compactor,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config; widths only matter if the file is new.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().path(path.as_ref()).build();
        Self::open(config)
    }

    /// Store a value under a new key
    ///
    /// Keys are never overwritten: an existing key is `DuplicateKey`, and
    /// the caller must delete it first. The value is fully encoded before
    /// any byte is written.
    pub fn write(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        if self.index.contains_key(&key) {
            return Err(LazyError::DuplicateKey(key));
        }

        let content = encode_value(&value.into(), &self.header)?;
        let entry = self.build_entry(&key, &content)?;

        let start = self.append(&entry)?;
        let length_offset = start + key.body_len(self.header.key_int_size) as u64 + KEY_FRAMING_LEN;

        debug!(key = %key, offset = length_offset, content_len = content.len(), "Wrote entry");
        self.index.insert(key, length_offset);

        Ok(())
    }

    /// Read the value stored under a key
    ///
    /// Seeks straight to the entry; nothing else in the file is touched.
    pub fn read(&mut self, key: impl Into<Key>) -> Result<Value> {
        let key = key.into();
        let offset = self
            .index
            .get(&key)
            .ok_or_else(|| LazyError::KeyNotFound(key.clone()))?;

        self.file.seek(SeekFrom::Start(offset))?;

        let mut length_bytes = vec![0u8; self.header.content_int_size];
        self.file
            .read_exact(&mut length_bytes)
            .map_err(|e| LazyError::truncated(e, "content length"))?;
        let content_len = decode_fixed_uint(&length_bytes);

        let content_start = offset + length_bytes.len() as u64;
        if content_start
            .checked_add(content_len)
            .filter(|end| *end <= self.file_len)
            .is_none()
        {
            return Err(LazyError::Corruption(format!(
                "entry for key {} declares {} content bytes past end of file",
                key, content_len
            )));
        }

        let mut content = vec![0u8; content_len as usize];
        self.file
            .read_exact(&mut content)
            .map_err(|e| LazyError::truncated(e, "content"))?;

        decode_value(&content, &self.header)
    }

    /// Delete a key, compacting the file over its entry
    pub fn delete(&mut self, key: impl Into<Key>) -> Result<()> {
        let key = key.into();
        let offset = self
            .index
            .get(&key)
            .ok_or_else(|| LazyError::KeyNotFound(key.clone()))?;

        let span = Compactor::locate(
            &mut self.file,
            offset,
            key.body_len(self.header.key_int_size),
            self.header.content_int_size,
        )?;
        self.file_len = self.compactor.remove(&mut self.file, span)?;
        self.data_end -= span.len;

        self.index.remove(&key);
        self.index.rebase_after(offset, span.len);

        if self.config.sync_on_write {
            self.file.sync_data()?;
        }

        debug!(key = %key, start = span.start, len = span.len, "Deleted entry");
        Ok(())
    }

    /// Force sync to disk
    pub fn sync(&self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Close the engine, syncing the file first
    pub fn close(self) -> Result<()> {
        self.file.sync_all()?;
        debug!(path = %self.config.path.display(), "Closed database");
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.index.contains_key(&key.into())
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterate over all keys in arbitrary order
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.index.keys()
    }

    /// The in-memory index
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Widths in effect for this file
    pub fn header(&self) -> &HeaderRecord {
        &self.header
    }

    /// Size of the header record, terminator included
    pub fn header_len(&self) -> u64 {
        self.data_start
    }

    /// Current file length in bytes
    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    /// Total bytes the key's entry occupies on disk
    pub fn entry_len(&mut self, key: impl Into<Key>) -> Result<u64> {
        let key = key.into();
        let offset = self
            .index
            .get(&key)
            .ok_or_else(|| LazyError::KeyNotFound(key.clone()))?;

        let span = Compactor::locate(
            &mut self.file,
            offset,
            key.body_len(self.header.key_int_size),
            self.header.content_int_size,
        )?;
        Ok(span.len)
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// `marker | key | marker | length | content`
    fn build_entry(&self, key: &Key, content: &[u8]) -> Result<BytesMut> {
        let length = encode_fixed_uint(content.len() as u64, self.header.content_int_size)?;

        let key_len = key.body_len(self.header.key_int_size);
        let mut entry = BytesMut::with_capacity(
            KEY_FRAMING_LEN as usize + key_len + length.len() + content.len(),
        );
        entry.put_u8(ENTRY_MARKER);
        key.encode_into(&mut entry, self.header.key_int_size)?;
        entry.put_u8(ENTRY_MARKER);
        entry.put_slice(&length);
        entry.put_slice(content);

        Ok(entry)
    }

    /// Write `bytes` after the last indexed entry, returning where they start
    fn append(&mut self, bytes: &[u8]) -> Result<u64> {
        if self.file_len > self.data_end {
            warn!(
                discarded = self.file_len - self.data_end,
                "Discarding unindexed bytes at end of file"
            );
            self.file.set_len(self.data_end)?;
        }

        let start = self.data_end;
        self.file.seek(SeekFrom::Start(start))?;
        self.file.write_all(bytes)?;
        if self.config.sync_on_write {
            self.file.sync_data()?;
        }

        self.data_end += bytes.len() as u64;
        self.file_len = self.data_end;
        Ok(start)
    }
}
