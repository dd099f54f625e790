//! Configuration for LazyKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{LazyError, Result};
use crate::format::HeaderRecord;

/// Largest width (in bytes) accepted for any fixed-width integer field
pub const MAX_INT_WIDTH: usize = 8;

/// Main configuration for a LazyKV database
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // File Configuration
    // -------------------------------------------------------------------------
    /// The single database file
    pub path: PathBuf,

    // -------------------------------------------------------------------------
    // Width Configuration (bootstrap only)
    // -------------------------------------------------------------------------
    /// Width of integer keys, in bytes
    pub key_int_size: usize,

    /// Width of the content-length field, in bytes
    pub content_int_size: usize,

    /// Width of each integer-list element, in bytes
    pub int_size: usize,

    // -------------------------------------------------------------------------
    // Write Configuration
    // -------------------------------------------------------------------------
    /// Chunk size used when shifting bytes during compaction
    pub compaction_chunk_size: usize,

    /// Call `sync_data` after every write and delete
    pub sync_on_write: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./lazykv.db"),
            key_int_size: 4,
            content_int_size: 4,
            int_size: 4,
            compaction_chunk_size: 64 * 1024, // 64 KB
            sync_on_write: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// The header record a freshly bootstrapped file would carry
    pub fn header_record(&self) -> HeaderRecord {
        HeaderRecord {
            int_size: self.int_size,
            key_int_size: self.key_int_size,
            content_int_size: self.content_int_size,
        }
    }

    /// Check the options that apply to every open
    pub fn validate(&self) -> Result<()> {
        if self.compaction_chunk_size == 0 {
            return Err(LazyError::Config(
                "compaction_chunk_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Check the widths a new file would be bootstrapped with
    ///
    /// Existing files carry their own widths, so this only runs on bootstrap.
    pub fn validate_widths(&self) -> Result<()> {
        self.header_record()
            .validate()
            .map_err(LazyError::Config)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the database file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the integer key width (in bytes)
    pub fn key_int_size(mut self, width: usize) -> Self {
        self.config.key_int_size = width;
        self
    }

    /// Set the content-length field width (in bytes)
    pub fn content_int_size(mut self, width: usize) -> Self {
        self.config.content_int_size = width;
        self
    }

    /// Set the integer-list element width (in bytes)
    pub fn int_size(mut self, width: usize) -> Self {
        self.config.int_size = width;
        self
    }

    /// Set the compaction chunk size (in bytes)
    pub fn compaction_chunk_size(mut self, size: usize) -> Self {
        self.config.compaction_chunk_size = size;
        self
    }

    /// Sync the file after every mutation
    pub fn sync_on_write(mut self, enabled: bool) -> Self {
        self.config.sync_on_write = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
