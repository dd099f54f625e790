//! # LazyKV
//!
//! An embedded, single-file key-value store built for lazy access:
//! - One scan at open builds a key → offset index; values stay on disk
//! - Reads seek straight to the requested entry
//! - Writes append; deletes compact the file in place
//! - Typed values: text, integers, documents, integer lists, raw bytes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Engine                              │
//! │               write / read / delete / close                 │
//! └──────┬───────────────────┬────────────────────┬─────────────┘
//!        │                   │                    │
//!        ▼                   ▼                    ▼
//! ┌─────────────┐     ┌─────────────┐      ┌─────────────┐
//! │   Format    │     │    Index    │      │  Compactor  │
//! │ (codec,     │     │ (key→offset,│      │ (shift and  │
//! │  header)    │     │  scanner)   │      │  truncate)  │
//! └──────┬──────┘     └──────┬──────┘      └──────┬──────┘
//!        │                   │                    │
//!        └───────────────────┼────────────────────┘
//!                            ▼
//!                    ┌─────────────┐
//!                    │  Database   │
//!                    │    File     │
//!                    └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use lazykv::{Engine, Key, Value};
//!
//! let mut db = Engine::open_path("example.lazy")?;
//! db.write("greeting", "hello")?;
//! db.write(7u64, Value::Integer(12345))?;
//! assert_eq!(db.read("greeting")?, Value::from("hello"));
//! db.delete(Key::Int(7))?;
//! db.close()?;
//! # Ok::<(), lazykv::LazyError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod format;
pub mod index;
pub mod storage;
pub mod engine;
pub mod shared;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LazyError, Result};
pub use config::Config;
pub use engine::Engine;
pub use format::{HeaderRecord, Key, Value};
pub use shared::SharedEngine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of LazyKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
