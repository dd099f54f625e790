//! Storage Module
//!
//! In-place compaction of the single database file.
//!
//! ## Responsibilities
//! - Locate the full byte span of an entry from its index offset
//! - Remove that span by shifting every trailing byte backward
//! - Truncate the file to its new length
//!
//! ## Compaction
//! ```text
//! before: │ header │ e1 │ e2 (removed) │ e3 │ e4 │
//!                       ◄──── shift ───────────┘
//! after:  │ header │ e1 │ e3 │ e4 │
//! ```
//!
//! There is no free-list or write-ahead log: an interruption mid-shift can
//! leave the file corrupted.

mod compactor;

pub use compactor::{Compactor, EntrySpan};
