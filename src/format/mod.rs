//! Format Module
//!
//! The byte-exact on-disk layout of a LazyKV database file.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Header Record                                               │
//! │   {"int_size":4,"key_int_size":4,"content_int_size":4} 0x00 │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Entry (repeated)                                            │
//! │ ┌──────┬─────────────┬──────┬──────────────┬──────────────┐ │
//! │ │ 0x00 │ KeyEncoding │ 0x00 │ ContentLen   │ Content      │ │
//! │ │ (1)  │ (tag + key) │ (1)  │ (fixed, LE)  │ (tag+payload)│ │
//! │ └──────┴─────────────┴──────┴──────────────┴──────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Key Encodings
//! - 0x01: text key    - UTF-8 bytes, terminated by the following 0x00
//! - 0x02: integer key - `key_int_size` little-endian bytes
//!
//! ### Content Type Tags
//! - 0x01: text         - raw UTF-8
//! - 0x02: integer      - minimal-width unsigned little-endian
//! - 0x03: document     - compact JSON
//! - 0x04: integer list - `int_size`-wide little-endian elements
//! - 0x05: raw bytes    - verbatim

mod codec;
mod header;
mod key;
mod value;

pub use codec::{decode_fixed_uint, decode_value, encode_fixed_uint, encode_value, min_width};
pub use header::HeaderRecord;
pub use key::Key;
pub use value::{TypeTag, Value};

// =============================================================================
// Shared Constants
// =============================================================================

/// Marks the start of every entry, and separates the key from the length field
pub const ENTRY_MARKER: u8 = 0x00;

/// Terminates the header record
pub const HEADER_TERMINATOR: u8 = 0x00;

/// Key-type byte for text keys
pub const KEY_TAG_TEXT: u8 = 0x01;

/// Key-type byte for integer keys
pub const KEY_TAG_INT: u8 = 0x02;

/// Bytes of framing around the key body: leading marker, key tag, separator
pub const KEY_FRAMING_LEN: u64 = 3;
