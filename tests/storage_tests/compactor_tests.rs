//! Tests for the Compactor
//!
//! These tests verify:
//! - Entry spans are located from the length-field offset
//! - Removing a span shifts trailing bytes and truncates
//! - Overlapping shifts work for every chunk size
//! - Spans past end-of-file are rejected

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use lazykv::storage::{Compactor, EntrySpan};
use lazykv::LazyError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_file(contents: &[u8]) -> (TempDir, PathBuf, File) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("compact.lazy");
    {
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
    }
    let file = OpenOptions::new().read(true).write(true).open(&path).unwrap();
    (temp_dir, path, file)
}

/// A run of bytes long enough to need many chunks
fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

// =============================================================================
// Locate Tests
// =============================================================================

#[test]
fn test_locate_text_key_entry() {
    // header "H\0", then entry: 00 01 'a' 'b' 00 | len=3 (4 bytes) | 01 'x' 'y'
    let mut bytes = b"H\x00".to_vec();
    bytes.extend_from_slice(&[0x00, 0x01, b'a', b'b', 0x00]);
    let length_offset = bytes.len() as u64;
    bytes.extend_from_slice(&3u32.to_le_bytes());
    bytes.extend_from_slice(&[0x01, b'x', b'y']);
    let (_temp, _path, mut file) = setup_temp_file(&bytes);

    let span = Compactor::locate(&mut file, length_offset, 2, 4).unwrap();

    assert_eq!(span, EntrySpan { start: 2, len: 5 + 4 + 3 });
    assert_eq!(span.end(), bytes.len() as u64);
}

#[test]
fn test_locate_offset_too_small_is_corruption() {
    let (_temp, _path, mut file) = setup_temp_file(&[0x01, 0x00, 0x00, 0x00, 0x00]);

    let result = Compactor::locate(&mut file, 1, 4, 4);

    assert!(matches!(result, Err(LazyError::Corruption(_))));
}

#[test]
fn test_locate_huge_content_length_is_corruption() {
    let mut bytes = b"H\x00".to_vec();
    bytes.extend_from_slice(&[0x00, 0x01, b'a', 0x00]);
    let length_offset = bytes.len() as u64;
    bytes.extend_from_slice(&[0xff; 8]);
    let (_temp, _path, mut file) = setup_temp_file(&bytes);

    let result = Compactor::locate(&mut file, length_offset, 1, 8);

    assert!(matches!(result, Err(LazyError::Corruption(_))));
}

// =============================================================================
// Remove Tests
// =============================================================================

#[test]
fn test_remove_middle_span() {
    let before = b"HEADER|first|second|third".to_vec();
    let (_temp, path, mut file) = setup_temp_file(&before);

    // remove "first|"
    let new_len = Compactor::new(4)
        .remove(&mut file, EntrySpan { start: 7, len: 6 })
        .unwrap();

    assert_eq!(new_len, before.len() as u64 - 6);
    assert_eq!(fs::read(&path).unwrap(), b"HEADER|second|third".to_vec());
}

#[test]
fn test_remove_last_span_only_truncates() {
    let (_temp, path, mut file) = setup_temp_file(b"HEADER|only");

    let new_len = Compactor::new(64)
        .remove(&mut file, EntrySpan { start: 7, len: 4 })
        .unwrap();

    assert_eq!(new_len, 7);
    assert_eq!(fs::read(&path).unwrap(), b"HEADER|".to_vec());
}

#[test]
fn test_remove_with_every_chunk_size() {
    let prefix = b"head".to_vec();
    let removed = vec![0xee; 10];
    let tail = patterned(97);

    for chunk_size in [1, 2, 3, 9, 10, 11, 64, 4096] {
        let mut before = prefix.clone();
        before.extend_from_slice(&removed);
        before.extend_from_slice(&tail);
        let (_temp, path, mut file) = setup_temp_file(&before);

        Compactor::new(chunk_size)
            .remove(
                &mut file,
                EntrySpan {
                    start: prefix.len() as u64,
                    len: removed.len() as u64,
                },
            )
            .unwrap();

        let mut expected = prefix.clone();
        expected.extend_from_slice(&tail);
        assert_eq!(fs::read(&path).unwrap(), expected, "chunk size {}", chunk_size);
    }
}

#[test]
fn test_remove_span_shorter_than_chunk() {
    // Destination and source overlap within a single chunk
    let mut before = b"H".to_vec();
    before.push(0xaa);
    before.extend_from_slice(&patterned(300));
    let (_temp, path, mut file) = setup_temp_file(&before);

    Compactor::new(128)
        .remove(&mut file, EntrySpan { start: 1, len: 1 })
        .unwrap();

    let mut expected = b"H".to_vec();
    expected.extend_from_slice(&patterned(300));
    assert_eq!(fs::read(&path).unwrap(), expected);
}

#[test]
fn test_remove_past_eof_is_corruption() {
    let (_temp, path, mut file) = setup_temp_file(b"HEADER|short");

    let result = Compactor::new(8).remove(&mut file, EntrySpan { start: 7, len: 50 });

    assert!(matches!(result, Err(LazyError::Corruption(_))));
    assert_eq!(fs::read(&path).unwrap(), b"HEADER|short".to_vec());
}
