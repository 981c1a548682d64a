//! # Byte Helpers
//!
//! Little-endian integer encoding and decoding, NUL-terminated string
//! extraction, and paragraph alignment. Everything in the NE format is
//! little-endian, and every offset in the resource table is counted in
//! 16-byte paragraphs.
//!
//! Readers trust their offsets. Callers check buffer lengths first and
//! report out-of-range fields themselves.

/// Bytes per paragraph.
pub const PARAGRAPH: usize = 16;

/// Shift count applied to resource offsets and lengths (`1 << 4 == 16`).
pub const ALIGN_SHIFT: u16 = 4;

pub fn read_u8(data: &[u8], offset: usize) -> u8 {
    data[offset]
}

pub fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

pub fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

pub fn write_u32(data: &mut [u8], offset: usize, val: u32) {
    data[offset..offset + 4].copy_from_slice(&val.to_le_bytes());
}

pub fn push_u8(out: &mut Vec<u8>, val: u8) {
    out.push(val);
}

pub fn push_u16(out: &mut Vec<u8>, val: u16) {
    out.extend_from_slice(&val.to_le_bytes());
}

pub fn push_u32(out: &mut Vec<u8>, val: u32) {
    out.extend_from_slice(&val.to_le_bytes());
}

/// Return the bytes from `offset` up to (not including) the first NUL.
///
/// An unterminated string yields the rest of the buffer. An offset at or
/// past the end yields an empty slice.
pub fn asciz(data: &[u8], offset: usize) -> &[u8] {
    let tail = data.get(offset..).unwrap_or(&[]);
    match tail.iter().position(|&b| b == 0) {
        Some(end) => &tail[..end],
        None => tail,
    }
}

/// Whether `asciz(data, offset)` found a terminating NUL.
pub fn is_terminated(data: &[u8], offset: usize) -> bool {
    data.get(offset..).is_some_and(|tail| tail.contains(&0))
}

/// Round `len` up to the next paragraph boundary.
pub fn align_up(len: usize) -> usize {
    (len + PARAGRAPH - 1) & !(PARAGRAPH - 1)
}

/// Number of zero bytes needed to bring `len` to a paragraph boundary.
pub fn pad_len(len: usize) -> usize {
    align_up(len) - len
}

/// Zero-pad `data` to a paragraph boundary.
pub fn pad_to_paragraph(data: &mut Vec<u8>) {
    let padded = align_up(data.len());
    data.resize(padded, 0);
}
